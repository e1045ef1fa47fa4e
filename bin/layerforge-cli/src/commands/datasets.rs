// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `layerforge datasets` command: list the built-in sample datasets.

use catalog::{Catalog, DatasetRecord};
use std::fmt::Write;

pub fn execute(id: Option<String>) -> anyhow::Result<()> {
    let mut datasets = Catalog::new();
    for d in DatasetRecord::samples() {
        datasets.create(d)?;
    }

    let out = match id {
        Some(id) => render_one(datasets.get(&id)?),
        None => render_all(&datasets.list()),
    };
    print!("{out}");
    Ok(())
}

fn render_all(datasets: &[&DatasetRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {:<14} {:<16} {:<8} {:>8} {:>8} {:<10}",
        "Id", "Name", "Type", "Samples", "Classes", "Shape"
    );
    let _ = writeln!(out, "  {}", "-".repeat(70));
    for d in datasets {
        let _ = writeln!(
            out,
            "  {:<14} {:<16} {:<8} {:>8} {:>8} {:<10}",
            d.id,
            d.name,
            d.dataset_type.as_str(),
            d.stats.total_files,
            d.stats.num_classes,
            d.shape.as_deref().unwrap_or("-"),
        );
    }
    out
}

fn render_one(d: &DatasetRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  {} ({})", d.name, d.id);
    if let Some(desc) = &d.description {
        let _ = writeln!(out, "   {desc}");
    }
    let _ = writeln!(out, "   Type:     {}", d.dataset_type);
    if let Some(task) = &d.task {
        let _ = writeln!(out, "   Task:     {task}");
    }
    let _ = writeln!(out, "   Samples:  {}", d.stats.total_files);
    let _ = writeln!(out, "   Classes:  {}", d.stats.num_classes);
    if let Some(shape) = &d.shape {
        let _ = writeln!(out, "   Shape:    {shape}");
    }
    if let Some(size) = &d.size {
        let _ = writeln!(out, "   Size:     {size}");
    }
    if let Some(citation) = &d.citation {
        let _ = writeln!(out, "   Citation: {citation}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_all_lists_samples() {
        let samples = DatasetRecord::samples();
        let refs: Vec<&DatasetRecord> = samples.iter().collect();
        let out = render_all(&refs);
        for id in ["mnist", "cifar10", "imdb", "fashionmnist", "iris", "titanic"] {
            assert!(out.contains(id));
        }
    }

    #[test]
    fn test_render_one() {
        let samples = DatasetRecord::samples();
        let out = render_one(&samples[0]);
        assert!(out.contains("MNIST (mnist)"));
        assert!(out.contains("Shape:    28,28,1"));
        assert!(out.contains("Citation: LeCun et al., 1998"));
    }

    #[test]
    fn test_unknown_id_fails() {
        let err = execute(Some("imagenet".into())).unwrap_err();
        assert_eq!(err.to_string(), "dataset 'imagenet' not found");
    }
}
