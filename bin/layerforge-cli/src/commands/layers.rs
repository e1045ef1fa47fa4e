// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `layerforge layers` command: print the layer palette.

use network_ir::{registry, LayerTypeDescriptor};
use std::fmt::Write;

pub fn execute(search: Option<String>) -> anyhow::Result<()> {
    print!("{}", render(search.as_deref()));
    Ok(())
}

fn render(search: Option<&str>) -> String {
    let matches: Vec<&LayerTypeDescriptor> = match search {
        Some(q) => registry::search(q),
        None => registry::all().collect(),
    };

    let mut out = String::new();
    if matches.is_empty() {
        let _ = writeln!(out, "No layer types match '{}'.", search.unwrap_or_default());
        return out;
    }

    for (category, members) in registry::by_category() {
        let shown: Vec<_> = members
            .into_iter()
            .filter(|d| matches.iter().any(|m| m.layer_type == d.layer_type))
            .collect();
        if shown.is_empty() {
            continue;
        }
        let _ = writeln!(out, "  {category}");
        for d in shown {
            let _ = writeln!(
                out,
                "   {} {:<16} {:<20} {}",
                d.icon,
                d.layer_type.as_str(),
                d.label,
                d.description
            );
            if !d.required_fields.is_empty() {
                let _ = writeln!(out, "      requires: {}", d.required_fields.join(", "));
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_every_type() {
        let out = render(None);
        for d in registry::all() {
            assert!(out.contains(d.label), "missing {}", d.label);
        }
    }

    #[test]
    fn test_search_filters() {
        let out = render(Some("recurrent"));
        assert!(out.contains(" lstm "));
        assert!(out.contains(" gru "));
        assert!(!out.contains(" dense "));
    }

    #[test]
    fn test_search_without_matches() {
        assert_eq!(render(Some("zzz")), "No layer types match 'zzz'.\n");
    }
}
