// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Python literal rendering shared by all emitters.

use network_ir::{NetworkConfig, Preprocessing};

pub(crate) fn py_bool(b: bool) -> &'static str {
    if b {
        "True"
    } else {
        "False"
    }
}

/// Renders a float the shortest way that round-trips.
pub(crate) fn py_float(v: f64) -> String {
    if v.is_finite() {
        format!("{v}")
    } else if v.is_nan() {
        "float('nan')".into()
    } else if v > 0.0 {
        "float('inf')".into()
    } else {
        "float('-inf')".into()
    }
}

/// Single-quoted Python string literal.
pub(crate) fn py_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Python tuple literal; a single element keeps its trailing comma.
pub(crate) fn py_tuple<T: std::fmt::Display>(items: &[T]) -> String {
    match items {
        [one] => format!("({one},)"),
        _ => {
            let inner: Vec<String> = items.iter().map(|i| i.to_string()).collect();
            format!("({})", inner.join(", "))
        }
    }
}

/// `(v, v, ...)` with `n` copies, for square kernels and windows.
pub(crate) fn repeat_tuple(v: u32, n: usize) -> String {
    py_tuple(&vec![v; n])
}

/// Indents every non-empty line of `text` by `spaces`.
pub(crate) fn indent(text: &str, spaces: usize) -> String {
    let pad = " ".repeat(spaces);
    text.lines()
        .map(|l| {
            if l.is_empty() {
                String::new()
            } else {
                format!("{pad}{l}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replaces line breaks with spaces so user text stays inside a `#` comment.
pub(crate) fn one_line(s: &str) -> String {
    s.replace(|c: char| c == '\n' || c == '\r', " ")
}

/// Array-level scaling for an input's preprocessing, valid for both torch
/// tensors and jax arrays. `normalize` maps 8-bit pixel values to `[0, 1]`;
/// `standardize` centres each batch.
pub(crate) fn input_scaling(preprocessing: Option<Preprocessing>) -> Option<&'static str> {
    match preprocessing? {
        Preprocessing::Normalize => Some("x = x / 255.0"),
        Preprocessing::Standardize => Some("x = (x - x.mean()) / (x.std() + 1e-7)"),
        Preprocessing::Passthrough => None,
    }
}

/// Comment banner naming the project, placed at the top of every artifact.
///
/// Dataset resize and normalisation settings, when recorded, are listed
/// after the title; the generated code expects data prepared that way.
pub(crate) fn banner(config: &NetworkConfig, title: &str) -> String {
    let mut out = format!(
        "# {}\n# {title} ({}, {} data)\n",
        one_line(&config.project.name),
        config.project.task_type,
        config.project.data_type
    );
    if let Some(pre) = &config.preprocessing {
        if let Some(r) = &pre.resize {
            let size = match (r.width, r.height) {
                (Some(w), Some(h)) => format!(" to {w}x{h}"),
                _ => String::new(),
            };
            out.push_str(&format!("# Dataset: resize {}{size}\n", r.strategy));
        }
        if let Some(n) = &pre.normalize {
            let mut line = format!("# Dataset: normalize {}", n.method);
            if let Some(mean) = &n.mean {
                line.push_str(&format!(" mean={}", py_list(mean)));
            }
            if let Some(std) = &n.std {
                line.push_str(&format!(" std={}", py_list(std)));
            }
            out.push_str(&line);
            out.push('\n');
        }
    }
    out.push('\n');
    out
}

fn py_list(values: &[f64]) -> String {
    let items: Vec<String> = values.iter().map(|v| py_float(*v)).collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use network_ir::{
        NormalizeConfig, NormalizeMethod, PreprocessingConfig, ResizeConfig, ResizeStrategy,
    };

    #[test]
    fn test_literals() {
        assert_eq!(py_bool(true), "True");
        assert_eq!(py_float(0.001), "0.001");
        assert_eq!(py_float(0.5), "0.5");
        assert_eq!(py_float(f64::NAN), "float('nan')");
        assert_eq!(py_str("it's"), r"'it\'s'");
        assert_eq!(py_tuple(&[4u32]), "(4,)");
        assert_eq!(py_tuple(&[28u32, 28, 1]), "(28, 28, 1)");
        assert_eq!(repeat_tuple(3, 2), "(3, 3)");
    }

    #[test]
    fn test_input_scaling() {
        assert_eq!(input_scaling(None), None);
        assert_eq!(input_scaling(Some(Preprocessing::Passthrough)), None);
        assert_eq!(input_scaling(Some(Preprocessing::Normalize)), Some("x = x / 255.0"));
        assert!(input_scaling(Some(Preprocessing::Standardize))
            .unwrap()
            .contains("x.std()"));
    }

    #[test]
    fn test_indent_skips_blank_lines() {
        assert_eq!(indent("a\n\nb", 4), "    a\n\n    b");
    }

    #[test]
    fn test_banner_flattens_newlines() {
        let cfg = NetworkConfig::new("two\nlines");
        assert!(banner(&cfg, "Keras model").starts_with("# two lines\n"));
        assert_eq!(one_line("a\r\nb\nc"), "a  b c");
    }

    #[test]
    fn test_banner_lists_dataset_preprocessing() {
        let mut cfg = NetworkConfig::new("p");
        assert_eq!(banner(&cfg, "t").lines().count(), 2);

        cfg.preprocessing = Some(PreprocessingConfig {
            resize: Some(ResizeConfig {
                strategy: ResizeStrategy::Fixed,
                width: Some(224),
                height: Some(224),
            }),
            normalize: Some(NormalizeConfig {
                method: NormalizeMethod::Imagenet,
                mean: Some(vec![0.485, 0.456, 0.406]),
                std: None,
            }),
            ..PreprocessingConfig::default()
        });
        let b = banner(&cfg, "t");
        assert!(b.contains("# Dataset: resize fixed to 224x224\n"));
        assert!(b.contains("# Dataset: normalize imagenet mean=[0.485, 0.456, 0.406]\n"));
        assert!(b.lines().all(|l| l.is_empty() || l.starts_with('#')));
    }
}
