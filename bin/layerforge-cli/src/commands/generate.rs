// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `layerforge generate` command: validate a network and write framework code.
//!
//! Settings come from the `--config` TOML file when given, otherwise from
//! [`ExportConfig::default`]; command-line flags override either.

use super::load_network;
use anyhow::Context;
use codegen::ExportConfig;
use std::path::PathBuf;

/// Command-line settings that take precedence over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub targets: Vec<String>,
    pub output_dir: Option<PathBuf>,
    pub with_config: bool,
}

pub fn execute(
    network: PathBuf,
    config_path: Option<PathBuf>,
    overrides: Overrides,
) -> anyhow::Result<()> {
    let config = load_network(&network)?;
    config
        .validate()
        .with_context(|| format!("'{}' is not a valid network", network.display()))?;

    let export_config = resolve_export_config(config_path, overrides)?;
    let paths = codegen::export(&config, &export_config).context("export failed")?;

    println!("Generated code for {}", config.summary());
    for path in &paths {
        println!("  {}", path.display());
    }
    Ok(())
}

fn resolve_export_config(
    config_path: Option<PathBuf>,
    overrides: Overrides,
) -> anyhow::Result<ExportConfig> {
    let mut export_config = match config_path {
        Some(path) => ExportConfig::from_file(&path)?,
        None => ExportConfig::default(),
    };
    if !overrides.targets.is_empty() {
        export_config.targets = overrides.targets;
    }
    if let Some(dir) = overrides.output_dir {
        export_config.output_dir = dir;
    }
    if overrides.with_config {
        export_config.include_config_json = true;
    }
    tracing::debug!("export settings: {export_config:?}");
    Ok(export_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use network_ir::{registry, LayerType, NetworkConfig};

    fn write_network(dir: &std::path::Path) -> PathBuf {
        let mut cfg = NetworkConfig::new("Digits");
        cfg.add_layer(registry::instantiate(LayerType::Input));
        cfg.add_layer(registry::instantiate(LayerType::Flatten));
        cfg.add_layer(registry::instantiate(LayerType::Dense));
        let path = dir.join("net.json");
        std::fs::write(&path, cfg.to_json_pretty().unwrap()).unwrap();
        path
    }

    #[test]
    fn test_generate_selected_targets() {
        let tmp = tempfile::tempdir().unwrap();
        let network = write_network(tmp.path());
        let out = tmp.path().join("out");
        execute(
            network,
            None,
            Overrides {
                targets: vec!["torch".into(), "onnx".into()],
                output_dir: Some(out.clone()),
                with_config: true,
            },
        )
        .unwrap();
        assert!(out.join("neural_network_pytorch.py").exists());
        assert!(out.join("neural_network_onnx.txt").exists());
        assert!(out.join("network_config.json").exists());
        assert!(!out.join("neural_network_keras.py").exists());
    }

    #[test]
    fn test_config_file_then_flags() {
        let tmp = tempfile::tempdir().unwrap();
        let toml_path = tmp.path().join("export.toml");
        std::fs::write(&toml_path, "targets = [\"jax\"]\noverwrite = false\n").unwrap();

        let c = resolve_export_config(Some(toml_path.clone()), Overrides::default()).unwrap();
        assert_eq!(c.targets, ["jax"]);
        assert!(!c.overwrite);

        let c = resolve_export_config(
            Some(toml_path),
            Overrides {
                targets: vec!["keras".into()],
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(c.targets, ["keras"]);
    }

    #[test]
    fn test_unknown_target_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let network = write_network(tmp.path());
        let err = execute(
            network,
            None,
            Overrides {
                targets: vec!["caffe".into()],
                output_dir: Some(tmp.path().join("out")),
                with_config: false,
            },
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("caffe"));
    }
}
