// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Export sink: turns generated text into named artifacts and writes them.
//!
//! # Artifact naming
//! - generated code: `neural_network_<tag>.<ext>` (`.py`, or `.txt` for ONNX)
//! - network config: `network_config.json`

use crate::config::ExportConfig;
use crate::{generate_for, CodegenError, Target};
use network_ir::NetworkConfig;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "network_config.json";

/// A named, typed blob ready to be written or offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub contents: String,
}

impl ExportArtifact {
    /// Writes the artifact into `dir`, creating the directory if needed.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, CodegenError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.contents)?;
        tracing::debug!("wrote {} ({} bytes)", path.display(), self.contents.len());
        Ok(path)
    }
}

/// Wraps generated code for `target` as a plain-text artifact.
pub fn materialize(text: impl Into<String>, target: Target) -> ExportArtifact {
    ExportArtifact {
        file_name: format!("neural_network_{}.{}", target.as_str(), target.extension()),
        mime_type: "text/plain",
        contents: text.into(),
    }
}

/// Wraps the network config itself as pretty-printed JSON.
pub fn materialize_config(config: &NetworkConfig) -> Result<ExportArtifact, CodegenError> {
    Ok(ExportArtifact {
        file_name: CONFIG_FILE_NAME.to_string(),
        mime_type: "application/json",
        contents: serde_json::to_string_pretty(config)?,
    })
}

/// Generates every configured target and writes the artifacts to
/// `export.output_dir`, returning the written paths in target order.
///
/// With `overwrite = false` an existing file fails the export before
/// anything is written.
pub fn export(config: &NetworkConfig, export: &ExportConfig) -> Result<Vec<PathBuf>, CodegenError> {
    let targets = export.resolve_targets()?;

    let mut artifacts: Vec<ExportArtifact> = targets
        .iter()
        .map(|&t| materialize(generate_for(config, t), t))
        .collect();
    if export.include_config_json {
        artifacts.push(materialize_config(config)?);
    }

    if !export.overwrite {
        if let Some(clash) = artifacts
            .iter()
            .map(|a| export.output_dir.join(&a.file_name))
            .find(|p| p.exists())
        {
            tracing::warn!("refusing to overwrite {}", clash.display());
            return Err(CodegenError::Io(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("'{}' already exists", clash.display()),
            )));
        }
    }

    let paths = artifacts
        .iter()
        .map(|a| a.write_to(&export.output_dir))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::info!(
        "exported {} artifact(s) to {}",
        paths.len(),
        export.output_dir.display()
    );
    Ok(paths)
}
