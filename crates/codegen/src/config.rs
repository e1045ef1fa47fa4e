// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Export configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! output_dir = "./generated"
//! targets = ["pytorch", "keras"]
//! overwrite = false
//! include_config_json = true
//! ```

use crate::{CodegenError, Target};
use std::path::{Path, PathBuf};

/// Where and what to export.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExportConfig {
    /// Directory artifacts are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Target tags: `"pytorch"`, `"keras"`, `"tensorflow"`, `"jax"`, `"onnx"`.
    #[serde(default = "default_targets")]
    pub targets: Vec<String>,
    /// Whether existing files may be replaced.
    #[serde(default = "default_true")]
    pub overwrite: bool,
    /// Also write the network itself as `network_config.json`.
    #[serde(default)]
    pub include_config_json: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./generated")
}

fn default_targets() -> Vec<String> {
    Target::ALL.iter().map(|t| t.as_str().to_string()).collect()
}

fn default_true() -> bool {
    true
}

impl ExportConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, CodegenError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CodegenError::ConfigError(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, CodegenError> {
        toml::from_str(toml_str)
            .map_err(|e| CodegenError::ConfigError(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, CodegenError> {
        toml::to_string_pretty(self)
            .map_err(|e| CodegenError::ConfigError(format!("TOML serialise error: {e}")))
    }

    /// Parses the target tags, dropping duplicates and keeping first-seen order.
    pub fn resolve_targets(&self) -> Result<Vec<Target>, CodegenError> {
        if self.targets.is_empty() {
            return Err(CodegenError::ConfigError(
                "no export targets configured".into(),
            ));
        }
        let mut out = Vec::with_capacity(self.targets.len());
        for tag in &self.targets {
            let t: Target = tag.parse()?;
            if out.contains(&t) {
                tracing::warn!("duplicate export target '{tag}' ignored");
            } else {
                out.push(t);
            }
        }
        Ok(out)
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            targets: default_targets(),
            overwrite: true,
            include_config_json: false,
        }
    }
}
