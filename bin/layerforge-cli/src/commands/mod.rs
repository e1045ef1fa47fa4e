// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommand implementations and shared helpers.

pub mod datasets;
pub mod edit;
pub mod generate;
pub mod inspect;
pub mod layers;
pub mod new;

use anyhow::Context;
use editor::EditorSession;
use network_ir::NetworkConfig;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` wins over `-v` when set.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Reads a network from either a plain config file or a saved session.
pub fn load_network(path: &Path) -> anyhow::Result<NetworkConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read '{}'", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("'{}' is not valid JSON", path.display()))?;

    if value.get("history").is_some() {
        let session = EditorSession::from_json(&text)
            .with_context(|| format!("invalid session file '{}'", path.display()))?;
        tracing::debug!("loaded network from session '{}'", path.display());
        return Ok(session.config().clone());
    }
    serde_json::from_value(value)
        .with_context(|| format!("invalid network file '{}'", path.display()))
}

/// Truncates a string to `max_len` characters with an ellipsis.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use network_ir::LayerType;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a_rather_long_layer_name", 10), "a_rathe...");
    }

    #[test]
    fn test_load_network_accepts_both_formats() {
        let tmp = tempfile::tempdir().unwrap();

        let mut session = EditorSession::new();
        session.add_layer_of_type(LayerType::Dense);
        let session_path = tmp.path().join("s.json");
        session.save(&session_path).unwrap();

        let config_path = tmp.path().join("c.json");
        std::fs::write(&config_path, session.config().to_json_pretty().unwrap()).unwrap();

        assert_eq!(load_network(&session_path).unwrap(), *session.config());
        assert_eq!(load_network(&config_path).unwrap(), *session.config());
    }

    #[test]
    fn test_load_network_missing_file() {
        let err = load_network(Path::new("/nonexistent/net.json")).unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }
}
