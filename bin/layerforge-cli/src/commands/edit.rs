// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `layerforge edit` command: apply one edit to a persisted session.
//!
//! The session file holds the network together with its full undo
//! history, so `undo` and `redo` work across invocations. A missing file
//! starts a fresh session. Layers are addressed by id or by index.

use anyhow::{bail, Context};
use clap::Subcommand;
use editor::EditorSession;
use network_ir::{LayerId, LayerPatch, LayerType};
use std::path::{Path, PathBuf};

#[derive(Debug, Subcommand)]
pub enum EditOp {
    /// Append a layer with default parameters.
    Add {
        /// Layer type, e.g. dense, conv2d, lstm.
        layer_type: String,

        /// Optional display name.
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Change fields of a layer, e.g. `set 2 '{"units": 64}'`.
    Set {
        layer: String,
        /// JSON object of wire-format field names to new values.
        patch: String,
    },
    /// Remove a layer.
    Delete { layer: String },
    /// Insert a copy of a layer right after it.
    Duplicate { layer: String },
    /// Move the layer at one index to another.
    Move { from: usize, to: usize },
    /// Revert the last edit.
    Undo,
    /// Re-apply the last reverted edit.
    Redo,
    /// Print the session without changing it.
    Show,
}

pub fn execute(path: PathBuf, op: EditOp) -> anyhow::Result<()> {
    let mut session = open(&path)?;
    let message = apply(&mut session, op)?;
    session
        .save(&path)
        .with_context(|| format!("cannot save session '{}'", path.display()))?;

    println!("{message}");
    println!(
        "{} (history {}/{})",
        session.config().summary(),
        session.history().index() + 1,
        session.history().len()
    );
    Ok(())
}

fn open(path: &Path) -> anyhow::Result<EditorSession> {
    if path.exists() {
        EditorSession::load(path)
            .with_context(|| format!("cannot load session '{}'", path.display()))
    } else {
        tracing::info!("starting new session at {}", path.display());
        Ok(EditorSession::new())
    }
}

/// Finds a layer by id, falling back to a position index.
fn resolve(session: &EditorSession, layer: &str) -> anyhow::Result<LayerId> {
    let config = session.config();
    let by_id = LayerId::from(layer);
    if config.layer(&by_id).is_some() {
        return Ok(by_id);
    }
    if let Ok(index) = layer.parse::<usize>() {
        if let Some(spec) = config.layers.get(index) {
            return Ok(spec.id.clone());
        }
    }
    bail!("no layer '{layer}' in the network")
}

fn apply(session: &mut EditorSession, op: EditOp) -> anyhow::Result<String> {
    let message = match op {
        EditOp::Add { layer_type, name } => {
            let Some(t) = LayerType::from_str_loose(&layer_type) else {
                bail!("unknown layer type '{layer_type}'; run `layerforge layers` for the list");
            };
            let mut spec = network_ir::registry::instantiate(t);
            if let Some(name) = name {
                spec = spec.with_name(name);
            }
            let id = session.add_layer(spec);
            format!("Added {t} layer {id}")
        }
        EditOp::Set { layer, patch } => {
            let id = resolve(session, &layer)?;
            let patch = LayerPatch::from_json(&patch).context("patch must be a JSON object")?;
            if session.update_layer(&id, &patch)? {
                format!("Updated {id}")
            } else {
                format!("No change to {id}")
            }
        }
        EditOp::Delete { layer } => {
            let id = resolve(session, &layer)?;
            session.delete_layer(&id);
            format!("Deleted {id}")
        }
        EditOp::Duplicate { layer } => {
            let id = resolve(session, &layer)?;
            match session.duplicate_layer(&id) {
                Some(copy) => format!("Duplicated {id} as {copy}"),
                None => bail!("no layer '{layer}' in the network"),
            }
        }
        EditOp::Move { from, to } => {
            if session.reorder_layers(from, to)? {
                format!("Moved layer {from} to {to}")
            } else {
                "No change".to_string()
            }
        }
        EditOp::Undo => {
            if session.undo() {
                "Undone".to_string()
            } else {
                "Nothing to undo".to_string()
            }
        }
        EditOp::Redo => {
            if session.redo() {
                "Redone".to_string()
            } else {
                "Nothing to redo".to_string()
            }
        }
        EditOp::Show => {
            let layers: Vec<String> = session
                .config()
                .layers
                .iter()
                .enumerate()
                .map(|(i, l)| format!("  [{i}] {} {}", l.id, l.summary()))
                .collect();
            if layers.is_empty() {
                "  (no layers)".to_string()
            } else {
                layers.join("\n")
            }
        }
    };
    tracing::debug!("edit result: {message}");
    Ok(message)
}
