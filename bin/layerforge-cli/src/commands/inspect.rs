// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `layerforge inspect` command: display a network and validate it.
//!
//! The layer table is printed even when validation fails, so the broken
//! layer can be located; the command then exits with the validation error.

use super::{load_network, truncate};
use network_ir::NetworkConfig;
use std::fmt::Write;
use std::path::PathBuf;

pub fn execute(network: PathBuf) -> anyhow::Result<()> {
    let config = load_network(&network)?;

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║             layerforge · Network Inspector           ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
    print!("{}", render(&config));

    match config.validate() {
        Ok(()) => {
            println!("  Validation: OK");
            Ok(())
        }
        Err(e) => {
            println!("  Validation: FAILED");
            Err(anyhow::anyhow!("'{}' is not a valid network: {e}", network.display()))
        }
    }
}

fn render(config: &NetworkConfig) -> String {
    let hp = &config.hyperparameters;
    let mut out = String::new();

    // ── Summary ────────────────────────────────────────────────
    let _ = writeln!(out, "  Project: {}", config.project.name);
    let _ = writeln!(
        out,
        "  Task:    {} ({} data)",
        config.project.task_type, config.project.data_type
    );
    let _ = writeln!(out, "  Layers:  {}", config.layer_count());
    let _ = writeln!(
        out,
        "  Train:   {} lr={} loss={} batch={} epochs={}",
        hp.optimizer, hp.learning_rate, hp.loss, hp.batch_size, hp.epochs
    );
    out.push('\n');

    // ── Per-Layer Detail ───────────────────────────────────────
    if config.is_empty() {
        let _ = writeln!(out, "  (no layers)\n");
        return out;
    }
    let _ = writeln!(
        out,
        "  {:<4} {:<14} {:<20} {:<38} {}",
        "Idx", "Type", "Name", "Parameters", "Id"
    );
    let _ = writeln!(out, "  {}", "-".repeat(100));
    for (i, layer) in config.layers.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:<4} {:<14} {:<20} {:<38} {}",
            i,
            layer.layer_type().as_str(),
            truncate(layer.name.as_deref().unwrap_or("-"), 20),
            truncate(&layer.kind.describe_params(), 38),
            layer.id,
        );
    }
    out.push('\n');
    out
}
