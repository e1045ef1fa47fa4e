// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `layerforge new` command: write an empty network.

use anyhow::Context;
use network_ir::NetworkConfig;
use std::path::PathBuf;

pub fn execute(output: PathBuf, name: String) -> anyhow::Result<()> {
    let config = NetworkConfig::new(name);
    let json = config.to_json_pretty()?;
    std::fs::write(&output, json)
        .with_context(|| format!("cannot write '{}'", output.display()))?;
    tracing::info!("created {}", config.summary());
    println!("Wrote {} to {}", config.summary(), output.display());
    Ok(())
}
