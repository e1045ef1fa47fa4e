// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # layerforge
//!
//! Command-line interface for building network architectures and
//! exporting framework code.
//!
//! ## Usage
//! ```bash
//! # Start a network and a persisted editing session
//! layerforge edit --session mnist.session.json add input
//! layerforge edit --session mnist.session.json add dense --name hidden
//! layerforge edit --session mnist.session.json undo
//!
//! # Browse the layer palette
//! layerforge layers --search conv
//!
//! # Generate code for every framework, or a chosen few
//! layerforge generate --network mnist.json
//! layerforge generate --network mnist.json --target pytorch --target jax
//! ```

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "layerforge",
    about = "Design neural network architectures and export PyTorch, Keras, TensorFlow, JAX and ONNX code",
    version,
    author
)]
struct Cli {
    /// Path to a TOML export configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write an empty network with default hyperparameters.
    New {
        /// Destination JSON file.
        #[arg(short, long)]
        output: PathBuf,

        /// Project name.
        #[arg(short, long, default_value = "Untitled Project")]
        name: String,
    },

    /// List the available layer types, grouped by category.
    Layers {
        /// Only show types whose label, description or category match.
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Validate a network and print its layers.
    Inspect {
        /// Network JSON file, or an editor session file.
        #[arg(short, long)]
        network: PathBuf,
    },

    /// Generate framework code for a network.
    Generate {
        /// Network JSON file, or an editor session file.
        #[arg(short, long)]
        network: PathBuf,

        /// Targets to generate (repeatable); overrides the config file.
        #[arg(short, long)]
        target: Vec<String>,

        /// Output directory; overrides the config file.
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Also write the network as network_config.json.
        #[arg(long)]
        with_config: bool,
    },

    /// Apply one edit to a persisted editing session.
    Edit {
        /// Session file; created on first use.
        #[arg(short, long)]
        session: PathBuf,

        #[command(subcommand)]
        op: commands::edit::EditOp,
    },

    /// List the built-in sample datasets.
    Datasets {
        /// Show a single dataset in detail.
        id: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    commands::init_tracing(cli.verbose);

    match cli.command {
        Commands::New { output, name } => commands::new::execute(output, name),
        Commands::Layers { search } => commands::layers::execute(search),
        Commands::Inspect { network } => commands::inspect::execute(network),
        Commands::Generate {
            network,
            target,
            output_dir,
            with_config,
        } => commands::generate::execute(
            network,
            cli.config,
            commands::generate::Overrides {
                targets: target,
                output_dir,
                with_config,
            },
        ),
        Commands::Edit { session, op } => commands::edit::execute(session, op),
        Commands::Datasets { id } => commands::datasets::execute(id),
    }
}
