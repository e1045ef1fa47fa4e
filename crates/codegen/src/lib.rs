// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # codegen
//!
//! Renders a [`network_ir::NetworkConfig`] as training code for five
//! frameworks.
//!
//! - [`Target`] — the closed set of frameworks and their file extensions.
//! - [`Emitter`] — one implementation per target (see [`emitters`]),
//!   selected by [`emitter_for`].
//! - [`symbols`] — per-framework names for optimizers, losses, activations.
//! - [`export`] — turns generated text into named artifacts on disk,
//!   driven by an [`ExportConfig`].
//!
//! # Example
//! ```
//! use codegen::{generate, materialize, Target};
//! use network_ir::{registry, LayerType, NetworkConfig};
//!
//! let mut net = NetworkConfig::new("demo");
//! net.add_layer(registry::instantiate(LayerType::Dense));
//! let code = generate(&net, "keras").unwrap();
//! assert!(code.contains("layers.Dense(128, activation='relu')"));
//! let artifact = materialize(code, Target::Keras);
//! assert_eq!(artifact.file_name, "neural_network_keras.py");
//! ```

pub mod config;
pub mod emitter;
pub mod emitters;
mod error;
pub mod export;
mod python;
pub mod shape;
pub mod symbols;
pub mod target;

pub use config::ExportConfig;
pub use emitter::{emitter_for, generate, generate_for, Emitter, LayerSlot};
pub use error::CodegenError;
pub use export::{export, materialize, materialize_config, ExportArtifact};
pub use shape::layer_slots;
pub use target::Target;
