// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for IR construction, editing, and validation.

/// Errors that can occur when building or editing a network configuration.
#[derive(Debug, thiserror::Error)]
pub enum IrError {
    /// A layer definition is invalid (e.g., zero units, dropout rate ≥ 1).
    #[error("invalid layer '{layer}': {detail}")]
    InvalidLayer { layer: String, detail: String },

    /// The training hyperparameters are out of range.
    #[error("invalid hyperparameters: {0}")]
    InvalidHyperparameters(String),

    /// A layer kind string did not match any registered kind.
    #[error("unknown layer type '{0}'")]
    UnknownLayerType(String),

    /// An enum string (activation, optimizer, ...) was not recognised.
    #[error("unknown {kind} '{value}'")]
    UnknownValue { kind: &'static str, value: String },

    /// A positional reorder referenced an index past the end of the layer list.
    #[error("layer index {index} out of bounds for {len} layers")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A full-order reorder was not a permutation of the current layer ids.
    #[error("invalid layer permutation: {0}")]
    InvalidPermutation(String),

    /// A field patch could not be applied to a layer.
    #[error("invalid patch for layer '{layer}': {detail}")]
    InvalidPatch { layer: String, detail: String },

    /// The configuration JSON is malformed.
    #[error("failed to parse network config: {0}")]
    Json(#[from] serde_json::Error),
}
