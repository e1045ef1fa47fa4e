// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for code generation and export.

/// Errors that can occur when generating or exporting code.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    /// The requested target tag is not one of the supported frameworks.
    #[error("unsupported export target '{0}'; expected one of: pytorch, keras, tensorflow, jax, onnx")]
    UnsupportedTarget(String),

    /// Writing an artifact failed.
    #[error("export I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The export configuration is invalid.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Serialising the network config failed.
    #[error("failed to serialise network config: {0}")]
    Json(#[from] serde_json::Error),
}
