// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for editing sessions and their persistence.

/// Errors that can occur while editing or persisting a session.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// Reading or writing a session file failed.
    #[error("session I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A session file is not valid JSON or has the wrong structure.
    #[error("malformed session file: {0}")]
    Json(#[from] serde_json::Error),

    /// A persisted history violates its invariants (empty, bad cursor, ...).
    #[error("corrupt history: {0}")]
    CorruptHistory(String),

    /// An edit was rejected by the IR.
    #[error(transparent)]
    Ir(#[from] network_ir::IrError),
}
