// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for catalog operations.

/// Errors that can occur when reading or modifying a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// A record is missing a required field or carries an invalid one.
    #[error("invalid record: {0}")]
    ValidationError(String),

    /// No record with this id exists.
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },
}
