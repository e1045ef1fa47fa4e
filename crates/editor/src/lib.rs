// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # editor
//!
//! Undoable editing on top of [`network_ir::NetworkConfig`].
//!
//! - [`History`] — linear list of snapshots with a cursor.
//! - [`EditorSession`] — owns the live network, its history, and the
//!   current selection; every state-changing edit records one snapshot.
//!
//! There is no global store: callers own their session and pass it where
//! it is needed.
//!
//! # Example
//! ```
//! use editor::EditorSession;
//! use network_ir::LayerType;
//!
//! let mut session = EditorSession::new();
//! session.add_layer_of_type(LayerType::Input);
//! session.add_layer_of_type(LayerType::Dense);
//! session.undo();
//! assert_eq!(session.config().layer_count(), 1);
//! ```

mod error;
mod history;
mod session;

pub use error::EditorError;
pub use history::History;
pub use session::EditorSession;
