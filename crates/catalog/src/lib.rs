// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # catalog
//!
//! In-memory stores for datasets and saved models.
//!
//! - [`Catalog`] — records keyed by caller-supplied id with list/get/
//!   create/update/delete.
//! - [`DatasetRecord`] — dataset metadata; [`DatasetRecord::samples`] lists
//!   the built-in sample datasets.
//! - [`ModelRecord`] — a named [`network_ir::NetworkConfig`].
//!
//! # Example
//! ```
//! use catalog::{Catalog, DatasetRecord};
//!
//! let mut datasets = Catalog::new();
//! for d in DatasetRecord::samples() {
//!     datasets.create(d).unwrap();
//! }
//! assert_eq!(datasets.get("iris").unwrap().stats.num_classes, 3);
//! ```

mod error;
mod records;
mod store;

pub use error::CatalogError;
pub use records::{DatasetRecord, DatasetStats, DatasetType, ModelRecord};
pub use store::{Catalog, CatalogEntry};
