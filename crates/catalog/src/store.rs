// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Generic keyed store.
//!
//! # Checks
//! - `create` validates the record and stamps both timestamps.
//! - `update` restores the original id and creation time after the caller's
//!   edit, re-validates, and refreshes `updated_at_ms`. A failed update
//!   leaves the stored record untouched.

use crate::CatalogError;
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// A record that can live in a [`Catalog`].
pub trait CatalogEntry: Clone {
    /// Human-readable record kind used in errors, e.g. `"dataset"`.
    const KIND: &'static str;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    /// Checks required fields.
    fn validate(&self) -> Result<(), CatalogError>;

    fn created_at_ms(&self) -> u64;

    /// Sets both timestamps.
    fn stamp(&mut self, created_at_ms: u64, updated_at_ms: u64);
}

pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// In-memory records keyed by caller-supplied id, listed in id order.
#[derive(Debug, Clone)]
pub struct Catalog<T: CatalogEntry> {
    records: BTreeMap<String, T>,
}

impl<T: CatalogEntry> Default for Catalog<T> {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }
}

impl<T: CatalogEntry> Catalog<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn list(&self) -> Vec<&T> {
        self.records.values().collect()
    }

    pub fn get(&self, id: &str) -> Result<&T, CatalogError> {
        self.records.get(id).ok_or_else(|| not_found::<T>(id))
    }

    /// Validates and stores `record`. An existing record with the same id
    /// is replaced.
    pub fn create(&mut self, mut record: T) -> Result<&T, CatalogError> {
        record.validate()?;
        let now = now_ms();
        record.stamp(now, now);
        let id = record.id().to_string();
        if self.records.insert(id.clone(), record).is_some() {
            tracing::warn!("{} '{id}' replaced", T::KIND);
        } else {
            tracing::debug!("{} '{id}' created", T::KIND);
        }
        self.get(&id)
    }

    /// Applies `edit` to the record with `id`.
    pub fn update<F>(&mut self, id: &str, edit: F) -> Result<&T, CatalogError>
    where
        F: FnOnce(&mut T),
    {
        let current = self.records.get(id).ok_or_else(|| not_found::<T>(id))?;
        let created = current.created_at_ms();
        let mut next = current.clone();
        edit(&mut next);
        next.set_id(id.to_string());
        next.validate()?;
        next.stamp(created, now_ms().max(created));
        tracing::debug!("{} '{id}' updated", T::KIND);
        self.records.insert(id.to_string(), next);
        self.get(id)
    }

    /// Removes and returns the record with `id`.
    pub fn delete(&mut self, id: &str) -> Result<T, CatalogError> {
        let removed = self.records.remove(id).ok_or_else(|| not_found::<T>(id))?;
        tracing::debug!("{} '{id}' deleted", T::KIND);
        Ok(removed)
    }
}

fn not_found<T: CatalogEntry>(id: &str) -> CatalogError {
    CatalogError::NotFound {
        kind: T::KIND,
        id: id.to_string(),
    }
}
