// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Linear undo/redo history of whole-config snapshots.
//!
//! The history is a list of deep copies plus a cursor. Recording after an
//! undo discards the redo tail, so the timeline never branches.
//!
//! # Invariants
//! - There is always at least one snapshot.
//! - `0 <= index < len`.
//! - Snapshots are owned copies; mutating the live config never changes them.

use crate::EditorError;
use network_ir::NetworkConfig;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct History {
    snapshots: Vec<NetworkConfig>,
    #[serde(rename = "historyIndex")]
    index: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(NetworkConfig::default())
    }
}

impl History {
    /// Starts a history whose only snapshot is `initial`.
    pub fn new(initial: NetworkConfig) -> Self {
        Self {
            snapshots: vec![initial],
            index: 0,
        }
    }

    /// Rebuilds a history from persisted parts, checking its invariants.
    pub fn from_parts(snapshots: Vec<NetworkConfig>, index: usize) -> Result<Self, EditorError> {
        let history = Self { snapshots, index };
        history.validate()?;
        Ok(history)
    }

    /// Checks the cursor and non-emptiness invariants.
    pub(crate) fn validate(&self) -> Result<(), EditorError> {
        if self.snapshots.is_empty() {
            return Err(EditorError::CorruptHistory("history has no snapshots".into()));
        }
        if self.index >= self.snapshots.len() {
            return Err(EditorError::CorruptHistory(format!(
                "history index {} out of range for {} snapshots",
                self.index,
                self.snapshots.len()
            )));
        }
        Ok(())
    }

    /// Appends a copy of `config`, discarding anything after the cursor.
    pub fn record(&mut self, config: &NetworkConfig) {
        let dropped = self.snapshots.len() - (self.index + 1);
        if dropped > 0 {
            tracing::debug!("discarding {dropped} redo snapshot(s)");
        }
        self.snapshots.truncate(self.index + 1);
        self.snapshots.push(config.clone());
        self.index = self.snapshots.len() - 1;
    }

    /// Steps back one snapshot. Returns the new current snapshot, or
    /// `None` if already at the oldest.
    pub fn undo(&mut self) -> Option<&NetworkConfig> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        Some(&self.snapshots[self.index])
    }

    /// Steps forward one snapshot. Returns the new current snapshot, or
    /// `None` if already at the newest.
    pub fn redo(&mut self) -> Option<&NetworkConfig> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        Some(&self.snapshots[self.index])
    }

    pub fn current(&self) -> &NetworkConfig {
        &self.snapshots[self.index]
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Cursor position.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Drops everything and starts over from `initial`.
    pub fn reset(&mut self, initial: NetworkConfig) {
        *self = Self::new(initial);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> NetworkConfig {
        NetworkConfig::new(name)
    }

    #[test]
    fn test_initial_state() {
        let h = History::default();
        assert_eq!(h.len(), 1);
        assert_eq!(h.index(), 0);
        assert!(!h.can_undo());
        assert!(!h.can_redo());
        assert_eq!(h.current(), &NetworkConfig::default());
    }

    #[test]
    fn test_record_advances_cursor() {
        let mut h = History::default();
        h.record(&named("a"));
        h.record(&named("b"));
        assert_eq!(h.len(), 3);
        assert_eq!(h.index(), 2);
        assert_eq!(h.current().project.name, "b");
    }

    #[test]
    fn test_undo_redo_bounds() {
        let mut h = History::default();
        assert!(h.undo().is_none());
        assert!(h.redo().is_none());

        h.record(&named("a"));
        assert_eq!(h.undo().unwrap().project.name, "Untitled Project");
        assert!(h.undo().is_none());
        assert_eq!(h.redo().unwrap().project.name, "a");
        assert!(h.redo().is_none());
        assert_eq!(h.index(), 1);
    }

    #[test]
    fn test_undo_then_redo_is_identity() {
        let mut h = History::default();
        h.record(&named("a"));
        h.record(&named("b"));
        let before = h.current().clone();
        h.undo();
        let after = h.redo().unwrap().clone();
        assert_eq!(before, after);
    }

    #[test]
    fn test_record_after_undo_truncates() {
        let mut h = History::default();
        h.record(&named("a"));
        h.record(&named("b"));
        h.undo();
        h.record(&named("c"));
        assert_eq!(h.len(), 3);
        assert!(!h.can_redo());
        assert_eq!(h.current().project.name, "c");
        h.undo();
        assert_eq!(h.current().project.name, "a");
    }

    #[test]
    fn test_snapshots_are_copies() {
        let mut live = named("a");
        let mut h = History::default();
        h.record(&live);
        live.project.name = "mutated".into();
        assert_eq!(h.current().project.name, "a");
    }

    #[test]
    fn test_from_parts_rejects_bad_cursor() {
        assert!(History::from_parts(vec![], 0).is_err());
        assert!(History::from_parts(vec![named("a")], 1).is_err());
        let h = History::from_parts(vec![named("a"), named("b")], 1).unwrap();
        assert_eq!(h.current().project.name, "b");
    }

    #[test]
    fn test_reset() {
        let mut h = History::default();
        h.record(&named("a"));
        h.reset(named("fresh"));
        assert_eq!(h.len(), 1);
        assert_eq!(h.current().project.name, "fresh");
    }

    #[test]
    fn test_serde_uses_history_index() {
        let h = History::default();
        let json = serde_json::to_value(&h).unwrap();
        assert!(json.get("historyIndex").is_some());
        assert!(json.get("snapshots").is_some());
    }
}
