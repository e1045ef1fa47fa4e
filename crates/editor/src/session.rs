// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! An editing session: the live network, its history, and the selection.
//!
//! Every edit that changes the network records exactly one snapshot after
//! the change is applied. Edits that turn out to be no-ops (unknown id,
//! moving a layer onto itself, a patch that sets existing values) record
//! nothing, so undo always reverts a visible change.
//!
//! The selected layer is UI state: it is never part of a snapshot, and
//! undo/redo only clear it when the selected layer no longer exists.

use crate::{EditorError, History};
use network_ir::{
    registry, HyperParameters, LayerId, LayerPatch, LayerSpec, LayerType, NetworkConfig,
    ProjectInfo,
};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSession {
    config: NetworkConfig,
    history: History,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selected_layer: Option<LayerId>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    /// Starts a session on the default network.
    pub fn new() -> Self {
        Self::with_config(NetworkConfig::default())
    }

    /// Starts a session on an existing network. The history begins with
    /// that network as its only snapshot.
    pub fn with_config(config: NetworkConfig) -> Self {
        tracing::info!("starting session on {}", config.summary());
        Self {
            history: History::new(config.clone()),
            config,
            selected_layer: None,
        }
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selected_layer(&self) -> Option<&LayerId> {
        self.selected_layer.as_ref()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn commit(&mut self) {
        self.history.record(&self.config);
    }

    // ── Layer edits ────────────────────────────────────────────────

    /// Appends a layer. Returns its id.
    pub fn add_layer(&mut self, layer: LayerSpec) -> LayerId {
        let id = layer.id.clone();
        self.config.add_layer(layer);
        self.commit();
        id
    }

    /// Appends a new layer of the given type with registry defaults.
    pub fn add_layer_of_type(&mut self, layer_type: LayerType) -> LayerId {
        self.add_layer(registry::instantiate(layer_type))
    }

    /// Patches a layer. Returns whether it changed.
    pub fn update_layer(&mut self, id: &LayerId, patch: &LayerPatch) -> Result<bool, EditorError> {
        let changed = self.config.update_layer(id, patch)?;
        if changed {
            self.commit();
        }
        Ok(changed)
    }

    /// Deletes a layer, clearing the selection if it pointed at it.
    pub fn delete_layer(&mut self, id: &LayerId) -> bool {
        if !self.config.delete_layer(id) {
            return false;
        }
        if self.selected_layer.as_ref() == Some(id) {
            self.selected_layer = None;
        }
        self.commit();
        true
    }

    /// Duplicates a layer in place. Returns the copy's id.
    pub fn duplicate_layer(&mut self, id: &LayerId) -> Option<LayerId> {
        let new_id = self.config.duplicate_layer(id)?;
        self.commit();
        Some(new_id)
    }

    pub fn reorder_layers(&mut self, from: usize, to: usize) -> Result<bool, EditorError> {
        let changed = self.config.reorder_layers(from, to)?;
        if changed {
            self.commit();
        }
        Ok(changed)
    }

    pub fn reorder_by_ids(&mut self, order: &[LayerId]) -> Result<bool, EditorError> {
        let changed = self.config.reorder_by_ids(order)?;
        if changed {
            self.commit();
        }
        Ok(changed)
    }

    /// Selects a layer, or clears the selection with `None`.
    ///
    /// Selecting an id that is not in the network leaves the selection
    /// unchanged and returns `false`. Never recorded in the history.
    pub fn select_layer(&mut self, id: Option<&LayerId>) -> bool {
        match id {
            Some(id) if self.config.layer(id).is_none() => {
                tracing::warn!("cannot select unknown layer '{id}'");
                false
            }
            other => {
                self.selected_layer = other.cloned();
                true
            }
        }
    }

    // ── Network-level edits ────────────────────────────────────────

    /// Replaces the hyperparameters after validating them.
    pub fn set_hyperparameters(&mut self, hp: HyperParameters) -> Result<bool, EditorError> {
        hp.validate()?;
        if self.config.hyperparameters == hp {
            return Ok(false);
        }
        self.config.hyperparameters = hp;
        self.commit();
        Ok(true)
    }

    pub fn set_project(&mut self, project: ProjectInfo) -> bool {
        if self.config.project == project {
            return false;
        }
        self.config.project = project;
        self.commit();
        true
    }

    // ── History ────────────────────────────────────────────────────

    /// Restores the previous snapshot. Returns `false` at the oldest one.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.config = snapshot.clone();
                self.drop_stale_selection();
                tracing::debug!("undo -> snapshot {}", self.history.index());
                true
            }
            None => false,
        }
    }

    /// Restores the next snapshot. Returns `false` at the newest one.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.config = snapshot.clone();
                self.drop_stale_selection();
                tracing::debug!("redo -> snapshot {}", self.history.index());
                true
            }
            None => false,
        }
    }

    /// Returns to the default network with a fresh history.
    pub fn reset(&mut self) {
        tracing::info!("resetting session");
        *self = Self::new();
    }

    fn drop_stale_selection(&mut self) {
        if let Some(id) = &self.selected_layer {
            if self.config.layer(id).is_none() {
                self.selected_layer = None;
            }
        }
    }

    // ── Persistence ────────────────────────────────────────────────

    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Restores a session, checking the history invariants.
    ///
    /// # Checks
    /// 1. The history is non-empty and its cursor is in range.
    /// 2. The live network equals the snapshot under the cursor.
    ///
    /// A selection pointing at a missing layer is dropped.
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        let mut session: Self = serde_json::from_str(json)?;
        session.history.validate()?;
        if session.history.current() != &session.config {
            return Err(EditorError::CorruptHistory(
                "live network does not match the current snapshot".into(),
            ));
        }
        if let Some(id) = &session.selected_layer {
            if session.config.layer(id).is_none() {
                tracing::warn!("dropping selection of missing layer '{id}'");
                session.selected_layer = None;
            }
        }
        Ok(session)
    }

    pub fn save(&self, path: &Path) -> Result<(), EditorError> {
        std::fs::write(path, self.to_json()?)?;
        tracing::info!(
            "saved session to {} ({} snapshots)",
            path.display(),
            self.history.len()
        );
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, EditorError> {
        let content = std::fs::read_to_string(path)?;
        let session = Self::from_json(&content)?;
        tracing::info!("loaded session from {}", path.display());
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_adds_two_undos_leave_one_layer() {
        let mut s = EditorSession::new();
        s.add_layer_of_type(LayerType::Input);
        s.add_layer_of_type(LayerType::Dense);
        s.add_layer_of_type(LayerType::Dense);
        assert_eq!(s.history().len(), 4);
        assert_eq!(s.history().index(), 3);

        assert!(s.undo());
        assert!(s.undo());
        assert_eq!(s.config().layer_count(), 1);
        assert_eq!(s.config().layers[0].layer_type(), LayerType::Input);
        assert_eq!(s.history().index(), 1);
        assert!(s.can_redo());
    }

    #[test]
    fn test_every_edit_kind_records_once() {
        let mut s = EditorSession::new();
        let a = s.add_layer_of_type(LayerType::Dense);
        let b = s.add_layer_of_type(LayerType::Dropout);
        assert_eq!(s.history().len(), 3);

        s.update_layer(&a, &LayerPatch::new().set("units", 16)).unwrap();
        assert_eq!(s.history().len(), 4);

        s.duplicate_layer(&a).unwrap();
        assert_eq!(s.history().len(), 5);

        s.reorder_layers(0, 2).unwrap();
        assert_eq!(s.history().len(), 6);

        assert!(s.delete_layer(&b));
        assert_eq!(s.history().len(), 7);

        let mut hp = s.config().hyperparameters.clone();
        hp.epochs = 50;
        assert!(s.set_hyperparameters(hp).unwrap());
        assert_eq!(s.history().len(), 8);

        let mut project = s.config().project.clone();
        project.name = "renamed".into();
        assert!(s.set_project(project));
        assert_eq!(s.history().len(), 9);
        assert_eq!(s.history().current(), s.config());
    }

    #[test]
    fn test_noop_edits_record_nothing() {
        let mut s = EditorSession::new();
        let a = s.add_layer_of_type(LayerType::Dense);
        let ghost = LayerId::from("ghost");
        let len = s.history().len();

        assert!(!s.delete_layer(&ghost));
        assert!(s.duplicate_layer(&ghost).is_none());
        assert!(!s.update_layer(&ghost, &LayerPatch::new().set("units", 1)).unwrap());
        assert!(!s.reorder_layers(0, 0).unwrap());
        assert!(!s.set_project(s.config().project.clone()));
        assert!(!s
            .set_hyperparameters(s.config().hyperparameters.clone())
            .unwrap());
        assert!(!s.reorder_by_ids(&[a]).unwrap());
        assert_eq!(s.history().len(), len);
    }

    #[test]
    fn test_failed_edits_record_nothing() {
        let mut s = EditorSession::new();
        let a = s.add_layer_of_type(LayerType::Dense);
        let before = s.clone();

        assert!(s.reorder_layers(0, 5).is_err());
        assert!(s.update_layer(&a, &LayerPatch::new().set("units", 0)).is_err());
        let mut hp = s.config().hyperparameters.clone();
        hp.batch_size = 0;
        assert!(s.set_hyperparameters(hp).is_err());
        assert_eq!(s, before);
    }

    #[test]
    fn test_undo_redo_inverse() {
        let mut s = EditorSession::new();
        s.add_layer_of_type(LayerType::Conv2d);
        s.add_layer_of_type(LayerType::Flatten);
        let current = s.config().clone();
        assert!(s.undo());
        assert_ne!(s.config(), &current);
        assert!(s.redo());
        assert_eq!(s.config(), &current);
    }

    #[test]
    fn test_edit_after_undo_drops_redo() {
        let mut s = EditorSession::new();
        s.add_layer_of_type(LayerType::Dense);
        s.add_layer_of_type(LayerType::Dense);
        s.undo();
        s.add_layer_of_type(LayerType::Dropout);
        assert!(!s.can_redo());
        assert!(!s.redo());
        assert_eq!(s.history().len(), 3);
        assert_eq!(s.config().layers[1].layer_type(), LayerType::Dropout);
    }

    #[test]
    fn test_undo_at_start_is_noop() {
        let mut s = EditorSession::new();
        assert!(!s.undo());
        assert_eq!(s.config(), &NetworkConfig::default());
    }

    #[test]
    fn test_selection() {
        let mut s = EditorSession::new();
        let a = s.add_layer_of_type(LayerType::Dense);
        let len = s.history().len();

        assert!(s.select_layer(Some(&a)));
        assert_eq!(s.selected_layer(), Some(&a));
        assert!(!s.select_layer(Some(&LayerId::from("ghost"))));
        assert_eq!(s.selected_layer(), Some(&a));
        assert_eq!(s.history().len(), len);

        assert!(s.delete_layer(&a));
        assert!(s.selected_layer().is_none());
    }

    #[test]
    fn test_undo_clears_selection_of_vanished_layer() {
        let mut s = EditorSession::new();
        let a = s.add_layer_of_type(LayerType::Dense);
        s.select_layer(Some(&a));
        s.undo();
        assert!(s.selected_layer().is_none());
    }

    #[test]
    fn test_reset() {
        let mut s = EditorSession::new();
        s.add_layer_of_type(LayerType::Dense);
        s.reset();
        assert_eq!(s, EditorSession::new());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut s = EditorSession::new();
        let a = s.add_layer_of_type(LayerType::Input);
        s.add_layer_of_type(LayerType::Dense);
        s.undo();
        s.select_layer(Some(&a));

        let json = s.to_json().unwrap();
        let back = EditorSession::from_json(&json).unwrap();
        assert_eq!(back, s);
        assert!(back.can_redo());
    }

    #[test]
    fn test_from_json_rejects_bad_cursor() {
        let s = EditorSession::new();
        let mut value = serde_json::to_value(&s).unwrap();
        value["history"]["historyIndex"] = serde_json::json!(5);
        let err = EditorSession::from_json(&value.to_string()).unwrap_err();
        assert!(matches!(err, EditorError::CorruptHistory(_)));
    }

    #[test]
    fn test_from_json_rejects_diverged_config() {
        let s = EditorSession::new();
        let mut value = serde_json::to_value(&s).unwrap();
        value["config"]["project"]["name"] = serde_json::json!("other");
        assert!(matches!(
            EditorSession::from_json(&value.to_string()),
            Err(EditorError::CorruptHistory(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut s = EditorSession::new();
        s.add_layer_of_type(LayerType::Lstm);
        s.save(&path).unwrap();

        let loaded = EditorSession::load(&path).unwrap();
        assert_eq!(loaded, s);
        assert!(EditorSession::load(&dir.path().join("missing.json")).is_err());
    }
}
