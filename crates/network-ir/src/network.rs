// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The network configuration: project metadata, ordered layers, and
//! training hyperparameters.
//!
//! [`NetworkConfig`] is the single source of truth that emitters read. Its
//! layer list is the forward-pass order; no other topology is recorded.
//!
//! # Edit operations
//! All edits are plain `&mut self` methods. Each one reports whether the
//! configuration actually changed, so callers that keep an undo history
//! can skip recording no-ops:
//! - [`add_layer`](NetworkConfig::add_layer) always changes the config.
//! - [`update_layer`](NetworkConfig::update_layer) / [`delete_layer`](NetworkConfig::delete_layer) /
//!   [`duplicate_layer`](NetworkConfig::duplicate_layer) are no-ops on unknown ids.
//! - [`reorder_layers`](NetworkConfig::reorder_layers) rejects out-of-range
//!   indices; [`reorder_by_ids`](NetworkConfig::reorder_by_ids) rejects
//!   anything that is not a permutation of the current ids.
//!
//! Failed edits leave the configuration untouched.

use crate::layer::{InputParams, LayerId, LayerKind, LayerPatch, LayerSpec};
use crate::types::{
    DataType, Loss, Metric, MonitorMode, NormalizeMethod, Optimizer, ResizeStrategy, TaskType,
};
use crate::IrError;
use std::collections::HashSet;

// ── Project ────────────────────────────────────────────────────────

/// Descriptive metadata. Never consulted by emitters except for naming.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub task_type: TaskType,
    pub data_type: DataType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Default for ProjectInfo {
    fn default() -> Self {
        Self {
            name: "Untitled Project".into(),
            description: String::new(),
            task_type: TaskType::Classification,
            data_type: DataType::Image,
            created_at: None,
            updated_at: None,
            author: None,
            tags: None,
        }
    }
}

// ── Hyperparameters ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarlyStoppingConfig {
    pub monitor: String,
    pub patience: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_delta: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<MonitorMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restore_best_weights: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReduceLrConfig {
    pub monitor: String,
    pub factor: f64,
    pub patience: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_lr: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<MonitorMode>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelCheckpointConfig {
    pub filepath: String,
    pub monitor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_weights_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_best_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<MonitorMode>,
}

/// Training settings substituted verbatim into generated code.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperParameters {
    pub batch_size: u32,
    pub epochs: u32,
    pub learning_rate: f64,
    pub optimizer: Optimizer,
    pub loss: Loss,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Vec<Metric>>,
    pub validation_split: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shuffle: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub early_stopping: Option<EarlyStoppingConfig>,
    #[serde(
        rename = "reduceLROnPlateau",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub reduce_lr_on_plateau: Option<ReduceLrConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_checkpoint: Option<ModelCheckpointConfig>,
}

impl Default for HyperParameters {
    fn default() -> Self {
        Self {
            batch_size: 32,
            epochs: 10,
            learning_rate: 0.001,
            optimizer: Optimizer::Adam,
            loss: Loss::CategoricalCrossentropy,
            metrics: None,
            validation_split: 0.2,
            shuffle: None,
            early_stopping: None,
            reduce_lr_on_plateau: None,
            model_checkpoint: None,
        }
    }
}

impl HyperParameters {
    /// Configured metrics, or `[accuracy]` when none are set.
    pub fn metrics_or_default(&self) -> Vec<Metric> {
        match &self.metrics {
            Some(m) if !m.is_empty() => m.clone(),
            _ => vec![Metric::Accuracy],
        }
    }

    pub fn has_callbacks(&self) -> bool {
        self.early_stopping.is_some()
            || self.reduce_lr_on_plateau.is_some()
            || self.model_checkpoint.is_some()
    }

    /// Checks value ranges.
    ///
    /// # Checks
    /// 1. `batchSize` and `epochs` are positive.
    /// 2. `learningRate` is finite and positive.
    /// 3. `validationSplit` lies in `[0, 1]`.
    pub fn validate(&self) -> Result<(), IrError> {
        if self.batch_size == 0 {
            return Err(IrError::InvalidHyperparameters(
                "batchSize must be positive".into(),
            ));
        }
        if self.epochs == 0 {
            return Err(IrError::InvalidHyperparameters(
                "epochs must be positive".into(),
            ));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(IrError::InvalidHyperparameters(format!(
                "learningRate must be a positive finite number, got {}",
                self.learning_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.validation_split) {
            return Err(IrError::InvalidHyperparameters(format!(
                "validationSplit must be in [0, 1], got {}",
                self.validation_split
            )));
        }
        Ok(())
    }
}

// ── Dataset Pipeline ───────────────────────────────────────────────

/// Dataset preparation settings recorded alongside the network.
///
/// Emitters only consult [`normalize`](Self::normalize) and
/// [`resize`](Self::resize); the rest is carried for the editor.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreprocessingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resize: Option<ResizeConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalize: Option<NormalizeConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub augmentation: Option<AugmentationConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split: Option<DataSplitConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shuffle: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeConfig {
    pub strategy: ResizeStrategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizeConfig {
    pub method: NormalizeMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub std: Option<Vec<f64>>,
}

/// Augmentations toggled on for training. Absent means off.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AugmentationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flip: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shear: Option<bool>,
}

/// Train/validation/test fractions.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DataSplitConfig {
    pub train: f64,
    pub validation: f64,
    pub test: f64,
}

/// Derived statistics cached by the editor. Never read back as input.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkMetadata {
    #[serde(default)]
    pub total_layers: u64,
    #[serde(default)]
    pub total_parameters: u64,
    #[serde(default)]
    pub trainable_parameters: u64,
    #[serde(default)]
    pub non_trainable_parameters: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_shape: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_shape: Option<Vec<u64>>,
    /// Megabytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_memory: Option<f64>,
    #[serde(default, rename = "estimatedFLOPs", skip_serializing_if = "Option::is_none")]
    pub estimated_flops: Option<f64>,
}

// ── NetworkConfig ──────────────────────────────────────────────────

/// A complete network: what the user edits and what emitters consume.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NetworkConfig {
    pub project: ProjectInfo,
    #[serde(default)]
    pub layers: Vec<LayerSpec>,
    pub hyperparameters: HyperParameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preprocessing: Option<PreprocessingConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<NetworkMetadata>,
}

impl NetworkConfig {
    /// Creates an empty network with default hyperparameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            project: ProjectInfo {
                name: name.into(),
                ..ProjectInfo::default()
            },
            ..Self::default()
        }
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Looks up a layer by id.
    pub fn layer(&self, id: &LayerId) -> Option<&LayerSpec> {
        self.layers.iter().find(|l| &l.id == id)
    }

    /// Position of a layer in the forward sequence.
    pub fn position(&self, id: &LayerId) -> Option<usize> {
        self.layers.iter().position(|l| &l.id == id)
    }

    /// Parameters of the first input layer, if any.
    pub fn input(&self) -> Option<&InputParams> {
        self.layers.iter().find_map(|l| match &l.kind {
            LayerKind::Input(p) => Some(p),
            _ => None,
        })
    }

    pub fn ids(&self) -> Vec<LayerId> {
        self.layers.iter().map(|l| l.id.clone()).collect()
    }

    /// Appends a layer at the end of the sequence.
    pub fn add_layer(&mut self, layer: LayerSpec) {
        tracing::debug!("adding layer {}", layer.summary());
        self.layers.push(layer);
    }

    /// Merges `patch` into the layer with the given id.
    ///
    /// Returns `Ok(false)` if no layer has that id or the patch changes
    /// nothing. On error the layer is left as it was.
    pub fn update_layer(&mut self, id: &LayerId, patch: &LayerPatch) -> Result<bool, IrError> {
        let Some(slot) = self.layers.iter_mut().find(|l| &l.id == id) else {
            tracing::debug!("update on unknown layer '{id}' ignored");
            return Ok(false);
        };
        let merged = slot.patched(patch).map_err(|e| {
            tracing::warn!("rejected patch for layer '{id}': {e}");
            e
        })?;
        if merged == *slot {
            return Ok(false);
        }
        tracing::debug!("updated layer {}", merged.summary());
        *slot = merged;
        Ok(true)
    }

    /// Removes the first layer with the given id. Returns whether one was removed.
    pub fn delete_layer(&mut self, id: &LayerId) -> bool {
        match self.position(id) {
            Some(pos) => {
                let removed = self.layers.remove(pos);
                tracing::debug!("deleted layer {}", removed.summary());
                true
            }
            None => false,
        }
    }

    /// Inserts a copy of the layer right after it.
    ///
    /// The copy gets a fresh id and, if the original is named, the name
    /// with a `_copy` suffix. Returns the new id.
    pub fn duplicate_layer(&mut self, id: &LayerId) -> Option<LayerId> {
        let pos = self.position(id)?;
        let mut copy = self.layers[pos].clone();
        copy.id = LayerId::generate();
        if let Some(name) = &mut copy.name {
            name.push_str("_copy");
        }
        let new_id = copy.id.clone();
        tracing::debug!("duplicated layer '{id}' as '{new_id}'");
        self.layers.insert(pos + 1, copy);
        Some(new_id)
    }

    /// Moves the layer at `from` so that it ends up at index `to`.
    ///
    /// Both indices must be in range. Returns whether the order changed.
    pub fn reorder_layers(&mut self, from: usize, to: usize) -> Result<bool, IrError> {
        let len = self.layers.len();
        for index in [from, to] {
            if index >= len {
                return Err(IrError::IndexOutOfBounds { index, len });
            }
        }
        if from == to {
            return Ok(false);
        }
        let layer = self.layers.remove(from);
        self.layers.insert(to, layer);
        tracing::debug!("moved layer {from} -> {to}");
        Ok(true)
    }

    /// Replaces the order with `order`, which must be a permutation of the
    /// current layer ids. Returns whether the order changed.
    pub fn reorder_by_ids(&mut self, order: &[LayerId]) -> Result<bool, IrError> {
        if order.len() != self.layers.len() {
            return Err(IrError::InvalidPermutation(format!(
                "expected {} ids, got {}",
                self.layers.len(),
                order.len()
            )));
        }
        let mut seen = HashSet::with_capacity(order.len());
        for id in order {
            if !seen.insert(id) {
                return Err(IrError::InvalidPermutation(format!("duplicate id '{id}'")));
            }
            if self.position(id).is_none() {
                return Err(IrError::InvalidPermutation(format!("unknown id '{id}'")));
            }
        }
        if self.layers.iter().map(|l| &l.id).eq(order.iter()) {
            return Ok(false);
        }

        let mut remaining = std::mem::take(&mut self.layers);
        for id in order {
            if let Some(pos) = remaining.iter().position(|l| &l.id == id) {
                self.layers.push(remaining.swap_remove(pos));
            }
        }
        tracing::debug!("reordered {} layers by id", self.layers.len());
        Ok(true)
    }

    /// Validates hyperparameters, id uniqueness, and every layer.
    ///
    /// # Checks
    /// 1. Hyperparameter ranges (see [`HyperParameters::validate`]).
    /// 2. Layer ids are unique.
    /// 3. Each layer's required fields are in range.
    pub fn validate(&self) -> Result<(), IrError> {
        self.hyperparameters.validate()?;

        let mut seen = HashSet::with_capacity(self.layers.len());
        for layer in &self.layers {
            if !seen.insert(&layer.id) {
                return Err(IrError::InvalidLayer {
                    layer: layer.label().to_string(),
                    detail: format!("duplicate layer id '{}'", layer.id),
                });
            }
            layer.validate()?;
        }
        Ok(())
    }

    /// One-line description for logs and CLI output.
    pub fn summary(&self) -> String {
        let hp = &self.hyperparameters;
        format!(
            "'{}' ({}/{}): {} layers, {} lr={}, batch={}, epochs={}",
            self.project.name,
            self.project.task_type,
            self.project.data_type,
            self.layers.len(),
            hp.optimizer,
            hp.learning_rate,
            hp.batch_size,
            hp.epochs,
        )
    }

    pub fn to_json(&self) -> Result<String, IrError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, IrError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, IrError> {
        Ok(serde_json::from_str(json)?)
    }
}
