// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Minimal feature-width tracking along the forward sequence.
//!
//! This is not shape inference. It only follows the size of the last axis
//! far enough to fill in constructor arguments such as `nn.Linear`'s
//! `in_features`. Whenever the width is unknown, emitters fall back to a
//! lazily-initialised form.
//!
//! # Rules
//! | Layer | Width after |
//! |---|---|
//! | input | last dimension of `shape` |
//! | dense, lstm, gru | `units` |
//! | conv2d, conv3d | `filters` |
//! | embedding | `outputDim` (unchanged if unset) |
//! | flatten | unknown |
//! | everything else | unchanged |

use crate::emitter::LayerSlot;
use network_ir::{LayerKind, LayerSpec, NetworkConfig};

#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureTracker {
    width: Option<u32>,
}

impl FeatureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Width of the activation entering the next layer, if known.
    pub fn width(&self) -> Option<u32> {
        self.width
    }

    /// Updates the width with the effect of `layer`.
    pub fn advance(&mut self, layer: &LayerSpec) {
        match &layer.kind {
            LayerKind::Input(p) => {
                self.width = p.dims().ok().and_then(|d| d.last().copied());
            }
            LayerKind::Dense(p) => self.width = Some(p.units),
            LayerKind::Lstm(p) | LayerKind::Gru(p) => self.width = Some(p.units),
            LayerKind::Conv2d(p) | LayerKind::Conv3d(p) => self.width = Some(p.filters),
            LayerKind::Embedding(p) => {
                if let Some(d) = p.output_dim {
                    self.width = Some(d);
                }
            }
            LayerKind::Flatten => self.width = None,
            LayerKind::Dropout(_)
            | LayerKind::Pooling(_)
            | LayerKind::BatchNorm(_)
            | LayerKind::Transformer(_)
            | LayerKind::Attention(_)
            | LayerKind::Residual
            | LayerKind::GlobalAvgPool
            | LayerKind::GlobalMaxPool => {}
        }
    }
}

/// Pairs every layer with its position and incoming feature width.
pub fn layer_slots(config: &NetworkConfig) -> Vec<LayerSlot<'_>> {
    let mut tracker = FeatureTracker::new();
    config
        .layers
        .iter()
        .enumerate()
        .map(|(index, layer)| {
            let slot = LayerSlot {
                index,
                layer,
                in_features: tracker.width(),
            };
            tracker.advance(layer);
            slot
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use network_ir::{registry, LayerPatch, LayerType};

    fn widths(config: &NetworkConfig) -> Vec<Option<u32>> {
        layer_slots(config).iter().map(|s| s.in_features).collect()
    }

    #[test]
    fn test_width_tracking() {
        let mut cfg = NetworkConfig::default();
        for t in [
            LayerType::Input,
            LayerType::Conv2d,
            LayerType::Pooling,
            LayerType::Flatten,
            LayerType::Dense,
            LayerType::Dropout,
            LayerType::Dense,
        ] {
            cfg.add_layer(registry::instantiate(t));
        }
        assert_eq!(
            widths(&cfg),
            vec![None, Some(1), Some(32), Some(32), None, Some(128), Some(128)]
        );
    }

    #[test]
    fn test_embedding_then_recurrent() {
        let mut cfg = NetworkConfig::default();
        cfg.add_layer(registry::instantiate(LayerType::Embedding));
        cfg.add_layer(registry::instantiate(LayerType::Lstm));
        cfg.add_layer(registry::instantiate(LayerType::Dense));
        assert_eq!(widths(&cfg), vec![None, Some(128), Some(64)]);
    }

    #[test]
    fn test_input_last_dim_and_leading_flatten() {
        let mut cfg = NetworkConfig::default();
        let input = registry::instantiate(LayerType::Input).with_id("in");
        cfg.add_layer(input);
        cfg.update_layer(&"in".into(), &LayerPatch::new().set("shape", "28,28,4"))
            .unwrap();
        cfg.add_layer(registry::instantiate(LayerType::Dense));
        assert_eq!(widths(&cfg)[1], Some(4));

        cfg.layers[0] = registry::instantiate(LayerType::Flatten);
        assert_eq!(widths(&cfg)[1], None);
    }

    #[test]
    fn test_slot_indices_follow_order() {
        let mut cfg = NetworkConfig::default();
        cfg.add_layer(registry::instantiate(LayerType::Dense));
        cfg.add_layer(registry::instantiate(LayerType::Dropout));
        let slots = layer_slots(&cfg);
        assert_eq!(slots[0].index, 0);
        assert_eq!(slots[1].index, 1);
        assert_eq!(slots[1].layer.id, cfg.layers[1].id);
    }
}
