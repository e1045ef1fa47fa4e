// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! TensorFlow emitter: builds a `layers` list with `append` calls and wraps
//! it in `tf.keras.Sequential`.
//!
//! Layer translation is the Keras table rendered under `tf.keras`. Unlike
//! the Keras emitter, the learning rate is inlined into the optimizer, and
//! a default early-stopping + checkpoint pair is installed when the
//! network configures no callbacks of its own.

use super::keras::{configured_callbacks, fit_call, layer_entries, metrics_list, Entry, TF_KERAS};
use crate::emitter::{Emitter, LayerSlot};
use crate::python::{banner, py_float, py_str};
use crate::shape::layer_slots;
use crate::symbols::keras;
use crate::Target;
use network_ir::NetworkConfig;

#[derive(Debug, Clone, Default)]
pub struct TensorFlowEmitter;

impl TensorFlowEmitter {
    pub fn new() -> Self {
        Self
    }
}

impl Emitter for TensorFlowEmitter {
    fn target(&self) -> Target {
        Target::TensorFlow
    }

    fn render_layer(&self, slot: &LayerSlot<'_>) -> Option<String> {
        let lines: Vec<String> = layer_entries(slot, TF_KERAS)
            .into_iter()
            .map(|entry| match entry {
                Entry::Layer(expr) => format!("layers.append({expr})"),
                comment @ Entry::Comment(_) => comment.as_line(),
            })
            .collect();
        Some(lines.join("\n"))
    }

    fn render_program(&self, config: &NetworkConfig) -> String {
        let hp = &config.hyperparameters;
        let mut out = banner(config, "TensorFlow model");
        out.push_str("import tensorflow as tf\n\n");

        out.push_str("# Build model\nlayers = []\n");
        for slot in &layer_slots(config) {
            if let Some(line) = self.render_layer(slot) {
                tracing::debug!("tensorflow layer {}: {line}", slot.index);
                out.push_str(&line);
                out.push('\n');
            }
        }
        out.push_str("\nmodel = tf.keras.Sequential(layers)\n\n");

        out.push_str("# Compile model\nmodel.compile(\n");
        out.push_str(&format!(
            "    optimizer=tf.keras.optimizers.{}(learning_rate={}),\n",
            keras::optimizer(hp.optimizer),
            py_float(hp.learning_rate)
        ));
        out.push_str(&format!("    loss={},\n", py_str(keras::loss(hp.loss))));
        out.push_str(&format!("    metrics={},\n)\n\n", metrics_list(hp, TF_KERAS)));

        out.push_str("# Training configuration\n");
        out.push_str(&format!("batch_size = {}\n", hp.batch_size));
        out.push_str(&format!("epochs = {}\n\n", hp.epochs));

        let mut callbacks = configured_callbacks(hp, TF_KERAS);
        if callbacks.is_empty() {
            callbacks = vec![
                "tf.keras.callbacks.EarlyStopping(patience=3)".to_string(),
                "tf.keras.callbacks.ModelCheckpoint('best_model.h5', save_best_only=True)"
                    .to_string(),
            ];
        }
        out.push_str("# Train model\n");
        out.push_str(&fit_call(hp, &callbacks));

        out.push_str("\n# Save model\nmodel.save('final_model.h5')\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use network_ir::{registry, EarlyStoppingConfig, LayerType, Optimizer};

    fn render(cfg: &NetworkConfig) -> String {
        TensorFlowEmitter::new().render_program(cfg)
    }

    #[test]
    fn test_layers_list_is_declared() {
        let mut cfg = NetworkConfig::default();
        cfg.add_layer(registry::instantiate(LayerType::Flatten));
        cfg.add_layer(registry::instantiate(LayerType::Dense));
        let out = render(&cfg);
        assert!(out.contains("layers = []\n"));
        assert!(out.contains("layers.append(tf.keras.layers.Flatten())\n"));
        assert!(out.contains("layers.append(tf.keras.layers.Dense(128, activation='relu'))\n"));
        assert!(out.contains("model = tf.keras.Sequential(layers)"));
    }

    #[test]
    fn test_optimizer_inlines_learning_rate() {
        let mut cfg = NetworkConfig::default();
        cfg.hyperparameters.optimizer = Optimizer::Adamax;
        cfg.hyperparameters.learning_rate = 0.002;
        let out = render(&cfg);
        assert!(out.contains("optimizer=tf.keras.optimizers.Adamax(learning_rate=0.002),"));
    }

    #[test]
    fn test_default_callbacks_when_none_configured() {
        let out = render(&NetworkConfig::default());
        assert!(out.contains("tf.keras.callbacks.EarlyStopping(patience=3),"));
        assert!(out.contains(
            "tf.keras.callbacks.ModelCheckpoint('best_model.h5', save_best_only=True),"
        ));
        assert!(out.contains("model.save('final_model.h5')"));
    }

    #[test]
    fn test_configured_callbacks_replace_defaults() {
        let mut cfg = NetworkConfig::default();
        cfg.hyperparameters.early_stopping = Some(EarlyStoppingConfig {
            monitor: "val_loss".into(),
            patience: 7,
            min_delta: Some(0.01),
            mode: None,
            restore_best_weights: None,
        });
        let out = render(&cfg);
        assert!(out.contains(
            "tf.keras.callbacks.EarlyStopping(monitor='val_loss', patience=7, min_delta=0.01),"
        ));
        assert!(!out.contains("best_model.h5"));
    }

    #[test]
    fn test_conv_batch_norm_appends_each_layer() {
        let mut cfg = NetworkConfig::default();
        let mut conv = registry::instantiate(LayerType::Conv2d);
        if let network_ir::LayerKind::Conv2d(p) = &mut conv.kind {
            p.batch_norm = Some(true);
        }
        cfg.add_layer(conv);
        let out = render(&cfg);
        assert!(out.contains(
            "activation='linear'))\nlayers.append(tf.keras.layers.BatchNormalization())\n\
             layers.append(tf.keras.layers.Activation('relu'))\n"
        ));
    }

    #[test]
    fn test_input_uses_tf_namespace() {
        let mut cfg = NetworkConfig::default();
        cfg.add_layer(registry::instantiate(LayerType::Input));
        let out = render(&cfg);
        assert!(out.contains("layers.append(tf.keras.Input(shape=(28, 28, 1)))"));
    }
}
