// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Keras emitter: a `keras.Sequential([...])` list, one layer per line.
//!
//! The layer translation here is shared with the TensorFlow emitter, which
//! renders the same entries under the `tf.keras` namespace. Kinds that a
//! `Sequential` model cannot hold (attention, transformer blocks, residual
//! connections) become comment lines inside the list.

use crate::emitter::{Emitter, LayerSlot};
use crate::python::{banner, one_line, py_bool, py_float, py_str, py_tuple, repeat_tuple};
use crate::shape::layer_slots;
use crate::symbols::keras;
use crate::Target;
use network_ir::{
    Activation, ConvParams, HyperParameters, LayerKind, NetworkConfig, Padding, Preprocessing,
    RecurrentParams, RegularizerConfig, RegularizerKind,
};

// ── Shared translation ─────────────────────────────────────────────

/// Module paths of the Keras API being rendered against.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Dialect {
    /// Package root: `keras` or `tf.keras`.
    pub root: &'static str,
    /// Prefix for layer classes.
    pub layers: &'static str,
}

pub(crate) const KERAS: Dialect = Dialect {
    root: "keras",
    layers: "layers",
};

pub(crate) const TF_KERAS: Dialect = Dialect {
    root: "tf.keras",
    layers: "tf.keras.layers",
};

/// One rendered list entry.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Entry {
    /// A layer constructor expression.
    Layer(String),
    /// Comment text (without the leading `#`) for unsupported kinds.
    Comment(String),
}

impl Entry {
    pub(crate) fn as_line(&self) -> String {
        match self {
            Entry::Layer(expr) => expr.clone(),
            Entry::Comment(text) => format!("# {}", one_line(text)),
        }
    }
}

fn regularizer(r: &RegularizerConfig, d: Dialect) -> String {
    let l1 = py_float(r.l1.unwrap_or(0.01));
    let l2 = py_float(r.l2.unwrap_or(0.01));
    match r.kind {
        RegularizerKind::L1 => format!("{}.regularizers.L1(l1={l1})", d.root),
        RegularizerKind::L2 => format!("{}.regularizers.L2(l2={l2})", d.root),
        RegularizerKind::L1L2 => format!("{}.regularizers.L1L2(l1={l1}, l2={l2})", d.root),
    }
}

fn activation_arg(a: Option<Activation>) -> String {
    format!(
        "activation={}",
        py_str(keras::activation(a.unwrap_or(Activation::Linear)))
    )
}

fn conv_entry(p: &ConvParams, dims: usize, d: Dialect) -> String {
    let mut args = vec![p.filters.to_string(), repeat_tuple(p.kernel_size, dims)];
    if let Some(s) = p.strides {
        args.push(format!("strides={}", repeat_tuple(s, dims)));
    }
    args.push(format!(
        "padding={}",
        py_str(keras::padding(p.padding.unwrap_or(Padding::Valid)))
    ));
    args.push(activation_arg(p.activation));
    if p.use_bias == Some(false) {
        args.push("use_bias=False".into());
    }
    if let Some(init) = &p.kernel_initializer {
        args.push(format!("kernel_initializer={}", py_str(init)));
    }
    if let Some(init) = &p.bias_initializer {
        args.push(format!("bias_initializer={}", py_str(init)));
    }
    if let Some(r) = &p.kernel_regularizer {
        args.push(format!("kernel_regularizer={}", regularizer(r, d)));
    }
    format!("{}.Conv{dims}D({})", d.layers, args.join(", "))
}

fn recurrent_entry(class: &str, p: &RecurrentParams, d: Dialect) -> String {
    let mut args = vec![
        p.units.to_string(),
        format!("return_sequences={}", py_bool(p.returns_sequences())),
    ];
    let flags = [
        ("return_state", p.return_state),
        ("go_backwards", p.go_backwards),
        ("stateful", p.stateful),
    ];
    for (name, value) in flags {
        if let Some(v) = value {
            args.push(format!("{name}={}", py_bool(v)));
        }
    }
    if let Some(r) = p.dropout {
        args.push(format!("dropout={}", py_float(r)));
    }
    if let Some(r) = p.recurrent_dropout {
        args.push(format!("recurrent_dropout={}", py_float(r)));
    }
    if let Some(a) = p.activation {
        args.push(format!("activation={}", py_str(keras::activation(a))));
    }
    if let Some(a) = p.recurrent_activation {
        args.push(format!("recurrent_activation={}", py_str(keras::activation(a))));
    }
    format!("{}.{class}({})", d.layers, args.join(", "))
}

/// Translates one layer into its Keras list entries, in order.
///
/// Most layers map to a single entry. A convolution with `batchNorm` is
/// split into conv, `BatchNormalization` and `Activation`, and an input
/// with preprocessing is followed by the matching scaling layer.
pub(crate) fn layer_entries(slot: &LayerSlot<'_>, d: Dialect) -> Vec<Entry> {
    let l = d.layers;
    match &slot.layer.kind {
        LayerKind::Conv2d(p) | LayerKind::Conv3d(p) if p.has_batch_norm() => {
            let dims = match slot.layer.kind {
                LayerKind::Conv3d(_) => 3,
                _ => 2,
            };
            let linear = ConvParams {
                activation: None,
                ..p.clone()
            };
            let mut entries = vec![
                Entry::Layer(conv_entry(&linear, dims, d)),
                Entry::Layer(format!("{l}.BatchNormalization()")),
            ];
            if let Some(a) = p.activation.filter(|a| *a != Activation::Linear) {
                entries.push(Entry::Layer(format!(
                    "{l}.Activation({})",
                    py_str(keras::activation(a))
                )));
            }
            entries
        }
        LayerKind::Input(p) => {
            let mut entries = vec![layer_entry(slot, d)];
            match p.preprocessing {
                Some(Preprocessing::Normalize) => {
                    entries.push(Entry::Layer(format!("{l}.Rescaling(1.0 / 255)")));
                }
                Some(Preprocessing::Standardize) => {
                    entries.push(Entry::Layer(format!("{l}.Normalization()")));
                    entries.push(Entry::Comment(
                        "call .adapt(x_train) on the Normalization layer before fit".into(),
                    ));
                }
                Some(Preprocessing::Passthrough) | None => {}
            }
            entries
        }
        _ => vec![layer_entry(slot, d)],
    }
}

fn layer_entry(slot: &LayerSlot<'_>, d: Dialect) -> Entry {
    let l = d.layers;
    let entry = match &slot.layer.kind {
        LayerKind::Input(p) => match p.dims() {
            Ok(dims) => {
                let batch = p
                    .batch_size
                    .map(|b| format!(", batch_size={b}"))
                    .unwrap_or_default();
                format!("{}.Input(shape={}{batch})", d.root, py_tuple(&dims))
            }
            Err(e) => return Entry::Comment(format!("input {}: {e}", slot.index)),
        },
        LayerKind::Dense(p) => {
            let mut args = vec![p.units.to_string(), activation_arg(p.activation)];
            if p.use_bias == Some(false) {
                args.push("use_bias=False".into());
            }
            if let Some(init) = &p.kernel_initializer {
                args.push(format!("kernel_initializer={}", py_str(init)));
            }
            if let Some(init) = &p.bias_initializer {
                args.push(format!("bias_initializer={}", py_str(init)));
            }
            if let Some(r) = &p.kernel_regularizer {
                args.push(format!("kernel_regularizer={}", regularizer(r, d)));
            }
            if let Some(r) = &p.activity_regularizer {
                args.push(format!("activity_regularizer={}", regularizer(r, d)));
            }
            format!("{l}.Dense({})", args.join(", "))
        }
        LayerKind::Conv2d(p) => conv_entry(p, 2, d),
        LayerKind::Conv3d(p) => conv_entry(p, 3, d),
        LayerKind::Dropout(p) => {
            let mut args = vec![py_float(p.rate)];
            if let Some(shape) = &p.noise_shape {
                args.push(format!("noise_shape={}", py_tuple(shape)));
            }
            if let Some(seed) = p.seed {
                args.push(format!("seed={seed}"));
            }
            format!("{l}.Dropout({})", args.join(", "))
        }
        LayerKind::Flatten => format!("{l}.Flatten()"),
        LayerKind::Pooling(p) => {
            let mut args = vec![format!("pool_size={}", repeat_tuple(p.pool_size, 2))];
            if let Some(s) = p.strides {
                args.push(format!("strides={}", repeat_tuple(s, 2)));
            }
            if let Some(pad) = p.padding {
                args.push(format!("padding={}", py_str(keras::padding(pad))));
            }
            format!("{l}.{}2D({})", keras::pool(p.pool_type), args.join(", "))
        }
        LayerKind::BatchNorm(p) => {
            let mut args = Vec::new();
            if let Some(m) = p.momentum {
                args.push(format!("momentum={}", py_float(m)));
            }
            if let Some(e) = p.epsilon {
                args.push(format!("epsilon={}", py_float(e)));
            }
            if let Some(c) = p.center {
                args.push(format!("center={}", py_bool(c)));
            }
            if let Some(s) = p.scale {
                args.push(format!("scale={}", py_bool(s)));
            }
            format!("{l}.BatchNormalization({})", args.join(", "))
        }
        LayerKind::Lstm(p) => recurrent_entry("LSTM", p, d),
        LayerKind::Gru(p) => recurrent_entry("GRU", p, d),
        LayerKind::Embedding(p) => {
            let length = p
                .input_length
                .map(|n| format!(", input_length={n}"))
                .unwrap_or_default();
            format!(
                "{l}.Embedding(input_dim={}, output_dim={}{length})",
                p.input_dim.unwrap_or(10_000),
                p.output_dim.unwrap_or(128),
            )
        }
        LayerKind::Transformer(p) => {
            let encoding = if p.use_positional_encoding == Some(true) {
                ", adding a positional encoding to its input"
            } else {
                ""
            };
            return Entry::Comment(format!(
                "transformer block {} (heads={}, key_dim={}, ff_dim={}): build with the functional API \
                 from {l}.MultiHeadAttention, {l}.LayerNormalization and {l}.Dense{encoding}",
                slot.index, p.heads, p.key_dim, p.ff_dim
            ))
        }
        LayerKind::Attention(p) => {
            return Entry::Comment(format!(
                "attention {}: {l}.MultiHeadAttention(num_heads={}, key_dim={}) takes query and value inputs; \
                 use the functional API",
                slot.index, p.heads, p.key_dim
            ))
        }
        LayerKind::Residual => {
            return Entry::Comment(format!(
                "residual {}: skip connections need the functional API ({l}.Add)",
                slot.index
            ))
        }
        LayerKind::GlobalAvgPool => format!("{l}.GlobalAveragePooling2D()"),
        LayerKind::GlobalMaxPool => format!("{l}.GlobalMaxPooling2D()"),
    };
    Entry::Layer(entry)
}

/// `[...]` list of compiled metrics.
pub(crate) fn metrics_list(hp: &HyperParameters, d: Dialect) -> String {
    let metrics: Vec<String> = hp
        .metrics_or_default()
        .into_iter()
        .map(|m| keras::metric(m, d.root))
        .collect();
    format!("[{}]", metrics.join(", "))
}

/// Callback constructors for the configured callbacks, in a fixed order.
pub(crate) fn configured_callbacks(hp: &HyperParameters, d: Dialect) -> Vec<String> {
    let mut callbacks = Vec::new();
    if let Some(es) = &hp.early_stopping {
        let mut args = vec![
            format!("monitor={}", py_str(&es.monitor)),
            format!("patience={}", es.patience),
        ];
        if let Some(delta) = es.min_delta {
            args.push(format!("min_delta={}", py_float(delta)));
        }
        if let Some(mode) = es.mode {
            args.push(format!("mode={}", py_str(mode.as_str())));
        }
        if let Some(restore) = es.restore_best_weights {
            args.push(format!("restore_best_weights={}", py_bool(restore)));
        }
        callbacks.push(format!("{}.callbacks.EarlyStopping({})", d.root, args.join(", ")));
    }
    if let Some(rl) = &hp.reduce_lr_on_plateau {
        let mut args = vec![
            format!("monitor={}", py_str(&rl.monitor)),
            format!("factor={}", py_float(rl.factor)),
            format!("patience={}", rl.patience),
        ];
        if let Some(min_lr) = rl.min_lr {
            args.push(format!("min_lr={}", py_float(min_lr)));
        }
        if let Some(mode) = rl.mode {
            args.push(format!("mode={}", py_str(mode.as_str())));
        }
        callbacks.push(format!(
            "{}.callbacks.ReduceLROnPlateau({})",
            d.root,
            args.join(", ")
        ));
    }
    if let Some(mc) = &hp.model_checkpoint {
        let mut args = vec![py_str(&mc.filepath), format!("monitor={}", py_str(&mc.monitor))];
        if let Some(w) = mc.save_weights_only {
            args.push(format!("save_weights_only={}", py_bool(w)));
        }
        if let Some(b) = mc.save_best_only {
            args.push(format!("save_best_only={}", py_bool(b)));
        }
        if let Some(mode) = mc.mode {
            args.push(format!("mode={}", py_str(mode.as_str())));
        }
        callbacks.push(format!(
            "{}.callbacks.ModelCheckpoint({})",
            d.root,
            args.join(", ")
        ));
    }
    callbacks
}

/// The `model.fit(...)` call. `callbacks` are already-rendered expressions.
pub(crate) fn fit_call(hp: &HyperParameters, callbacks: &[String]) -> String {
    let mut out = String::from("history = model.fit(\n    x_train, y_train,\n");
    out.push_str("    batch_size=batch_size,\n    epochs=epochs,\n");
    out.push_str(&format!(
        "    validation_split={},\n",
        py_float(hp.validation_split)
    ));
    if let Some(shuffle) = hp.shuffle {
        out.push_str(&format!("    shuffle={},\n", py_bool(shuffle)));
    }
    if !callbacks.is_empty() {
        out.push_str("    callbacks=[\n");
        for cb in callbacks {
            out.push_str(&format!("        {cb},\n"));
        }
        out.push_str("    ],\n");
    }
    out.push_str("    verbose=1,\n)\n");
    out
}

// ── Emitter ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct KerasEmitter;

impl KerasEmitter {
    pub fn new() -> Self {
        Self
    }
}

impl Emitter for KerasEmitter {
    fn target(&self) -> Target {
        Target::Keras
    }

    fn render_layer(&self, slot: &LayerSlot<'_>) -> Option<String> {
        let lines: Vec<String> = layer_entries(slot, KERAS).iter().map(Entry::as_line).collect();
        Some(lines.join("\n"))
    }

    fn render_program(&self, config: &NetworkConfig) -> String {
        let hp = &config.hyperparameters;
        let mut out = banner(config, "Keras model");
        out.push_str(
            "import tensorflow as tf\nfrom tensorflow import keras\nfrom tensorflow.keras import layers\n\n",
        );

        out.push_str("# Define model\nmodel = keras.Sequential([\n");
        for slot in &layer_slots(config) {
            for entry in layer_entries(slot, KERAS) {
                tracing::debug!("keras layer {}: {entry:?}", slot.index);
                match entry {
                    Entry::Layer(expr) => out.push_str(&format!("    {expr},\n")),
                    Entry::Comment(_) => out.push_str(&format!("    {}\n", entry.as_line())),
                }
            }
        }
        out.push_str("])\n\n");

        out.push_str("# Compile model\n");
        out.push_str(&format!("learning_rate = {}\n", py_float(hp.learning_rate)));
        out.push_str("model.compile(\n");
        out.push_str(&format!(
            "    optimizer=keras.optimizers.{}(learning_rate=learning_rate),\n",
            keras::optimizer(hp.optimizer)
        ));
        out.push_str(&format!("    loss={},\n", py_str(keras::loss(hp.loss))));
        out.push_str(&format!("    metrics={},\n)\n\n", metrics_list(hp, KERAS)));
        out.push_str("model.summary()\n\n");

        out.push_str("# Training configuration\n");
        out.push_str(&format!("batch_size = {}\n", hp.batch_size));
        out.push_str(&format!("epochs = {}\n\n", hp.epochs));

        out.push_str("# Train model\n");
        out.push_str(&fit_call(hp, &configured_callbacks(hp, KERAS)));

        out.push_str(
            "\n# Evaluate model\n\
             results = model.evaluate(x_test, y_test, return_dict=True)\n\
             print(results)\n",
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use network_ir::{
        registry, DenseParams, EarlyStoppingConfig, LayerSpec, LayerType, Metric,
        ModelCheckpointConfig, MonitorMode, Optimizer,
    };

    fn dense_128_relu() -> LayerSpec {
        LayerSpec::new(LayerKind::Dense(DenseParams {
            units: 128,
            activation: Some(Activation::Relu),
            use_bias: None,
            kernel_initializer: None,
            bias_initializer: None,
            kernel_regularizer: None,
            activity_regularizer: None,
        }))
    }

    fn render(cfg: &NetworkConfig) -> String {
        KerasEmitter::new().render_program(cfg)
    }

    #[test]
    fn test_single_dense_layer() {
        let mut cfg = NetworkConfig::default();
        cfg.add_layer(dense_128_relu());
        let out = render(&cfg);
        assert!(out.contains("    layers.Dense(128, activation='relu'),\n"));
        let declarations = out.lines().filter(|l| l.trim_start().starts_with("layers.")).count();
        assert_eq!(declarations, 1);
    }

    #[test]
    fn test_input_and_conv() {
        let mut cfg = NetworkConfig::default();
        cfg.add_layer(registry::instantiate(LayerType::Input));
        cfg.add_layer(registry::instantiate(LayerType::Conv2d));
        cfg.add_layer(registry::instantiate(LayerType::Pooling));
        let out = render(&cfg);
        assert!(out.contains("keras.Input(shape=(28, 28, 1)),"));
        assert!(out.contains(
            "layers.Conv2D(32, (3, 3), strides=(1, 1), padding='valid', activation='relu'),"
        ));
        assert!(out.contains("layers.MaxPooling2D(pool_size=(2, 2), strides=(2, 2), padding='valid'),"));
    }

    #[test]
    fn test_recurrent_booleans_are_python() {
        let mut cfg = NetworkConfig::default();
        cfg.add_layer(registry::instantiate(LayerType::Lstm));
        let out = render(&cfg);
        assert!(out.contains("layers.LSTM(64, return_sequences=False"));
        assert!(!out.contains("false"));
    }

    #[test]
    fn test_unsupported_kinds_become_comments() {
        let mut cfg = NetworkConfig::default();
        cfg.add_layer(registry::instantiate(LayerType::Attention));
        cfg.add_layer(registry::instantiate(LayerType::Residual));
        cfg.add_layer(registry::instantiate(LayerType::Dense));
        let out = render(&cfg);
        assert!(out.contains("    # attention 0:"));
        assert!(out.contains("    # residual 1:"));
        // Comments do not swallow the separator of the following entry.
        assert!(out.contains("\n    layers.Dense(128, activation='relu'),\n"));
    }

    #[test]
    fn test_compile_and_fit() {
        let mut cfg = NetworkConfig::default();
        cfg.hyperparameters.optimizer = Optimizer::Sgd;
        cfg.hyperparameters.learning_rate = 0.1;
        cfg.hyperparameters.epochs = 3;
        cfg.hyperparameters.validation_split = 0.1;
        cfg.hyperparameters.metrics = Some(vec![Metric::Accuracy, Metric::Auc]);
        let out = render(&cfg);
        assert!(out.contains("learning_rate = 0.1\n"));
        assert!(out.contains("optimizer=keras.optimizers.SGD(learning_rate=learning_rate)"));
        assert!(out.contains("loss='categorical_crossentropy'"));
        assert!(out.contains("metrics=['accuracy', keras.metrics.AUC()]"));
        assert!(out.contains("epochs = 3\n"));
        assert!(out.contains("validation_split=0.1,"));
        assert!(!out.contains("callbacks=["));
    }

    #[test]
    fn test_configured_callbacks() {
        let mut hp = HyperParameters::default();
        hp.early_stopping = Some(EarlyStoppingConfig {
            monitor: "val_loss".into(),
            patience: 5,
            min_delta: None,
            mode: Some(MonitorMode::Min),
            restore_best_weights: Some(true),
        });
        hp.model_checkpoint = Some(ModelCheckpointConfig {
            filepath: "ckpt.keras".into(),
            monitor: "val_accuracy".into(),
            save_weights_only: None,
            save_best_only: Some(true),
            mode: None,
        });
        let cbs = configured_callbacks(&hp, KERAS);
        assert_eq!(
            cbs,
            vec![
                "keras.callbacks.EarlyStopping(monitor='val_loss', patience=5, mode='min', restore_best_weights=True)".to_string(),
                "keras.callbacks.ModelCheckpoint('ckpt.keras', monitor='val_accuracy', save_best_only=True)".to_string(),
            ]
        );
        let fit = fit_call(&hp, &cbs);
        assert!(fit.contains("    callbacks=[\n        keras.callbacks.EarlyStopping("));
    }

    #[test]
    fn test_conv_batch_norm_splits_activation() {
        let mut cfg = NetworkConfig::default();
        let mut conv = registry::instantiate(LayerType::Conv2d);
        if let LayerKind::Conv2d(p) = &mut conv.kind {
            p.batch_norm = Some(true);
        }
        cfg.add_layer(conv);
        let out = render(&cfg);
        assert!(out.contains(
            "    layers.Conv2D(32, (3, 3), strides=(1, 1), padding='valid', activation='linear'),\n    \
             layers.BatchNormalization(),\n    layers.Activation('relu'),\n"
        ));
    }

    #[test]
    fn test_embedding_length_and_input_preprocessing() {
        let mut cfg = NetworkConfig::default();
        let mut input = registry::instantiate(LayerType::Input);
        if let LayerKind::Input(p) = &mut input.kind {
            p.preprocessing = Some(Preprocessing::Normalize);
        }
        cfg.add_layer(input);
        let mut embed = registry::instantiate(LayerType::Embedding);
        if let LayerKind::Embedding(p) = &mut embed.kind {
            p.input_length = Some(100);
        }
        cfg.add_layer(embed);
        let out = render(&cfg);
        assert!(out.contains("keras.Input(shape=(28, 28, 1)),\n    layers.Rescaling(1.0 / 255),\n"));
        assert!(out.contains("layers.Embedding(input_dim=10000, output_dim=128, input_length=100),"));

        if let LayerKind::Input(p) = &mut cfg.layers[0].kind {
            p.preprocessing = Some(Preprocessing::Standardize);
        }
        let out = render(&cfg);
        assert!(out.contains("    layers.Normalization(),\n    # call .adapt(x_train)"));
    }

    #[test]
    fn test_transformer_comment_mentions_positional_encoding() {
        let mut cfg = NetworkConfig::default();
        cfg.add_layer(registry::instantiate(LayerType::Transformer));
        assert!(render(&cfg).contains("adding a positional encoding to its input"));
        if let LayerKind::Transformer(p) = &mut cfg.layers[0].kind {
            p.use_positional_encoding = None;
        }
        assert!(!render(&cfg).contains("positional encoding"));
    }

    #[test]
    fn test_bad_input_shape_degrades_to_comment() {
        let mut cfg = NetworkConfig::default();
        let mut input = registry::instantiate(LayerType::Input);
        if let LayerKind::Input(p) = &mut input.kind {
            p.shape = "28,x".into();
        }
        cfg.add_layer(input);
        let out = render(&cfg);
        assert!(out.contains("    # input 0:"));
        assert!(!out.contains("keras.Input("));
    }
}
