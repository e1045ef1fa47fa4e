// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! JAX/Flax emitter: an `nn.Module` with a single `@nn.compact __call__`.
//!
//! Flax declares and invokes a submodule in the same statement, so
//! [`render_layer`](Emitter::render_layer) produces the whole call chain
//! for a layer and there is no separate forward step. Training uses optax
//! with a jitted `train_step`.

use crate::emitter::{Emitter, LayerSlot};
use crate::python::{banner, indent, input_scaling, py_bool, py_float, py_tuple, repeat_tuple};
use crate::shape::layer_slots;
use crate::symbols::jax;
use crate::Target;
use network_ir::{Activation, ConvParams, LayerKind, NetworkConfig, Padding};

#[derive(Debug, Clone, Default)]
pub struct JaxEmitter;

impl JaxEmitter {
    pub fn new() -> Self {
        Self
    }
}

fn then_activation(mut lines: Vec<String>, activation: Option<Activation>) -> String {
    if let Some(f) = activation.and_then(jax::activation) {
        lines.push(format!("x = {f}(x)"));
    }
    lines.join("\n")
}

fn conv_call(p: &ConvParams, dims: usize) -> String {
    let mut args = vec![
        format!("features={}", p.filters),
        format!("kernel_size={}", repeat_tuple(p.kernel_size, dims)),
        format!("strides={}", repeat_tuple(p.strides.unwrap_or(1), dims)),
        format!("padding='{}'", jax::padding(p.padding.unwrap_or(Padding::Valid))),
    ];
    if p.use_bias == Some(false) {
        args.push("use_bias=False".into());
    }
    let mut lines = vec![format!("x = nn.Conv({})(x)", args.join(", "))];
    if p.has_batch_norm() {
        lines.push("x = nn.BatchNorm(use_running_average=not training)(x)".into());
    }
    then_activation(lines, p.activation)
}

fn attention_call(var: &str, heads: u32, qkv_features: u64, dropout: f64, causal: bool) -> String {
    let mask = if causal {
        format!(", mask=nn.make_causal_mask({var}[..., 0])")
    } else {
        String::new()
    };
    format!(
        "nn.MultiHeadDotProductAttention(num_heads={heads}, qkv_features={qkv_features}, dropout_rate={}, deterministic=not training)({var}{mask})",
        py_float(dropout),
    )
}

impl Emitter for JaxEmitter {
    fn target(&self) -> Target {
        Target::Jax
    }

    fn render_layer(&self, slot: &LayerSlot<'_>) -> Option<String> {
        let code = match &slot.layer.kind {
            LayerKind::Input(p) => return input_scaling(p.preprocessing).map(str::to_string),
            LayerKind::Dense(p) => {
                let bias = if p.use_bias == Some(false) { ", use_bias=False" } else { "" };
                then_activation(
                    vec![format!("x = nn.Dense(features={}{bias})(x)", p.units)],
                    p.activation,
                )
            }
            LayerKind::Conv2d(p) => conv_call(p, 2),
            LayerKind::Conv3d(p) => conv_call(p, 3),
            LayerKind::Dropout(p) => format!(
                "x = nn.Dropout(rate={}, deterministic=not training)(x)",
                py_float(p.rate)
            ),
            LayerKind::Flatten => "x = x.reshape((x.shape[0], -1))".into(),
            LayerKind::Pooling(p) => {
                let f = match p.pool_type {
                    network_ir::PoolType::Max => "max_pool",
                    network_ir::PoolType::Avg => "avg_pool",
                };
                format!(
                    "x = nn.{f}(x, window_shape={}, strides={}, padding='{}')",
                    repeat_tuple(p.pool_size, 2),
                    repeat_tuple(p.strides.unwrap_or(p.pool_size), 2),
                    jax::padding(p.padding.unwrap_or(Padding::Valid)),
                )
            }
            LayerKind::BatchNorm(p) => {
                let mut args = vec!["use_running_average=not training".to_string()];
                if let Some(m) = p.momentum {
                    args.push(format!("momentum={}", py_float(m)));
                }
                if let Some(e) = p.epsilon {
                    args.push(format!("epsilon={}", py_float(e)));
                }
                if let Some(c) = p.center {
                    args.push(format!("use_bias={}", py_bool(c)));
                }
                if let Some(s) = p.scale {
                    args.push(format!("use_scale={}", py_bool(s)));
                }
                format!("x = nn.BatchNorm({})(x)", args.join(", "))
            }
            LayerKind::Lstm(p) | LayerKind::Gru(p) => {
                let cell = match slot.layer.kind {
                    LayerKind::Lstm(_) => "OptimizedLSTMCell",
                    _ => "GRUCell",
                };
                let mut lines = vec![format!("x = nn.RNN(nn.{cell}(features={}))(x)", p.units)];
                if !p.returns_sequences() {
                    lines.push("x = x[:, -1, :]".into());
                }
                lines.join("\n")
            }
            LayerKind::Embedding(p) => format!(
                "x = nn.Embed(num_embeddings={}, features={})(x)",
                p.input_dim.unwrap_or(10_000),
                p.output_dim.unwrap_or(128),
            ),
            LayerKind::Transformer(p) => {
                let dropout = p.dropout.unwrap_or(0.1);
                let encoding = if p.use_positional_encoding == Some(true) {
                    ", add position embeddings to x first"
                } else {
                    ""
                };
                [
                    format!("# transformer block {}{encoding}", slot.index),
                    "y = nn.LayerNorm()(x)".to_string(),
                    format!(
                        "y = {}",
                        attention_call("y", p.heads, p.model_dim(), dropout, false)
                    ),
                    "x = x + y".to_string(),
                    "y = nn.LayerNorm()(x)".to_string(),
                    format!("y = nn.Dense(features={})(y)", p.ff_dim),
                    "y = nn.gelu(y)".to_string(),
                    "y = nn.Dense(features=x.shape[-1])(y)".to_string(),
                    format!(
                        "y = nn.Dropout(rate={}, deterministic=not training)(y)",
                        py_float(dropout)
                    ),
                    "x = x + y".to_string(),
                ]
                .join("\n")
            }
            LayerKind::Attention(p) => format!(
                "x = {}",
                attention_call(
                    "x",
                    p.heads,
                    p.model_dim(),
                    p.dropout.unwrap_or(0.0),
                    p.use_causal_mask == Some(true),
                )
            ),
            LayerKind::Residual => format!(
                "# residual {}: save the block input earlier and add it back, e.g. x = x + skip",
                slot.index
            ),
            LayerKind::GlobalAvgPool => "x = jnp.mean(x, axis=(1, 2))".into(),
            LayerKind::GlobalMaxPool => "x = jnp.max(x, axis=(1, 2))".into(),
        };
        Some(code)
    }

    fn render_program(&self, config: &NetworkConfig) -> String {
        let hp = &config.hyperparameters;
        let slots = layer_slots(config);

        let mut body = Vec::new();
        for slot in &slots {
            if let Some(code) = self.render_layer(slot) {
                tracing::debug!("jax layer {}: {code}", slot.index);
                body.push(code);
            }
        }
        let has_batch_norm = slots.iter().any(|s| match &s.layer.kind {
            LayerKind::BatchNorm(_) => true,
            LayerKind::Conv2d(p) | LayerKind::Conv3d(p) => p.has_batch_norm(),
            _ => false,
        });

        let mut out = banner(config, "JAX/Flax model");
        out.push_str("import jax\nimport jax.numpy as jnp\nfrom flax import linen as nn\nimport optax\n\n\n");

        out.push_str("class NeuralNetwork(nn.Module):\n");
        out.push_str("    @nn.compact\n");
        out.push_str("    def __call__(self, x, training: bool = False):\n");
        for code in &body {
            out.push_str(&indent(code, 8));
            out.push('\n');
        }
        out.push_str("        return x\n\n\n");

        out.push_str("# Training configuration\n");
        match config.input().and_then(|p| p.dims().ok()) {
            Some(dims) => out.push_str(&format!("input_shape = {}\n", py_tuple(&dims))),
            None => out.push_str("input_shape = (1,)  # no input layer: set the per-example shape\n"),
        }
        out.push_str(&format!("learning_rate = {}\n", py_float(hp.learning_rate)));
        out.push_str(&format!("batch_size = {}\n", hp.batch_size));
        out.push_str(&format!("epochs = {}\n\n", hp.epochs));

        out.push_str("model = NeuralNetwork()\n");
        out.push_str("rng = jax.random.PRNGKey(0)\n");
        out.push_str("rng, init_rng = jax.random.split(rng)\n");
        out.push_str("variables = model.init(init_rng, jnp.ones((1, *input_shape)))\n");
        out.push_str("params = variables['params']\n");
        if has_batch_norm {
            out.push_str(
                "# BatchNorm keeps running statistics in variables['batch_stats'];\n\
                 # pass them to model.apply with mutable=['batch_stats'] while training.\n",
            );
        }
        out.push('\n');

        out.push_str(&format!(
            "optimizer = optax.{}(learning_rate)\n",
            jax::optimizer(hp.optimizer)
        ));
        out.push_str("opt_state = optimizer.init(params)\n\n\n");

        out.push_str("@jax.jit\n");
        out.push_str("def train_step(params, opt_state, batch, dropout_rng):\n");
        out.push_str("    def loss_fn(params):\n");
        out.push_str(
            "        logits = model.apply({'params': params}, batch['image'], training=True, rngs={'dropout': dropout_rng})\n",
        );
        out.push_str("        labels = batch['label']\n");
        out.push_str(&format!("        return {}\n\n", jax::loss(hp.loss)));
        out.push_str("    loss, grads = jax.value_and_grad(loss_fn)(params)\n");
        out.push_str("    updates, opt_state = optimizer.update(grads, opt_state, params)\n");
        out.push_str("    params = optax.apply_updates(params, updates)\n");
        out.push_str("    return params, opt_state, loss\n\n\n");

        out.push_str(
            "# train_loader yields dicts with 'image' and 'label' batches of batch_size examples\n\
             for epoch in range(epochs):\n\
             \x20   for batch in train_loader:\n\
             \x20       rng, dropout_rng = jax.random.split(rng)\n\
             \x20       params, opt_state, loss = train_step(params, opt_state, batch, dropout_rng)\n\
             \x20   print(f'Epoch {epoch + 1}, Loss: {loss:.4f}')\n",
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use network_ir::{registry, LayerType, Loss, Optimizer};

    fn config_of(types: &[LayerType]) -> NetworkConfig {
        let mut cfg = NetworkConfig::default();
        for &t in types {
            cfg.add_layer(registry::instantiate(t));
        }
        cfg
    }

    fn render(cfg: &NetworkConfig) -> String {
        JaxEmitter::new().render_program(cfg)
    }

    #[test]
    fn test_call_chain() {
        let cfg = config_of(&[LayerType::Input, LayerType::Conv2d, LayerType::Flatten, LayerType::Dense]);
        let out = render(&cfg);
        assert!(out.contains(
            "        x = nn.Conv(features=32, kernel_size=(3, 3), strides=(1, 1), padding='VALID')(x)\n        x = nn.relu(x)\n"
        ));
        assert!(out.contains("        x = x.reshape((x.shape[0], -1))\n"));
        assert!(out.contains("        x = nn.Dense(features=128)(x)\n        x = nn.relu(x)\n"));
        assert!(out.contains("input_shape = (28, 28, 1)\n"));
    }

    #[test]
    fn test_no_forward_steps() {
        let cfg = config_of(&[LayerType::Dense]);
        let slots = layer_slots(&cfg);
        assert!(JaxEmitter::new().render_forward_step(&slots[0]).is_none());
    }

    #[test]
    fn test_missing_input_gets_default_shape() {
        let out = render(&config_of(&[LayerType::Dense]));
        assert!(out.contains("input_shape = (1,)"));
        assert!(!out.contains("jnp.ones([1, input_shape])"));
    }

    #[test]
    fn test_optimizer_and_loss() {
        let mut cfg = config_of(&[LayerType::Dense]);
        cfg.hyperparameters.optimizer = Optimizer::Nadam;
        cfg.hyperparameters.loss = Loss::SparseCategoricalCrossentropy;
        cfg.hyperparameters.epochs = 4;
        let out = render(&cfg);
        assert!(out.contains("optimizer = optax.nadam(learning_rate)"));
        assert!(out.contains(
            "return optax.softmax_cross_entropy_with_integer_labels(logits, labels).mean()"
        ));
        assert!(out.contains("epochs = 4\n"));
    }

    #[test]
    fn test_recurrent_and_attention() {
        let cfg = config_of(&[LayerType::Embedding, LayerType::Lstm, LayerType::Attention]);
        let out = render(&cfg);
        assert!(out.contains("x = nn.Embed(num_embeddings=10000, features=128)(x)"));
        assert!(out.contains("x = nn.RNN(nn.OptimizedLSTMCell(features=64))(x)\n        x = x[:, -1, :]"));
        assert!(out.contains("nn.MultiHeadDotProductAttention(num_heads=8, qkv_features=512"));
    }

    #[test]
    fn test_attention_width_does_not_overflow() {
        let mut cfg = NetworkConfig::default();
        for t in [LayerType::Attention, LayerType::Transformer] {
            let mut layer = registry::instantiate(t);
            match &mut layer.kind {
                LayerKind::Attention(p) => {
                    p.heads = 65_536;
                    p.key_dim = 65_536;
                }
                LayerKind::Transformer(p) => {
                    p.heads = 65_536;
                    p.key_dim = 65_536;
                }
                _ => unreachable!(),
            }
            cfg.add_layer(layer);
        }
        cfg.validate().unwrap();
        let out = render(&cfg);
        assert_eq!(out.matches("qkv_features=4294967296,").count(), 2);
        assert!(out.contains("# transformer block 1, add position embeddings to x first\n"));
    }

    #[test]
    fn test_conv_batch_norm() {
        let mut cfg = config_of(&[LayerType::Input, LayerType::Conv2d]);
        if let LayerKind::Conv2d(p) = &mut cfg.layers[1].kind {
            p.batch_norm = Some(true);
        }
        let out = render(&cfg);
        assert!(out.contains(
            "padding='VALID')(x)\n        x = nn.BatchNorm(use_running_average=not training)(x)\n        x = nn.relu(x)\n"
        ));
        assert!(out.contains("mutable=['batch_stats']"));
    }

    #[test]
    fn test_input_standardize_step() {
        let mut cfg = config_of(&[LayerType::Input, LayerType::Dense]);
        if let LayerKind::Input(p) = &mut cfg.layers[0].kind {
            p.preprocessing = Some(network_ir::Preprocessing::Standardize);
        }
        let out = render(&cfg);
        assert!(out.contains(
            "training: bool = False):\n        x = (x - x.mean()) / (x.std() + 1e-7)\n        x = nn.Dense("
        ));
    }

    #[test]
    fn test_batch_norm_note() {
        let out = render(&config_of(&[LayerType::BatchNorm]));
        assert!(out.contains(
            "x = nn.BatchNorm(use_running_average=not training, momentum=0.99, epsilon=0.001, use_bias=True, use_scale=True)(x)"
        ));
        assert!(out.contains("mutable=['batch_stats']"));
    }
}
