// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! PyTorch emitter: an `nn.Module` subclass with a separate `forward`.
//!
//! Layers are declared as attributes in `__init__` and invoked in
//! `forward`, both in list order. Attribute names combine a kind prefix
//! with the layer's position (`fc3`, `conv0`), so they are unique and
//! stable for a given order.
//!
//! When the incoming feature width is unknown (after a flatten, or with no
//! input layer) the lazy modules `LazyLinear` / `LazyConvNd` /
//! `LazyBatchNorm2d` are used and the width is inferred on first call.

use crate::emitter::{Emitter, LayerSlot};
use crate::python::{banner, indent, input_scaling, py_bool, py_float, py_tuple};
use crate::shape::layer_slots;
use crate::symbols::torch;
use crate::Target;
use network_ir::{Activation, ConvParams, LayerKind, NetworkConfig, Padding};

/// Constructor placeholder for recurrent layers whose input width is unknown.
const INPUT_SIZE: &str = "input_size";

#[derive(Debug, Clone, Default)]
pub struct PyTorchEmitter;

impl PyTorchEmitter {
    pub fn new() -> Self {
        Self
    }
}

fn attr(prefix: &str, slot: &LayerSlot<'_>) -> String {
    format!("self.{prefix}{}", slot.index)
}

fn with_activation(mut lines: Vec<String>, activation: Option<Activation>) -> String {
    if let Some(call) = activation.and_then(|a| torch::activation(a, "x")) {
        lines.push(format!("x = {call}"));
    }
    lines.join("\n")
}

fn conv_decl(p: &ConvParams, dims: u8, in_features: Option<u32>) -> String {
    let mut args = Vec::new();
    let class = match in_features {
        Some(n) => {
            args.push(n.to_string());
            format!("Conv{dims}d")
        }
        None => format!("LazyConv{dims}d"),
    };
    args.push(p.filters.to_string());
    args.push(format!("kernel_size={}", p.kernel_size));
    args.push(format!("stride={}", p.strides.unwrap_or(1)));
    args.push(format!(
        "padding={}",
        torch::padding(p.padding.unwrap_or(Padding::Valid), p.kernel_size)
    ));
    if p.use_bias == Some(false) {
        args.push("bias=False".into());
    }
    format!("nn.{class}({})", args.join(", "))
}

impl Emitter for PyTorchEmitter {
    fn target(&self) -> Target {
        Target::PyTorch
    }

    fn render_layer(&self, slot: &LayerSlot<'_>) -> Option<String> {
        let decl = match &slot.layer.kind {
            LayerKind::Input(_) | LayerKind::GlobalAvgPool | LayerKind::GlobalMaxPool => {
                return None
            }
            LayerKind::Dense(p) => {
                let bias = if p.use_bias == Some(false) { ", bias=False" } else { "" };
                let module = match slot.in_features {
                    Some(n) => format!("nn.Linear({n}, {}{bias})", p.units),
                    None => format!("nn.LazyLinear({}{bias})", p.units),
                };
                format!("{} = {module}", attr("fc", slot))
            }
            LayerKind::Conv2d(p) | LayerKind::Conv3d(p) => {
                let dims = match slot.layer.kind {
                    LayerKind::Conv3d(_) => 3,
                    _ => 2,
                };
                let conv = attr("conv", slot);
                let mut lines = vec![format!("{conv} = {}", conv_decl(p, dims, slot.in_features))];
                if p.has_batch_norm() {
                    lines.push(format!("{conv}_bn = nn.BatchNorm{dims}d({})", p.filters));
                }
                lines.join("\n")
            }
            LayerKind::Dropout(p) => {
                format!("{} = nn.Dropout(p={})", attr("dropout", slot), py_float(p.rate))
            }
            LayerKind::Flatten => format!("{} = nn.Flatten()", attr("flatten", slot)),
            LayerKind::Pooling(p) => format!(
                "{} = nn.{}2d(kernel_size={}, stride={})",
                attr("pool", slot),
                torch::pool(p.pool_type),
                p.pool_size,
                p.strides.unwrap_or(p.pool_size),
            ),
            LayerKind::BatchNorm(p) => {
                let eps = p.epsilon.map(|e| format!("eps={}", py_float(e)));
                let module = match slot.in_features {
                    Some(n) => {
                        let args: Vec<String> = std::iter::once(n.to_string()).chain(eps).collect();
                        format!("nn.BatchNorm2d({})", args.join(", "))
                    }
                    None => format!("nn.LazyBatchNorm2d({})", eps.unwrap_or_default()),
                };
                format!("{} = {module}", attr("bn", slot))
            }
            LayerKind::Lstm(p) | LayerKind::Gru(p) => {
                let (prefix, class) = match slot.layer.kind {
                    LayerKind::Lstm(_) => ("lstm", "LSTM"),
                    _ => ("gru", "GRU"),
                };
                let input = slot
                    .in_features
                    .map_or_else(|| INPUT_SIZE.to_string(), |n| n.to_string());
                format!(
                    "{} = nn.{class}({input}, {}, batch_first=True)",
                    attr(prefix, slot),
                    p.units
                )
            }
            LayerKind::Embedding(p) => format!(
                "{} = nn.Embedding({}, {})",
                attr("embed", slot),
                p.input_dim.unwrap_or(10_000),
                p.output_dim.unwrap_or(128),
            ),
            LayerKind::Transformer(p) => format!(
                "{} = nn.TransformerEncoderLayer(d_model={}, nhead={}, dim_feedforward={}, dropout={}, batch_first=True)",
                attr("transformer", slot),
                slot.in_features.map_or_else(|| p.model_dim(), u64::from),
                p.heads,
                p.ff_dim,
                py_float(p.dropout.unwrap_or(0.1)),
            ),
            LayerKind::Attention(p) => format!(
                "{} = nn.MultiheadAttention(embed_dim={}, num_heads={}, dropout={}, batch_first=True)",
                attr("attn", slot),
                slot.in_features.map_or_else(|| p.model_dim(), u64::from),
                p.heads,
                py_float(p.dropout.unwrap_or(0.0)),
            ),
            LayerKind::Residual => format!(
                "# residual {}: keep a reference to the block input in forward() and add it back",
                slot.index
            ),
        };
        Some(decl)
    }

    fn render_forward_step(&self, slot: &LayerSlot<'_>) -> Option<String> {
        let call = |prefix: &str| format!("x = {}(x)", attr(prefix, slot));
        let step = match &slot.layer.kind {
            LayerKind::Input(p) => return input_scaling(p.preprocessing).map(str::to_string),
            LayerKind::Dense(p) => with_activation(vec![call("fc")], p.activation),
            LayerKind::Conv2d(p) | LayerKind::Conv3d(p) => {
                let mut lines = vec![call("conv")];
                if p.has_batch_norm() {
                    lines.push(format!("x = {}_bn(x)", attr("conv", slot)));
                }
                with_activation(lines, p.activation)
            }
            LayerKind::Dropout(_) => call("dropout"),
            LayerKind::Flatten => call("flatten"),
            LayerKind::Pooling(_) => call("pool"),
            LayerKind::BatchNorm(_) => call("bn"),
            LayerKind::Lstm(p) | LayerKind::Gru(p) => {
                let prefix = match slot.layer.kind {
                    LayerKind::Lstm(_) => "lstm",
                    _ => "gru",
                };
                let mut lines = vec![format!("x, _ = {}(x)", attr(prefix, slot))];
                if !p.returns_sequences() {
                    lines.push("x = x[:, -1, :]".into());
                }
                lines.join("\n")
            }
            LayerKind::Embedding(_) => call("embed"),
            LayerKind::Transformer(p) => {
                let mut lines = Vec::new();
                if p.use_positional_encoding == Some(true) {
                    lines.push(
                        "# positional encoding: add position embeddings of width x.size(-1) to x here"
                            .to_string(),
                    );
                }
                lines.push(call("transformer"));
                lines.join("\n")
            }
            LayerKind::Attention(p) => {
                let mask = if p.use_causal_mask == Some(true) {
                    ", attn_mask=nn.Transformer.generate_square_subsequent_mask(x.size(1))"
                } else {
                    ""
                };
                format!("x, _ = {}(x, x, x{mask})", attr("attn", slot))
            }
            LayerKind::Residual => format!("# residual {}: x = x + identity", slot.index),
            LayerKind::GlobalAvgPool => "x = torch.mean(x, dim=(2, 3))".into(),
            LayerKind::GlobalMaxPool => "x = torch.amax(x, dim=(2, 3))".into(),
        };
        Some(step)
    }

    fn render_program(&self, config: &NetworkConfig) -> String {
        let slots = layer_slots(config);
        let hp = &config.hyperparameters;

        let mut decls = Vec::new();
        let mut steps = Vec::new();
        for slot in &slots {
            if let Some(d) = self.render_layer(slot) {
                tracing::debug!("pytorch layer {}: {d}", slot.index);
                decls.push(d);
            }
            if let Some(s) = self.render_forward_step(slot) {
                steps.push(s);
            }
        }
        let needs_input_size = decls.iter().any(|d| d.contains(&format!("({INPUT_SIZE},")));
        let has_lazy = decls.iter().any(|d| d.contains("nn.Lazy"));

        let mut out = banner(config, "PyTorch model");
        out.push_str("import torch\nimport torch.nn as nn\nimport torch.nn.functional as F\n\n");
        if needs_input_size {
            out.push_str("# Feature width of the sequences entering the first recurrent layer\n");
            out.push_str(&format!("{INPUT_SIZE} = 1\n\n"));
        }

        out.push_str("\nclass NeuralNetwork(nn.Module):\n");
        out.push_str("    def __init__(self):\n");
        out.push_str("        super().__init__()\n");
        for d in &decls {
            out.push_str(&indent(d, 8));
            out.push('\n');
        }
        out.push_str("\n    def forward(self, x):\n");
        for s in &steps {
            out.push_str(&indent(s, 8));
            out.push('\n');
        }
        out.push_str("        return x\n\n\n");

        out.push_str("# Training configuration\n");
        if let Some(input) = config.input() {
            if let Ok(dims) = input.dims() {
                out.push_str(&format!("input_shape = {}\n", py_tuple(&dims)));
            }
        }
        out.push_str(&format!("learning_rate = {}\n", py_float(hp.learning_rate)));
        out.push_str(&format!("batch_size = {}\n", hp.batch_size));
        out.push_str(&format!("epochs = {}\n", hp.epochs));
        out.push_str(&format!(
            "validation_split = {}\n",
            py_float(hp.validation_split)
        ));
        out.push_str(&format!(
            "shuffle = {}\n\n",
            py_bool(hp.shuffle.unwrap_or(true))
        ));

        out.push_str("model = NeuralNetwork()\n");
        if has_lazy {
            out.push_str(
                "# Lazy modules infer their input sizes on the first forward pass;\n\
                 # run one batch through the model before creating the optimizer.\n",
            );
        }
        out.push_str(&format!("criterion = nn.{}()\n", torch::loss(hp.loss)));
        out.push_str(&format!(
            "optimizer = torch.optim.{}(model.parameters(), lr=learning_rate)\n\n",
            torch::optimizer(hp.optimizer)
        ));

        out.push_str(
            "# train_loader yields (inputs, labels) batches of batch_size examples,\n\
             # e.g. torch.utils.data.DataLoader(train_set, batch_size=batch_size, shuffle=shuffle)\n\
             for epoch in range(epochs):\n\
             \x20   model.train()\n\
             \x20   for inputs, labels in train_loader:\n\
             \x20       optimizer.zero_grad()\n\
             \x20       outputs = model(inputs)\n\
             \x20       loss = criterion(outputs, labels)\n\
             \x20       loss.backward()\n\
             \x20       optimizer.step()\n\
             \x20   print(f'Epoch [{epoch + 1}/{epochs}], Loss: {loss.item():.4f}')\n",
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use network_ir::{registry, LayerPatch, LayerSpec, LayerType, Loss, Optimizer};

    fn config_of(types: &[LayerType]) -> NetworkConfig {
        let mut cfg = NetworkConfig::default();
        for &t in types {
            cfg.add_layer(registry::instantiate(t));
        }
        cfg
    }

    fn render(cfg: &NetworkConfig) -> String {
        PyTorchEmitter::new().render_program(cfg)
    }

    #[test]
    fn test_dense_with_known_width() {
        let cfg = config_of(&[LayerType::Input, LayerType::Dense]);
        let out = render(&cfg);
        assert!(out.contains("self.fc1 = nn.Linear(1, 128)"));
        assert!(out.contains("x = self.fc1(x)\n        x = F.relu(x)"));
        assert!(out.contains("input_shape = (28, 28, 1)"));
    }

    #[test]
    fn test_lazy_modules_after_flatten() {
        let cfg = config_of(&[LayerType::Flatten, LayerType::Dense, LayerType::BatchNorm]);
        let out = render(&cfg);
        assert!(out.contains("self.flatten0 = nn.Flatten()"));
        assert!(out.contains("self.fc1 = nn.LazyLinear(128)"));
        assert!(out.contains("self.bn2 = nn.BatchNorm2d(128, eps=0.001)"));
        assert!(out.contains("Lazy modules infer"));
    }

    #[test]
    fn test_conv_and_pool() {
        let cfg = config_of(&[LayerType::Input, LayerType::Conv2d, LayerType::Pooling]);
        let out = render(&cfg);
        assert!(out.contains("self.conv1 = nn.Conv2d(1, 32, kernel_size=3, stride=1, padding=0)"));
        assert!(out.contains("self.pool2 = nn.MaxPool2d(kernel_size=2, stride=2)"));
    }

    #[test]
    fn test_recurrent_without_width_uses_placeholder() {
        let cfg = config_of(&[LayerType::Lstm]);
        let out = render(&cfg);
        assert!(out.contains("input_size = 1\n"));
        assert!(out.contains("self.lstm0 = nn.LSTM(input_size, 64, batch_first=True)"));
        assert!(out.contains("x, _ = self.lstm0(x)\n        x = x[:, -1, :]"));
    }

    #[test]
    fn test_return_sequences_keeps_time_axis() {
        let mut cfg = NetworkConfig::default();
        let gru = registry::instantiate(LayerType::Gru).with_id("g");
        cfg.add_layer(gru);
        cfg.update_layer(&"g".into(), &LayerPatch::new().set("returnSequences", true))
            .unwrap();
        let out = render(&cfg);
        assert!(out.contains("x, _ = self.gru0(x)\n"));
        assert!(!out.contains("x[:, -1, :]"));
    }

    #[test]
    fn test_hyperparameters_substituted() {
        let mut cfg = config_of(&[LayerType::Dense]);
        cfg.hyperparameters.learning_rate = 0.05;
        cfg.hyperparameters.epochs = 42;
        cfg.hyperparameters.batch_size = 16;
        cfg.hyperparameters.optimizer = Optimizer::RmsProp;
        cfg.hyperparameters.loss = Loss::Mse;
        let out = render(&cfg);
        assert!(out.contains("learning_rate = 0.05\n"));
        assert!(out.contains("epochs = 42\n"));
        assert!(out.contains("batch_size = 16\n"));
        assert!(out.contains("criterion = nn.MSELoss()"));
        assert!(out.contains("torch.optim.RMSprop(model.parameters(), lr=learning_rate)"));
    }

    #[test]
    fn test_placeholders_and_global_pools() {
        let cfg = config_of(&[LayerType::Residual, LayerType::GlobalAvgPool]);
        let out = render(&cfg);
        assert!(out.contains("# residual 0:"));
        assert!(out.contains("x = torch.mean(x, dim=(2, 3))"));
    }

    #[test]
    fn test_declaration_and_forward_order_match() {
        let cfg = config_of(&[LayerType::Dropout, LayerType::Dense, LayerType::Flatten]);
        let out = render(&cfg);
        let d0 = out.find("self.dropout0 =").unwrap();
        let d1 = out.find("self.fc1 =").unwrap();
        let d2 = out.find("self.flatten2 =").unwrap();
        assert!(d0 < d1 && d1 < d2);
        let f0 = out.find("x = self.dropout0(x)").unwrap();
        let f1 = out.find("x = self.fc1(x)").unwrap();
        let f2 = out.find("x = self.flatten2(x)").unwrap();
        assert!(f0 < f1 && f1 < f2);
    }

    #[test]
    fn test_conv_batch_norm_between_conv_and_activation() {
        let mut cfg = config_of(&[LayerType::Input]);
        let conv = registry::instantiate(LayerType::Conv2d).with_id("c");
        cfg.add_layer(conv);
        cfg.update_layer(&"c".into(), &LayerPatch::new().set("batchNorm", true))
            .unwrap();
        let out = render(&cfg);
        assert!(out.contains(
            "self.conv1 = nn.Conv2d(1, 32, kernel_size=3, stride=1, padding=0)\n        self.conv1_bn = nn.BatchNorm2d(32)\n"
        ));
        assert!(out.contains("x = self.conv1(x)\n        x = self.conv1_bn(x)\n        x = F.relu(x)\n"));

        let plain = render(&config_of(&[LayerType::Input, LayerType::Conv3d]));
        assert!(!plain.contains("_bn"));
    }

    #[test]
    fn test_attention_width_does_not_overflow() {
        let mut cfg = NetworkConfig::default();
        for t in [LayerType::Transformer, LayerType::Attention] {
            let mut layer = registry::instantiate(t);
            match &mut layer.kind {
                LayerKind::Transformer(p) => {
                    p.heads = 65_536;
                    p.key_dim = 65_536;
                }
                LayerKind::Attention(p) => {
                    p.heads = 65_536;
                    p.key_dim = 65_536;
                }
                _ => unreachable!(),
            }
            cfg.add_layer(layer);
        }
        cfg.validate().unwrap();
        let out = render(&cfg);
        assert!(out.contains("nn.TransformerEncoderLayer(d_model=4294967296, nhead=65536"));
        assert!(out.contains("nn.MultiheadAttention(embed_dim=4294967296, num_heads=65536"));
    }

    #[test]
    fn test_positional_encoding_note() {
        let mut cfg = NetworkConfig::default();
        cfg.add_layer(registry::instantiate(LayerType::Transformer).with_id("t"));
        let out = render(&cfg);
        let note = out.find("# positional encoding").unwrap();
        let call = out.find("x = self.transformer0(x)").unwrap();
        assert!(note < call);

        cfg.update_layer(&"t".into(), &LayerPatch::new().set("usePositionalEncoding", false))
            .unwrap();
        assert!(!render(&cfg).contains("positional encoding"));
    }

    #[test]
    fn test_input_preprocessing_is_first_forward_step() {
        let mut cfg = config_of(&[LayerType::Input, LayerType::Dense]);
        if let LayerKind::Input(p) = &mut cfg.layers[0].kind {
            p.preprocessing = Some(network_ir::Preprocessing::Normalize);
        }
        let out = render(&cfg);
        assert!(out.contains("def forward(self, x):\n        x = x / 255.0\n        x = self.fc1(x)"));
    }

    #[test]
    fn test_input_renders_nothing() {
        let layer = LayerSpec::new(registry::describe(LayerType::Input).default_kind());
        let slot = LayerSlot {
            index: 0,
            layer: &layer,
            in_features: None,
        };
        let e = PyTorchEmitter::new();
        assert!(e.render_layer(&slot).is_none());
        assert!(e.render_forward_step(&slot).is_none());
    }
}
