// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! ONNX emitter: a commented manifest of the network plus export recipes.
//!
//! ONNX graphs are not written by hand, so the output describes the layer
//! sequence and shows how to export an equivalent model from PyTorch
//! (`torch.onnx.export`) or Keras (`tf2onnx`). The file is saved with a
//! `.txt` extension.

use crate::emitter::{Emitter, LayerSlot};
use crate::python::{banner, one_line, py_float, py_tuple};
use crate::shape::layer_slots;
use crate::Target;
use network_ir::NetworkConfig;

const TORCH_OPSET: u32 = 11;
const TF_OPSET: u32 = 13;

#[derive(Debug, Clone, Default)]
pub struct OnnxEmitter;

impl OnnxEmitter {
    pub fn new() -> Self {
        Self
    }
}

impl Emitter for OnnxEmitter {
    fn target(&self) -> Target {
        Target::Onnx
    }

    fn render_layer(&self, slot: &LayerSlot<'_>) -> Option<String> {
        Some(format!("# [{}] {}", slot.index, one_line(&slot.layer.summary())))
    }

    fn render_program(&self, config: &NetworkConfig) -> String {
        let hp = &config.hyperparameters;
        let mut out = banner(config, "ONNX export guide");

        // ── Manifest ────────────────────────────────────────────────
        out.push_str("# Layers\n");
        let slots = layer_slots(config);
        if slots.is_empty() {
            out.push_str("# (no layers)\n");
        }
        for slot in &slots {
            if let Some(line) = self.render_layer(slot) {
                out.push_str(&line);
                out.push('\n');
            }
        }

        let metrics: Vec<&str> = hp.metrics_or_default().iter().map(|m| m.as_str()).collect();
        out.push_str("#\n# Training\n");
        out.push_str(&format!(
            "#   optimizer={} learning_rate={} loss={}\n",
            hp.optimizer,
            py_float(hp.learning_rate),
            hp.loss
        ));
        out.push_str(&format!(
            "#   batch_size={} epochs={} validation_split={}\n",
            hp.batch_size,
            hp.epochs,
            py_float(hp.validation_split)
        ));
        out.push_str(&format!("#   metrics={}\n\n", metrics.join(", ")));

        let shape = match config.input().and_then(|p| p.dims().ok()) {
            Some(dims) => format!("input_shape = {}\n", py_tuple(&dims)),
            None => "input_shape = (1,)  # no input layer: set the per-example shape\n".into(),
        };

        // ── PyTorch recipe ──────────────────────────────────────────
        out.push_str("# Option 1: export from PyTorch\n");
        out.push_str("import torch\n\n");
        out.push_str("model = NeuralNetwork()  # the class from the PyTorch output\n");
        out.push_str("model.eval()\n");
        out.push_str(&shape);
        out.push_str("dummy_input = torch.randn(1, *input_shape)\n");
        out.push_str("torch.onnx.export(\n");
        out.push_str("    model,\n    dummy_input,\n    'model.onnx',\n");
        out.push_str("    export_params=True,\n");
        out.push_str(&format!("    opset_version={TORCH_OPSET},\n"));
        out.push_str("    input_names=['input'],\n    output_names=['output'],\n");
        out.push_str("    dynamic_axes={'input': {0: 'batch_size'}, 'output': {0: 'batch_size'}},\n)\n\n");

        // ── Keras recipe ────────────────────────────────────────────
        out.push_str("# Option 2: export from Keras / TensorFlow\n");
        out.push_str("import tensorflow as tf\nimport tf2onnx\n\n");
        out.push_str("# model = the Sequential model from the Keras output\n");
        out.push_str("spec = (tf.TensorSpec((None, *input_shape), tf.float32, name='input'),)\n");
        out.push_str(&format!(
            "model_proto, _ = tf2onnx.convert.from_keras(model, input_signature=spec, opset={TF_OPSET}, output_path='model.onnx')\n\n"
        ));

        // ── Verify ──────────────────────────────────────────────────
        out.push_str("# Verify\nimport onnx\nimport onnxruntime as ort\nimport numpy as np\n\n");
        out.push_str("onnx.checker.check_model(onnx.load('model.onnx'))\n");
        out.push_str("session = ort.InferenceSession('model.onnx')\n");
        out.push_str("sample = np.random.randn(1, *input_shape).astype(np.float32)\n");
        out.push_str("outputs = session.run(None, {'input': sample})\n");
        out.push_str("print(outputs[0].shape)\n");
        out
    }
}
