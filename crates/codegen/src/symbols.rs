// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Per-framework symbol tables.
//!
//! Every table is an exhaustive `match` over a closed IR vocabulary, so a
//! translation exists for every value and adding a variant to the IR fails
//! to compile until each table handles it. TensorFlow shares the Keras
//! tables; ONNX prints the wire strings unchanged.

/// `torch` / `torch.nn` names.
pub mod torch {
    use network_ir::{Activation, Loss, Optimizer, Padding, PoolType};

    /// Class under `torch.optim`.
    pub fn optimizer(o: Optimizer) -> &'static str {
        match o {
            Optimizer::Adam => "Adam",
            Optimizer::Sgd => "SGD",
            Optimizer::RmsProp => "RMSprop",
            Optimizer::Adagrad => "Adagrad",
            Optimizer::Adadelta => "Adadelta",
            Optimizer::Adamax => "Adamax",
            Optimizer::Nadam => "NAdam",
        }
    }

    /// Criterion class under `torch.nn`.
    pub fn loss(l: Loss) -> &'static str {
        match l {
            Loss::CategoricalCrossentropy => "CrossEntropyLoss",
            Loss::BinaryCrossentropy => "BCELoss",
            Loss::SparseCategoricalCrossentropy => "CrossEntropyLoss",
            Loss::Mse => "MSELoss",
            Loss::Mae => "L1Loss",
            Loss::Huber => "HuberLoss",
            Loss::Hinge => "HingeEmbeddingLoss",
            Loss::CosineSimilarity => "CosineEmbeddingLoss",
        }
    }

    /// Functional activation applied to `var`, or `None` for identity.
    pub fn activation(a: Activation, var: &str) -> Option<String> {
        let call = match a {
            Activation::Linear => return None,
            Activation::Relu => format!("F.relu({var})"),
            Activation::Sigmoid => format!("torch.sigmoid({var})"),
            Activation::Tanh => format!("torch.tanh({var})"),
            Activation::Softmax => format!("F.softmax({var}, dim=-1)"),
            Activation::Elu => format!("F.elu({var})"),
            Activation::Selu => format!("F.selu({var})"),
            Activation::Gelu => format!("F.gelu({var})"),
            Activation::Swish => format!("F.silu({var})"),
            Activation::LeakyRelu => format!("F.leaky_relu({var})"),
        };
        Some(call)
    }

    pub fn pool(p: PoolType) -> &'static str {
        match p {
            PoolType::Max => "MaxPool",
            PoolType::Avg => "AvgPool",
        }
    }

    /// `padding=` argument of `nn.ConvNd`.
    pub fn padding(p: Padding, kernel_size: u32) -> String {
        match p {
            Padding::Valid => "0".into(),
            Padding::Same => "'same'".into(),
            Padding::Causal => kernel_size.saturating_sub(1).to_string(),
        }
    }
}

/// Keras names; `root` is the module path of the Keras API
/// (`keras` or `tf.keras`).
pub mod keras {
    use network_ir::{Activation, Loss, Metric, Optimizer, Padding, PoolType};

    /// Class under `<root>.optimizers`.
    pub fn optimizer(o: Optimizer) -> &'static str {
        match o {
            Optimizer::Adam => "Adam",
            Optimizer::Sgd => "SGD",
            Optimizer::RmsProp => "RMSprop",
            Optimizer::Adagrad => "Adagrad",
            Optimizer::Adadelta => "Adadelta",
            Optimizer::Adamax => "Adamax",
            Optimizer::Nadam => "Nadam",
        }
    }

    /// Loss identifier, passed as a string literal.
    pub fn loss(l: Loss) -> &'static str {
        match l {
            Loss::CategoricalCrossentropy => "categorical_crossentropy",
            Loss::BinaryCrossentropy => "binary_crossentropy",
            Loss::SparseCategoricalCrossentropy => "sparse_categorical_crossentropy",
            Loss::Mse => "mean_squared_error",
            Loss::Mae => "mean_absolute_error",
            Loss::Huber => "huber",
            Loss::Hinge => "hinge",
            Loss::CosineSimilarity => "cosine_similarity",
        }
    }

    pub fn activation(a: Activation) -> &'static str {
        match a {
            Activation::Relu => "relu",
            Activation::Sigmoid => "sigmoid",
            Activation::Tanh => "tanh",
            Activation::Softmax => "softmax",
            Activation::Linear => "linear",
            Activation::Elu => "elu",
            Activation::Selu => "selu",
            Activation::Gelu => "gelu",
            Activation::Swish => "swish",
            Activation::LeakyRelu => "leaky_relu",
        }
    }

    /// Metric expression inside `metrics=[...]`.
    pub fn metric(m: Metric, root: &str) -> String {
        match m {
            Metric::Accuracy => "'accuracy'".into(),
            Metric::Precision => format!("{root}.metrics.Precision()"),
            Metric::Recall => format!("{root}.metrics.Recall()"),
            Metric::F1Score => format!("{root}.metrics.F1Score()"),
            Metric::Auc => format!("{root}.metrics.AUC()"),
            Metric::Mae => "'mae'".into(),
            Metric::Mse => "'mse'".into(),
            Metric::Rmse => format!("{root}.metrics.RootMeanSquaredError()"),
        }
    }

    pub fn pool(p: PoolType) -> &'static str {
        match p {
            PoolType::Max => "MaxPooling",
            PoolType::Avg => "AveragePooling",
        }
    }

    pub fn padding(p: Padding) -> &'static str {
        match p {
            Padding::Valid => "valid",
            Padding::Same => "same",
            Padding::Causal => "causal",
        }
    }
}

/// Flax (`flax.linen as nn`) and optax names.
pub mod jax {
    use network_ir::{Activation, Loss, Optimizer, Padding};

    /// Constructor under `optax`.
    pub fn optimizer(o: Optimizer) -> &'static str {
        match o {
            Optimizer::Adam => "adam",
            Optimizer::Sgd => "sgd",
            Optimizer::RmsProp => "rmsprop",
            Optimizer::Adagrad => "adagrad",
            Optimizer::Adadelta => "adadelta",
            Optimizer::Adamax => "adamax",
            Optimizer::Nadam => "nadam",
        }
    }

    /// Scalar loss expression over `logits` and `labels`.
    pub fn loss(l: Loss) -> &'static str {
        match l {
            Loss::CategoricalCrossentropy => "optax.softmax_cross_entropy(logits, labels).mean()",
            Loss::BinaryCrossentropy => "optax.sigmoid_binary_cross_entropy(logits, labels).mean()",
            Loss::SparseCategoricalCrossentropy => {
                "optax.softmax_cross_entropy_with_integer_labels(logits, labels).mean()"
            }
            Loss::Mse => "optax.squared_error(logits, labels).mean()",
            Loss::Mae => "jnp.abs(logits - labels).mean()",
            Loss::Huber => "optax.huber_loss(logits, labels).mean()",
            Loss::Hinge => "optax.hinge_loss(logits, labels).mean()",
            Loss::CosineSimilarity => "optax.cosine_distance(logits, labels).mean()",
        }
    }

    /// Activation function under `nn`, or `None` for identity.
    pub fn activation(a: Activation) -> Option<&'static str> {
        match a {
            Activation::Linear => None,
            Activation::Relu => Some("nn.relu"),
            Activation::Sigmoid => Some("nn.sigmoid"),
            Activation::Tanh => Some("nn.tanh"),
            Activation::Softmax => Some("nn.softmax"),
            Activation::Elu => Some("nn.elu"),
            Activation::Selu => Some("nn.selu"),
            Activation::Gelu => Some("nn.gelu"),
            Activation::Swish => Some("nn.swish"),
            Activation::LeakyRelu => Some("nn.leaky_relu"),
        }
    }

    pub fn padding(p: Padding) -> &'static str {
        match p {
            Padding::Valid => "VALID",
            Padding::Same => "SAME",
            Padding::Causal => "CAUSAL",
        }
    }
}
