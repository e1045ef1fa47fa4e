// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Closed vocabularies used by layers and hyperparameters.
//!
//! Every enum here is part of the persisted wire format: the string given
//! to each variant is exactly what appears in the JSON config. Emitters
//! translate these values through per-target symbol tables, so adding a
//! variant forces every table to be updated.

use crate::IrError;

/// Declares a fieldless wire enum with its canonical string form.
///
/// Generates `ALL`, `as_str`, `Display`, and a strict `FromStr` that
/// accepts only the canonical spelling.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire)] $variant, )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Returns the wire-format string for this value.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $wire, )+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = IrError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $wire => Ok($name::$variant), )+
                    other => Err(IrError::UnknownValue {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

// ── Layer vocabularies ─────────────────────────────────────────────

wire_enum! {
    /// Element-wise activation applied after a layer.
    Activation, "activation" {
        Relu => "relu",
        Sigmoid => "sigmoid",
        Tanh => "tanh",
        Softmax => "softmax",
        /// Identity; emitters skip the activation call entirely.
        Linear => "linear",
        Elu => "elu",
        Selu => "selu",
        Gelu => "gelu",
        Swish => "swish",
        LeakyRelu => "leaky_relu",
    }
}

wire_enum! {
    /// Convolution / pooling border handling.
    Padding, "padding" {
        Valid => "valid",
        Same => "same",
        Causal => "causal",
    }
}

wire_enum! {
    /// Reduction used by a pooling layer.
    PoolType, "pool type" {
        Max => "max",
        Avg => "avg",
    }
}

wire_enum! {
    /// Input normalisation applied before the first layer.
    Preprocessing, "preprocessing" {
        Normalize => "normalize",
        Standardize => "standardize",
        Passthrough => "none",
    }
}

wire_enum! {
    /// How dataset samples are resized before training.
    ResizeStrategy, "resize strategy" {
        Passthrough => "none",
        Fixed => "fixed",
        Custom => "custom",
        Aspect => "aspect",
    }
}

wire_enum! {
    /// Pixel/value scaling applied by the dataset pipeline.
    NormalizeMethod, "normalize method" {
        Passthrough => "none",
        UnitRange => "0-1",
        SymmetricRange => "-1-1",
        Imagenet => "imagenet",
        Custom => "custom",
    }
}

wire_enum! {
    /// Weight penalty family.
    RegularizerKind, "regularizer" {
        L1 => "l1",
        L2 => "l2",
        L1L2 => "l1_l2",
    }
}

// ── Project vocabularies ───────────────────────────────────────────

wire_enum! {
    /// What the network is meant to do. Descriptive only.
    TaskType, "task type" {
        Classification => "classification",
        Regression => "regression",
        Segmentation => "segmentation",
        ObjectDetection => "object-detection",
        NlpClassification => "nlp-classification",
        NlpGeneration => "nlp-generation",
        TimeSeries => "time-series",
        Reinforcement => "reinforcement",
        Recommendation => "recommendation",
        Gan => "gan",
        Autoencoder => "autoencoder",
        Transfer => "transfer",
        Multimodal => "multimodal",
    }
}

wire_enum! {
    /// Modality of the training data. Descriptive only.
    DataType, "data type" {
        Image => "image",
        Text => "text",
        Audio => "audio",
        Video => "video",
        Tabular => "tabular",
        TimeSeries => "time-series",
    }
}

// ── Training vocabularies ──────────────────────────────────────────

wire_enum! {
    Optimizer, "optimizer" {
        Adam => "adam",
        Sgd => "sgd",
        RmsProp => "rmsprop",
        Adagrad => "adagrad",
        Adadelta => "adadelta",
        Adamax => "adamax",
        Nadam => "nadam",
    }
}

wire_enum! {
    Loss, "loss" {
        CategoricalCrossentropy => "categorical_crossentropy",
        BinaryCrossentropy => "binary_crossentropy",
        SparseCategoricalCrossentropy => "sparse_categorical_crossentropy",
        Mse => "mse",
        Mae => "mae",
        Huber => "huber",
        Hinge => "hinge",
        CosineSimilarity => "cosine_similarity",
    }
}

wire_enum! {
    Metric, "metric" {
        Accuracy => "accuracy",
        Precision => "precision",
        Recall => "recall",
        F1Score => "f1_score",
        Auc => "auc",
        Mae => "mae",
        Mse => "mse",
        Rmse => "rmse",
    }
}

wire_enum! {
    /// Direction in which a monitored quantity improves.
    MonitorMode, "monitor mode" {
        Min => "min",
        Max => "max",
        Auto => "auto",
    }
}
