// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Static catalogue of layer types: display metadata and defaults.
//!
//! The registry is read-only process-wide data. [`describe`] is total over
//! [`LayerType`], and [`instantiate`] builds a fresh [`LayerSpec`] from a
//! descriptor's defaults with a newly generated id.

use crate::layer::{
    AttentionParams, BatchNormParams, ConvParams, DenseParams, DropoutParams, EmbeddingParams,
    InputParams, LayerKind, LayerSpec, LayerType, PoolingParams, RecurrentParams,
    TransformerParams,
};
use crate::types::{Activation, Padding, PoolType, Preprocessing};
use std::fmt;

/// Palette grouping of a layer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerCategory {
    Input,
    Convolutional,
    Dense,
    Recurrent,
    Normalization,
    Pooling,
    Other,
}

impl LayerCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Convolutional => "convolutional",
            Self::Dense => "dense",
            Self::Recurrent => "recurrent",
            Self::Normalization => "normalization",
            Self::Pooling => "pooling",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for LayerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable metadata for one layer type.
#[derive(Debug)]
pub struct LayerTypeDescriptor {
    pub layer_type: LayerType,
    /// Human-readable name shown in the palette.
    pub label: &'static str,
    pub icon: &'static str,
    pub category: LayerCategory,
    pub description: &'static str,
    /// Wire-format names of the fields a complete layer must carry.
    pub required_fields: &'static [&'static str],
    pub common_uses: &'static [&'static str],
}

impl LayerTypeDescriptor {
    /// Default field values for this type, as a fresh value.
    pub fn default_kind(&self) -> LayerKind {
        default_kind(self.layer_type)
    }

    fn matches(&self, needle: &str) -> bool {
        self.label.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.category.as_str().contains(needle)
    }
}

// ── Descriptors ────────────────────────────────────────────────────

const INPUT: LayerTypeDescriptor = LayerTypeDescriptor {
    layer_type: LayerType::Input,
    label: "Input",
    icon: "📥",
    category: LayerCategory::Input,
    description: "Declares the shape of the data entering the network",
    required_fields: &["shape"],
    common_uses: &["Every model", "Fixing the input resolution"],
};

const DENSE: LayerTypeDescriptor = LayerTypeDescriptor {
    layer_type: LayerType::Dense,
    label: "Dense",
    icon: "🔗",
    category: LayerCategory::Dense,
    description: "Fully connected layer: every input feeds every output unit",
    required_fields: &["units"],
    common_uses: &["Classification heads", "MLPs", "Regression outputs"],
};

const CONV2D: LayerTypeDescriptor = LayerTypeDescriptor {
    layer_type: LayerType::Conv2d,
    label: "Conv2D",
    icon: "🔲",
    category: LayerCategory::Convolutional,
    description: "2D convolution extracting spatial features from images",
    required_fields: &["filters", "kernelSize"],
    common_uses: &["Image classification", "Object detection", "Segmentation"],
};

const CONV3D: LayerTypeDescriptor = LayerTypeDescriptor {
    layer_type: LayerType::Conv3d,
    label: "Conv3D",
    icon: "🧊",
    category: LayerCategory::Convolutional,
    description: "3D convolution over volumes or video frames",
    required_fields: &["filters", "kernelSize"],
    common_uses: &["Video analysis", "Medical imaging"],
};

const DROPOUT: LayerTypeDescriptor = LayerTypeDescriptor {
    layer_type: LayerType::Dropout,
    label: "Dropout",
    icon: "🎲",
    category: LayerCategory::Other,
    description: "Randomly zeroes activations during training to reduce overfitting",
    required_fields: &["rate"],
    common_uses: &["Regularization", "Between dense layers"],
};

const FLATTEN: LayerTypeDescriptor = LayerTypeDescriptor {
    layer_type: LayerType::Flatten,
    label: "Flatten",
    icon: "📏",
    category: LayerCategory::Other,
    description: "Collapses all non-batch dimensions into one",
    required_fields: &[],
    common_uses: &["Between convolutional and dense layers"],
};

const POOLING: LayerTypeDescriptor = LayerTypeDescriptor {
    layer_type: LayerType::Pooling,
    label: "Pooling",
    icon: "🔽",
    category: LayerCategory::Pooling,
    description: "Downsamples feature maps with a max or average window",
    required_fields: &["poolType", "poolSize"],
    common_uses: &["Reducing spatial size", "Translation invariance"],
};

const BATCH_NORM: LayerTypeDescriptor = LayerTypeDescriptor {
    layer_type: LayerType::BatchNorm,
    label: "Batch Normalization",
    icon: "📊",
    category: LayerCategory::Normalization,
    description: "Normalizes activations per batch to stabilise training",
    required_fields: &[],
    common_uses: &["Deep CNNs", "Faster convergence"],
};

const LSTM: LayerTypeDescriptor = LayerTypeDescriptor {
    layer_type: LayerType::Lstm,
    label: "LSTM",
    icon: "🔁",
    category: LayerCategory::Recurrent,
    description: "Long short-term memory recurrent layer for sequences",
    required_fields: &["units"],
    common_uses: &["Time series", "Text classification", "Sequence modelling"],
};

const GRU: LayerTypeDescriptor = LayerTypeDescriptor {
    layer_type: LayerType::Gru,
    label: "GRU",
    icon: "🔄",
    category: LayerCategory::Recurrent,
    description: "Gated recurrent unit, a lighter alternative to LSTM",
    required_fields: &["units"],
    common_uses: &["Time series", "Speech", "Sequence modelling"],
};

const EMBEDDING: LayerTypeDescriptor = LayerTypeDescriptor {
    layer_type: LayerType::Embedding,
    label: "Embedding",
    icon: "🔤",
    category: LayerCategory::Other,
    description: "Maps integer token ids to dense vectors",
    required_fields: &["inputDim", "outputDim"],
    common_uses: &["NLP", "Recommendation", "Categorical features"],
};

const TRANSFORMER: LayerTypeDescriptor = LayerTypeDescriptor {
    layer_type: LayerType::Transformer,
    label: "Transformer Block",
    icon: "⚡",
    category: LayerCategory::Other,
    description: "Self-attention followed by a position-wise feed-forward network",
    required_fields: &["heads", "keyDim", "ffDim"],
    common_uses: &["Language models", "Vision transformers"],
};

const ATTENTION: LayerTypeDescriptor = LayerTypeDescriptor {
    layer_type: LayerType::Attention,
    label: "Multi-Head Attention",
    icon: "🎯",
    category: LayerCategory::Other,
    description: "Multi-head self-attention over the sequence dimension",
    required_fields: &["heads", "keyDim"],
    common_uses: &["Sequence models", "Feature mixing"],
};

const RESIDUAL: LayerTypeDescriptor = LayerTypeDescriptor {
    layer_type: LayerType::Residual,
    label: "Residual Connection",
    icon: "↪️",
    category: LayerCategory::Other,
    description: "Marks a skip connection; the source activation is wired by hand",
    required_fields: &[],
    common_uses: &["ResNets", "Deep networks"],
};

const GLOBAL_AVG_POOL: LayerTypeDescriptor = LayerTypeDescriptor {
    layer_type: LayerType::GlobalAvgPool,
    label: "Global Average Pooling",
    icon: "🌐",
    category: LayerCategory::Pooling,
    description: "Averages each feature map down to a single value",
    required_fields: &[],
    common_uses: &["Replacing flatten before the head", "Modern CNNs"],
};

const GLOBAL_MAX_POOL: LayerTypeDescriptor = LayerTypeDescriptor {
    layer_type: LayerType::GlobalMaxPool,
    label: "Global Max Pooling",
    icon: "🔝",
    category: LayerCategory::Pooling,
    description: "Takes the maximum of each feature map",
    required_fields: &[],
    common_uses: &["Detecting presence of features"],
};

// ── Lookup ─────────────────────────────────────────────────────────

/// Returns the descriptor for a layer type.
pub fn describe(layer_type: LayerType) -> &'static LayerTypeDescriptor {
    match layer_type {
        LayerType::Input => &INPUT,
        LayerType::Dense => &DENSE,
        LayerType::Conv2d => &CONV2D,
        LayerType::Conv3d => &CONV3D,
        LayerType::Dropout => &DROPOUT,
        LayerType::Flatten => &FLATTEN,
        LayerType::Pooling => &POOLING,
        LayerType::BatchNorm => &BATCH_NORM,
        LayerType::Lstm => &LSTM,
        LayerType::Gru => &GRU,
        LayerType::Embedding => &EMBEDDING,
        LayerType::Transformer => &TRANSFORMER,
        LayerType::Attention => &ATTENTION,
        LayerType::Residual => &RESIDUAL,
        LayerType::GlobalAvgPool => &GLOBAL_AVG_POOL,
        LayerType::GlobalMaxPool => &GLOBAL_MAX_POOL,
    }
}

/// Iterates over all descriptors in palette order.
pub fn all() -> impl Iterator<Item = &'static LayerTypeDescriptor> {
    LayerType::ALL.into_iter().map(describe)
}

/// Creates a new layer of the given type with default fields and a fresh id.
pub fn instantiate(layer_type: LayerType) -> LayerSpec {
    let layer = LayerSpec::new(describe(layer_type).default_kind());
    tracing::debug!("instantiated {} layer '{}'", layer_type, layer.id);
    layer
}

/// Groups descriptors by category, categories in order of first appearance.
pub fn by_category() -> Vec<(LayerCategory, Vec<&'static LayerTypeDescriptor>)> {
    let mut groups: Vec<(LayerCategory, Vec<&'static LayerTypeDescriptor>)> = Vec::new();
    for d in all() {
        match groups.iter_mut().find(|(c, _)| *c == d.category) {
            Some((_, members)) => members.push(d),
            None => groups.push((d.category, vec![d])),
        }
    }
    groups
}

/// Case-insensitive search over label, description and category.
///
/// An empty or whitespace-only query matches everything.
pub fn search(query: &str) -> Vec<&'static LayerTypeDescriptor> {
    let needle = query.trim().to_lowercase();
    all().filter(|d| needle.is_empty() || d.matches(&needle)).collect()
}

fn default_kind(layer_type: LayerType) -> LayerKind {
    match layer_type {
        LayerType::Input => LayerKind::Input(InputParams {
            shape: "28,28,1".into(),
            preprocessing: Some(Preprocessing::Passthrough),
            batch_size: None,
        }),
        LayerType::Dense => LayerKind::Dense(DenseParams {
            units: 128,
            activation: Some(Activation::Relu),
            use_bias: Some(true),
            kernel_initializer: None,
            bias_initializer: None,
            kernel_regularizer: None,
            activity_regularizer: None,
        }),
        LayerType::Conv2d => LayerKind::Conv2d(default_conv()),
        LayerType::Conv3d => LayerKind::Conv3d(default_conv()),
        LayerType::Dropout => LayerKind::Dropout(DropoutParams {
            rate: 0.5,
            noise_shape: None,
            seed: None,
        }),
        LayerType::Flatten => LayerKind::Flatten,
        LayerType::Pooling => LayerKind::Pooling(PoolingParams {
            pool_type: PoolType::Max,
            pool_size: 2,
            strides: Some(2),
            padding: Some(Padding::Valid),
        }),
        LayerType::BatchNorm => LayerKind::BatchNorm(BatchNormParams {
            momentum: Some(0.99),
            epsilon: Some(0.001),
            center: Some(true),
            scale: Some(true),
        }),
        LayerType::Lstm => LayerKind::Lstm(default_recurrent()),
        LayerType::Gru => LayerKind::Gru(default_recurrent()),
        LayerType::Embedding => LayerKind::Embedding(EmbeddingParams {
            input_dim: Some(10_000),
            output_dim: Some(128),
            input_length: None,
        }),
        LayerType::Transformer => LayerKind::Transformer(TransformerParams {
            heads: 8,
            key_dim: 64,
            ff_dim: 2048,
            dropout: Some(0.1),
            use_positional_encoding: Some(true),
        }),
        LayerType::Attention => LayerKind::Attention(AttentionParams {
            heads: 8,
            key_dim: 64,
            dropout: Some(0.0),
            use_causal_mask: Some(false),
        }),
        LayerType::Residual => LayerKind::Residual,
        LayerType::GlobalAvgPool => LayerKind::GlobalAvgPool,
        LayerType::GlobalMaxPool => LayerKind::GlobalMaxPool,
    }
}

fn default_conv() -> ConvParams {
    ConvParams {
        filters: 32,
        kernel_size: 3,
        strides: Some(1),
        padding: Some(Padding::Valid),
        activation: Some(Activation::Relu),
        use_bias: Some(true),
        kernel_initializer: None,
        bias_initializer: None,
        kernel_regularizer: None,
        batch_norm: None,
    }
}

fn default_recurrent() -> RecurrentParams {
    RecurrentParams {
        units: 64,
        return_sequences: Some(false),
        return_state: None,
        go_backwards: None,
        stateful: None,
        dropout: Some(0.0),
        recurrent_dropout: Some(0.0),
        activation: None,
        recurrent_activation: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_is_total_and_consistent() {
        for t in LayerType::ALL {
            let d = describe(t);
            assert_eq!(d.layer_type, t);
            assert_eq!(d.default_kind().layer_type(), t);
            assert!(!d.label.is_empty());
            assert!(!d.description.is_empty());
        }
    }

    #[test]
    fn test_defaults_validate() {
        for t in LayerType::ALL {
            instantiate(t).validate().unwrap();
        }
    }

    #[test]
    fn test_required_fields_present_in_defaults() {
        for d in all() {
            let json = serde_json::to_value(instantiate(d.layer_type)).unwrap();
            for field in d.required_fields {
                assert!(
                    json.get(*field).is_some(),
                    "{} default lacks required field '{field}'",
                    d.layer_type,
                );
            }
        }
    }

    #[test]
    fn test_instantiate_fresh_ids_and_independent_values() {
        let mut a = instantiate(LayerType::Dense);
        let b = instantiate(LayerType::Dense);
        assert_ne!(a.id, b.id);

        if let LayerKind::Dense(p) = &mut a.kind {
            p.units = 7;
        }
        match &b.kind {
            LayerKind::Dense(p) => assert_eq!(p.units, 128),
            other => panic!("expected dense, got {other:?}"),
        }
    }

    #[test]
    fn test_by_category_covers_all() {
        let groups = by_category();
        let total: usize = groups.iter().map(|(_, m)| m.len()).sum();
        assert_eq!(total, LayerType::ALL.len());
        assert_eq!(groups[0].0, LayerCategory::Input);

        let pooling = groups
            .iter()
            .find(|(c, _)| *c == LayerCategory::Pooling)
            .unwrap();
        assert_eq!(pooling.1.len(), 3);
    }

    #[test]
    fn test_search() {
        assert_eq!(search("").len(), LayerType::ALL.len());
        let rec: Vec<_> = search("RECURRENT").iter().map(|d| d.layer_type).collect();
        assert_eq!(rec, vec![LayerType::Lstm, LayerType::Gru]);
        assert!(search("image").iter().any(|d| d.layer_type == LayerType::Conv2d));
        assert!(search("no-such-layer").is_empty());
    }
}
