// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Layer definitions for the architecture IR.
//!
//! A [`LayerSpec`] is one entry in the forward-pass sequence. Its kind is an
//! explicit tagged union ([`LayerKind`]): each variant owns exactly the
//! fields that kind understands, so a dense layer can never carry a
//! `kernelSize` and every consumer must match exhaustively.
//!
//! # Wire format
//! ```json
//! { "id": "layer-1f0c…", "type": "dense", "units": 128, "activation": "relu" }
//! ```
//! The discriminant lives in `"type"`; kind fields sit next to `id`/`name`
//! in camelCase. Absent optional fields stay absent when re-serialised.

use crate::types::{Activation, Padding, PoolType, Preprocessing, RegularizerKind};
use crate::IrError;
use std::fmt;

// ── Identity ───────────────────────────────────────────────────────

/// Stable, unique identifier of a layer. Never changes once assigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct LayerId(String);

impl LayerId {
    /// Generates a fresh random id of the form `layer-<uuid>`.
    pub fn generate() -> Self {
        Self(format!("layer-{}", uuid::Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for LayerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Layer kinds ────────────────────────────────────────────────────

/// The discriminant of a [`LayerKind`], without any fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerType {
    Input,
    Dense,
    Conv2d,
    Conv3d,
    Dropout,
    Flatten,
    Pooling,
    BatchNorm,
    Lstm,
    Gru,
    Embedding,
    Transformer,
    Attention,
    Residual,
    GlobalAvgPool,
    GlobalMaxPool,
}

impl LayerType {
    /// Every layer type, in palette order.
    pub const ALL: [LayerType; 16] = [
        Self::Input,
        Self::Dense,
        Self::Conv2d,
        Self::Conv3d,
        Self::Dropout,
        Self::Flatten,
        Self::Pooling,
        Self::BatchNorm,
        Self::Lstm,
        Self::Gru,
        Self::Embedding,
        Self::Transformer,
        Self::Attention,
        Self::Residual,
        Self::GlobalAvgPool,
        Self::GlobalMaxPool,
    ];

    /// Returns the wire-format tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Dense => "dense",
            Self::Conv2d => "conv2d",
            Self::Conv3d => "conv3d",
            Self::Dropout => "dropout",
            Self::Flatten => "flatten",
            Self::Pooling => "pooling",
            Self::BatchNorm => "batchnorm",
            Self::Lstm => "lstm",
            Self::Gru => "gru",
            Self::Embedding => "embedding",
            Self::Transformer => "transformer",
            Self::Attention => "attention",
            Self::Residual => "residual",
            Self::GlobalAvgPool => "globalavgpool",
            Self::GlobalMaxPool => "globalmaxpool",
        }
    }

    /// Parses a layer type, accepting common aliases besides the wire tag
    /// (`"fc"`, `"linear"`, `"conv"`, `"bn"`, `"mha"`, `"gap"`, ...).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(|c: char| c == '_' || c == '-', "").as_str() {
            "input" | "inputlayer" => Some(Self::Input),
            "dense" | "fc" | "linear" => Some(Self::Dense),
            "conv2d" | "conv" => Some(Self::Conv2d),
            "conv3d" => Some(Self::Conv3d),
            "dropout" => Some(Self::Dropout),
            "flatten" => Some(Self::Flatten),
            "pooling" | "pool" | "maxpool" | "avgpool" => Some(Self::Pooling),
            "batchnorm" | "batchnormalization" | "bn" => Some(Self::BatchNorm),
            "lstm" => Some(Self::Lstm),
            "gru" => Some(Self::Gru),
            "embedding" | "embed" => Some(Self::Embedding),
            "transformer" | "transformerblock" => Some(Self::Transformer),
            "attention" | "mha" | "multiheadattention" => Some(Self::Attention),
            "residual" | "skip" => Some(Self::Residual),
            "globalavgpool" | "gap" => Some(Self::GlobalAvgPool),
            "globalmaxpool" | "gmp" => Some(Self::GlobalMaxPool),
            _ => None,
        }
    }
}

impl std::str::FromStr for LayerType {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_loose(s).ok_or_else(|| IrError::UnknownLayerType(s.to_string()))
    }
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weight penalty attached to a kernel or activity.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RegularizerConfig {
    #[serde(rename = "type")]
    pub kind: RegularizerKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub l1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub l2: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputParams {
    /// Comma-separated dimensions, e.g. `"224,224,3"`.
    pub shape: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preprocessing: Option<Preprocessing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<u32>,
}

impl InputParams {
    /// Parses `shape` into its dimensions.
    ///
    /// Tolerates surrounding brackets/parentheses and whitespace, so
    /// `"28,28,1"`, `"[28, 28, 1]"` and `"(28,28,1)"` are equivalent.
    pub fn dims(&self) -> Result<Vec<u32>, String> {
        let inner = self
            .shape
            .trim()
            .trim_start_matches(|c: char| c == '[' || c == '(')
            .trim_end_matches(|c: char| c == ']' || c == ')');
        if inner.trim().is_empty() {
            return Err("input shape is empty".into());
        }
        inner
            .split(',')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(|d| match d.parse::<u32>() {
                Ok(0) => Err(format!("input dimension '{d}' must be positive")),
                Ok(n) => Ok(n),
                Err(_) => Err(format!("input dimension '{d}' is not an integer")),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DenseParams {
    pub units: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation: Option<Activation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_bias: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kernel_initializer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bias_initializer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kernel_regularizer: Option<RegularizerConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_regularizer: Option<RegularizerConfig>,
}

/// Fields shared by 2-D and 3-D convolutions.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvParams {
    pub filters: u32,
    pub kernel_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strides: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<Padding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation: Option<Activation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_bias: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kernel_initializer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bias_initializer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kernel_regularizer: Option<RegularizerConfig>,
    /// Follow the convolution with batch normalisation over its filters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_norm: Option<bool>,
}

impl ConvParams {
    pub fn has_batch_norm(&self) -> bool {
        self.batch_norm == Some(true)
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropoutParams {
    pub rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise_shape: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolingParams {
    pub pool_type: PoolType,
    pub pool_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strides: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<Padding>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchNormParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub momentum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epsilon: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<bool>,
}

/// Fields shared by LSTM and GRU layers.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrentParams {
    pub units: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_sequences: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_state: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub go_backwards: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stateful: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropout: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrent_dropout: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation: Option<Activation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrent_activation: Option<Activation>,
}

impl RecurrentParams {
    pub fn returns_sequences(&self) -> bool {
        self.return_sequences.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_dim: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dim: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_length: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformerParams {
    pub heads: u32,
    pub key_dim: u32,
    pub ff_dim: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropout: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_positional_encoding: Option<bool>,
}

impl TransformerParams {
    /// `heads * keyDim`, widened so large values cannot overflow.
    pub fn model_dim(&self) -> u64 {
        u64::from(self.heads) * u64::from(self.key_dim)
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttentionParams {
    pub heads: u32,
    pub key_dim: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropout: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_causal_mask: Option<bool>,
}

impl AttentionParams {
    /// `heads * keyDim`, widened so large values cannot overflow.
    pub fn model_dim(&self) -> u64 {
        u64::from(self.heads) * u64::from(self.key_dim)
    }
}

/// Kind-specific payload of a layer, discriminated by `"type"` on the wire.
///
/// `Residual`, `Attention` and `Transformer` are flat sequence entries:
/// they do not record which earlier activation they connect back to.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LayerKind {
    Input(InputParams),
    Dense(DenseParams),
    Conv2d(ConvParams),
    Conv3d(ConvParams),
    Dropout(DropoutParams),
    Flatten,
    Pooling(PoolingParams),
    BatchNorm(BatchNormParams),
    Lstm(RecurrentParams),
    Gru(RecurrentParams),
    Embedding(EmbeddingParams),
    Transformer(TransformerParams),
    Attention(AttentionParams),
    Residual,
    GlobalAvgPool,
    GlobalMaxPool,
}

impl LayerKind {
    /// Returns the discriminant of this kind.
    pub fn layer_type(&self) -> LayerType {
        match self {
            Self::Input(_) => LayerType::Input,
            Self::Dense(_) => LayerType::Dense,
            Self::Conv2d(_) => LayerType::Conv2d,
            Self::Conv3d(_) => LayerType::Conv3d,
            Self::Dropout(_) => LayerType::Dropout,
            Self::Flatten => LayerType::Flatten,
            Self::Pooling(_) => LayerType::Pooling,
            Self::BatchNorm(_) => LayerType::BatchNorm,
            Self::Lstm(_) => LayerType::Lstm,
            Self::Gru(_) => LayerType::Gru,
            Self::Embedding(_) => LayerType::Embedding,
            Self::Transformer(_) => LayerType::Transformer,
            Self::Attention(_) => LayerType::Attention,
            Self::Residual => LayerType::Residual,
            Self::GlobalAvgPool => LayerType::GlobalAvgPool,
            Self::GlobalMaxPool => LayerType::GlobalMaxPool,
        }
    }

    /// The activation configured on this layer, if the kind has one.
    pub fn activation(&self) -> Option<Activation> {
        match self {
            Self::Dense(p) => p.activation,
            Self::Conv2d(p) | Self::Conv3d(p) => p.activation,
            Self::Lstm(p) | Self::Gru(p) => p.activation,
            _ => None,
        }
    }

    /// Short `key=value` rendering of the kind's main fields.
    pub fn describe_params(&self) -> String {
        fn with_activation(mut s: String, a: Option<Activation>) -> String {
            if let Some(a) = a {
                s.push_str(&format!(", activation={a}"));
            }
            s
        }

        match self {
            Self::Input(p) => format!("shape=({})", p.shape),
            Self::Dense(p) => with_activation(format!("units={}", p.units), p.activation),
            Self::Conv2d(p) | Self::Conv3d(p) => {
                let mut s = with_activation(
                    format!(
                        "filters={}, kernel_size={}, strides={}, padding={}",
                        p.filters,
                        p.kernel_size,
                        p.strides.unwrap_or(1),
                        p.padding.unwrap_or(Padding::Valid),
                    ),
                    p.activation,
                );
                if p.has_batch_norm() {
                    s.push_str(", batch_norm");
                }
                s
            }
            Self::Dropout(p) => format!("rate={}", p.rate),
            Self::Pooling(p) => format!(
                "pool_type={}, pool_size={}, strides={}",
                p.pool_type,
                p.pool_size,
                p.strides.unwrap_or(p.pool_size),
            ),
            Self::BatchNorm(p) => format!(
                "momentum={}, epsilon={}",
                p.momentum.unwrap_or(0.99),
                p.epsilon.unwrap_or(0.001),
            ),
            Self::Lstm(p) | Self::Gru(p) => format!(
                "units={}, return_sequences={}",
                p.units,
                p.returns_sequences(),
            ),
            Self::Embedding(p) => format!(
                "input_dim={}, output_dim={}",
                p.input_dim.map_or("?".into(), |d| d.to_string()),
                p.output_dim.map_or("?".into(), |d| d.to_string()),
            ),
            Self::Transformer(p) => format!(
                "heads={}, key_dim={}, ff_dim={}",
                p.heads, p.key_dim, p.ff_dim
            ),
            Self::Attention(p) => format!("heads={}, key_dim={}", p.heads, p.key_dim),
            Self::Flatten | Self::Residual | Self::GlobalAvgPool | Self::GlobalMaxPool => {
                String::new()
            }
        }
    }
}

// ── LayerSpec ──────────────────────────────────────────────────────

/// One layer of the network: identity plus kind-specific fields.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayerSpec {
    pub id: LayerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trainable: Option<bool>,
    #[serde(flatten)]
    pub kind: LayerKind,
}

impl LayerSpec {
    /// Creates a layer with a freshly generated id.
    pub fn new(kind: LayerKind) -> Self {
        Self {
            id: LayerId::generate(),
            name: None,
            trainable: None,
            kind,
        }
    }

    /// Sets the display name (builder style).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Overrides the generated id (builder style). Mostly useful in tests
    /// and when importing layers whose ids are already known.
    pub fn with_id(mut self, id: impl Into<LayerId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn layer_type(&self) -> LayerType {
        self.kind.layer_type()
    }

    /// The name if set, otherwise the id. Used in messages.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(self.id.as_str())
    }

    /// Checks required fields of this layer.
    ///
    /// Required numeric fields must be positive; rates must lie in `[0, 1)`;
    /// the input shape must parse. Optional fields are only checked when
    /// present, since emitters substitute documented defaults for them.
    pub fn validate(&self) -> Result<(), IrError> {
        let fail = |detail: String| IrError::InvalidLayer {
            layer: self.label().to_string(),
            detail,
        };
        let positive = |field: &str, v: u32| {
            if v == 0 {
                Err(fail(format!("'{field}' must be a positive integer")))
            } else {
                Ok(())
            }
        };
        let rate = |field: &str, v: Option<f64>| match v {
            Some(r) if !(0.0..1.0).contains(&r) => {
                Err(fail(format!("'{field}' must be in [0, 1), got {r}")))
            }
            _ => Ok(()),
        };

        match &self.kind {
            LayerKind::Input(p) => {
                p.dims().map_err(&fail)?;
            }
            LayerKind::Dense(p) => positive("units", p.units)?,
            LayerKind::Conv2d(p) | LayerKind::Conv3d(p) => {
                positive("filters", p.filters)?;
                positive("kernelSize", p.kernel_size)?;
                if let Some(s) = p.strides {
                    positive("strides", s)?;
                }
            }
            LayerKind::Dropout(p) => rate("rate", Some(p.rate))?,
            LayerKind::Pooling(p) => {
                positive("poolSize", p.pool_size)?;
                if let Some(s) = p.strides {
                    positive("strides", s)?;
                }
            }
            LayerKind::BatchNorm(p) => {
                if let Some(e) = p.epsilon {
                    if e <= 0.0 {
                        return Err(fail(format!("'epsilon' must be positive, got {e}")));
                    }
                }
            }
            LayerKind::Lstm(p) | LayerKind::Gru(p) => {
                positive("units", p.units)?;
                rate("dropout", p.dropout)?;
                rate("recurrentDropout", p.recurrent_dropout)?;
            }
            LayerKind::Embedding(p) => {
                if let Some(d) = p.input_dim {
                    positive("inputDim", d)?;
                }
                if let Some(d) = p.output_dim {
                    positive("outputDim", d)?;
                }
            }
            LayerKind::Transformer(p) => {
                positive("heads", p.heads)?;
                positive("keyDim", p.key_dim)?;
                positive("ffDim", p.ff_dim)?;
                rate("dropout", p.dropout)?;
            }
            LayerKind::Attention(p) => {
                positive("heads", p.heads)?;
                positive("keyDim", p.key_dim)?;
                rate("dropout", p.dropout)?;
            }
            LayerKind::Flatten
            | LayerKind::Residual
            | LayerKind::GlobalAvgPool
            | LayerKind::GlobalMaxPool => {}
        }
        Ok(())
    }

    /// Returns a copy of this layer with `patch` merged in.
    ///
    /// The patch is a field-level overlay in wire-format names. Entries for
    /// `id` and `type` are discarded: a patch can never change a layer's
    /// identity or kind. Setting a field this layer's kind does not have is
    /// an error. The merged layer must deserialise and validate, otherwise
    /// the original is left as it was and an error is returned.
    pub fn patched(&self, patch: &LayerPatch) -> Result<LayerSpec, IrError> {
        let invalid = |detail: String| IrError::InvalidPatch {
            layer: self.label().to_string(),
            detail,
        };

        let mut value = serde_json::to_value(self)?;
        let obj = value
            .as_object_mut()
            .ok_or_else(|| invalid("layer did not serialise to an object".into()))?;

        for (key, v) in patch.fields() {
            if key == "id" || key == "type" {
                tracing::warn!("ignoring '{key}' in patch for layer '{}'", self.id);
                continue;
            }
            if v.is_null() {
                obj.remove(key);
            } else {
                obj.insert(key.clone(), v.clone());
            }
        }

        let merged: LayerSpec =
            serde_json::from_value(value).map_err(|e| invalid(e.to_string()))?;

        // Fields the kind does not know are dropped by deserialisation, so
        // any set key missing after a re-serialise is a foreign field.
        let known = serde_json::to_value(&merged)?;
        if let Some(key) = patch
            .fields()
            .filter(|(k, v)| !v.is_null() && k.as_str() != "id" && k.as_str() != "type")
            .map(|(k, _)| k)
            .find(|k| known.get(k.as_str()).is_none())
        {
            return Err(invalid(format!(
                "unknown field '{key}' for {}",
                self.layer_type()
            )));
        }

        merged.validate()?;
        Ok(merged)
    }

    /// Returns a concise summary string for display.
    pub fn summary(&self) -> String {
        let params = self.kind.describe_params();
        match (&self.name, params.is_empty()) {
            (Some(name), true) => format!("{} '{}'", self.layer_type(), name),
            (Some(name), false) => format!("{} '{}' ({params})", self.layer_type(), name),
            (None, true) => self.layer_type().to_string(),
            (None, false) => format!("{} ({params})", self.layer_type()),
        }
    }
}

/// A field-level update for a single layer, keyed by wire-format names.
///
/// A `null` value clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct LayerPatch(serde_json::Map<String, serde_json::Value>);

impl LayerPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one field to the patch (builder style).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Parses a patch from a JSON object string.
    pub fn from_json(json: &str) -> Result<Self, IrError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
