// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # network-ir
//!
//! The architecture intermediate representation shared by the editor and
//! the code generators.
//!
//! - [`LayerSpec`] — one layer: a stable [`LayerId`] plus a [`LayerKind`]
//!   tagged union holding exactly the fields that kind understands.
//! - [`NetworkConfig`] — project metadata, the ordered layer sequence, and
//!   [`HyperParameters`], with the edit operations used by the editor.
//! - [`registry`] — static descriptors and defaults for every [`LayerType`].
//! - [`types`] — the closed vocabularies (activations, optimizers, losses, ...).
//!
//! # Wire format
//! A network is persisted as JSON with camelCase field names:
//! ```json
//! {
//!   "project": { "name": "mnist", "taskType": "classification", "dataType": "image" },
//!   "layers": [ { "id": "layer-…", "type": "dense", "units": 10, "activation": "softmax" } ],
//!   "hyperparameters": { "batchSize": 32, "epochs": 10, "learningRate": 0.001,
//!                        "optimizer": "adam", "loss": "categorical_crossentropy",
//!                        "validationSplit": 0.2 }
//! }
//! ```
//!
//! # Example
//! ```
//! use network_ir::{registry, LayerType, NetworkConfig};
//!
//! let mut net = NetworkConfig::new("demo");
//! net.add_layer(registry::instantiate(LayerType::Input));
//! net.add_layer(registry::instantiate(LayerType::Dense));
//! net.validate().unwrap();
//! println!("{}", net.summary());
//! ```

mod error;
pub mod layer;
pub mod network;
pub mod registry;
pub mod types;

pub use error::IrError;
pub use layer::{
    AttentionParams, BatchNormParams, ConvParams, DenseParams, DropoutParams, EmbeddingParams,
    InputParams, LayerId, LayerKind, LayerPatch, LayerSpec, LayerType, PoolingParams,
    RecurrentParams, RegularizerConfig, TransformerParams,
};
pub use network::{
    AugmentationConfig, DataSplitConfig, EarlyStoppingConfig, HyperParameters,
    ModelCheckpointConfig, NetworkConfig, NetworkMetadata, NormalizeConfig, PreprocessingConfig,
    ProjectInfo, ReduceLrConfig, ResizeConfig,
};
pub use registry::{LayerCategory, LayerTypeDescriptor};
pub use types::{
    Activation, DataType, Loss, Metric, MonitorMode, NormalizeMethod, Optimizer, Padding,
    PoolType, Preprocessing, RegularizerKind, ResizeStrategy, TaskType,
};
