// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The five [`Emitter`](crate::Emitter) implementations.

pub mod jax;
pub mod keras;
pub mod onnx;
pub mod pytorch;
pub mod tensorflow;

pub use jax::JaxEmitter;
pub use keras::KerasEmitter;
pub use onnx::OnnxEmitter;
pub use pytorch::PyTorchEmitter;
pub use tensorflow::TensorFlowEmitter;
