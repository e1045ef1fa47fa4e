// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The closed set of export targets.

use crate::CodegenError;
use std::fmt;

/// A framework that code can be generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    PyTorch,
    Keras,
    TensorFlow,
    Jax,
    Onnx,
}

impl Target {
    pub const ALL: [Target; 5] = [
        Self::PyTorch,
        Self::Keras,
        Self::TensorFlow,
        Self::Jax,
        Self::Onnx,
    ];

    /// The canonical tag, as used in file names and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PyTorch => "pytorch",
            Self::Keras => "keras",
            Self::TensorFlow => "tensorflow",
            Self::Jax => "jax",
            Self::Onnx => "onnx",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::PyTorch => "PyTorch",
            Self::Keras => "Keras",
            Self::TensorFlow => "TensorFlow",
            Self::Jax => "JAX/Flax",
            Self::Onnx => "ONNX",
        }
    }

    /// File extension of the generated artifact.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Onnx => "txt",
            Self::PyTorch | Self::Keras | Self::TensorFlow | Self::Jax => "py",
        }
    }

    /// Parses a target tag, case-insensitively, accepting a few aliases
    /// (`torch`, `tf`, `flax`).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pytorch" | "torch" => Some(Self::PyTorch),
            "keras" => Some(Self::Keras),
            "tensorflow" | "tf" => Some(Self::TensorFlow),
            "jax" | "flax" => Some(Self::Jax),
            "onnx" => Some(Self::Onnx),
            _ => None,
        }
    }
}

impl std::str::FromStr for Target {
    type Err = CodegenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_loose(s).ok_or_else(|| CodegenError::UnsupportedTarget(s.to_string()))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        for t in Target::ALL {
            assert_eq!(t.as_str().parse::<Target>().unwrap(), t);
        }
        assert_eq!("Torch".parse::<Target>().unwrap(), Target::PyTorch);
        assert_eq!(" TF ".parse::<Target>().unwrap(), Target::TensorFlow);
        assert_eq!("flax".parse::<Target>().unwrap(), Target::Jax);
    }

    #[test]
    fn test_unknown_target() {
        let err = "caffe".parse::<Target>().unwrap_err();
        assert!(matches!(err, CodegenError::UnsupportedTarget(ref t) if t == "caffe"));
    }

    #[test]
    fn test_extensions() {
        assert_eq!(Target::Onnx.extension(), "txt");
        for t in [Target::PyTorch, Target::Keras, Target::TensorFlow, Target::Jax] {
            assert_eq!(t.extension(), "py");
        }
    }

    #[test]
    fn test_serde_matches_as_str() {
        for t in Target::ALL {
            assert_eq!(serde_json::to_string(&t).unwrap(), format!("\"{t}\""));
        }
    }
}
