// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Dataset and model records.

use crate::store::CatalogEntry;
use crate::CatalogError;
use network_ir::NetworkConfig;
use std::collections::BTreeMap;
use std::fmt;

/// Broad kind of data a dataset holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetType {
    Images,
    Csv,
    Text,
    Audio,
    Video,
    Custom,
}

impl DatasetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Images => "images",
            Self::Csv => "csv",
            Self::Text => "text",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for DatasetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary counts for a dataset.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetStats {
    pub total_files: u64,
    pub num_classes: u32,
    /// Sample count per class label.
    #[serde(default)]
    pub classes: BTreeMap<String, u64>,
}

/// A dataset as opaque metadata. Nothing here reads the data itself.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub dataset_type: DatasetType,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub stats: DatasetStats,
    /// Per-example shape in input-layer syntax, e.g. `"28,28,1"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation: Option<String>,
    #[serde(default)]
    pub created_at_ms: u64,
    #[serde(default)]
    pub updated_at_ms: u64,
}

impl DatasetRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, dataset_type: DatasetType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            dataset_type,
            files: Vec::new(),
            stats: DatasetStats::default(),
            shape: None,
            description: None,
            task: None,
            size: None,
            citation: None,
            created_at_ms: 0,
            updated_at_ms: 0,
        }
    }

    /// The built-in sample datasets.
    pub fn samples() -> Vec<DatasetRecord> {
        #[rustfmt::skip]
        let table: [(&str, &str, &str, DatasetType, &str, u64, u32, &str, &str, Option<&str>); 6] = [
            ("mnist", "MNIST", "Handwritten digit recognition", DatasetType::Images, "classification", 70_000, 10, "11 MB", "28,28,1", Some("LeCun et al., 1998")),
            ("cifar10", "CIFAR-10", "60,000 32x32 color images in 10 classes", DatasetType::Images, "classification", 60_000, 10, "163 MB", "32,32,3", Some("Krizhevsky, 2009")),
            ("imdb", "IMDB Reviews", "Movie review sentiment classification", DatasetType::Text, "nlp-classification", 50_000, 2, "80 MB", "variable", Some("Maas et al., 2011")),
            ("fashionmnist", "Fashion-MNIST", "Fashion product images", DatasetType::Images, "classification", 70_000, 10, "29 MB", "28,28,1", Some("Xiao et al., 2017")),
            ("iris", "Iris", "Classic iris flower dataset", DatasetType::Csv, "classification", 150, 3, "5 KB", "4", Some("Fisher, 1936")),
            ("titanic", "Titanic", "Passenger survival prediction", DatasetType::Csv, "classification", 891, 2, "60 KB", "11", None),
        ];
        table
            .into_iter()
            .map(
                |(id, name, description, dataset_type, task, files, classes, size, shape, citation)| {
                    DatasetRecord {
                        stats: DatasetStats {
                            total_files: files,
                            num_classes: classes,
                            classes: BTreeMap::new(),
                        },
                        shape: Some(shape.into()),
                        description: Some(description.into()),
                        task: Some(task.into()),
                        size: Some(size.into()),
                        citation: citation.map(String::from),
                        ..DatasetRecord::new(id, name, dataset_type)
                    }
                },
            )
            .collect()
    }
}

fn require(field: &str, value: &str) -> Result<(), CatalogError> {
    if value.trim().is_empty() {
        return Err(CatalogError::ValidationError(format!(
            "missing required field '{field}'"
        )));
    }
    Ok(())
}

impl CatalogEntry for DatasetRecord {
    const KIND: &'static str = "dataset";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), CatalogError> {
        require("id", &self.id)?;
        require("name", &self.name)
    }

    fn created_at_ms(&self) -> u64 {
        self.created_at_ms
    }

    fn stamp(&mut self, created_at_ms: u64, updated_at_ms: u64) {
        self.created_at_ms = created_at_ms;
        self.updated_at_ms = updated_at_ms;
    }
}

/// A saved network architecture.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRecord {
    pub id: String,
    pub name: String,
    pub architecture: NetworkConfig,
    /// Free-form caller data, stored as given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    #[serde(default)]
    pub created_at_ms: u64,
    #[serde(default)]
    pub updated_at_ms: u64,
}

impl ModelRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, architecture: NetworkConfig) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            architecture,
            metadata: None,
            created_at_ms: 0,
            updated_at_ms: 0,
        }
    }
}

impl CatalogEntry for ModelRecord {
    const KIND: &'static str = "model";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), CatalogError> {
        require("id", &self.id)?;
        require("name", &self.name)?;
        self.architecture
            .validate()
            .map_err(|e| CatalogError::ValidationError(format!("architecture: {e}")))
    }

    fn created_at_ms(&self) -> u64 {
        self.created_at_ms
    }

    fn stamp(&mut self, created_at_ms: u64, updated_at_ms: u64) {
        self.created_at_ms = created_at_ms;
        self.updated_at_ms = updated_at_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Catalog;
    use network_ir::{registry, LayerType};

    #[test]
    fn test_samples() {
        let samples = DatasetRecord::samples();
        let ids: Vec<&str> = samples.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(
            ids,
            ["mnist", "cifar10", "imdb", "fashionmnist", "iris", "titanic"]
        );
        let cifar = &samples[1];
        assert_eq!(cifar.shape.as_deref(), Some("32,32,3"));
        assert_eq!(cifar.stats.num_classes, 10);
        assert!(samples[5].citation.is_none());
        for s in &samples {
            s.validate().unwrap();
        }
    }

    #[test]
    fn test_sample_shapes_parse_as_input() {
        for s in DatasetRecord::samples() {
            let shape = s.shape.unwrap();
            if shape == "variable" {
                continue;
            }
            let input = network_ir::InputParams {
                shape,
                preprocessing: None,
                batch_size: None,
            };
            assert!(input.dims().is_ok(), "{}", s.id);
        }
    }

    #[test]
    fn test_dataset_wire_format() {
        let d = DatasetRecord::new("x", "X", DatasetType::Csv);
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["type"], "csv");
        assert_eq!(json["stats"]["totalFiles"], 0);
        let back: DatasetRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn test_model_requires_valid_architecture() {
        let mut arch = NetworkConfig::new("m");
        arch.add_layer(registry::instantiate(LayerType::Dense));
        let mut models = Catalog::new();
        models.create(ModelRecord::new("m1", "First", arch)).unwrap();

        let err = models
            .update("m1", |m| m.architecture.hyperparameters.batch_size = 0)
            .unwrap_err();
        assert!(matches!(err, CatalogError::ValidationError(_)));
        assert_eq!(models.get("m1").unwrap().architecture.hyperparameters.batch_size, 32);

        let err = models
            .create(ModelRecord::new("m2", " ", NetworkConfig::default()))
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid record: missing required field 'name'");
    }
}
