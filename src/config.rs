//! Pipeline configuration management.
//!
//! One serializable struct covering every stage of dataset preparation,
//! so an experiment can be reproduced from a single file.
//!
//! # Example
//!
//! ```ignore
//! use landmark_extractor::config::PipelineConfig;
//!
//! let config = PipelineConfig::default();
//! config.save_toml("experiment_config.toml")?;
//!
//! let loaded = PipelineConfig::load_toml("experiment_config.toml")?;
//! let builder = BatchBuilder::from_config(&loaded)?;
//! ```
//!
//! A TOML file looks like:
//!
//! ```toml
//! [sequence]
//! feature_width = 63
//! target_length = 30
//!
//! [fields]
//! landmarks = ["landmarkData", "landmarks"]
//! label = ["gestureDefinitionId", "label"]
//! default_label = "0"
//! records = ["gestureTrainingData"]
//!
//! [batch]
//! error_mode = "fail_fast"
//! parallel = false
//!
//! [export]
//! inputs = ["data/training.json"]
//! output_dir = "out/dataset"
//! ```

use crate::batch::BatchConfig;
use crate::error::{DatasetError, Result};
use crate::record::FieldConfig;
use crate::sequence_builder::SequenceConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Unified pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PipelineConfig {
    /// Sequence shape
    #[serde(default)]
    pub sequence: SequenceConfig,

    /// Record field names
    #[serde(default)]
    pub fields: FieldConfig,

    /// Batch building behaviour
    #[serde(default)]
    pub batch: BatchConfig,

    /// Input and output locations (optional - can be set programmatically)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<ExportConfig>,

    /// Experiment metadata (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ExperimentMetadata>,
}

/// Where to read records from and where to write the dataset.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExportConfig {
    /// Dataset JSON files, concatenated in this order
    pub inputs: Vec<PathBuf>,

    /// Output directory for `.npy` files and metadata
    pub output_dir: PathBuf,
}

impl ExportConfig {
    pub fn new<P: AsRef<Path>>(inputs: Vec<PathBuf>, output_dir: P) -> Self {
        Self {
            inputs,
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.inputs.is_empty() {
            return Err("export.inputs must list at least one dataset file".to_string());
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err("export.output_dir cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Experiment metadata for tracking and reproducibility.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExperimentMetadata {
    /// Experiment name
    pub name: String,

    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Creation timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Version or git commit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Custom tags
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl ExperimentMetadata {
    /// Metadata stamped with the current time.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            created_at: Some(chrono::Utc::now().to_rfc3339()),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
            tags: None,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metadata(mut self, metadata: ExperimentMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_sequence(mut self, config: SequenceConfig) -> Self {
        self.sequence = config;
        self
    }

    pub fn with_fields(mut self, config: FieldConfig) -> Self {
        self.fields = config;
        self
    }

    pub fn with_batch(mut self, config: BatchConfig) -> Self {
        self.batch = config;
        self
    }

    pub fn with_export(mut self, config: ExportConfig) -> Self {
        self.export = Some(config);
        self
    }

    /// Validate the configuration.
    ///
    /// Returns Ok(()) if valid, Err(msg) otherwise.
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.sequence.validate()?;
        self.fields.validate()?;
        self.batch.validate()?;

        if let Some(export) = &self.export {
            export.validate()?;
        }

        Ok(())
    }

    /// Save configuration to TOML file.
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)?;
        fs::write(path, toml_string)?;
        Ok(())
    }

    /// Load configuration from TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: PipelineConfig = toml::from_str(&contents)?;
        config.validate().map_err(DatasetError::InvalidConfig)?;
        Ok(config)
    }

    /// Save configuration to JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json_string = serde_json::to_string_pretty(self)?;
        fs::write(path, json_string)?;
        Ok(())
    }

    /// Load configuration from JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: PipelineConfig = serde_json::from_str(&contents)?;
        config.validate().map_err(DatasetError::InvalidConfig)?;
        Ok(config)
    }
}
