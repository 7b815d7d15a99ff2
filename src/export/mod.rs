//! Data Export Module
//!
//! Writes a [`SampleBatch`] to disk for the Python training side.
//!
//! # Output Files
//!
//! | File | Contents |
//! |------|----------|
//! | `features.npy` | `float32 [N, T, F]` normalized sequences |
//! | `labels.npy` | `int32 [N]` class indices |
//! | `label_map.json` | `{token: index}` in index order |
//! | `metadata.json` | shapes, class distribution, batch statistics |
//!
//! With a prefix set, every file name is prefixed (`train_features.npy`,
//! ...), which lets several splits share one directory.
//!
//! # Example
//!
//! ```ignore
//! use landmark_extractor::export::NumpyExporter;
//!
//! let batch = build_batch(&records)?;
//! let result = NumpyExporter::new("out/dataset").export(&batch)?;
//! println!("wrote {}", result.features_path.display());
//! ```

use crate::batch::{BatchStats, SampleBatch};
use crate::config::ExperimentMetadata;
use crate::error::Result;
use crate::labeling::ClassCount;
use crate::schema::{FeatureLayout, SCHEMA_VERSION};
use ndarray_npy::WriteNpyExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Metadata describing an exported dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// Number of samples (first tensor dimension)
    pub n_samples: usize,

    /// Frames per sample
    pub sequence_length: usize,

    /// Values per frame
    pub feature_width: usize,

    /// Number of distinct classes
    pub num_classes: usize,

    /// Tensor shape as written to `features.npy`
    pub features_shape: [usize; 3],

    /// Column names for one frame (only for the standard hand layout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,

    /// Samples per class, in class-index order
    pub class_distribution: Vec<ClassCount>,

    /// Counters from the batch build
    pub stats: BatchStats,

    pub schema_version: String,

    /// Export timestamp (RFC 3339)
    pub export_timestamp: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub experiment: Option<ExperimentMetadata>,
}

impl ExportMetadata {
    /// Describe a batch.
    pub fn for_batch(batch: &SampleBatch) -> Self {
        let (n, t, f) = batch.features.dim();
        let layout = FeatureLayout::hand();
        let feature_names = (f == layout.width()).then(|| layout.feature_names());

        Self {
            n_samples: n,
            sequence_length: t,
            feature_width: f,
            num_classes: batch.num_classes(),
            features_shape: [n, t, f],
            feature_names,
            class_distribution: batch.label_stats().classes,
            stats: batch.stats.clone(),
            schema_version: SCHEMA_VERSION.to_string(),
            export_timestamp: chrono::Utc::now().to_rfc3339(),
            experiment: None,
        }
    }
}

/// Paths written by an export.
#[derive(Debug, Clone)]
pub struct ExportResult {
    pub features_path: PathBuf,
    pub labels_path: PathBuf,
    pub label_map_path: PathBuf,
    pub metadata_path: PathBuf,
    pub metadata: ExportMetadata,
}

/// NumPy exporter - exports to .npy files for Python
#[derive(Debug, Clone)]
pub struct NumpyExporter {
    output_dir: PathBuf,
    prefix: Option<String>,
    experiment: Option<ExperimentMetadata>,
}

impl NumpyExporter {
    /// Create new NumPy exporter
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            prefix: None,
            experiment: None,
        }
    }

    /// Prefix every file name with `{prefix}_`.
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.to_string());
        self
    }

    /// Embed experiment metadata in `metadata.json`.
    pub fn with_experiment(mut self, experiment: ExperimentMetadata) -> Self {
        self.experiment = Some(experiment);
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        match &self.prefix {
            Some(prefix) => self.output_dir.join(format!("{prefix}_{name}")),
            None => self.output_dir.join(name),
        }
    }

    /// Write features, labels, label map and metadata.
    pub fn export(&self, batch: &SampleBatch) -> Result<ExportResult> {
        fs::create_dir_all(&self.output_dir)?;

        let features_path = self.path_for("features.npy");
        let mut writer = BufWriter::new(File::create(&features_path)?);
        batch.features.write_npy(&mut writer)?;
        writer.flush()?;
        log::info!(
            "exported features: {} {:?}",
            features_path.display(),
            batch.features.shape()
        );

        let labels_path = self.path_for("labels.npy");
        let mut writer = BufWriter::new(File::create(&labels_path)?);
        batch.labels.write_npy(&mut writer)?;
        writer.flush()?;
        log::info!(
            "exported labels: {} [{} samples]",
            labels_path.display(),
            batch.labels.len()
        );

        let label_map_path = self.path_for("label_map.json");
        batch.dictionary.save_json(&label_map_path)?;
        log::info!(
            "exported label map: {} [{} classes]",
            label_map_path.display(),
            batch.dictionary.len()
        );

        let mut metadata = ExportMetadata::for_batch(batch);
        metadata.experiment = self.experiment.clone();

        let metadata_path = self.path_for("metadata.json");
        let mut writer = BufWriter::new(File::create(&metadata_path)?);
        serde_json::to_writer_pretty(&mut writer, &metadata)?;
        writer.flush()?;
        log::info!("exported metadata: {}", metadata_path.display());

        Ok(ExportResult {
            features_path,
            labels_path,
            label_map_path,
            metadata_path,
            metadata,
        })
    }
}

/// Convenience function for direct export
pub fn export_to_numpy<P: AsRef<Path>>(batch: &SampleBatch, output_dir: P) -> Result<ExportResult> {
    NumpyExporter::new(output_dir).export(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::build_batch;
    use ndarray::{Array1, Array3};
    use ndarray_npy::ReadNpyExt;
    use serde_json::json;
    use tempfile::TempDir;

    fn small_batch() -> SampleBatch {
        let records = vec![
            json!({"landmarkData": vec![0.25; 63 * 3], "gestureDefinitionId": "wave"}),
            json!({"landmarks": vec![0.5; 63 * 31], "label": "point"}),
            json!({"landmarkData": vec![1.0; 63], "gestureDefinitionId": "wave"}),
        ];
        build_batch(&records).unwrap()
    }

    #[test]
    fn test_export_writes_all_files() {
        let dir = TempDir::new().unwrap();
        let batch = small_batch();
        let result = NumpyExporter::new(dir.path()).export(&batch).unwrap();

        assert!(result.features_path.exists());
        assert!(result.labels_path.exists());
        assert!(result.label_map_path.exists());
        assert!(result.metadata_path.exists());
        assert_eq!(result.features_path, dir.path().join("features.npy"));
    }

    #[test]
    fn test_features_read_back() {
        let dir = TempDir::new().unwrap();
        let batch = small_batch();
        let result = export_to_numpy(&batch, dir.path()).unwrap();

        let features: Array3<f32> =
            Array3::<f32>::read_npy(File::open(&result.features_path).unwrap()).unwrap();
        assert_eq!(features.shape(), &[3, 30, 63]);
        assert_eq!(features, batch.features);

        let labels: Array1<i32> =
            Array1::<i32>::read_npy(File::open(&result.labels_path).unwrap()).unwrap();
        assert_eq!(labels.to_vec(), vec![0, 1, 0]);
    }

    #[test]
    fn test_metadata_accuracy() {
        let dir = TempDir::new().unwrap();
        let batch = small_batch();
        let result = NumpyExporter::new(dir.path())
            .with_experiment(ExperimentMetadata::named("unit"))
            .export(&batch)
            .unwrap();

        let file = File::open(&result.metadata_path).unwrap();
        let metadata: ExportMetadata = serde_json::from_reader(file).unwrap();

        assert_eq!(metadata.features_shape, [3, 30, 63]);
        assert_eq!(metadata.num_classes, 2);
        assert_eq!(metadata.class_distribution[0].token, "wave");
        assert_eq!(metadata.class_distribution[0].count, 2);
        assert_eq!(metadata.stats.padded, 2);
        assert_eq!(metadata.stats.truncated, 1);
        assert_eq!(metadata.feature_names.as_ref().map(Vec::len), Some(63));
        assert_eq!(metadata.experiment.unwrap().name, "unit");
    }

    #[test]
    fn test_prefix() {
        let dir = TempDir::new().unwrap();
        let result = NumpyExporter::new(dir.path())
            .with_prefix("train")
            .export(&small_batch())
            .unwrap();
        assert_eq!(result.labels_path, dir.path().join("train_labels.npy"));
        assert!(dir.path().join("train_label_map.json").exists());
    }
}
