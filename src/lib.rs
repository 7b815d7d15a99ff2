//! Landmark Extractor
//!
//! Turns per-frame hand-landmark recordings into fixed-shape tensors and
//! integer class labels for gesture classifier training.
//!
//! # Overview
//!
//! Landmark extraction produces, for every recorded gesture, a variable
//! number of frames of 21 hand joints × (x, y, z). A sequence classifier
//! wants a rectangular `(N, 30, 63)` tensor instead, plus one dense class
//! index per sample. This crate performs that conversion:
//!
//! - every record is reshaped into frames of 63 values
//! - clips are truncated or zero-padded to exactly 30 frames
//! - label tokens are encoded in first-seen order
//! - records without landmarks are skipped, malformed ones are reported
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Landmark Extractor                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  dataset/          - JSON dataset loading                       │
//! │  record/           - Field accessor chains                      │
//! │  sequence_builder/ - Reshape + fixed-length normalization       │
//! │  labeling/         - Label dictionary, class statistics         │
//! │  batch/            - Batch assembly (sequential / parallel)     │
//! │  export/           - NumPy export for Python/TensorFlow         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use landmark_extractor::build_batch;
//! use serde_json::json;
//!
//! let records = vec![
//!     json!({"landmarkData": vec![0.1; 63 * 12], "gestureDefinitionId": "hello"}),
//!     json!({"landmarks": vec![0.2; 63 * 45], "label": "thanks"}),
//!     json!({"gestureDefinitionId": "no-landmarks"}),
//! ];
//!
//! let batch = build_batch(&records).unwrap();
//! assert_eq!(batch.features.dim(), (2, 30, 63));
//! assert_eq!(batch.labels.to_vec(), vec![0, 1]);
//! assert_eq!(batch.num_classes(), 2);
//! ```

pub mod batch;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod labeling;
pub mod prelude;
pub mod record;
pub mod schema;
pub mod sequence_builder;

// Re-exports - Errors
pub use error::{DatasetError, Result};

// Re-exports - Schema
pub use schema::{FeatureLayout, HandLandmark, FEATURE_WIDTH, SEQUENCE_LENGTH};

// Re-exports - Config
pub use config::{ExperimentMetadata, ExportConfig, PipelineConfig};
pub use record::{FieldAccessor, FieldChain, FieldConfig};

// Re-exports - Sequence Building
pub use sequence_builder::{LengthAdjustment, Sequence, SequenceBuilder, SequenceConfig};

// Re-exports - Labeling
pub use labeling::{LabelDictionary, LabelStats};

// Re-exports - Batch
pub use batch::{build_batch, BatchBuilder, BatchConfig, BatchStats, ErrorMode, SampleBatch};

// Re-exports - Loading / Export
pub use dataset::{load_file, load_files};
pub use export::{export_to_numpy, ExportMetadata, ExportResult, NumpyExporter};
