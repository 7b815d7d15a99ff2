//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```
//! use landmark_extractor::prelude::*;
//!
//! let builder = BatchBuilder::from_config(&PipelineConfig::default()).unwrap();
//! assert_eq!(builder.sequence_builder().config().target_length, SEQUENCE_LENGTH);
//! ```
//!
//! # What's Included
//!
//! ## Batch Building
//! - [`BatchBuilder`], [`BatchConfig`], [`ErrorMode`], [`SampleBatch`], [`build_batch`]
//!
//! ## Sequence Building
//! - [`SequenceBuilder`], [`SequenceConfig`], [`Sequence`]
//!
//! ## Labeling
//! - [`LabelDictionary`], [`LabelStats`]
//!
//! ## Configuration, Loading and Export
//! - [`PipelineConfig`], [`FieldConfig`], [`load_files`], [`NumpyExporter`]
//!
//! ## Errors
//! - [`DatasetError`], [`Result`]

pub use crate::batch::{build_batch, BatchBuilder, BatchConfig, BatchStats, ErrorMode, SampleBatch};
pub use crate::config::{ExperimentMetadata, ExportConfig, PipelineConfig};
pub use crate::dataset::{load_file, load_files};
pub use crate::error::{DatasetError, Result};
pub use crate::export::{export_to_numpy, ExportMetadata, NumpyExporter};
pub use crate::labeling::{LabelDictionary, LabelStats};
pub use crate::record::{FieldAccessor, FieldChain, FieldConfig};
pub use crate::schema::{FeatureLayout, FEATURE_WIDTH, SEQUENCE_LENGTH};
pub use crate::sequence_builder::{LengthAdjustment, Sequence, SequenceBuilder, SequenceConfig};
