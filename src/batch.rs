//! Batch assembly: raw records → `(N × T × F)` tensor + class indices.
//!
//! Records are visited once, in input order. Each record is normalized by a
//! [`SequenceBuilder`]; records without landmarks are skipped, the rest are
//! appended to the batch and their labels encoded through a
//! [`LabelDictionary`] owned by the pass.
//!
//! # Example
//!
//! ```
//! use landmark_extractor::batch::build_batch;
//! use serde_json::json;
//!
//! let records = vec![json!({
//!     "landmarkData": (0..63).collect::<Vec<i32>>(),
//!     "gestureDefinitionId": "wave"
//! })];
//!
//! let batch = build_batch(&records).unwrap();
//! assert_eq!(batch.features.dim(), (1, 30, 63));
//! assert_eq!(batch.labels.to_vec(), vec![0]);
//! assert_eq!(batch.dictionary.get("wave"), Some(0));
//! ```
//!
//! # Parallel Building
//!
//! [`BatchBuilder::build_parallel`] reshapes records on a rayon pool but
//! encodes labels in one sequential pass over the results in input order.
//! Its output is identical to [`BatchBuilder::build`].
//!
//! ```ignore
//! let builder = BatchBuilder::new(sequence_builder, BatchConfig::new().with_threads(8));
//! let batch = builder.build_parallel(&records)?;
//! ```

use crate::config::PipelineConfig;
use crate::error::{DatasetError, Result};
use crate::labeling::{LabelDictionary, LabelStats};
use crate::sequence_builder::{LabeledSequence, LengthAdjustment, SequenceBuilder};
use ndarray::{Array1, Array3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};

// ============================================================================
// Configuration
// ============================================================================

/// How record-level defects are handled during a build.
///
/// Missing landmark payloads are always skipped; this only governs records
/// whose payload or label is present but unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorMode {
    /// Abort the whole batch on the first malformed record (default).
    #[default]
    FailFast,

    /// Skip malformed records, log them and count them in [`BatchStats`].
    SkipMalformed,
}

/// Configuration for batch building.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Worker threads for [`BatchBuilder::build_parallel`].
    ///
    /// - `None`: Use Rayon's global pool
    /// - `Some(n)`: Use a dedicated pool of exactly n threads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_threads: Option<usize>,

    /// How to handle malformed records.
    #[serde(default)]
    pub error_mode: ErrorMode,

    /// Use the parallel builder in the command-line tool.
    #[serde(default)]
    pub parallel: bool,
}

impl BatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.num_threads = Some(threads);
        self.parallel = true;
        self
    }

    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Returns configured threads or Rayon's default.
    pub fn effective_threads(&self) -> usize {
        self.num_threads.unwrap_or_else(rayon::current_num_threads)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.num_threads == Some(0) {
            return Err("num_threads must be > 0".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// Results
// ============================================================================

/// Counters collected while building a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    /// Records inspected
    pub records: usize,

    /// Samples emitted into the tensor
    pub samples: usize,

    /// Records without a landmark payload
    pub skipped_missing: usize,

    /// Malformed records skipped under [`ErrorMode::SkipMalformed`]
    pub skipped_malformed: usize,

    /// Samples longer than the target length
    pub truncated: usize,

    /// Samples shorter than the target length
    pub padded: usize,

    /// Samples already at the target length
    pub exact: usize,

    #[serde(skip)]
    pub elapsed: Duration,
}

impl BatchStats {
    /// Records that did not make it into the batch.
    pub fn skipped(&self) -> usize {
        self.skipped_missing + self.skipped_malformed
    }

    fn record_adjustment(&mut self, adjustment: LengthAdjustment) {
        match adjustment {
            LengthAdjustment::Exact => self.exact += 1,
            LengthAdjustment::Truncated { .. } => self.truncated += 1,
            LengthAdjustment::Padded { .. } => self.padded += 1,
        }
    }
}

/// Output of a batch build.
#[derive(Debug, Clone)]
pub struct SampleBatch {
    /// `[N × target_length × feature_width]`
    pub features: Array3<f32>,

    /// `[N]` class indices, aligned with `features` along axis 0
    pub labels: Array1<i32>,

    /// Token → class index mapping built during the pass
    pub dictionary: LabelDictionary,

    pub stats: BatchStats,
}

impl SampleBatch {
    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always false: a batch with zero samples is never constructed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[inline]
    pub fn num_classes(&self) -> usize {
        self.dictionary.num_classes()
    }

    /// Per-class sample counts.
    pub fn label_stats(&self) -> LabelStats {
        LabelStats::from_labels(self.labels.as_slice().unwrap_or(&[]), &self.dictionary)
    }

    /// Split into `(features, labels, dictionary)`.
    pub fn into_parts(self) -> (Array3<f32>, Array1<i32>, LabelDictionary) {
        (self.features, self.labels, self.dictionary)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builds [`SampleBatch`]es from raw records.
#[derive(Debug, Clone, Default)]
pub struct BatchBuilder {
    sequences: SequenceBuilder,
    config: BatchConfig,
}

impl BatchBuilder {
    pub fn new(sequences: SequenceBuilder, config: BatchConfig) -> Self {
        Self { sequences, config }
    }

    /// Create a builder from a pipeline configuration.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        config.validate().map_err(DatasetError::InvalidConfig)?;
        let sequences = SequenceBuilder::with_fields(config.sequence, config.fields.clone())?;
        Ok(Self::new(sequences, config.batch.clone()))
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    pub fn sequence_builder(&self) -> &SequenceBuilder {
        &self.sequences
    }

    /// Build a batch sequentially.
    ///
    /// Fails with [`DatasetError::EmptyDataset`] when no record yields a
    /// sample, and with the record's error on the first malformed record in
    /// [`ErrorMode::FailFast`].
    pub fn build(&self, records: &[Value]) -> Result<SampleBatch> {
        let start = Instant::now();
        let mut acc = Accumulator::new(records.len());

        for (index, record) in records.iter().enumerate() {
            let outcome = self.sequences.normalize(index, record);
            acc.push(index, outcome, self.config.error_mode)?;
        }

        acc.finish(&self.sequences, start)
    }

    /// Build a batch, reshaping records in parallel.
    ///
    /// Produces exactly what [`BatchBuilder::build`] produces for the same
    /// input, including which error is reported in fail-fast mode.
    pub fn build_parallel(&self, records: &[Value]) -> Result<SampleBatch> {
        let start = Instant::now();

        let normalize = || -> Vec<Result<Option<LabeledSequence>>> {
            records
                .par_iter()
                .enumerate()
                .map(|(index, record)| self.sequences.normalize(index, record))
                .collect()
        };

        let outcomes = match self.config.num_threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| {
                        DatasetError::InvalidConfig(format!("failed to create thread pool: {e}"))
                    })?;
                pool.install(normalize)
            }
            None => normalize(),
        };

        log::debug!(
            "normalized {} records on {} threads",
            records.len(),
            self.config.effective_threads()
        );

        let mut acc = Accumulator::new(records.len());
        for (index, outcome) in outcomes.into_iter().enumerate() {
            acc.push(index, outcome, self.config.error_mode)?;
        }

        acc.finish(&self.sequences, start)
    }
}

/// Build a batch with default shape, field names and error handling.
pub fn build_batch(records: &[Value]) -> Result<SampleBatch> {
    BatchBuilder::default().build(records)
}

/// Sequential fold state. The dictionary lives here and is only touched in
/// input order.
struct Accumulator {
    flat: Vec<f32>,
    labels: Vec<i32>,
    dictionary: LabelDictionary,
    stats: BatchStats,
}

impl Accumulator {
    fn new(records: usize) -> Self {
        Self {
            flat: Vec::new(),
            labels: Vec::with_capacity(records),
            dictionary: LabelDictionary::new(),
            stats: BatchStats {
                records,
                ..Default::default()
            },
        }
    }

    fn push(
        &mut self,
        index: usize,
        outcome: Result<Option<LabeledSequence>>,
        mode: ErrorMode,
    ) -> Result<()> {
        match outcome {
            Ok(Some(labeled)) => {
                let sample = labeled.encode(&mut self.dictionary);
                let class = i32::try_from(sample.class_index).map_err(|_| {
                    DatasetError::malformed(index, "class index does not fit in i32")
                })?;

                self.stats.record_adjustment(sample.sequence.adjustment);
                self.flat.extend(sample.sequence.frames.iter().copied());
                self.labels.push(class);
                self.stats.samples += 1;
            }
            Ok(None) => self.stats.skipped_missing += 1,
            Err(e) if mode == ErrorMode::SkipMalformed && e.is_record_error() => {
                log::warn!("skipping record {index}: {e}");
                self.stats.skipped_malformed += 1;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    fn finish(mut self, sequences: &SequenceBuilder, start: Instant) -> Result<SampleBatch> {
        if self.labels.is_empty() {
            return Err(DatasetError::EmptyDataset {
                records: self.stats.records,
            });
        }

        let cfg = sequences.config();
        let features = Array3::from_shape_vec(
            (self.labels.len(), cfg.target_length, cfg.feature_width),
            self.flat,
        )?;
        self.stats.elapsed = start.elapsed();

        log::info!(
            "built batch: {} samples from {} records ({} skipped), {} classes, {} truncated, {} padded",
            self.stats.samples,
            self.stats.records,
            self.stats.skipped(),
            self.dictionary.len(),
            self.stats.truncated,
            self.stats.padded
        );

        Ok(SampleBatch {
            features,
            labels: Array1::from_vec(self.labels),
            dictionary: self.dictionary,
            stats: self.stats,
        })
    }
}
