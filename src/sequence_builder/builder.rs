//! Fixed-length sequence building for gesture classifiers.
//!
//! A recurrent classifier needs every sample to have the same temporal
//! length. Landmark extraction yields however many frames the clip had, so
//! each sample is reshaped into `(frames × feature_width)` and then cut or
//! zero-padded to exactly `target_length` frames.
//!
//! ```text
//! flat payload (k × 63 values)
//!        │ reshape
//!        ▼
//! k frames × 63 ──┬─ k > 30: keep frames 0..30
//!                 ├─ k < 30: append 30 - k zero frames
//!                 └─ k = 30: unchanged
//!        ▼
//! 30 frames × 63
//! ```
//!
//! # Example
//!
//! ```
//! use landmark_extractor::sequence_builder::{SequenceBuilder, SequenceConfig};
//! use landmark_extractor::labeling::LabelDictionary;
//! use serde_json::json;
//!
//! let builder = SequenceBuilder::new(SequenceConfig::default()).unwrap();
//! let mut dict = LabelDictionary::new();
//!
//! let record = json!({"landmarkData": vec![0.5; 63], "gestureDefinitionId": "wave"});
//! let sample = builder.encode(0, &record, &mut dict).unwrap().unwrap();
//!
//! assert_eq!(sample.sequence.frames.dim(), (30, 63));
//! assert_eq!(sample.class_index, 0);
//! ```

use crate::error::{DatasetError, Result};
use crate::labeling::LabelDictionary;
use crate::record::{flatten_payload, FieldConfig};
use crate::schema::{FeatureLayout, FEATURE_WIDTH, SEQUENCE_LENGTH};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Configuration for sequence building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceConfig {
    /// Values per frame (21 landmarks × 3 coordinates for one hand)
    pub feature_width: usize,

    /// Frames per output sequence
    pub target_length: usize,
}

impl SequenceConfig {
    pub fn new(feature_width: usize, target_length: usize) -> Self {
        Self {
            feature_width,
            target_length,
        }
    }

    /// Derive the feature width from a landmark layout.
    pub fn from_layout(layout: FeatureLayout, target_length: usize) -> Self {
        Self::new(layout.width(), target_length)
    }

    pub fn with_target_length(mut self, target_length: usize) -> Self {
        self.target_length = target_length;
        self
    }

    /// Values in one normalized sequence.
    #[inline]
    pub fn sequence_len(&self) -> usize {
        self.feature_width.saturating_mul(self.target_length)
    }

    /// Validate configuration.
    ///
    /// Returns Ok(()) if valid, Err(msg) otherwise.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.feature_width == 0 {
            return Err("feature_width must be > 0".to_string());
        }
        if self.target_length == 0 {
            return Err("target_length must be > 0".to_string());
        }
        if self.feature_width.checked_mul(self.target_length).is_none() {
            return Err(format!(
                "feature_width ({}) x target_length ({}) overflows",
                self.feature_width, self.target_length
            ));
        }
        Ok(())
    }
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self::new(FEATURE_WIDTH, SEQUENCE_LENGTH)
    }
}

/// How a sample's frame count was brought to the target length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthAdjustment {
    /// Already the target length
    Exact,
    /// Trailing frames were dropped
    Truncated { dropped: usize },
    /// Zero frames were appended
    Padded { added: usize },
}

impl LengthAdjustment {
    fn for_frames(frames: usize, target: usize) -> Self {
        use std::cmp::Ordering::*;
        match frames.cmp(&target) {
            Equal => LengthAdjustment::Exact,
            Greater => LengthAdjustment::Truncated {
                dropped: frames - target,
            },
            Less => LengthAdjustment::Padded {
                added: target - frames,
            },
        }
    }
}

/// A normalized frame sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    /// `[target_length × feature_width]`, row-major: `frames[[t, f]]`
    pub frames: Array2<f32>,

    /// Frame count before normalization
    pub source_frames: usize,

    pub adjustment: LengthAdjustment,
}

impl Sequence {
    /// Number of frames that carry real data (the rest is padding).
    #[inline]
    pub fn real_frames(&self) -> usize {
        self.source_frames.min(self.frames.nrows())
    }

    /// Row-major flat view of the frames.
    pub fn as_flat(&self) -> Vec<f32> {
        self.frames.iter().copied().collect()
    }
}

/// A sequence paired with its unencoded label token.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSequence {
    pub sequence: Sequence,
    pub label: String,
}

/// A sequence paired with its class index.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedSample {
    pub sequence: Sequence,
    pub class_index: usize,
}

/// Turns raw records into fixed-length sequences.
///
/// Stateless apart from configuration, so one builder can be shared across
/// threads. The label dictionary is passed in explicitly by callers that
/// need class indices.
#[derive(Debug, Clone, Default)]
pub struct SequenceBuilder {
    config: SequenceConfig,
    fields: FieldConfig,
}

impl SequenceBuilder {
    /// Create a builder with default field names.
    pub fn new(config: SequenceConfig) -> Result<Self> {
        Self::with_fields(config, FieldConfig::default())
    }

    pub fn with_fields(config: SequenceConfig, fields: FieldConfig) -> Result<Self> {
        config.validate().map_err(DatasetError::InvalidConfig)?;
        fields.validate().map_err(DatasetError::InvalidConfig)?;
        Ok(Self { config, fields })
    }

    pub fn config(&self) -> &SequenceConfig {
        &self.config
    }

    pub fn fields(&self) -> &FieldConfig {
        &self.fields
    }

    /// Reshape a payload into `(frames × feature_width)` without length
    /// normalization.
    ///
    /// The flattened element count must be a multiple of `feature_width`.
    pub fn frames(&self, index: usize, payload: &Value) -> Result<Array2<f32>> {
        let flat = self.flatten(index, payload)?;
        let rows = flat.len() / self.config.feature_width;
        Ok(Array2::from_shape_vec(
            (rows, self.config.feature_width),
            flat,
        )?)
    }

    /// Reshape and normalize one payload to exactly `target_length` frames.
    pub fn build_sequence(&self, index: usize, payload: &Value) -> Result<Sequence> {
        let mut flat = self.flatten(index, payload)?;
        let width = self.config.feature_width;
        let target = self.config.target_length;
        let source_frames = flat.len() / width;

        // Truncation keeps the earliest frames; padding appends zeros.
        flat.truncate(source_frames.min(target) * width);
        flat.resize(target * width, 0.0);

        Ok(Sequence {
            frames: Array2::from_shape_vec((target, width), flat)?,
            source_frames,
            adjustment: LengthAdjustment::for_frames(source_frames, target),
        })
    }

    /// Normalize one record without touching any label dictionary.
    ///
    /// Returns `Ok(None)` for records without a landmark payload.
    pub fn normalize(&self, index: usize, record: &Value) -> Result<Option<LabeledSequence>> {
        let resolved = self.fields.resolve(index, record)?;
        let Some(payload) = resolved.payload else {
            log::debug!("record {index}: no landmark payload, skipping");
            return Ok(None);
        };

        let sequence = self.build_sequence(index, payload)?;
        Ok(Some(LabeledSequence {
            sequence,
            label: resolved.label,
        }))
    }

    /// Normalize one record and register its label.
    ///
    /// Skipped records leave `dict` untouched. So do malformed ones: the
    /// label is only registered after the payload reshaped cleanly.
    pub fn encode(
        &self,
        index: usize,
        record: &Value,
        dict: &mut LabelDictionary,
    ) -> Result<Option<EncodedSample>> {
        Ok(self
            .normalize(index, record)?
            .map(|labeled| labeled.encode(dict)))
    }

    fn flatten(&self, index: usize, payload: &Value) -> Result<Vec<f32>> {
        let mut flat = Vec::new();
        flatten_payload(index, payload, &mut flat)?;

        let width = self.config.feature_width;
        if flat.len() % width != 0 {
            return Err(DatasetError::malformed(
                index,
                format!(
                    "{} landmark values is not a multiple of the feature width {} ({} whole frames, {} left over)",
                    flat.len(),
                    width,
                    flat.len() / width,
                    flat.len() % width
                ),
            ));
        }
        Ok(flat)
    }
}

impl LabeledSequence {
    /// Look up or assign the class index for this sequence's label.
    pub fn encode(self, dict: &mut LabelDictionary) -> EncodedSample {
        EncodedSample {
            class_index: dict.assign_or_lookup(&self.label),
            sequence: self.sequence,
        }
    }
}
