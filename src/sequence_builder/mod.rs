//! Sequence normalization for gesture classifiers.
//!
//! Turns one raw landmark record into a `(target_length × feature_width)`
//! matrix, truncating long clips and zero-padding short ones.
//!
//! # Architecture
//!
//! - **SequenceConfig**: feature width and target length
//! - **SequenceBuilder**: field resolution, reshape and length normalization
//! - **Sequence**: normalized frames plus how they were adjusted

mod builder;

pub use builder::{
    EncodedSample, LabeledSequence, LengthAdjustment, Sequence, SequenceBuilder, SequenceConfig,
};
