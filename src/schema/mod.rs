//! Feature Schema Module
//!
//! Describes the layout of a single feature vector: which hand joint and
//! which coordinate each of the flat values belongs to.
//!
//! A frame is the concatenation of every landmark's coordinates in
//! extractor order:
//!
//! ```text
//! [wrist_x, wrist_y, wrist_z, thumb_cmc_x, ..., pinky_tip_z]   (21 × 3 = 63)
//! ```
//!
//! # Example
//!
//! ```
//! use landmark_extractor::schema::{FeatureLayout, HandLandmark, Axis};
//!
//! let layout = FeatureLayout::hand();
//! assert_eq!(layout.width(), 63);
//! assert_eq!(layout.offset(HandLandmark::ThumbTip, Axis::Y), 13);
//! ```

mod hand;

pub use hand::{Axis, HandLandmark};

use serde::{Deserialize, Serialize};

/// Current schema version, recorded in export metadata.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Values per frame for a single tracked hand (21 landmarks × 3 coordinates).
pub const FEATURE_WIDTH: usize = HandLandmark::COUNT * Axis::COUNT;

/// Number of frames every sample is normalized to.
pub const SEQUENCE_LENGTH: usize = 30;

/// Shape of one feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureLayout {
    /// Tracked points per frame
    pub landmarks: usize,
    /// Coordinates per point
    pub coords: usize,
}

impl FeatureLayout {
    /// Single-hand layout: 21 landmarks × (x, y, z).
    pub fn hand() -> Self {
        Self {
            landmarks: HandLandmark::COUNT,
            coords: Axis::COUNT,
        }
    }

    /// Number of values in one frame.
    #[inline]
    pub fn width(&self) -> usize {
        self.landmarks * self.coords
    }

    /// Flat offset of a landmark coordinate inside a frame.
    #[inline]
    pub fn offset(&self, landmark: HandLandmark, axis: Axis) -> usize {
        landmark.index() * self.coords + axis as usize
    }

    /// Column names in flat order.
    ///
    /// The hand layout yields `wrist_x`, `wrist_y`, ... `pinky_tip_z`. Other
    /// layouts fall back to `p{point}_{coord}`.
    pub fn feature_names(&self) -> Vec<String> {
        if *self == Self::hand() {
            return HandLandmark::all()
                .iter()
                .flat_map(|lm| {
                    Axis::all()
                        .iter()
                        .map(move |axis| format!("{}_{}", lm.name(), axis.name()))
                })
                .collect();
        }

        (0..self.landmarks)
            .flat_map(|p| (0..self.coords).map(move |c| format!("p{p}_{c}")))
            .collect()
    }
}

impl Default for FeatureLayout {
    fn default() -> Self {
        Self::hand()
    }
}
