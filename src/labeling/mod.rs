//! Label Encoding for Gesture Classification
//!
//! Gesture labels arrive as free-form tokens (gesture definition ids, class
//! names, sometimes plain integers). A classifier needs dense integer class
//! indices instead, so this module provides:
//!
//! - [`LabelDictionary`]: first-seen-order token → index mapping
//! - [`LabelStats`]: per-class sample counts for a finished batch
//!
//! # Example
//!
//! ```
//! use landmark_extractor::labeling::{LabelDictionary, LabelStats};
//!
//! let mut dict = LabelDictionary::new();
//! let labels: Vec<i32> = ["wave", "point", "wave"]
//!     .iter()
//!     .map(|t| dict.assign_or_lookup(t) as i32)
//!     .collect();
//!
//! let stats = LabelStats::from_labels(&labels, &dict);
//! assert_eq!(stats.total, 3);
//! assert_eq!(stats.majority_class(), Some("wave"));
//! ```

mod dictionary;

pub use dictionary::LabelDictionary;

use serde::{Deserialize, Serialize};

/// Default token for records that carry no label.
pub const DEFAULT_LABEL: &str = "0";

/// Sample count for one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCount {
    /// Label token
    pub token: String,
    /// Class index
    pub index: usize,
    /// Number of samples with this class
    pub count: usize,
}

/// Class distribution of an encoded label array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelStats {
    /// Total number of labels
    pub total: usize,

    /// One entry per dictionary class, in index order
    pub classes: Vec<ClassCount>,
}

impl LabelStats {
    /// Count how many labels fall into each dictionary class.
    ///
    /// Indices outside the dictionary are ignored.
    pub fn from_labels(labels: &[i32], dict: &LabelDictionary) -> Self {
        let mut counts = vec![0usize; dict.len()];
        for &label in labels {
            if let Some(slot) = usize::try_from(label).ok().and_then(|i| counts.get_mut(i)) {
                *slot += 1;
            }
        }

        let classes = dict
            .iter()
            .zip(counts)
            .map(|((token, index), count)| ClassCount {
                token: token.to_owned(),
                index,
                count,
            })
            .collect();

        Self {
            total: labels.len(),
            classes,
        }
    }

    /// Fraction of samples in each class, in index order.
    pub fn class_balance(&self) -> Vec<f64> {
        if self.total == 0 {
            return vec![0.0; self.classes.len()];
        }
        let total = self.total as f64;
        self.classes.iter().map(|c| c.count as f64 / total).collect()
    }

    /// Token of the most frequent class; ties resolve to the lowest index.
    pub fn majority_class(&self) -> Option<&str> {
        self.classes
            .iter()
            .rev()
            .max_by_key(|c| c.count)
            .map(|c| c.token.as_str())
    }

    /// Classes present in the dictionary but absent from the labels.
    pub fn empty_classes(&self) -> Vec<&str> {
        self.classes
            .iter()
            .filter(|c| c.count == 0)
            .map(|c| c.token.as_str())
            .collect()
    }
}
