//! Label dictionary: gesture token → dense class index.
//!
//! Indices are handed out in strict first-encounter order starting at 0, so
//! the same record order always yields the same mapping. Entries are never
//! removed or renumbered.

use crate::error::{DatasetError, Result};
use ahash::AHashMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Insertion-ordered, injective mapping from label token to class index.
///
/// # Example
///
/// ```
/// use landmark_extractor::labeling::LabelDictionary;
///
/// let mut dict = LabelDictionary::new();
/// assert_eq!(dict.assign_or_lookup("a"), 0);
/// assert_eq!(dict.assign_or_lookup("b"), 1);
/// assert_eq!(dict.assign_or_lookup("a"), 0);
/// assert_eq!(dict.assign_or_lookup("c"), 2);
/// assert_eq!(dict.token(1), Some("b"));
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "BTreeMap<String, usize>")]
pub struct LabelDictionary {
    /// Tokens in index order: `tokens[i]` has class index `i`
    tokens: Vec<String>,

    /// Reverse lookup
    index: AHashMap<String, usize>,
}

impl LabelDictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the index of `token`, assigning the next free index if unseen.
    ///
    /// A new token gets `self.len()` as its index and grows the dictionary by
    /// exactly one entry. A known token leaves the dictionary untouched.
    pub fn assign_or_lookup(&mut self, token: &str) -> usize {
        if let Some(&idx) = self.index.get(token) {
            return idx;
        }
        let idx = self.tokens.len();
        self.tokens.push(token.to_owned());
        self.index.insert(token.to_owned(), idx);
        idx
    }

    /// Index of a known token.
    #[inline]
    pub fn get(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    /// Token for a class index (inference-side translation).
    #[inline]
    pub fn token(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.index.contains_key(token)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of classes a classifier trained on this mapping must output.
    #[inline]
    pub fn num_classes(&self) -> usize {
        self.len()
    }

    /// Tokens in index order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// `(token, index)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.tokens
            .iter()
            .enumerate()
            .map(|(idx, token)| (token.as_str(), idx))
    }

    /// Write the mapping as a JSON object `{token: index}` in index order.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Load a mapping written by [`LabelDictionary::save_json`].
    ///
    /// Fails unless the indices are exactly `0..len`.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let dict: LabelDictionary = serde_json::from_str(&contents)?;
        Ok(dict)
    }

    /// Build a dictionary from tokens already in index order.
    ///
    /// Duplicate tokens are rejected since they would break injectivity.
    pub fn from_tokens<I, S>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut dict = Self::new();
        for token in tokens {
            let token = token.into();
            if dict.contains(&token) {
                return Err(DatasetError::InvalidConfig(format!(
                    "duplicate label token '{token}'"
                )));
            }
            dict.assign_or_lookup(&token);
        }
        Ok(dict)
    }
}

impl PartialEq for LabelDictionary {
    fn eq(&self, other: &Self) -> bool {
        self.tokens == other.tokens
    }
}

impl Eq for LabelDictionary {}

impl Serialize for LabelDictionary {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tokens.len()))?;
        for (token, idx) in self.iter() {
            map.serialize_entry(token, &idx)?;
        }
        map.end()
    }
}

impl TryFrom<BTreeMap<String, usize>> for LabelDictionary {
    type Error = String;

    fn try_from(map: BTreeMap<String, usize>) -> std::result::Result<Self, Self::Error> {
        let n = map.len();
        let mut slots: Vec<Option<String>> = vec![None; n];
        for (token, idx) in map {
            if idx >= n {
                return Err(format!(
                    "label '{token}' has index {idx}, expected indices 0..{n}"
                ));
            }
            if let Some(existing) = &slots[idx] {
                return Err(format!(
                    "labels '{existing}' and '{token}' share index {idx}"
                ));
            }
            slots[idx] = Some(token);
        }

        let mut dict = LabelDictionary::new();
        for token in slots.into_iter().flatten() {
            dict.assign_or_lookup(&token);
        }
        Ok(dict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_first_occurrence_order() {
        let mut dict = LabelDictionary::new();
        let indices: Vec<usize> = ["a", "b", "a", "c"]
            .iter()
            .map(|t| dict.assign_or_lookup(t))
            .collect();

        assert_eq!(indices, vec![0, 1, 0, 2]);
        assert_eq!(dict.tokens(), &["a", "b", "c"]);
        assert_eq!(dict.get("c"), Some(2));
    }

    #[test]
    fn test_repeated_lookup_grows_once() {
        let mut dict = LabelDictionary::new();
        let first = dict.assign_or_lookup("wave");
        let second = dict.assign_or_lookup("wave");
        assert_eq!(first, second);
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn test_reverse_lookup() {
        let dict = LabelDictionary::from_tokens(["hello", "thanks"]).unwrap();
        assert_eq!(dict.token(0), Some("hello"));
        assert_eq!(dict.token(1), Some("thanks"));
        assert_eq!(dict.token(2), None);
        assert_eq!(dict.num_classes(), 2);
    }

    #[test]
    fn test_from_tokens_rejects_duplicates() {
        assert!(LabelDictionary::from_tokens(["a", "b", "a"]).is_err());
    }

    #[test]
    fn test_json_preserves_index_order() {
        let dict = LabelDictionary::from_tokens(["zeta", "alpha", "mid"]).unwrap();
        let json = serde_json::to_string(&dict).unwrap();
        assert_eq!(json, r#"{"zeta":0,"alpha":1,"mid":2}"#);

        let back: LabelDictionary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dict);
    }

    #[test]
    fn test_load_rejects_non_bijective_map() {
        let gap: std::result::Result<LabelDictionary, _> =
            serde_json::from_str(r#"{"a":0,"b":2}"#);
        assert!(gap.is_err());

        let shared: std::result::Result<LabelDictionary, _> =
            serde_json::from_str(r#"{"a":1,"b":1}"#);
        assert!(shared.is_err());
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("label_map.json");

        let dict = LabelDictionary::from_tokens(["wave", "point"]).unwrap();
        dict.save_json(&path).unwrap();

        let loaded = LabelDictionary::load_json(&path).unwrap();
        assert_eq!(loaded, dict);
        assert_eq!(loaded.get("point"), Some(1));
    }
}
