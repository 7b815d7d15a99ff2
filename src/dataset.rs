//! Dataset file loading.
//!
//! A dataset file is JSON in one of two layouts:
//!
//! - a top-level array of records
//! - an object holding the record array under a configured key (by default
//!   `gestureTrainingData`, as in a database export)
//!
//! Several files can be loaded at once; they are parsed in parallel and
//! concatenated in the order given, so record order (and therefore class
//! index assignment) only depends on the argument order.

use crate::error::{DatasetError, Result};
use crate::record::{json_kind, FieldConfig};
use rayon::prelude::*;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Extract the record list from a parsed dataset document.
pub fn records_from_value(doc: Value, fields: &FieldConfig, source: &str) -> Result<Vec<Value>> {
    match doc {
        Value::Array(records) => Ok(records),
        mut doc @ Value::Object(_) => match fields.records.take(&mut doc) {
            Some(Value::Array(records)) => Ok(records),
            Some(other) => Err(DatasetError::InvalidDataset {
                path: source.to_string(),
                reason: format!("record list is a {}, expected an array", json_kind(&other)),
            }),
            None => Err(DatasetError::InvalidDataset {
                path: source.to_string(),
                reason: format!(
                    "object has no record array under any of [{}]",
                    fields
                        .records
                        .accessors()
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            }),
        },
        other => Err(DatasetError::InvalidDataset {
            path: source.to_string(),
            reason: format!("top-level {} is not a dataset", json_kind(&other)),
        }),
    }
}

/// Load the records of one dataset file.
pub fn load_file<P: AsRef<Path>>(path: P, fields: &FieldConfig) -> Result<Vec<Value>> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let doc: Value = serde_json::from_reader(reader)?;
    let records = records_from_value(doc, fields, &path.display().to_string())?;

    log::debug!("loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Load and concatenate several dataset files, preserving argument order.
///
/// Fails on the first file (in argument order) that cannot be read.
pub fn load_files(paths: &[PathBuf], fields: &FieldConfig) -> Result<Vec<Value>> {
    let per_file: Vec<Result<Vec<Value>>> = paths
        .par_iter()
        .map(|path| load_file(path, fields))
        .collect();

    let mut records = Vec::new();
    for loaded in per_file {
        records.extend(loaded?);
    }

    log::info!("loaded {} records from {} files", records.len(), paths.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_top_level_array() {
        let recs = records_from_value(json!([1, 2]), &FieldConfig::default(), "mem").unwrap();
        assert_eq!(recs.len(), 2);
    }

    #[test]
    fn test_database_layout() {
        let doc = json!({
            "symbols": [],
            "gestureTrainingData": [{"landmarkData": [], "gestureDefinitionId": "a"}]
        });
        let recs = records_from_value(doc, &FieldConfig::default(), "mem").unwrap();
        assert_eq!(recs.len(), 1);
    }

    #[test]
    fn test_unrecognised_layouts() {
        let fields = FieldConfig::default();
        assert!(records_from_value(json!({"other": []}), &fields, "mem").is_err());
        assert!(records_from_value(json!({"gestureTrainingData": 3}), &fields, "mem").is_err());
        assert!(records_from_value(json!("text"), &fields, "mem").is_err());
    }

    #[test]
    fn test_empty_record_list_is_not_a_layout_error() {
        let doc = json!({"gestureTrainingData": []});
        let recs = records_from_value(doc, &FieldConfig::default(), "mem").unwrap();
        assert!(recs.is_empty());
    }

    #[test]
    fn test_load_files_preserves_order() {
        let dir = TempDir::new().unwrap();
        let mut paths = Vec::new();
        for i in 0..4 {
            let path = dir.path().join(format!("part{i}.json"));
            std::fs::write(&path, json!([{"label": format!("f{i}")}]).to_string()).unwrap();
            paths.push(path);
        }

        let records = load_files(&paths, &FieldConfig::default()).unwrap();
        let labels: Vec<&str> = records.iter().map(|r| r["label"].as_str().unwrap()).collect();
        assert_eq!(labels, vec!["f0", "f1", "f2", "f3"]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = load_file(dir.path().join("nope.json"), &FieldConfig::default()).unwrap_err();
        assert!(matches!(err, DatasetError::Io(_)));
    }
}
