//! Configuration Integration Tests
//!
//! Configuration files drive the `prepare_dataset` tool, so these check
//! that hand-written TOML maps onto the pipeline the way the docs describe.

use landmark_extractor::{
    BatchBuilder, DatasetError, ErrorMode, FieldAccessor, PipelineConfig,
};
use serde_json::json;
use tempfile::TempDir;

#[test]
fn test_hand_written_toml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gestures.toml");
    std::fs::write(
        &path,
        r#"
[sequence]
feature_width = 63
target_length = 20

[fields]
landmarks = ["/sample/points", "landmarks"]
label = ["gesture"]
default_label = "unlabelled"

[batch]
error_mode = "skip_malformed"
parallel = true
num_threads = 2

[export]
inputs = ["a.json", "b.json"]
output_dir = "out"

[metadata]
name = "hand-written"
tags = ["test"]
"#,
    )
    .unwrap();

    let config = PipelineConfig::load_toml(&path).unwrap();

    assert_eq!(config.sequence.target_length, 20);
    assert_eq!(
        config.fields.landmarks.accessors()[0],
        FieldAccessor::Pointer("/sample/points".to_string())
    );
    assert_eq!(config.batch.error_mode, ErrorMode::SkipMalformed);
    assert_eq!(config.batch.num_threads, Some(2));
    assert_eq!(config.export.as_ref().unwrap().inputs.len(), 2);
    assert_eq!(config.metadata.as_ref().unwrap().name, "hand-written");

    let builder = BatchBuilder::from_config(&config).unwrap();
    let records = vec![
        json!({"sample": {"points": vec![1.0; 63 * 25]}}),
        json!({"landmarks": vec![1.0; 10], "gesture": "broken"}),
    ];
    let batch = builder.build_parallel(&records).unwrap();

    assert_eq!(batch.features.dim(), (1, 20, 63));
    assert_eq!(batch.dictionary.tokens(), &["unlabelled"]);
    assert_eq!(batch.stats.skipped_malformed, 1);
}

#[test]
fn test_empty_toml_is_default() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.toml");
    std::fs::write(&path, "").unwrap();

    let config = PipelineConfig::load_toml(&path).unwrap();
    assert_eq!(config, PipelineConfig::default());
}

#[test]
fn test_unknown_error_mode_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[batch]\nerror_mode = \"ignore\"\n").unwrap();

    let err = PipelineConfig::load_toml(&path).unwrap_err();
    assert!(matches!(err, DatasetError::TomlDe(_)));
}

#[test]
fn test_overflowing_sequence_shape_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("huge.toml");
    std::fs::write(
        &path,
        "[sequence]\nfeature_width = 63\ntarget_length = 4611686018427387904\n",
    )
    .unwrap();

    let err = PipelineConfig::load_toml(&path).unwrap_err();
    assert!(matches!(err, DatasetError::InvalidConfig(_)));
}

#[test]
fn test_zero_threads_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("threads.toml");
    std::fs::write(&path, "[batch]\nnum_threads = 0\nparallel = true\n").unwrap();

    let err = PipelineConfig::load_toml(&path).unwrap_err();
    assert!(matches!(err, DatasetError::InvalidConfig(_)));
}
