//! Raw record field resolution.
//!
//! Input records come from several producers with slightly different
//! schemas. Instead of probing fields ad hoc, each logical field is read
//! through a [`FieldChain`]: an ordered list of [`FieldAccessor`]s tried in
//! sequence, the first present value winning.
//!
//! | Logical field | Default chain | Fallback |
//! |---------------|---------------|----------|
//! | landmarks | `landmarkData`, `landmarks` | record skipped |
//! | label | `gestureDefinitionId`, `label` | `"0"` |
//!
//! A record that is not a JSON object is taken whole as the landmark payload
//! and gets the default label.

use crate::error::{DatasetError, Result};
use crate::labeling::DEFAULT_LABEL;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One way of reading a value out of a JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldAccessor {
    /// Top-level key lookup
    Key(String),
    /// RFC 6901 JSON pointer, e.g. `/payload/landmarks`
    Pointer(String),
}

impl FieldAccessor {
    /// Read the value, if present (see [`is_present`]).
    pub fn read<'a>(&self, record: &'a Value) -> Option<&'a Value> {
        let value = match self {
            FieldAccessor::Key(key) => record.as_object()?.get(key),
            FieldAccessor::Pointer(ptr) => record.pointer(ptr),
        }?;
        is_present(value).then_some(value)
    }

    /// Move the value out of `record`, leaving `null` behind.
    ///
    /// Only `null` and missing fields count as absent here, so an empty
    /// array is still taken.
    pub fn take(&self, record: &mut Value) -> Option<Value> {
        let slot = match self {
            FieldAccessor::Key(key) => record.as_object_mut()?.get_mut(key),
            FieldAccessor::Pointer(ptr) => record.pointer_mut(ptr),
        }?;
        (!slot.is_null()).then(|| slot.take())
    }
}

/// Whether a field value stops the accessor chain.
///
/// Falsy values (`null`, `false`, `0`, `""`, `[]`, `{}`) are treated like
/// missing fields so the next accessor in the chain gets a chance.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

impl From<String> for FieldAccessor {
    fn from(text: String) -> Self {
        if text.starts_with('/') {
            FieldAccessor::Pointer(text)
        } else {
            FieldAccessor::Key(text)
        }
    }
}

impl From<&str> for FieldAccessor {
    fn from(text: &str) -> Self {
        FieldAccessor::from(text.to_owned())
    }
}

impl From<FieldAccessor> for String {
    fn from(accessor: FieldAccessor) -> Self {
        match accessor {
            FieldAccessor::Key(s) | FieldAccessor::Pointer(s) => s,
        }
    }
}

impl fmt::Display for FieldAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldAccessor::Key(s) | FieldAccessor::Pointer(s) => f.write_str(s),
        }
    }
}

/// Ordered accessor list for one logical field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldChain(pub Vec<FieldAccessor>);

impl FieldChain {
    pub fn new<I, A>(accessors: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<FieldAccessor>,
    {
        Self(accessors.into_iter().map(Into::into).collect())
    }

    /// First present value along the chain.
    pub fn resolve<'a>(&self, record: &'a Value) -> Option<&'a Value> {
        self.0.iter().find_map(|accessor| accessor.read(record))
    }

    /// Move the first non-null value along the chain out of `record`.
    pub fn take(&self, record: &mut Value) -> Option<Value> {
        self.0.iter().find_map(|accessor| accessor.take(record))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn accessors(&self) -> &[FieldAccessor] {
        &self.0
    }
}

/// Field names used to pull landmarks and labels out of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Where the landmark payload lives
    pub landmarks: FieldChain,

    /// Where the label token lives
    pub label: FieldChain,

    /// Token used when no label accessor matches
    #[serde(default = "default_label")]
    pub default_label: String,

    /// Where a dataset file object keeps its record list
    #[serde(default = "default_records")]
    pub records: FieldChain,
}

fn default_label() -> String {
    DEFAULT_LABEL.to_string()
}

fn default_records() -> FieldChain {
    FieldChain::new(["gestureTrainingData"])
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            landmarks: FieldChain::new(["landmarkData", "landmarks"]),
            label: FieldChain::new(["gestureDefinitionId", "label"]),
            default_label: default_label(),
            records: default_records(),
        }
    }
}

impl FieldConfig {
    pub fn with_landmarks(mut self, chain: FieldChain) -> Self {
        self.landmarks = chain;
        self
    }

    pub fn with_label(mut self, chain: FieldChain) -> Self {
        self.label = chain;
        self
    }

    pub fn with_default_label(mut self, label: impl Into<String>) -> Self {
        self.default_label = label.into();
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.landmarks.is_empty() {
            return Err("at least one landmark field accessor is required".to_string());
        }
        if self.default_label.is_empty() {
            return Err("default_label cannot be empty".to_string());
        }
        for accessor in self.landmarks.accessors().iter().chain(self.label.accessors()) {
            if let FieldAccessor::Key(key) = accessor {
                if key.is_empty() {
                    return Err("field accessors cannot be empty".to_string());
                }
            }
        }
        Ok(())
    }

    /// Resolve the landmark payload and label token of one record.
    ///
    /// `index` is the record's position in the input and only feeds error
    /// messages.
    pub fn resolve<'a>(&self, index: usize, record: &'a Value) -> Result<ResolvedRecord<'a>> {
        if !record.is_object() {
            let payload = (!record.is_null()).then_some(record);
            return Ok(ResolvedRecord {
                payload,
                label: self.default_label.clone(),
            });
        }

        let payload = self.landmarks.resolve(record);
        let label = match self.label.resolve(record) {
            Some(value) => label_token(index, value)?,
            None => self.default_label.clone(),
        };

        Ok(ResolvedRecord { payload, label })
    }
}

/// Landmark payload and label token of one record.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRecord<'a> {
    /// `None` when no accessor found a payload; such records are skipped
    pub payload: Option<&'a Value>,
    pub label: String,
}

/// Stringify a scalar label value.
fn label_token(index: usize, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(DatasetError::UnsupportedLabel {
            index,
            kind: json_kind(other),
        }),
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Flatten a (possibly nested) numeric payload into `out`.
///
/// A string payload is decoded as JSON text first; some producers store
/// landmark arrays as serialized text columns.
pub fn flatten_payload(index: usize, payload: &Value, out: &mut Vec<f32>) -> Result<()> {
    if let Value::String(text) = payload {
        let decoded: Value = serde_json::from_str(text).map_err(|e| {
            DatasetError::malformed(index, format!("landmark text is not valid JSON: {e}"))
        })?;
        if decoded.is_string() {
            return Err(DatasetError::malformed(
                index,
                "landmark text decodes to another string",
            ));
        }
        return flatten_payload(index, &decoded, out);
    }
    flatten_into(index, payload, out)
}

fn flatten_into(index: usize, value: &Value, out: &mut Vec<f32>) -> Result<()> {
    match value {
        Value::Number(n) => {
            let v = n.as_f64().ok_or_else(|| {
                DatasetError::malformed(index, format!("number {n} is not representable"))
            })?;
            out.push(v as f32);
            Ok(())
        }
        Value::Array(items) => {
            for item in items {
                flatten_into(index, item, out)?;
            }
            Ok(())
        }
        other => Err(DatasetError::malformed(
            index,
            format!(
                "landmark payload contains a {} at position {}",
                json_kind(other),
                out.len()
            ),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_primary_fields_win() {
        let cfg = FieldConfig::default();
        let rec = json!({
            "landmarkData": [1.0],
            "landmarks": [2.0],
            "gestureDefinitionId": "wave",
            "label": "other"
        });
        let resolved = cfg.resolve(0, &rec).unwrap();
        assert_eq!(resolved.payload, Some(&json!([1.0])));
        assert_eq!(resolved.label, "wave");
    }

    #[test]
    fn test_fallback_fields() {
        let cfg = FieldConfig::default();
        let rec = json!({"landmarks": [2.0], "label": "point"});
        let resolved = cfg.resolve(0, &rec).unwrap();
        assert_eq!(resolved.payload, Some(&json!([2.0])));
        assert_eq!(resolved.label, "point");
    }

    #[test]
    fn test_null_primary_falls_through() {
        let cfg = FieldConfig::default();
        let rec = json!({"landmarkData": null, "landmarks": [3.0], "gestureDefinitionId": ""});
        let resolved = cfg.resolve(0, &rec).unwrap();
        assert_eq!(resolved.payload, Some(&json!([3.0])));
        assert_eq!(resolved.label, "0");
    }

    #[test]
    fn test_missing_payload_resolves_to_none() {
        let cfg = FieldConfig::default();
        let rec = json!({"label": "x"});
        let resolved = cfg.resolve(0, &rec).unwrap();
        assert!(resolved.payload.is_none());
        assert_eq!(resolved.label, "x");
    }

    #[test]
    fn test_bare_array_uses_default_label() {
        let cfg = FieldConfig::default();
        let rec = json!([[0.1, 0.2], [0.3, 0.4]]);
        let resolved = cfg.resolve(0, &rec).unwrap();
        assert_eq!(resolved.payload, Some(&rec));
        assert_eq!(resolved.label, DEFAULT_LABEL);

        assert!(cfg.resolve(1, &Value::Null).unwrap().payload.is_none());
    }

    #[test]
    fn test_empty_bare_array_is_kept() {
        let cfg = FieldConfig::default();
        let rec = json!([]);
        let resolved = cfg.resolve(0, &rec).unwrap();
        assert_eq!(resolved.payload, Some(&rec));
        assert_eq!(resolved.label, DEFAULT_LABEL);
    }

    #[test]
    fn test_falsy_label_falls_through() {
        let cfg = FieldConfig::default();
        for falsy in [json!(0), json!(0.0), json!(false), json!({}), json!([]), json!("")] {
            let rec = json!({"landmarks": [1], "gestureDefinitionId": falsy, "label": "wave"});
            assert_eq!(cfg.resolve(0, &rec).unwrap().label, "wave");
        }

        let rec = json!({"landmarks": [1], "gestureDefinitionId": 0});
        assert_eq!(cfg.resolve(0, &rec).unwrap().label, DEFAULT_LABEL);

        let rec = json!({"landmarks": [1], "label": true});
        assert_eq!(cfg.resolve(0, &rec).unwrap().label, "true");
    }

    #[test]
    fn test_falsy_payload_falls_through() {
        let cfg = FieldConfig::default();
        let rec = json!({"landmarkData": {}, "landmarks": [2.0]});
        assert_eq!(cfg.resolve(0, &rec).unwrap().payload, Some(&json!([2.0])));

        let rec = json!({"landmarkData": false});
        assert!(cfg.resolve(0, &rec).unwrap().payload.is_none());
    }

    #[test]
    fn test_take_moves_value_out() {
        let chain = FieldChain::new(["missing", "/data/rows"]);
        let mut doc = json!({"data": {"rows": []}});
        assert_eq!(chain.take(&mut doc), Some(json!([])));
        assert_eq!(doc, json!({"data": {"rows": null}}));
        assert_eq!(chain.take(&mut doc), None);
    }

    #[test]
    fn test_numeric_labels_are_stringified() {
        let cfg = FieldConfig::default();
        let rec = json!({"landmarks": [1], "label": 7});
        assert_eq!(cfg.resolve(0, &rec).unwrap().label, "7");
    }

    #[test]
    fn test_structured_label_is_rejected() {
        let cfg = FieldConfig::default();
        let rec = json!({"landmarks": [1], "label": {"id": 1}});
        let err = cfg.resolve(4, &rec).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::UnsupportedLabel { index: 4, kind: "object" }
        ));
    }

    #[test]
    fn test_pointer_accessor() {
        let cfg = FieldConfig::default()
            .with_landmarks(FieldChain::new(["/sample/frames", "landmarks"]));
        let rec = json!({"sample": {"frames": [[1, 2]]}});
        assert_eq!(cfg.resolve(0, &rec).unwrap().payload, Some(&json!([[1, 2]])));
    }

    #[test]
    fn test_accessor_serde_roundtrip_as_strings() {
        let chain = FieldChain::new(["landmarkData", "/a/b"]);
        let json = serde_json::to_string(&chain).unwrap();
        assert_eq!(json, r#"["landmarkData","/a/b"]"#);
        let back: FieldChain = serde_json::from_str(&json).unwrap();
        assert_eq!(back.accessors()[1], FieldAccessor::Pointer("/a/b".into()));
    }

    #[test]
    fn test_flatten_nested() {
        let mut out = Vec::new();
        flatten_payload(0, &json!([[1, 2, 3], [[4.5], 6]]), &mut out).unwrap();
        assert_eq!(out, vec![1.0, 2.0, 3.0, 4.5, 6.0]);
    }

    #[test]
    fn test_flatten_decodes_json_text() {
        let mut out = Vec::new();
        flatten_payload(0, &json!("[1, 2, [3]]"), &mut out).unwrap();
        assert_eq!(out, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_flatten_rejects_non_numeric() {
        let mut out = Vec::new();
        let err = flatten_payload(2, &json!([1, "x"]), &mut out).unwrap_err();
        assert!(matches!(err, DatasetError::MalformedRecord { index: 2, .. }));
        assert!(err.to_string().contains("string"));
    }

    #[test]
    fn test_validate() {
        assert!(FieldConfig::default().validate().is_ok());
        let bad = FieldConfig::default().with_landmarks(FieldChain::default());
        assert!(bad.validate().is_err());
        let bad = FieldConfig::default().with_default_label("");
        assert!(bad.validate().is_err());
    }
}
