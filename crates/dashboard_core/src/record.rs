use serde_json::{Map, Number, Value};

/// One cluster run as reported by the overview endpoint.
///
/// Every field is optional: the endpoint is not schema-checked, and a missing
/// or mistyped field simply renders empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobRecord {
    /// Display text of `runId` (string or number).
    pub run_id: Option<String>,
    pub cluster: Option<String>,
    pub status: Option<String>,
    pub done_segments: Option<u64>,
    pub total_segments: Option<u64>,
}

impl JobRecord {
    fn from_value(value: &Value) -> Self {
        let Some(fields) = value.as_object() else {
            return Self::default();
        };
        Self {
            run_id: fields.get("runId").and_then(display_scalar),
            cluster: fields.get("cluster").and_then(display_scalar),
            status: fields.get("status").and_then(display_scalar),
            done_segments: fields.get("doneSegments").and_then(segment_count),
            total_segments: fields.get("totalSegments").and_then(segment_count),
        }
    }
}

/// Text shown for a scalar JSON value. Objects, arrays and null have no text.
fn display_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(display_number(number)),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Integral floats print without a fraction, so `1.0` reads as `1`.
fn display_number(number: &Number) -> String {
    if number.is_f64() {
        if let Some(whole) = number.as_f64().and_then(integral) {
            return whole.to_string();
        }
    }
    number.to_string()
}

fn segment_count(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .and_then(integral)
            .and_then(|whole| u64::try_from(whole).ok())
    })
}

/// Largest magnitude at which every f64 is still an exact integer.
const MAX_EXACT_F64: f64 = 9_007_199_254_740_992.0;

fn integral(value: f64) -> Option<i64> {
    (value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_EXACT_F64)
        .then_some(value as i64)
}

/// A keyed record: the key is the row identity across polls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedRecord {
    pub key: String,
    pub record: JobRecord,
}

/// Records in endpoint enumeration order. No sorting is ever applied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobCollection {
    entries: Vec<KeyedRecord>,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid json: {0}")]
    InvalidJson(String),
    #[error("expected a json object or array of records, found {found}")]
    UnexpectedShape { found: &'static str },
}

impl JobCollection {
    /// Parse an overview body.
    ///
    /// Objects are keyed by their member names in document order, arrays by
    /// element index.
    pub fn from_json(raw: &str) -> Result<Self, ParseError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|err| ParseError::InvalidJson(err.to_string()))?;
        match value {
            Value::Object(members) => Ok(Self::from_members(&members)),
            Value::Array(items) => Ok(Self::from_items(&items)),
            other => Err(ParseError::UnexpectedShape {
                found: value_kind(&other),
            }),
        }
    }

    fn from_members(members: &Map<String, Value>) -> Self {
        let entries = members
            .iter()
            .map(|(key, value)| KeyedRecord {
                key: key.clone(),
                record: JobRecord::from_value(value),
            })
            .collect();
        Self { entries }
    }

    fn from_items(items: &[Value]) -> Self {
        let entries = items
            .iter()
            .enumerate()
            .map(|(index, value)| KeyedRecord {
                key: index.to_string(),
                record: JobRecord::from_value(value),
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyedRecord> {
        self.entries.iter()
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn object_members_keep_document_order() {
        let raw = r#"{"zeta":{"cluster":"z"},"alpha":{"cluster":"a"},"mid":{"cluster":"m"}}"#;
        let collection = JobCollection::from_json(raw).unwrap();
        let keys: Vec<_> = collection.iter().map(|entry| entry.key.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn array_elements_are_keyed_by_index() {
        let raw = r#"[{"runId":"r-7","cluster":"east","status":"PAUSED","doneSegments":0,"totalSegments":4},{"runId":8}]"#;
        let collection = JobCollection::from_json(raw).unwrap();
        let entries: Vec<_> = collection.iter().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].key, "0");
        assert_eq!(entries[0].record.run_id.as_deref(), Some("r-7"));
        assert_eq!(entries[0].record.total_segments, Some(4));
        assert_eq!(entries[1].key, "1");
        assert_eq!(entries[1].record.run_id.as_deref(), Some("8"));
        assert_eq!(entries[1].record.cluster, None);
    }

    #[test]
    fn mistyped_fields_are_absent() {
        let raw = r#"{"a":{"runId":null,"cluster":["x"],"doneSegments":-1,"totalSegments":"ten"}}"#;
        let collection = JobCollection::from_json(raw).unwrap();
        let record = &collection.iter().next().unwrap().record;
        assert_eq!(record, &JobRecord::default());
    }

    #[test]
    fn integral_floats_read_as_integers() {
        let raw = r#"{"a":{"runId":1.0,"doneSegments":3.0,"totalSegments":10.0},"b":{"runId":2.5,"doneSegments":1.5,"totalSegments":-4.0}}"#;
        let collection = JobCollection::from_json(raw).unwrap();
        let records: Vec<_> = collection.iter().map(|entry| &entry.record).collect();
        assert_eq!(records[0].run_id.as_deref(), Some("1"));
        assert_eq!(records[0].done_segments, Some(3));
        assert_eq!(records[0].total_segments, Some(10));
        assert_eq!(records[1].run_id.as_deref(), Some("2.5"));
        assert_eq!(records[1].done_segments, None);
        assert_eq!(records[1].total_segments, None);
    }

    #[test]
    fn non_object_record_has_no_fields() {
        let collection = JobCollection::from_json(r#"{"a":5}"#).unwrap();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.iter().next().unwrap().record, JobRecord::default());
    }

    #[test]
    fn rejects_invalid_json_and_scalars() {
        assert!(matches!(
            JobCollection::from_json("{not json"),
            Err(ParseError::InvalidJson(_))
        ));
        assert_eq!(
            JobCollection::from_json("\"text\""),
            Err(ParseError::UnexpectedShape { found: "string" })
        );
        assert_eq!(
            JobCollection::from_json("null"),
            Err(ParseError::UnexpectedShape { found: "null" })
        );
    }
}
