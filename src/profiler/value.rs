use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use utoipa::ToSchema;

/// Marker appended to truncated string samples.
pub const MASK_MARKER: &str = "***";

/// Strings longer than this many characters are masked in samples.
pub const MASK_THRESHOLD: usize = 10;

/// Characters kept from the front of a masked string.
pub const MASK_KEEP: usize = 5;

/// A single cell value as seen by the profiler.
///
/// JSON documents only ever produce `Null`, `Boolean`, `Number`, `String`
/// and `Object` (arrays included). `DateTime` and `Unknown` exist for
/// records assembled in code.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Boolean(bool),
    Number(Number),
    String(String),
    DateTime(DateTime<Utc>),
    Object(Value),
    Unknown,
}

/// Column type reported in a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Null,
    Numeric,
    Boolean,
    String,
    Datetime,
    Object,
    Unknown,
}

/// Hashable identity used for distinct-value counting.
#[derive(Debug, PartialEq, Eq, Hash)]
pub(crate) enum UniqueKey<'a> {
    Boolean(bool),
    Number(u64),
    String(&'a str),
    DateTime(i64, u32),
    Object(String),
    Unknown,
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn data_type(&self) -> DataType {
        match self {
            FieldValue::Null => DataType::Null,
            FieldValue::Number(_) => DataType::Numeric,
            FieldValue::Boolean(_) => DataType::Boolean,
            FieldValue::String(_) => DataType::String,
            FieldValue::DateTime(_) => DataType::Datetime,
            FieldValue::Object(_) => DataType::Object,
            FieldValue::Unknown => DataType::Unknown,
        }
    }

    /// JSON rendering used for samples. `Unknown` has no JSON form and
    /// renders as `null`.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null | FieldValue::Unknown => Value::Null,
            FieldValue::Boolean(b) => Value::Bool(*b),
            FieldValue::Number(n) => Value::Number(n.clone()),
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::DateTime(dt) => Value::String(super::format_timestamp(dt)),
            FieldValue::Object(v) => v.clone(),
        }
    }

    /// Numbers compare by value, objects by their canonical JSON text.
    pub(crate) fn unique_key(&self) -> Option<UniqueKey<'_>> {
        let key = match self {
            FieldValue::Null => return None,
            FieldValue::Boolean(b) => UniqueKey::Boolean(*b),
            FieldValue::Number(n) => UniqueKey::Number(number_bits(n)),
            FieldValue::String(s) => UniqueKey::String(s),
            FieldValue::DateTime(dt) => UniqueKey::DateTime(dt.timestamp(), dt.timestamp_subsec_nanos()),
            FieldValue::Object(v) => UniqueKey::Object(canonical_json(v)),
            FieldValue::Unknown => UniqueKey::Unknown,
        };
        Some(key)
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Boolean(b),
            Value::Number(n) => FieldValue::Number(n),
            Value::String(s) => FieldValue::String(s),
            other @ (Value::Array(_) | Value::Object(_)) => FieldValue::Object(other),
        }
    }
}

impl From<&Value> for FieldValue {
    fn from(value: &Value) -> Self {
        FieldValue::from(value.clone())
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Boolean(b)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n.into())
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(dt: DateTime<Utc>) -> Self {
        FieldValue::DateTime(dt)
    }
}

/// Type of the first present value, or `null` for an all-null column.
pub fn infer_data_type(value: Option<&FieldValue>) -> DataType {
    match value {
        None => DataType::Null,
        Some(v) => v.data_type(),
    }
}

/// Truncate long strings to a short prefix plus [`MASK_MARKER`].
/// Everything else passes through as JSON.
pub fn mask_sample(value: &FieldValue) -> Value {
    match value {
        FieldValue::String(s) if s.chars().count() > MASK_THRESHOLD => {
            let prefix: String = s.chars().take(MASK_KEEP).collect();
            Value::String(format!("{prefix}{MASK_MARKER}"))
        }
        other => other.to_json(),
    }
}

fn number_bits(n: &Number) -> u64 {
    normalized(n).to_bits()
}

// -0 and 0 are the same value
fn normalized(n: &Number) -> f64 {
    match n.as_f64().unwrap_or(f64::NAN) {
        f if f == 0.0 => 0.0,
        f => f,
    }
}

fn canonical_json(value: &Value) -> String {
    fn write(value: &Value, out: &mut String) {
        match value {
            Value::Object(map) => {
                let mut entries: Vec<_> = map.iter().collect();
                entries.sort_by(|a, b| a.0.cmp(b.0));
                out.push('{');
                for (i, (k, v)) in entries.into_iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push_str(&Value::String(k.clone()).to_string());
                    out.push(':');
                    write(v, out);
                }
                out.push('}');
            }
            Value::Array(items) => {
                out.push('[');
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    write(v, out);
                }
                out.push(']');
            }
            // same numeric identity as top-level numbers: {"x":1} == {"x":1.0}
            Value::Number(n) => out.push_str(&normalized(n).to_string()),
            scalar => out.push_str(&scalar.to_string()),
        }
    }

    let mut out = String::new();
    write(value, &mut out);
    out
}
