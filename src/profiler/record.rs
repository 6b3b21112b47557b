use super::value::FieldValue;
use indexmap::IndexMap;
use serde_json::Value;

/// One element of an ingested array: field names in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: IndexMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Record::insert`].
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets a field, keeping its original position if it already exists.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Lookup that tries `position` first. Records from one API usually
    /// share a key order, so this skips hashing in the common case.
    pub(crate) fn get_near(&self, name: &str, position: usize) -> Option<&FieldValue> {
        match self.fields.get_index(position) {
            Some((k, v)) if k == name => Some(v),
            _ => self.get(name),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Objects become records; any other JSON value becomes a record
    /// without fields.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| (k.clone(), FieldValue::from(v)))
                .collect(),
            _ => Self::default(),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
