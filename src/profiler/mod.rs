//! Schema inference and per-column statistics for a set of JSON records.
//!
//! Columns come from the keys of the first record only. Later records are
//! read at those keys; a missing key counts as null.

mod clock;
mod record;
mod value;

pub use clock::{Clock, FixedClock, IdGenerator, SystemClock, UuidGenerator};
pub use record::Record;
pub use value::{infer_data_type, mask_sample, DataType, FieldValue, MASK_MARKER};

use crate::models::{ColumnProfile, DatasetInfo, DatasetMetadata};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

/// Label attached to every dataset ingested from a remote API.
pub const DETECTED_DOMAIN: &str = "API Source";

/// Number of sample values kept per column.
pub const SAMPLE_SIZE: usize = 3;

/// RFC 3339, UTC, millisecond precision: `2024-05-01T12:00:00.000Z`.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Clone)]
pub struct SchemaProfiler {
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl Default for SchemaProfiler {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(UuidGenerator))
    }
}

impl SchemaProfiler {
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { clock, ids }
    }

    /// Profile the elements of a JSON array.
    pub fn profile_json(&self, source_url: &str, rows: &[Value]) -> DatasetMetadata {
        let records: Vec<Record> = rows.iter().map(Record::from_json).collect();
        self.profile(source_url, &records)
    }

    pub fn profile(&self, source_url: &str, records: &[Record]) -> DatasetMetadata {
        let columns = match records.first() {
            None => Vec::new(),
            Some(first) => first
                .keys()
                .enumerate()
                .map(|(position, name)| {
                    let values: Vec<Option<&FieldValue>> = records
                        .iter()
                        .map(|record| record.get_near(name, position))
                        .collect();
                    profile_column(name, &values)
                })
                .collect(),
        };

        let dataset = DatasetInfo {
            dataset_id: self.ids.next_id(),
            dataset_name: source_url.to_string(),
            row_count: records.len(),
            column_count: columns.len(),
            detected_domain: DETECTED_DOMAIN.to_string(),
            ingestion_timestamp: format_timestamp(&self.clock.now()),
        };

        DatasetMetadata::new(dataset, columns)
    }
}

/// Statistics for one column. `values` holds one entry per row; `None`
/// marks a row that lacks the key. Ratios are over `values.len()`.
pub fn profile_column(name: &str, values: &[Option<&FieldValue>]) -> ColumnProfile {
    let row_count = values.len();
    let present: Vec<&FieldValue> = values
        .iter()
        .filter_map(|v| *v)
        .filter(|v| !v.is_null())
        .collect();

    let null_count = values.len() - present.len();
    let unique_count = present
        .iter()
        .filter_map(|v| v.unique_key())
        .collect::<HashSet<_>>()
        .len();

    let sample_values_masked = present
        .iter()
        .take(SAMPLE_SIZE)
        .map(|v| mask_sample(v))
        .collect();

    ColumnProfile {
        column_name: name.to_string(),
        inferred_data_type: infer_data_type(present.first().copied()),
        null_count,
        null_ratio: ratio(null_count, row_count),
        unique_count,
        unique_ratio: ratio(unique_count, row_count),
        sample_values_masked,
    }
}

fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}
