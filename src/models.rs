use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::profiler::DataType;

// Source endpoint models
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SourceRequest {
    /// Any JSON value is accepted here; `SourceService::extract` decides
    /// whether it is a usable URL.
    #[serde(rename = "apiUrl", default)]
    #[schema(value_type = Option<String>)]
    pub api_url: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct DatasetMetadata {
    pub dataset: DatasetInfo,
    pub columns: Vec<ColumnProfile>,
    // Reserved for later enrichment; always empty for now.
    #[schema(value_type = Object)]
    pub numeric_stats: Map<String, Value>,
    #[schema(value_type = Object)]
    pub categorical_stats: Map<String, Value>,
    #[schema(value_type = Object)]
    pub temporal_stats: Map<String, Value>,
    #[schema(value_type = Object)]
    pub patterns: Map<String, Value>,
    #[schema(value_type = Object)]
    pub compliance_flags: Map<String, Value>,
}

impl DatasetMetadata {
    pub fn new(dataset: DatasetInfo, columns: Vec<ColumnProfile>) -> Self {
        Self {
            dataset,
            columns,
            numeric_stats: Map::new(),
            categorical_stats: Map::new(),
            temporal_stats: Map::new(),
            patterns: Map::new(),
            compliance_flags: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct DatasetInfo {
    pub dataset_id: String,
    pub dataset_name: String,
    pub row_count: usize,
    pub column_count: usize,
    pub detected_domain: String,
    pub ingestion_timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct ColumnProfile {
    pub column_name: String,
    pub inferred_data_type: DataType,
    pub null_count: usize,
    pub null_ratio: f64,
    pub unique_count: usize,
    pub unique_ratio: f64,
    #[schema(value_type = Vec<Object>)]
    pub sample_values_masked: Vec<Value>,
}

// Error body. `error` carries the underlying failure and is left out for
// the plain validation messages.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
