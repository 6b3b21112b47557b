use crate::errors::ApiError;
use crate::models::DatasetMetadata;
use crate::profiler::SchemaProfiler;
use crate::services::monitoring::{
    ServiceMetrics, OUTCOME_BAD_REQUEST, OUTCOME_OK, OUTCOME_UPSTREAM_ERROR,
};
use crate::services::source_client::RecordSource;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Fetches a remote JSON array and profiles it.
pub struct SourceService {
    source: Arc<dyn RecordSource>,
    profiler: SchemaProfiler,
    metrics: ServiceMetrics,
}

impl SourceService {
    pub fn new(source: Arc<dyn RecordSource>, profiler: SchemaProfiler, metrics: ServiceMetrics) -> Self {
        Self {
            source,
            profiler,
            metrics,
        }
    }

    pub fn metrics(&self) -> &ServiceMetrics {
        &self.metrics
    }

    /// `api_url` is the raw `apiUrl` request field. Absent, `null`, `false`,
    /// `0` and `""` all mean no URL was given.
    pub async fn extract(&self, api_url: Option<&Value>) -> Result<DatasetMetadata, ApiError> {
        let result = self.run(api_url).await;
        let outcome = match &result {
            Ok(_) => OUTCOME_OK,
            Err(ApiError::Upstream(_)) | Err(ApiError::Internal(_)) => OUTCOME_UPSTREAM_ERROR,
            Err(_) => OUTCOME_BAD_REQUEST,
        };
        self.metrics.record_outcome(outcome);
        result
    }

    async fn run(&self, api_url: Option<&Value>) -> Result<DatasetMetadata, ApiError> {
        let api_url = resolve_url(api_url)?;

        let started = Instant::now();
        let fetched = self.source.fetch(api_url).await;
        self.metrics
            .fetch_duration
            .observe(started.elapsed().as_secs_f64());

        let document = fetched.map_err(|e| {
            error!(url = %api_url, error = %e, "Error fetching or processing API data");
            ApiError::Upstream(e.to_string())
        })?;

        let rows = match document {
            Value::Array(rows) => rows,
            other => {
                warn!(url = %api_url, kind = json_kind(&other), "API did not return an array");
                return Err(ApiError::NotAnArray);
            }
        };

        let metadata = self.profiler.profile_json(api_url, &rows);
        self.metrics
            .record_profile(metadata.dataset.row_count, metadata.dataset.column_count);

        info!(
            url = %api_url,
            dataset_id = %metadata.dataset.dataset_id,
            rows = metadata.dataset.row_count,
            columns = metadata.dataset.column_count,
            "Profiled API source"
        );

        Ok(metadata)
    }
}

fn resolve_url(api_url: Option<&Value>) -> Result<&str, ApiError> {
    match api_url {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Err(ApiError::MissingUrl),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Err(ApiError::MissingUrl),
        Some(Value::String(url)) if url.is_empty() => Err(ApiError::MissingUrl),
        Some(Value::String(url)) => Ok(url),
        // Present but not a string: nothing can be fetched from it.
        Some(other) => {
            let kind = json_kind(other);
            error!(kind, "Error fetching or processing API data: apiUrl is not a string");
            Err(ApiError::Upstream(format!("Invalid URL: expected a string, got {kind}")))
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
