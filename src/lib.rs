//! Source Profiler: fetch a JSON array from a remote API and describe its columns.

pub mod api;
pub mod config;
pub mod errors;
pub mod logger;
pub mod middleware;
pub mod models;
pub mod profiler;
pub mod services;

pub use errors::ApiError;
pub use models::{ColumnProfile, DatasetInfo, DatasetMetadata, SourceRequest};
pub use profiler::{DataType, FieldValue, Record, SchemaProfiler};
