pub mod monitoring;
pub mod source_client;
pub mod source_service;

pub use monitoring::ServiceMetrics;
pub use source_client::{FetchError, HttpRecordSource, RecordSource};
pub use source_service::SourceService;
