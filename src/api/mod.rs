use actix_web::{web, App, HttpServer};
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

use crate::config::ServerConfig;
use crate::middleware::RequestIdMiddleware;
use crate::profiler::SchemaProfiler;
use crate::services::{HttpRecordSource, ServiceMetrics, SourceService};

pub mod monitoring;
pub mod openapi;
pub mod source;

pub fn create_app(
    service: Arc<SourceService>,
    max_payload_bytes: usize,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(TracingLogger::default())
        .wrap(RequestIdMiddleware)
        .app_data(web::Data::new(service))
        .app_data(web::PayloadConfig::new(max_payload_bytes))
        .service(web::scope("/api").service(source::source_endpoint))
        .service(
            web::scope("/monitoring")
                .route("/metrics", web::get().to(monitoring::metrics))
                .route("/live", web::get().to(monitoring::live)),
        )
        .route("/api-docs/openapi.json", web::get().to(openapi::openapi_json))
}

/// Service wired to the real HTTP client, system clock and UUIDs.
pub fn build_service(config: &ServerConfig) -> anyhow::Result<Arc<SourceService>> {
    let source = HttpRecordSource::new(config.fetch_timeout(), &config.user_agent)?;
    let metrics = ServiceMetrics::new()?;
    Ok(Arc::new(SourceService::new(
        Arc::new(source),
        SchemaProfiler::default(),
        metrics,
    )))
}

pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let service = build_service(&config)?;
    let max_payload_bytes = config.max_payload_bytes;

    HttpServer::new(move || create_app(service.clone(), max_payload_bytes))
        .bind(config.bind_address.as_str())?
        .run()
        .await?;
    Ok(())
}
