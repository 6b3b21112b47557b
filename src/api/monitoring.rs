use actix_web::{web, HttpResponse, Result as ActixResult};
use crate::services::SourceService;
use std::sync::Arc;

// Prometheus metrics endpoint
pub async fn metrics(service: web::Data<Arc<SourceService>>) -> ActixResult<HttpResponse> {
    match service.metrics().render_metrics() {
        Ok(metrics_text) => Ok(HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4; charset=utf-8")
            .body(metrics_text)),
        Err(e) => Ok(HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Failed to render metrics",
            "details": e.to_string()
        }))),
    }
}

// Liveness probe
pub async fn live() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "alive",
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}
