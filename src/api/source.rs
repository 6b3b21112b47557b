use actix_web::{post, web, HttpMessage, HttpRequest, HttpResponse, Result};
use crate::errors::ApiError;
use crate::middleware::RequestId;
use crate::models::{DatasetMetadata, ErrorResponse, SourceRequest};
use crate::services::SourceService;
use std::sync::Arc;
use tracing::{info_span, Instrument};

/// Fetch a remote JSON array and profile its columns
///
/// The remote URL is read with a single GET. The first record's keys
/// define the columns; every column gets a type, null and uniqueness
/// ratios, and up to three masked sample values.
#[utoipa::path(
    post,
    path = "/api/source",
    tag = "source",
    request_body = SourceRequest,
    responses(
        (status = 200, description = "Dataset and column metadata", body = DatasetMetadata),
        (status = 400, description = "Missing or falsy `apiUrl` and a non-array API response give `message` only; an unparseable body adds `error`", body = ErrorResponse),
        (status = 500, description = "Remote fetch or processing failed, or `apiUrl` is not a string; `error` holds the cause", body = ErrorResponse)
    )
)]
#[post("/source")]
pub async fn source_endpoint(
    http_req: HttpRequest,
    body: web::Bytes,
    service: web::Data<Arc<SourceService>>,
) -> Result<HttpResponse, ApiError> {
    let request_id = http_req
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();

    let req = parse_request(&body)?;
    let metadata = service
        .extract(req.api_url.as_ref())
        .instrument(info_span!("source_extract", request_id = %request_id))
        .await?;
    Ok(HttpResponse::Ok().json(metadata))
}

// An empty body is treated like `{}` so the caller gets the missing-URL
// message rather than a parse error.
fn parse_request(body: &[u8]) -> Result<SourceRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(SourceRequest::default());
    }
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| ApiError::InvalidPayload(e.to_string()))?;
    if !value.is_object() {
        return Err(ApiError::InvalidPayload("expected a JSON object".to_string()));
    }
    serde_json::from_value(value).map_err(|e| ApiError::InvalidPayload(e.to_string()))
}
