use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

use crate::models::ErrorResponse;

pub const MISSING_URL_MESSAGE: &str = "API URL is required";
pub const NOT_AN_ARRAY_MESSAGE: &str = "API did not return an array of data";
pub const INVALID_PAYLOAD_MESSAGE: &str = "Invalid request body";
pub const UPSTREAM_MESSAGE: &str = "Failed to fetch or process API data";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{}", MISSING_URL_MESSAGE)]
    MissingUrl,

    #[error("{}", NOT_AN_ARRAY_MESSAGE)]
    NotAnArray,

    #[error("Invalid request: {0}")]
    InvalidPayload(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::MissingUrl | ApiError::NotAnArray => ErrorResponse {
                message: self.to_string(),
                error: None,
            },
            ApiError::InvalidPayload(detail) => ErrorResponse {
                message: INVALID_PAYLOAD_MESSAGE.to_string(),
                error: Some(detail.clone()),
            },
            ApiError::Upstream(detail) | ApiError::Internal(detail) => ErrorResponse {
                message: UPSTREAM_MESSAGE.to_string(),
                error: Some(detail.clone()),
            },
        };
        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingUrl => StatusCode::BAD_REQUEST,
            ApiError::NotAnArray => StatusCode::BAD_REQUEST,
            ApiError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use serde_json::{json, Value};

    async fn body_of(err: ApiError) -> (StatusCode, Value) {
        let resp = err.error_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn test_missing_url_body() {
        let (status, body) = body_of(ApiError::MissingUrl).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"message": "API URL is required"}));
    }

    #[actix_web::test]
    async fn test_not_an_array_body() {
        let (status, body) = body_of(ApiError::NotAnArray).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"message": "API did not return an array of data"}));
    }

    #[actix_web::test]
    async fn test_invalid_payload_body() {
        let (status, body) = body_of(ApiError::InvalidPayload("EOF while parsing".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"message": "Invalid request body", "error": "EOF while parsing"}));
    }

    #[actix_web::test]
    async fn test_upstream_body() {
        let (status, body) = body_of(ApiError::Upstream("connection refused".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({"message": "Failed to fetch or process API data", "error": "connection refused"})
        );
    }
}
