use actix_web::HttpResponse;
use utoipa::OpenApi;
use crate::models::*;
use crate::profiler::DataType;

#[derive(OpenApi)]
#[openapi(
    paths(crate::api::source::source_endpoint),
    components(
        schemas(
            SourceRequest,
            DatasetMetadata,
            DatasetInfo,
            ColumnProfile,
            DataType,
            ErrorResponse
        )
    ),
    tags(
        (name = "source", description = "Remote API ingestion and column profiling")
    ),
    info(
        title = "Source Profiler API",
        version = "0.1.0",
        description = "Profiles the columns of a JSON array served by a remote API",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
