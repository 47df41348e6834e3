//! OpenAPI specification endpoints

use actix_web::{HttpResponse, Responder, get};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::job::create_job,
        crate::api::stream::stream_claims,
        crate::api::verify::verify_claim,
        crate::api::health::liveness,
        crate::api::health::readiness,
    ),
    components(schemas(
        crate::api::job::CreateJobRequest,
        crate::api::job::CreateJobResponse,
        crate::api::verify::VerifyClaimRequest,
        crate::api::error::ErrorResponse,
        crate::model::Claim,
        crate::model::CitationStatus,
        crate::model::Verdict,
        crate::model::Evidence,
        crate::model::VerificationOutcome,
        crate::model::VerificationRecord,
        crate::model::Job,
        crate::model::JobStatus,
        crate::model::ProgressPayload,
        crate::model::ErrorPayload,
    )),
    tags(
        (name = "jobs", description = "Job lifecycle"),
        (name = "claims", description = "Claim streaming and verification"),
        (name = "health", description = "Probes")
    ),
    info(
        title = "papertrail",
        description = "Ephemeral claim-verification state store with a streaming replay/merge protocol"
    )
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
#[get("/openapi.json")]
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Serve OpenAPI YAML specification
#[get("/openapi.yaml")]
pub async fn openapi_yaml() -> impl Responder {
    match ApiDoc::openapi().to_yaml() {
        Ok(yaml) => HttpResponse::Ok().content_type("text/yaml").body(yaml),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render OpenAPI YAML");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Configure OpenAPI routes
pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(openapi_json).service(openapi_yaml);
}
