//! Job creation endpoint

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::{ApiError, ErrorResponse};
use crate::app::AppState;
use crate::model::Job;

/// Optional request body; jobs are normally minted server-side.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    /// Caller-supplied job identifier. Leave unset to have one generated.
    #[serde(default)]
    pub job_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobResponse {
    pub job_id: String,
}

/// Create a job and start its TTL window
#[utoipa::path(
    post,
    path = "/v1/jobs",
    request_body(content = CreateJobRequest, description = "Optional; omit to have an id minted"),
    responses(
        (status = 201, description = "Job created", body = CreateJobResponse),
        (status = 409, description = "Job id already in use", body = ErrorResponse),
        (status = 503, description = "State store unavailable", body = ErrorResponse)
    ),
    tag = "jobs"
)]
#[post("/v1/jobs")]
pub async fn create_job(
    state: web::Data<AppState>,
    body: Option<web::Json<CreateJobRequest>>,
) -> Result<HttpResponse, ApiError> {
    let requested = body
        .map(|b| b.into_inner())
        .unwrap_or_default()
        .job_id
        .filter(|id| !id.trim().is_empty());

    let job = match requested {
        Some(id) => state.jobs.create(Job::new(id)).await?,
        None => state.jobs.mint().await?,
    };

    tracing::info!(job_id = %job.id, "job created");
    Ok(HttpResponse::Created().json(CreateJobResponse { job_id: job.id }))
}

/// Configure job routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_job);
}
