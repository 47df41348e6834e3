//! Claim verification endpoint

use actix_web::{HttpResponse, post, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::error::{ApiError, ErrorResponse};
use crate::app::AppState;
use crate::service::SourceDocument;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyClaimRequest {
    /// Plain text of the cited source to verify the claim against
    pub source_document: String,
    /// Display title for evidence items (default: "Source document")
    #[serde(default)]
    pub paper_title: Option<String>,
}

/// Verify a claim against a submitted source document
///
/// Persists the resulting verdict for (job, claim); a repeated submission
/// overwrites the previous record. The merged record is reflected in every
/// subsequent replay of the claim stream.
#[utoipa::path(
    post,
    path = "/v1/jobs/{job_id}/claims/{claim_id}/verify",
    params(
        ("job_id" = String, Path, description = "Job identifier"),
        ("claim_id" = String, Path, description = "Claim identifier within the job")
    ),
    request_body = VerifyClaimRequest,
    responses(
        (status = 200, description = "Verification stored", body = crate::model::VerificationRecord),
        (status = 400, description = "Empty source document", body = ErrorResponse),
        (status = 404, description = "Job expired or never existed", body = ErrorResponse),
        (status = 502, description = "Verifier failure", body = ErrorResponse)
    ),
    tag = "claims"
)]
#[post("/v1/jobs/{job_id}/claims/{claim_id}/verify")]
pub async fn verify_claim(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    body: web::Json<VerifyClaimRequest>,
) -> Result<HttpResponse, ApiError> {
    let (job_id, claim_id) = path.into_inner();
    let body = body.into_inner();

    if body.source_document.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "sourceDocument must not be empty".to_string(),
        ));
    }

    let source = SourceDocument {
        title: body
            .paper_title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| "Source document".to_string()),
        text: body.source_document,
    };

    let record = state
        .verification
        .verify_claim(&job_id, &claim_id, source)
        .await?;
    Ok(HttpResponse::Ok().json(record))
}

/// Configure verification routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(verify_claim);
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};

    #[actix_web::test]
    async fn verify_against_gone_job_is_not_found() {
        let state = crate::app::AppState::for_tests();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/v1/jobs/ghost/claims/c1/verify")
            .set_json(serde_json::json!({"sourceDocument": "some text"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "job_gone");
    }

    #[actix_web::test]
    async fn empty_source_document_is_bad_request() {
        let state = crate::app::AppState::for_tests();
        let job = state.jobs.mint().await.unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("/v1/jobs/{}/claims/c1/verify", job.id))
            .set_json(serde_json::json!({"sourceDocument": "   "}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn verify_returns_the_merged_record_shape() {
        let state = crate::app::AppState::for_tests();
        let job = state.jobs.mint().await.unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("/v1/jobs/{}/claims/c1/verify", job.id))
            .set_json(serde_json::json!({
                "sourceDocument": "Transformers outperform RNNs on translation tasks in our benchmark.",
                "paperTitle": "Benchmark study"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["claimId"], "c1");
        assert!(body["verdict"].is_string());
        assert!(body["confidence"].is_number());
        assert!(body["reasoningMd"].is_string());
        assert!(body["evidence"].is_array());
        assert!(body["writtenAt"].is_string());
    }
}
