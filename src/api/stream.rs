//! NDJSON claim stream endpoint
//!
//! The session controller runs as its own task; lines flow through a
//! bounded channel into the chunked response body. Dropping the response
//! (client disconnect) closes the channel and aborts the session's live
//! phase promptly.

use std::convert::Infallible;

use actix_web::{HttpResponse, Responder, post, web};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::app::AppState;
use crate::model::StreamEvent;

const CHANNEL_CAPACITY: usize = 32;

/// Open a claim stream for a job
///
/// Replays all previously emitted claims (merged with any saved
/// verification results) in original order, then continues live emission.
/// One JSON object per line: `claim`, `progress`, `error`, and a single
/// terminal `done`.
#[utoipa::path(
    post,
    path = "/v1/jobs/{job_id}/stream",
    params(("job_id" = String, Path, description = "Job identifier")),
    responses(
        (status = 200, description = "NDJSON event stream, one JSON object per line", body = String, content_type = "application/x-ndjson")
    ),
    tag = "claims"
)]
#[post("/v1/jobs/{job_id}/stream")]
pub async fn stream_claims(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let job_id = path.into_inner();
    let (tx, rx) = mpsc::channel::<StreamEvent>(CHANNEL_CAPACITY);

    let session = state.session.clone();
    tokio::spawn(async move {
        session.run(&job_id, tx).await;
    });

    let body = ReceiverStream::new(rx)
        .map(|event| Ok::<_, Infallible>(web::Bytes::from(event.to_ndjson())));

    HttpResponse::Ok()
        .content_type("application/x-ndjson")
        .streaming(body)
}

/// Configure stream routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(stream_claims);
}
