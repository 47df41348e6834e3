use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod app;
mod model;
mod repository;
mod service;
mod store;

use app::AppState;
use model::Config;
use service::{LexicalVerifier, ScriptedProducer};
use store::{InMemoryTtlStore, RedisTtlStore, TtlStore};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present (ignore if missing)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let bind_addr = config.bind_addr();

    // Connect the TTL store; everything the service holds lives in it
    let ttl_store: Arc<dyn TtlStore> = match RedisTtlStore::new().await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::warn!(error = %e, "Redis unavailable, falling back to in-memory store (state will not survive restarts)");
            Arc::new(InMemoryTtlStore::new())
        }
    };

    let state = web::Data::new(AppState::new(
        ttl_store,
        Arc::new(ScriptedProducer::demo()),
        Arc::new(LexicalVerifier::new()),
        config.ttl,
    ));

    tracing::info!("Starting papertrail server on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::job::configure)
            .configure(api::stream::configure)
            .configure(api::verify::configure)
            .configure(api::health::configure)
            .configure(api::openapi::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await
}
