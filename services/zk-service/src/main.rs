use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::info;

use vibestream_zk_service::config::Config;
use vibestream_zk_service::handlers;
use vibestream_zk_service::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    vibestream_core::logging::init();

    let config = Config::load()?;
    let port = config.port;
    let state = Arc::new(AppState::new(config)?);

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/prove", post(handlers::prove))
        .route("/verify", post(handlers::verify))
        .route("/stats", get(handlers::stats))
        .with_state(state);

    let bind_addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&bind_addr).await?;
    info!("zk-service listening on {}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn health_check() -> Result<Json<Value>, StatusCode> {
    Ok(Json(json!({
        "status": "healthy",
        "service": "zk-service",
        "timestamp": Utc::now().to_rfc3339()
    })))
}
