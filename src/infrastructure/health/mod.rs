//! Process status endpoint
//!
//! A single listener answering `GET /` (and `/health`) with a JSON
//! snapshot: configured flags, uptime, session counters. Not part of the
//! bot protocol.

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};

use crate::application::AppContext;

pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/health", get(status))
        .with_state(ctx)
}

async fn status(State(ctx): State<Arc<AppContext>>) -> impl IntoResponse {
    let stats = ctx
        .stats
        .lock()
        .map(|s| s.snapshot())
        .unwrap_or_else(|poisoned| poisoned.into_inner().snapshot());

    Json(serde_json::json!({
        "status": "ok",
        "service": ctx.bot_name,
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": ctx.uptime_seconds(),
        "token_configured": ctx.token_configured,
        "launch_url_configured": ctx.launch_url_configured,
        "stats": stats,
    }))
}

/// Bind and serve until the task is aborted at shutdown.
pub async fn serve(ctx: Arc<AppContext>, port: u16) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("Status endpoint listening on port {}", port);
    axum::serve(listener, router(ctx)).await
}
