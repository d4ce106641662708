//! Health endpoint: `/api/health`
//!
//! Unauthenticated. Reports whether the demo-request endpoint can send mail,
//! so a deploy with a missing credential is visible before a lead hits it.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Build the health router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub mail_configured: bool,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        mail_configured: state.intake.is_some(),
    })
}
