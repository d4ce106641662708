//! Demo-request intake route: `/api/demo-request`
//!
//! Accepts the landing page's "Book a demo" form, filters honeypot spam,
//! validates the submission, and relays it by email. The route answers every
//! method itself so that wrong methods get the JSON envelope instead of an
//! empty 405.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;

use haulwise_core::validate::is_spam;
use haulwise_core::{DemoRequest, DemoRequestPayload, SendReport};

use crate::error::AppError;
use crate::state::AppState;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// In-flight submissions allowed at once.
pub const MAX_CONCURRENT_REQUESTS: usize = 64;

const INVALID_JSON: &str = "Invalid JSON body";

/// Build the demo-request router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/demo-request", any(demo_request))
        .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_REQUESTS))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("content-type"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}

// ── Response types ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct SpamResponse {
    ok: bool,
    spam: bool,
}

#[derive(Debug, Serialize)]
struct SentResponse {
    ok: bool,
    sent: SendReport,
}

// ── Handler ──────────────────────────────────────────────────────────

/// `POST /api/demo-request` — validate and relay a demo request.
///
/// `OPTIONS` is answered with 204 for CORS pre-flight. A filled honeypot gets
/// a normal-looking success so bots cannot tell they were filtered.
async fn demo_request(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, AppError> {
    let (parts, body) = request.into_parts();

    match parts.method {
        Method::OPTIONS => return Ok(StatusCode::NO_CONTENT.into_response()),
        Method::POST => {}
        _ => return Err(AppError::MethodNotAllowed),
    }

    let service = state.intake.as_ref().ok_or(AppError::NotConfigured)?;

    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|_| AppError::BadRequest(INVALID_JSON.to_owned()))?;
    let payload = parse_payload(&bytes)?;

    if is_spam(&payload) {
        info!("honeypot filled, demo request dropped");
        return Ok(Json(SpamResponse {
            ok: true,
            spam: true,
        })
        .into_response());
    }

    let peer = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let ip = client_ip(&parts.headers, peer);

    let demo = DemoRequest::from_payload(&payload, ip.as_deref(), Utc::now())?;
    let sent = service.submit(&demo).await?;

    Ok(Json(SentResponse { ok: true, sent }).into_response())
}

/// Parse the body as a JSON object into a payload.
///
/// Only malformed JSON and non-object bodies are rejected. Odd field values
/// are handled by [`DemoRequestPayload::from_json_object`] so a filled
/// honeypot or a stray numeric UTM tag never turns into a 400.
fn parse_payload(bytes: &[u8]) -> Result<DemoRequestPayload, AppError> {
    let value: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|_| AppError::BadRequest(INVALID_JSON.to_owned()))?;
    let object = value
        .as_object()
        .ok_or_else(|| AppError::BadRequest(INVALID_JSON.to_owned()))?;
    Ok(DemoRequestPayload::from_json_object(object))
}

/// First `X-Forwarded-For` entry, else the connection peer.
fn client_ip(headers: &HeaderMap, peer: Option<IpAddr>) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .or_else(|| peer.map(|ip| ip.to_string()))
}
