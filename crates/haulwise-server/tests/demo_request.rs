//! Integration tests for the Haulwise HTTP surface.
//!
//! These drive the real router with `tower::ServiceExt::oneshot` and an
//! in-memory mail transport, so no network or provider account is needed.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use haulwise_core::{DemoRequestService, MailAddresses};
use haulwise_mail::{MailError, MailTransport, MemoryTransport, MessageId, OutboundEmail};
use haulwise_server::app::build_router;
use haulwise_server::routes::demo::MAX_CONCURRENT_REQUESTS;
use haulwise_server::state::AppState;
use serde_json::{Value, json};
use tokio::sync::Semaphore;
use tower::ServiceExt;

// ── Helpers ──────────────────────────────────────────────────────────

fn addresses() -> MailAddresses {
    MailAddresses {
        from: "Haulwise <demo@haulwise.io>".to_owned(),
        team_to: "sales@haulwise.io".to_owned(),
        company_reply_to: "hello@haulwise.io".to_owned(),
    }
}

fn app_with(transport: &MemoryTransport) -> Router {
    app_over(Arc::new(transport.clone()))
}

fn app_over(transport: Arc<dyn MailTransport>) -> Router {
    let state = AppState {
        intake: Some(DemoRequestService::new(transport, addresses())),
    };
    build_router(Arc::new(state), None)
}

fn unconfigured_app() -> Router {
    build_router(Arc::new(AppState { intake: None }), None)
}

fn post(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/demo-request")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

fn post_json(body: &Value) -> Request<Body> {
    post(body.to_string())
}

fn valid_body() -> Value {
    json!({ "name": "Ana", "company": "Acme", "role": "Ops", "email": "ana@acme.com" })
}

/// Send `req` and return (status, parsed JSON body or `Null`).
async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// Headers every demo-request response carries, whatever its status.
fn assert_demo_headers(resp: &Response) {
    let headers = resp.headers();
    assert_eq!(headers.get(header::CACHE_CONTROL).unwrap(), "no-store");
    assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
        "POST, OPTIONS"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_HEADERS).unwrap(),
        "content-type"
    );
}

/// Transport whose sends park until the test opens the gate.
struct GatedTransport {
    entered: AtomicUsize,
    gate: Semaphore,
}

impl GatedTransport {
    fn closed() -> Self {
        Self {
            entered: AtomicUsize::new(0),
            gate: Semaphore::new(0),
        }
    }
}

#[async_trait::async_trait]
impl MailTransport for GatedTransport {
    async fn send(&self, _email: &OutboundEmail) -> Result<MessageId, MailError> {
        let index = self.entered.fetch_add(1, Ordering::SeqCst);
        let _permit = self.gate.acquire().await.unwrap();
        Ok(MessageId(format!("gated-{index}")))
    }
}

// ── Methods ──────────────────────────────────────────────────────────

#[tokio::test]
async fn options_preflight_is_no_content() {
    let transport = MemoryTransport::new();
    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/demo-request")
        .body(Body::empty())
        .unwrap();
    let resp = app_with(&transport).oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
    assert!(transport.attempts().await.is_empty());
}

#[tokio::test]
async fn get_is_method_not_allowed() {
    let transport = MemoryTransport::new();
    let req = Request::builder()
        .method(Method::GET)
        .uri("/api/demo-request")
        .body(Body::empty())
        .unwrap();
    let resp = app_with(&transport).oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(resp.headers().get(header::ALLOW).unwrap(), "POST, OPTIONS");
    assert_demo_headers(&resp);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "ok": false, "error": "Method not allowed" }));
}

// ── Configuration ────────────────────────────────────────────────────

#[tokio::test]
async fn missing_credential_is_server_error() {
    let (status, body) = send(unconfigured_app(), post_json(&valid_body())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"], "Email service is not configured");
}

// ── Body parsing and honeypot ────────────────────────────────────────

#[tokio::test]
async fn invalid_json_is_bad_request() {
    let transport = MemoryTransport::new();
    let (status, body) = send(app_with(&transport), post("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "ok": false, "error": "Invalid JSON body" }));
    assert!(transport.attempts().await.is_empty());
}

#[tokio::test]
async fn empty_body_is_bad_request() {
    let transport = MemoryTransport::new();
    let (status, _) = send(app_with(&transport), post(Body::empty())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_body_is_bad_request() {
    let transport = MemoryTransport::new();
    let huge = json!({ "name": "x".repeat(haulwise_server::routes::demo::MAX_BODY_BYTES) });
    let (status, _) = send(app_with(&transport), post_json(&huge)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(transport.attempts().await.is_empty());
}

#[tokio::test]
async fn honeypot_returns_spam_without_sending() {
    let transport = MemoryTransport::new();
    let (status, body) = send(
        app_with(&transport),
        post_json(&json!({ "website": "http://spam.example" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true, "spam": true }));
    assert!(transport.attempts().await.is_empty());
}

#[tokio::test]
async fn honeypot_wins_over_valid_fields() {
    let transport = MemoryTransport::new();
    let mut body = valid_body();
    body["website"] = json!("https://cheap-pills.example");
    let (status, resp) = send(app_with(&transport), post_json(&body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["spam"], true);
    assert!(transport.attempts().await.is_empty());
}

#[tokio::test]
async fn non_string_honeypot_returns_spam_without_sending() {
    for website in [json!(123), json!(true), json!(["x"])] {
        let transport = MemoryTransport::new();
        let mut body = valid_body();
        body["website"] = website.clone();
        let (status, resp) = send(app_with(&transport), post_json(&body)).await;

        assert_eq!(status, StatusCode::OK, "website {website}");
        assert_eq!(resp, json!({ "ok": true, "spam": true }));
        assert!(transport.attempts().await.is_empty());
    }
}

#[tokio::test]
async fn null_honeypot_is_not_spam() {
    let transport = MemoryTransport::new();
    let mut body = valid_body();
    body["website"] = Value::Null;
    let (status, resp) = send(app_with(&transport), post_json(&body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["sent"]["team"], true);
}

#[tokio::test]
async fn numeric_utm_value_is_accepted_as_text() {
    let transport = MemoryTransport::new();
    let mut body = valid_body();
    body["utm_term"] = json!(5);
    body["utm_content"] = json!({ "nested": true });
    let (status, resp) = send(app_with(&transport), post_json(&body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["sent"]["team"], true);
    let team = &transport.attempts().await[0].html;
    assert!(team.contains("UTM term"));
    assert!(team.contains(">5<"));
    assert!(!team.contains("UTM content"));
}

#[tokio::test]
async fn both_spellings_of_a_field_prefer_snake_case() {
    let transport = MemoryTransport::new();
    let mut body = valid_body();
    body["page_url"] = json!("https://haulwise.io/pricing");
    body["pageUrl"] = json!("https://haulwise.io/other");
    let (status, _) = send(app_with(&transport), post_json(&body)).await;

    assert_eq!(status, StatusCode::OK);
    let team = &transport.attempts().await[0].html;
    assert!(team.contains("https://haulwise.io/pricing"));
    assert!(!team.contains("https://haulwise.io/other"));
}

// ── Validation ───────────────────────────────────────────────────────

#[tokio::test]
async fn each_missing_required_field_is_bad_request() {
    for field in ["name", "company", "role", "email"] {
        let transport = MemoryTransport::new();
        let mut body = valid_body();
        body.as_object_mut().unwrap().remove(field);

        let (status, resp) = send(app_with(&transport), post_json(&body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "missing {field}");
        assert_eq!(resp["ok"], false);
        assert!(resp["error"].as_str().unwrap().contains(field));
        assert!(transport.attempts().await.is_empty());
    }
}

#[tokio::test]
async fn invalid_email_is_bad_request() {
    let transport = MemoryTransport::new();
    let mut body = valid_body();
    body["email"] = json!("not-an-email");

    let (status, resp) = send(app_with(&transport), post_json(&body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["error"], "Invalid email address");
    assert!(transport.attempts().await.is_empty());
}

// ── Delivery ─────────────────────────────────────────────────────────

#[tokio::test]
async fn valid_request_sends_team_then_lead() {
    let transport = MemoryTransport::new();
    let (status, body) = send(app_with(&transport), post_json(&valid_body())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "ok": true, "sent": { "team": true, "lead": true } })
    );

    let attempts = transport.attempts().await;
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0].to, vec!["sales@haulwise.io"]);
    assert_eq!(attempts[0].reply_to.as_deref(), Some("ana@acme.com"));
    assert_eq!(attempts[1].to, vec!["ana@acme.com"]);
    assert_eq!(attempts[1].reply_to.as_deref(), Some("hello@haulwise.io"));
}

#[tokio::test]
async fn team_failure_is_bad_gateway_and_skips_lead() {
    let transport = MemoryTransport::new();
    transport
        .fail_on(
            0,
            MailError::Rejected {
                status: 403,
                message: "The haulwise.io domain is not verified".to_owned(),
            },
        )
        .await;

    let (status, body) = send(app_with(&transport), post_json(&valid_body())).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"], "The haulwise.io domain is not verified");
    assert_eq!(transport.attempts().await.len(), 1);
}

#[tokio::test]
async fn team_transport_failure_uses_generic_message() {
    let transport = MemoryTransport::new();
    transport
        .fail_on(
            0,
            MailError::Transport {
                reason: "dns error".to_owned(),
            },
        )
        .await;

    let (status, body) = send(app_with(&transport), post_json(&valid_body())).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Failed to send demo request");
}

#[tokio::test]
async fn lead_failure_still_succeeds() {
    let transport = MemoryTransport::new();
    transport
        .fail_on(
            1,
            MailError::Rejected {
                status: 422,
                message: "invalid recipient".to_owned(),
            },
        )
        .await;

    let (status, body) = send(app_with(&transport), post_json(&valid_body())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "ok": true, "sent": { "team": true, "lead": false } })
    );
    assert_eq!(transport.attempts().await.len(), 2);
}

#[tokio::test]
async fn html_in_fields_is_escaped_in_both_emails() {
    let transport = MemoryTransport::new();
    let body = json!({
        "name": "<b>Ana</b>",
        "company": "Acme & Sons",
        "role": "Ops <lead>",
        "email": "ana@acme.com",
        "utm_campaign": "<script>x</script>",
    });
    let (status, _) = send(app_with(&transport), post_json(&body)).await;
    assert_eq!(status, StatusCode::OK);

    let attempts = transport.attempts().await;
    let team = &attempts[0].html;
    let lead = &attempts[1].html;

    assert!(team.contains("&lt;b&gt;Ana&lt;/b&gt;"));
    assert!(team.contains("Acme &amp; Sons"));
    assert!(team.contains("Ops &lt;lead&gt;"));
    assert!(team.contains("&lt;script&gt;x&lt;/script&gt;"));
    assert!(!team.contains("<script>"));

    assert!(lead.contains("&lt;b&gt;Ana&lt;/b&gt;"));
    assert!(lead.contains("Acme &amp; Sons"));
    assert!(!lead.contains("<b>Ana</b>"));
}

#[tokio::test]
async fn forwarded_ip_and_metadata_reach_team_email_only() {
    let transport = MemoryTransport::new();
    let mut body = valid_body();
    body["pageUrl"] = json!("https://haulwise.io/modules/tracking");
    body["utm_source"] = json!("linkedin");

    let mut req = post_json(&body);
    req.headers_mut().insert(
        "x-forwarded-for",
        "203.0.113.7, 10.0.0.2".parse().unwrap(),
    );
    let (status, _) = send(app_with(&transport), req).await;
    assert_eq!(status, StatusCode::OK);

    let attempts = transport.attempts().await;
    assert!(attempts[0].html.contains("203.0.113.7"));
    assert!(!attempts[0].html.contains("10.0.0.2"));
    assert!(attempts[0].html.contains("https://haulwise.io/modules/tracking"));
    assert!(attempts[0].html.contains("linkedin"));
    assert!(!attempts[0].html.contains("UTM medium"));

    assert!(!attempts[1].html.contains("203.0.113.7"));
    assert!(!attempts[1].html.contains("linkedin"));
}

#[tokio::test]
async fn peer_address_used_without_forwarded_header() {
    let transport = MemoryTransport::new();
    let mut req = post_json(&valid_body());
    req.extensions_mut()
        .insert(ConnectInfo(SocketAddr::from(([198, 51, 100, 4], 51_000))));

    let (status, _) = send(app_with(&transport), req).await;
    assert_eq!(status, StatusCode::OK);
    let attempts = transport.attempts().await;
    assert!(attempts[0].html.contains("198.51.100.4"));
    assert!(!attempts[0].html.contains("51000"));
}

// ── Response headers and load ────────────────────────────────────

#[tokio::test]
async fn demo_headers_on_success_and_bad_request() {
    let transport = MemoryTransport::new();

    let resp = app_with(&transport)
        .oneshot(post_json(&valid_body()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_demo_headers(&resp);

    let resp = app_with(&transport).oneshot(post("{")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_demo_headers(&resp);
}

#[tokio::test]
async fn concurrent_submissions_are_capped() {
    let transport = Arc::new(GatedTransport::closed());
    let app = app_over(transport.clone());

    let mut held = Vec::new();
    for _ in 0..MAX_CONCURRENT_REQUESTS {
        let app = app.clone();
        held.push(tokio::spawn(async move {
            app.oneshot(post_json(&valid_body())).await.unwrap().status()
        }));
    }

    tokio::time::timeout(Duration::from_secs(5), async {
        while transport.entered.load(Ordering::SeqCst) < MAX_CONCURRENT_REQUESTS {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("every admitted request should reach the transport");

    let extra = {
        let app = app.clone();
        tokio::spawn(async move {
            app.oneshot(post_json(&valid_body())).await.unwrap().status()
        })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!extra.is_finished());
    assert_eq!(
        transport.entered.load(Ordering::SeqCst),
        MAX_CONCURRENT_REQUESTS
    );

    transport.gate.add_permits(MAX_CONCURRENT_REQUESTS + 1);
    held.push(extra);
    for handle in held {
        let status = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("request should finish once the gate opens")
            .unwrap();
        assert_eq!(status, StatusCode::OK);
    }
}

// ── Health and fallback ──────────────────────────────────────────────

#[tokio::test]
async fn health_reports_mail_configuration() {
    let transport = MemoryTransport::new();
    let get = || {
        Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap()
    };

    let (status, body) = send(app_with(&transport), get()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["mail_configured"], true);

    let (_, body) = send(unconfigured_app(), get()).await;
    assert_eq!(body["mail_configured"], false);
}

#[tokio::test]
async fn unknown_path_is_json_not_found() {
    let req = Request::builder()
        .uri("/wp-login.php")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(unconfigured_app(), req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "ok": false, "error": "Not found" }));
}

#[tokio::test]
async fn static_site_serves_index_for_client_routes() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("index.html"), "<h1>Haulwise</h1>").unwrap();
    fs::write(dir.path().join("robots.txt"), "User-agent: *").unwrap();

    let app = build_router(Arc::new(AppState { intake: None }), Some(dir.path()));

    for (path, expected) in [
        ("/robots.txt", "User-agent: *"),
        ("/modules/tracking", "<h1>Haulwise</h1>"),
    ] {
        let req = Request::builder().uri(path).body(Body::empty()).unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "{path}");
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(String::from_utf8_lossy(&bytes), expected);
    }

    // API routes still win over the static fallback.
    let req = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
