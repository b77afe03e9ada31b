#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use docket_api::config::ServerConfig;
use docket_api::router::build_app_router;
use docket_api::state::AppState;
use docket_api::sync::CalendarSync;
use docket_calendar::{CalendarError, CalendarEvent, CalendarProvider};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults, writing uploads to `upload_dir`.
pub fn test_config(upload_dir: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        upload_dir,
        upload_max_bytes: 1024,
        time_zone: "UTC".to_string(),
        calendar: None,
    }
}

/// Build the full application router with calendar sync disabled.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(
        pool,
        test_config(std::env::temp_dir().join("docket-test-uploads")),
        CalendarSync::disabled(),
    )
}

/// Build the full application router with an explicit config and calendar sync.
pub fn build_test_app_with(pool: PgPool, config: ServerConfig, calendar: CalendarSync) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        calendar: Arc::new(calendar),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(
        app,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

async fn with_json(app: Router, method: Method, uri: &str, body: serde_json::Value) -> Response {
    send(
        app,
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    with_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    with_json(app, Method::PUT, uri, body).await
}

pub async fn put_empty(app: Router, uri: &str) -> Response {
    send(
        app,
        Request::builder()
            .method(Method::PUT)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(
        app,
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

/// Assert a status, printing the body on mismatch.
pub async fn expect_status(response: Response, status: StatusCode) -> serde_json::Value {
    let actual = response.status();
    let json = body_json(response).await;
    assert_eq!(actual, status, "unexpected status, body: {json}");
    json
}

// ---------------------------------------------------------------------------
// Recording calendar provider
// ---------------------------------------------------------------------------

/// One call made against [`RecordingCalendar`].
#[derive(Debug, Clone, PartialEq)]
pub enum CalendarCall {
    Create { summary: String },
    Update { id: String, summary: String },
    Delete { id: String },
}

/// In-memory provider that records every call and optionally fails them.
#[derive(Default)]
pub struct RecordingCalendar {
    pub calls: Mutex<Vec<CalendarCall>>,
    pub fail: bool,
}

impl RecordingCalendar {
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<CalendarCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: CalendarCall) -> Result<(), CalendarError> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            Err(CalendarError::HttpStatus {
                status: 503,
                body: "unavailable".into(),
            })
        } else {
            Ok(())
        }
    }
}

pub const MOCK_EVENT_ID: &str = "mock-event-1";

#[async_trait]
impl CalendarProvider for RecordingCalendar {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn create_event(&self, event: &CalendarEvent) -> Result<String, CalendarError> {
        self.record(CalendarCall::Create {
            summary: event.summary.clone(),
        })?;
        Ok(MOCK_EVENT_ID.to_string())
    }

    async fn update_event(&self, id: &str, event: &CalendarEvent) -> Result<(), CalendarError> {
        self.record(CalendarCall::Update {
            id: id.to_string(),
            summary: event.summary.clone(),
        })
    }

    async fn delete_event(&self, id: &str) -> Result<(), CalendarError> {
        self.record(CalendarCall::Delete { id: id.to_string() })
    }
}

/// Calendar sync backed by `provider`.
pub fn recording_sync(provider: Arc<RecordingCalendar>) -> CalendarSync {
    CalendarSync::new(provider, "UTC")
}
