//! Axum route handlers for the local web app.
//!
//! # Routes
//!
//! - `GET  /`             — HTML page with the check-in form and recent history
//! - `POST /checkin`      — form submission, returns the page with the result
//! - `POST /api/checkin`  — `{"text": ...}` in, `DisplayPayload` out
//! - `GET  /api/history`  — `HistoryView`, optional `?limit=n`
//! - `GET  /api/export`   — plain-text session transcript
//! - `GET  /health`       — liveness probe

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::application::ports::{CompletionClient, CompletionError};
use crate::application::render::{render_history, render_transcript, HistoryView, SafetyNotice};
use crate::application::{CheckInError, CheckInUseCase};
use crate::domain::error::InputError;

use super::page::{render_page, PageView};

/// Entries shown when no limit is requested
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Check-in use case as shared by the handlers
pub type SharedCheckIn = Arc<CheckInUseCase<Arc<dyn CompletionClient>>>;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    pub checkin: SharedCheckIn,
}

impl AppState {
    pub fn new(checkin: SharedCheckIn) -> Self {
        Self { checkin }
    }

    fn history(&self, limit: usize) -> HistoryView {
        let mut view = render_history(&self.checkin.journal().all());
        view.entries.truncate(limit);
        view
    }
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/checkin", post(form_checkin_handler))
        .route("/api/checkin", post(api_checkin_handler))
        .route("/api/history", get(history_handler))
        .route("/api/export", get(export_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct CheckInRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

/// Error body returned by the JSON API
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: &'static str,
    /// Present when the rejected input itself contained risk language
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety: Option<SafetyNotice>,
}

/// HTTP status for a failed check-in
pub fn status_for(error: &CheckInError) -> StatusCode {
    match error {
        CheckInError::Input(InputError::Empty) => StatusCode::BAD_REQUEST,
        CheckInError::Input(InputError::TooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
        CheckInError::Completion(CompletionError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
        CheckInError::Completion(_) => StatusCode::BAD_GATEWAY,
    }
}

/// GET / — the page.
async fn index_handler(State(state): State<AppState>) -> Html<String> {
    let history = state.history(DEFAULT_HISTORY_LIMIT);
    Html(render_page(&PageView {
        history: Some(&history),
        ..Default::default()
    }))
}

/// POST /checkin — form submission.
async fn form_checkin_handler(
    State(state): State<AppState>,
    Form(request): Form<CheckInRequest>,
) -> Response {
    match state.checkin.execute(&request.text).await {
        Ok(output) => {
            let history = state.history(DEFAULT_HISTORY_LIMIT);
            Html(render_page(&PageView {
                result: Some(&output.payload),
                history: Some(&history),
                ..Default::default()
            }))
            .into_response()
        }
        Err(e) => {
            let history = state.history(DEFAULT_HISTORY_LIMIT);
            let safety = state.checkin.safety_for_input(&request.text);
            let message = e.user_message();
            let page = render_page(&PageView {
                input: &request.text,
                error: Some(&message),
                safety: safety.as_ref(),
                history: Some(&history),
                ..Default::default()
            });
            (status_for(&e), Html(page)).into_response()
        }
    }
}

/// POST /api/checkin — JSON check-in.
async fn api_checkin_handler(
    State(state): State<AppState>,
    Json(request): Json<CheckInRequest>,
) -> Response {
    match state.checkin.execute(&request.text).await {
        Ok(output) => Json(output.payload).into_response(),
        Err(e) => {
            let body = ErrorBody {
                error: e.user_message(),
                kind: e.kind(),
                safety: state.checkin.safety_for_input(&request.text),
            };
            (status_for(&e), Json(body)).into_response()
        }
    }
}

/// GET /api/history — newest entries first plus mood counts.
async fn history_handler(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Json<HistoryView> {
    Json(state.history(query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT)))
}

/// GET /api/export — session transcript download.
async fn export_handler(State(state): State<AppState>) -> impl IntoResponse {
    let transcript = render_transcript(&state.checkin.journal().all(), state.checkin.policy());
    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"emoticare-session.txt\"",
            ),
        ],
        transcript,
    )
}

/// GET /health — liveness probe.
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "turns": state.checkin.journal().len(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::SessionJournal;
    use crate::domain::duration::Duration;
    use crate::domain::mood::SafetyPolicy;
    use crate::domain::prompt::{CoachPrompt, PromptLimits};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    struct StubClient {
        reply: Result<String, CompletionError>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CompletionClient for StubClient {
        async fn complete(&self, _prompt: &CoachPrompt) -> Result<String, CompletionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    fn state_with(reply: Result<String, CompletionError>) -> (AppState, Arc<StubClient>) {
        let client = Arc::new(StubClient {
            reply,
            calls: AtomicUsize::new(0),
        });
        let dyn_client: Arc<dyn CompletionClient> = client.clone();
        let checkin = CheckInUseCase::new(
            dyn_client,
            Arc::new(SessionJournal::in_memory()),
            SafetyPolicy::default(),
            PromptLimits {
                max_input_chars: 50,
                history_window: 3,
            },
        );
        (AppState::new(Arc::new(checkin)), client)
    }

    fn happy_state() -> (AppState, Arc<StubClient>) {
        state_with(Ok("MOOD: Happy\nCONFIDENCE: 90\nKeep celebrating small wins.".to_string()))
    }

    fn json_post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
            .await
            .unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (state, _) = happy_state();
        let response = app_router(state)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["turns"], 0);
    }

    #[tokio::test]
    async fn test_api_checkin_returns_payload() {
        let (state, _) = happy_state();
        let response = app_router(state.clone())
            .oneshot(json_post("/api/checkin", serde_json::json!({"text": "I feel great today!"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["mood"], "Happy");
        assert_eq!(json["confidence"], 90);
        assert_eq!(json["coaching_text"], "Keep celebrating small wins.");
        assert_eq!(json["risk"], false);
        assert!(json["safety"].is_null());
        assert_eq!(state.checkin.journal().len(), 1);
    }

    #[tokio::test]
    async fn test_api_checkin_rejects_empty_text() {
        let (state, client) = happy_state();
        let response = app_router(state.clone())
            .oneshot(json_post("/api/checkin", serde_json::json!({"text": "   "})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["kind"], "validation");
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
        assert!(state.checkin.journal().is_empty());
    }

    #[tokio::test]
    async fn test_api_checkin_rejects_oversized_text() {
        let (state, client) = happy_state();
        let response = app_router(state)
            .oneshot(json_post("/api/checkin", serde_json::json!({"text": "x".repeat(51)})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body_json(response).await["kind"], "input_too_large");
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_upstream_failure_maps_to_bad_gateway_with_safety() {
        let (state, _) = state_with(Err(CompletionError::upstream("HTTP 500")));
        let response = app_router(state.clone())
            .oneshot(json_post(
                "/api/checkin",
                serde_json::json!({"text": "I don't want to be here anymore"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let json = body_json(response).await;
        assert_eq!(json["kind"], "upstream");
        assert!(json["safety"]["resources"].as_array().unwrap().len() >= 3);
        assert!(state.checkin.journal().is_empty());
    }

    #[tokio::test]
    async fn test_timeout_maps_to_gateway_timeout() {
        let (state, _) = state_with(Err(CompletionError::Timeout {
            after: Duration::from_secs(30),
        }));
        let response = app_router(state)
            .oneshot(json_post("/api/checkin", serde_json::json!({"text": "hello"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        let json = body_json(response).await;
        assert_eq!(json["kind"], "timeout");
        assert!(json.get("safety").is_none());
    }

    #[tokio::test]
    async fn test_history_is_newest_first_and_limited() {
        let (state, _) = happy_state();
        for text in ["first", "second", "third"] {
            state.checkin.execute(text).await.unwrap();
        }

        let response = app_router(state)
            .oneshot(
                Request::builder()
                    .uri("/api/history?limit=2")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let entries = json["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["excerpt"], "third");
        assert_eq!(entries[1]["excerpt"], "second");
        assert_eq!(json["mood_counts"][0]["count"], 3);
    }

    #[tokio::test]
    async fn test_export_is_plain_text() {
        let (state, _) = happy_state();
        state.checkin.execute("I feel great today!").await.unwrap();

        let response = app_router(state)
            .oneshot(Request::builder().uri("/api/export").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));

        let text = body_text(response).await;
        assert!(text.contains("You: I feel great today!"));
    }

    #[tokio::test]
    async fn test_index_page_renders_form() {
        let (state, _) = happy_state();
        let response = app_router(state)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("action=\"/checkin\""));
    }

    #[tokio::test]
    async fn test_form_checkin_shows_safety_card_for_risk() {
        let (state, _) = happy_state();
        let request = Request::builder()
            .method("POST")
            .uri("/checkin")
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(Body::from("text=I+want+to+hurt+myself"))
            .unwrap();

        let response = app_router(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("risk-alert"));
        assert!(html.contains("988"));
        assert!(!html.contains("Keep celebrating small wins."));
    }

    #[tokio::test]
    async fn test_form_checkin_empty_keeps_page() {
        let (state, _) = happy_state();
        let request = Request::builder()
            .method("POST")
            .uri("/checkin")
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(Body::from("text="))
            .unwrap();

        let response = app_router(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("class=\"error\""));
    }
}
