//! Chat session HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/v1/sessions                    - Create a session (greeting seeded)
//! - GET    /api/v1/sessions/{id}               - Get the session transcript
//! - DELETE /api/v1/sessions/{id}               - Drop a session
//! - PUT    /api/v1/sessions/{id}/system-prompt - Apply a new system prompt
//! - POST   /api/v1/sessions/{id}/messages      - Send a user message

use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use mentorchat_core::chat::session::{PromptChange, SessionState, TurnOutcome};
use mentorchat_types::chat::ChatRecord;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Request body for session creation.
#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    /// Overrides the configured default system prompt.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

/// Request body for a system prompt change.
#[derive(Debug, Deserialize)]
pub struct SystemPromptRequest {
    pub system_prompt: String,
}

/// Request body for a chat message.
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub message: String,
}

/// Rendered view of a session.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub system_prompt: String,
    pub turn_count: u32,
    pub messages: Vec<ChatRecord>,
}

impl SessionView {
    fn new(id: Uuid, state: &SessionState) -> Self {
        Self {
            id,
            system_prompt: state.system_prompt().to_string(),
            turn_count: state.turn_count(),
            messages: state.log().records().to_vec(),
        }
    }
}

/// Result of `PUT /system-prompt`.
#[derive(Debug, Serialize)]
pub struct PromptChangeView {
    pub changed: bool,
    /// Clients should discard their rendered transcript and redraw it.
    pub rerender: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub session: SessionView,
}

/// Result of `POST /messages`.
#[derive(Debug, Serialize)]
pub struct TurnView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    pub reminded: bool,
    /// Transient notice when the model call failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub session: SessionView,
}

/// Parse a UUID from a path parameter, returning a 400 error on invalid format.
fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid UUID: {s}")))
}

fn lookup(state: &AppState, id: Uuid) -> Result<Arc<Mutex<SessionState>>, AppError> {
    state
        .sessions
        .get(&id)
        .map(|entry| Arc::clone(entry.value()))
        .ok_or_else(|| AppError::SessionNotFound(id.to_string()))
}

fn self_link(id: Uuid) -> String {
    format!("/api/v1/sessions/{id}")
}

/// POST /api/v1/sessions - Create a session.
///
/// The body is optional; without one the configured prompt is used.
pub async fn create_session(
    State(state): State<AppState>,
    body: Option<Json<CreateSessionRequest>>,
) -> Result<Json<ApiResponse<SessionView>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let body = body.map(|Json(body)| body).unwrap_or_default();
    let mut session = state.controller.new_session();
    if let Some(prompt) = body.system_prompt.as_deref() {
        state.controller.apply_system_prompt(&mut session, prompt)?;
    }
    state.controller.ensure_ready(&mut session).await?;

    let id = Uuid::now_v7();
    let view = SessionView::new(id, &session);
    state.sessions.insert(id, Arc::new(Mutex::new(session)));
    tracing::info!(session_id = %id, "Session created");

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(
        ApiResponse::success(view, request_id, elapsed).with_link("self", &self_link(id)),
    ))
}

/// GET /api/v1/sessions/{id} - Get a session's transcript.
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<SessionView>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_uuid(&session_id)?;
    let session = lookup(&state, id)?;
    let view = SessionView::new(id, &*session.lock().await);

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(
        ApiResponse::success(view, request_id, elapsed)
            .with_link("self", &self_link(id))
            .with_link("messages", &format!("{}/messages", self_link(id))),
    ))
}

/// DELETE /api/v1/sessions/{id} - Drop a session.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_uuid(&session_id)?;
    state
        .sessions
        .remove(&id)
        .ok_or_else(|| AppError::SessionNotFound(id.to_string()))?;
    tracing::info!(session_id = %id, "Session deleted");

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "deleted": id }),
        request_id,
        elapsed,
    )))
}

/// PUT /api/v1/sessions/{id}/system-prompt - Apply a new system prompt.
///
/// A replaced prompt resets the transcript and immediately seeds a fresh
/// greeting, so the returned view is ready to render.
pub async fn set_system_prompt(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(body): Json<SystemPromptRequest>,
) -> Result<Json<ApiResponse<PromptChangeView>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_uuid(&session_id)?;
    let session = lookup(&state, id)?;
    let mut session = session.lock().await;

    let change = state
        .controller
        .apply_system_prompt(&mut session, &body.system_prompt)?;
    state.controller.ensure_ready(&mut session).await?;

    let view = PromptChangeView {
        changed: change == PromptChange::Replaced,
        rerender: change.needs_rerender(),
        notice: match change {
            PromptChange::Replaced => None,
            PromptChange::Unchanged => {
                Some("System prompt unchanged; conversation kept.".to_string())
            }
        },
        session: SessionView::new(id, &session),
    };

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(
        ApiResponse::success(view, request_id, elapsed).with_link("session", &self_link(id)),
    ))
}

/// POST /api/v1/sessions/{id}/messages - Send a user message.
///
/// A failed model call still returns 200: the transcript holds an error
/// record and `notice` carries the transient message.
pub async fn send_message(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(body): Json<MessageRequest>,
) -> Result<Json<ApiResponse<TurnView>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_uuid(&session_id)?;
    let session = lookup(&state, id)?;
    let mut session = session.lock().await;

    let outcome = state
        .controller
        .submit_user_message(&mut session, &body.message)
        .await?;

    let view = match outcome {
        TurnOutcome::Replied { reply, reminded } => TurnView {
            reply: Some(reply),
            reminded,
            notice: None,
            session: SessionView::new(id, &session),
        },
        TurnOutcome::Failed { notice, reminded } => TurnView {
            reply: None,
            reminded,
            notice: Some(notice),
            session: SessionView::new(id, &session),
        },
    };

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(
        ApiResponse::success(view, request_id, elapsed).with_link("session", &self_link(id)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::{BROKEN_PROMPT, test_state};
    use axum::http::StatusCode;
    use mentorchat_types::chat::MessageRole;

    async fn create(state: &AppState, prompt: Option<&str>) -> SessionView {
        let Json(resp) = create_session(
            State(state.clone()),
            Some(Json(CreateSessionRequest {
                system_prompt: prompt.map(str::to_string),
            })),
        )
        .await
        .unwrap();
        resp.data.unwrap()
    }

    async fn send(state: &AppState, id: Uuid, message: &str) -> Result<TurnView, AppError> {
        send_message(
            State(state.clone()),
            Path(id.to_string()),
            Json(MessageRequest {
                message: message.to_string(),
            }),
        )
        .await
        .map(|Json(resp)| resp.data.unwrap())
    }

    #[tokio::test]
    async fn test_create_session_seeds_greeting() {
        let state = test_state();
        let view = create(&state, None).await;

        assert_eq!(view.system_prompt, "You are a mentor.");
        assert_eq!(view.turn_count, 0);
        assert_eq!(view.messages.len(), 1);
        assert_eq!(view.messages[0].role, MessageRole::Assistant);
        assert_eq!(view.messages[0].content, "Welcome!");
        assert!(state.sessions.contains_key(&view.id));
    }

    #[tokio::test]
    async fn test_create_session_without_body() {
        use axum::body::Body;
        use axum::extract::FromRequest;
        use axum::http::Request;

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/sessions")
            .body(Body::empty())
            .unwrap();
        let body = Option::<Json<CreateSessionRequest>>::from_request(request, &())
            .await
            .unwrap();
        assert!(body.is_none());

        let state = test_state();
        let Json(resp) = create_session(State(state.clone()), body).await.unwrap();
        let view = resp.data.unwrap();
        assert_eq!(view.system_prompt, "You are a mentor.");
        assert_eq!(view.messages.len(), 1);
    }

    #[tokio::test]
    async fn test_create_session_with_custom_prompt() {
        let state = test_state();
        let view = create(&state, Some("You are a hand therapy supervisor.")).await;
        assert_eq!(view.system_prompt, "You are a hand therapy supervisor.");
        assert_eq!(view.messages.len(), 1);
    }

    #[tokio::test]
    async fn test_create_session_construction_failure_is_bad_gateway() {
        let state = test_state();
        let err = create_session(
            State(state.clone()),
            Some(Json(CreateSessionRequest {
                system_prompt: Some(BROKEN_PROMPT.to_string()),
            })),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert!(state.sessions.is_empty());
    }

    #[tokio::test]
    async fn test_send_message_appends_exchange() {
        let state = test_state();
        let view = create(&state, None).await;

        let turn = send(&state, view.id, "How do I write SMART goals?")
            .await
            .unwrap();
        assert_eq!(turn.reply.as_deref(), Some("echo: How do I write SMART goals?"));
        assert!(!turn.reminded);
        assert!(turn.notice.is_none());
        assert_eq!(turn.session.messages.len(), 3);
        assert_eq!(turn.session.turn_count, 1);

        // Reminder every second turn in the test config.
        let turn = send(&state, view.id, "Thanks").await.unwrap();
        assert!(turn.reminded);
        let reply = turn.reply.unwrap();
        assert!(reply.contains("Stay calm"));
        assert!(reply.contains("Thanks"));
        assert_eq!(turn.session.messages[3].content, "Thanks");
    }

    #[tokio::test]
    async fn test_send_message_failure_is_recovered() {
        let state = test_state();
        let view = create(&state, None).await;

        let turn = send(&state, view.id, "please FAIL").await.unwrap();
        assert!(turn.reply.is_none());
        assert!(turn.notice.unwrap().contains("model busy"));
        assert_eq!(turn.session.messages.len(), 3);
        assert!(turn.session.messages[2].content.contains("Error"));

        let turn = send(&state, view.id, "again").await.unwrap();
        assert!(turn.reply.is_some());
        assert_eq!(turn.session.messages.len(), 5);
    }

    #[tokio::test]
    async fn test_send_empty_message_is_rejected() {
        let state = test_state();
        let view = create(&state, None).await;

        let err = send(&state, view.id, "   ").await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let state = test_state();
        let err = send(&state, Uuid::now_v7(), "hi").await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = get_session(State(state.clone()), Path("not-a-uuid".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_system_prompt_change_resets_transcript() {
        let state = test_state();
        let view = create(&state, None).await;
        send(&state, view.id, "hello").await.unwrap();

        let Json(resp) = set_system_prompt(
            State(state.clone()),
            Path(view.id.to_string()),
            Json(SystemPromptRequest {
                system_prompt: "You are a strict supervisor.".to_string(),
            }),
        )
        .await
        .unwrap();
        let change = resp.data.unwrap();
        assert!(change.changed);
        assert!(change.rerender);
        assert!(change.notice.is_none());
        assert_eq!(change.session.turn_count, 0);
        // Only the fresh greeting remains.
        assert_eq!(change.session.messages.len(), 1);
        assert_eq!(change.session.system_prompt, "You are a strict supervisor.");
    }

    #[tokio::test]
    async fn test_same_system_prompt_is_noop() {
        let state = test_state();
        let view = create(&state, None).await;
        send(&state, view.id, "hello").await.unwrap();

        let Json(resp) = set_system_prompt(
            State(state.clone()),
            Path(view.id.to_string()),
            Json(SystemPromptRequest {
                system_prompt: "You are a mentor.".to_string(),
            }),
        )
        .await
        .unwrap();
        let change = resp.data.unwrap();
        assert!(!change.changed);
        assert!(!change.rerender);
        assert!(change.notice.is_some());
        assert_eq!(change.session.messages.len(), 3);
        assert_eq!(change.session.turn_count, 1);
    }

    #[tokio::test]
    async fn test_delete_session() {
        let state = test_state();
        let view = create(&state, None).await;

        delete_session(State(state.clone()), Path(view.id.to_string()))
            .await
            .unwrap();
        assert!(state.sessions.is_empty());

        let err = delete_session(State(state.clone()), Path(view.id.to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
