use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use giftchoice_core::{BotMessage, MessageId};
use giftchoice_observability::create_session_span;
use giftchoice_responder::Navigation;
use giftchoice_session::{ChatSession, SessionSummary};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::state::AppState;

/// 发送消息请求
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

/// 发送消息响应；空白输入时 `messages` 为空
#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub session_id: String,
    pub messages: Vec<BotMessage>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionRequest {
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionSummary>,
}

/// 创建会话处理器
pub async fn create_session_handler(
    State(state): State<Arc<AppState>>,
) -> ApiResult<(StatusCode, Json<ChatSession>)> {
    let session = state.sessions.create_session()?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn list_sessions_handler(State(state): State<Arc<AppState>>) -> Json<SessionListResponse> {
    Json(SessionListResponse {
        sessions: state.sessions.list_sessions(),
    })
}

/// 获取会话处理器
pub async fn get_session_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<ChatSession>> {
    tracing::debug!("Fetching session: {}", session_id);
    Ok(Json(state.sessions.get_session(&session_id)?))
}

pub async fn delete_session_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.sessions.remove_session(&session_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// 发送消息处理器
pub async fn send_message_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> ApiResult<Json<SendMessageResponse>> {
    let catalog = state.catalog.snapshot();
    let exchange = create_session_span(&session_id, None)
        .in_scope(|| state.sessions.submit(&session_id, &req.text, &catalog))?;

    let messages = exchange
        .map(|exchange| vec![exchange.user, exchange.reply])
        .unwrap_or_default();

    Ok(Json(SendMessageResponse {
        session_id,
        messages,
    }))
}

/// 执行机器人消息上的动作
pub async fn activate_action_handler(
    State(state): State<Arc<AppState>>,
    Path((session_id, message_id)): Path<(String, MessageId)>,
) -> ApiResult<Json<Navigation>> {
    let navigation = create_session_span(&session_id, Some(message_id))
        .in_scope(|| state.sessions.activate_action(&session_id, message_id))?;
    Ok(Json(navigation))
}

/// 执行建议按钮
pub async fn activate_suggestion_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(req): Json<SuggestionRequest>,
) -> ApiResult<Json<Navigation>> {
    Ok(Json(
        state
            .sessions
            .activate_suggestion(&session_id, &req.label)?,
    ))
}
