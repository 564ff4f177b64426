use std::sync::Arc;

use axum::{extract::State, Json};
use giftchoice_core::BotReply;
use serde::Deserialize;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub text: String,
}

/// 无状态分类：对当前目录快照回答一句话
pub async fn classify_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ClassifyRequest>,
) -> Json<BotReply> {
    let catalog = state.catalog.snapshot();
    Json(state.responder().respond(&req.text, &catalog))
}
