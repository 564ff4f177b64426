//! # Session Error Types
//!
//! 定义会话管理相关的错误类型。

use giftchoice_core::MessageId;
use thiserror::Error;

/// 会话错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// 会话不存在
    #[error("Session not found: {id}")]
    SessionNotFound { id: String },

    /// 消息不存在
    #[error("Message {message_id} not found in session {session_id}")]
    MessageNotFound {
        session_id: String,
        message_id: MessageId,
    },

    /// 消息没有可执行的动作
    #[error("Message {message_id} has no action to activate")]
    NoAction { message_id: MessageId },

    /// 未知的建议标签
    #[error("Unknown suggestion: {0}")]
    UnknownSuggestion(String),

    /// 会话数量已达上限
    #[error("Session limit reached: {limit}")]
    LimitReached { limit: usize },
}

impl SessionError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::SessionNotFound { id: id.into() }
    }
}

/// 会话结果类型
pub type SessionResult<T> = Result<T, SessionError>;
