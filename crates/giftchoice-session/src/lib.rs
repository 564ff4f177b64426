//! # GiftChoice Session
//!
//! 聊天会话管理。
//!
//! ## 功能特性
//!
//! - **消息记录**：只追加，消息 ID 在会话内严格递增
//! - **欢迎语**：新会话自带一条欢迎消息
//! - **动作执行**：执行机器人消息上的动作，必要时追加商品链接
//! - **内存管理**：DashMap 保存会话，空闲超时自动清理
//!
//! 会话只保存在内存中，不做持久化。

pub mod error;
pub mod session_manager;
pub mod types;

// 重新导出主要类型
pub use error::{SessionError, SessionResult};
pub use session_manager::{SessionManager, SessionManagerConfig};
pub use types::{greeting_reply, ChatSession, Exchange, SessionSummary};
