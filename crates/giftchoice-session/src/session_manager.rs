//! # Session Manager
//!
//! 管理内存中的聊天会话。会话不做持久化，进程退出即丢弃。

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use giftchoice_core::{MessageId, Product, StoreContact, Suggestion};
use giftchoice_responder::{dispatch_suggestion, Navigation, Responder};
use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, info};

use crate::error::{SessionError, SessionResult};
use crate::types::{ChatSession, Exchange, SessionSummary};

/// SessionManager 配置
#[derive(Debug, Clone)]
pub struct SessionManagerConfig {
    /// 最大会话数
    pub max_sessions: usize,
    /// 空闲会话超时
    pub idle_timeout_secs: u64,
    /// 清理间隔
    pub cleanup_interval_secs: u64,
}

impl Default for SessionManagerConfig {
    fn default() -> Self {
        Self {
            max_sessions: 1000,
            idle_timeout_secs: 1800,   // 30分钟
            cleanup_interval_secs: 300, // 5分钟
        }
    }
}

impl SessionManagerConfig {
    pub fn with_max_sessions(mut self, max: usize) -> Self {
        self.max_sessions = max;
        self
    }

    pub fn with_idle_timeout(mut self, secs: u64) -> Self {
        self.idle_timeout_secs = secs;
        self
    }
}

/// SessionManager
///
/// 持有所有活跃会话以及共享的 Responder。
pub struct SessionManager {
    config: SessionManagerConfig,
    responder: Arc<Responder>,
    sessions: DashMap<String, RwLock<ChatSession>>,
    /// 串行化创建，保证数量检查与插入原子
    create_lock: Mutex<()>,
}

impl SessionManager {
    pub fn new(config: SessionManagerConfig, responder: Arc<Responder>) -> Self {
        Self {
            config,
            responder,
            sessions: DashMap::new(),
            create_lock: Mutex::new(()),
        }
    }

    pub fn responder(&self) -> &Responder {
        &self.responder
    }

    pub fn contact(&self) -> &StoreContact {
        self.responder.contact()
    }

    /// 创建新会话
    pub fn create_session(&self) -> SessionResult<ChatSession> {
        let _guard = self.create_lock.lock();
        if self.sessions.len() >= self.config.max_sessions {
            return Err(SessionError::LimitReached {
                limit: self.config.max_sessions,
            });
        }

        let session = ChatSession::new();
        self.sessions
            .insert(session.id.clone(), RwLock::new(session.clone()));

        info!("Created session: {}", session.id);
        Ok(session)
    }

    /// 获取会话快照
    pub fn get_session(&self, session_id: &str) -> SessionResult<ChatSession> {
        self.sessions
            .get(session_id)
            .map(|entry| entry.read().clone())
            .ok_or_else(|| SessionError::not_found(session_id))
    }

    /// 列出会话，按创建时间排序
    pub fn list_sessions(&self) -> Vec<SessionSummary> {
        let mut summaries: Vec<SessionSummary> = self
            .sessions
            .iter()
            .map(|entry| entry.value().read().summary())
            .collect();
        summaries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        summaries
    }

    /// 删除会话
    pub fn remove_session(&self, session_id: &str) -> SessionResult<()> {
        self.sessions
            .remove(session_id)
            .map(|_| info!("Removed session: {}", session_id))
            .ok_or_else(|| SessionError::not_found(session_id))
    }

    /// 向会话提交用户输入；空白输入返回 `Ok(None)`
    pub fn submit(
        &self,
        session_id: &str,
        utterance: &str,
        catalog: &[Product],
    ) -> SessionResult<Option<Exchange>> {
        let entry = self
            .sessions
            .get(session_id)
            .ok_or_else(|| SessionError::not_found(session_id))?;
        let exchange = entry.write().submit(&self.responder, utterance, catalog);
        Ok(exchange)
    }

    /// 执行消息上的动作
    pub fn activate_action(
        &self,
        session_id: &str,
        message_id: MessageId,
    ) -> SessionResult<Navigation> {
        let entry = self
            .sessions
            .get(session_id)
            .ok_or_else(|| SessionError::not_found(session_id))?;
        let navigation = entry.write().activate_action(message_id, self.contact())?;
        debug!("Activated message {} in session {}", message_id, session_id);
        Ok(navigation)
    }

    /// 执行建议按钮；标签区分大小写
    pub fn activate_suggestion(&self, session_id: &str, label: &str) -> SessionResult<Navigation> {
        if !self.sessions.contains_key(session_id) {
            return Err(SessionError::not_found(session_id));
        }
        let suggestion: Suggestion = label
            .parse()
            .map_err(|_| SessionError::UnknownSuggestion(label.to_string()))?;
        Ok(dispatch_suggestion(suggestion, self.contact()))
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// 移除空闲超时的会话，返回移除数量
    pub fn cleanup_idle_sessions(&self) -> usize {
        let timeout = self.config.idle_timeout_secs as i64;
        let now = Utc::now();
        let before = self.sessions.len();

        self.sessions.retain(|_, session| {
            now.signed_duration_since(session.read().last_activity)
                .num_seconds()
                <= timeout
        });

        let removed = before.saturating_sub(self.sessions.len());
        if removed > 0 {
            info!("Evicted {} idle sessions", removed);
        }
        removed
    }

    /// 启动后台清理任务
    pub fn spawn_cleanup(self: &Arc<Self>) -> JoinHandle<()> {
        let manager = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs(manager.config.cleanup_interval_secs.max(1)));
            loop {
                ticker.tick().await;
                manager.cleanup_idle_sessions();
            }
        })
    }
}
