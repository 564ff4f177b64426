use std::sync::Arc;
use std::time::Duration;

use giftchoice_catalog::{CatalogError, CatalogStore, HttpProductSource, ProductSource};
use giftchoice_config::Config;
use giftchoice_core::StoreContact;
use giftchoice_responder::Responder;
use giftchoice_session::{SessionManager, SessionManagerConfig};

/// 应用状态，所有 handler 共享
pub struct AppState {
    /// 聊天会话，内含共享的 Responder
    pub sessions: Arc<SessionManager>,
    /// 商品目录快照
    pub catalog: CatalogStore,
    /// 商品来源，启动拉取和手动刷新都用它
    pub source: Arc<dyn ProductSource>,
}

impl AppState {
    pub fn new(
        sessions: Arc<SessionManager>,
        catalog: CatalogStore,
        source: Arc<dyn ProductSource>,
    ) -> Self {
        Self {
            sessions,
            catalog,
            source,
        }
    }

    /// 根据配置创建状态；目录为空，需要调用方触发首次拉取
    pub fn from_config(config: &Config) -> Result<Self, CatalogError> {
        let contact = StoreContact::from(&config.contact);
        let responder = Arc::new(Responder::new(contact));

        let session_config = SessionManagerConfig::default()
            .with_max_sessions(config.session.max_sessions)
            .with_idle_timeout(config.session.idle_timeout_secs);
        let sessions = Arc::new(SessionManager::new(session_config, responder));

        let source = HttpProductSource::new(
            config.catalog.api_base_url.clone(),
            Duration::from_secs(config.catalog.timeout_seconds),
        )?;

        Ok(Self::new(sessions, CatalogStore::new(), Arc::new(source)))
    }

    pub fn responder(&self) -> &Responder {
        self.sessions.responder()
    }
}
