//! # Chat Session Types
//!
//! 聊天会话：只追加的消息记录，消息 ID 在会话内严格递增。

use chrono::{DateTime, Utc};
use giftchoice_core::{Action, BotMessage, BotReply, MessageId, Product, StoreContact};
use giftchoice_responder::{dispatch_action, templates, Navigation, Responder};
use serde::{Deserialize, Serialize};

use crate::error::{SessionError, SessionResult};

/// 新会话的欢迎消息
pub fn greeting_reply() -> BotReply {
    BotReply::new(templates::GREETING_TEXT).with_action(Action::Occasions)
}

/// 一次用户提问产生的两条消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub user: BotMessage,
    pub reply: BotMessage,
}

/// 聊天会话
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: String,
    pub messages: Vec<BotMessage>,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    next_id: MessageId,
}

impl ChatSession {
    /// 创建会话，随机 ID
    pub fn new() -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string())
    }

    /// 使用指定 ID 创建会话，第一条消息为欢迎语
    pub fn with_id(id: impl Into<String>) -> Self {
        let now = Utc::now();
        let mut session = Self {
            id: id.into(),
            messages: Vec::new(),
            created_at: now,
            last_activity: now,
            next_id: 1,
        };
        session.push_bot(greeting_reply());
        session
    }

    fn allocate_id(&mut self) -> MessageId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    fn push_bot(&mut self, reply: BotReply) -> BotMessage {
        let id = self.allocate_id();
        let message = BotMessage::bot(id, reply);
        self.messages.push(message.clone());
        message
    }

    /// 提交一条用户输入；空白输入被忽略
    pub fn submit(
        &mut self,
        responder: &Responder,
        utterance: &str,
        catalog: &[Product],
    ) -> Option<Exchange> {
        let text = utterance.trim();
        if text.is_empty() {
            return None;
        }

        let user_id = self.allocate_id();
        let user = BotMessage::user(user_id, text);
        self.messages.push(user.clone());

        let reply = self.push_bot(responder.respond(text, catalog));
        self.touch();
        Some(Exchange { user, reply })
    }

    pub fn message(&self, message_id: MessageId) -> Option<&BotMessage> {
        self.messages.iter().find(|m| m.id == message_id)
    }

    /// 执行某条机器人消息上的动作。
    ///
    /// 多个商品时会向记录追加一条商品链接消息。
    pub fn activate_action(
        &mut self,
        message_id: MessageId,
        contact: &StoreContact,
    ) -> SessionResult<Navigation> {
        let message = self
            .message(message_id)
            .ok_or_else(|| SessionError::MessageNotFound {
                session_id: self.id.clone(),
                message_id,
            })?;

        let navigation = message
            .action
            .filter(|_| message.is_bot())
            .and_then(|action| dispatch_action(action, &message.data, contact))
            .ok_or(SessionError::NoAction { message_id })?;

        if let Navigation::Reply { reply } = &navigation {
            self.push_bot(reply.clone());
        }
        self.touch();
        Ok(navigation)
    }

    pub fn last_message(&self) -> Option<&BotMessage> {
        self.messages.last()
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id.clone(),
            created_at: self.created_at,
            last_activity: self.last_activity,
            message_count: self.messages.len(),
        }
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

/// 会话列表条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub message_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use giftchoice_core::Sender;

    fn catalog() -> Vec<Product> {
        vec![
            Product::new("1", "Men's Watch", "Classic watch for men"),
            Product::new("2", "Men's Wallet", "Leather wallet"),
        ]
    }

    #[test]
    fn test_new_session_has_greeting() {
        let session = ChatSession::new();
        assert_eq!(session.messages.len(), 1);

        let greeting = &session.messages[0];
        assert_eq!(greeting.id, 1);
        assert_eq!(greeting.sender, Sender::Bot);
        assert_eq!(greeting.text, "Birthdays, Anniversaries, and more!");
        assert_eq!(greeting.action, Some(Action::Occasions));
    }

    #[test]
    fn test_submit_appends_user_and_bot() {
        let responder = Responder::default();
        let mut session = ChatSession::new();

        let exchange = session
            .submit(&responder, "gift for my boyfriend", &catalog())
            .unwrap();

        assert_eq!(exchange.user.id, 2);
        assert_eq!(exchange.user.text, "gift for my boyfriend");
        assert_eq!(exchange.reply.id, 3);
        assert_eq!(exchange.reply.action, Some(Action::Products));
        assert_eq!(exchange.reply.data.len(), 2);
        assert_eq!(session.message_count(), 3);
    }

    #[test]
    fn test_blank_submit_ignored() {
        let responder = Responder::default();
        let mut session = ChatSession::new();

        assert!(session.submit(&responder, "   \t", &[]).is_none());
        assert_eq!(session.message_count(), 1);
    }

    #[test]
    fn test_ids_strictly_increase() {
        let responder = Responder::default();
        let mut session = ChatSession::new();
        for text in ["hi", "price?", "track my order", "help"] {
            session.submit(&responder, text, &[]);
        }

        let ids: Vec<MessageId> = session.messages.iter().map(|m| m.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(ids.len(), 9);
    }

    #[test]
    fn test_activate_products_appends_links() {
        let responder = Responder::default();
        let mut session = ChatSession::new();
        let reply_id = session
            .submit(&responder, "gift for my boyfriend", &catalog())
            .unwrap()
            .reply
            .id;

        let navigation = session
            .activate_action(reply_id, &StoreContact::default())
            .unwrap();

        assert!(matches!(navigation, Navigation::Reply { .. }));
        let last = session.last_message().unwrap();
        assert_eq!(last.id, 4);
        assert!(last.text.starts_with("Here are the product links:"));
    }

    #[test]
    fn test_activate_greeting_navigates() {
        let mut session = ChatSession::new();
        let navigation = session.activate_action(1, &StoreContact::default()).unwrap();

        assert_eq!(navigation, Navigation::route("/occasion"));
        assert_eq!(session.message_count(), 1);
    }

    #[test]
    fn test_activate_errors() {
        let responder = Responder::default();
        let mut session = ChatSession::new();
        session.submit(&responder, "what does it cost", &[]);

        assert_eq!(
            session.activate_action(2, &StoreContact::default()),
            Err(SessionError::NoAction { message_id: 2 })
        );
        assert_eq!(
            session.activate_action(3, &StoreContact::default()),
            Err(SessionError::NoAction { message_id: 3 })
        );
        assert!(matches!(
            session.activate_action(99, &StoreContact::default()),
            Err(SessionError::MessageNotFound { message_id: 99, .. })
        ));
    }
}
