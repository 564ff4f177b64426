use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::product::Product;
use crate::types::reply::{Action, BotReply, Suggestion};

/// Message identifier, strictly increasing within one chat session
pub type MessageId = u64;

/// Who wrote a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

/// One entry of a chat transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotMessage {
    pub id: MessageId,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub action: Option<Action>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub data: Vec<Product>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub suggestions: Vec<Suggestion>,
}

impl BotMessage {
    /// Create a user message
    pub fn user(id: MessageId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            sender: Sender::User,
            timestamp: Utc::now(),
            action: None,
            data: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Create a bot message carrying a reply
    pub fn bot(id: MessageId, reply: BotReply) -> Self {
        Self {
            id,
            text: reply.text,
            sender: Sender::Bot,
            timestamp: Utc::now(),
            action: reply.action,
            data: reply.products,
            suggestions: reply.suggestions,
        }
    }

    pub fn is_bot(&self) -> bool {
        self.sender == Sender::Bot
    }
}
