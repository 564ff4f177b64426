pub mod message;
pub mod product;
pub mod reply;

pub use message::{BotMessage, MessageId, Sender};
pub use product::{decode_keywords, Product, ProductId, ProductSize};
pub use reply::{Action, BotReply, Suggestion};
