pub mod contact;
pub mod error;
pub mod types;

pub use contact::StoreContact;
pub use error::{CoreError, Result};
pub use types::{
    decode_keywords, Action, BotMessage, BotReply, MessageId, Product, ProductId, ProductSize,
    Sender, Suggestion,
};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
