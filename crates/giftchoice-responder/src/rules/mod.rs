pub mod intent;
pub mod product;

pub use intent::{builtin_intents, IntentRule};
pub use product::ProductSearchRule;

use giftchoice_core::{BotReply, Product, StoreContact};

use crate::relationship::{detect_relationship, Relationship};

/// Words never used as product search tokens
pub const STOP_WORDS: &[&str] = &[
    "product", "gift", "item", "show", "find", "search", "for", "a", "an", "the",
];

/// A normalized utterance
#[derive(Debug, Clone)]
pub struct Query {
    /// Lowercased utterance
    pub text: String,
    pub relationship: Option<&'static Relationship>,
    /// Words longer than two characters that are not stop words
    pub tokens: Vec<String>,
}

impl Query {
    pub fn parse(utterance: &str) -> Self {
        let text = utterance.to_lowercase();
        let relationship = detect_relationship(&text);
        let tokens = text
            .split_whitespace()
            .filter(|word| word.chars().count() > 2 && !STOP_WORDS.contains(word))
            .map(str::to_string)
            .collect();

        Self {
            text,
            relationship,
            tokens,
        }
    }

    pub fn contains_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.text.contains(n))
    }
}

/// What a rule may read while answering
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub catalog: &'a [Product],
    pub contact: &'a StoreContact,
}

/// One step of the responder's priority chain
pub trait Rule: Send + Sync {
    fn name(&self) -> &str;

    /// Answer the query, or `None` to let the next rule try
    fn respond(&self, query: &Query, ctx: &RuleContext<'_>) -> Option<BotReply>;
}

/// Product search followed by the fixed intents, in priority order
pub fn default_rules() -> Vec<Box<dyn Rule>> {
    let mut rules: Vec<Box<dyn Rule>> = vec![Box::new(ProductSearchRule::new())];
    rules.extend(
        builtin_intents()
            .into_iter()
            .map(|rule| Box::new(rule) as Box<dyn Rule>),
    );
    rules
}
