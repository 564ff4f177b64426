//! Query classifier and responder.
//!
//! An utterance is lowercased, checked for a gift recipient, then run through
//! an ordered chain of rules. The first rule that answers wins; when none
//! does the help menu is returned, so every utterance gets exactly one reply.

pub mod dispatch;
pub mod relationship;
pub mod responder;
pub mod rules;
pub mod templates;

pub use dispatch::{dispatch_action, dispatch_suggestion, whatsapp_link, Navigation};
pub use relationship::{detect_relationship, Relationship, RELATIONSHIPS};
pub use responder::Responder;
pub use rules::{default_rules, IntentRule, ProductSearchRule, Query, Rule, RuleContext};
