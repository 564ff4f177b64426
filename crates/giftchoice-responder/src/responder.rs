use giftchoice_core::{BotReply, Product, StoreContact};
use tracing::debug;

use crate::rules::{default_rules, Query, Rule, RuleContext};
use crate::templates;

/// Maps one utterance to exactly one reply.
///
/// Rules are tried in order and the first answer wins. The responder keeps no
/// state between calls; the same utterance against the same catalog always
/// yields the same reply.
pub struct Responder {
    rules: Vec<Box<dyn Rule>>,
    contact: StoreContact,
}

impl Responder {
    pub fn new(contact: StoreContact) -> Self {
        Self {
            rules: default_rules(),
            contact,
        }
    }

    /// Rule names in priority order
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn contact(&self) -> &StoreContact {
        &self.contact
    }

    pub fn respond(&self, utterance: &str, catalog: &[Product]) -> BotReply {
        let query = Query::parse(utterance);
        let ctx = RuleContext {
            catalog,
            contact: &self.contact,
        };

        for rule in &self.rules {
            if let Some(reply) = rule.respond(&query, &ctx) {
                debug!(
                    rule = rule.name(),
                    relationship = query.relationship.map(|r| r.label),
                    "Utterance answered"
                );
                return reply;
            }
        }

        debug!("No rule matched, replying with help menu");
        templates::help_reply()
    }
}

impl Default for Responder {
    fn default() -> Self {
        Self::new(StoreContact::default())
    }
}

impl std::fmt::Debug for Responder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Responder")
            .field("rules", &self.rule_names())
            .field("contact", &self.contact)
            .finish()
    }
}
