use giftchoice_core::{Action, BotReply, Product};

use crate::relationship::Relationship;
use crate::rules::{Query, Rule, RuleContext};
use crate::templates;

/// Words that open the product search even without a recipient
pub const GIFT_INTENT_WORDS: &[&str] = &["product", "gift", "item", "for"];

/// Maximum products listed in one reply
pub const MAX_RESULTS: usize = 5;

/// Searches the catalog when the user asks for a gift or names a recipient
#[derive(Debug, Clone)]
pub struct ProductSearchRule {
    max_results: usize,
}

impl ProductSearchRule {
    pub fn new() -> Self {
        Self {
            max_results: MAX_RESULTS,
        }
    }

    fn applies(query: &Query) -> bool {
        query.relationship.is_some() || query.contains_any(GIFT_INTENT_WORDS)
    }

    /// Matching products in catalog order, capped at `max_results`
    pub fn search(&self, query: &Query, catalog: &[Product]) -> Vec<Product> {
        match query.relationship {
            Some(rel) => catalog
                .iter()
                .filter(|p| Self::matches_recipient(rel, &query.tokens, p))
                .take(self.max_results)
                .cloned()
                .collect(),
            None => {
                let needle = query.tokens.join(" ");
                catalog
                    .iter()
                    .filter(|p| Self::matches_needle(&needle, p))
                    .take(self.max_results)
                    .cloned()
                    .collect()
            }
        }
    }

    fn matches_recipient(rel: &Relationship, tokens: &[String], product: &Product) -> bool {
        let text = product.search_text();
        rel.matches_product_text(&text) || tokens.iter().any(|t| text.contains(t.as_str()))
    }

    fn matches_needle(needle: &str, product: &Product) -> bool {
        product.name.to_lowercase().contains(needle)
            || product.description.to_lowercase().contains(needle)
            || product
                .keywords
                .iter()
                .any(|k| k.to_lowercase().contains(needle))
    }
}

impl Default for ProductSearchRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for ProductSearchRule {
    fn name(&self) -> &str {
        "product_search"
    }

    fn respond(&self, query: &Query, ctx: &RuleContext<'_>) -> Option<BotReply> {
        // An empty catalog (fetch failed or pending) leaves the question to the fixed intents
        if !Self::applies(query) || ctx.catalog.is_empty() {
            return None;
        }
        // Nothing to search for: leave it to the fixed intents
        if query.relationship.is_none() && query.tokens.is_empty() {
            return None;
        }

        let matches = self.search(query, ctx.catalog);
        if !matches.is_empty() {
            return Some(
                BotReply::new(templates::found_products_text(query.relationship, &matches))
                    .with_action(Action::Products)
                    .with_products(matches)
                    .with_suggestions(templates::PRODUCT_SUGGESTIONS),
            );
        }

        query.relationship.map(|rel| {
            BotReply::new(templates::browse_instead_text(rel))
                .with_action(Action::Browse)
                .with_suggestions(templates::BROWSE_SUGGESTIONS)
        })
    }
}
