use giftchoice_core::{Action, BotReply, StoreContact, Suggestion};

use crate::rules::{Query, Rule, RuleContext};
use crate::templates;

type Predicate = fn(&Query) -> bool;
type Template = fn(&StoreContact) -> BotReply;

/// Keyword-triggered reply with fixed wording
#[derive(Clone)]
pub struct IntentRule {
    name: &'static str,
    predicate: Predicate,
    template: Template,
}

impl IntentRule {
    pub fn new(name: &'static str, predicate: Predicate, template: Template) -> Self {
        Self {
            name,
            predicate,
            template,
        }
    }

    pub fn matches(&self, query: &Query) -> bool {
        (self.predicate)(query)
    }
}

impl std::fmt::Debug for IntentRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentRule").field("name", &self.name).finish()
    }
}

impl Rule for IntentRule {
    fn name(&self) -> &str {
        self.name
    }

    fn respond(&self, query: &Query, ctx: &RuleContext<'_>) -> Option<BotReply> {
        self.matches(query).then(|| (self.template)(ctx.contact))
    }
}

/// Fixed intents in the order they are tried
pub fn builtin_intents() -> Vec<IntentRule> {
    vec![
        IntentRule::new(
            "pricing",
            |q| q.contains_any(&["price", "cost", "how much"]),
            |_| {
                BotReply::new(templates::PRICING_TEXT)
                    .with_suggestions(&[Suggestion::BrowseProducts, Suggestion::ViewOccasions])
            },
        ),
        IntentRule::new(
            "order_status",
            |q| q.text.contains("order") && q.contains_any(&["status", "track"]),
            |_| BotReply::new(templates::ORDER_STATUS_TEXT).with_action(Action::Whatsapp),
        ),
        IntentRule::new(
            "delivery",
            |q| q.contains_any(&["delivery", "shipping", "time"]),
            |_| BotReply::new(templates::DELIVERY_TEXT).with_action(Action::Whatsapp),
        ),
        IntentRule::new(
            "contact",
            |q| q.contains_any(&["contact", "phone", "number", "address"]),
            |contact| BotReply::new(templates::contact_text(contact)).with_action(Action::Whatsapp),
        ),
        IntentRule::new(
            "categories",
            |q| q.contains_any(&["category", "categories", "type"]),
            |_| {
                BotReply::new(templates::CATEGORIES_TEXT)
                    .with_action(Action::Categories)
                    .with_suggestions(&[Suggestion::BrowseCategories, Suggestion::ViewOccasions])
            },
        ),
        IntentRule::new(
            "occasions",
            |q| q.contains_any(&["occasion", "valentine", "birthday", "anniversary"]),
            |_| BotReply::new(templates::OCCASIONS_TEXT).with_action(Action::Occasions),
        ),
        IntentRule::new(
            "help",
            |q| q.contains_any(&["help", "support", "assist"]),
            |_| templates::help_reply(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_match(text: &str) -> Option<&'static str> {
        let query = Query::parse(text);
        builtin_intents()
            .into_iter()
            .find(|rule| rule.matches(&query))
            .map(|rule| rule.name)
    }

    #[test]
    fn test_intent_order() {
        assert_eq!(first_match("how much does delivery cost"), Some("pricing"));
        assert_eq!(first_match("track my order"), Some("order_status"));
        assert_eq!(first_match("order please"), None);
        assert_eq!(first_match("shipping to delhi"), Some("delivery"));
        assert_eq!(first_match("your phone"), Some("contact"));
        assert_eq!(first_match("what categories exist"), Some("categories"));
        assert_eq!(first_match("valentine ideas"), Some("occasions"));
        assert_eq!(first_match("i need support"), Some("help"));
    }

    #[test]
    fn test_contact_reply_uses_store_contact() {
        let contact = StoreContact::default();
        let rule = builtin_intents()
            .into_iter()
            .find(|r| r.name == "contact")
            .unwrap();
        let ctx = RuleContext { catalog: &[], contact: &contact };
        let reply = rule.respond(&Query::parse("address?"), &ctx).unwrap();

        assert!(reply.text.contains("+91 79769 48872"));
        assert_eq!(reply.action, Some(Action::Whatsapp));
    }
}
