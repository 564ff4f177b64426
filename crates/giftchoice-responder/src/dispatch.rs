//! Turns reply actions and suggestion chips into navigation.

use giftchoice_core::{Action, BotReply, Product, StoreContact, Suggestion};
use serde::{Deserialize, Serialize};

use crate::templates;

pub const OCCASIONS_ROUTE: &str = "/occasion";
pub const CATEGORIES_ROUTE: &str = "/categories";

/// What the UI should do when an action or suggestion is activated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Navigation {
    /// Navigate within the storefront
    Route { path: String },
    /// Open an external link in a new window
    External { url: String },
    /// Post a follow-up bot reply into the chat
    Reply { reply: BotReply },
}

impl Navigation {
    pub fn route(path: impl Into<String>) -> Self {
        Navigation::Route { path: path.into() }
    }
}

/// wa.me deep link with a pre-filled message.
///
/// Everything outside `A-Za-z0-9-_.~` is percent-encoded, so `!` becomes `%21`
/// where a browser's `encodeURIComponent` would leave it; both decode to the same text.
pub fn whatsapp_link(contact: &StoreContact, message: &str) -> String {
    format!(
        "https://wa.me/{}?text={}",
        contact.whatsapp_number,
        urlencoding::encode(message)
    )
}

/// Resolve an action attached to a bot reply.
///
/// `products` is the reply's attached product list; a product action without
/// products resolves to nothing.
pub fn dispatch_action(
    action: Action,
    products: &[Product],
    contact: &StoreContact,
) -> Option<Navigation> {
    match action {
        Action::Whatsapp => Some(Navigation::External {
            url: whatsapp_link(contact, templates::WHATSAPP_GREETING),
        }),
        Action::Occasions => Some(Navigation::route(OCCASIONS_ROUTE)),
        Action::Categories | Action::Browse => Some(Navigation::route(CATEGORIES_ROUTE)),
        Action::Products => match products {
            [] => None,
            [single] => Some(Navigation::route(single.route())),
            many => Some(Navigation::Reply {
                reply: BotReply::new(templates::product_links_text(many))
                    .with_suggestions(&[Suggestion::BrowseAllProducts, Suggestion::ViewOccasions]),
            }),
        },
    }
}

pub fn dispatch_suggestion(suggestion: Suggestion, contact: &StoreContact) -> Navigation {
    match suggestion {
        Suggestion::BrowseProducts | Suggestion::BrowseAllProducts | Suggestion::BrowseCategories => {
            Navigation::route(CATEGORIES_ROUTE)
        }
        Suggestion::ViewOccasions => Navigation::route(OCCASIONS_ROUTE),
        Suggestion::ContactUs => Navigation::External {
            url: whatsapp_link(contact, templates::CONTACT_GREETING),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whatsapp_action() {
        let nav = dispatch_action(Action::Whatsapp, &[], &StoreContact::default()).unwrap();
        assert_eq!(
            nav,
            Navigation::External {
                url: "https://wa.me/917976948872?text=Hello%21%20I%20need%20assistance%20with%20GiftChoice."
                    .to_string()
            }
        );
    }

    #[test]
    fn test_route_actions() {
        let contact = StoreContact::default();
        assert_eq!(
            dispatch_action(Action::Occasions, &[], &contact),
            Some(Navigation::route("/occasion"))
        );
        assert_eq!(
            dispatch_action(Action::Browse, &[], &contact),
            Some(Navigation::route("/categories"))
        );
        assert_eq!(
            dispatch_action(Action::Categories, &[], &contact),
            Some(Navigation::route("/categories"))
        );
    }

    #[test]
    fn test_single_product_opens_detail_page() {
        let products = vec![Product::new("42", "Mug", "")];
        let nav = dispatch_action(Action::Products, &products, &StoreContact::default());
        assert_eq!(nav, Some(Navigation::route("/product/42")));
    }

    #[test]
    fn test_many_products_post_links() {
        let products = vec![Product::new("1", "Mug", ""), Product::new("2", "Frame", "")];
        let nav = dispatch_action(Action::Products, &products, &StoreContact::default()).unwrap();

        match nav {
            Navigation::Reply { reply } => {
                assert!(reply.text.contains("• Frame - /product/2"));
                assert!(reply.action.is_none());
                assert_eq!(reply.suggestions.len(), 2);
            }
            other => panic!("unexpected navigation: {:?}", other),
        }
    }

    #[test]
    fn test_products_without_data() {
        assert!(dispatch_action(Action::Products, &[], &StoreContact::default()).is_none());
    }

    #[test]
    fn test_suggestions() {
        let contact = StoreContact::default();
        assert_eq!(
            dispatch_suggestion(Suggestion::BrowseAllProducts, &contact),
            Navigation::route("/categories")
        );
        assert_eq!(
            dispatch_suggestion(Suggestion::ViewOccasions, &contact),
            Navigation::route("/occasion")
        );
        match dispatch_suggestion(Suggestion::ContactUs, &contact) {
            Navigation::External { url } => assert!(url.ends_with("?text=Hello%21%20I%20need%20assistance.")),
            other => panic!("unexpected navigation: {:?}", other),
        }
    }

    #[test]
    fn test_navigation_serialization() {
        let json = serde_json::to_value(Navigation::route("/occasion")).unwrap();
        assert_eq!(json["type"], "route");
        assert_eq!(json["path"], "/occasion");
    }
}
