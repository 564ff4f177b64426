//! Fixed reply texts.

use giftchoice_core::{Action, BotReply, Product, StoreContact, Suggestion};

use crate::relationship::Relationship;

pub const GREETING_TEXT: &str = "Birthdays, Anniversaries, and more!";

pub const PRICING_TEXT: &str = "Product prices vary based on size and type. You can check the price on each product page. Would you like me to help you find a specific product?";

pub const ORDER_STATUS_TEXT: &str = "To check your order status, please contact us directly via WhatsApp. Our team will assist you immediately!";

pub const DELIVERY_TEXT: &str = "We offer fast delivery! Delivery times vary by location. For specific delivery information, please contact us on WhatsApp.";

pub const CATEGORIES_TEXT: &str = "We have various categories including:\n• Bottles\n• Soft Toys\n• Gifts\n• Anniversary Gifts\n• Birthday Gifts\n\nYou can browse all categories from the menu!";

pub const OCCASIONS_TEXT: &str = "We have gifts for all occasions! Check out our Occasions page to see products for Valentine's Day, Birthdays, Anniversaries, and more!";

pub const HELP_TEXT: &str = "I'm here to help! You can ask me about:\n• Products and gifts\n• Prices and orders\n• Delivery information\n• Contact details\n\nOr chat with us directly on WhatsApp for immediate assistance!";

pub const WHATSAPP_GREETING: &str = "Hello! I need assistance with GiftChoice.";

pub const CONTACT_GREETING: &str = "Hello! I need assistance.";

pub const PRODUCT_SUGGESTIONS: &[Suggestion] = &[
    Suggestion::BrowseAllProducts,
    Suggestion::ViewOccasions,
    Suggestion::ContactUs,
];

pub const BROWSE_SUGGESTIONS: &[Suggestion] = &[Suggestion::BrowseProducts, Suggestion::ViewOccasions];

pub const HELP_SUGGESTIONS: &[Suggestion] = &[
    Suggestion::BrowseProducts,
    Suggestion::ViewOccasions,
    Suggestion::ContactUs,
];

/// Help menu, also the reply when nothing else matches
pub fn help_reply() -> BotReply {
    BotReply::new(HELP_TEXT)
        .with_action(Action::Whatsapp)
        .with_suggestions(HELP_SUGGESTIONS)
}

pub fn contact_text(contact: &StoreContact) -> String {
    format!(
        "📞 Phone: {}\n📍 Address: {}\n\nWould you like to chat with us on WhatsApp?",
        contact.phone, contact.address
    )
}

/// Bulleted product names, one per line
pub fn product_list(products: &[Product]) -> String {
    products
        .iter()
        .map(|p| format!("• {}", p.name))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn found_products_text(relationship: Option<&Relationship>, products: &[Product]) -> String {
    let list = product_list(products);
    match relationship {
        Some(rel) => format!(
            "Great! I found some perfect gifts {}:\n\n{}\n\nWould you like to see more details?",
            rel.recipient_phrase(),
            list
        ),
        None => format!(
            "I found these products for you:\n\n{}\n\nWould you like to see more details?",
            list
        ),
    }
}

pub fn browse_instead_text(relationship: &Relationship) -> String {
    format!(
        "I'd love to help you find the perfect gift {}! Let me suggest browsing our categories or occasions.",
        relationship.recipient_phrase()
    )
}

/// Follow-up listing a route for every product of a multi-product reply
pub fn product_links_text(products: &[Product]) -> String {
    let links: String = products
        .iter()
        .map(|p| format!("\n• {} - {}", p.name, p.route()))
        .collect();
    format!(
        "Here are the product links:{}\n\nClick on any product to view details!",
        links
    )
}
