use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CoreError;
use crate::types::product::Product;

/// Follow-up the UI offers next to a bot reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Occasions,
    Categories,
    Browse,
    Products,
    Whatsapp,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Occasions => "occasions",
            Action::Categories => "categories",
            Action::Browse => "browse",
            Action::Products => "products",
            Action::Whatsapp => "whatsapp",
        }
    }

    /// Label of the button rendered for this action
    pub fn button_label(&self) -> &'static str {
        match self {
            Action::Whatsapp => "Chat on WhatsApp",
            Action::Occasions => "View Occasions",
            Action::Categories | Action::Browse => "Browse Products",
            Action::Products => "View Details",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "occasions" => Ok(Action::Occasions),
            "categories" => Ok(Action::Categories),
            "browse" => Ok(Action::Browse),
            "products" => Ok(Action::Products),
            "whatsapp" => Ok(Action::Whatsapp),
            other => Err(CoreError::UnknownAction(other.to_string())),
        }
    }
}

/// Suggestion chip shown under a bot reply, serialized as its label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suggestion {
    #[serde(rename = "Browse Products")]
    BrowseProducts,
    #[serde(rename = "Browse All Products")]
    BrowseAllProducts,
    #[serde(rename = "Browse Categories")]
    BrowseCategories,
    #[serde(rename = "View Occasions")]
    ViewOccasions,
    #[serde(rename = "Contact Us")]
    ContactUs,
}

impl Suggestion {
    pub const ALL: [Suggestion; 5] = [
        Suggestion::BrowseProducts,
        Suggestion::BrowseAllProducts,
        Suggestion::BrowseCategories,
        Suggestion::ViewOccasions,
        Suggestion::ContactUs,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Suggestion::BrowseProducts => "Browse Products",
            Suggestion::BrowseAllProducts => "Browse All Products",
            Suggestion::BrowseCategories => "Browse Categories",
            Suggestion::ViewOccasions => "View Occasions",
            Suggestion::ContactUs => "Contact Us",
        }
    }
}

impl std::fmt::Display for Suggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Suggestion {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Suggestion::ALL
            .into_iter()
            .find(|suggestion| suggestion.label() == s)
            .ok_or_else(|| CoreError::UnknownSuggestion(s.to_string()))
    }
}

/// Structured answer to one utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotReply {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub action: Option<Action>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub products: Vec<Product>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub suggestions: Vec<Suggestion>,
}

impl BotReply {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: None,
            products: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_products(mut self, products: Vec<Product>) -> Self {
        self.products = products;
        self
    }

    pub fn with_suggestions(mut self, suggestions: &[Suggestion]) -> Self {
        self.suggestions = suggestions.to_vec();
        self
    }
}
