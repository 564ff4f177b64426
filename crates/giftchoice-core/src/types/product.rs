use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Product identifier as a string; the backend may send numbers or strings
pub type ProductId = String;

/// Catalog product as returned by `GET /products`
///
/// Only the fields the assistant reads are typed. Everything else the backend
/// sends (images, category and occasion associations, ...) is kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(alias = "_id", deserialize_with = "deserialize_id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub description: String,
    /// Either a JSON array or a string holding a JSON-encoded array on the wire
    #[serde(default, deserialize_with = "deserialize_keywords")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "deserialize_sizes")]
    pub sizes: Vec<ProductSize>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A purchasable size of a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSize {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default)]
    pub price: Value,
}

impl ProductSize {
    /// Numeric price, accepting numbers and numeric strings
    pub fn price_value(&self) -> Option<f64> {
        let n = match &self.price {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }?;
        n.is_finite().then_some(n)
    }
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            keywords: Vec::new(),
            sizes: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_sizes(mut self, sizes: Vec<ProductSize>) -> Self {
        self.sizes = sizes;
        self
    }

    /// Lowercased `name description keywords...`, the text relationship search runs on
    pub fn search_text(&self) -> String {
        format!("{} {} {}", self.name, self.description, self.keywords.join(" ")).to_lowercase()
    }

    /// Lowest and highest size price, ignoring sizes without a usable price
    pub fn price_range(&self) -> Option<(f64, f64)> {
        let mut prices = self.sizes.iter().filter_map(ProductSize::price_value);
        let first = prices.next()?;
        Some(prices.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }

    /// Storefront route for the product detail page
    pub fn route(&self) -> String {
        format!("/product/{}", self.id)
    }
}

/// Decode a raw `keywords` value.
///
/// Arrays are taken as-is, strings are parsed as JSON arrays. Anything that
/// does not decode to an array yields no keywords.
pub fn decode_keywords(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Value::String(raw) if raw.trim().is_empty() => Vec::new(),
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(parsed @ Value::Array(_)) => decode_keywords(&parsed),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

fn deserialize_keywords<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decode_keywords(&value))
}

fn deserialize_sizes<'de, D>(deserializer: D) -> Result<Vec<ProductSize>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let items = match value {
        Value::Array(items) => items,
        Value::String(raw) => match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(items)) => items,
            _ => return Ok(Vec::new()),
        },
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<ProductId, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("invalid product id: {}", other))),
    }
}

fn deserialize_nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
