use thiserror::Error;

/// Errors raised while loading the product catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("network error: {0}")]
    Network(String),

    #[error("api error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("decode error: {0}")]
    Decode(String),

    #[error("config error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            CatalogError::Decode(e.to_string())
        } else {
            CatalogError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Decode(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
