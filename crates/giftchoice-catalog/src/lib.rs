//! Product catalog for the chat assistant.
//!
//! The catalog is fetched once from the storefront API and held as an
//! immutable snapshot. Readers clone an `Arc` to the current snapshot, so a
//! late fetch simply becomes visible to the next reader.

pub mod error;
pub mod source;
pub mod store;

pub use error::{CatalogError, Result};
pub use source::{HttpProductSource, ProductSource, StaticProductSource};
pub use store::CatalogStore;
