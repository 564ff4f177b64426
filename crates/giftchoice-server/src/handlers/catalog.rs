use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use giftchoice_core::Product;
use serde::Serialize;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
    pub products: Vec<CatalogEntry>,
}

/// 商品及其尺寸价格区间
#[derive(Debug, Serialize)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub product: Product,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceRange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl From<&Product> for CatalogEntry {
    fn from(product: &Product) -> Self {
        Self {
            price_range: product.price_range().map(|(min, max)| PriceRange { min, max }),
            product: product.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub count: usize,
}

pub async fn get_catalog_handler(State(state): State<Arc<AppState>>) -> Json<CatalogResponse> {
    let products = state.catalog.snapshot();
    Json(CatalogResponse {
        count: products.len(),
        fetched_at: state.catalog.fetched_at(),
        products: products.iter().map(CatalogEntry::from).collect(),
    })
}

/// 手动重新拉取商品；失败时保留旧快照
pub async fn refresh_catalog_handler(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<RefreshResponse>> {
    let count = state.catalog.refresh(state.source.as_ref()).await?;
    Ok(Json(RefreshResponse { count }))
}
