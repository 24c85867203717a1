//! Catalog endpoints: products and categories.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::{CategoryId, ProductId};
use domain::{Category, NewProduct, Product, ProductUpdate};
use serde::Deserialize;
use store::StorefrontStore;

use super::{AppState, parse_uuid};
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct ListProductsQuery {
    pub category_id: Option<String>,
    pub search: Option<String>,
}

/// GET /products — list available products, optionally filtered by
/// category or a search term.
#[tracing::instrument(skip(state, query))]
pub async fn list<S: StorefrontStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    if let Some(term) = &query.search {
        return Ok(Json(state.catalog.search_products(term).await?));
    }

    let category = query
        .category_id
        .as_deref()
        .map(|id| parse_uuid(id).map(CategoryId::from_uuid))
        .transpose()?;

    Ok(Json(state.catalog.list_products(category).await?))
}

/// GET /products/low-stock — products at or below their minimum level.
#[tracing::instrument(skip(state))]
pub async fn low_stock<S: StorefrontStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.catalog.low_stock_products().await?))
}

/// GET /products/:id — a single product.
#[tracing::instrument(skip(state))]
pub async fn get<S: StorefrontStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let product = state.catalog.product_details(&ProductId::new(id)).await?;
    Ok(Json(product))
}

/// POST /products — create a product.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: StorefrontStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let product = state.catalog.add_product(req).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /products/:id — field-mapped product update.
#[tracing::instrument(skip(state, req))]
pub async fn update<S: StorefrontStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<ProductUpdate>,
) -> Result<Json<Product>, ApiError> {
    let product = state
        .catalog
        .update_product(&ProductId::new(id), req)
        .await?;
    Ok(Json(product))
}

/// DELETE /products/:id — delete a catalog record.
#[tracing::instrument(skip(state))]
pub async fn delete<S: StorefrontStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.catalog.delete_product(&ProductId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct AvailabilityRequest {
    pub available: bool,
}

/// POST /products/:id/availability — toggle product visibility.
#[tracing::instrument(skip(state, req))]
pub async fn set_availability<S: StorefrontStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<AvailabilityRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .catalog
        .set_availability(&ProductId::new(id), req.available)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct StockAdjustment {
    pub delta: i64,
}

/// POST /products/:id/stock — adjust stock by a signed delta.
#[tracing::instrument(skip(state, req))]
pub async fn adjust_stock<S: StorefrontStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<StockAdjustment>,
) -> Result<Json<Product>, ApiError> {
    let id = ProductId::new(id);
    state.catalog.adjust_stock(&id, req.delta).await?;
    Ok(Json(state.catalog.product_details(&id).await?))
}

#[derive(Deserialize)]
pub struct NewCategoryRequest {
    pub name: String,
    pub icon: Option<String>,
}

/// POST /categories — create a category.
#[tracing::instrument(skip(state, req))]
pub async fn create_category<S: StorefrontStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<NewCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let category = Category {
        id: CategoryId::new(),
        name: req.name,
        icon: req.icon,
    };
    state.catalog.add_category(category.clone()).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// GET /categories — list categories, name-ordered.
#[tracing::instrument(skip(state))]
pub async fn list_categories<S: StorefrontStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.catalog.list_categories().await?))
}
