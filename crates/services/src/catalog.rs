//! Catalog management: product and category CRUD, stock adjustments.
//!
//! Field-mapped updates with no invariants beyond non-negativity, which
//! the types and the store's conditional stock arithmetic enforce.

use common::{CategoryId, ProductId};
use domain::{Category, NewProduct, Product, ProductUpdate};
use store::StorefrontStore;

use crate::{Result, ServiceError};

/// Admin-facing catalog operations.
pub struct CatalogService<S> {
    store: S,
}

impl<S: StorefrontStore> CatalogService<S> {
    /// Creates a new catalog service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[tracing::instrument(skip(self, new_product), fields(product_id = %new_product.id))]
    pub async fn add_product(&self, new_product: NewProduct) -> Result<Product> {
        let product = new_product.into_product();
        self.store.insert_product(product.clone()).await?;
        Ok(product)
    }

    pub async fn product_details(&self, id: &ProductId) -> Result<Product> {
        self.store
            .get_product(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("product", id))
    }

    #[tracing::instrument(skip(self, update))]
    pub async fn update_product(&self, id: &ProductId, update: ProductUpdate) -> Result<Product> {
        Ok(self.store.update_product(id, update).await?)
    }

    /// Deletes the catalog record. Historical order items are unaffected:
    /// they carry their own name/price snapshots.
    #[tracing::instrument(skip(self))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<()> {
        Ok(self.store.delete_product(id).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn set_availability(&self, id: &ProductId, available: bool) -> Result<()> {
        Ok(self.store.set_product_availability(id, available).await?)
    }

    /// Adjusts stock by a signed delta (restock or correction). Fails with
    /// `InsufficientStock` if the result would go negative.
    #[tracing::instrument(skip(self))]
    pub async fn adjust_stock(&self, id: &ProductId, delta: i64) -> Result<()> {
        Ok(self.store.adjust_stock(id, delta).await?)
    }

    /// Available products, optionally limited to one category.
    pub async fn list_products(&self, category: Option<CategoryId>) -> Result<Vec<Product>> {
        Ok(self.store.list_products(category).await?)
    }

    /// Available products matching the term by name or description.
    pub async fn search_products(&self, term: &str) -> Result<Vec<Product>> {
        Ok(self.store.search_products(term).await?)
    }

    /// Products at or below their minimum stock level.
    pub async fn low_stock_products(&self) -> Result<Vec<Product>> {
        Ok(self.store.low_stock_products().await?)
    }

    pub async fn add_category(&self, category: Category) -> Result<()> {
        Ok(self.store.insert_category(category).await?)
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(self.store.list_categories().await?)
    }
}
