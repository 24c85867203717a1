//! Cart operations: pending purchase intent before it becomes durable.

use common::{CartLineId, CustomerId, Money, ProductId};
use domain::{CartItemView, CartLine};
use store::StorefrontStore;

use crate::{Result, ServiceError};

/// Tracks each customer's cart. Stock is only *checked* here, never
/// reserved; the authoritative check happens inside the checkout commit.
pub struct CartService<S> {
    store: S,
}

impl<S: StorefrontStore> CartService<S> {
    /// Creates a new cart service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Adds `quantity` of a product to the customer's cart.
    ///
    /// Fails with `InvalidQuantity` for a zero quantity and with
    /// `InsufficientStock` when the merged line quantity would exceed the
    /// product's current stock. Adding a product already in the cart
    /// merges into the existing line.
    #[tracing::instrument(skip(self))]
    pub async fn add_item(
        &self,
        customer: CustomerId,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<CartLine> {
        if quantity == 0 {
            return Err(ServiceError::InvalidQuantity {
                quantity: quantity as i64,
            });
        }

        let product = self
            .store
            .get_product(product_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("product", product_id))?;

        let existing = self
            .store
            .find_cart_line(customer, product_id)
            .await?
            .map(|line| line.quantity)
            .unwrap_or(0);

        if existing.saturating_add(quantity) > product.stock_quantity {
            return Err(ServiceError::InsufficientStock {
                product_id: product_id.clone(),
            });
        }

        Ok(self
            .store
            .upsert_cart_line(customer, product_id, quantity)
            .await?)
    }

    /// Sets a line's quantity directly; zero or negative removes the line.
    ///
    /// The new quantity is not re-validated against stock — the checkout
    /// commit is the authoritative check.
    #[tracing::instrument(skip(self))]
    pub async fn update_quantity(&self, line: CartLineId, quantity: i64) -> Result<()> {
        if quantity <= 0 {
            self.store.delete_cart_line(line).await?;
            return Ok(());
        }

        let quantity =
            u32::try_from(quantity).map_err(|_| ServiceError::InvalidQuantity { quantity })?;
        self.store.set_cart_line_quantity(line, quantity).await?;
        Ok(())
    }

    /// Removes a line. Idempotent.
    #[tracing::instrument(skip(self))]
    pub async fn remove_item(&self, line: CartLineId) -> Result<()> {
        Ok(self.store.delete_cart_line(line).await?)
    }

    /// The customer's cart joined with current product data, most recently
    /// added first.
    pub async fn list_items(&self, customer: CustomerId) -> Result<Vec<CartItemView>> {
        Ok(self.store.cart_view(customer).await?)
    }

    /// Removes every line for the customer.
    #[tracing::instrument(skip(self))]
    pub async fn clear(&self, customer: CustomerId) -> Result<()> {
        Ok(self.store.clear_cart(customer).await?)
    }

    /// Sum of unit price x quantity across the cart; zero when empty.
    pub async fn total(&self, customer: CustomerId) -> Result<Money> {
        Ok(self.store.cart_total(customer).await?)
    }
}
