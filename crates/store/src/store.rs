use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{CartLineId, CategoryId, CustomerId, Money, NotificationId, OrderId, ProductId};
use domain::{
    CartItemView, CartLine, Category, NewNotification, Notification, Order, OrderItem,
    OrderStatus, Product, ProductUpdate,
};

use crate::Result;

/// Status write applied by [`StorefrontStore::transition_order`].
///
/// Timestamp fields are written only when set; an existing stamp is never
/// cleared by a later transition.
#[derive(Debug, Clone)]
pub struct StatusUpdate {
    pub status: OrderStatus,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
}

impl StatusUpdate {
    /// Builds the write for entering `status` at time `now`, stamping
    /// `confirmed_at` / `delivered_at` when those statuses are entered.
    pub fn entering(status: OrderStatus, now: DateTime<Utc>) -> Self {
        Self {
            status,
            confirmed_at: (status == OrderStatus::Confirmed).then_some(now),
            delivered_at: (status == OrderStatus::Delivered).then_some(now),
        }
    }
}

/// The storage boundary shared by every storefront workflow.
///
/// Implementations must be thread-safe; the product stock column is the
/// only resource contended across customers, and the two multi-entity
/// operations ([`commit_checkout`](Self::commit_checkout),
/// [`transition_order`](Self::transition_order)) are all-or-nothing.
#[async_trait]
pub trait StorefrontStore: Send + Sync {
    // -- Catalog --

    async fn insert_category(&self, category: Category) -> Result<()>;

    async fn list_categories(&self) -> Result<Vec<Category>>;

    async fn insert_product(&self, product: Product) -> Result<()>;

    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>>;

    /// Field-mapped admin edit. Fails with `RowNotFound` for an unknown id.
    async fn update_product(&self, id: &ProductId, update: ProductUpdate) -> Result<Product>;

    /// Deletes the catalog record. Historical order items keep their
    /// snapshots, so deletion is allowed even for products referenced by
    /// past orders.
    async fn delete_product(&self, id: &ProductId) -> Result<()>;

    async fn set_product_availability(&self, id: &ProductId, available: bool) -> Result<()>;

    /// Adjusts stock by a signed delta (admin restock / correction).
    /// Fails with `StockConflict` if the result would be negative.
    async fn adjust_stock(&self, id: &ProductId, delta: i64) -> Result<()>;

    /// Available products, name-ordered, optionally filtered by category.
    async fn list_products(&self, category: Option<CategoryId>) -> Result<Vec<Product>>;

    /// Available products whose name or description matches the term.
    async fn search_products(&self, term: &str) -> Result<Vec<Product>>;

    /// Products at or below their minimum stock level, lowest stock first.
    async fn low_stock_products(&self) -> Result<Vec<Product>>;

    // -- Cart --

    async fn find_cart_line(
        &self,
        customer: CustomerId,
        product: &ProductId,
    ) -> Result<Option<CartLine>>;

    async fn get_cart_line(&self, line: CartLineId) -> Result<Option<CartLine>>;

    /// Adds `quantity` for (customer, product), merging into the existing
    /// line if one exists. Returns the resulting line.
    async fn upsert_cart_line(
        &self,
        customer: CustomerId,
        product: &ProductId,
        quantity: u32,
    ) -> Result<CartLine>;

    async fn set_cart_line_quantity(&self, line: CartLineId, quantity: u32) -> Result<()>;

    /// Deletes the line. Idempotent: deleting a nonexistent line succeeds.
    async fn delete_cart_line(&self, line: CartLineId) -> Result<()>;

    async fn clear_cart(&self, customer: CustomerId) -> Result<()>;

    /// Cart lines joined with current product fields, newest first. Lines
    /// whose product no longer exists are omitted.
    async fn cart_view(&self, customer: CustomerId) -> Result<Vec<CartItemView>>;

    /// Sum of unit price x quantity across the cart; zero when empty.
    async fn cart_total(&self, customer: CustomerId) -> Result<Money>;

    // -- Checkout --

    /// The durable unit of work for checkout: conditionally decrements
    /// stock for every item (aborting the whole unit with `StockConflict`
    /// if any product has fewer units than ordered), inserts the order,
    /// its items, and exactly one notification, and clears the customer's
    /// cart. On failure nothing is visible.
    async fn commit_checkout(
        &self,
        order: &Order,
        items: &[OrderItem],
        notification: NewNotification,
    ) -> Result<()>;

    // -- Orders --

    async fn get_order(&self, id: OrderId) -> Result<Option<(Order, Vec<OrderItem>)>>;

    async fn find_order_by_number(&self, order_number: &str) -> Result<Option<Order>>;

    /// A customer's orders, newest first.
    async fn orders_for_customer(
        &self,
        customer: CustomerId,
        limit: Option<i64>,
    ) -> Result<Vec<Order>>;

    /// All orders (admin view), newest first, optionally filtered by status.
    async fn list_orders(
        &self,
        status: Option<OrderStatus>,
        limit: Option<i64>,
    ) -> Result<Vec<Order>>;

    /// Writes a status update and its optional notification in one unit of
    /// work. Returns the updated order.
    async fn transition_order(
        &self,
        id: OrderId,
        update: StatusUpdate,
        notification: Option<NewNotification>,
    ) -> Result<Order>;

    // -- Notifications --

    /// A customer's notifications, newest first, capped at `limit`.
    async fn notifications_for(
        &self,
        customer: CustomerId,
        unread_only: bool,
        limit: i64,
    ) -> Result<Vec<Notification>>;

    /// Sets the read flag. Idempotent; unknown ids are not an error.
    async fn mark_notification_read(&self, id: NotificationId) -> Result<()>;

    async fn unread_count(&self, customer: CustomerId) -> Result<u64>;
}
