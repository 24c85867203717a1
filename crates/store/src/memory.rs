use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::{CartLineId, CategoryId, CustomerId, Money, NotificationId, OrderId, ProductId};
use domain::{
    CartItemView, CartLine, Category, NewNotification, Notification, Order, OrderItem,
    OrderStatus, Product, ProductUpdate,
};
use tokio::sync::RwLock;

use crate::store::{StatusUpdate, StorefrontStore};
use crate::{Result, StoreError};

#[derive(Debug, Default)]
struct State {
    categories: Vec<Category>,
    products: HashMap<ProductId, Product>,
    cart: Vec<CartLine>,
    orders: HashMap<OrderId, Order>,
    order_items: HashMap<OrderId, Vec<OrderItem>>,
    notifications: Vec<Notification>,
}

/// In-memory store implementation for tests and local runs.
///
/// All state sits behind a single lock, so the multi-entity operations are
/// trivially atomic; the conditional stock decrement still restores
/// already-applied decrements on failure so both backends share the same
/// observable contract.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

impl MemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored notifications (test helper).
    pub async fn notification_count(&self) -> usize {
        self.state.read().await.notifications.len()
    }
}

fn view_for(state: &State, line: &CartLine) -> Option<CartItemView> {
    let product = state.products.get(&line.product_id)?;
    Some(CartItemView::from_line(
        line,
        product.name.clone(),
        product.unit_price,
        product.stock_quantity,
        product.discount_percent,
    ))
}

#[async_trait]
impl StorefrontStore for MemoryStore {
    async fn insert_category(&self, category: Category) -> Result<()> {
        let mut state = self.state.write().await;
        if state.categories.iter().any(|c| c.id == category.id) {
            return Err(StoreError::duplicate("category", category.id));
        }
        state.categories.push(category);
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let state = self.state.read().await;
        let mut categories = state.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn insert_product(&self, product: Product) -> Result<()> {
        let mut state = self.state.write().await;
        if state.products.contains_key(&product.id) {
            return Err(StoreError::duplicate("product", &product.id));
        }
        state.products.insert(product.id.clone(), product);
        Ok(())
    }

    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>> {
        let state = self.state.read().await;
        Ok(state.products.get(id).cloned())
    }

    async fn update_product(&self, id: &ProductId, update: ProductUpdate) -> Result<Product> {
        let mut state = self.state.write().await;
        let product = state
            .products
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("product", id))?;

        product.name = update.name;
        product.category_id = update.category_id;
        product.description = update.description;
        product.image_ref = update.image_ref;
        product.unit_price = update.unit_price;
        product.unit = update.unit;
        product.stock_quantity = update.stock_quantity;
        product.min_stock_level = update.min_stock_level;
        product.discount_percent = update.discount_percent;

        Ok(product.clone())
    }

    async fn delete_product(&self, id: &ProductId) -> Result<()> {
        let mut state = self.state.write().await;
        state
            .products
            .remove(id)
            .ok_or_else(|| StoreError::not_found("product", id))?;
        Ok(())
    }

    async fn set_product_availability(&self, id: &ProductId, available: bool) -> Result<()> {
        let mut state = self.state.write().await;
        let product = state
            .products
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("product", id))?;
        product.is_available = available;
        Ok(())
    }

    async fn adjust_stock(&self, id: &ProductId, delta: i64) -> Result<()> {
        let mut state = self.state.write().await;
        let product = state
            .products
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("product", id))?;

        let new_stock = product.stock_quantity as i64 + delta;
        if new_stock < 0 {
            return Err(StoreError::StockConflict {
                product_id: id.clone(),
            });
        }
        product.stock_quantity = new_stock as u32;
        Ok(())
    }

    async fn list_products(&self, category: Option<CategoryId>) -> Result<Vec<Product>> {
        let state = self.state.read().await;
        let mut products: Vec<_> = state
            .products
            .values()
            .filter(|p| p.is_available)
            .filter(|p| category.is_none_or(|c| p.category_id == c))
            .cloned()
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn search_products(&self, term: &str) -> Result<Vec<Product>> {
        let needle = term.to_lowercase();
        let state = self.state.read().await;
        let mut products: Vec<_> = state
            .products
            .values()
            .filter(|p| p.is_available)
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn low_stock_products(&self) -> Result<Vec<Product>> {
        let state = self.state.read().await;
        let mut products: Vec<_> = state
            .products
            .values()
            .filter(|p| p.is_low_stock())
            .cloned()
            .collect();
        products.sort_by_key(|p| p.stock_quantity);
        Ok(products)
    }

    async fn find_cart_line(
        &self,
        customer: CustomerId,
        product: &ProductId,
    ) -> Result<Option<CartLine>> {
        let state = self.state.read().await;
        Ok(state
            .cart
            .iter()
            .find(|l| l.customer_id == customer && &l.product_id == product)
            .cloned())
    }

    async fn get_cart_line(&self, line: CartLineId) -> Result<Option<CartLine>> {
        let state = self.state.read().await;
        Ok(state.cart.iter().find(|l| l.id == line).cloned())
    }

    async fn upsert_cart_line(
        &self,
        customer: CustomerId,
        product: &ProductId,
        quantity: u32,
    ) -> Result<CartLine> {
        let mut state = self.state.write().await;

        if let Some(line) = state
            .cart
            .iter_mut()
            .find(|l| l.customer_id == customer && &l.product_id == product)
        {
            line.quantity += quantity;
            return Ok(line.clone());
        }

        let line = CartLine {
            id: CartLineId::new(),
            customer_id: customer,
            product_id: product.clone(),
            quantity,
            added_at: Utc::now(),
        };
        state.cart.push(line.clone());
        Ok(line)
    }

    async fn set_cart_line_quantity(&self, line: CartLineId, quantity: u32) -> Result<()> {
        let mut state = self.state.write().await;
        if let Some(l) = state.cart.iter_mut().find(|l| l.id == line) {
            l.quantity = quantity;
        }
        Ok(())
    }

    async fn delete_cart_line(&self, line: CartLineId) -> Result<()> {
        let mut state = self.state.write().await;
        state.cart.retain(|l| l.id != line);
        Ok(())
    }

    async fn clear_cart(&self, customer: CustomerId) -> Result<()> {
        let mut state = self.state.write().await;
        state.cart.retain(|l| l.customer_id != customer);
        Ok(())
    }

    async fn cart_view(&self, customer: CustomerId) -> Result<Vec<CartItemView>> {
        let state = self.state.read().await;
        let mut views: Vec<_> = state
            .cart
            .iter()
            .filter(|l| l.customer_id == customer)
            .filter_map(|l| view_for(&state, l))
            .collect();
        views.sort_by(|a, b| b.added_at.cmp(&a.added_at));
        Ok(views)
    }

    async fn cart_total(&self, customer: CustomerId) -> Result<Money> {
        let state = self.state.read().await;
        let total = state
            .cart
            .iter()
            .filter(|l| l.customer_id == customer)
            .filter_map(|l| {
                state
                    .products
                    .get(&l.product_id)
                    .map(|p| p.unit_price.multiply(l.quantity))
            })
            .sum();
        Ok(total)
    }

    async fn commit_checkout(
        &self,
        order: &Order,
        items: &[OrderItem],
        notification: NewNotification,
    ) -> Result<()> {
        let mut state = self.state.write().await;

        if state.orders.contains_key(&order.id) {
            return Err(StoreError::duplicate("order", order.id));
        }
        if state
            .orders
            .values()
            .any(|o| o.order_number == order.order_number)
        {
            return Err(StoreError::duplicate("order_number", &order.order_number));
        }

        // Conditional decrement per item; restore everything applied so far
        // if any product comes up short.
        let mut applied: Vec<(ProductId, u32)> = Vec::with_capacity(items.len());
        for item in items {
            let decremented = match state.products.get_mut(&item.product_id) {
                Some(p) if p.stock_quantity >= item.quantity => {
                    p.stock_quantity -= item.quantity;
                    true
                }
                _ => false,
            };

            if decremented {
                applied.push((item.product_id.clone(), item.quantity));
            } else {
                for (product_id, quantity) in applied {
                    if let Some(p) = state.products.get_mut(&product_id) {
                        p.stock_quantity += quantity;
                    }
                }
                return Err(StoreError::StockConflict {
                    product_id: item.product_id.clone(),
                });
            }
        }

        state.orders.insert(order.id, order.clone());
        state.order_items.insert(order.id, items.to_vec());
        state.notifications.push(notification.into_notification());
        state.cart.retain(|l| l.customer_id != order.customer_id);

        Ok(())
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<(Order, Vec<OrderItem>)>> {
        let state = self.state.read().await;
        Ok(state.orders.get(&id).map(|order| {
            let items = state.order_items.get(&id).cloned().unwrap_or_default();
            (order.clone(), items)
        }))
    }

    async fn find_order_by_number(&self, order_number: &str) -> Result<Option<Order>> {
        let state = self.state.read().await;
        Ok(state
            .orders
            .values()
            .find(|o| o.order_number == order_number)
            .cloned())
    }

    async fn orders_for_customer(
        &self,
        customer: CustomerId,
        limit: Option<i64>,
    ) -> Result<Vec<Order>> {
        let state = self.state.read().await;
        let mut orders: Vec<_> = state
            .orders
            .values()
            .filter(|o| o.customer_id == customer)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        if let Some(limit) = limit {
            orders.truncate(limit as usize);
        }
        Ok(orders)
    }

    async fn list_orders(
        &self,
        status: Option<OrderStatus>,
        limit: Option<i64>,
    ) -> Result<Vec<Order>> {
        let state = self.state.read().await;
        let mut orders: Vec<_> = state
            .orders
            .values()
            .filter(|o| status.is_none_or(|s| o.status == s))
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        if let Some(limit) = limit {
            orders.truncate(limit as usize);
        }
        Ok(orders)
    }

    async fn transition_order(
        &self,
        id: OrderId,
        update: StatusUpdate,
        notification: Option<NewNotification>,
    ) -> Result<Order> {
        let mut state = self.state.write().await;
        let order = state
            .orders
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("order", id))?;

        order.status = update.status;
        if let Some(confirmed_at) = update.confirmed_at {
            order.confirmed_at = Some(confirmed_at);
        }
        if let Some(delivered_at) = update.delivered_at {
            order.delivered_at = Some(delivered_at);
        }
        let updated = order.clone();

        if let Some(notification) = notification {
            state.notifications.push(notification.into_notification());
        }

        Ok(updated)
    }

    async fn notifications_for(
        &self,
        customer: CustomerId,
        unread_only: bool,
        limit: i64,
    ) -> Result<Vec<Notification>> {
        let state = self.state.read().await;
        let mut notifications: Vec<_> = state
            .notifications
            .iter()
            .filter(|n| n.customer_id == customer)
            .filter(|n| !unread_only || !n.is_read)
            .cloned()
            .collect();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        notifications.truncate(limit as usize);
        Ok(notifications)
    }

    async fn mark_notification_read(&self, id: NotificationId) -> Result<()> {
        let mut state = self.state.write().await;
        if let Some(n) = state.notifications.iter_mut().find(|n| n.id == id) {
            n.is_read = true;
        }
        Ok(())
    }

    async fn unread_count(&self, customer: CustomerId) -> Result<u64> {
        let state = self.state.read().await;
        Ok(state
            .notifications
            .iter()
            .filter(|n| n.customer_id == customer && !n.is_read)
            .count() as u64)
    }
}
