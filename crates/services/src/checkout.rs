//! The checkout workflow: converting a cart into a durable order.
//!
//! This is the one path in the system with multi-entity consistency
//! requirements. Everything read is read once; everything written is
//! written in a single unit of work.

use chrono::{DateTime, Utc};
use common::{CustomerId, Money, OrderId};
use domain::{
    NewNotification, NotificationKind, Order, OrderItem, OrderStatus, PaymentMethod,
    PaymentStatus,
};
use store::StorefrontStore;
use uuid::Uuid;

use crate::{Result, ServiceError};

/// Input to [`CheckoutService::place_order`].
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub customer_id: CustomerId,
    pub delivery_address: String,
    pub delivery_phone: String,
    pub payment_method: PaymentMethod,
}

/// What the customer gets back from a successful checkout.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CheckoutReceipt {
    pub order_id: OrderId,
    pub order_number: String,
    pub total_amount: Money,
    pub final_amount: Money,
}

/// Orchestrates cart-to-order conversion with all-or-nothing semantics
/// across stock, order, notification, and cart state.
pub struct CheckoutService<S> {
    store: S,
}

impl<S: StorefrontStore> CheckoutService<S> {
    /// Creates a new checkout service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Places an order from the customer's cart.
    ///
    /// Reads the cart once and validates every line against current stock
    /// before any write. Totals, snapshots, and the notification message
    /// all derive from that single read. The commit itself re-checks stock
    /// per product with a conditional decrement, so a competing checkout
    /// between validation and commit aborts this order instead of
    /// overselling; nothing is visible from an aborted commit.
    #[tracing::instrument(skip(self, request), fields(customer_id = %request.customer_id))]
    pub async fn place_order(&self, request: CheckoutRequest) -> Result<CheckoutReceipt> {
        metrics::counter!("checkout_attempts_total").increment(1);
        let started = std::time::Instant::now();

        let lines = self.store.cart_view(request.customer_id).await?;
        if lines.is_empty() {
            return Err(ServiceError::EmptyCart);
        }

        // Whole-cart validation pass: no line may exceed stock, and no
        // write happens until every line has been checked.
        for line in &lines {
            if line.stock_quantity < line.quantity {
                return Err(ServiceError::InsufficientStock {
                    product_id: line.product_id.clone(),
                });
            }
        }

        let total_amount: Money = lines.iter().map(|l| l.subtotal).sum();
        // No discount engine is wired into this path; the field is
        // tracked but stays zero.
        let discount_amount = Money::zero();
        let final_amount = total_amount;

        let now = Utc::now();
        let order = Order {
            id: OrderId::new(),
            customer_id: request.customer_id,
            order_number: generate_order_number(now),
            total_amount,
            discount_amount,
            final_amount,
            payment_method: request.payment_method,
            payment_status: PaymentStatus::Pending,
            status: OrderStatus::Pending,
            delivery_address: request.delivery_address,
            delivery_phone: request.delivery_phone,
            order_date: now,
            confirmed_at: None,
            delivered_at: None,
        };

        let items: Vec<OrderItem> = lines
            .iter()
            .map(|line| {
                OrderItem::snapshot(
                    order.id,
                    line.product_id.clone(),
                    line.product_name.clone(),
                    line.quantity,
                    line.unit_price,
                )
            })
            .collect();

        let notification = NewNotification::new(
            request.customer_id,
            NotificationKind::OrderPlaced,
            "Order Placed Successfully!",
            format!(
                "Your order {} has been placed successfully. Total: {}",
                order.order_number, final_amount
            ),
            Some(order.id),
        );

        self.store
            .commit_checkout(&order, &items, notification)
            .await?;

        metrics::counter!("checkout_success_total").increment(1);
        metrics::histogram!("checkout_duration_seconds").record(started.elapsed().as_secs_f64());
        tracing::info!(order_number = %order.order_number, total = %final_amount, "order placed");

        Ok(CheckoutReceipt {
            order_id: order.id,
            order_number: order.order_number,
            total_amount,
            final_amount,
        })
    }
}

/// Generates a human-readable order number: a dense timestamp plus a short
/// random suffix so that two checkouts within the same second cannot
/// collide.
fn generate_order_number(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("ORD-{}-{}", now.format("%Y%m%d%H%M%S"), &suffix[..4])
}
