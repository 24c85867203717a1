//! Order lookups and status transitions (staff fulfillment desk).

use std::str::FromStr;

use chrono::Utc;
use common::{CustomerId, OrderId};
use domain::{NewNotification, NotificationKind, Order, OrderItem, OrderStatus};
use store::{StatusUpdate, StorefrontStore};

use crate::{Result, ServiceError};

/// Staff-facing order operations: lookups and status transitions.
pub struct OrderDesk<S> {
    store: S,
}

impl<S: StorefrontStore> OrderDesk<S> {
    /// Creates a new order desk over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Sets an order's status from its string form.
    ///
    /// Unknown statuses fail with `InvalidStatus`. The write is
    /// unconditional: transitions are not restricted to the nominal
    /// progression. Entering `confirmed` or `delivered` stamps the
    /// matching timestamp, and the four forward statuses each produce one
    /// customer notification; `pending` and `cancelled` are silent.
    #[tracing::instrument(skip(self))]
    pub async fn update_status(&self, order_id: OrderId, new_status: &str) -> Result<Order> {
        let status = OrderStatus::from_str(new_status).map_err(|e| ServiceError::InvalidStatus {
            status: e.0,
        })?;

        let (order, _) = self
            .store
            .get_order(order_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("order", order_id))?;

        let notification = status.notification_kind().map(|kind| {
            let (title, message) = status_message(kind, &order.order_number);
            NewNotification::new(order.customer_id, kind, title, message, Some(order_id))
        });

        let updated = self
            .store
            .transition_order(order_id, StatusUpdate::entering(status, Utc::now()), notification)
            .await?;

        tracing::info!(order_number = %updated.order_number, status = %updated.status, "order status updated");
        Ok(updated)
    }

    /// An order with its line items.
    pub async fn order_details(&self, order_id: OrderId) -> Result<(Order, Vec<OrderItem>)> {
        self.store
            .get_order(order_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("order", order_id))
    }

    /// A customer's order history, newest first.
    pub async fn orders_for_customer(
        &self,
        customer: CustomerId,
        limit: Option<i64>,
    ) -> Result<Vec<Order>> {
        Ok(self.store.orders_for_customer(customer, limit).await?)
    }

    /// All orders, newest first, optionally filtered by status string.
    pub async fn list_orders(
        &self,
        status: Option<&str>,
        limit: Option<i64>,
    ) -> Result<Vec<Order>> {
        let status = status
            .map(|s| {
                OrderStatus::from_str(s)
                    .map_err(|e| ServiceError::InvalidStatus { status: e.0 })
            })
            .transpose()?;
        Ok(self.store.list_orders(status, limit).await?)
    }
}

fn status_message(kind: NotificationKind, order_number: &str) -> (String, String) {
    match kind {
        NotificationKind::OrderConfirmed => (
            "Order Confirmed".to_string(),
            format!("Your order {order_number} has been confirmed!"),
        ),
        NotificationKind::OrderProcessing => (
            "Order Processing".to_string(),
            format!("Your order {order_number} is being processed."),
        ),
        NotificationKind::OrderShipped => (
            "Order Shipped".to_string(),
            format!("Your order {order_number} has been shipped!"),
        ),
        NotificationKind::OrderDelivered => (
            "Order Delivered".to_string(),
            format!("Your order {order_number} has been delivered. Thank you!"),
        ),
        NotificationKind::OrderPlaced => (
            "Order Placed Successfully!".to_string(),
            format!("Your order {order_number} has been placed successfully."),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_messages_carry_the_order_number() {
        let (title, message) = status_message(NotificationKind::OrderShipped, "ORD-42");
        assert_eq!(title, "Order Shipped");
        assert!(message.contains("ORD-42"));
    }
}
