//! Customer notifications generated by order-lifecycle events.

use chrono::{DateTime, Utc};
use common::{CustomerId, NotificationId, OrderId};
use serde::{Deserialize, Serialize};

/// The system event a notification announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    OrderPlaced,
    OrderConfirmed,
    OrderProcessing,
    OrderShipped,
    OrderDelivered,
}

impl NotificationKind {
    /// Returns the kind tag as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::OrderPlaced => "order_placed",
            NotificationKind::OrderConfirmed => "order_confirmed",
            NotificationKind::OrderProcessing => "order_processing",
            NotificationKind::OrderShipped => "order_shipped",
            NotificationKind::OrderDelivered => "order_delivered",
        }
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "order_placed" => Ok(NotificationKind::OrderPlaced),
            "order_confirmed" => Ok(NotificationKind::OrderConfirmed),
            "order_processing" => Ok(NotificationKind::OrderProcessing),
            "order_shipped" => Ok(NotificationKind::OrderShipped),
            "order_delivered" => Ok(NotificationKind::OrderDelivered),
            other => Err(format!("unknown notification kind: {other}")),
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A message in a customer's inbox. The read flag transitions
/// false -> true once and never reverses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub customer_id: CustomerId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub order_id: Option<OrderId>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields for inserting a notification; the store assigns the identifier
/// and creation timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub customer_id: CustomerId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub order_id: Option<OrderId>,
}

impl NewNotification {
    pub fn new(
        customer_id: CustomerId,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        order_id: Option<OrderId>,
    ) -> Self {
        Self {
            customer_id,
            kind,
            title: title.into(),
            message: message.into(),
            order_id,
        }
    }

    /// Materializes the stored notification.
    pub fn into_notification(self) -> Notification {
        Notification {
            id: NotificationId::new(),
            customer_id: self.customer_id,
            kind: self.kind,
            title: self.title,
            message: self.message,
            order_id: self.order_id,
            is_read: false,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn kind_roundtrips_through_strings() {
        for kind in [
            NotificationKind::OrderPlaced,
            NotificationKind::OrderConfirmed,
            NotificationKind::OrderProcessing,
            NotificationKind::OrderShipped,
            NotificationKind::OrderDelivered,
        ] {
            assert_eq!(NotificationKind::from_str(kind.as_str()).unwrap(), kind);
        }
    }

    #[test]
    fn new_notification_starts_unread() {
        let customer = CustomerId::new();
        let notification = NewNotification::new(
            customer,
            NotificationKind::OrderPlaced,
            "Order Placed Successfully!",
            "Your order ORD-1 has been placed successfully.",
            None,
        )
        .into_notification();

        assert!(!notification.is_read);
        assert_eq!(notification.customer_id, customer);
        assert_eq!(notification.kind, NotificationKind::OrderPlaced);
    }
}
