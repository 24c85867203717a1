//! The per-customer notification inbox.

use common::{CustomerId, NotificationId};
use domain::Notification;
use store::StorefrontStore;

use crate::Result;

/// Default inbox listing cap.
pub const DEFAULT_NOTIFICATION_LIMIT: i64 = 50;

/// Read/acknowledge operations over a customer's inbox. Notifications are
/// only ever *created* by the checkout and order-desk workflows.
pub struct NotificationService<S> {
    store: S,
    limit: i64,
}

impl<S: StorefrontStore> NotificationService<S> {
    /// Creates a service with the default listing cap.
    pub fn new(store: S) -> Self {
        Self::with_limit(store, DEFAULT_NOTIFICATION_LIMIT)
    }

    /// Creates a service with a custom listing cap.
    pub fn with_limit(store: S, limit: i64) -> Self {
        Self { store, limit }
    }

    /// The customer's notifications, newest first, capped at the
    /// configured limit.
    pub async fn list(&self, customer: CustomerId, unread_only: bool) -> Result<Vec<Notification>> {
        Ok(self
            .store
            .notifications_for(customer, unread_only, self.limit)
            .await?)
    }

    /// Marks a notification read. Idempotent.
    #[tracing::instrument(skip(self))]
    pub async fn mark_read(&self, id: NotificationId) -> Result<()> {
        Ok(self.store.mark_notification_read(id).await?)
    }

    /// Number of unread notifications (inbox badge).
    pub async fn unread_count(&self, customer: CustomerId) -> Result<u64> {
        Ok(self.store.unread_count(customer).await?)
    }
}
