//! Shared types used across the storefront crates.
//!
//! Typed identifiers prevent mixing up the various UUID-keyed entities,
//! and [`Money`] keeps all price arithmetic in integer cents.

mod ids;
mod money;

pub use ids::{CartLineId, CategoryId, CustomerId, NotificationId, OrderId, ProductId};
pub use money::Money;
