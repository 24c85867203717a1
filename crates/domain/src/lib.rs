//! Domain entities for the grocery storefront.
//!
//! Everything here is plain data plus the small amount of logic that
//! belongs to it (status parsing, snapshot construction, display-time
//! discounting). Storage and workflow concerns live in the `store` and
//! `services` crates.

mod cart;
mod notification;
mod order;
mod product;

pub use cart::{CartItemView, CartLine};
pub use notification::{NewNotification, Notification, NotificationKind};
pub use order::{
    Order, OrderItem, OrderStatus, PaymentMethod, PaymentStatus, UnknownPaymentMethod,
    UnknownStatus,
};
pub use product::{Category, NewProduct, Product, ProductUpdate};
