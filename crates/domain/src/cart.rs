//! Shopping cart lines and the joined cart view.

use chrono::{DateTime, Utc};
use common::{CartLineId, CustomerId, Money, ProductId};
use serde::{Deserialize, Serialize};

/// One line of pending purchase intent: a (customer, product, quantity)
/// pairing. Unique per (customer, product); adding the same product again
/// merges into the existing line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: CartLineId,
    pub customer_id: CustomerId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub added_at: DateTime<Utc>,
}

/// A cart line joined with the current catalog record, as rendered to the
/// customer. `subtotal` is `unit_price * quantity` — the product discount
/// is deliberately not applied here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItemView {
    pub line_id: CartLineId,
    pub product_id: ProductId,
    pub product_name: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub subtotal: Money,
    pub stock_quantity: u32,
    pub discount_percent: u8,
    pub added_at: DateTime<Utc>,
}

impl CartItemView {
    /// Joins a cart line with its product fields.
    pub fn from_line(
        line: &CartLine,
        product_name: impl Into<String>,
        unit_price: Money,
        stock_quantity: u32,
        discount_percent: u8,
    ) -> Self {
        Self {
            line_id: line.id,
            product_id: line.product_id.clone(),
            product_name: product_name.into(),
            unit_price,
            quantity: line.quantity,
            subtotal: unit_price.multiply(line.quantity),
            stock_quantity,
            discount_percent,
            added_at: line.added_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_computes_subtotal_from_raw_price() {
        let line = CartLine {
            id: CartLineId::new(),
            customer_id: CustomerId::new(),
            product_id: ProductId::new("SKU-001"),
            quantity: 3,
            added_at: Utc::now(),
        };

        let view = CartItemView::from_line(&line, "Widget", Money::from_cents(1000), 10, 25);
        assert_eq!(view.subtotal.cents(), 3000);
        assert_eq!(view.quantity, 3);
        // Discount is carried for display but never folded into the subtotal.
        assert_eq!(view.discount_percent, 25);
    }
}
