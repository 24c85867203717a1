//! Products and categories.

use chrono::NaiveDate;
use common::{CategoryId, Money, ProductId};
use serde::{Deserialize, Serialize};

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub icon: Option<String>,
}

/// A sellable product.
///
/// `stock_quantity` is the single scalar source of truth for sellable
/// units; it is decremented by checkout and adjusted by admin restocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category_id: CategoryId,
    pub description: String,
    pub image_ref: Option<String>,
    pub unit_price: Money,
    /// Sales unit, e.g. "kg" or "pcs".
    pub unit: String,
    pub stock_quantity: u32,
    pub min_stock_level: u32,
    /// Percentage discount (0-100) applied at catalog display time only.
    pub discount_percent: u8,
    pub is_available: bool,
    pub manufactured_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
}

impl Product {
    /// Returns the display price with the product discount applied.
    ///
    /// Cart subtotals and order totals use the raw `unit_price`; this
    /// exists only for catalog display.
    pub fn discounted_unit_price(&self) -> Money {
        self.unit_price.discounted(self.discount_percent)
    }

    /// Returns true if stock has fallen to or below the minimum level.
    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity <= self.min_stock_level
    }
}

/// Fields for creating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub id: ProductId,
    pub name: String,
    pub category_id: CategoryId,
    #[serde(default)]
    pub description: String,
    pub image_ref: Option<String>,
    pub unit_price: Money,
    pub unit: String,
    pub stock_quantity: u32,
    #[serde(default = "default_min_stock_level")]
    pub min_stock_level: u32,
    #[serde(default)]
    pub discount_percent: u8,
    pub manufactured_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
}

fn default_min_stock_level() -> u32 {
    5
}

impl NewProduct {
    /// Builds the stored product; new products start available.
    pub fn into_product(self) -> Product {
        Product {
            id: self.id,
            name: self.name,
            category_id: self.category_id,
            description: self.description,
            image_ref: self.image_ref,
            unit_price: self.unit_price,
            unit: self.unit,
            stock_quantity: self.stock_quantity,
            min_stock_level: self.min_stock_level,
            discount_percent: self.discount_percent,
            is_available: true,
            manufactured_date: self.manufactured_date,
            expiry_date: self.expiry_date,
        }
    }
}

/// Field-mapped product update (admin edit).
#[derive(Debug, Clone, Deserialize)]
pub struct ProductUpdate {
    pub name: String,
    pub category_id: CategoryId,
    #[serde(default)]
    pub description: String,
    pub image_ref: Option<String>,
    pub unit_price: Money,
    pub unit: String,
    pub stock_quantity: u32,
    pub min_stock_level: u32,
    #[serde(default)]
    pub discount_percent: u8,
}
