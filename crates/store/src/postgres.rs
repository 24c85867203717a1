use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use common::{CartLineId, CategoryId, CustomerId, Money, NotificationId, OrderId, ProductId};
use domain::{
    CartItemView, CartLine, Category, NewNotification, Notification, NotificationKind, Order,
    OrderItem, OrderStatus, PaymentMethod, PaymentStatus, Product, ProductUpdate,
};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::store::{StatusUpdate, StorefrontStore};
use crate::{Result, StoreError};

/// PostgreSQL-backed store implementation.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

const ORDER_COLUMNS: &str = "id, customer_id, order_number, total_amount, discount_amount, \
     final_amount, payment_method, payment_status, order_status, delivery_address, \
     delivery_phone, order_date, confirmed_at, delivered_at";

const PRODUCT_COLUMNS: &str = "id, name, category_id, description, image_ref, unit_price, unit, \
     stock_quantity, min_stock_level, discount_percent, is_available, manufactured_date, \
     expiry_date";

impl PgStore {
    /// Creates a new PostgreSQL store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_product(row: PgRow) -> Result<Product> {
        Ok(Product {
            id: ProductId::new(row.try_get::<String, _>("id")?),
            name: row.try_get("name")?,
            category_id: CategoryId::from_uuid(row.try_get::<Uuid, _>("category_id")?),
            description: row.try_get("description")?,
            image_ref: row.try_get("image_ref")?,
            unit_price: Money::from_cents(row.try_get("unit_price")?),
            unit: row.try_get("unit")?,
            stock_quantity: row.try_get::<i32, _>("stock_quantity")? as u32,
            min_stock_level: row.try_get::<i32, _>("min_stock_level")? as u32,
            discount_percent: row.try_get::<i16, _>("discount_percent")? as u8,
            is_available: row.try_get("is_available")?,
            manufactured_date: row.try_get::<Option<NaiveDate>, _>("manufactured_date")?,
            expiry_date: row.try_get::<Option<NaiveDate>, _>("expiry_date")?,
        })
    }

    fn row_to_cart_line(row: PgRow) -> Result<CartLine> {
        Ok(CartLine {
            id: CartLineId::from_uuid(row.try_get::<Uuid, _>("id")?),
            customer_id: CustomerId::from_uuid(row.try_get::<Uuid, _>("customer_id")?),
            product_id: ProductId::new(row.try_get::<String, _>("product_id")?),
            quantity: row.try_get::<i32, _>("quantity")? as u32,
            added_at: row.try_get("added_at")?,
        })
    }

    fn row_to_order(row: PgRow) -> Result<Order> {
        let payment_method: String = row.try_get("payment_method")?;
        let payment_status: String = row.try_get("payment_status")?;
        let order_status: String = row.try_get("order_status")?;

        Ok(Order {
            id: OrderId::from_uuid(row.try_get::<Uuid, _>("id")?),
            customer_id: CustomerId::from_uuid(row.try_get::<Uuid, _>("customer_id")?),
            order_number: row.try_get("order_number")?,
            total_amount: Money::from_cents(row.try_get("total_amount")?),
            discount_amount: Money::from_cents(row.try_get("discount_amount")?),
            final_amount: Money::from_cents(row.try_get("final_amount")?),
            payment_method: PaymentMethod::from_str(&payment_method)
                .map_err(|e| StoreError::Decode(e.to_string()))?,
            payment_status: parse_payment_status(&payment_status)?,
            status: OrderStatus::from_str(&order_status)
                .map_err(|e| StoreError::Decode(e.to_string()))?,
            delivery_address: row.try_get("delivery_address")?,
            delivery_phone: row.try_get("delivery_phone")?,
            order_date: row.try_get("order_date")?,
            confirmed_at: row.try_get::<Option<DateTime<Utc>>, _>("confirmed_at")?,
            delivered_at: row.try_get::<Option<DateTime<Utc>>, _>("delivered_at")?,
        })
    }

    fn row_to_order_item(row: PgRow) -> Result<OrderItem> {
        Ok(OrderItem {
            order_id: OrderId::from_uuid(row.try_get::<Uuid, _>("order_id")?),
            product_id: ProductId::new(row.try_get::<String, _>("product_id")?),
            product_name: row.try_get("product_name")?,
            quantity: row.try_get::<i32, _>("quantity")? as u32,
            unit_price: Money::from_cents(row.try_get("unit_price")?),
            subtotal: Money::from_cents(row.try_get("subtotal")?),
        })
    }

    fn row_to_notification(row: PgRow) -> Result<Notification> {
        let kind: String = row.try_get("kind")?;
        Ok(Notification {
            id: NotificationId::from_uuid(row.try_get::<Uuid, _>("id")?),
            customer_id: CustomerId::from_uuid(row.try_get::<Uuid, _>("customer_id")?),
            kind: NotificationKind::from_str(&kind).map_err(StoreError::Decode)?,
            title: row.try_get("title")?,
            message: row.try_get("message")?,
            order_id: row
                .try_get::<Option<Uuid>, _>("order_id")?
                .map(OrderId::from_uuid),
            is_read: row.try_get("is_read")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

fn parse_payment_status(s: &str) -> Result<PaymentStatus> {
    match s {
        "pending" => Ok(PaymentStatus::Pending),
        "paid" => Ok(PaymentStatus::Paid),
        "failed" => Ok(PaymentStatus::Failed),
        other => Err(StoreError::Decode(format!(
            "unknown payment status: {other}"
        ))),
    }
}

/// Inserts a materialized notification using the given executor.
async fn insert_notification<'e, E>(executor: E, notification: &Notification) -> Result<()>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO notifications (id, customer_id, kind, title, message, order_id, is_read, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(notification.id.as_uuid())
    .bind(notification.customer_id.as_uuid())
    .bind(notification.kind.as_str())
    .bind(&notification.title)
    .bind(&notification.message)
    .bind(notification.order_id.map(|id| id.as_uuid()))
    .bind(notification.is_read)
    .bind(notification.created_at)
    .execute(executor)
    .await?;
    Ok(())
}

#[async_trait]
impl StorefrontStore for PgStore {
    async fn insert_category(&self, category: Category) -> Result<()> {
        sqlx::query("INSERT INTO categories (id, name, icon) VALUES ($1, $2, $3)")
            .bind(category.id.as_uuid())
            .bind(&category.name)
            .bind(&category.icon)
            .execute(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, "category", category.id.to_string()))?;
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query("SELECT id, name, icon FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| {
                Ok(Category {
                    id: CategoryId::from_uuid(row.try_get::<Uuid, _>("id")?),
                    name: row.try_get("name")?,
                    icon: row.try_get("icon")?,
                })
            })
            .collect()
    }

    async fn insert_product(&self, product: Product) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, category_id, description, image_ref, unit_price,
                                  unit, stock_quantity, min_stock_level, discount_percent,
                                  is_available, manufactured_date, expiry_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(product.id.as_str())
        .bind(&product.name)
        .bind(product.category_id.as_uuid())
        .bind(&product.description)
        .bind(&product.image_ref)
        .bind(product.unit_price.cents())
        .bind(&product.unit)
        .bind(product.stock_quantity as i32)
        .bind(product.min_stock_level as i32)
        .bind(product.discount_percent as i16)
        .bind(product.is_available)
        .bind(product.manufactured_date)
        .bind(product.expiry_date)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "product", product.id.to_string()))?;
        Ok(())
    }

    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_product).transpose()
    }

    async fn update_product(&self, id: &ProductId, update: ProductUpdate) -> Result<Product> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE products
            SET name = $1, category_id = $2, description = $3, image_ref = $4,
                unit_price = $5, unit = $6, stock_quantity = $7, min_stock_level = $8,
                discount_percent = $9
            WHERE id = $10
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&update.name)
        .bind(update.category_id.as_uuid())
        .bind(&update.description)
        .bind(&update.image_ref)
        .bind(update.unit_price.cents())
        .bind(&update.unit)
        .bind(update.stock_quantity as i32)
        .bind(update.min_stock_level as i32)
        .bind(update.discount_percent as i16)
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::not_found("product", id))?;

        Self::row_to_product(row)
    }

    async fn delete_product(&self, id: &ProductId) -> Result<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("product", id));
        }
        Ok(())
    }

    async fn set_product_availability(&self, id: &ProductId, available: bool) -> Result<()> {
        let result = sqlx::query("UPDATE products SET is_available = $1 WHERE id = $2")
            .bind(available)
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("product", id));
        }
        Ok(())
    }

    async fn adjust_stock(&self, id: &ProductId, delta: i64) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock_quantity = stock_quantity + $1
            WHERE id = $2 AND stock_quantity + $1 >= 0
            "#,
        )
        .bind(delta as i32)
        .bind(id.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Distinguish a missing product from an underflow.
            if self.get_product(id).await?.is_none() {
                return Err(StoreError::not_found("product", id));
            }
            return Err(StoreError::StockConflict {
                product_id: id.clone(),
            });
        }
        Ok(())
    }

    async fn list_products(&self, category: Option<CategoryId>) -> Result<Vec<Product>> {
        let rows = match category {
            Some(category_id) => {
                sqlx::query(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products \
                     WHERE category_id = $1 AND is_available = TRUE ORDER BY name"
                ))
                .bind(category_id.as_uuid())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products \
                     WHERE is_available = TRUE ORDER BY name"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(Self::row_to_product).collect()
    }

    async fn search_products(&self, term: &str) -> Result<Vec<Product>> {
        let pattern = format!("%{term}%");
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE (name ILIKE $1 OR description ILIKE $1) AND is_available = TRUE \
             ORDER BY name"
        ))
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_product).collect()
    }

    async fn low_stock_products(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE stock_quantity <= min_stock_level ORDER BY stock_quantity"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_product).collect()
    }

    async fn find_cart_line(
        &self,
        customer: CustomerId,
        product: &ProductId,
    ) -> Result<Option<CartLine>> {
        let row = sqlx::query(
            "SELECT id, customer_id, product_id, quantity, added_at FROM shopping_cart \
             WHERE customer_id = $1 AND product_id = $2",
        )
        .bind(customer.as_uuid())
        .bind(product.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_cart_line).transpose()
    }

    async fn get_cart_line(&self, line: CartLineId) -> Result<Option<CartLine>> {
        let row = sqlx::query(
            "SELECT id, customer_id, product_id, quantity, added_at FROM shopping_cart \
             WHERE id = $1",
        )
        .bind(line.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_cart_line).transpose()
    }

    async fn upsert_cart_line(
        &self,
        customer: CustomerId,
        product: &ProductId,
        quantity: u32,
    ) -> Result<CartLine> {
        let row = sqlx::query(
            r#"
            INSERT INTO shopping_cart (id, customer_id, product_id, quantity, added_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (customer_id, product_id)
            DO UPDATE SET quantity = shopping_cart.quantity + EXCLUDED.quantity
            RETURNING id, customer_id, product_id, quantity, added_at
            "#,
        )
        .bind(CartLineId::new().as_uuid())
        .bind(customer.as_uuid())
        .bind(product.as_str())
        .bind(quantity as i32)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Self::row_to_cart_line(row)
    }

    async fn set_cart_line_quantity(&self, line: CartLineId, quantity: u32) -> Result<()> {
        sqlx::query("UPDATE shopping_cart SET quantity = $1 WHERE id = $2")
            .bind(quantity as i32)
            .bind(line.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_cart_line(&self, line: CartLineId) -> Result<()> {
        sqlx::query("DELETE FROM shopping_cart WHERE id = $1")
            .bind(line.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn clear_cart(&self, customer: CustomerId) -> Result<()> {
        sqlx::query("DELETE FROM shopping_cart WHERE customer_id = $1")
            .bind(customer.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn cart_view(&self, customer: CustomerId) -> Result<Vec<CartItemView>> {
        let rows = sqlx::query(
            r#"
            SELECT sc.id AS line_id, sc.product_id, p.name, p.unit_price, sc.quantity,
                   p.stock_quantity, p.discount_percent, sc.added_at
            FROM shopping_cart sc
            JOIN products p ON sc.product_id = p.id
            WHERE sc.customer_id = $1
            ORDER BY sc.added_at DESC
            "#,
        )
        .bind(customer.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let unit_price = Money::from_cents(row.try_get("unit_price")?);
                let quantity = row.try_get::<i32, _>("quantity")? as u32;
                Ok(CartItemView {
                    line_id: CartLineId::from_uuid(row.try_get::<Uuid, _>("line_id")?),
                    product_id: ProductId::new(row.try_get::<String, _>("product_id")?),
                    product_name: row.try_get("name")?,
                    unit_price,
                    quantity,
                    subtotal: unit_price.multiply(quantity),
                    stock_quantity: row.try_get::<i32, _>("stock_quantity")? as u32,
                    discount_percent: row.try_get::<i16, _>("discount_percent")? as u8,
                    added_at: row.try_get("added_at")?,
                })
            })
            .collect()
    }

    async fn cart_total(&self, customer: CustomerId) -> Result<Money> {
        let total: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT SUM(p.unit_price * sc.quantity)
            FROM shopping_cart sc
            JOIN products p ON sc.product_id = p.id
            WHERE sc.customer_id = $1
            "#,
        )
        .bind(customer.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(Money::from_cents(total.unwrap_or(0)))
    }

    #[tracing::instrument(skip(self, order, items, notification), fields(order_number = %order.order_number))]
    async fn commit_checkout(
        &self,
        order: &Order,
        items: &[OrderItem],
        notification: NewNotification,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        // Conditional decrement per product row; zero affected rows means
        // another checkout won the stock and the whole unit aborts. The
        // dropped transaction rolls back everything applied so far.
        for item in items {
            let result = sqlx::query(
                "UPDATE products SET stock_quantity = stock_quantity - $1 \
                 WHERE id = $2 AND stock_quantity >= $1",
            )
            .bind(item.quantity as i32)
            .bind(item.product_id.as_str())
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(StoreError::StockConflict {
                    product_id: item.product_id.clone(),
                });
            }
        }

        sqlx::query(&format!(
            r#"
            INSERT INTO orders ({ORDER_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#
        ))
        .bind(order.id.as_uuid())
        .bind(order.customer_id.as_uuid())
        .bind(&order.order_number)
        .bind(order.total_amount.cents())
        .bind(order.discount_amount.cents())
        .bind(order.final_amount.cents())
        .bind(order.payment_method.as_str())
        .bind(order.payment_status.as_str())
        .bind(order.status.as_str())
        .bind(&order.delivery_address)
        .bind(&order.delivery_phone)
        .bind(order.order_date)
        .bind(order.confirmed_at)
        .bind(order.delivered_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, "order_number", order.order_number.clone()))?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, product_id, product_name, quantity,
                                         unit_price, subtotal)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(item.order_id.as_uuid())
            .bind(item.product_id.as_str())
            .bind(&item.product_name)
            .bind(item.quantity as i32)
            .bind(item.unit_price.cents())
            .bind(item.subtotal.cents())
            .execute(&mut *tx)
            .await?;
        }

        insert_notification(&mut *tx, &notification.into_notification()).await?;

        sqlx::query("DELETE FROM shopping_cart WHERE customer_id = $1")
            .bind(order.customer_id.as_uuid())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<(Order, Vec<OrderItem>)>> {
        let row = sqlx::query(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let order = Self::row_to_order(row)?;

        let item_rows = sqlx::query(
            "SELECT order_id, product_id, product_name, quantity, unit_price, subtotal \
             FROM order_items WHERE order_id = $1",
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        let items = item_rows
            .into_iter()
            .map(Self::row_to_order_item)
            .collect::<Result<Vec<_>>>()?;

        Ok(Some((order, items)))
    }

    async fn find_order_by_number(&self, order_number: &str) -> Result<Option<Order>> {
        let row = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_number = $1"
        ))
        .bind(order_number)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_order).transpose()
    }

    async fn orders_for_customer(
        &self,
        customer: CustomerId,
        limit: Option<i64>,
    ) -> Result<Vec<Order>> {
        let rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE customer_id = $1 \
             ORDER BY order_date DESC LIMIT $2"
        ))
        .bind(customer.as_uuid())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_order).collect()
    }

    async fn list_orders(
        &self,
        status: Option<OrderStatus>,
        limit: Option<i64>,
    ) -> Result<Vec<Order>> {
        let rows = match status {
            Some(status) => {
                sqlx::query(&format!(
                    "SELECT {ORDER_COLUMNS} FROM orders WHERE order_status = $1 \
                     ORDER BY order_date DESC LIMIT $2"
                ))
                .bind(status.as_str())
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {ORDER_COLUMNS} FROM orders ORDER BY order_date DESC LIMIT $1"
                ))
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(Self::row_to_order).collect()
    }

    async fn transition_order(
        &self,
        id: OrderId,
        update: StatusUpdate,
        notification: Option<NewNotification>,
    ) -> Result<Order> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(&format!(
            r#"
            UPDATE orders
            SET order_status = $1,
                confirmed_at = COALESCE($2, confirmed_at),
                delivered_at = COALESCE($3, delivered_at)
            WHERE id = $4
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(update.status.as_str())
        .bind(update.confirmed_at)
        .bind(update.delivered_at)
        .bind(id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| StoreError::not_found("order", id))?;

        let order = Self::row_to_order(row)?;

        if let Some(notification) = notification {
            insert_notification(&mut *tx, &notification.into_notification()).await?;
        }

        tx.commit().await?;
        Ok(order)
    }

    async fn notifications_for(
        &self,
        customer: CustomerId,
        unread_only: bool,
        limit: i64,
    ) -> Result<Vec<Notification>> {
        let sql = if unread_only {
            "SELECT id, customer_id, kind, title, message, order_id, is_read, created_at \
             FROM notifications WHERE customer_id = $1 AND is_read = FALSE \
             ORDER BY created_at DESC LIMIT $2"
        } else {
            "SELECT id, customer_id, kind, title, message, order_id, is_read, created_at \
             FROM notifications WHERE customer_id = $1 \
             ORDER BY created_at DESC LIMIT $2"
        };

        let rows = sqlx::query(sql)
            .bind(customer.as_uuid())
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_notification).collect()
    }

    async fn mark_notification_read(&self, id: NotificationId) -> Result<()> {
        sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn unread_count(&self, customer: CustomerId) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE customer_id = $1 AND is_read = FALSE",
        )
        .bind(customer.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(count as u64)
    }
}

fn map_unique_violation(e: sqlx::Error, entity: &'static str, key: String) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return StoreError::Duplicate { entity, key };
    }
    StoreError::Database(e)
}
