//! End-to-end tests for the cart -> order workflow over the in-memory
//! store.

use std::sync::Arc;

use common::{CategoryId, CustomerId, Money, ProductId};
use domain::{NewProduct, NotificationKind, OrderStatus, PaymentMethod, ProductUpdate};
use services::{
    CartService, CatalogService, CheckoutRequest, CheckoutService, NotificationService,
    OrderDesk, ServiceError,
};
use store::MemoryStore;

struct Harness {
    store: MemoryStore,
    catalog: CatalogService<MemoryStore>,
    cart: CartService<MemoryStore>,
    checkout: CheckoutService<MemoryStore>,
    orders: OrderDesk<MemoryStore>,
    notifications: NotificationService<MemoryStore>,
}

fn harness() -> Harness {
    let store = MemoryStore::new();
    Harness {
        catalog: CatalogService::new(store.clone()),
        cart: CartService::new(store.clone()),
        checkout: CheckoutService::new(store.clone()),
        orders: OrderDesk::new(store.clone()),
        notifications: NotificationService::new(store.clone()),
        store,
    }
}

fn new_product(id: &str, stock: u32, price_cents: i64) -> NewProduct {
    NewProduct {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        category_id: CategoryId::new(),
        description: String::new(),
        image_ref: None,
        unit_price: Money::from_cents(price_cents),
        unit: "pcs".to_string(),
        stock_quantity: stock,
        min_stock_level: 0,
        discount_percent: 0,
        manufactured_date: None,
        expiry_date: None,
    }
}

fn checkout_request(customer: CustomerId) -> CheckoutRequest {
    CheckoutRequest {
        customer_id: customer,
        delivery_address: "1 Main St".to_string(),
        delivery_phone: "555-0100".to_string(),
        payment_method: PaymentMethod::Cash,
    }
}

#[tokio::test]
async fn successful_checkout_moves_everything_together() {
    let h = harness();
    let customer = CustomerId::new();

    // Product A: stock 5 at $10.00, qty 3. Product B: stock 2 at $4.00, qty 2.
    let a = h.catalog.add_product(new_product("SKU-A", 5, 1000)).await.unwrap();
    let b = h.catalog.add_product(new_product("SKU-B", 2, 400)).await.unwrap();
    h.cart.add_item(customer, &a.id, 3).await.unwrap();
    h.cart.add_item(customer, &b.id, 2).await.unwrap();

    let receipt = h.checkout.place_order(checkout_request(customer)).await.unwrap();

    assert_eq!(receipt.total_amount.cents(), 3800);
    assert_eq!(receipt.final_amount.cents(), 3800);
    assert!(receipt.order_number.starts_with("ORD-"));

    assert_eq!(h.catalog.product_details(&a.id).await.unwrap().stock_quantity, 2);
    assert_eq!(h.catalog.product_details(&b.id).await.unwrap().stock_quantity, 0);
    assert!(h.cart.list_items(customer).await.unwrap().is_empty());

    let inbox = h.notifications.list(customer, false).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].kind, NotificationKind::OrderPlaced);
    assert!(inbox[0].message.contains(&receipt.order_number));
    assert!(inbox[0].message.contains("$38.00"));

    let (order, items) = h.orders.order_details(receipt.order_id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.order_number, receipt.order_number);
    assert!(order.discount_amount.is_zero());
    let item_total: Money = items.iter().map(|i| i.subtotal).sum();
    assert_eq!(item_total, order.final_amount);
}

#[tokio::test]
async fn insufficient_stock_aborts_without_any_mutation() {
    let h = harness();
    let customer = CustomerId::new();

    let c = h.catalog.add_product(new_product("SKU-C", 1, 700)).await.unwrap();
    // The quantity-edit path does not re-check stock, so the cart can ask
    // for more than exists; checkout must catch it.
    let line = h.cart.add_item(customer, &c.id, 1).await.unwrap();
    h.cart.update_quantity(line.id, 5).await.unwrap();

    let err = h.checkout.place_order(checkout_request(customer)).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::InsufficientStock { ref product_id } if product_id == &c.id
    ));

    assert_eq!(h.catalog.product_details(&c.id).await.unwrap().stock_quantity, 1);
    let items = h.cart.list_items(customer).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 5);
    assert!(h.orders.orders_for_customer(customer, None).await.unwrap().is_empty());
    assert!(h.notifications.list(customer, false).await.unwrap().is_empty());
}

#[tokio::test]
async fn failing_line_leaves_earlier_lines_untouched() {
    let h = harness();
    let customer = CustomerId::new();

    let a = h.catalog.add_product(new_product("SKU-A", 5, 1000)).await.unwrap();
    let b = h.catalog.add_product(new_product("SKU-B", 1, 400)).await.unwrap();
    h.cart.add_item(customer, &a.id, 3).await.unwrap();
    let line_b = h.cart.add_item(customer, &b.id, 1).await.unwrap();
    h.cart.update_quantity(line_b.id, 4).await.unwrap();

    let err = h.checkout.place_order(checkout_request(customer)).await.unwrap_err();
    assert!(matches!(err, ServiceError::InsufficientStock { .. }));

    // Validation examines every line before any write, so A's stock is
    // exactly as it was.
    assert_eq!(h.catalog.product_details(&a.id).await.unwrap().stock_quantity, 5);
    assert_eq!(h.catalog.product_details(&b.id).await.unwrap().stock_quantity, 1);
    assert_eq!(h.cart.list_items(customer).await.unwrap().len(), 2);
}

#[tokio::test]
async fn empty_cart_checkout_touches_nothing() {
    let h = harness();
    let customer = CustomerId::new();

    let err = h.checkout.place_order(checkout_request(customer)).await.unwrap_err();
    assert!(matches!(err, ServiceError::EmptyCart));

    assert!(h.orders.orders_for_customer(customer, None).await.unwrap().is_empty());
    assert_eq!(h.store.notification_count().await, 0);
}

#[tokio::test]
async fn concurrent_checkouts_cannot_oversell() {
    let h = harness();
    let contended = h
        .catalog
        .add_product(new_product("SKU-HOT", 5, 1000))
        .await
        .unwrap();

    let alice = CustomerId::new();
    let bob = CustomerId::new();
    h.cart.add_item(alice, &contended.id, 4).await.unwrap();
    h.cart.add_item(bob, &contended.id, 3).await.unwrap();

    let checkout = Arc::new(CheckoutService::new(h.store.clone()));
    let a = tokio::spawn({
        let checkout = checkout.clone();
        async move { checkout.place_order(checkout_request(alice)).await }
    });
    let b = tokio::spawn({
        let checkout = checkout.clone();
        async move { checkout.place_order(checkout_request(bob)).await }
    });

    let results = [a.await.unwrap(), b.await.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();

    // 4 + 3 > 5: at most one checkout can win, and the loser sees
    // InsufficientStock, not a negative stock count.
    assert_eq!(successes, 1);
    for result in &results {
        if let Err(e) = result {
            assert!(matches!(e, ServiceError::InsufficientStock { .. }));
        }
    }

    let remaining = h
        .catalog
        .product_details(&contended.id)
        .await
        .unwrap()
        .stock_quantity;
    assert!(remaining == 1 || remaining == 2);
}

#[tokio::test]
async fn order_snapshots_survive_catalog_edits_and_deletion() {
    let h = harness();
    let customer = CustomerId::new();

    let p = h.catalog.add_product(new_product("SKU-P", 5, 1000)).await.unwrap();
    h.cart.add_item(customer, &p.id, 2).await.unwrap();
    let receipt = h.checkout.place_order(checkout_request(customer)).await.unwrap();

    h.catalog
        .update_product(
            &p.id,
            ProductUpdate {
                name: "Renamed Product".to_string(),
                category_id: p.category_id,
                description: String::new(),
                image_ref: None,
                unit_price: Money::from_cents(9999),
                unit: "pcs".to_string(),
                stock_quantity: 3,
                min_stock_level: 0,
                discount_percent: 50,
            },
        )
        .await
        .unwrap();
    h.catalog.delete_product(&p.id).await.unwrap();

    let (_, items) = h.orders.order_details(receipt.order_id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].product_name, "Product SKU-P");
    assert_eq!(items[0].unit_price.cents(), 1000);
    assert_eq!(items[0].subtotal.cents(), 2000);
}

#[tokio::test]
async fn status_updates_stamp_and_notify() {
    let h = harness();
    let customer = CustomerId::new();

    let p = h.catalog.add_product(new_product("SKU-P", 5, 1000)).await.unwrap();
    h.cart.add_item(customer, &p.id, 1).await.unwrap();
    let receipt = h.checkout.place_order(checkout_request(customer)).await.unwrap();
    let order_id = receipt.order_id;

    let confirmed = h.orders.update_status(order_id, "confirmed").await.unwrap();
    assert_eq!(confirmed.status, OrderStatus::Confirmed);
    assert!(confirmed.confirmed_at.is_some());
    assert!(confirmed.delivered_at.is_none());

    h.orders.update_status(order_id, "processing").await.unwrap();
    h.orders.update_status(order_id, "shipped").await.unwrap();
    let delivered = h.orders.update_status(order_id, "delivered").await.unwrap();
    assert!(delivered.delivered_at.is_some());
    assert!(delivered.confirmed_at.is_some());

    // order_placed + one per forward status.
    let inbox = h.notifications.list(customer, false).await.unwrap();
    assert_eq!(inbox.len(), 5);
    assert_eq!(inbox[0].kind, NotificationKind::OrderDelivered);
    assert!(inbox[0].message.ends_with("Thank you!"));

    // Cancelling is silent.
    h.orders.update_status(order_id, "cancelled").await.unwrap();
    assert_eq!(h.notifications.list(customer, false).await.unwrap().len(), 5);

    let err = h.orders.update_status(order_id, "refunded").await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidStatus { .. }));
}

#[tokio::test]
async fn notification_inbox_caps_and_marks_read() {
    let h = harness();
    let customer = CustomerId::new();

    let p = h.catalog.add_product(new_product("SKU-P", 100, 100)).await.unwrap();
    for _ in 0..4 {
        h.cart.add_item(customer, &p.id, 1).await.unwrap();
        h.checkout.place_order(checkout_request(customer)).await.unwrap();
    }

    let capped = NotificationService::with_limit(h.store.clone(), 2);
    assert_eq!(capped.list(customer, false).await.unwrap().len(), 2);
    assert_eq!(h.notifications.list(customer, false).await.unwrap().len(), 4);

    assert_eq!(h.notifications.unread_count(customer).await.unwrap(), 4);
    let first = h.notifications.list(customer, false).await.unwrap()[0].id;
    h.notifications.mark_read(first).await.unwrap();
    h.notifications.mark_read(first).await.unwrap();
    assert_eq!(h.notifications.unread_count(customer).await.unwrap(), 3);
    assert_eq!(h.notifications.list(customer, true).await.unwrap().len(), 3);
}

#[tokio::test]
async fn listing_orders_filters_by_status() {
    let h = harness();
    let customer = CustomerId::new();

    let p = h.catalog.add_product(new_product("SKU-P", 10, 100)).await.unwrap();
    h.cart.add_item(customer, &p.id, 1).await.unwrap();
    let first = h.checkout.place_order(checkout_request(customer)).await.unwrap();
    h.cart.add_item(customer, &p.id, 1).await.unwrap();
    h.checkout.place_order(checkout_request(customer)).await.unwrap();

    h.orders.update_status(first.order_id, "shipped").await.unwrap();

    assert_eq!(h.orders.list_orders(None, None).await.unwrap().len(), 2);
    let shipped = h.orders.list_orders(Some("shipped"), None).await.unwrap();
    assert_eq!(shipped.len(), 1);
    assert_eq!(shipped[0].id, first.order_id);

    let err = h.orders.list_orders(Some("bogus"), None).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidStatus { .. }));
}
