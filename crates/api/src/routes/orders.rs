//! Order lookup and fulfillment endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use common::{CustomerId, OrderId};
use domain::{Order, OrderItem};
use serde::{Deserialize, Serialize};
use store::StorefrontStore;

use super::{AppState, parse_uuid};
use crate::error::ApiError;

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub customer_id: String,
    pub order_number: String,
    pub total_cents: i64,
    pub discount_cents: i64,
    pub final_cents: i64,
    pub payment_method: String,
    pub payment_status: String,
    pub status: String,
    pub delivery_address: String,
    pub delivery_phone: String,
    pub order_date: String,
    pub confirmed_at: Option<String>,
    pub delivered_at: Option<String>,
    pub items: Vec<OrderItemResponse>,
}

#[derive(Serialize)]
pub struct OrderItemResponse {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
    pub subtotal_cents: i64,
}

impl OrderResponse {
    fn from_order(order: Order, items: Vec<OrderItem>) -> Self {
        Self {
            id: order.id.to_string(),
            customer_id: order.customer_id.to_string(),
            order_number: order.order_number,
            total_cents: order.total_amount.cents(),
            discount_cents: order.discount_amount.cents(),
            final_cents: order.final_amount.cents(),
            payment_method: order.payment_method.to_string(),
            payment_status: order.payment_status.to_string(),
            status: order.status.to_string(),
            delivery_address: order.delivery_address,
            delivery_phone: order.delivery_phone,
            order_date: order.order_date.to_rfc3339(),
            confirmed_at: order.confirmed_at.map(|t| t.to_rfc3339()),
            delivered_at: order.delivered_at.map(|t| t.to_rfc3339()),
            items: items
                .into_iter()
                .map(|item| OrderItemResponse {
                    product_id: item.product_id.to_string(),
                    product_name: item.product_name,
                    quantity: item.quantity,
                    unit_price_cents: item.unit_price.cents(),
                    subtotal_cents: item.subtotal.cents(),
                })
                .collect(),
        }
    }

    fn summary(order: Order) -> Self {
        Self::from_order(order, Vec::new())
    }
}

/// GET /orders/:id — an order with its line items.
#[tracing::instrument(skip(state))]
pub async fn get<S: StorefrontStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = OrderId::from_uuid(parse_uuid(&id)?);
    let (order, items) = state.orders.order_details(order_id).await?;
    Ok(Json(OrderResponse::from_order(order, items)))
}

#[derive(Deserialize)]
pub struct ListOrdersQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

/// GET /orders — all orders (admin), newest first.
#[tracing::instrument(skip(state, query))]
pub async fn list<S: StorefrontStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = state
        .orders
        .list_orders(query.status.as_deref(), query.limit)
        .await?;
    Ok(Json(orders.into_iter().map(OrderResponse::summary).collect()))
}

/// GET /customers/:id/orders — a customer's order history.
#[tracing::instrument(skip(state, query))]
pub async fn for_customer<S: StorefrontStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let customer = CustomerId::from_uuid(parse_uuid(&id)?);
    let orders = state
        .orders
        .orders_for_customer(customer, query.limit)
        .await?;
    Ok(Json(orders.into_iter().map(OrderResponse::summary).collect()))
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

/// POST /orders/:id/status — set an order's status.
#[tracing::instrument(skip(state, req))]
pub async fn update_status<S: StorefrontStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = OrderId::from_uuid(parse_uuid(&id)?);
    let order = state.orders.update_status(order_id, &req.status).await?;
    Ok(Json(OrderResponse::summary(order)))
}
