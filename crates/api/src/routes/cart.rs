//! Cart and checkout endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::{CartLineId, CustomerId, ProductId};
use domain::{CartItemView, PaymentMethod};
use serde::{Deserialize, Serialize};
use services::payment;
use services::{CheckoutReceipt, CheckoutRequest};
use store::StorefrontStore;

use super::{AppState, parse_uuid};
use crate::error::ApiError;

#[derive(Serialize)]
pub struct CartResponse {
    pub items: Vec<CartItemView>,
    pub total_cents: i64,
}

/// GET /cart/:customer_id — the customer's cart, newest line first.
#[tracing::instrument(skip(state))]
pub async fn get<S: StorefrontStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(customer_id): Path<String>,
) -> Result<Json<CartResponse>, ApiError> {
    let customer = CustomerId::from_uuid(parse_uuid(&customer_id)?);
    let items = state.cart.list_items(customer).await?;
    let total = state.cart.total(customer).await?;
    Ok(Json(CartResponse {
        items,
        total_cents: total.cents(),
    }))
}

#[derive(Deserialize)]
pub struct AddItemRequest {
    pub product_id: String,
    pub quantity: u32,
}

/// POST /cart/:customer_id/items — add a product to the cart, merging
/// into an existing line.
#[tracing::instrument(skip(state, req))]
pub async fn add_item<S: StorefrontStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(customer_id): Path<String>,
    Json(req): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<domain::CartLine>), ApiError> {
    let customer = CustomerId::from_uuid(parse_uuid(&customer_id)?);
    let line = state
        .cart
        .add_item(customer, &ProductId::new(req.product_id), req.quantity)
        .await?;
    Ok((StatusCode::CREATED, Json(line)))
}

#[derive(Deserialize)]
pub struct UpdateLineRequest {
    pub quantity: i64,
}

/// PUT /cart/lines/:line_id — set a line's quantity; zero or negative
/// removes it.
#[tracing::instrument(skip(state, req))]
pub async fn update_line<S: StorefrontStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(line_id): Path<String>,
    Json(req): Json<UpdateLineRequest>,
) -> Result<StatusCode, ApiError> {
    let line = CartLineId::from_uuid(parse_uuid(&line_id)?);
    state.cart.update_quantity(line, req.quantity).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /cart/lines/:line_id — remove a line. Idempotent.
#[tracing::instrument(skip(state))]
pub async fn remove_line<S: StorefrontStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(line_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let line = CartLineId::from_uuid(parse_uuid(&line_id)?);
    state.cart.remove_item(line).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /cart/:customer_id — empty the cart.
#[tracing::instrument(skip(state))]
pub async fn clear<S: StorefrontStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(customer_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let customer = CustomerId::from_uuid(parse_uuid(&customer_id)?);
    state.cart.clear(customer).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct PlaceOrderRequest {
    pub delivery_address: String,
    pub delivery_phone: String,
    pub payment_method: String,
    // Stub payment details, validated per method.
    pub card_number: Option<String>,
    pub card_expiry: Option<String>,
    pub card_cvv: Option<String>,
    pub paypal_email: Option<String>,
    pub gpay_phone: Option<String>,
}

/// POST /checkout/:customer_id — place an order from the cart.
#[tracing::instrument(skip(state, req))]
pub async fn place_order<S: StorefrontStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(customer_id): Path<String>,
    Json(req): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<CheckoutReceipt>), ApiError> {
    let customer = CustomerId::from_uuid(parse_uuid(&customer_id)?);

    let method: PaymentMethod = req
        .payment_method
        .parse()
        .map_err(|e: domain::UnknownPaymentMethod| ApiError::BadRequest(e.to_string()))?;
    validate_payment_details(method, &req)?;

    let receipt = state
        .checkout
        .place_order(CheckoutRequest {
            customer_id: customer,
            delivery_address: req.delivery_address,
            delivery_phone: req.delivery_phone,
            payment_method: method,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(receipt)))
}

fn validate_payment_details(
    method: PaymentMethod,
    req: &PlaceOrderRequest,
) -> Result<(), ApiError> {
    let missing = |field: &str| ApiError::BadRequest(format!("{field} is required"));

    let result = match method {
        PaymentMethod::Cash => Ok(()),
        PaymentMethod::Card => {
            let number = req.card_number.as_deref().ok_or(missing("card_number"))?;
            let expiry = req.card_expiry.as_deref().ok_or(missing("card_expiry"))?;
            let cvv = req.card_cvv.as_deref().ok_or(missing("card_cvv"))?;
            payment::validate_card_details(number, expiry, cvv)
        }
        PaymentMethod::Paypal => {
            let email = req.paypal_email.as_deref().ok_or(missing("paypal_email"))?;
            payment::validate_paypal_email(email)
        }
        PaymentMethod::Gpay => {
            let phone = req.gpay_phone.as_deref().ok_or(missing("gpay_phone"))?;
            payment::validate_gpay_phone(phone)
        }
    };

    result.map_err(|e| ApiError::BadRequest(e.to_string()))
}
