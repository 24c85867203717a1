//! Notification inbox endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::{CustomerId, NotificationId};
use domain::Notification;
use serde::{Deserialize, Serialize};
use store::StorefrontStore;

use super::{AppState, parse_uuid};
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct InboxQuery {
    #[serde(default)]
    pub unread: bool,
}

/// GET /customers/:id/notifications — the inbox, newest first.
#[tracing::instrument(skip(state, query))]
pub async fn list<S: StorefrontStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Query(query): Query<InboxQuery>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let customer = CustomerId::from_uuid(parse_uuid(&id)?);
    Ok(Json(
        state.notifications.list(customer, query.unread).await?,
    ))
}

#[derive(Serialize)]
pub struct UnreadCountResponse {
    pub unread: u64,
}

/// GET /customers/:id/notifications/unread-count — inbox badge count.
#[tracing::instrument(skip(state))]
pub async fn unread_count<S: StorefrontStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<UnreadCountResponse>, ApiError> {
    let customer = CustomerId::from_uuid(parse_uuid(&id)?);
    let unread = state.notifications.unread_count(customer).await?;
    Ok(Json(UnreadCountResponse { unread }))
}

/// POST /notifications/:id/read — mark a notification read. Idempotent.
#[tracing::instrument(skip(state))]
pub async fn mark_read<S: StorefrontStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = NotificationId::from_uuid(parse_uuid(&id)?);
    state.notifications.mark_read(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
