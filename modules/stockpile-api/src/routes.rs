use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use stockpile_inventory::{CatalogEvent, GrantError, GrantItemsRequest};

use crate::AppState;

pub async fn healthz() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

pub async fn grant_items(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GrantItemsRequest>,
) -> impl IntoResponse {
    match state
        .grants
        .grant(body.user_id, body.catalog_item_id, body.quantity)
        .await
    {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(GrantError::InvalidQuantity) => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "quantity must be greater than zero"})),
        )
            .into_response(),
        Err(err) if err.is_transient() => {
            warn!(error = %err, "grant failed transiently");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"error": err.to_string()})),
            )
                .into_response()
        }
        Err(err) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({"error": err.to_string()})),
        )
            .into_response(),
    }
}

pub async fn user_items(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.grants.list_for_user(user_id).await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"error": err.to_string()})),
        )
            .into_response(),
    }
}

/// Broker stand-in: accepts a catalog lifecycle event and enqueues it for
/// the reconciler. 202 means accepted for processing, not applied.
pub async fn catalog_event(
    State(state): State<Arc<AppState>>,
    Json(event): Json<CatalogEvent>,
) -> impl IntoResponse {
    if state.inbox.publish(event) {
        StatusCode::ACCEPTED.into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"error": "event consumer unavailable"})),
        )
            .into_response()
    }
}
