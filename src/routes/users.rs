use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{CardId, OwnedCard, UserId},
    routes::AppState,
    services::ownership,
};

/// Handler listing the cards a user holds
pub async fn list_owned_cards(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<UserId>,
) -> AppResult<Json<Vec<OwnedCard>>> {
    let owned = ownership::list_cards(state.ownership.as_ref(), user_id).await?;
    Ok(Json(owned))
}

/// Handler recording that a user holds a card
pub async fn add_owned_card(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path((user_id, card_id)): Path<(UserId, CardId)>,
) -> AppResult<StatusCode> {
    tracing::info!(request_id = %request_id, user_id, card_id, "Adding owned card");

    let added =
        ownership::add_card(state.catalog.as_ref(), state.ownership.as_ref(), user_id, card_id)
            .await?;

    Ok(if added {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    })
}

/// Handler removing a card from a user's wallet
pub async fn remove_owned_card(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path((user_id, card_id)): Path<(UserId, CardId)>,
) -> AppResult<StatusCode> {
    tracing::info!(request_id = %request_id, user_id, card_id, "Removing owned card");

    ownership::remove_card(state.ownership.as_ref(), user_id, card_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
