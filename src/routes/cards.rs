use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::UserId,
    routes::AppState,
    services::catalog::{self, CardSummary},
};

#[derive(Debug, Deserialize)]
pub struct CardsQuery {
    pub user_id: Option<UserId>,
}

/// Handler for the card listing endpoint
pub async fn list_cards(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CardsQuery>,
) -> AppResult<Json<Vec<CardSummary>>> {
    let cards = catalog::list_cards(
        state.catalog.as_ref(),
        state.ownership.as_ref(),
        params.user_id,
    )
    .await?;
    Ok(Json(cards))
}

/// Handler for the category listing endpoint
pub async fn list_categories(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<String>>> {
    let names = catalog::list_category_names(state.catalog.as_ref()).await?;
    Ok(Json(names))
}
