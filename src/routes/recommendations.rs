use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{CardResult, Recommendation, UserId},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub user_id: Option<UserId>,
}

/// Flat response shape shared by every recommendation outcome
#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub status: &'static str,
    pub category: String,
    pub best_card: Option<CardResult>,
    pub eligible_cards: Vec<CardResult>,
    pub best_owned_card: Option<CardResult>,
    pub message: Option<String>,
}

impl RecommendationResponse {
    fn new(requested: &str, recommendation: Recommendation) -> Self {
        let status = recommendation.status();
        let message = recommendation.message();

        match recommendation {
            Recommendation::Ranked {
                category,
                best,
                others,
                best_owned,
            } => Self {
                status,
                category,
                best_card: Some(best),
                eligible_cards: others,
                best_owned_card: best_owned,
                message,
            },
            Recommendation::CategoryNotFound { category }
            | Recommendation::NoEligibleCards { category } => Self {
                status,
                category,
                best_card: None,
                eligible_cards: Vec::new(),
                best_owned_card: None,
                message,
            },
            Recommendation::NoCardsAvailable => Self {
                status,
                category: requested.trim().to_string(),
                best_card: None,
                eligible_cards: Vec::new(),
                best_owned_card: None,
                message,
            },
        }
    }
}

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<(StatusCode, Json<RecommendationResponse>)> {
    if request.category.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "A 'category' is required in the request body".to_string(),
        ));
    }

    tracing::info!(
        request_id = %request_id,
        category = %request.category,
        user_id = ?request.user_id,
        "Processing recommendation request"
    );

    let recommendation = state
        .recommender
        .recommend(&request.category, request.user_id)
        .await?;

    let status = match recommendation {
        Recommendation::CategoryNotFound { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::OK,
    };

    tracing::info!(
        request_id = %request_id,
        outcome = recommendation.status(),
        "Recommendation completed"
    );

    Ok((
        status,
        Json(RecommendationResponse::new(&request.category, recommendation)),
    ))
}
