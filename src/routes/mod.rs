use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::{CardCatalog, InMemoryStore, OwnershipStore},
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::{RecommendationService, ScoringConfig},
};

pub mod cards;
pub mod recommendations;
pub mod users;

/// Shared application state
pub struct AppState {
    pub catalog: Arc<dyn CardCatalog>,
    pub ownership: Arc<dyn OwnershipStore>,
    pub recommender: RecommendationService,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn CardCatalog>,
        ownership: Arc<dyn OwnershipStore>,
        scoring: ScoringConfig,
    ) -> Self {
        let recommender = RecommendationService::new(catalog.clone(), ownership.clone(), scoring);
        Self {
            catalog,
            ownership,
            recommender,
        }
    }

    /// State backed by a single in-memory store
    pub fn in_memory(store: InMemoryStore, scoring: ScoringConfig) -> Self {
        let store = Arc::new(store);
        Self::new(store.clone(), store, scoring)
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/categories", get(cards::list_categories))
        .route("/cards", get(cards::list_cards))
        .route("/recommendations", post(recommendations::recommend))
        .route("/users/:user_id/cards", get(users::list_owned_cards))
        .route(
            "/users/:user_id/cards/:card_id",
            put(users::add_owned_card).delete(users::remove_owned_card),
        )
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
