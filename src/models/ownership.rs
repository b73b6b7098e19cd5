use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::CardId;

/// Identifier of a user, supplied by whatever authenticates the caller
pub type UserId = i64;

/// A single (user, card) ownership fact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct OwnedCard {
    pub user_id: UserId,
    pub card_id: CardId,
    pub added_at: DateTime<Utc>,
}
