//! Catalog and ownership storage
//!
//! The recommendation service only sees the traits below. PostgreSQL backs
//! them in production and [`InMemoryStore`] backs them in tests and demos.

use std::collections::HashSet;

use crate::{
    error::AppResult,
    models::{CardId, CardRecord, Category, OwnedCard, UserId},
};

pub mod memory;
pub mod postgres;
pub mod seed;

pub use memory::InMemoryStore;
pub use postgres::{create_pool, run_migrations, PgStore};

/// Read access to the card catalog and the known purchase categories
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CardCatalog: Send + Sync {
    /// All cards, in a stable order
    async fn list_cards(&self) -> AppResult<Vec<CardRecord>>;

    /// A single card by id
    async fn get_card(&self, card_id: CardId) -> AppResult<Option<CardRecord>>;

    /// Looks up a category by name, ignoring case
    async fn find_category(&self, name: &str) -> AppResult<Option<Category>>;

    /// All known categories ordered by name
    async fn list_categories(&self) -> AppResult<Vec<Category>>;
}

/// Which cards each user holds
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait OwnershipStore: Send + Sync {
    /// Ids of the cards owned by `user_id`
    async fn list_owned_card_ids(&self, user_id: UserId) -> AppResult<HashSet<CardId>>;

    /// Ownership facts for `user_id`, oldest first
    async fn list_owned_cards(&self, user_id: UserId) -> AppResult<Vec<OwnedCard>>;

    /// Records ownership; returns false if the user already held the card
    async fn add_owned_card(&self, user_id: UserId, card_id: CardId) -> AppResult<bool>;

    /// Removes ownership; returns false if the user did not hold the card
    async fn remove_owned_card(&self, user_id: UserId, card_id: CardId) -> AppResult<bool>;
}
