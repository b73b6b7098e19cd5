use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use super::{seed, CardCatalog, OwnershipStore};
use crate::{
    error::AppResult,
    models::{CardId, CardRecord, Category, OwnedCard, UserId},
};

/// Store backed by process memory
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<StoreInner>>,
}

/// Inner state that can be modified
#[derive(Default)]
struct StoreInner {
    categories: Vec<Category>,
    cards: Vec<CardRecord>,
    ownership: Vec<OwnedCard>,
}

impl InMemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the given catalog and no ownership facts
    pub fn with_catalog(categories: Vec<Category>, cards: Vec<CardRecord>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreInner {
                categories,
                cards,
                ownership: Vec::new(),
            })),
        }
    }

    /// Creates a store holding the sample catalog
    pub fn seeded() -> Self {
        Self::with_catalog(seed::sample_categories(), seed::sample_cards())
    }

    /// Adds or replaces a card
    pub async fn upsert_card(&self, card: CardRecord) {
        let mut inner = self.inner.write().await;
        match inner.cards.iter_mut().find(|existing| existing.id == card.id) {
            Some(existing) => *existing = card,
            None => inner.cards.push(card),
        }
    }

    /// Adds a category unless one with the same name (ignoring case) exists
    pub async fn add_category(&self, name: &str) -> Category {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner.categories.iter().find(|c| c.matches(name)) {
            return existing.clone();
        }

        let id = inner.categories.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        let category = Category {
            id,
            name: name.trim().to_string(),
        };
        inner.categories.push(category.clone());
        category
    }
}

#[async_trait::async_trait]
impl CardCatalog for InMemoryStore {
    async fn list_cards(&self) -> AppResult<Vec<CardRecord>> {
        let inner = self.inner.read().await;
        let mut cards = inner.cards.clone();
        cards.sort_by_key(|card| card.id);
        Ok(cards)
    }

    async fn get_card(&self, card_id: CardId) -> AppResult<Option<CardRecord>> {
        let inner = self.inner.read().await;
        Ok(inner.cards.iter().find(|card| card.id == card_id).cloned())
    }

    async fn find_category(&self, name: &str) -> AppResult<Option<Category>> {
        let inner = self.inner.read().await;
        Ok(inner.categories.iter().find(|c| c.matches(name)).cloned())
    }

    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let inner = self.inner.read().await;
        let mut categories = inner.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }
}

#[async_trait::async_trait]
impl OwnershipStore for InMemoryStore {
    async fn list_owned_card_ids(&self, user_id: UserId) -> AppResult<HashSet<CardId>> {
        let inner = self.inner.read().await;
        Ok(inner
            .ownership
            .iter()
            .filter(|owned| owned.user_id == user_id)
            .map(|owned| owned.card_id)
            .collect())
    }

    async fn list_owned_cards(&self, user_id: UserId) -> AppResult<Vec<OwnedCard>> {
        let inner = self.inner.read().await;
        Ok(inner
            .ownership
            .iter()
            .filter(|owned| owned.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn add_owned_card(&self, user_id: UserId, card_id: CardId) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let already_owned = inner
            .ownership
            .iter()
            .any(|owned| owned.user_id == user_id && owned.card_id == card_id);
        if already_owned {
            return Ok(false);
        }

        inner.ownership.push(OwnedCard {
            user_id,
            card_id,
            added_at: Utc::now(),
        });
        Ok(true)
    }

    async fn remove_owned_card(&self, user_id: UserId, card_id: CardId) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.ownership.len();
        inner
            .ownership
            .retain(|owned| !(owned.user_id == user_id && owned.card_id == card_id));
        Ok(inner.ownership.len() < before)
    }
}
