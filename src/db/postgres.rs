use std::collections::HashSet;

use sqlx::{postgres::PgPoolOptions, PgPool};

use super::{CardCatalog, OwnershipStore};
use crate::{
    error::AppResult,
    models::{CardId, CardRecord, Category, OwnedCard, UserId},
};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the embedded schema and seed migrations
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}

/// Catalog and ownership store backed by PostgreSQL
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CardCatalog for PgStore {
    async fn list_cards(&self) -> AppResult<Vec<CardRecord>> {
        let cards = sqlx::query_as::<_, CardRecord>(
            r#"
            SELECT id, name, issuer, annual_fee, reward_rules, benefits, image_url
            FROM cards
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(cards)
    }

    async fn get_card(&self, card_id: CardId) -> AppResult<Option<CardRecord>> {
        let card = sqlx::query_as::<_, CardRecord>(
            r#"
            SELECT id, name, issuer, annual_fee, reward_rules, benefits, image_url
            FROM cards
            WHERE id = $1
            "#,
        )
        .bind(card_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(card)
    }

    async fn find_category(&self, name: &str) -> AppResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name
            FROM categories
            WHERE lower(name) = lower($1)
            "#,
        )
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(categories)
    }
}

#[async_trait::async_trait]
impl OwnershipStore for PgStore {
    async fn list_owned_card_ids(&self, user_id: UserId) -> AppResult<HashSet<CardId>> {
        let ids: Vec<CardId> =
            sqlx::query_scalar("SELECT card_id FROM user_cards WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(ids.into_iter().collect())
    }

    async fn list_owned_cards(&self, user_id: UserId) -> AppResult<Vec<OwnedCard>> {
        let owned = sqlx::query_as::<_, OwnedCard>(
            r#"
            SELECT user_id, card_id, added_at
            FROM user_cards
            WHERE user_id = $1
            ORDER BY added_at, card_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(owned)
    }

    async fn add_owned_card(&self, user_id: UserId, card_id: CardId) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_cards (user_id, card_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, card_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(card_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_owned_card(&self, user_id: UserId, card_id: CardId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM user_cards WHERE user_id = $1 AND card_id = $2")
            .bind(user_id)
            .bind(card_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
