use serde::Serialize;

use crate::{
    db::{CardCatalog, OwnershipStore},
    error::AppResult,
    models::{Card, Category, UserId},
};

/// A catalog card with the caller's ownership flag
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardSummary {
    #[serde(flatten)]
    pub card: Card,
    pub is_owned: bool,
}

/// Lists every well-formed card, flagging the ones `user_id` owns
///
/// Cards whose stored rules cannot be read are left out of the listing.
pub async fn list_cards(
    catalog: &dyn CardCatalog,
    ownership: &dyn OwnershipStore,
    user_id: Option<UserId>,
) -> AppResult<Vec<CardSummary>> {
    let owned = match user_id {
        Some(user_id) => ownership.list_owned_card_ids(user_id).await?,
        None => Default::default(),
    };

    let cards = catalog
        .list_cards()
        .await?
        .into_iter()
        .filter_map(|record| {
            let card_id = record.id;
            Card::try_from(record)
                .map_err(|e| tracing::warn!(card_id, error = %e, "Leaving malformed card out"))
                .ok()
        })
        .map(|card| CardSummary {
            is_owned: owned.contains(&card.id),
            card,
        })
        .collect();

    Ok(cards)
}

/// Names of all known purchase categories
pub async fn list_category_names(catalog: &dyn CardCatalog) -> AppResult<Vec<String>> {
    let categories = catalog.list_categories().await?;
    Ok(categories.into_iter().map(|Category { name, .. }| name).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryStore;
    use crate::models::CardRecord;

    #[tokio::test]
    async fn test_list_cards_flags_owned_and_skips_malformed() {
        let store = InMemoryStore::seeded();
        store
            .upsert_card(CardRecord {
                id: 99,
                name: "Broken".to_string(),
                issuer: None,
                annual_fee: 0.0,
                reward_rules: Some("{".to_string()),
                benefits: None,
                image_url: None,
            })
            .await;
        store.add_owned_card(3, 2).await.unwrap();

        let cards = list_cards(&store, &store, Some(3)).await.unwrap();

        assert_eq!(cards.len(), 5);
        let owned: Vec<i64> = cards.iter().filter(|c| c.is_owned).map(|c| c.card.id).collect();
        assert_eq!(owned, vec![2]);
    }

    #[tokio::test]
    async fn test_list_cards_without_user_owns_nothing() {
        let store = InMemoryStore::seeded();
        store.add_owned_card(3, 2).await.unwrap();

        let cards = list_cards(&store, &store, None).await.unwrap();

        assert!(cards.iter().all(|c| !c.is_owned));
    }

    #[tokio::test]
    async fn test_card_summary_serializes_flat() {
        let store = InMemoryStore::seeded();
        let cards = list_cards(&store, &store, None).await.unwrap();

        let json = serde_json::to_value(&cards[1]).unwrap();
        assert_eq!(json["name"], "Dining Plus");
        assert_eq!(json["reward_rules"]["Dining"], 0.03);
        assert_eq!(json["is_owned"], false);
    }

    #[tokio::test]
    async fn test_category_names_sorted() {
        let store = InMemoryStore::seeded();
        let names = list_category_names(&store).await.unwrap();
        assert_eq!(names, vec!["Dining", "Gas", "Groceries", "Online Shopping", "Travel"]);
    }
}
