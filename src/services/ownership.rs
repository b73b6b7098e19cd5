use crate::{
    db::{CardCatalog, OwnershipStore},
    error::{AppError, AppResult},
    models::{CardId, OwnedCard, UserId},
};

/// Records that `user_id` holds `card_id`
///
/// Returns `true` when the fact is new. Unknown cards are rejected with
/// [`AppError::NotFound`].
pub async fn add_card(
    catalog: &dyn CardCatalog,
    ownership: &dyn OwnershipStore,
    user_id: UserId,
    card_id: CardId,
) -> AppResult<bool> {
    if catalog.get_card(card_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Card {} not found", card_id)));
    }

    let added = ownership.add_owned_card(user_id, card_id).await?;
    tracing::info!(user_id, card_id, added, "Recorded card ownership");
    Ok(added)
}

/// Forgets that `user_id` holds `card_id`
pub async fn remove_card(
    ownership: &dyn OwnershipStore,
    user_id: UserId,
    card_id: CardId,
) -> AppResult<()> {
    if !ownership.remove_owned_card(user_id, card_id).await? {
        return Err(AppError::NotFound(format!(
            "User {} does not own card {}",
            user_id, card_id
        )));
    }

    tracing::info!(user_id, card_id, "Removed card ownership");
    Ok(())
}

/// Cards held by `user_id`
pub async fn list_cards(
    ownership: &dyn OwnershipStore,
    user_id: UserId,
) -> AppResult<Vec<OwnedCard>> {
    ownership.list_owned_cards(user_id).await
}
