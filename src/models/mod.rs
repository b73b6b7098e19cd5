mod card;
mod category;
mod ownership;
mod recommendation;

pub use card::{
    Card, CardError, CardId, CardRecord, RateSource, RewardRules, RewardRulesError, FALLBACK_KEYS,
};
pub use category::Category;
pub use ownership::{OwnedCard, UserId};
pub use recommendation::{CardResult, Recommendation};
