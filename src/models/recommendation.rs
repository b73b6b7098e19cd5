use serde::Serialize;

use super::CardId;

/// A scored card as presented to the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardResult {
    pub id: CardId,
    pub name: String,
    pub issuer: Option<String>,
    pub reward_rate_for_category: f64,
    pub score: f64,
    pub annual_fee: f64,
    pub benefits: Option<String>,
    pub image_url: Option<String>,
    pub is_owned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison_note: Option<String>,
}

/// Outcome of a recommendation request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Recommendation {
    /// At least one card earns rewards in the category
    Ranked {
        category: String,
        best: CardResult,
        others: Vec<CardResult>,
        best_owned: Option<CardResult>,
    },
    /// The requested category is not a known purchase category
    CategoryNotFound { category: String },
    /// The catalog holds no usable cards
    NoCardsAvailable,
    /// No card earns anything in the category
    NoEligibleCards { category: String },
}

impl Recommendation {
    pub fn best(&self) -> Option<&CardResult> {
        match self {
            Recommendation::Ranked { best, .. } => Some(best),
            _ => None,
        }
    }

    pub fn others(&self) -> &[CardResult] {
        match self {
            Recommendation::Ranked { others, .. } => others,
            _ => &[],
        }
    }

    pub fn best_owned(&self) -> Option<&CardResult> {
        match self {
            Recommendation::Ranked { best_owned, .. } => best_owned.as_ref(),
            _ => None,
        }
    }

    /// Short status label, matching the serialized `status` tag
    pub fn status(&self) -> &'static str {
        match self {
            Recommendation::Ranked { .. } => "ranked",
            Recommendation::CategoryNotFound { .. } => "category_not_found",
            Recommendation::NoCardsAvailable => "no_cards_available",
            Recommendation::NoEligibleCards { .. } => "no_eligible_cards",
        }
    }

    /// User-facing explanation for the non-ranked outcomes
    pub fn message(&self) -> Option<String> {
        match self {
            Recommendation::Ranked { .. } => None,
            Recommendation::CategoryNotFound { category } => {
                Some(format!("Category '{}' not found", category))
            }
            Recommendation::NoCardsAvailable => Some("No cards available".to_string()),
            Recommendation::NoEligibleCards { category } => Some(format!(
                "No recommendations available for the '{}' category",
                category
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_tag_matches_serialization() {
        let outcomes = vec![
            Recommendation::CategoryNotFound {
                category: "Pets".to_string(),
            },
            Recommendation::NoCardsAvailable,
            Recommendation::NoEligibleCards {
                category: "Travel".to_string(),
            },
        ];

        for outcome in outcomes {
            let json = serde_json::to_value(&outcome).unwrap();
            assert_eq!(json["status"], outcome.status());
            assert!(outcome.best().is_none());
            assert!(outcome.others().is_empty());
            assert!(outcome.message().is_some());
        }
    }
}
