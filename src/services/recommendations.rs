use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    db::{CardCatalog, OwnershipStore},
    error::AppResult,
    models::{Card, CardId, CardRecord, CardResult, RateSource, Recommendation, RewardRules, UserId},
};

/// How a card's reward rate and annual fee combine into a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFormula {
    /// `rate * rate_weight - annual_fee / fee_divisor`
    #[default]
    FeeAdjusted,
    /// `rate * rate_weight`, fees ignored
    RateOnly,
    /// `FeeAdjusted` plus `specificity_bonus` when the rate came from a category-specific rule
    SpecificityBonus,
}

/// Which rate wins when a card has both a category rule and a fallback rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// A category rule always wins, even against a higher fallback rate
    #[default]
    PreferSpecific,
    /// The larger of the two rates wins
    HighestRate,
}

/// Ordering among cards with equal scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Owned cards first, then lower annual fee
    #[default]
    OwnedThenFee,
    /// Lower annual fee first, then owned cards
    FeeThenOwned,
}

/// Tunable parameters of the scoring heuristic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub formula: ScoreFormula,
    pub fallback: FallbackPolicy,
    pub tie_break: TieBreak,
    pub rate_weight: f64,
    pub fee_divisor: f64,
    pub specificity_bonus: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            formula: ScoreFormula::default(),
            fallback: FallbackPolicy::default(),
            tie_break: TieBreak::default(),
            rate_weight: 100.0,
            fee_divisor: 10.0,
            specificity_bonus: 0.5,
        }
    }
}

impl ScoringConfig {
    /// Checks the numeric parameters, returning a description of the first bad one
    pub fn validate(&self) -> Result<(), String> {
        if !self.rate_weight.is_finite() || self.rate_weight <= 0.0 {
            return Err(format!("rate_weight must be positive, got {}", self.rate_weight));
        }
        if !self.fee_divisor.is_finite() || self.fee_divisor <= 0.0 {
            return Err(format!("fee_divisor must be positive, got {}", self.fee_divisor));
        }
        if !self.specificity_bonus.is_finite() || self.specificity_bonus < 0.0 {
            return Err(format!(
                "specificity_bonus must be non-negative, got {}",
                self.specificity_bonus
            ));
        }
        Ok(())
    }

    /// The rate a card's rules give `category`, and which rule it came from
    pub fn reward_rate(&self, rules: &RewardRules, category: &str) -> Option<(f64, RateSource)> {
        let specific = rules.specific_rate(category);
        let fallback = rules.fallback_rate();

        match (self.fallback, specific, fallback) {
            (FallbackPolicy::HighestRate, Some(s), Some(f)) if f > s => {
                Some((f, RateSource::Fallback))
            }
            (_, Some(s), _) => Some((s, RateSource::Specific)),
            (_, None, Some(f)) => Some((f, RateSource::Fallback)),
            (_, None, None) => None,
        }
    }

    /// Score for a card earning `rate` with the given annual fee
    ///
    /// Scores are rounded to nine decimal places so float noise never decides a tie.
    pub fn score(&self, rate: f64, source: RateSource, annual_fee: f64) -> f64 {
        let reward = rate * self.rate_weight;
        let fee_penalty = annual_fee / self.fee_divisor;

        let raw = match self.formula {
            ScoreFormula::FeeAdjusted => reward - fee_penalty,
            ScoreFormula::RateOnly => reward,
            ScoreFormula::SpecificityBonus => {
                let bonus = match source {
                    RateSource::Specific => self.specificity_bonus,
                    RateSource::Fallback => 0.0,
                };
                reward - fee_penalty + bonus
            }
        };

        (raw * 1e9).round() / 1e9
    }

    fn compare(&self, a: &CardResult, b: &CardResult) -> std::cmp::Ordering {
        let by_score = b.score.total_cmp(&a.score);
        let by_owned = b.is_owned.cmp(&a.is_owned);
        let by_fee = a.annual_fee.total_cmp(&b.annual_fee);

        match self.tie_break {
            TieBreak::OwnedThenFee => by_score.then(by_owned).then(by_fee),
            TieBreak::FeeThenOwned => by_score.then(by_fee).then(by_owned),
        }
    }
}

/// Ranks a catalog snapshot for one category
///
/// `category` should be the canonical category name. `owned` is `None` when no
/// user was given; ownership flags and comparison notes are only produced
/// when it is `Some`. Cards with unreadable rules or an invalid fee are
/// skipped with a warning.
pub fn score_cards(
    category: &str,
    records: Vec<CardRecord>,
    owned: Option<&HashSet<CardId>>,
    config: &ScoringConfig,
) -> Recommendation {
    let mut usable = 0usize;
    let mut results = Vec::new();

    for record in records {
        let card_id = record.id;
        let card = match Card::try_from(record) {
            Ok(card) => card,
            Err(e) => {
                tracing::warn!(card_id, error = %e, "Skipping malformed card");
                continue;
            }
        };
        usable += 1;

        let Some((rate, source)) = config.reward_rate(&card.reward_rules, category) else {
            continue;
        };
        if rate <= 0.0 {
            continue;
        }

        let is_owned = owned.is_some_and(|ids| ids.contains(&card.id));
        results.push(CardResult {
            id: card.id,
            score: config.score(rate, source, card.annual_fee),
            name: card.name,
            issuer: card.issuer,
            reward_rate_for_category: rate,
            annual_fee: card.annual_fee,
            benefits: card.benefits,
            image_url: card.image_url,
            is_owned,
            comparison_note: None,
        });
    }

    if usable == 0 {
        return Recommendation::NoCardsAvailable;
    }

    if owned.is_some() {
        annotate_comparisons(&mut results, category);
    }

    results.sort_by(|a, b| config.compare(a, b));

    let best_owned = results.iter().find(|result| result.is_owned).cloned();
    let mut ranked = results.into_iter();
    let Some(best) = ranked.next() else {
        return Recommendation::NoEligibleCards {
            category: category.to_string(),
        };
    };

    Recommendation::Ranked {
        category: category.to_string(),
        best,
        others: ranked.collect(),
        best_owned,
    }
}

/// Adds a note to every non-owned card that out-earns the user's best owned card
fn annotate_comparisons(results: &mut [CardResult], category: &str) {
    let best_owned = results
        .iter()
        .filter(|result| result.is_owned)
        .fold(None::<(f64, String)>, |best, result| match best {
            Some((rate, _)) if rate >= result.reward_rate_for_category => best,
            _ => Some((result.reward_rate_for_category, result.name.clone())),
        });

    for result in results.iter_mut().filter(|result| !result.is_owned) {
        let rate = result.reward_rate_for_category;
        result.comparison_note = match &best_owned {
            Some((owned_rate, owned_name)) if rate > *owned_rate => Some(format!(
                "Earns {} on {}, more than the {} from your {}",
                format_rate(rate),
                category,
                format_rate(*owned_rate),
                owned_name
            )),
            Some(_) => None,
            None => Some(format!(
                "None of your cards earn rewards on {}; this card earns {}",
                category,
                format_rate(rate)
            )),
        };
    }
}

/// Renders a fractional rate as a percentage, e.g. `0.015` as `1.5%`
fn format_rate(rate: f64) -> String {
    let percent = format!("{:.2}", rate * 100.0);
    format!("{}%", percent.trim_end_matches('0').trim_end_matches('.'))
}

/// Fetches a catalog snapshot and ranks it
#[derive(Clone)]
pub struct RecommendationService {
    catalog: Arc<dyn CardCatalog>,
    ownership: Arc<dyn OwnershipStore>,
    config: ScoringConfig,
}

impl RecommendationService {
    pub fn new(
        catalog: Arc<dyn CardCatalog>,
        ownership: Arc<dyn OwnershipStore>,
        config: ScoringConfig,
    ) -> Self {
        Self {
            catalog,
            ownership,
            config,
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Recommends the best card for `category_name`, optionally for a specific user
    ///
    /// Only store failures are errors. An unknown category, an empty catalog
    /// and a category no card rewards are all reported as [`Recommendation`]
    /// variants.
    #[tracing::instrument(skip(self))]
    pub async fn recommend(
        &self,
        category_name: &str,
        user_id: Option<UserId>,
    ) -> AppResult<Recommendation> {
        let requested = category_name.trim();

        let Some(category) = self.catalog.find_category(requested).await? else {
            tracing::info!(category = %requested, "Unknown category requested");
            return Ok(Recommendation::CategoryNotFound {
                category: requested.to_string(),
            });
        };

        let cards = self.catalog.list_cards().await?;
        if cards.is_empty() {
            tracing::info!("Card catalog is empty");
            return Ok(Recommendation::NoCardsAvailable);
        }

        let owned = match user_id {
            Some(user_id) => Some(self.ownership.list_owned_card_ids(user_id).await?),
            None => None,
        };

        let card_count = cards.len();
        let recommendation = score_cards(&category.name, cards, owned.as_ref(), &self.config);

        tracing::debug!(
            category = %category.name,
            card_count,
            eligible = recommendation.best().map_or(0, |_| 1 + recommendation.others().len()),
            status = recommendation.status(),
            "Scored catalog"
        );

        Ok(recommendation)
    }
}
