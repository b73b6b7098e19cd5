pub mod catalog;
pub mod ownership;
pub mod recommendations;

pub use recommendations::{
    score_cards, FallbackPolicy, RecommendationService, ScoreFormula, ScoringConfig, TieBreak,
};
