//! Scorecard rule scoring
//!
//! A scorecard defines weighted rules grouped into named levels. The scores
//! endpoint reports, per service, a score for each rule it was evaluated
//! against. [`ScorecardEnricher`] joins the two into one row per
//! (service, rule) pair.

mod enricher;
mod models;

pub use enricher::{resolve_level_number, EnrichedScoreRow, RuleIndex, ScorecardEnricher};
pub use models::{
    Level, RuleInfo, RuleScore, ScoreBlock, ScorePage, Scorecard, ScorecardLevel, ScorecardResponse,
    ScoredService, ServiceScore,
};
