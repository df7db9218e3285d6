//! # TalentMatch Scoring
//!
//! Explainable job/resume match scoring.
//!
//! - [`SkillMatcher`] - required/preferred skill coverage
//! - [`WeightProfileResolver`] - industry, career stage, preference and
//!   market adjusted factor weights
//! - [`ScoringEngine`] - weighted sum of sub-scores with a per-factor breakdown
//! - [`MatchResult::explain`] - reasons and concerns for a match

pub mod engine;
pub mod explain;
pub mod factors;
pub mod skill;
pub mod weights;

pub use engine::{JobSignals, ResolvedWeights, ScoringEngine};
pub use explain::{Explanation, FactorBreakdown, FactorScore, MatchResult, MatchStats};
pub use factors::ScoringConfig;
pub use skill::{SkillMatch, SkillMatcher};
pub use weights::{
    Adjustment, CareerMultipliers, Factor, FactorWeights, MarketSignals, PreferenceOverride,
    PreferenceOverrides, WeightProfile, WeightProfileResolver, WeightTables,
};
