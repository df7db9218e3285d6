//! Match results with their per-factor breakdown.
//!
//! The breakdown is recorded while scoring, so every factor's contribution
//! to the overall score can be inspected without re-running the sub-scorers.

use crate::skill::SkillMatch;
use crate::weights::Factor;
use serde::{Deserialize, Serialize};
use talentmatch_core::EntityType;

/// One factor's share of a match score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorScore {
    pub factor: Factor,
    /// Sub-score in [0, 1]
    pub score: f32,
    /// Resolved weight
    pub weight: f32,
    /// `score * weight`
    pub contribution: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactorBreakdown {
    factors: Vec<FactorScore>,
}

impl FactorBreakdown {
    pub fn push(&mut self, factor: Factor, score: f32, weight: f32) {
        self.factors.push(FactorScore {
            factor,
            score,
            weight,
            contribution: score * weight,
        });
    }

    pub fn get(&self, factor: Factor) -> Option<&FactorScore> {
        self.factors.iter().find(|f| f.factor == factor)
    }

    /// Sub-score of a factor, 0 when absent
    pub fn score(&self, factor: Factor) -> f32 {
        self.get(factor).map_or(0.0, |f| f.score)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FactorScore> {
        self.factors.iter()
    }

    pub fn total(&self) -> f32 {
        self.factors.iter().map(|f| f.contribution).sum()
    }

    /// Factor with the largest contribution
    pub fn top_contributor(&self) -> Option<Factor> {
        self.factors
            .iter()
            .max_by(|a, b| a.contribution.total_cmp(&b.contribution))
            .map(|f| f.factor)
    }
}

/// A scored job/resume pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub job_id: String,
    pub resume_id: String,
    /// Which side of the pair is the recommendation
    pub counterpart: EntityType,
    /// Weighted sum of the breakdown, in [0, 1]
    pub score: f32,
    /// 1-based position in a ranked list; 0 until ranked
    pub rank: usize,
    pub breakdown: FactorBreakdown,
    pub skills: SkillMatch,
    /// Whether base weights were substituted for a degenerate profile
    pub weight_fallback: bool,
}

impl MatchResult {
    pub fn counterpart_id(&self) -> &str {
        match self.counterpart {
            EntityType::Job => &self.job_id,
            EntityType::Resume => &self.resume_id,
        }
    }

    #[must_use]
    pub fn with_counterpart(mut self, counterpart: EntityType) -> Self {
        self.counterpart = counterpart;
        self
    }

    pub fn factor_score(&self, factor: Factor) -> f32 {
        self.breakdown.score(factor)
    }

    /// Reasons for and concerns about this match, from sub-score thresholds
    pub fn explain(&self) -> Explanation {
        let mut reasons = Vec::new();
        let mut concerns = Vec::new();
        let s = |factor| self.factor_score(factor);

        let matched = self.skills.matched_count();
        match s(Factor::Skill) {
            v if v >= 0.8 => reasons.push(format!("Excellent skills match ({} matching skills)", matched)),
            v if v >= 0.6 => reasons.push(format!("Good skills alignment ({} matching skills)", matched)),
            v if v >= 0.4 => reasons.push(format!("Moderate skills match ({} matching skills)", matched)),
            _ => {}
        }
        if !self.skills.matched_required.is_empty() {
            let top: Vec<&str> = self.skills.matched_required.iter().take(3).map(String::as_str).collect();
            reasons.push(format!("Strong in: {}", top.join(", ")));
        }

        match s(Factor::Experience) {
            v if v >= 0.8 => reasons.push("Experience level is ideal for this role".into()),
            v if v >= 0.6 => reasons.push("Good experience level match".into()),
            v if v >= 0.4 => concerns.push("Experience level may not be ideal".into()),
            _ => concerns.push("Experience level may be insufficient".into()),
        }

        match s(Factor::Location) {
            v if v >= 0.9 => reasons.push("Perfect location match".into()),
            v if v >= 0.7 => reasons.push("Good location compatibility".into()),
            v if v >= 0.5 => reasons.push("Location is manageable".into()),
            _ => concerns.push("Location requires significant adjustment".into()),
        }

        if s(Factor::Salary) >= 0.99 {
            reasons.push("Salary expectations aligned".into());
        } else if s(Factor::Salary) < 0.5 {
            concerns.push("Salary expectations may not align".into());
        }

        if s(Factor::Semantic) >= 0.65 {
            reasons.push("Strong job description alignment".into());
        }

        match s(Factor::CareerGrowth) {
            v if v >= 0.7 => reasons.push("Strong career advancement opportunity".into()),
            v if v > 0.5 => reasons.push("Good growth potential".into()),
            _ => {}
        }

        match s(Factor::MarketDemand) {
            v if v >= 0.8 => reasons.push("High demand role in current market".into()),
            v if v >= 0.6 => reasons.push("Good market demand for this role".into()),
            v if v < 0.4 => concerns.push("Low market demand for this role".into()),
            _ => {}
        }

        if !self.skills.missing_required.is_empty() {
            let gaps: Vec<&str> = self.skills.missing_required.iter().take(2).map(String::as_str).collect();
            concerns.push(format!("May need to develop: {}", gaps.join(", ")));
        }

        if reasons.is_empty() {
            reasons.push("Basic compatibility found".into());
        }

        Explanation { reasons, concerns }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub reasons: Vec<String>,
    pub concerns: Vec<String>,
}

/// Summary of a ranked result list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    pub candidates_count: usize,
    pub results_count: usize,
    pub avg_score: f32,
    pub best_score: f32,
    /// Factor that contributed most to the best result
    pub top_contributing_factor: Option<Factor>,
}

impl MatchStats {
    /// `results` must be sorted best first.
    pub fn compute(results: &[MatchResult], candidates_count: usize) -> Self {
        let Some(best) = results.first() else {
            return Self {
                candidates_count,
                results_count: 0,
                avg_score: 0.0,
                best_score: 0.0,
                top_contributing_factor: None,
            };
        };

        let avg_score = results.iter().map(|r| r.score).sum::<f32>() / results.len() as f32;

        Self {
            candidates_count,
            results_count: results.len(),
            avg_score,
            best_score: best.score,
            top_contributing_factor: best.breakdown.top_contributor(),
        }
    }
}
