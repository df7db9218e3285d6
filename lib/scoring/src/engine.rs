use crate::explain::{FactorBreakdown, MatchResult};
use crate::factors::{
    experience_score, location_score, salary_score, semantic_score, signal_score, ScoringConfig,
};
use crate::skill::SkillMatcher;
use crate::weights::{Factor, MarketSignals, PreferenceOverrides, WeightProfile, WeightProfileResolver};
use serde::{Deserialize, Serialize};
use talentmatch_core::{CareerStage, EntityType, Error, Industry, JobRecord, Result, ResumeRecord, Vector};

/// Externally supplied per-job scalars in [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobSignals {
    pub market_demand: Option<f32>,
    pub career_growth: Option<f32>,
}

/// A resolved profile, and whether it is the unadjusted base table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedWeights {
    pub profile: WeightProfile,
    pub fallback: bool,
}

/// Combines sub-scores with a weight profile into a [`MatchResult`].
pub struct ScoringEngine {
    config: ScoringConfig,
    skills: SkillMatcher,
    resolver: WeightProfileResolver,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig, skills: SkillMatcher, resolver: WeightProfileResolver) -> Self {
        Self {
            config,
            skills,
            resolver,
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn resolver(&self) -> &WeightProfileResolver {
        &self.resolver
    }

    pub fn skill_matcher(&self) -> &SkillMatcher {
        &self.skills
    }

    /// Resolve weights, substituting the industry base table when the
    /// adjusted profile degenerates. Invalid inputs are still errors.
    pub fn weights_for(
        &self,
        industry: Industry,
        stage: CareerStage,
        overrides: &PreferenceOverrides,
        signals: &MarketSignals,
    ) -> Result<ResolvedWeights> {
        match self.resolver.resolve(industry, stage, overrides, signals) {
            Ok(profile) => Ok(ResolvedWeights {
                profile,
                fallback: false,
            }),
            Err(Error::DegenerateWeight { sum }) => {
                tracing::warn!(
                    %industry,
                    %stage,
                    sum,
                    "degenerate weight profile, falling back to industry base weights"
                );
                Ok(ResolvedWeights {
                    profile: self.resolver.base_profile(industry),
                    fallback: true,
                })
            }
            Err(e) => Err(e),
        }
    }

    pub fn score(
        &self,
        job: &JobRecord,
        resume: &ResumeRecord,
        weights: &WeightProfile,
        job_vector: &Vector,
        resume_vector: &Vector,
        signals: JobSignals,
    ) -> Result<MatchResult> {
        job.validate()?;
        resume.validate()?;
        if job_vector.dim() != resume_vector.dim() {
            return Err(Error::InvalidDimension {
                expected: job_vector.dim(),
                actual: resume_vector.dim(),
            });
        }
        if !job_vector.is_finite() || !resume_vector.is_finite() {
            return Err(Error::InvalidArgument(format!(
                "non-finite embedding for pair ({}, {})",
                job.id, resume.id
            )));
        }

        let skills = self
            .skills
            .analyze(&resume.skills, &job.required_skills, &job.preferred_skills);

        let mut breakdown = FactorBreakdown::default();
        for factor in Factor::ALL {
            let score = match factor {
                Factor::Skill => skills.score,
                Factor::Experience => experience_score(&self.config, job, resume),
                Factor::Location => location_score(&self.config, job, resume),
                Factor::Salary => salary_score(&self.config, job, resume),
                Factor::Semantic => semantic_score(job_vector, resume_vector),
                Factor::MarketDemand => signal_score(&self.config, signals.market_demand),
                Factor::CareerGrowth => signal_score(&self.config, signals.career_growth),
            };
            breakdown.push(factor, score, weights.get(factor));
        }
        let score = breakdown.total().clamp(0.0, 1.0);

        Ok(MatchResult {
            job_id: job.id.clone(),
            resume_id: resume.id.clone(),
            counterpart: EntityType::Job,
            score,
            rank: 0,
            breakdown,
            skills,
            weight_fallback: false,
        })
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(
            ScoringConfig::default(),
            SkillMatcher::default(),
            WeightProfileResolver::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weights::FactorWeights;
    use talentmatch_core::RemotePolicy;

    fn job() -> JobRecord {
        JobRecord::new("j1", "Data Engineer")
            .with_required_skills(["Python", "SQL"])
            .with_preferred_skills(["Docker"])
            .with_experience(3.0, 7.0)
            .with_location("Austin, TX", RemotePolicy::OnSite)
    }

    fn resume() -> ResumeRecord {
        ResumeRecord::new("r1", "Kim")
            .with_skills(["python", "sql", "docker"])
            .with_experience(5.0)
            .with_location("Austin, TX")
    }

    fn unit(data: Vec<f32>) -> Vector {
        Vector::new(data).normalized()
    }

    #[test]
    fn test_full_match_scores_high() {
        let engine = ScoringEngine::default();
        let weights =
            WeightProfile::normalize(FactorWeights::new(0.4, 0.25, 0.15, 0.1, 0.1, 0.0, 0.0)).unwrap();
        let v = unit(vec![1.0, 0.0, 0.0]);
        let result = engine
            .score(&job(), &resume(), &weights, &v, &v, JobSignals::default())
            .unwrap();

        assert!((result.factor_score(Factor::Skill) - 1.0).abs() < 1e-6);
        assert_eq!(result.factor_score(Factor::Experience), 1.0);
        assert!(result.score >= 0.65);
        let total: f32 = result.breakdown.iter().map(|f| f.contribution).sum();
        assert!((result.score - total).abs() < 1e-6);
    }

    #[test]
    fn test_signals_feed_their_factors() {
        let engine = ScoringEngine::default();
        let weights = engine.resolver().base_profile(Industry::General);
        let v = unit(vec![1.0, 1.0]);
        let signals = JobSignals {
            market_demand: Some(0.9),
            career_growth: None,
        };
        let result = engine.score(&job(), &resume(), &weights, &v, &v, signals).unwrap();
        assert_eq!(result.factor_score(Factor::MarketDemand), 0.9);
        assert_eq!(result.factor_score(Factor::CareerGrowth), 0.5);
    }

    #[test]
    fn test_mismatched_vectors_fail() {
        let engine = ScoringEngine::default();
        let weights = engine.resolver().base_profile(Industry::General);
        let err = engine
            .score(
                &job(),
                &resume(),
                &weights,
                &unit(vec![1.0, 0.0]),
                &unit(vec![1.0, 0.0, 0.0]),
                JobSignals::default(),
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDimension { .. }));
    }

    #[test]
    fn test_degenerate_profile_falls_back() {
        let engine = ScoringEngine::default();
        let mut overrides = PreferenceOverrides::new();
        for factor in Factor::ALL {
            overrides = overrides.scale(factor, 0.0);
        }
        let resolved = engine
            .weights_for(
                Industry::Finance,
                CareerStage::Senior,
                &overrides,
                &MarketSignals::default(),
            )
            .unwrap();
        assert!(resolved.fallback);
        assert_eq!(resolved.profile, engine.resolver().base_profile(Industry::Finance));
    }

    #[test]
    fn test_invalid_signal_is_not_masked() {
        let engine = ScoringEngine::default();
        let signals = MarketSignals {
            remote_work_trend: f32::INFINITY,
            ..MarketSignals::default()
        };
        assert!(engine
            .weights_for(Industry::General, CareerStage::Mid, &PreferenceOverrides::new(), &signals)
            .is_err());
    }
}
