//! Per-factor sub-scores, each in [0, 1].

use serde::{Deserialize, Serialize};
use talentmatch_core::{JobRecord, RemotePolicy, ResumeRecord, Vector};

/// Constants of the experience, location and salary sub-scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Score lost per missing year below the minimum
    pub shortfall_penalty_per_year: f32,
    /// Score lost per year above the maximum
    pub overqualification_penalty_per_year: f32,
    /// Over-qualified candidates never score below this
    pub overqualification_floor: f32,
    pub hybrid_location_score: f32,
    pub same_region_score: f32,
    /// Penalty slope applied to the relative salary overage
    pub salary_overage_slope: f32,
    pub salary_max_penalty: f32,
    /// Missing maximum salary is estimated as `min * ratio`
    pub missing_max_salary_ratio: f64,
    /// Market demand and career growth when no signal is supplied
    pub neutral_signal: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            shortfall_penalty_per_year: 0.15,
            overqualification_penalty_per_year: 0.05,
            overqualification_floor: 0.7,
            hybrid_location_score: 0.8,
            same_region_score: 0.6,
            salary_overage_slope: 1.5,
            salary_max_penalty: 0.7,
            missing_max_salary_ratio: 1.2,
            neutral_signal: 0.5,
        }
    }
}

/// 1.0 inside the job's range. Under-qualification costs more per year than
/// over-qualification, which is also floored.
pub fn experience_score(config: &ScoringConfig, job: &JobRecord, resume: &ResumeRecord) -> f32 {
    let years = resume.experience_years;
    if years < job.min_experience_years {
        let gap = job.min_experience_years - years;
        (1.0 - gap * config.shortfall_penalty_per_year).max(0.0)
    } else if years > job.max_experience_years {
        let excess = years - job.max_experience_years;
        (1.0 - excess * config.overqualification_penalty_per_year).max(config.overqualification_floor)
    } else {
        1.0
    }
}

/// Remote jobs and same-city matches score 1.0; otherwise the better of the
/// hybrid and same-region partial scores, or 0.
pub fn location_score(config: &ScoringConfig, job: &JobRecord, resume: &ResumeRecord) -> f32 {
    if job.remote == RemotePolicy::Remote {
        return 1.0;
    }

    let job_loc = Place::parse(&job.location);
    let resume_loc = Place::parse(&resume.location);
    if job_loc.city.is_some() && job_loc.city == resume_loc.city {
        return 1.0;
    }

    let mut score: f32 = 0.0;
    if job.remote == RemotePolicy::Hybrid {
        score = score.max(config.hybrid_location_score);
    }
    if job_loc.region.is_some() && job_loc.region == resume_loc.region {
        score = score.max(config.same_region_score);
    }
    score
}

/// "City, Region, ..." split into lowercase parts
struct Place {
    city: Option<String>,
    region: Option<String>,
}

impl Place {
    fn parse(location: &str) -> Self {
        let mut parts = location
            .split(',')
            .map(|p| p.trim().to_lowercase())
            .map(|p| if p.is_empty() { None } else { Some(p) });
        Self {
            city: parts.next().flatten(),
            region: parts.next().flatten(),
        }
    }
}

/// At or below the job's maximum scores 1.0; above it the score drops with
/// the relative overage, never below `1 - salary_max_penalty`.
pub fn salary_score(config: &ScoringConfig, job: &JobRecord, resume: &ResumeRecord) -> f32 {
    let Some(expected) = resume.salary_expectation else {
        return 1.0;
    };
    let max = match (job.min_salary, job.max_salary) {
        (None, None) => return 1.0,
        (_, Some(max)) => max,
        (Some(min), None) => min * config.missing_max_salary_ratio,
    };

    if expected <= max {
        return 1.0;
    }
    let overage = if max > 0.0 {
        ((expected - max) / max) as f32
    } else {
        f32::INFINITY
    };
    1.0 - (overage * config.salary_overage_slope).min(config.salary_max_penalty)
}

/// Inner product of the stored embeddings rescaled from [-1, 1] to [0, 1]
pub fn semantic_score(job_vector: &Vector, resume_vector: &Vector) -> f32 {
    let similarity = job_vector.dot(resume_vector).clamp(-1.0, 1.0);
    (similarity + 1.0) / 2.0
}

/// An external per-job signal, clamped to [0, 1], or the neutral value
pub fn signal_score(config: &ScoringConfig, signal: Option<f32>) -> f32 {
    match signal {
        Some(v) if v.is_finite() => v.clamp(0.0, 1.0),
        _ => config.neutral_signal,
    }
}
