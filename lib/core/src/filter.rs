// Hard filters applied to candidate records before scoring
use crate::record::{Industry, JobType, RecordRef};
use serde::{Deserialize, Serialize};

pub trait Filter: Send + Sync {
    fn matches(&self, record: RecordRef<'_>) -> bool;
}

/// Filter built from a [`FilterCondition`] tree
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordFilter {
    condition: FilterCondition,
}

/// A single hard constraint.
///
/// Conditions that only make sense for one record kind (job type, industry)
/// pass records of the other kind. Numeric conditions fail when the record
/// carries no value to compare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterCondition {
    /// City part of the location equals the given one (case-insensitive)
    LocationIs { location: String },
    /// Job allows remote or hybrid work / candidate leans towards remote
    RemoteAllowed,
    /// Job pays at least this much / candidate expects at least this much
    MinSalary { value: f64 },
    /// Job starts at most at this salary / candidate expects at most this much
    MaxSalary { value: f64 },
    /// Job is open to someone with this many years / candidate has at least this many
    MinExperience { years: f32 },
    /// Job requires at most this many years / candidate has at most this many
    MaxExperience { years: f32 },
    JobTypeIs { job_type: JobType },
    IndustryIs { industry: Industry },
    HasSkill { skill: String },
    ExcludeIds { ids: Vec<String> },
    And(Vec<FilterCondition>),
    Or(Vec<FilterCondition>),
    Not(Box<FilterCondition>),
}

impl RecordFilter {
    pub fn new(condition: FilterCondition) -> Self {
        Self { condition }
    }

    /// All of the given conditions must hold.
    pub fn all(conditions: Vec<FilterCondition>) -> Self {
        Self::new(FilterCondition::And(conditions))
    }

    pub fn condition(&self) -> &FilterCondition {
        &self.condition
    }

    fn city(location: &str) -> String {
        location
            .split(',')
            .next()
            .unwrap_or("")
            .trim()
            .to_lowercase()
    }

    fn matches_condition(condition: &FilterCondition, record: RecordRef<'_>) -> bool {
        match condition {
            FilterCondition::LocationIs { location } => {
                let wanted = Self::city(location);
                let actual = match record {
                    RecordRef::Job(job) => Self::city(&job.location),
                    RecordRef::Resume(resume) => Self::city(&resume.location),
                };
                !wanted.is_empty() && wanted == actual
            }
            FilterCondition::RemoteAllowed => match record {
                RecordRef::Job(job) => job.remote.allows_remote(),
                RecordRef::Resume(resume) => resume.remote_preference >= 0.5,
            },
            FilterCondition::MinSalary { value } => match record {
                RecordRef::Job(job) => job
                    .max_salary
                    .or(job.min_salary)
                    .map(|top| top >= *value)
                    .unwrap_or(false),
                RecordRef::Resume(resume) => resume
                    .salary_expectation
                    .map(|s| s >= *value)
                    .unwrap_or(false),
            },
            FilterCondition::MaxSalary { value } => match record {
                RecordRef::Job(job) => job
                    .min_salary
                    .or(job.max_salary)
                    .map(|bottom| bottom <= *value)
                    .unwrap_or(false),
                RecordRef::Resume(resume) => resume
                    .salary_expectation
                    .map(|s| s <= *value)
                    .unwrap_or(false),
            },
            FilterCondition::MinExperience { years } => match record {
                RecordRef::Job(job) => job.max_experience_years >= *years,
                RecordRef::Resume(resume) => resume.experience_years >= *years,
            },
            FilterCondition::MaxExperience { years } => match record {
                RecordRef::Job(job) => job.min_experience_years <= *years,
                RecordRef::Resume(resume) => resume.experience_years <= *years,
            },
            FilterCondition::JobTypeIs { job_type } => match record {
                RecordRef::Job(job) => job.job_type == *job_type,
                RecordRef::Resume(_) => true,
            },
            FilterCondition::IndustryIs { industry } => match record {
                RecordRef::Job(job) => job.industry() == *industry,
                RecordRef::Resume(_) => true,
            },
            FilterCondition::HasSkill { skill } => {
                let wanted = skill.trim().to_lowercase();
                let has = |skills: &std::collections::BTreeSet<String>| {
                    skills.iter().any(|s| s.trim().to_lowercase() == wanted)
                };
                match record {
                    RecordRef::Job(job) => has(&job.required_skills) || has(&job.preferred_skills),
                    RecordRef::Resume(resume) => has(&resume.skills),
                }
            }
            FilterCondition::ExcludeIds { ids } => !ids.iter().any(|id| id == record.id()),
            FilterCondition::And(conditions) => conditions
                .iter()
                .all(|c| Self::matches_condition(c, record)),
            FilterCondition::Or(conditions) => conditions
                .iter()
                .any(|c| Self::matches_condition(c, record)),
            FilterCondition::Not(condition) => !Self::matches_condition(condition, record),
        }
    }
}

impl Filter for RecordFilter {
    fn matches(&self, record: RecordRef<'_>) -> bool {
        Self::matches_condition(&self.condition, record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{JobRecord, RemotePolicy, ResumeRecord};

    fn job() -> JobRecord {
        JobRecord::new("j1", "Backend Engineer")
            .with_location("Berlin, BE, Germany", RemotePolicy::OnSite)
            .with_salary(Some(60_000.0), Some(80_000.0))
            .with_required_skills(["Rust", "SQL"])
    }

    #[test]
    fn test_location_matches_city_part() {
        let filter = RecordFilter::new(FilterCondition::LocationIs {
            location: "berlin".into(),
        });
        assert!(filter.matches(RecordRef::Job(&job())));

        let resume = ResumeRecord::new("r1", "Ada").with_location("Munich, BY");
        assert!(!filter.matches(RecordRef::Resume(&resume)));
    }

    #[test]
    fn test_salary_bounds() {
        let j = job();
        let min = RecordFilter::new(FilterCondition::MinSalary { value: 75_000.0 });
        let too_high = RecordFilter::new(FilterCondition::MinSalary { value: 90_000.0 });
        assert!(min.matches(RecordRef::Job(&j)));
        assert!(!too_high.matches(RecordRef::Job(&j)));

        let no_salary = JobRecord::new("j2", "Engineer");
        assert!(!min.matches(RecordRef::Job(&no_salary)));
    }

    #[test]
    fn test_job_only_condition_passes_resumes() {
        let filter = RecordFilter::new(FilterCondition::JobTypeIs {
            job_type: JobType::Contract,
        });
        let resume = ResumeRecord::new("r1", "Ada");
        assert!(filter.matches(RecordRef::Resume(&resume)));
        assert!(!filter.matches(RecordRef::Job(&job())));
    }

    #[test]
    fn test_boolean_combinators() {
        let j = job();
        let filter = RecordFilter::all(vec![
            FilterCondition::HasSkill { skill: "rust".into() },
            FilterCondition::Not(Box::new(FilterCondition::RemoteAllowed)),
            FilterCondition::Or(vec![
                FilterCondition::ExcludeIds { ids: vec!["j1".into()] },
                FilterCondition::MaxExperience { years: 3.0 },
            ]),
        ]);
        assert!(filter.matches(RecordRef::Job(&j)));

        let excluded = RecordFilter::new(FilterCondition::ExcludeIds { ids: vec!["j1".into()] });
        assert!(!excluded.matches(RecordRef::Job(&j)));
    }

    #[test]
    fn test_serde_shape() {
        let filter: RecordFilter =
            serde_json::from_str(r#"{"and": [{"min_salary": {"value": 50000.0}}, "remote_allowed"]}"#)
                .unwrap();
        assert!(matches!(filter.condition(), FilterCondition::And(c) if c.len() == 2));
    }
}
