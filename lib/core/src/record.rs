//! Structured job and resume records as handed over by the ingestion layer.

use crate::{Error, Result, Vector};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Which collection an entity lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Job,
    Resume,
}

impl EntityType {
    pub const ALL: [EntityType; 2] = [EntityType::Job, EntityType::Resume];

    /// The collection a query of this type is matched against.
    pub fn opposite(self) -> Self {
        match self {
            EntityType::Job => EntityType::Resume,
            EntityType::Resume => EntityType::Job,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Job => "job",
            EntityType::Resume => "resume",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Freelance,
}

/// Where the work happens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RemotePolicy {
    #[default]
    OnSite,
    Hybrid,
    Remote,
}

impl RemotePolicy {
    pub fn allows_remote(self) -> bool {
        !matches!(self, RemotePolicy::OnSite)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Industry {
    Technology,
    Finance,
    Healthcare,
    Marketing,
    Education,
    Manufacturing,
    Retail,
    Consulting,
    Startup,
    Enterprise,
    General,
}

const TECHNOLOGY_KEYWORDS: &[&str] = &[
    "software", "developer", "engineer", "programmer", "tech", "data scientist", "ai", "ml",
];
const FINANCE_KEYWORDS: &[&str] = &[
    "finance", "banking", "investment", "trading", "analyst", "accountant", "audit",
];
const HEALTHCARE_KEYWORDS: &[&str] = &[
    "health", "medical", "nurse", "doctor", "pharmaceutical", "clinical", "patient",
];
const STARTUP_KEYWORDS: &[&str] = &[
    "startup", "scale-up", "venture", "funding", "series a", "series b",
];
const ENTERPRISE_KEYWORDS: &[&str] = &[
    "enterprise", "corporate", "fortune 500", "multinational", "global",
];

impl Industry {
    pub fn as_str(self) -> &'static str {
        match self {
            Industry::Technology => "technology",
            Industry::Finance => "finance",
            Industry::Healthcare => "healthcare",
            Industry::Marketing => "marketing",
            Industry::Education => "education",
            Industry::Manufacturing => "manufacturing",
            Industry::Retail => "retail",
            Industry::Consulting => "consulting",
            Industry::Startup => "startup",
            Industry::Enterprise => "enterprise",
            Industry::General => "general",
        }
    }

    /// Keyword detection over job text. Title and description decide the
    /// functional industries; company name and description decide the
    /// organisational ones. Falls back to `General`.
    pub fn detect(title: &str, company: &str, description: &str) -> Self {
        let title = normalize_text(title);
        let company = normalize_text(company);
        let description = normalize_text(description);

        let in_role = |keywords: &[&str]| {
            keywords
                .iter()
                .any(|kw| contains_keyword(&title, kw) || contains_keyword(&description, kw))
        };
        let in_org = |keywords: &[&str]| {
            keywords
                .iter()
                .any(|kw| contains_keyword(&company, kw) || contains_keyword(&description, kw))
        };

        if in_role(TECHNOLOGY_KEYWORDS) {
            Industry::Technology
        } else if in_role(FINANCE_KEYWORDS) {
            Industry::Finance
        } else if in_role(HEALTHCARE_KEYWORDS) {
            Industry::Healthcare
        } else if in_org(STARTUP_KEYWORDS) {
            Industry::Startup
        } else if in_org(ENTERPRISE_KEYWORDS) {
            Industry::Enterprise
        } else {
            Industry::General
        }
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Industry {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let industry = match s.trim().to_ascii_lowercase().as_str() {
            "technology" | "tech" => Industry::Technology,
            "finance" => Industry::Finance,
            "healthcare" => Industry::Healthcare,
            "marketing" => Industry::Marketing,
            "education" => Industry::Education,
            "manufacturing" => Industry::Manufacturing,
            "retail" => Industry::Retail,
            "consulting" => Industry::Consulting,
            "startup" => Industry::Startup,
            "enterprise" => Industry::Enterprise,
            "general" | "default" => Industry::General,
            other => return Err(Error::InvalidArgument(format!("unknown industry '{}'", other))),
        };
        Ok(industry)
    }
}

/// Lowercase, with every non-alphanumeric run collapsed to one space.
fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push(' ');
    for c in text.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else if !out.ends_with(' ') {
            out.push(' ');
        }
    }
    if !out.ends_with(' ') {
        out.push(' ');
    }
    out
}

fn contains_keyword(normalized: &str, keyword: &str) -> bool {
    let needle = normalize_text(keyword);
    normalized.contains(&needle)
}

/// Career stage derived from years of experience
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareerStage {
    Entry,
    Mid,
    Senior,
    Executive,
}

impl CareerStage {
    /// entry < 2, mid 2-6, senior 7-11, executive 12+
    pub fn from_experience(years: f32) -> Self {
        if years < 2.0 {
            CareerStage::Entry
        } else if years < 7.0 {
            CareerStage::Mid
        } else if years < 12.0 {
            CareerStage::Senior
        } else {
            CareerStage::Executive
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CareerStage::Entry => "entry",
            CareerStage::Mid => "mid",
            CareerStage::Senior => "senior",
            CareerStage::Executive => "executive",
        }
    }
}

impl fmt::Display for CareerStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_max_experience() -> f32 {
    10.0
}

fn default_remote_preference() -> f32 {
    0.5
}

/// A job posting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub job_type: JobType,
    #[serde(default)]
    pub required_skills: BTreeSet<String>,
    #[serde(default)]
    pub preferred_skills: BTreeSet<String>,
    #[serde(default)]
    pub min_experience_years: f32,
    #[serde(default = "default_max_experience")]
    pub max_experience_years: f32,
    #[serde(default)]
    pub min_salary: Option<f64>,
    #[serde(default)]
    pub max_salary: Option<f64>,
    #[serde(default)]
    pub remote: RemotePolicy,
    #[serde(default)]
    pub description: String,
    /// Explicit industry tag; derived from the text when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<Industry>,
}

impl JobRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            company: String::new(),
            location: String::new(),
            job_type: JobType::default(),
            required_skills: BTreeSet::new(),
            preferred_skills: BTreeSet::new(),
            min_experience_years: 0.0,
            max_experience_years: default_max_experience(),
            min_salary: None,
            max_salary: None,
            remote: RemotePolicy::default(),
            description: String::new(),
            industry: None,
        }
    }

    #[must_use]
    pub fn with_required_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_skills = skills.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_preferred_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferred_skills = skills.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_experience(mut self, min: f32, max: f32) -> Self {
        self.min_experience_years = min;
        self.max_experience_years = max;
        self
    }

    #[must_use]
    pub fn with_salary(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_salary = min;
        self.max_salary = max;
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>, remote: RemotePolicy) -> Self {
        self.location = location.into();
        self.remote = remote;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    #[must_use]
    pub fn with_industry(mut self, industry: Industry) -> Self {
        self.industry = Some(industry);
        self
    }

    /// Provided industry tag, or one detected from title, company and description.
    pub fn industry(&self) -> Industry {
        self.industry
            .unwrap_or_else(|| Industry::detect(&self.title, &self.company, &self.description))
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::InvalidRecord("job id is empty".into()));
        }
        if self.title.trim().is_empty()
            && !has_skill(&self.required_skills)
            && self.description.trim().is_empty()
        {
            return Err(Error::InvalidRecord(format!(
                "job '{}' needs a title, required skills or a description",
                self.id
            )));
        }
        check_range(
            &self.id,
            "experience",
            self.min_experience_years as f64,
            self.max_experience_years as f64,
        )?;
        check_optional_range(&self.id, "salary", self.min_salary, self.max_salary)
    }
}

/// A candidate resume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub current_role: String,
    #[serde(default)]
    pub skills: BTreeSet<String>,
    #[serde(default)]
    pub experience_years: f32,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub salary_expectation: Option<f64>,
    /// 0 = on-site only, 1 = remote only
    #[serde(default = "default_remote_preference")]
    pub remote_preference: f32,
    #[serde(default)]
    pub summary: String,
}

impl ResumeRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            current_role: String::new(),
            skills: BTreeSet::new(),
            experience_years: 0.0,
            location: String::new(),
            salary_expectation: None,
            remote_preference: default_remote_preference(),
            summary: String::new(),
        }
    }

    #[must_use]
    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_experience(mut self, years: f32) -> Self {
        self.experience_years = years;
        self
    }

    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.current_role = role.into();
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    #[must_use]
    pub fn with_salary_expectation(mut self, salary: f64) -> Self {
        self.salary_expectation = Some(salary);
        self
    }

    #[must_use]
    pub fn with_remote_preference(mut self, preference: f32) -> Self {
        self.remote_preference = preference;
        self
    }

    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn career_stage(&self) -> CareerStage {
        CareerStage::from_experience(self.experience_years)
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::InvalidRecord("resume id is empty".into()));
        }
        if self.current_role.trim().is_empty()
            && !has_skill(&self.skills)
            && self.summary.trim().is_empty()
        {
            return Err(Error::InvalidRecord(format!(
                "resume '{}' needs a current role, skills or a summary",
                self.id
            )));
        }
        if !self.experience_years.is_finite() || self.experience_years < 0.0 {
            return Err(Error::InvalidRecord(format!(
                "resume '{}' has invalid experience {}",
                self.id, self.experience_years
            )));
        }
        if let Some(salary) = self.salary_expectation {
            if !salary.is_finite() || salary < 0.0 {
                return Err(Error::InvalidRecord(format!(
                    "resume '{}' has invalid salary expectation {}",
                    self.id, salary
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.remote_preference) {
            return Err(Error::InvalidRecord(format!(
                "resume '{}' remote preference {} outside [0, 1]",
                self.id, self.remote_preference
            )));
        }
        Ok(())
    }
}

fn has_skill(skills: &BTreeSet<String>) -> bool {
    skills.iter().any(|s| !s.trim().is_empty())
}

fn check_range(id: &str, what: &str, min: f64, max: f64) -> Result<()> {
    if !min.is_finite() || !max.is_finite() || min < 0.0 || max < 0.0 {
        return Err(Error::InvalidRecord(format!(
            "job '{}' has negative or non-finite {} bounds",
            id, what
        )));
    }
    if min > max {
        return Err(Error::InvalidRecord(format!(
            "job '{}' {} minimum {} exceeds maximum {}",
            id, what, min, max
        )));
    }
    Ok(())
}

fn check_optional_range(id: &str, what: &str, min: Option<f64>, max: Option<f64>) -> Result<()> {
    match (min, max) {
        (Some(min), Some(max)) => check_range(id, what, min, max),
        (Some(v), None) | (None, Some(v)) => check_range(id, what, v, v),
        (None, None) => Ok(()),
    }
}

/// Borrowed view over either record kind
#[derive(Debug, Clone, Copy)]
pub enum RecordRef<'a> {
    Job(&'a JobRecord),
    Resume(&'a ResumeRecord),
}

impl<'a> RecordRef<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            RecordRef::Job(job) => &job.id,
            RecordRef::Resume(resume) => &resume.id,
        }
    }

    pub fn entity_type(&self) -> EntityType {
        match self {
            RecordRef::Job(_) => EntityType::Job,
            RecordRef::Resume(_) => EntityType::Resume,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            RecordRef::Job(job) => job.validate(),
            RecordRef::Resume(resume) => resume.validate(),
        }
    }
}

/// A vectorized entity, as stored by the vector store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingVector {
    pub entity_id: String,
    pub entity_type: EntityType,
    pub vector: Vector,
    pub generated_at: DateTime<Utc>,
}

impl EmbeddingVector {
    pub fn new(entity_id: impl Into<String>, entity_type: EntityType, vector: Vector) -> Self {
        Self {
            entity_id: entity_id.into(),
            entity_type,
            vector,
            generated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_career_stage_thresholds() {
        assert_eq!(CareerStage::from_experience(0.0), CareerStage::Entry);
        assert_eq!(CareerStage::from_experience(1.9), CareerStage::Entry);
        assert_eq!(CareerStage::from_experience(2.0), CareerStage::Mid);
        assert_eq!(CareerStage::from_experience(6.0), CareerStage::Mid);
        assert_eq!(CareerStage::from_experience(7.0), CareerStage::Senior);
        assert_eq!(CareerStage::from_experience(11.0), CareerStage::Senior);
        assert_eq!(CareerStage::from_experience(12.0), CareerStage::Executive);
    }

    #[test]
    fn test_industry_detection() {
        assert_eq!(
            Industry::detect("Senior Software Engineer", "Acme", ""),
            Industry::Technology
        );
        assert_eq!(
            Industry::detect("Registered Nurse", "City Hospital", "patient care"),
            Industry::Healthcare
        );
        assert_eq!(
            Industry::detect("Office Manager", "Global Corp", "a multinational company"),
            Industry::Enterprise
        );
        // "ai" must match a word, not a substring of "maintain"
        assert_eq!(
            Industry::detect("Groundskeeper", "Parks", "maintain the gardens"),
            Industry::General
        );
    }

    #[test]
    fn test_provided_industry_wins() {
        let job = JobRecord::new("j1", "Software Engineer").with_industry(Industry::Finance);
        assert_eq!(job.industry(), Industry::Finance);
    }

    #[test]
    fn test_job_validation() {
        assert!(JobRecord::new("j1", "Engineer").validate().is_ok());
        assert!(matches!(
            JobRecord::new("", "Engineer").validate(),
            Err(Error::InvalidRecord(_))
        ));
        assert!(matches!(
            JobRecord::new("j1", "").validate(),
            Err(Error::InvalidRecord(_))
        ));
        assert!(JobRecord::new("j1", "")
            .with_required_skills(["Rust"])
            .validate()
            .is_ok());
        assert!(JobRecord::new("j1", "Engineer")
            .with_experience(5.0, 3.0)
            .validate()
            .is_err());
        assert!(JobRecord::new("j1", "Engineer")
            .with_salary(Some(90_000.0), Some(80_000.0))
            .validate()
            .is_err());
    }

    #[test]
    fn test_resume_validation() {
        let resume = ResumeRecord::new("r1", "Ada").with_skills(["Rust"]);
        assert!(resume.validate().is_ok());
        assert!(ResumeRecord::new("r1", "Ada").validate().is_err());
        assert!(resume.clone().with_experience(-1.0).validate().is_err());
        assert!(resume.with_remote_preference(1.5).validate().is_err());
    }

    #[test]
    fn test_record_serde_defaults() {
        let job: JobRecord = serde_json::from_str(
            r#"{"id": "j1", "title": "Data Engineer", "required_skills": ["SQL", "Python"], "remote": "hybrid"}"#,
        )
        .unwrap();
        assert_eq!(job.remote, RemotePolicy::Hybrid);
        assert_eq!(job.max_experience_years, 10.0);
        assert_eq!(job.required_skills.len(), 2);
    }
}
