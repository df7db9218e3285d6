//! Canonical text rendering and embedding of records.

use crate::EmbeddingCapability;
use std::collections::BTreeSet;
use std::sync::Arc;
use talentmatch_core::{EmbeddingVector, Error, JobRecord, RecordRef, Result, ResumeRecord, Vector};

const FIELD_SEPARATOR: &str = " | ";

/// Canonical text of a job:
/// `Job Title: .. | Company: .. | Required Skills: .. | Preferred Skills: .. | Description: ..`
pub fn canonical_job_text(job: &JobRecord) -> String {
    [
        field("Job Title", &collapse(&job.title)),
        field("Company", &collapse(&job.company)),
        field("Required Skills", &skill_list(&job.required_skills)),
        field("Preferred Skills", &skill_list(&job.preferred_skills)),
        field("Description", &collapse(&job.description)),
    ]
    .join(FIELD_SEPARATOR)
}

/// Canonical text of a resume:
/// `Name: .. | Current Role: .. | Skills: .. | Experience: N years | Summary: ..`
pub fn canonical_resume_text(resume: &ResumeRecord) -> String {
    [
        field("Name", &collapse(&resume.name)),
        field("Current Role", &collapse(&resume.current_role)),
        field("Skills", &skill_list(&resume.skills)),
        field("Experience", &format!("{} years", resume.experience_years)),
        field("Summary", &collapse(&resume.summary)),
    ]
    .join(FIELD_SEPARATOR)
}

fn field(marker: &str, value: &str) -> String {
    format!("{}: {}", marker, value)
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Sorted case-insensitively, one entry per case-folded skill
fn skill_list(skills: &BTreeSet<String>) -> String {
    let mut cleaned: Vec<String> = skills
        .iter()
        .map(|s| collapse(s))
        .filter(|s| !s.is_empty())
        .collect();
    cleaned.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));
    cleaned.dedup_by(|a, b| a.to_lowercase() == b.to_lowercase());
    cleaned.join(", ")
}

/// Renders records to canonical text and embeds them with one capability.
///
/// The capability is called once per record with no retry or caching.
#[derive(Clone)]
pub struct EmbeddingNormalizer {
    capability: Arc<dyn EmbeddingCapability>,
}

impl EmbeddingNormalizer {
    pub fn new(capability: Arc<dyn EmbeddingCapability>) -> Self {
        Self { capability }
    }

    pub fn dimensions(&self) -> usize {
        self.capability.dimensions()
    }

    pub fn model_name(&self) -> &str {
        self.capability.model_name()
    }

    /// Validate the record and render its canonical text.
    pub fn normalize(&self, record: RecordRef<'_>) -> Result<String> {
        record.validate()?;
        Ok(match record {
            RecordRef::Job(job) => canonical_job_text(job),
            RecordRef::Resume(resume) => canonical_resume_text(resume),
        })
    }

    pub fn embed(&self, text: &str) -> Result<Vector> {
        let values = self.capability.embed(text)?;
        let expected = self.capability.dimensions();
        if values.len() != expected {
            return Err(Error::InvalidDimension {
                expected,
                actual: values.len(),
            });
        }
        let vector = Vector::new(values);
        if !vector.is_finite() {
            return Err(Error::EmbeddingCapability(format!(
                "{} returned non-finite values",
                self.capability.model_name()
            )));
        }
        Ok(vector)
    }

    pub fn embed_record(&self, record: RecordRef<'_>) -> Result<EmbeddingVector> {
        let text = self.normalize(record)?;
        let vector = self.embed(&text)?;
        tracing::debug!(
            entity_type = %record.entity_type(),
            id = record.id(),
            chars = text.len(),
            "embedded record"
        );
        Ok(EmbeddingVector::new(record.id(), record.entity_type(), vector))
    }

    pub fn embed_job(&self, job: &JobRecord) -> Result<EmbeddingVector> {
        self.embed_record(RecordRef::Job(job))
    }

    pub fn embed_resume(&self, resume: &ResumeRecord) -> Result<EmbeddingVector> {
        self.embed_record(RecordRef::Resume(resume))
    }
}

impl std::fmt::Debug for EmbeddingNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingNormalizer")
            .field("model", &self.capability.model_name())
            .field("dimensions", &self.capability.dimensions())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HashingEmbedder;
    use talentmatch_core::EntityType;

    struct Failing;

    impl EmbeddingCapability for Failing {
        fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(Error::EmbeddingCapability("backend unavailable".into()))
        }

        fn dimensions(&self) -> usize {
            8
        }

        fn model_name(&self) -> &str {
            "failing"
        }
    }

    struct WrongSize;

    impl EmbeddingCapability for WrongSize {
        fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0; 3])
        }

        fn dimensions(&self) -> usize {
            8
        }

        fn model_name(&self) -> &str {
            "wrong-size"
        }
    }

    fn job() -> JobRecord {
        JobRecord::new("j1", "Backend  Engineer")
            .with_company("Acme")
            .with_required_skills(["sql", "Python", "Docker"])
            .with_preferred_skills(["Kubernetes"])
            .with_description("Build   services.")
    }

    #[test]
    fn test_job_text_layout() {
        assert_eq!(
            canonical_job_text(&job()),
            "Job Title: Backend Engineer | Company: Acme | Required Skills: Docker, Python, sql \
             | Preferred Skills: Kubernetes | Description: Build services."
        );
    }

    #[test]
    fn test_resume_text_layout() {
        let resume = ResumeRecord::new("r1", "Ada")
            .with_role("Engineer")
            .with_skills(["rust", "Go"])
            .with_experience(5.0)
            .with_summary("Systems person");
        assert_eq!(
            canonical_resume_text(&resume),
            "Name: Ada | Current Role: Engineer | Skills: Go, rust | Experience: 5 years \
             | Summary: Systems person"
        );
    }

    #[test]
    fn test_skills_deduplicated_case_insensitively() {
        let skills: BTreeSet<String> = ["python", "Python", " SQL "].iter().map(|s| s.to_string()).collect();
        assert_eq!(skill_list(&skills), "Python, SQL");
    }

    #[test]
    fn test_canonical_text_is_deterministic() {
        let normalizer = EmbeddingNormalizer::new(Arc::new(HashingEmbedder::new(32)));
        let first = normalizer.normalize(RecordRef::Job(&job())).unwrap();
        let second = normalizer.normalize(RecordRef::Job(&job())).unwrap();
        assert_eq!(first, second);

        let a = normalizer.embed_job(&job()).unwrap();
        let b = normalizer.embed_job(&job()).unwrap();
        assert_eq!(a.vector, b.vector);
        assert_eq!(a.entity_type, EntityType::Job);
    }

    #[test]
    fn test_invalid_record_rejected() {
        let normalizer = EmbeddingNormalizer::new(Arc::new(HashingEmbedder::new(32)));
        let empty = JobRecord::new("j2", "");
        assert!(matches!(
            normalizer.embed_job(&empty),
            Err(Error::InvalidRecord(_))
        ));
    }

    #[test]
    fn test_capability_errors_pass_through() {
        let normalizer = EmbeddingNormalizer::new(Arc::new(Failing));
        assert!(matches!(
            normalizer.embed_job(&job()),
            Err(Error::EmbeddingCapability(msg)) if msg == "backend unavailable"
        ));
    }

    #[test]
    fn test_wrong_dimension_rejected() {
        let normalizer = EmbeddingNormalizer::new(Arc::new(WrongSize));
        assert!(matches!(
            normalizer.embed("text"),
            Err(Error::InvalidDimension { expected: 8, actual: 3 })
        ));
    }
}
