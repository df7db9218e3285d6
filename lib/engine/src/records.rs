// Lookup of full records for candidates returned by vector search
use ahash::AHashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use talentmatch_core::{EntityType, JobRecord, ResumeRecord};

/// Where the orchestrator fetches the records behind search hits.
///
/// Implemented by whatever owns ingestion; [`InMemoryRecords`] is the
/// in-process variant.
pub trait RecordSource: Send + Sync {
    fn job(&self, id: &str) -> Option<Arc<JobRecord>>;
    fn resume(&self, id: &str) -> Option<Arc<ResumeRecord>>;
}

impl<T: RecordSource + ?Sized> RecordSource for Arc<T> {
    fn job(&self, id: &str) -> Option<Arc<JobRecord>> {
        (**self).job(id)
    }

    fn resume(&self, id: &str) -> Option<Arc<ResumeRecord>> {
        (**self).resume(id)
    }
}

#[derive(Default)]
pub struct InMemoryRecords {
    jobs: RwLock<AHashMap<String, Arc<JobRecord>>>,
    resumes: RwLock<AHashMap<String, Arc<ResumeRecord>>>,
}

impl InMemoryRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record previously stored under the same id
    pub fn insert_job(&self, job: JobRecord) -> Option<Arc<JobRecord>> {
        self.jobs.write().insert(job.id.clone(), Arc::new(job))
    }

    pub fn insert_resume(&self, resume: ResumeRecord) -> Option<Arc<ResumeRecord>> {
        self.resumes.write().insert(resume.id.clone(), Arc::new(resume))
    }

    pub fn remove(&self, entity_type: EntityType, id: &str) -> bool {
        match entity_type {
            EntityType::Job => self.jobs.write().remove(id).is_some(),
            EntityType::Resume => self.resumes.write().remove(id).is_some(),
        }
    }

    pub fn len(&self, entity_type: EntityType) -> usize {
        match entity_type {
            EntityType::Job => self.jobs.read().len(),
            EntityType::Resume => self.resumes.read().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.read().is_empty() && self.resumes.read().is_empty()
    }
}

impl RecordSource for InMemoryRecords {
    fn job(&self, id: &str) -> Option<Arc<JobRecord>> {
        self.jobs.read().get(id).cloned()
    }

    fn resume(&self, id: &str) -> Option<Arc<ResumeRecord>> {
        self.resumes.read().get(id).cloned()
    }
}
