use crate::background::{BackgroundJobSystem, IndexRebuildJob};
use crate::collection::{CollectionConfig, CollectionStats, SearchOutcome, VectorCollection};
use crate::index::IndexMode;
use crate::{EmbeddingVector, EntityType, Error, Result, Vector};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Per-collection configuration. Both collections must share a dimension so
/// job and resume vectors stay comparable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub jobs: CollectionConfig,
    pub resumes: CollectionConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::uniform(CollectionConfig::default())
    }
}

impl StoreConfig {
    pub fn uniform(config: CollectionConfig) -> Self {
        Self {
            jobs: config.clone(),
            resumes: config,
        }
    }

    pub fn with_dim(dim: usize) -> Self {
        Self::uniform(CollectionConfig::with_dim(dim))
    }

    pub fn validate(&self) -> Result<()> {
        self.jobs.validate()?;
        self.resumes.validate()?;
        if self.jobs.dim != self.resumes.dim {
            return Err(Error::InvalidArgument(format!(
                "job and resume collections must share a dimension ({} != {})",
                self.jobs.dim, self.resumes.dim
            )));
        }
        Ok(())
    }
}

/// The job and resume collections.
pub struct VectorStore {
    jobs: Arc<VectorCollection>,
    resumes: Arc<VectorCollection>,
}

impl VectorStore {
    pub fn new(config: StoreConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            jobs: Arc::new(VectorCollection::new(EntityType::Job, config.jobs)?),
            resumes: Arc::new(VectorCollection::new(EntityType::Resume, config.resumes)?),
        })
    }

    pub fn dim(&self) -> usize {
        self.jobs.dim()
    }

    pub fn collection(&self, entity_type: EntityType) -> &Arc<VectorCollection> {
        match entity_type {
            EntityType::Job => &self.jobs,
            EntityType::Resume => &self.resumes,
        }
    }

    pub fn upsert(&self, entity_type: EntityType, id: &str, vector: Vector) -> Result<()> {
        self.upsert_embedding(EmbeddingVector::new(id, entity_type, vector))
    }

    pub fn upsert_embedding(&self, embedding: EmbeddingVector) -> Result<()> {
        self.collection(embedding.entity_type).upsert(embedding)
    }

    pub fn search(&self, entity_type: EntityType, query: &Vector, k: usize) -> Result<SearchOutcome> {
        self.collection(entity_type).search(query, k)
    }

    pub fn rebuild(&self, entity_type: EntityType) -> CollectionStats {
        self.collection(entity_type).rebuild()
    }

    pub fn remove(&self, entity_type: EntityType, id: &str) -> bool {
        self.collection(entity_type).remove(id)
    }

    pub fn get(&self, entity_type: EntityType, id: &str) -> Option<Arc<EmbeddingVector>> {
        self.collection(entity_type).get(id)
    }

    pub fn mode(&self, entity_type: EntityType) -> IndexMode {
        self.collection(entity_type).mode()
    }

    pub fn export(&self, entity_type: EntityType) -> Vec<EmbeddingVector> {
        self.collection(entity_type).export()
    }

    pub fn stats(&self) -> Vec<CollectionStats> {
        EntityType::ALL
            .iter()
            .map(|&entity_type| self.collection(entity_type).stats())
            .collect()
    }

    /// Submit a rebuild for every stale collection that has none queued.
    /// Returns the number of jobs submitted.
    pub fn schedule_stale_rebuilds(&self, system: &BackgroundJobSystem) -> usize {
        let mut scheduled = 0;
        for entity_type in EntityType::ALL {
            let collection = self.collection(entity_type);
            let Some(staleness) = collection.staleness() else {
                continue;
            };
            if !collection.try_claim_rebuild() {
                continue;
            }
            tracing::info!(
                entity_type = %entity_type,
                reason = %staleness.reason,
                current = staleness.current,
                "scheduling index rebuild"
            );
            if system.submit(Box::new(IndexRebuildJob::new(collection.clone()))) {
                scheduled += 1;
            } else {
                collection.release_rebuild_claim();
            }
        }
        scheduled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_mismatched_dimensions_rejected() {
        let config = StoreConfig {
            jobs: CollectionConfig::with_dim(4),
            resumes: CollectionConfig::with_dim(8),
        };
        assert!(VectorStore::new(config).is_err());
    }

    #[test]
    fn test_collections_are_separate() {
        let store = VectorStore::new(StoreConfig::with_dim(2)).unwrap();
        store.upsert(EntityType::Job, "j1", Vector::new(vec![1.0, 0.0])).unwrap();
        store.upsert(EntityType::Resume, "r1", Vector::new(vec![0.0, 1.0])).unwrap();

        let jobs = store.search(EntityType::Job, &Vector::new(vec![0.0, 1.0]), 5).unwrap();
        assert_eq!(jobs.hits.len(), 1);
        assert_eq!(jobs.hits[0].id, "j1");
        assert!(store.get(EntityType::Resume, "j1").is_none());
    }

    #[test]
    fn test_schedule_stale_rebuilds() {
        let mut config = CollectionConfig::with_dim(2);
        config.index.partition_threshold = 2;
        let store = VectorStore::new(StoreConfig::uniform(config)).unwrap();
        for i in 0..3 {
            store
                .upsert(EntityType::Job, &format!("j{}", i), Vector::new(vec![1.0, i as f32]))
                .unwrap();
        }

        let system = BackgroundJobSystem::start().unwrap();
        assert_eq!(store.schedule_stale_rebuilds(&system), 1);
        assert!(system.wait_idle(Duration::from_secs(5)));
        assert_eq!(store.mode(EntityType::Job), IndexMode::Partitioned);
        assert_eq!(store.mode(EntityType::Resume), IndexMode::Flat);
        assert_eq!(store.schedule_stale_rebuilds(&system), 0);
    }
}
