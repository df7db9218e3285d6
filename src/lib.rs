//! # TalentMatch
//!
//! Job and candidate recommendation: records are rendered to canonical text,
//! embedded, indexed per entity type and matched with an explainable
//! weighted score.
//!
//! ## Quick Start
//!
//! ### From the command line
//!
//! ```bash
//! talentmatch --jobs data/jobs.json --resumes data/resumes.json --resume r1 -k 5
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use std::sync::Arc;
//! use talentmatch::prelude::*;
//!
//! let records = Arc::new(InMemoryRecords::new());
//! let engine = Recommender::new(
//!     EngineConfig::with_dim(128),
//!     Arc::new(HashingEmbedder::new(128)),
//!     records.clone(),
//! )
//! .unwrap();
//!
//! let job = JobRecord::new("j1", "Backend Engineer")
//!     .with_required_skills(["Rust", "SQL"])
//!     .with_experience(2.0, 6.0);
//! engine.ingest_job(&job).unwrap();
//! records.insert_job(job);
//!
//! let resume = ResumeRecord::new("r1", "Ada")
//!     .with_skills(["Rust", "SQL", "Kafka"])
//!     .with_experience(4.0);
//! let recs = engine
//!     .recommend(&RecommendationRequest::for_resume(resume, 10))
//!     .unwrap();
//!
//! for result in &recs.results {
//!     println!("{} {:.3} {:?}", result.job_id, result.score, result.explain().reasons);
//! }
//! ```
//!
//! ## Crate Structure
//!
//! - `talentmatch-core` - records, vectors, flat and partitioned indexes, the vector store
//! - `talentmatch-embed` - canonical text and the embedding capability
//! - `talentmatch-scoring` - skill matching, weight profiles, scoring and explanations
//! - `talentmatch-storage` - store snapshots
//! - `talentmatch-engine` - configuration and the recommendation orchestrator

// Re-export core types
pub use talentmatch_core::{
    BackgroundJobSystem, CareerStage, CollectionConfig, CollectionStats, EmbeddingVector,
    EntityType, Error, Filter, FilterCondition, IndexConfig, IndexMode, Industry, JobRecord,
    JobType, RecordFilter, RecordRef, RemotePolicy, Result, ResumeRecord, SearchHit,
    SearchOutcome, Staleness, StoreConfig, Vector, VectorStore,
};

// Re-export embedding
pub use talentmatch_embed::{
    canonical_job_text, canonical_resume_text, EmbeddingCapability, EmbeddingNormalizer,
    HashingEmbedder,
};

// Re-export scoring
pub use talentmatch_scoring::{
    Explanation, Factor, FactorWeights, JobSignals, MarketSignals, MatchResult, MatchStats,
    PreferenceOverrides, ScoringConfig, ScoringEngine, SkillMatcher, WeightProfile,
    WeightProfileResolver, WeightTables,
};

// Re-export storage
pub use talentmatch_storage::SnapshotManager;

// Re-export engine
pub use talentmatch_engine::{
    CancellationToken, ConfigError, Diagnostics, EngineConfig, InMemoryRecords, QueryEntity,
    RecommendationRequest, Recommendations, Recommender, RecordSource,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        EmbeddingCapability, EngineConfig, EntityType, Error, Factor, FilterCondition,
        HashingEmbedder, InMemoryRecords, JobRecord, JobSignals, MarketSignals, MatchResult,
        PreferenceOverrides, RecommendationRequest, Recommender, RecordFilter, RecordSource,
        RemotePolicy, Result, ResumeRecord, Vector, VectorStore,
    };
}

/// SIMD-optimized vector operations
pub mod simd {
    pub use talentmatch_core::simd::{dot_product, norm};
}
