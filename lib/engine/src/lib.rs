//! # TalentMatch Engine
//!
//! The recommendation orchestrator: embeds a query record, retrieves
//! oversampled candidates from the opposite collection, applies hard
//! filters, re-scores and ranks.
//!
//! ```rust
//! use std::sync::Arc;
//! use talentmatch_core::{JobRecord, ResumeRecord};
//! use talentmatch_embed::HashingEmbedder;
//! use talentmatch_engine::{EngineConfig, InMemoryRecords, RecommendationRequest, Recommender};
//!
//! let records = Arc::new(InMemoryRecords::new());
//! let engine = Recommender::new(
//!     EngineConfig::with_dim(64),
//!     Arc::new(HashingEmbedder::new(64)),
//!     records.clone(),
//! )
//! .unwrap();
//!
//! let job = JobRecord::new("j1", "Data Engineer").with_required_skills(["Python"]);
//! engine.ingest_job(&job).unwrap();
//! records.insert_job(job);
//!
//! let resume = ResumeRecord::new("r1", "Kim").with_skills(["Python"]);
//! let recs = engine
//!     .recommend(&RecommendationRequest::for_resume(resume, 5))
//!     .unwrap();
//! assert_eq!(recs.results[0].job_id, "j1");
//! ```

pub mod cancel;
pub mod config;
pub mod records;
pub mod recommend;

pub use cancel::CancellationToken;
pub use config::{ConfigError, EngineConfig};
pub use records::{InMemoryRecords, RecordSource};
pub use recommend::{
    Diagnostics, QueryEntity, RecommendationRequest, Recommendations, Recommender,
};
