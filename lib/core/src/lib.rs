//! # TalentMatch Core
//!
//! Shared data model and vector storage for the TalentMatch engine.
//!
//! - [`JobRecord`] / [`ResumeRecord`] - structured entities from ingestion
//! - [`Vector`] - dense vector with SIMD inner product
//! - [`VectorStore`] - job and resume collections with copy-on-write indexes
//! - [`SearchIndex`] - exact flat scan or trained partitioned index
//! - [`RecordFilter`] - hard eligibility filters
//!
//! ## Example
//!
//! ```rust
//! use talentmatch_core::{EntityType, StoreConfig, Vector, VectorStore};
//!
//! let store = VectorStore::new(StoreConfig::with_dim(3)).unwrap();
//! store.upsert(EntityType::Job, "j1", Vector::new(vec![1.0, 0.0, 0.0])).unwrap();
//!
//! let outcome = store
//!     .search(EntityType::Job, &Vector::new(vec![1.0, 0.0, 0.0]), 10)
//!     .unwrap();
//! assert_eq!(outcome.hits[0].id, "j1");
//! ```

pub mod background;
pub mod collection;
pub mod error;
pub mod filter;
pub mod index;
pub mod record;
pub mod store;
pub mod vector;

/// SIMD-accelerated inner product (AVX2/FMA on x86_64, scalar elsewhere)
pub mod simd;

pub use background::{BackgroundJob, BackgroundJobSystem, BackgroundJobType, IndexRebuildJob};
pub use collection::{
    CollectionConfig, CollectionStats, IndexSnapshot, SearchOutcome, StaleReason, Staleness,
    VectorCollection,
};
pub use error::{Error, Result};
pub use filter::{Filter, FilterCondition, RecordFilter};
pub use index::{
    FlatIndex, IndexConfig, IndexMode, PartitionedIndex, SearchHit, SearchIndex, VectorIndex,
};
pub use record::{
    CareerStage, EmbeddingVector, EntityType, Industry, JobRecord, JobType, RecordRef,
    RemotePolicy, ResumeRecord,
};
pub use store::{StoreConfig, VectorStore};
pub use vector::Vector;
