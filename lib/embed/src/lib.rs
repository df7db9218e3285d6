//! # TalentMatch Embed
//!
//! Turns job and resume records into embedding vectors.
//!
//! Records are first rendered to a canonical, marker-delimited text so that
//! jobs and resumes go through the same template family; the text is then
//! handed to an injected [`EmbeddingCapability`].

pub mod capability;
pub mod hashing;
pub mod normalizer;

pub use capability::EmbeddingCapability;
pub use hashing::{HashingConfig, HashingEmbedder};
pub use normalizer::{canonical_job_text, canonical_resume_text, EmbeddingNormalizer};
