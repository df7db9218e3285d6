//! Feature-hashing embedder.
//!
//! Character trigrams and whole words are hashed into a fixed number of
//! buckets and the result is L2-normalized. No model, no I/O: suitable for
//! tests, demos and as a deterministic fallback backend.

use crate::EmbeddingCapability;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use talentmatch_core::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashingConfig {
    pub dim: usize,
    /// Weight of a whole word relative to a trigram
    pub word_weight: f32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            dim: 256,
            word_weight: 2.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    config: HashingConfig,
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Self {
        Self::with_config(HashingConfig {
            dim,
            ..HashingConfig::default()
        })
    }

    pub fn with_config(config: HashingConfig) -> Self {
        Self { config }
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::with_config(HashingConfig::default())
    }
}

impl EmbeddingCapability for HashingEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let dim = self.config.dim;
        if dim == 0 {
            return Err(Error::EmbeddingCapability("hashing embedder configured with zero dimensions".into()));
        }

        let mut vector = vec![0.0f32; dim];
        let normalized = text.to_lowercase();

        for trigram in trigrams(&normalized) {
            vector[bucket(&trigram, dim)] += 1.0;
        }
        // Words contribute more
        for word in normalized.split_whitespace() {
            vector[bucket(word, dim)] += self.config.word_weight;
        }

        let magnitude = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for v in &mut vector {
                *v /= magnitude;
            }
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.config.dim
    }

    fn model_name(&self) -> &str {
        "hashing-trigram"
    }
}

// Ordered so bucket accumulation happens in the same sequence every run
fn trigrams(s: &str) -> BTreeSet<String> {
    let padded = format!("  {}  ", s);
    let chars: Vec<char> = padded.chars().collect();
    chars.windows(3).map(|w| w.iter().collect()).collect()
}

fn bucket(token: &str, dim: usize) -> usize {
    let mut hasher = DefaultHasher::new();
    token.hash(&mut hasher);
    (hasher.finish() % dim as u64) as usize
}
