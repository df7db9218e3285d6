//! Searchable index structures.
//!
//! Two implementations sit behind [`VectorIndex`]: an exact [`FlatIndex`] for
//! small or write-heavy collections and a trained [`PartitionedIndex`] for
//! large, read-heavy ones. [`SearchIndex::build`] picks the variant from the
//! collection size so callers never branch on it.

mod flat;
mod kmeans;
mod partitioned;

pub use flat::FlatIndex;
pub use kmeans::{Clustering, KMeans};
pub use partitioned::PartitionedIndex;

use crate::Vector;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A search result: entity id and inner-product similarity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub score: f32,
}

impl SearchHit {
    pub fn new(id: impl Into<String>, score: f32) -> Self {
        Self {
            id: id.into(),
            score,
        }
    }
}

/// Descending score, ascending id on ties.
#[inline]
pub fn rank_order(a_score: f32, a_id: &str, b_score: f32, b_id: &str) -> Ordering {
    b_score.total_cmp(&a_score).then_with(|| a_id.cmp(b_id))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexMode {
    /// Exhaustive scan, exact results
    Flat,
    /// Clustered inverted lists, approximate results
    Partitioned,
}

impl fmt::Display for IndexMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexMode::Flat => f.write_str("flat"),
            IndexMode::Partitioned => f.write_str("partitioned"),
        }
    }
}

/// Build parameters shared by both index variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Collections with at least this many vectors get a partitioned index
    pub partition_threshold: usize,
    /// Number of partitions; 0 picks `sqrt(n)`
    pub partitions: usize,
    /// Partitions scanned per query. A true neighbour is missed only when it
    /// lives outside the `probes` partitions whose centroids score highest.
    pub probes: usize,
    pub kmeans_iterations: usize,
    pub seed: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            partition_threshold: 10_000,
            partitions: 0,
            probes: 8,
            kmeans_iterations: 20,
            seed: 42,
        }
    }
}

pub trait VectorIndex: Send + Sync {
    fn mode(&self) -> IndexMode;

    /// Number of indexed vectors
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn dim(&self) -> usize;

    /// Top-k by inner product. Ids for which `skip` returns true are ignored.
    /// The result is sorted by [`rank_order`] and never longer than `k`.
    fn search(&self, query: &[f32], k: usize, skip: &dyn Fn(&str) -> bool) -> Vec<SearchHit>;
}

/// Row-major vector table with the id of each row
#[derive(Debug, Clone, Default)]
pub(crate) struct VectorTable {
    ids: Vec<String>,
    data: Vec<f32>,
    dim: usize,
}

impl VectorTable {
    pub(crate) fn from_entries(entries: Vec<(String, Vector)>, dim: usize) -> Self {
        let mut ids = Vec::with_capacity(entries.len());
        let mut data = Vec::with_capacity(entries.len() * dim);
        for (id, vector) in entries {
            debug_assert_eq!(vector.dim(), dim);
            ids.push(id);
            data.extend_from_slice(vector.as_slice());
        }
        Self { ids, data, dim }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub(crate) fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub(crate) fn id(&self, row: usize) -> &str {
        &self.ids[row]
    }

    #[inline]
    pub(crate) fn row(&self, row: usize) -> &[f32] {
        let start = row * self.dim;
        &self.data[start..start + self.dim]
    }

    pub(crate) fn data(&self) -> &[f32] {
        &self.data
    }

    /// Keep the best `k` of `scored` rows, ordered by [`rank_order`].
    pub(crate) fn top_k(&self, mut scored: Vec<(usize, f32)>, k: usize) -> Vec<SearchHit> {
        let cmp = |a: &(usize, f32), b: &(usize, f32)| rank_order(a.1, self.id(a.0), b.1, self.id(b.0));
        if scored.len() > k {
            scored.select_nth_unstable_by(k - 1, cmp);
            scored.truncate(k);
        }
        scored.sort_unstable_by(cmp);
        scored
            .into_iter()
            .map(|(row, score)| SearchHit::new(self.id(row), score))
            .collect()
    }
}

/// The searchable structure of a collection, in one of two modes
pub enum SearchIndex {
    Flat(FlatIndex),
    Partitioned(PartitionedIndex),
}

impl SearchIndex {
    /// Build the variant that fits the number of entries.
    pub fn build(entries: Vec<(String, Vector)>, dim: usize, config: &IndexConfig) -> Self {
        if entries.len() >= config.partition_threshold.max(1) {
            SearchIndex::Partitioned(PartitionedIndex::build(entries, dim, config))
        } else {
            SearchIndex::Flat(FlatIndex::build(entries, dim))
        }
    }

    pub fn empty(dim: usize) -> Self {
        SearchIndex::Flat(FlatIndex::build(Vec::new(), dim))
    }

    fn inner(&self) -> &dyn VectorIndex {
        match self {
            SearchIndex::Flat(index) => index,
            SearchIndex::Partitioned(index) => index,
        }
    }
}

impl VectorIndex for SearchIndex {
    fn mode(&self) -> IndexMode {
        self.inner().mode()
    }

    fn len(&self) -> usize {
        self.inner().len()
    }

    fn dim(&self) -> usize {
        self.inner().dim()
    }

    fn search(&self, query: &[f32], k: usize, skip: &dyn Fn(&str) -> bool) -> Vec<SearchHit> {
        self.inner().search(query, k, skip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(n: usize, dim: usize) -> Vec<(String, Vector)> {
        (0..n)
            .map(|i| {
                let data: Vec<f32> = (0..dim).map(|d| ((i * 31 + d * 7) as f32 * 0.13).sin()).collect();
                (format!("e{:04}", i), Vector::new(data).normalized())
            })
            .collect()
    }

    #[test]
    fn test_build_picks_mode_by_size() {
        let config = IndexConfig {
            partition_threshold: 50,
            ..IndexConfig::default()
        };
        assert_eq!(SearchIndex::build(entries(49, 8), 8, &config).mode(), IndexMode::Flat);
        assert_eq!(
            SearchIndex::build(entries(50, 8), 8, &config).mode(),
            IndexMode::Partitioned
        );
    }

    #[test]
    fn test_rank_order_breaks_ties_by_id() {
        assert_eq!(rank_order(0.5, "a", 0.5, "b"), Ordering::Less);
        assert_eq!(rank_order(0.9, "z", 0.5, "a"), Ordering::Less);
    }

    #[test]
    fn test_empty_index_returns_nothing() {
        let index = SearchIndex::empty(4);
        assert!(index.search(&[1.0, 0.0, 0.0, 0.0], 5, &|_| false).is_empty());
    }
}
