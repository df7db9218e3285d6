use super::kmeans::{nearest, KMeans};
use super::{IndexConfig, IndexMode, SearchHit, VectorIndex, VectorTable};
use crate::simd::dot_product;
use crate::Vector;

/// Inverted-list index over k-means partitions.
///
/// A query scores every centroid, then scans the members of the best
/// `probes` partitions exhaustively. Probing continues past `probes` while
/// fewer than `k` candidates have been collected.
pub struct PartitionedIndex {
    table: VectorTable,
    centroids: Vec<f32>,
    lists: Vec<Vec<usize>>,
    probes: usize,
}

impl PartitionedIndex {
    pub fn build(entries: Vec<(String, Vector)>, dim: usize, config: &IndexConfig) -> Self {
        let table = VectorTable::from_entries(entries, dim);
        let n = table.len();
        let n_partitions = if config.partitions > 0 {
            config.partitions
        } else {
            (n as f64).sqrt().round() as usize
        }
        .clamp(1, n.max(1));

        let clustering = KMeans::new(n_partitions)
            .with_max_iter(config.kmeans_iterations)
            .with_seed(config.seed)
            .fit(table.data(), dim);

        // Assign against the final centroids so every row sits in its best partition
        let mut lists = vec![Vec::new(); clustering.n_clusters];
        for row in 0..n {
            let cluster = nearest(&clustering.centroids, dim, clustering.n_clusters, table.row(row));
            lists[cluster].push(row);
        }

        tracing::debug!(
            vectors = n,
            partitions = clustering.n_clusters,
            iterations = clustering.iterations,
            "trained partitioned index"
        );

        Self {
            table,
            centroids: clustering.centroids,
            lists,
            probes: config.probes.max(1),
        }
    }

    pub fn partitions(&self) -> usize {
        self.lists.len()
    }

    pub fn probes(&self) -> usize {
        self.probes.min(self.lists.len())
    }

    /// Fraction of partitions scanned per query.
    pub fn probe_ratio(&self) -> f32 {
        if self.lists.is_empty() {
            return 1.0;
        }
        self.probes() as f32 / self.lists.len() as f32
    }

    pub fn partition_sizes(&self) -> Vec<usize> {
        self.lists.iter().map(Vec::len).collect()
    }
}

impl VectorIndex for PartitionedIndex {
    fn mode(&self) -> IndexMode {
        IndexMode::Partitioned
    }

    fn len(&self) -> usize {
        self.table.len()
    }

    fn dim(&self) -> usize {
        self.table.dim()
    }

    fn search(&self, query: &[f32], k: usize, skip: &dyn Fn(&str) -> bool) -> Vec<SearchHit> {
        if k == 0 || self.table.len() == 0 {
            return Vec::new();
        }

        let dim = self.table.dim();
        let mut order: Vec<(usize, f32)> = (0..self.lists.len())
            .map(|p| (p, dot_product(query, &self.centroids[p * dim..(p + 1) * dim])))
            .collect();
        order.sort_unstable_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let mut scored = Vec::new();
        for (probed, (partition, _)) in order.into_iter().enumerate() {
            if probed >= self.probes && scored.len() >= k {
                break;
            }
            for &row in &self.lists[partition] {
                if skip(self.table.id(row)) {
                    continue;
                }
                scored.push((row, dot_product(query, self.table.row(row))));
            }
        }

        self.table.top_k(scored, k)
    }
}
