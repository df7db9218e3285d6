//! Spherical k-means used to train the partitioned index.
//!
//! Lloyd iterations with k-means++ seeding. Similarity is the inner product,
//! centroids are re-normalized after every update, so the input rows are
//! expected to be unit length.

use crate::simd::dot_product;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct KMeans {
    n_clusters: usize,
    max_iter: usize,
    seed: u64,
}

/// Result of a k-means fit
#[derive(Debug, Clone)]
pub struct Clustering {
    /// `n_clusters * dim` row-major centroids
    pub centroids: Vec<f32>,
    /// Cluster of every input row
    pub assignments: Vec<usize>,
    pub n_clusters: usize,
    pub iterations: usize,
}

impl Clustering {
    pub fn centroid(&self, cluster: usize, dim: usize) -> &[f32] {
        &self.centroids[cluster * dim..(cluster + 1) * dim]
    }
}

impl KMeans {
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters: n_clusters.max(1),
            max_iter: 20,
            seed: 42,
        }
    }

    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter.max(1);
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Fit on `data`, a row-major matrix with `dim` columns.
    /// Deterministic for a given seed and row order.
    pub fn fit(&self, data: &[f32], dim: usize) -> Clustering {
        let n = if dim == 0 { 0 } else { data.len() / dim };
        let k = self.n_clusters.min(n.max(1));
        if n == 0 {
            return Clustering {
                centroids: vec![0.0; k * dim],
                assignments: Vec::new(),
                n_clusters: k,
                iterations: 0,
            };
        }

        let row = |i: usize| &data[i * dim..(i + 1) * dim];
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut centroids = self.init_plus_plus(data, dim, n, k, &mut rng);
        let mut assignments = vec![usize::MAX; n];
        let mut iterations = 0;

        for _ in 0..self.max_iter {
            iterations += 1;
            let mut changed = false;
            for (i, slot) in assignments.iter_mut().enumerate() {
                let best = nearest(&centroids, dim, k, row(i));
                if *slot != best {
                    *slot = best;
                    changed = true;
                }
            }
            if !changed {
                break;
            }

            let mut sums = vec![0.0f32; k * dim];
            let mut counts = vec![0usize; k];
            for (i, &cluster) in assignments.iter().enumerate() {
                counts[cluster] += 1;
                let target = &mut sums[cluster * dim..(cluster + 1) * dim];
                for (t, v) in target.iter_mut().zip(row(i)) {
                    *t += v;
                }
            }
            for cluster in 0..k {
                // Empty clusters keep their previous centroid
                if counts[cluster] == 0 {
                    continue;
                }
                let sum = &sums[cluster * dim..(cluster + 1) * dim];
                let norm = dot_product(sum, sum).sqrt();
                if norm > f32::EPSILON {
                    for (c, s) in centroids[cluster * dim..(cluster + 1) * dim]
                        .iter_mut()
                        .zip(sum)
                    {
                        *c = s / norm;
                    }
                }
            }
        }

        Clustering {
            centroids,
            assignments,
            n_clusters: k,
            iterations,
        }
    }

    fn init_plus_plus(&self, data: &[f32], dim: usize, n: usize, k: usize, rng: &mut StdRng) -> Vec<f32> {
        let row = |i: usize| &data[i * dim..(i + 1) * dim];
        let mut centroids = Vec::with_capacity(k * dim);
        centroids.extend_from_slice(row(rng.random_range(0..n)));

        // Squared cosine distance to the closest chosen centroid
        let mut weights: Vec<f32> = (0..n)
            .map(|i| cosine_distance_sq(row(i), &centroids[0..dim]))
            .collect();

        for _ in 1..k {
            let total: f32 = weights.iter().sum();
            let next = if total <= f32::EPSILON {
                rng.random_range(0..n)
            } else {
                let mut target = rng.random::<f32>() * total;
                let mut chosen = n - 1;
                for (i, w) in weights.iter().enumerate() {
                    if target < *w {
                        chosen = i;
                        break;
                    }
                    target -= w;
                }
                chosen
            };

            let start = centroids.len();
            centroids.extend_from_slice(row(next));
            let added = &centroids[start..start + dim];
            for (i, w) in weights.iter_mut().enumerate() {
                let d = cosine_distance_sq(row(i), added);
                if d < *w {
                    *w = d;
                }
            }
        }

        centroids
    }
}

#[inline]
fn cosine_distance_sq(a: &[f32], b: &[f32]) -> f32 {
    let d = (1.0 - dot_product(a, b)).max(0.0);
    d * d
}

/// Index of the centroid with the highest inner product.
#[inline]
pub(crate) fn nearest(centroids: &[f32], dim: usize, k: usize, v: &[f32]) -> usize {
    let mut best = 0;
    let mut best_score = f32::NEG_INFINITY;
    for cluster in 0..k {
        let score = dot_product(v, &centroids[cluster * dim..(cluster + 1) * dim]);
        if score > best_score {
            best_score = score;
            best = cluster;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_blobs() -> Vec<f32> {
        let mut data = Vec::new();
        for i in 0..10 {
            let jitter = i as f32 * 0.01;
            let a = [1.0 - jitter, jitter];
            let b = [jitter, 1.0 - jitter];
            for p in [a, b] {
                let norm = (p[0] * p[0] + p[1] * p[1]).sqrt();
                data.push(p[0] / norm);
                data.push(p[1] / norm);
            }
        }
        data
    }

    #[test]
    fn test_separates_two_blobs() {
        let data = two_blobs();
        let clustering = KMeans::new(2).fit(&data, 2);
        assert_eq!(clustering.n_clusters, 2);
        // Even rows are blob A, odd rows blob B
        let a = clustering.assignments[0];
        let b = clustering.assignments[1];
        assert_ne!(a, b);
        for (i, &c) in clustering.assignments.iter().enumerate() {
            assert_eq!(c, if i % 2 == 0 { a } else { b });
        }
    }

    #[test]
    fn test_deterministic_for_seed() {
        let data = two_blobs();
        let first = KMeans::new(3).with_seed(7).fit(&data, 2);
        let second = KMeans::new(3).with_seed(7).fit(&data, 2);
        assert_eq!(first.assignments, second.assignments);
        assert_eq!(first.centroids, second.centroids);
    }

    #[test]
    fn test_more_clusters_than_rows() {
        let data = vec![1.0, 0.0, 0.0, 1.0];
        let clustering = KMeans::new(10).fit(&data, 2);
        assert_eq!(clustering.n_clusters, 2);
        assert_eq!(clustering.assignments.len(), 2);
    }
}
