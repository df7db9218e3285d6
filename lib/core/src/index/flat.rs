use super::{IndexMode, SearchHit, VectorIndex, VectorTable};
use crate::Vector;

/// Exhaustive inner-product scan over every stored vector
pub struct FlatIndex {
    table: VectorTable,
}

impl FlatIndex {
    pub fn build(entries: Vec<(String, Vector)>, dim: usize) -> Self {
        Self {
            table: VectorTable::from_entries(entries, dim),
        }
    }
}

impl VectorIndex for FlatIndex {
    fn mode(&self) -> IndexMode {
        IndexMode::Flat
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

        let scored: Vec<(usize, f32)> = (0..self.table.len())
            .filter(|&row| !skip(self.table.id(row)))
            .map(|row| (row, crate::simd::dot_product(query, self.table.row(row))))
            .collect();

        self.table.top_k(scored, k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_search_orders_by_score() {
        let index = FlatIndex::build(
            vec![
                ("a".into(), Vector::new(vec![1.0, 0.0])),
                ("b".into(), Vector::new(vec![0.0, 1.0])),
                ("c".into(), Vector::new(vec![0.6, 0.8])),
            ],
            2,
        );
        let hits = index.search(&[1.0, 0.0], 2, &|_| false);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "a");
        assert_eq!(hits[1].id, "c");
    }

    #[test]
    fn test_flat_search_skips_ids() {
        let index = FlatIndex::build(
            vec![
                ("a".into(), Vector::new(vec![1.0, 0.0])),
                ("b".into(), Vector::new(vec![0.0, 1.0])),
            ],
            2,
        );
        let hits = index.search(&[1.0, 0.0], 5, &|id| id == "a");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "b");
    }
}
