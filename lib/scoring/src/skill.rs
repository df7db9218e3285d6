//! Exact-token skill overlap.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Required/preferred coverage of a candidate's skills
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub score: f32,
    pub required_ratio: f32,
    pub preferred_ratio: f32,
    pub matched_required: Vec<String>,
    pub missing_required: Vec<String>,
    pub matched_preferred: Vec<String>,
}

impl SkillMatch {
    pub fn matched_count(&self) -> usize {
        self.matched_required.len() + self.matched_preferred.len()
    }
}

/// `score = required_weight * required_ratio + preferred_weight * preferred_ratio`
///
/// Skills compare case-insensitively after trimming. An empty skill set on
/// the job side counts as fully covered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillMatcher {
    pub required_weight: f32,
    pub preferred_weight: f32,
}

impl Default for SkillMatcher {
    fn default() -> Self {
        Self {
            required_weight: 0.8,
            preferred_weight: 0.2,
        }
    }
}

impl SkillMatcher {
    pub fn score(
        &self,
        candidate: &BTreeSet<String>,
        required: &BTreeSet<String>,
        preferred: &BTreeSet<String>,
    ) -> f32 {
        self.analyze(candidate, required, preferred).score
    }

    pub fn analyze(
        &self,
        candidate: &BTreeSet<String>,
        required: &BTreeSet<String>,
        preferred: &BTreeSet<String>,
    ) -> SkillMatch {
        let candidate: BTreeSet<String> = candidate.iter().filter_map(|s| fold(s)).collect();

        let (matched_required, missing_required) = split(&candidate, required);
        let (matched_preferred, missing_preferred) = split(&candidate, preferred);

        let required_ratio = ratio(matched_required.len(), missing_required.len());
        let preferred_ratio = ratio(matched_preferred.len(), missing_preferred.len());

        let score = (self.required_weight * required_ratio + self.preferred_weight * preferred_ratio)
            .clamp(0.0, 1.0);

        SkillMatch {
            score,
            required_ratio,
            preferred_ratio,
            matched_required,
            missing_required,
            matched_preferred,
        }
    }
}

fn fold(skill: &str) -> Option<String> {
    let trimmed = skill.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Folded key -> first original spelling
fn folded(skills: &BTreeSet<String>) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for skill in skills {
        if let Some(key) = fold(skill) {
            out.entry(key).or_insert_with(|| skill.trim().to_string());
        }
    }
    out
}

fn split(candidate: &BTreeSet<String>, wanted: &BTreeSet<String>) -> (Vec<String>, Vec<String>) {
    let mut matched = Vec::new();
    let mut missing = Vec::new();
    for (key, original) in folded(wanted) {
        if candidate.contains(&key) {
            matched.push(original);
        } else {
            missing.push(original);
        }
    }
    (matched, missing)
}

fn ratio(matched: usize, missing: usize) -> f32 {
    let total = matched + missing;
    if total == 0 {
        1.0
    } else {
        matched as f32 / total as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_superset_scores_one() {
        let matcher = SkillMatcher::default();
        let score = matcher.score(
            &set(&["Python", "SQL", "Docker", "Go"]),
            &set(&["python", "sql"]),
            &set(&["docker"]),
        );
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_disjoint_required_and_empty_preferred() {
        let matcher = SkillMatcher::default();
        let m = matcher.analyze(&set(&["Java"]), &set(&["Rust"]), &set(&[]));
        assert_eq!(m.required_ratio, 0.0);
        assert_eq!(m.preferred_ratio, 1.0);
        assert!((m.score - 0.2).abs() < 1e-6);
        assert_eq!(m.missing_required, vec!["Rust".to_string()]);
    }

    #[test]
    fn test_disjoint_required_and_preferred_scores_zero() {
        let matcher = SkillMatcher::default();
        let score = matcher.score(&set(&["Java"]), &set(&["Rust"]), &set(&["Go"]));
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_partial_overlap() {
        let matcher = SkillMatcher::default();
        let m = matcher.analyze(
            &set(&[" python ", "excel"]),
            &set(&["Python", "SQL"]),
            &set(&["Excel", "Tableau"]),
        );
        assert!((m.required_ratio - 0.5).abs() < 1e-6);
        assert!((m.preferred_ratio - 0.5).abs() < 1e-6);
        assert!((m.score - 0.5).abs() < 1e-6);
        assert_eq!(m.matched_required, vec!["Python".to_string()]);
        assert_eq!(m.matched_preferred, vec!["Excel".to_string()]);
        assert_eq!(m.matched_count(), 2);
    }

    #[test]
    fn test_score_is_bounded() {
        let matcher = SkillMatcher::default();
        let cases = [
            (set(&[]), set(&[]), set(&[])),
            (set(&["a"]), set(&["a", "b", "c"]), set(&["d"])),
            (set(&["A", "a"]), set(&["a"]), set(&["A"])),
        ];
        for (c, r, p) in cases {
            let score = matcher.score(&c, &r, &p);
            assert!((0.0..=1.0).contains(&score));
        }
    }
}
