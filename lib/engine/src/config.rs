use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use talentmatch_core::StoreConfig;
use talentmatch_scoring::{ScoringConfig, SkillMatcher, WeightTables};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    Invalid(#[from] talentmatch_core::Error),
}

/// Every tunable of the recommendation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Candidates retrieved per requested result
    pub oversampling: usize,
    pub store: StoreConfig,
    pub scoring: ScoringConfig,
    pub skills: SkillMatcher,
    pub weights: WeightTables,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            oversampling: 3,
            store: StoreConfig::default(),
            scoring: ScoringConfig::default(),
            skills: SkillMatcher::default(),
            weights: WeightTables::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_dim(dim: usize) -> Self {
        Self {
            store: StoreConfig::with_dim(dim),
            ..Self::default()
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> talentmatch_core::Result<()> {
        if self.oversampling == 0 {
            return Err(talentmatch_core::Error::InvalidArgument(
                "oversampling must be at least 1".into(),
            ));
        }
        let skills_ok = [self.skills.required_weight, self.skills.preferred_weight]
            .iter()
            .all(|w| w.is_finite() && *w >= 0.0);
        if !skills_ok {
            return Err(talentmatch_core::Error::InvalidArgument(
                "skill weights must be non-negative".into(),
            ));
        }
        self.store.validate()?;
        self.weights.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        config.validate().unwrap();
        assert_eq!(config.oversampling, 3);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            oversampling = 5

            [store.jobs]
            dim = 64

            [store.resumes]
            dim = 64

            [scoring]
            hybrid_location_score = 0.75
            "#,
        )
        .unwrap();
        assert_eq!(config.oversampling, 5);
        assert_eq!(config.store.jobs.dim, 64);
        assert_eq!(config.store.jobs.stale_multiplier, 2.0);
        assert_eq!(config.scoring.hybrid_location_score, 0.75);
        assert_eq!(config.scoring.same_region_score, 0.6);
        assert_eq!(config.weights, WeightTables::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            EngineConfig::from_toml_str("oversampling = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("[store.jobs]\ndim = 32\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("oversampling = \"lots\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_round_trip_through_file() {
        let config = EngineConfig::with_dim(48);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config.to_toml_string().unwrap().as_bytes()).unwrap();

        let loaded = EngineConfig::load(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            EngineConfig::load("/nonexistent/talentmatch.toml"),
            Err(ConfigError::Read { .. })
        ));
    }
}
