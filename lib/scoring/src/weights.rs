//! Context-adaptive factor weights.
//!
//! A [`WeightProfile`] is resolved per match in a fixed pipeline, each stage
//! working on the previous stage's output:
//!
//! 1. industry base table (unknown industries use the default table)
//! 2. career-stage multipliers
//! 3. caller preference overrides, clamped at zero
//! 4. market signal rules
//! 5. renormalization to a sum of 1.0
//!
//! All tables live in [`WeightTables`] and are passed in as configuration,
//! so [`WeightProfileResolver::resolve`] is a pure function of its inputs.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use talentmatch_core::{CareerStage, Error, Industry, Result};

/// Tolerance for tables that are expected to sum to 1.0
pub const TABLE_SUM_TOLERANCE: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Skill,
    Experience,
    Location,
    Salary,
    Semantic,
    MarketDemand,
    CareerGrowth,
}

impl Factor {
    pub const ALL: [Factor; 7] = [
        Factor::Skill,
        Factor::Experience,
        Factor::Location,
        Factor::Salary,
        Factor::Semantic,
        Factor::MarketDemand,
        Factor::CareerGrowth,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Factor::Skill => "skill",
            Factor::Experience => "experience",
            Factor::Location => "location",
            Factor::Salary => "salary",
            Factor::Semantic => "semantic",
            Factor::MarketDemand => "market_demand",
            Factor::CareerGrowth => "career_growth",
        }
    }

    fn label(self) -> (&'static str, &'static str) {
        match self {
            Factor::Skill => ("Skills", "technical competency"),
            Factor::Experience => ("Experience", "years of experience"),
            Factor::Location => ("Location", "geographic fit"),
            Factor::Salary => ("Salary", "compensation alignment"),
            Factor::Semantic => ("Job Fit", "description alignment"),
            Factor::MarketDemand => ("Market", "market demand"),
            Factor::CareerGrowth => ("Growth", "career advancement"),
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per factor. Used for base tables, multipliers and profiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorWeights {
    pub skill: f32,
    pub experience: f32,
    pub location: f32,
    pub salary: f32,
    pub semantic: f32,
    pub market_demand: f32,
    pub career_growth: f32,
}

impl FactorWeights {
    pub const fn new(
        skill: f32,
        experience: f32,
        location: f32,
        salary: f32,
        semantic: f32,
        market_demand: f32,
        career_growth: f32,
    ) -> Self {
        Self {
            skill,
            experience,
            location,
            salary,
            semantic,
            market_demand,
            career_growth,
        }
    }

    pub const fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value, value, value, value)
    }

    pub fn get(&self, factor: Factor) -> f32 {
        match factor {
            Factor::Skill => self.skill,
            Factor::Experience => self.experience,
            Factor::Location => self.location,
            Factor::Salary => self.salary,
            Factor::Semantic => self.semantic,
            Factor::MarketDemand => self.market_demand,
            Factor::CareerGrowth => self.career_growth,
        }
    }

    pub fn get_mut(&mut self, factor: Factor) -> &mut f32 {
        match factor {
            Factor::Skill => &mut self.skill,
            Factor::Experience => &mut self.experience,
            Factor::Location => &mut self.location,
            Factor::Salary => &mut self.salary,
            Factor::Semantic => &mut self.semantic,
            Factor::MarketDemand => &mut self.market_demand,
            Factor::CareerGrowth => &mut self.career_growth,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Factor, f32)> + '_ {
        Factor::ALL.into_iter().map(move |factor| (factor, self.get(factor)))
    }

    pub fn sum(&self) -> f32 {
        self.iter().map(|(_, w)| w).sum()
    }

    #[must_use]
    pub fn multiply(&self, other: &FactorWeights) -> Self {
        let mut out = *self;
        for factor in Factor::ALL {
            *out.get_mut(factor) *= other.get(factor);
        }
        out
    }

    fn check(&self, what: &str) -> Result<()> {
        for (factor, value) in self.iter() {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidArgument(format!(
                    "{} has invalid {} weight {}",
                    what, factor, value
                )));
            }
        }
        Ok(())
    }
}

/// Normalized per-factor weights: non-negative, summing to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightProfile {
    weights: FactorWeights,
}

impl WeightProfile {
    /// Divide every weight by the total.
    ///
    /// Fails with `InvalidArgument` on negative or non-finite weights and with
    /// `DegenerateWeight` when the total is not positive.
    pub fn normalize(weights: FactorWeights) -> Result<Self> {
        weights.check("weight profile")?;
        let sum = weights.sum();
        if sum <= 0.0 || !sum.is_finite() {
            return Err(Error::DegenerateWeight { sum });
        }
        Ok(Self::scaled(weights, sum))
    }

    fn scaled(mut weights: FactorWeights, sum: f32) -> Self {
        for factor in Factor::ALL {
            *weights.get_mut(factor) /= sum;
        }
        Self { weights }
    }

    pub fn get(&self, factor: Factor) -> f32 {
        self.weights.get(factor)
    }

    pub fn weights(&self) -> &FactorWeights {
        &self.weights
    }

    pub fn iter(&self) -> impl Iterator<Item = (Factor, f32)> + '_ {
        self.weights.iter()
    }

    pub fn sum(&self) -> f32 {
        self.weights.sum()
    }
}

/// Multipliers per career stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CareerMultipliers {
    pub entry: FactorWeights,
    pub mid: FactorWeights,
    pub senior: FactorWeights,
    pub executive: FactorWeights,
}

impl Default for CareerMultipliers {
    fn default() -> Self {
        Self {
            entry: FactorWeights::new(1.5, 0.3, 1.2, 0.8, 1.3, 1.0, 1.0),
            mid: FactorWeights::uniform(1.0),
            senior: FactorWeights::new(0.8, 1.3, 0.9, 1.2, 0.9, 1.0, 1.0),
            executive: FactorWeights::new(0.4, 1.8, 0.7, 1.5, 0.7, 1.0, 1.0),
        }
    }
}

impl CareerMultipliers {
    pub fn for_stage(&self, stage: CareerStage) -> &FactorWeights {
        match stage {
            CareerStage::Entry => &self.entry,
            CareerStage::Mid => &self.mid,
            CareerStage::Senior => &self.senior,
            CareerStage::Executive => &self.executive,
        }
    }
}

/// Static lookup tables for the resolver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightTables {
    /// Used for `General` and any industry without its own table
    pub default: FactorWeights,
    /// Keyed by industry name (`technology`, `finance`, ...)
    pub industries: BTreeMap<String, FactorWeights>,
    pub career: CareerMultipliers,
}

impl Default for WeightTables {
    fn default() -> Self {
        let industries = [
            (Industry::Technology, FactorWeights::new(0.45, 0.20, 0.10, 0.10, 0.10, 0.03, 0.02)),
            (Industry::Finance, FactorWeights::new(0.25, 0.35, 0.20, 0.15, 0.03, 0.01, 0.01)),
            (Industry::Healthcare, FactorWeights::new(0.20, 0.40, 0.25, 0.10, 0.03, 0.01, 0.01)),
            (Industry::Startup, FactorWeights::new(0.40, 0.15, 0.20, 0.15, 0.08, 0.01, 0.01)),
            (Industry::Enterprise, FactorWeights::new(0.30, 0.30, 0.20, 0.12, 0.05, 0.02, 0.01)),
        ]
        .into_iter()
        .map(|(industry, weights)| (industry.as_str().to_string(), weights))
        .collect();

        Self {
            default: FactorWeights::new(0.35, 0.25, 0.15, 0.10, 0.10, 0.03, 0.02),
            industries,
            career: CareerMultipliers::default(),
        }
    }
}

impl WeightTables {
    /// Base tables must be non-negative and sum to 1.0; multipliers non-negative.
    pub fn validate(&self) -> Result<()> {
        check_base("default table", &self.default)?;
        for (name, weights) in &self.industries {
            name.parse::<Industry>()?;
            check_base(&format!("{} table", name), weights)?;
        }
        for stage in [
            CareerStage::Entry,
            CareerStage::Mid,
            CareerStage::Senior,
            CareerStage::Executive,
        ] {
            self.career
                .for_stage(stage)
                .check(&format!("{} multipliers", stage))?;
        }
        Ok(())
    }

    pub fn base(&self, industry: Industry) -> &FactorWeights {
        self.industries
            .get(industry.as_str())
            .unwrap_or(&self.default)
    }
}

fn check_base(what: &str, weights: &FactorWeights) -> Result<()> {
    weights.check(what)?;
    let sum = weights.sum();
    if (sum - 1.0).abs() > TABLE_SUM_TOLERANCE {
        return Err(Error::InvalidArgument(format!(
            "{} sums to {}, expected 1.0",
            what, sum
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Adjustment {
    /// Multiply the weight
    Scale(f32),
    /// Add to the weight (may be negative)
    Add(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreferenceOverride {
    pub factor: Factor,
    pub adjustment: Adjustment,
}

/// Caller-supplied adjustments, applied in order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferenceOverrides {
    overrides: Vec<PreferenceOverride>,
}

/// Profile preferences above this value trigger an override
const STRONG_PREFERENCE: f32 = 0.7;

impl PreferenceOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn scale(mut self, factor: Factor, by: f32) -> Self {
        self.overrides.push(PreferenceOverride {
            factor,
            adjustment: Adjustment::Scale(by),
        });
        self
    }

    #[must_use]
    pub fn add(mut self, factor: Factor, delta: f32) -> Self {
        self.overrides.push(PreferenceOverride {
            factor,
            adjustment: Adjustment::Add(delta),
        });
        self
    }

    /// Overrides implied by a candidate profile:
    /// strong remote preference halves location, strong salary sensitivity
    /// raises salary by 30%, strong growth focus doubles career growth.
    pub fn from_profile(remote_preference: f32, salary_sensitivity: f32, growth_focus: f32) -> Self {
        let mut overrides = Self::new();
        if remote_preference > STRONG_PREFERENCE {
            overrides = overrides.scale(Factor::Location, 0.5);
        }
        if salary_sensitivity > STRONG_PREFERENCE {
            overrides = overrides.scale(Factor::Salary, 1.3);
        }
        if growth_focus > STRONG_PREFERENCE {
            overrides = overrides.scale(Factor::CareerGrowth, 2.0);
        }
        overrides
    }

    #[must_use]
    pub fn extend(mut self, other: &PreferenceOverrides) -> Self {
        self.overrides.extend_from_slice(&other.overrides);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PreferenceOverride> {
        self.overrides.iter()
    }

    pub fn validate(&self) -> Result<()> {
        for o in &self.overrides {
            match o.adjustment {
                Adjustment::Scale(v) if !v.is_finite() || v < 0.0 => {
                    return Err(Error::InvalidArgument(format!(
                        "{} scale must be a non-negative number, got {}",
                        o.factor, v
                    )));
                }
                Adjustment::Add(v) if !v.is_finite() => {
                    return Err(Error::InvalidArgument(format!(
                        "{} delta must be finite, got {}",
                        o.factor, v
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn apply(&self, weights: &mut FactorWeights) {
        for o in &self.overrides {
            let w = weights.get_mut(o.factor);
            *w = match o.adjustment {
                Adjustment::Scale(v) => *w * v,
                Adjustment::Add(v) => *w + v,
            }
            .max(0.0);
        }
    }
}

/// Market conditions in [0, 1]; 0.5 is neutral
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketSignals {
    pub remote_work_trend: f32,
    pub skill_shortage: f32,
    pub economic_uncertainty: f32,
}

impl Default for MarketSignals {
    fn default() -> Self {
        Self {
            remote_work_trend: 0.5,
            skill_shortage: 0.5,
            economic_uncertainty: 0.5,
        }
    }
}

/// Signals above this value adjust weights
const MARKET_TRIGGER: f32 = 0.6;

impl MarketSignals {
    /// Clamp to [0, 1]; non-finite signals are rejected.
    pub fn validated(&self) -> Result<Self> {
        let clamp = |name: &str, v: f32| {
            if v.is_finite() {
                Ok(v.clamp(0.0, 1.0))
            } else {
                Err(Error::InvalidArgument(format!("market signal {} is {}", name, v)))
            }
        };
        Ok(Self {
            remote_work_trend: clamp("remote_work_trend", self.remote_work_trend)?,
            skill_shortage: clamp("skill_shortage", self.skill_shortage)?,
            economic_uncertainty: clamp("economic_uncertainty", self.economic_uncertainty)?,
        })
    }

    fn apply(&self, weights: &mut FactorWeights) {
        if self.remote_work_trend > MARKET_TRIGGER {
            weights.location *= 1.0 - 0.3 * self.remote_work_trend;
        }
        if self.skill_shortage > MARKET_TRIGGER {
            weights.skill *= 1.0 + 0.2 * self.skill_shortage;
        }
        if self.economic_uncertainty > MARKET_TRIGGER {
            weights.salary *= 0.8;
        }
    }
}

pub struct WeightProfileResolver {
    tables: WeightTables,
    base_profiles: AHashMap<Industry, WeightProfile>,
    default_profile: WeightProfile,
}

impl WeightProfileResolver {
    pub fn new(tables: WeightTables) -> Result<Self> {
        tables.validate()?;
        let default_profile = WeightProfile::normalize(tables.default)?;
        let mut base_profiles = AHashMap::new();
        for (name, weights) in &tables.industries {
            let industry: Industry = name.parse()?;
            base_profiles.insert(industry, WeightProfile::normalize(*weights)?);
        }
        Ok(Self {
            tables,
            base_profiles,
            default_profile,
        })
    }

    pub fn tables(&self) -> &WeightTables {
        &self.tables
    }

    /// Industry base weights, untouched by any adjustment
    pub fn base_profile(&self, industry: Industry) -> WeightProfile {
        self.base_profiles
            .get(&industry)
            .copied()
            .unwrap_or(self.default_profile)
    }

    pub fn resolve(
        &self,
        industry: Industry,
        stage: CareerStage,
        overrides: &PreferenceOverrides,
        signals: &MarketSignals,
    ) -> Result<WeightProfile> {
        overrides.validate()?;
        let signals = signals.validated()?;

        let mut weights = self
            .tables
            .base(industry)
            .multiply(self.tables.career.for_stage(stage));
        overrides.apply(&mut weights);
        signals.apply(&mut weights);

        WeightProfile::normalize(weights)
    }

    /// Human-readable summary of a profile
    pub fn describe(&self, profile: &WeightProfile, industry: Industry, stage: CareerStage) -> String {
        let mut text = format!("Weights optimized for {} industry, {} level:", industry, stage);
        for (factor, weight) in profile.iter() {
            let (name, meaning) = factor.label();
            text.push_str(&format!("\n- {}: {:.1}% ({})", name, weight * 100.0, meaning));
        }
        text
    }
}

impl Default for WeightProfileResolver {
    fn default() -> Self {
        let tables = WeightTables::default();
        // Built-in tables are known to be valid
        let profile = |w: &FactorWeights| WeightProfile::scaled(*w, w.sum());
        let default_profile = profile(&tables.default);
        let base_profiles = tables
            .industries
            .iter()
            .filter_map(|(name, weights)| Some((name.parse::<Industry>().ok()?, profile(weights))))
            .collect();
        Self {
            tables,
            base_profiles,
            default_profile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STAGES: [CareerStage; 4] = [
        CareerStage::Entry,
        CareerStage::Mid,
        CareerStage::Senior,
        CareerStage::Executive,
    ];

    fn assert_normalized(profile: &WeightProfile) {
        assert!((profile.sum() - 1.0).abs() < 1e-6, "sum {}", profile.sum());
        assert!(profile.iter().all(|(_, w)| w >= 0.0));
    }

    #[test]
    fn test_default_tables_are_valid() {
        WeightTables::default().validate().unwrap();
    }

    #[test]
    fn test_resolved_profiles_sum_to_one() {
        let resolver = WeightProfileResolver::default();
        let overrides = PreferenceOverrides::from_profile(0.9, 0.9, 0.9).add(Factor::Semantic, -0.05);
        let signal_sets = [
            MarketSignals::default(),
            MarketSignals {
                remote_work_trend: 1.0,
                skill_shortage: 1.0,
                economic_uncertainty: 1.0,
            },
            MarketSignals {
                remote_work_trend: 0.0,
                skill_shortage: 0.0,
                economic_uncertainty: 0.0,
            },
        ];
        for industry in [
            Industry::Technology,
            Industry::Finance,
            Industry::Healthcare,
            Industry::Startup,
            Industry::Enterprise,
            Industry::Retail,
            Industry::General,
        ] {
            for stage in ALL_STAGES {
                for signals in &signal_sets {
                    let profile = resolver.resolve(industry, stage, &overrides, signals).unwrap();
                    assert_normalized(&profile);
                }
            }
        }
    }

    #[test]
    fn test_unknown_industry_uses_default_table() {
        let resolver = WeightProfileResolver::default();
        let retail = resolver.base_profile(Industry::Retail);
        assert!((retail.get(Factor::Skill) - 0.35).abs() < 1e-6);
        let tech = resolver.base_profile(Industry::Technology);
        assert!((tech.get(Factor::Skill) - 0.45).abs() < 1e-6);
    }

    #[test]
    fn test_remote_trend_lowers_location() {
        let resolver = WeightProfileResolver::default();
        let low = MarketSignals {
            remote_work_trend: 0.0,
            ..MarketSignals::default()
        };
        let high = MarketSignals {
            remote_work_trend: 1.0,
            ..MarketSignals::default()
        };
        let none = PreferenceOverrides::new();
        let a = resolver
            .resolve(Industry::Technology, CareerStage::Mid, &none, &low)
            .unwrap();
        let b = resolver
            .resolve(Industry::Technology, CareerStage::Mid, &none, &high)
            .unwrap();
        assert!(b.get(Factor::Location) < a.get(Factor::Location));
    }

    #[test]
    fn test_stages_are_applied_in_order() {
        let resolver = WeightProfileResolver::default();
        let none = PreferenceOverrides::new();
        let signals = MarketSignals::default();
        let entry = resolver
            .resolve(Industry::General, CareerStage::Entry, &none, &signals)
            .unwrap();
        let exec = resolver
            .resolve(Industry::General, CareerStage::Executive, &none, &signals)
            .unwrap();
        assert!(entry.get(Factor::Skill) > exec.get(Factor::Skill));
        assert!(entry.get(Factor::Experience) < exec.get(Factor::Experience));

        // Mid stage with neutral signals keeps the base table
        let mid = resolver
            .resolve(Industry::Finance, CareerStage::Mid, &none, &signals)
            .unwrap();
        assert_eq!(mid, resolver.base_profile(Industry::Finance));
    }

    #[test]
    fn test_zeroing_everything_is_degenerate() {
        let resolver = WeightProfileResolver::default();
        let mut overrides = PreferenceOverrides::new();
        for factor in Factor::ALL {
            overrides = overrides.scale(factor, 0.0);
        }
        let err = resolver
            .resolve(
                Industry::General,
                CareerStage::Mid,
                &overrides,
                &MarketSignals::default(),
            )
            .unwrap_err();
        assert!(matches!(err, Error::DegenerateWeight { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_negative_add_clamps_at_zero() {
        let resolver = WeightProfileResolver::default();
        let overrides = PreferenceOverrides::new().add(Factor::Salary, -5.0);
        let profile = resolver
            .resolve(Industry::General, CareerStage::Mid, &overrides, &MarketSignals::default())
            .unwrap();
        assert_eq!(profile.get(Factor::Salary), 0.0);
        assert_normalized(&profile);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let resolver = WeightProfileResolver::default();
        let bad_scale = PreferenceOverrides::new().scale(Factor::Skill, -1.0);
        assert!(matches!(
            resolver.resolve(Industry::General, CareerStage::Mid, &bad_scale, &MarketSignals::default()),
            Err(Error::InvalidArgument(_))
        ));
        let bad_signal = MarketSignals {
            skill_shortage: f32::NAN,
            ..MarketSignals::default()
        };
        assert!(matches!(
            resolver.resolve(Industry::General, CareerStage::Mid, &PreferenceOverrides::new(), &bad_signal),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_bad_table_rejected() {
        let mut tables = WeightTables::default();
        tables.default.skill = 0.9;
        assert!(WeightProfileResolver::new(tables).is_err());

        let mut tables = WeightTables::default();
        tables
            .industries
            .insert("astrology".into(), FactorWeights::new(0.35, 0.25, 0.15, 0.10, 0.10, 0.03, 0.02));
        assert!(WeightProfileResolver::new(tables).is_err());
    }

    #[test]
    fn test_from_profile_thresholds() {
        assert!(PreferenceOverrides::from_profile(0.5, 0.5, 0.5).is_empty());
        let overrides = PreferenceOverrides::from_profile(0.8, 0.1, 0.9);
        let factors: Vec<Factor> = overrides.iter().map(|o| o.factor).collect();
        assert_eq!(factors, vec![Factor::Location, Factor::CareerGrowth]);
    }

    #[test]
    fn test_describe_lists_every_factor() {
        let resolver = WeightProfileResolver::default();
        let profile = resolver.base_profile(Industry::Technology);
        let text = resolver.describe(&profile, Industry::Technology, CareerStage::Senior);
        assert!(text.starts_with("Weights optimized for technology industry, senior level:"));
        assert!(text.contains("Skills: 45.0%"));
        assert_eq!(text.lines().count(), 8);
    }

    #[test]
    fn test_overrides_deserialize() {
        let json = r#"[
            {"factor": "salary", "adjustment": {"scale": 1.5}},
            {"factor": "skill", "adjustment": {"add": 0.1}}
        ]"#;
        let overrides: PreferenceOverrides = serde_json::from_str(json).unwrap();
        assert_eq!(overrides.iter().count(), 2);
    }
}
