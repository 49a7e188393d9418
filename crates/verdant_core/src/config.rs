//! Configuration of the fixed simulation constants.
//!
//! This module provides strongly-typed configuration structures that map to a
//! `config.toml` handed in by the embedding process. The defaults reproduce
//! the canonical constants of the simulation; overriding them is mainly
//! useful for experiments and tests.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [soil]
//! initial_moisture = 0.5
//! desiccation = 0.2
//!
//! [insect]
//! mutation_rate = 0.05
//! ```

use serde::{Deserialize, Serialize};

/// Soil and substance-effect parameters shared by every cell.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct SoilConfig {
    /// Moisture of a cell that does not specify its own, in [0, 1].
    pub initial_moisture: f64,
    /// Moisture added by one watering, capped at 1.
    pub irrigation_amount: f64,
    /// Moisture lost by a cell that went unwatered for a tick.
    pub desiccation: f64,
    /// Ticks a fertilizer application stays effective.
    pub fertilizer_duration: u32,
    /// Ticks a pesticide application stays effective.
    pub pesticide_duration: u32,
}

impl Default for SoilConfig {
    fn default() -> Self {
        Self {
            initial_moisture: 0.5,
            irrigation_amount: 0.5,
            desiccation: 0.2,
            fertilizer_duration: 5,
            pesticide_duration: 5,
        }
    }
}

/// Insect life-cycle and genetics parameters.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct InsectConfig {
    /// Probability that one trait of an offspring mutates.
    pub mutation_rate: f64,
    /// Standard deviation of the Gaussian perturbation applied to a
    /// mutated trait.
    pub mutation_sigma: f64,
    /// Fraction of `max_health` a newborn starts with (rounded, at least 1).
    pub child_health_fraction: f64,
    /// Below this fraction of `max_health` an insect halves its mobility.
    pub low_health_fraction: f64,
    /// Missed meals after which an insect is starving: it stops being
    /// available for reproduction and doubles its mobility.
    pub hunger_threshold: u32,
}

impl Default for InsectConfig {
    fn default() -> Self {
        Self {
            mutation_rate: 0.05,
            mutation_sigma: 0.05,
            child_health_fraction: 0.5,
            low_health_fraction: 0.2,
            hunger_threshold: 3,
        }
    }
}

/// Top-level simulation configuration.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(default)]
pub struct SimConfig {
    pub soil: SoilConfig,
    pub insect: InsectConfig,
}

impl SimConfig {
    /// Checks every parameter against its valid domain.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.soil.initial_moisture),
            "initial moisture must be within [0, 1]"
        );
        anyhow::ensure!(
            self.soil.irrigation_amount > 0.0,
            "irrigation amount must be positive"
        );
        anyhow::ensure!(
            self.soil.desiccation >= 0.0,
            "desiccation must be non-negative"
        );
        anyhow::ensure!(
            self.soil.fertilizer_duration >= 1,
            "fertilizer duration must be positive"
        );
        anyhow::ensure!(
            self.soil.pesticide_duration >= 1,
            "pesticide duration must be positive"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.insect.mutation_rate),
            "mutation rate must be within [0, 1]"
        );
        anyhow::ensure!(
            self.insect.mutation_sigma > 0.0,
            "mutation sigma must be positive"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.insect.child_health_fraction),
            "child health fraction must be within [0, 1]"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.insect.low_health_fraction),
            "low health fraction must be within [0, 1]"
        );
        anyhow::ensure!(
            self.insect.hunger_threshold >= 1,
            "hunger threshold must be positive"
        );
        Ok(())
    }

    /// Loads and validates a configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Stable digest of the effective configuration, for tagging runs.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.soil).as_bytes());
        hasher.update(format!("{:?}", self.insect).as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_initial_moisture() {
        let config = SimConfig {
            soil: SoilConfig {
                initial_moisture: 1.2,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_mutation_rate() {
        let config = SimConfig {
            insect: InsectConfig {
                mutation_rate: -0.1,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_effect_duration_rejected() {
        let config = SimConfig {
            soil: SoilConfig {
                pesticide_duration: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_partial_override() {
        let config = SimConfig::from_toml(
            r#"
            [soil]
            desiccation = 0.1

            [insect]
            hunger_threshold = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.soil.desiccation, 0.1);
        assert_eq!(config.insect.hunger_threshold, 4);
        // Untouched values keep their defaults.
        assert_eq!(config.soil.fertilizer_duration, 5);
    }

    #[test]
    fn test_fingerprint_consistency() {
        assert_eq!(
            SimConfig::default().fingerprint(),
            SimConfig::default().fingerprint()
        );
        let other = SimConfig {
            soil: SoilConfig {
                desiccation: 0.3,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_ne!(SimConfig::default().fingerprint(), other.fingerprint());
    }
}
