// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Elastic Optical Network Simulation Suite ("RMSA") - Environment Configuration

use serde::{Deserialize, Serialize};

use crate::topology::Topology;

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Construction-time configuration errors. These are fatal: an environment
/// is never built from a config that fails validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown topology: {0}")]
    UnknownTopology(String),
    #[error("number of frequency slots must be positive")]
    ZeroSlots,
    #[error("episode length must be positive")]
    ZeroEpisodeLength,
    #[error("candidate path count must be positive")]
    ZeroPaths,
    #[error("offered load must be finite and positive, got {0}")]
    InvalidLoad(f64),
    #[error("unknown reward id: {0}")]
    UnknownReward(String),
}

// ─── Defaults ────────────────────────────────────────────────────────────────

pub const DEFAULT_TOPOLOGY: &str = "NSFNET";
pub const DEFAULT_NUM_SLOTS: usize = 196;
pub const DEFAULT_EPISODE_LENGTH: usize = 100;
pub const DEFAULT_LOAD: f64 = 0.8;
pub const DEFAULT_K_PATHS: usize = 3;

// ─── EnvConfig ───────────────────────────────────────────────────────────────

/// Parameters fixed for the lifetime of one environment instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvConfig {
    /// Catalog name, matched case-insensitively (`NSFNET`, `USNET`, ...).
    pub topology: String,
    /// Frequency slots per link.
    pub num_slots: usize,
    /// Requests per episode.
    pub episode_length: usize,
    /// Offered load; mean holding time is `1 / load`.
    pub load: f64,
    #[serde(default)]
    pub seed: Option<u64>,
    /// Candidate paths per request (global, not per request).
    #[serde(default = "default_k_paths")]
    pub k_paths: usize,
}

fn default_k_paths() -> usize {
    DEFAULT_K_PATHS
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            topology: DEFAULT_TOPOLOGY.to_string(),
            num_slots: DEFAULT_NUM_SLOTS,
            episode_length: DEFAULT_EPISODE_LENGTH,
            load: DEFAULT_LOAD,
            seed: None,
            k_paths: DEFAULT_K_PATHS,
        }
    }
}

impl EnvConfig {
    /// High-pressure preset: scarce spectrum, near-saturated load and long
    /// episodes on NSFNET.
    pub fn extreme() -> Self {
        Self {
            topology: DEFAULT_TOPOLOGY.to_string(),
            num_slots: 80,
            episode_length: 300,
            load: 0.95,
            seed: Some(42),
            k_paths: DEFAULT_K_PATHS,
        }
    }

    pub fn with_topology(mut self, name: &str) -> Self {
        self.topology = name.to_string();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_slots(mut self, num_slots: usize) -> Self {
        self.num_slots = num_slots;
        self
    }

    pub fn with_load(mut self, load: f64) -> Self {
        self.load = load;
        self
    }

    pub fn with_episode_length(mut self, episode_length: usize) -> Self {
        self.episode_length = episode_length;
        self
    }

    /// Reject configurations the environment cannot be built from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if Topology::by_name(&self.topology).is_none() {
            return Err(ConfigError::UnknownTopology(self.topology.clone()));
        }
        if self.num_slots == 0 {
            return Err(ConfigError::ZeroSlots);
        }
        if self.episode_length == 0 {
            return Err(ConfigError::ZeroEpisodeLength);
        }
        if self.k_paths == 0 {
            return Err(ConfigError::ZeroPaths);
        }
        if !self.load.is_finite() || self.load <= 0.0 {
            return Err(ConfigError::InvalidLoad(self.load));
        }
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_reference_setup() {
        let cfg = EnvConfig::default();
        assert_eq!(cfg.topology, "NSFNET");
        assert_eq!(cfg.num_slots, 196);
        assert_eq!(cfg.episode_length, 100);
        assert!((cfg.load - 0.8).abs() < f64::EPSILON);
        assert_eq!(cfg.k_paths, 3);
        assert!(cfg.seed.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_extreme_preset_is_valid() {
        let cfg = EnvConfig::extreme();
        assert_eq!(cfg.num_slots, 80);
        assert_eq!(cfg.episode_length, 300);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_unknown_topology_rejected() {
        let cfg = EnvConfig::default().with_topology("ATLANTIS");
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::UnknownTopology("ATLANTIS".to_string()))
        );
    }

    #[test]
    fn test_topology_name_case_insensitive() {
        let cfg = EnvConfig::default().with_topology("usnet");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_non_positive_values_rejected() {
        assert_eq!(EnvConfig::default().with_slots(0).validate(), Err(ConfigError::ZeroSlots));
        assert_eq!(
            EnvConfig::default().with_episode_length(0).validate(),
            Err(ConfigError::ZeroEpisodeLength)
        );
        let mut cfg = EnvConfig::default();
        cfg.k_paths = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroPaths));
        assert!(matches!(
            EnvConfig::default().with_load(0.0).validate(),
            Err(ConfigError::InvalidLoad(_))
        ));
        assert!(matches!(
            EnvConfig::default().with_load(f64::NAN).validate(),
            Err(ConfigError::InvalidLoad(_))
        ));
    }

    #[test]
    fn test_deserialize_without_optional_fields() {
        let json = r#"{"topology":"JAPAN","num_slots":64,"episode_length":10,"load":0.5}"#;
        let cfg: EnvConfig = serde_json::from_str(json).expect("test: config should parse");
        assert_eq!(cfg.k_paths, DEFAULT_K_PATHS);
        assert!(cfg.seed.is_none());
        assert!(cfg.validate().is_ok());
    }
}
