// Scenario Definitions
// Topology × load × grid presets; all scenario logic is configuration only

use rmsa_engine::{ConfigError, EnvConfig, TopologyRotation};

// ─── Scenario Configuration ─────────────────────────────────────────────────

pub struct Scenario {
    pub name: &'static str,
    pub label: &'static str,
    pub category: &'static str,
    /// None rotates through the catalog, one topology per run.
    pub topology: Option<&'static str>,
    pub num_slots: usize,
    pub load: f64,
    pub episode_length: usize,
    pub criteria: PassCriteria,
}

pub struct PassCriteria {
    /// Per-step counter, rate and range checks.
    pub require_invariants: bool,
    /// Episode must run to exactly `episode_length` requests.
    pub require_full_episode: bool,
    /// Saturated presets must actually saturate.
    pub min_blocking: Option<f64>,
}

impl Default for PassCriteria {
    fn default() -> Self {
        Self {
            require_invariants: true,
            require_full_episode: true,
            min_blocking: None,
        }
    }
}

impl Scenario {
    /// Environment configuration for run number `run` with `seed`.
    pub fn config(&self, run: usize, seed: u64) -> Result<EnvConfig, ConfigError> {
        let topology = match self.topology {
            Some(name) => name,
            None => {
                let mut rotation = TopologyRotation::new();
                rotation.cycle(run).name()
            }
        };
        let config = EnvConfig::default()
            .with_topology(topology)
            .with_slots(self.num_slots)
            .with_load(self.load)
            .with_episode_length(self.episode_length)
            .with_seed(seed);
        config.validate()?;
        Ok(config)
    }
}

fn preset(
    name: &'static str,
    label: &'static str,
    category: &'static str,
    topology: Option<&'static str>,
    num_slots: usize,
    load: f64,
    episode_length: usize,
) -> Scenario {
    Scenario {
        name,
        label,
        category,
        topology,
        num_slots,
        load,
        episode_length,
        criteria: PassCriteria::default(),
    }
}

pub fn scenarios() -> Vec<Scenario> {
    let extreme = EnvConfig::extreme();
    vec![
        // ─── Defaults ───────────────────────────────────────────────────
        preset("NSFNET_DEFAULT", "NSFNET 196 slots", "default", Some("NSFNET"), 196, 0.8, 100),
        Scenario {
            name: "NSFNET_EXTREME",
            label: "NSFNET Extreme",
            category: "extreme",
            topology: Some("NSFNET"),
            num_slots: extreme.num_slots,
            load: extreme.load,
            episode_length: extreme.episode_length,
            criteria: PassCriteria::default(),
        },
        // ─── Per Topology ───────────────────────────────────────────────
        preset("USNET_DEFAULT", "USNET 196 slots", "topology", Some("USNET"), 196, 0.8, 100),
        preset("EURO_DEFAULT", "EURO 196 slots", "topology", Some("EURO"), 196, 0.8, 100),
        preset("UKNET_DEFAULT", "UKNET 196 slots", "topology", Some("UKNET"), 196, 0.8, 100),
        preset("JAPAN_DEFAULT", "JAPAN 196 slots", "topology", Some("JAPAN"), 196, 0.8, 100),
        preset("BRAZIL_DEFAULT", "BRAZIL 196 slots", "topology", Some("BRAZIL"), 196, 0.8, 100),
        // ─── Stress ─────────────────────────────────────────────────────
        preset("NSFNET_NARROW", "NSFNET 40 slots", "stress", Some("NSFNET"), 40, 0.8, 200),
        preset("NSFNET_LONG", "NSFNET 1000 requests", "stress", Some("NSFNET"), 196, 0.8, 1000),
        Scenario {
            name: "NSFNET_SATURATED",
            label: "NSFNET 8 slots",
            category: "stress",
            topology: Some("NSFNET"),
            num_slots: 8,
            load: 0.95,
            episode_length: 300,
            criteria: PassCriteria {
                // 8 slots per link fill within a few dozen requests
                min_blocking: Some(0.5),
                ..Default::default()
            },
        },
        // ─── Rotation ───────────────────────────────────────────────────
        preset("ROTATION", "Catalog rotation", "rotation", None, 196, 0.8, 100),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_presets_validate() {
        for s in scenarios() {
            for run in 0..3 {
                assert!(s.config(run, run as u64).is_ok(), "{}", s.name);
            }
        }
    }

    #[test]
    fn test_rotation_changes_topology_per_run() {
        let all = scenarios();
        let rotation = all.iter().find(|s| s.name == "ROTATION").expect("test: rotation preset");
        let a = rotation.config(0, 0).expect("test: valid");
        let b = rotation.config(1, 0).expect("test: valid");
        assert_ne!(a.topology, b.topology);
    }
}
