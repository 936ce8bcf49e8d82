// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Elastic Optical Network Simulation Suite ("RMSA") - Reward Shaping

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::config::{ConfigError, EnvConfig};
use crate::environment::{EnvError, RmsaEnv};
use crate::types::{ResetResult, StepInfo, StepResult};

/// Registered shaper ids, in `from_id` order.
pub const REWARD_IDS: [&str; 6] = [
    "binary",
    "multi_objective",
    "qot_aware",
    "bayesian_multi_objective",
    "delayed_assignment",
    "adaptive_curriculum",
];

/// Seeds handed to the inner environment are drawn from `[0, RESEED_RANGE)`.
pub const RESEED_RANGE: u64 = 1_000_000;

// ─── Weights ─────────────────────────────────────────────────────────────────

/// Weights of the QoT-aware objective. `fragmentation` is applied with its
/// sign, so it is negative to penalise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QotWeights {
    pub allocation: f64,
    pub qot: f64,
    pub spectral_efficiency: f64,
    pub fragmentation: f64,
    pub load_balance: f64,
}

impl QotWeights {
    pub const QOT_AWARE: Self = Self {
        allocation: 10.0,
        qot: 3.0,
        spectral_efficiency: 5.0,
        fragmentation: -2.0,
        load_balance: 1.5,
    };

    pub const BAYESIAN: Self = Self {
        allocation: 12.0,
        qot: 4.0,
        spectral_efficiency: 4.0,
        fragmentation: -2.5,
        load_balance: 2.0,
    };

    fn score(&self, info: &StepInfo) -> f64 {
        self.allocation
            + (info.qot - 1.0).exp() * self.qot
            + (1.0 - info.spectral_efficiency) * self.spectral_efficiency
            + info.fragmentation * self.fragmentation
            + (1.0 - info.load_balance) * self.load_balance
    }
}

/// Default weights of the linear multi-objective shaper. Keys missing from
/// the info payload contribute nothing.
pub const MULTI_OBJECTIVE_WEIGHTS: [(&str, f64); 5] = [
    ("allocation", 10.0),
    ("qot", 3.0),
    ("spectral_efficiency", 5.0),
    ("fragmentation", 2.0),
    ("load_balance", 1.5),
];

// ─── RewardShaper ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum RewardShaper {
    Binary,
    MultiObjective {
        weights: Vec<(String, f64)>,
        block_penalty: f64,
    },
    QotAware {
        weights: QotWeights,
        block_penalty: f64,
    },
    DelayedAssignment {
        gamma: f64,
        beta: f64,
        previous_fragmentation: f64,
        previous_load_balance: f64,
    },
    AdaptiveCurriculum {
        total_episodes: usize,
        current_episode: usize,
        rng: ChaCha8Rng,
    },
}

impl RewardShaper {
    /// Build a shaper by id. `seed` drives the exploration bonus of the
    /// curriculum shaper and is ignored by the others.
    pub fn from_id(id: &str, seed: u64) -> Result<Self, ConfigError> {
        let shaper = match id {
            "binary" => Self::Binary,
            "multi_objective" => Self::MultiObjective {
                weights: MULTI_OBJECTIVE_WEIGHTS
                    .iter()
                    .map(|&(k, w)| (k.to_string(), w))
                    .collect(),
                block_penalty: -2.0,
            },
            "qot_aware" => Self::QotAware {
                weights: QotWeights::QOT_AWARE,
                block_penalty: -5.0,
            },
            "bayesian_multi_objective" => Self::QotAware {
                weights: QotWeights::BAYESIAN,
                block_penalty: -5.0,
            },
            "delayed_assignment" => Self::DelayedAssignment {
                gamma: 0.95,
                beta: 0.5,
                previous_fragmentation: 0.0,
                previous_load_balance: 0.0,
            },
            "adaptive_curriculum" => Self::AdaptiveCurriculum {
                total_episodes: 1000,
                current_episode: 0,
                rng: ChaCha8Rng::seed_from_u64(seed),
            },
            other => return Err(ConfigError::UnknownReward(other.to_string())),
        };
        Ok(shaper)
    }

    /// Map one transition to a shaped reward. Stateful variants update their
    /// memory here.
    pub fn shape(&mut self, _observation: &[f32], _action: usize, _raw: f64, done: bool, info: &StepInfo) -> f64 {
        match self {
            Self::Binary => {
                if info.allocation_success {
                    1.0
                } else {
                    -1.0
                }
            }
            Self::MultiObjective { weights, block_penalty } => {
                if !info.allocation_success {
                    return *block_penalty;
                }
                weights
                    .iter()
                    .filter_map(|(key, w)| info.metric(key).map(|v| v * w))
                    .sum()
            }
            Self::QotAware { weights, block_penalty } => {
                if !info.allocation_success {
                    return *block_penalty;
                }
                weights.score(info)
            }
            Self::DelayedAssignment {
                gamma,
                beta,
                previous_fragmentation,
                previous_load_balance,
            } => {
                let fragmentation = info.fragmentation;
                let load_balance = info.load_balance;
                let reward = if info.allocation_success {
                    let d_frag = fragmentation - *previous_fragmentation;
                    let d_lb = load_balance - *previous_load_balance;
                    1.0 + *gamma * (-d_frag + *beta * -d_lb)
                } else {
                    -1.0
                };
                *previous_fragmentation = fragmentation;
                *previous_load_balance = load_balance;
                reward
            }
            Self::AdaptiveCurriculum {
                total_episodes,
                current_episode,
                rng,
            } => {
                if done {
                    *current_episode += 1;
                }
                if !info.allocation_success {
                    return -1.0;
                }
                let weight = curriculum_weight(*current_episode, *total_episodes);
                let exploration: f64 = rng.gen::<f64>() * 0.1;
                let quality = info.metric("modulation_level").unwrap_or(0.0) / 4.0 * 0.5;
                let complex = QotWeights::QOT_AWARE.score(info);
                (1.0 - weight) * (1.0 + exploration + quality) + weight * complex
            }
        }
    }
}

/// Ramp from 0 to 1 over the first three quarters of the curriculum.
fn curriculum_weight(current_episode: usize, total_episodes: usize) -> f64 {
    let span = total_episodes as f64 * 0.75;
    if span <= 0.0 {
        return 1.0;
    }
    (current_episode as f64 / span).min(1.0)
}

// ─── ShapedEnv ───────────────────────────────────────────────────────────────

/// Environment wrapper that substitutes the shaped reward and reseeds the
/// inner environment on every reset.
pub struct ShapedEnv {
    env: RmsaEnv,
    shaper: RewardShaper,
    seed_rng: ChaCha8Rng,
}

impl ShapedEnv {
    pub fn new(config: EnvConfig, shaper: RewardShaper) -> Result<Self, ConfigError> {
        let seed_rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Ok(Self {
            env: RmsaEnv::new(config)?,
            shaper,
            seed_rng,
        })
    }

    pub fn reset(&mut self) -> ResetResult {
        let seed = self.seed_rng.gen_range(0..RESEED_RANGE);
        self.env.reset(Some(seed))
    }

    pub fn step(&mut self, action: usize) -> Result<StepResult, EnvError> {
        let mut result = self.env.step(action)?;
        let shaped = self.shaper.shape(
            &result.observation,
            action,
            result.reward,
            result.done(),
            &result.info,
        );
        result.reward = shaped;
        result.info.shaped_reward = Some(shaped);
        Ok(result)
    }

    /// Independent copy for parallel rollouts: fresh environment, own seed
    /// stream, cloned shaper state.
    pub fn fork(&mut self) -> Result<Self, ConfigError> {
        let seed = self.seed_rng.gen_range(0..RESEED_RANGE);
        debug!(seed, "forking shaped environment");
        let config = self.env.config().clone().with_seed(seed);
        Self::new(config, self.shaper.clone())
    }

    pub fn inner(&self) -> &RmsaEnv {
        &self.env
    }

    pub fn shaper(&self) -> &RewardShaper {
        &self.shaper
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modulation::Modulation;

    fn info(success: bool) -> StepInfo {
        StepInfo {
            allocation_success: success,
            blocking_probability: 0.0,
            acceptance_rate: 1.0,
            spectral_efficiency: 0.2,
            fragmentation: 0.1,
            qot: if success { 0.8 } else { 0.0 },
            load_balance: 0.9,
            steps: 1,
            connection_label: String::new(),
            path: None,
            modulation: if success { Some(Modulation::Qam16) } else { None },
            required_slots: None,
            slot_start: None,
            block_reason: None,
            shaped_reward: None,
        }
    }

    fn shape(shaper: &mut RewardShaper, done: bool, info: &StepInfo) -> f64 {
        shaper.shape(&[], 0, 0.0, done, info)
    }

    #[test]
    fn test_unknown_id_rejected() {
        assert_eq!(
            RewardShaper::from_id("quantum", 0).map(|_| ()),
            Err(ConfigError::UnknownReward("quantum".to_string()))
        );
        for id in REWARD_IDS {
            assert!(RewardShaper::from_id(id, 0).is_ok(), "{id}");
        }
    }

    #[test]
    fn test_binary() {
        let mut s = RewardShaper::Binary;
        assert_eq!(shape(&mut s, false, &info(true)), 1.0);
        assert_eq!(shape(&mut s, false, &info(false)), -1.0);
    }

    #[test]
    fn test_multi_objective_skips_missing_keys() {
        let mut s = RewardShaper::from_id("multi_objective", 0).expect("test: known id");
        // allocation is not an info key: 3*0.8 + 5*0.2 + 2*0.1 + 1.5*0.9
        let expected = 2.4 + 1.0 + 0.2 + 1.35;
        assert!((shape(&mut s, false, &info(true)) - expected).abs() < 1e-9);
        assert_eq!(shape(&mut s, false, &info(false)), -2.0);
    }

    #[test]
    fn test_qot_aware_formula() {
        let mut s = RewardShaper::from_id("qot_aware", 0).expect("test: known id");
        let expected = 10.0 + (-0.2f64).exp() * 3.0 + 0.8 * 5.0 - 0.2 + 0.1 * 1.5;
        assert!((shape(&mut s, false, &info(true)) - expected).abs() < 1e-9);
        assert_eq!(shape(&mut s, false, &info(false)), -5.0);

        let mut b = RewardShaper::from_id("bayesian_multi_objective", 0).expect("test: known id");
        let expected = 12.0 + (-0.2f64).exp() * 4.0 + 0.8 * 4.0 - 0.25 + 0.1 * 2.0;
        assert!((shape(&mut b, false, &info(true)) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_delayed_assignment_tracks_deltas() {
        let mut s = RewardShaper::from_id("delayed_assignment", 0).expect("test: known id");
        // from zero state: 1 + 0.95 * (-0.1 + 0.5 * -0.9)
        let first = shape(&mut s, false, &info(true));
        assert!((first - (1.0 + 0.95 * (-0.1 - 0.45))).abs() < 1e-9);
        // same metrics again: no delta
        assert!((shape(&mut s, false, &info(true)) - 1.0).abs() < 1e-9);
        assert_eq!(shape(&mut s, false, &info(false)), -1.0);
    }

    #[test]
    fn test_curriculum_starts_simple_and_counts_episodes() {
        let mut s = RewardShaper::from_id("adaptive_curriculum", 7).expect("test: known id");
        // weight 0: 1 + [0, 0.1) + 4/4*0.5
        let r = shape(&mut s, false, &info(true));
        assert!((1.5..1.6).contains(&r), "reward {r}");
        assert_eq!(shape(&mut s, true, &info(false)), -1.0);
        match &s {
            RewardShaper::AdaptiveCurriculum { current_episode, .. } => assert_eq!(*current_episode, 1),
            other => panic!("unexpected shaper {other:?}"),
        }
        assert_eq!(curriculum_weight(750, 1000), 1.0);
        assert!((curriculum_weight(375, 1000) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_curriculum_quality_bonus_tracks_modulation_level() {
        let mut low = RewardShaper::from_id("adaptive_curriculum", 3).expect("test: known id");
        let mut high = RewardShaper::from_id("adaptive_curriculum", 3).expect("test: known id");
        let bpsk = StepInfo {
            modulation: Some(Modulation::Bpsk),
            ..info(true)
        };
        // same seed, same exploration draw: only level/4 * 0.5 differs
        let diff = shape(&mut high, false, &info(true)) - shape(&mut low, false, &bpsk);
        assert!((diff - (0.5 - 0.125)).abs() < 1e-12, "diff {diff}");
    }

    #[test]
    fn test_shaped_env_records_shaped_reward() {
        let shaper = RewardShaper::from_id("qot_aware", 0).expect("test: known id");
        let mut env = ShapedEnv::new(EnvConfig::default().with_seed(11), shaper).expect("test: valid config");
        env.reset();
        let result = env.step(0).expect("test: valid step");
        assert_eq!(result.info.shaped_reward, Some(result.reward));
        if !result.info.allocation_success {
            assert_eq!(result.reward, -5.0);
        } else {
            assert!(result.reward > 10.0);
        }
    }

    #[test]
    fn test_shaped_env_reseed_is_deterministic() {
        let make = || {
            ShapedEnv::new(EnvConfig::default().with_seed(42), RewardShaper::Binary).expect("test: valid config")
        };
        let (mut a, mut b) = (make(), make());
        for _ in 0..3 {
            assert_eq!(a.reset(), b.reset());
        }
        let mut fork_a = a.fork().expect("test: fork");
        let mut fork_b = b.fork().expect("test: fork");
        assert!(fork_a.inner().config().seed.is_some_and(|s| s < RESEED_RANGE));
        assert_eq!(fork_a.reset(), fork_b.reset());
        assert_eq!(a.reset(), b.reset());
    }
}
