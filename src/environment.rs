// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Elastic Optical Network Simulation Suite ("RMSA") - Environment Core

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace};
use wasm_bindgen::prelude::*;

use crate::config::{ConfigError, EnvConfig};
use crate::modulation::Modulation;
use crate::routing::{k_shortest_paths, CandidatePath};
use crate::spectrum::SpectrumGrid;
use crate::topology::{NodeId, Topology};
use crate::traffic::{RequestGenerator, MAX_BIT_RATE_GBPS};
use crate::types::*;

/// QoT proxy reported for an allocated request.
pub const ALLOCATED_QOT: f64 = 0.8;

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Misuse of the runtime interface. Blocked requests are never errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvError {
    #[error("environment must be reset before stepping")]
    NotReset,
    #[error("episode finished; call reset to start a new one")]
    EpisodeFinished,
    #[error("action {action} outside action space of size {action_count}")]
    ActionOutOfRange { action: usize, action_count: usize },
}

// ─── Phase ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodePhase {
    Uninitialized,
    Ready,
    Terminal,
}

// ─── Attempt ─────────────────────────────────────────────────────────────────

/// Outcome of one allocation attempt.
#[derive(Debug, Clone, Default)]
struct Attempt {
    path: Option<Vec<NodeId>>,
    modulation: Option<Modulation>,
    required_slots: Option<usize>,
    slot_start: Option<usize>,
    block_reason: Option<BlockReason>,
}

impl Attempt {
    fn blocked(reason: BlockReason) -> Self {
        Self {
            block_reason: Some(reason),
            ..Default::default()
        }
    }

    fn allocated(&self) -> bool {
        self.block_reason.is_none()
    }
}

// ─── RmsaEnv ─────────────────────────────────────────────────────────────────

#[wasm_bindgen]
pub struct RmsaEnv {
    pub(crate) config: EnvConfig,
    pub(crate) topology: &'static Topology,
    pub(crate) generator: RequestGenerator,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) spectrum: SpectrumGrid,
    pub(crate) counters: EpisodeCounters,
    pub(crate) current: Option<ConnectionRequest>,
    pub(crate) phase: EpisodePhase,
    pub(crate) last_info: Option<StepInfo>,
}

// ─── Internal Logic (Testable, pure Rust) ────────────────────────────────────

impl RmsaEnv {
    pub fn new(config: EnvConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let topology = Topology::by_name(&config.topology)
            .ok_or_else(|| ConfigError::UnknownTopology(config.topology.clone()))?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Ok(Self {
            generator: RequestGenerator::new(topology.node_count(), config.load),
            spectrum: SpectrumGrid::new(topology.edge_count(), config.num_slots),
            topology,
            rng,
            counters: EpisodeCounters::default(),
            current: None,
            phase: EpisodePhase::Uninitialized,
            last_info: None,
            config,
        })
    }

    /// Start a new episode. A seed replaces the RNG; otherwise the existing
    /// stream continues.
    pub fn reset(&mut self, seed: Option<u64>) -> ResetResult {
        if let Some(seed) = seed {
            self.rng = ChaCha8Rng::seed_from_u64(seed);
        }
        self.spectrum.clear();
        self.counters = EpisodeCounters::default();
        self.current = Some(self.generator.generate(&mut self.rng));
        self.phase = EpisodePhase::Ready;

        info!(
            topology = self.topology.name(),
            seed = ?seed,
            slots = self.config.num_slots,
            "episode reset"
        );

        let info = self.build_info(None);
        self.last_info = Some(info.clone());
        ResetResult {
            observation: self.observation(),
            info,
        }
    }

    /// Decode, route, allocate and advance to the next request.
    pub fn step(&mut self, action: usize) -> Result<StepResult, EnvError> {
        match self.phase {
            EpisodePhase::Uninitialized => return Err(EnvError::NotReset),
            EpisodePhase::Terminal => return Err(EnvError::EpisodeFinished),
            EpisodePhase::Ready => {}
        }
        let action_count = self.action_count();
        if action >= action_count {
            return Err(EnvError::ActionOutOfRange { action, action_count });
        }
        let request = self.current.clone().ok_or(EnvError::NotReset)?;

        let (path_index, modulation) = self.decode_action(action);
        let paths = k_shortest_paths(
            self.topology,
            request.source,
            request.destination,
            self.config.k_paths,
        );

        let attempt = match paths.get(path_index) {
            None => Attempt::blocked(BlockReason::InvalidPath),
            Some(path) => self.try_allocate(path, modulation, request.bit_rate_gbps),
        };

        let allocated = attempt.allocated();
        match attempt.block_reason {
            None => trace!(
                request = %request.label(),
                path = ?attempt.path,
                modulation = %modulation,
                start = ?attempt.slot_start,
                "allocated"
            ),
            Some(reason) => debug!(
                request = %request.label(),
                action,
                reason = ?reason,
                "blocked"
            ),
        }

        self.counters.record(allocated);
        let reward = if allocated { 1.0 } else { -1.0 };
        let terminated = self.counters.total_requests >= self.config.episode_length;

        if terminated {
            self.phase = EpisodePhase::Terminal;
            info!(
                requests = self.counters.total_requests,
                blocking_probability = self.counters.blocking_probability(),
                "episode finished"
            );
        } else {
            self.current = Some(self.generator.generate(&mut self.rng));
        }

        let info = self.build_info(Some(&attempt));
        self.last_info = Some(info.clone());
        Ok(StepResult {
            observation: self.observation(),
            reward,
            terminated,
            truncated: false,
            info,
        })
    }

    fn try_allocate(&mut self, path: &CandidatePath, modulation: Modulation, bit_rate: f64) -> Attempt {
        if !modulation.supports(path.distance_km) {
            return Attempt {
                modulation: Some(modulation),
                block_reason: Some(BlockReason::ReachExceeded),
                ..Default::default()
            };
        }

        let required = modulation.required_slots(bit_rate);
        let edges = match self.topology.path_edges(&path.nodes) {
            Some(edges) => edges,
            None => return Attempt::blocked(BlockReason::InvalidPath),
        };

        match self.spectrum.find_first_fit(&edges, required) {
            Some(start) => {
                self.spectrum.commit(&edges, start, required);
                Attempt {
                    path: Some(path.nodes.clone()),
                    modulation: Some(modulation),
                    required_slots: Some(required),
                    slot_start: Some(start),
                    block_reason: None,
                }
            }
            None => Attempt {
                modulation: Some(modulation),
                required_slots: Some(required),
                block_reason: Some(BlockReason::SpectrumExhausted),
                ..Default::default()
            },
        }
    }

    fn build_info(&self, attempt: Option<&Attempt>) -> StepInfo {
        let allocated = attempt.map(Attempt::allocated).unwrap_or(false);
        StepInfo {
            allocation_success: allocated,
            blocking_probability: self.counters.blocking_probability(),
            acceptance_rate: self.counters.acceptance_rate(),
            spectral_efficiency: self.spectrum.utilization(),
            fragmentation: self.spectrum.fragmentation(),
            qot: if allocated { ALLOCATED_QOT } else { 0.0 },
            load_balance: self.spectrum.load_balance(),
            steps: self.counters.total_requests,
            connection_label: self.current.as_ref().map(|r| r.label()).unwrap_or_default(),
            path: attempt.and_then(|a| a.path.as_deref()).map(render_path),
            modulation: attempt.and_then(|a| a.modulation),
            required_slots: attempt.and_then(|a| a.required_slots),
            slot_start: attempt.and_then(|a| a.slot_start),
            block_reason: attempt.and_then(|a| a.block_reason),
            shaped_reward: None,
        }
    }

    /// Flat observation: source one-hot, destination one-hot, bit-rate / 400,
    /// row-major occupancy, per-edge utilization. All values in [0, 1].
    pub fn observation(&self) -> Vec<f32> {
        let n = self.topology.node_count();
        let mut obs = vec![0.0_f32; 2 * n + 1];
        if let Some(req) = &self.current {
            obs[req.source as usize] = 1.0;
            obs[n + req.destination as usize] = 1.0;
            obs[2 * n] = (req.bit_rate_gbps / MAX_BIT_RATE_GBPS) as f32;
        }
        obs.reserve(self.observation_len() - obs.len());
        obs.extend(self.spectrum.to_f32());
        obs.extend(self.spectrum.edge_utilization().into_iter().map(|u| u as f32));
        obs
    }

    // ─── Action encoding (row-major, modulation fastest) ─────────────────────

    pub fn decode_action(&self, action: usize) -> (usize, Modulation) {
        let path_index = action / Modulation::COUNT;
        let modulation = Modulation::ALL[action % Modulation::COUNT];
        (path_index, modulation)
    }

    pub fn encode_action(&self, path_index: usize, modulation: Modulation) -> usize {
        path_index * Modulation::COUNT + modulation.index()
    }

    // ─── Accessors ───────────────────────────────────────────────────────────

    pub fn action_count(&self) -> usize {
        self.config.k_paths * Modulation::COUNT
    }

    pub fn observation_len(&self) -> usize {
        let n = self.topology.node_count();
        let e = self.topology.edge_count();
        2 * n + 1 + e * self.config.num_slots + e
    }

    /// Ranked candidate paths for the current request.
    pub fn candidate_paths(&self) -> Vec<CandidatePath> {
        match &self.current {
            Some(req) => k_shortest_paths(self.topology, req.source, req.destination, self.config.k_paths),
            None => Vec::new(),
        }
    }

    pub fn current_request(&self) -> Option<&ConnectionRequest> {
        self.current.as_ref()
    }

    pub fn phase(&self) -> EpisodePhase {
        self.phase
    }

    pub fn counters(&self) -> EpisodeCounters {
        self.counters
    }

    pub fn spectrum(&self) -> &SpectrumGrid {
        &self.spectrum
    }

    pub fn topology(&self) -> &'static Topology {
        self.topology
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn last_info(&self) -> Option<&StepInfo> {
        self.last_info.as_ref()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> RmsaEnv {
        RmsaEnv::new(EnvConfig::default().with_seed(seed)).expect("test: default config is valid")
    }

    #[test]
    fn test_observation_len_nsfnet() {
        let env = seeded(1);
        // 14*2 + 1 + 21*196 + 21
        assert_eq!(env.observation_len(), 4166);
        assert_eq!(env.action_count(), 12);
    }

    #[test]
    fn test_step_before_reset_rejected() {
        let mut env = seeded(1);
        assert_eq!(env.phase(), EpisodePhase::Uninitialized);
        assert_eq!(env.step(0).map(|_| ()), Err(EnvError::NotReset));
    }

    #[test]
    fn test_out_of_range_action_rejected() {
        let mut env = seeded(1);
        env.reset(None);
        assert_eq!(
            env.step(12).map(|_| ()),
            Err(EnvError::ActionOutOfRange { action: 12, action_count: 12 })
        );
        // rejected actions do not count as requests
        assert_eq!(env.counters().total_requests, 0);
    }

    #[test]
    fn test_action_round_trip_is_row_major() {
        let env = seeded(1);
        assert_eq!(env.decode_action(0), (0, Modulation::Bpsk));
        assert_eq!(env.decode_action(5), (1, Modulation::Qpsk));
        assert_eq!(env.decode_action(11), (2, Modulation::Qam16));
        assert_eq!(env.encode_action(2, Modulation::Qam8), 10);
    }

    #[test]
    fn test_reset_observation_layout() {
        let mut env = seeded(3);
        let reset = env.reset(Some(3));
        let req = env.current_request().cloned().expect("test: request after reset");
        let n = 14;
        assert_eq!(reset.observation.len(), env.observation_len());
        assert_eq!(reset.observation[req.source as usize], 1.0);
        assert_eq!(reset.observation[n + req.destination as usize], 1.0);
        assert_eq!(reset.observation[..2 * n].iter().filter(|&&v| v == 1.0).count(), 2);
        let rate = reset.observation[2 * n];
        assert!((rate as f64 - req.bit_rate_gbps / 400.0).abs() < 1e-6);
        assert!(reset.observation[2 * n + 1..].iter().all(|&v| v == 0.0));
        assert_eq!(reset.info.steps, 0);
        assert!(!reset.info.allocation_success);
        assert_eq!(reset.info.connection_label, req.label());
    }

    #[test]
    fn test_successful_step_commits_spectrum() {
        let mut env = seeded(5);
        env.reset(Some(5));
        let req = env.current_request().cloned().expect("test: request");
        let paths = env.candidate_paths();
        let path = &paths[0];
        let modulation = Modulation::most_efficient_for(path.distance_km).expect("test: some format reaches");
        let action = env.encode_action(0, modulation);

        let result = env.step(action).expect("test: valid step");
        assert_eq!(result.reward, 1.0);
        assert!(result.info.allocation_success);
        assert_eq!(result.info.path, Some(render_path(&path.nodes)));
        assert_eq!(result.info.qot, ALLOCATED_QOT);

        let slots = modulation.required_slots(req.bit_rate_gbps);
        let edges = env.topology().path_edges(&path.nodes).expect("test: path edges");
        for &edge in &edges {
            assert!(!env.spectrum().is_free(edge, 0..slots));
        }
        assert_eq!(env.spectrum().occupied_slots(), edges.len() * slots);
    }

    #[test]
    fn test_terminal_step_keeps_last_request() {
        let mut env = RmsaEnv::new(EnvConfig::default().with_seed(9).with_episode_length(1))
            .expect("test: valid config");
        env.reset(None);
        let before = env.current_request().cloned();
        let result = env.step(0).expect("test: valid step");
        assert!(result.terminated);
        assert!(!result.truncated);
        assert_eq!(env.current_request().cloned(), before);
        assert_eq!(env.phase(), EpisodePhase::Terminal);
        assert_eq!(env.step(0).map(|_| ()), Err(EnvError::EpisodeFinished));
    }
}
