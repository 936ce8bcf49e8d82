// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Elastic Optical Network Simulation Suite ("RMSA") - Episode Metrics

use serde::{Deserialize, Serialize};

use crate::types::StepInfo;

/// Running sums over the `StepInfo` payloads of one episode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EpisodeMetrics {
    allocated: usize,
    blocked: usize,
    qot_acc: f64,
    spectral_efficiency_acc: f64,
    fragmentation_acc: f64,
    load_balance_acc: f64,
    reward_acc: f64,
    steps: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub blocking: f64,
    pub acceptance: f64,
    pub qot: f64,
    pub spectral_efficiency: f64,
    pub fragmentation: f64,
    pub load_balance: f64,
    pub mean_reward: f64,
    pub steps: usize,
}

impl EpisodeMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, info: &StepInfo, reward: f64) {
        if info.allocation_success {
            self.allocated += 1;
        } else {
            self.blocked += 1;
        }
        self.qot_acc += info.qot;
        self.spectral_efficiency_acc += info.spectral_efficiency;
        self.fragmentation_acc += info.fragmentation;
        self.load_balance_acc += info.load_balance;
        self.reward_acc += reward;
        self.steps += 1;
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn summary(&self) -> EpisodeSummary {
        let n = self.steps.max(1) as f64;
        EpisodeSummary {
            blocking: self.blocked as f64 / n,
            acceptance: self.allocated as f64 / n,
            qot: self.qot_acc / n,
            spectral_efficiency: self.spectral_efficiency_acc / n,
            fragmentation: self.fragmentation_acc / n,
            load_balance: self.load_balance_acc / n,
            mean_reward: self.reward_acc / n,
            steps: self.steps,
        }
    }
}

/// Single ranking score for comparing policies. Higher is better; blocking
/// dominates.
pub fn composite_score(summary: &EpisodeSummary) -> f64 {
    summary.mean_reward * 100.0 + summary.spectral_efficiency * 50.0 + summary.qot * 30.0
        - summary.blocking * 200.0
}
