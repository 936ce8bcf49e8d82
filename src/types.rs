// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Elastic Optical Network Simulation Suite ("RMSA") - Type Definitions

use serde::{Deserialize, Serialize};

use crate::modulation::Modulation;
use crate::topology::NodeId;

// ─── ConnectionRequest ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRequest {
    pub source: NodeId,
    pub destination: NodeId,
    pub bit_rate_gbps: f64,
    pub arrival_time: f64,
    /// Generated for observability; occupancy is never released on expiry.
    pub holding_time: f64,
}

impl ConnectionRequest {
    /// Display label, e.g. `3→11 @ 200Gbps`.
    pub fn label(&self) -> String {
        format!("{}→{} @ {}Gbps", self.source, self.destination, self.bit_rate_gbps)
    }
}

/// Render a node path as `n0→n1→...`.
pub fn render_path(path: &[NodeId]) -> String {
    path.iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join("→")
}

// ─── EpisodeCounters ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeCounters {
    pub allocated: usize,
    pub blocked: usize,
    pub total_requests: usize,
}

impl EpisodeCounters {
    pub fn record(&mut self, allocated: bool) {
        if allocated {
            self.allocated += 1;
        } else {
            self.blocked += 1;
        }
        self.total_requests += 1;
    }

    pub fn blocking_probability(&self) -> f64 {
        self.blocked as f64 / self.total_requests.max(1) as f64
    }

    pub fn acceptance_rate(&self) -> f64 {
        self.allocated as f64 / self.total_requests.max(1) as f64
    }
}

// ─── BlockReason ─────────────────────────────────────────────────────────────

/// Why a request was blocked. Blocking is a simulation outcome, not an error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    /// Decoded path index has no corresponding candidate path (including the
    /// case where source and destination are disconnected).
    InvalidPath,
    /// Path distance exceeds the modulation's reach.
    ReachExceeded,
    /// No contiguous block is free on every link of the path.
    SpectrumExhausted,
}

// ─── StepInfo ────────────────────────────────────────────────────────────────

/// Metrics payload returned by `reset` and `step`. Serialises to the
/// string-keyed info mapping consumed by training and dashboard code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    pub allocation_success: bool,
    pub blocking_probability: f64,
    pub acceptance_rate: f64,
    /// Overall grid occupancy (kept under this name for consumers).
    pub spectral_efficiency: f64,
    pub fragmentation: f64,
    pub qot: f64,
    pub load_balance: f64,
    pub steps: usize,
    /// Label of the current (next) request.
    pub connection_label: String,
    /// Allocated path; present only when an allocation occurred.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modulation: Option<Modulation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_slots: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_start: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<BlockReason>,
    /// Filled in by reward-shaping wrappers only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shaped_reward: Option<f64>,
}

impl StepInfo {
    /// Numeric info value by key, or None for unknown/non-numeric keys.
    pub fn metric(&self, key: &str) -> Option<f64> {
        match key {
            "allocation_success" => Some(if self.allocation_success { 1.0 } else { 0.0 }),
            "blocking_probability" => Some(self.blocking_probability),
            "acceptance_rate" => Some(self.acceptance_rate),
            "spectral_efficiency" => Some(self.spectral_efficiency),
            "fragmentation" => Some(self.fragmentation),
            "qot" => Some(self.qot),
            "load_balance" => Some(self.load_balance),
            "steps" => Some(self.steps as f64),
            "modulation_level" => self.modulation.map(|m| m.level() as f64),
            "required_slots" => self.required_slots.map(|s| s as f64),
            "shaped_reward" => self.shaped_reward,
            _ => None,
        }
    }
}

// ─── Results ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResetResult {
    pub observation: Vec<f32>,
    pub info: StepInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepResult {
    pub observation: Vec<f32>,
    pub reward: f64,
    pub terminated: bool,
    /// Always false: no time-limit wrapper exists at this layer.
    pub truncated: bool,
    pub info: StepInfo,
}

impl StepResult {
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}
