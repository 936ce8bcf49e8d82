// Per-Step JSONL Time Series Recorder
// Outputs one JSON line per request for independent analysis

use rmsa_engine::{BlockReason, StepResult};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
pub struct StepSnapshot {
    pub step: usize,
    pub action: usize,
    pub reward: f64,
    pub allocation_success: bool,
    pub blocking_probability: f64,
    pub spectral_efficiency: f64,
    pub fragmentation: f64,
    pub load_balance: f64,
    pub connection_label: String,
    pub path: Option<String>,
    pub slot_start: Option<usize>,
    pub block_reason: Option<BlockReason>,
}

impl StepSnapshot {
    pub fn from_step(action: usize, result: &StepResult) -> Self {
        let info = &result.info;
        Self {
            step: info.steps,
            action,
            reward: result.reward,
            allocation_success: info.allocation_success,
            blocking_probability: info.blocking_probability,
            spectral_efficiency: info.spectral_efficiency,
            fragmentation: info.fragmentation,
            load_balance: info.load_balance,
            connection_label: info.connection_label.clone(),
            path: info.path.clone(),
            slot_start: info.slot_start,
            block_reason: info.block_reason,
        }
    }
}

/// Accumulates step snapshots and writes them as JSONL.
pub struct TimeSeriesRecorder {
    snapshots: Vec<StepSnapshot>,
}

impl TimeSeriesRecorder {
    pub fn new() -> Self {
        Self { snapshots: Vec::new() }
    }

    pub fn record(&mut self, action: usize, result: &StepResult) {
        self.snapshots.push(StepSnapshot::from_step(action, result));
    }

    pub fn write_jsonl(&self, path: &std::path::Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::File::create(path)?;
        for snapshot in &self.snapshots {
            let line = serde_json::to_string(snapshot)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            writeln!(file, "{}", line)?;
        }
        Ok(())
    }
}
