// Benchmark Report Types
// Structured output for offline comparison of allocation policies

use serde::Serialize;

// ─── Statistics (per-metric Monte Carlo aggregation) ────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub mean: f64,
    pub std_dev: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub min: f64,
    pub max: f64,
    pub n: usize,
}

impl Stats {
    pub fn from_samples(samples: &[f64]) -> Self {
        let n = samples.len();
        if n == 0 {
            return Self { mean: 0.0, std_dev: 0.0, ci_lower: 0.0, ci_upper: 0.0, min: 0.0, max: 0.0, n: 0 };
        }
        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };
        let std_dev = variance.sqrt();
        let stderr = std_dev / (n as f64).sqrt();
        let z = 1.96; // 95% CI
        Self {
            mean,
            std_dev,
            ci_lower: mean - z * stderr,
            ci_upper: mean + z * stderr,
            min: samples.iter().cloned().fold(f64::INFINITY, f64::min),
            max: samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            n,
        }
    }

    pub fn half_width(&self) -> f64 {
        (self.ci_upper - self.ci_lower) / 2.0
    }
}

// ─── Single-Run Result ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct BenchResult {
    pub scenario: String,
    pub policy: &'static str,
    pub seed: u64,
    pub pass: bool,
    pub requests: usize,
    pub allocated: usize,
    pub blocked: usize,
    pub blocked_invalid_path: usize,
    pub blocked_reach: usize,
    pub blocked_spectrum: usize,
    pub blocking_probability: f64,
    pub final_utilization: f64,
    pub final_fragmentation: f64,
    pub final_load_balance: f64,
    pub mean_qot: f64,
    pub mean_reward: f64,
    pub composite_score: f64,
    /// Counter, rate and range checks held on every step.
    pub invariants_hold: bool,
    pub elapsed_ms: u128,
    pub steps_per_sec: f64,
}

// ─── Monte Carlo Report (per scenario × policy) ─────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct MonteCarloReport {
    pub scenario_name: String,
    pub label: String,
    pub category: String,
    pub policy: &'static str,
    pub n_runs: usize,
    pub pass_rate: f64,
    pub blocking_probability: Stats,
    pub final_utilization: Stats,
    pub final_fragmentation: Stats,
    pub final_load_balance: Stats,
    pub mean_qot: Stats,
    pub composite_score: Stats,
    pub elapsed_ms: Stats,
    pub steps_per_sec: Stats,
    pub individual_runs: Vec<BenchResult>,
}

// ─── Top-Level Report ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct BenchReport {
    pub timestamp: String,
    pub version: &'static str,
    pub prng: &'static str,
    pub n_runs_per_scenario: usize,
    pub summary: Summary,
    /// Best policy by mean composite score, per scenario.
    pub winners: Vec<Winner>,
    pub scenarios: Vec<MonteCarloReport>,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Winner {
    pub scenario: String,
    pub policy: &'static str,
    pub composite_score: f64,
}

/// Pick the top composite score per scenario, in order of first appearance.
pub fn winners(reports: &[MonteCarloReport]) -> Vec<Winner> {
    let mut out: Vec<Winner> = Vec::new();
    for r in reports {
        let score = r.composite_score.mean;
        match out.iter_mut().find(|w| w.scenario == r.scenario_name) {
            Some(w) if score > w.composite_score => {
                w.policy = r.policy;
                w.composite_score = score;
            }
            Some(_) => {}
            None => out.push(Winner {
                scenario: r.scenario_name.clone(),
                policy: r.policy,
                composite_score: score,
            }),
        }
    }
    out
}
