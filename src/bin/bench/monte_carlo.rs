// Monte Carlo Infrastructure: N runs per scenario and policy
// Run i uses seed base + i for both the environment and the policy RNG

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rmsa_engine::*;
use tracing::warn;

use crate::policy::Policy;
use crate::report::*;
use crate::scenarios::Scenario;
use crate::time_series::TimeSeriesRecorder;

use std::time::Instant;

const EPS: f64 = 1e-9;

/// Per-step checks that must hold for any policy.
#[derive(Debug, Default)]
struct InvariantTracker {
    violations: u32,
    last_utilization: f64,
    last_steps: usize,
}

impl InvariantTracker {
    fn record(&mut self, result: &StepResult) {
        let info = &result.info;
        let rates = info.blocking_probability + info.acceptance_rate;
        let ok = (rates - 1.0).abs() < EPS
            && (result.reward == 1.0 || result.reward == -1.0)
            && (result.reward > 0.0) == info.allocation_success
            && (0.0..=1.0).contains(&info.fragmentation)
            && (0.0..=1.0).contains(&info.load_balance)
            && info.spectral_efficiency + EPS >= self.last_utilization
            && info.steps == self.last_steps + 1
            && info.path.is_some() == info.allocation_success;
        if !ok {
            self.violations += 1;
            warn!(step = info.steps, "invariant violated");
        }
        self.last_utilization = info.spectral_efficiency;
        self.last_steps = info.steps;
    }
}

/// Run a single episode of a scenario with a specific seed.
pub fn run_single(
    scenario: &Scenario,
    policy: Policy,
    run: usize,
    seed: u64,
    time_series_dir: Option<&std::path::Path>,
) -> Result<BenchResult, ConfigError> {
    let start = Instant::now();
    let mut env = RmsaEnv::new(scenario.config(run, seed)?)?;
    let mut policy_rng = ChaCha8Rng::seed_from_u64(seed);
    let mut metrics = EpisodeMetrics::new();
    let mut invariants = InvariantTracker::default();
    let mut time_series = time_series_dir.map(|_| TimeSeriesRecorder::new());
    let mut reasons = [0usize; 3];

    env.reset(None);
    loop {
        let action = policy.choose(&env, &mut policy_rng);
        let result = match env.step(action) {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "step rejected");
                invariants.violations += 1;
                break;
            }
        };

        invariants.record(&result);
        metrics.update(&result.info, result.reward);
        if let Some(reason) = result.info.block_reason {
            reasons[match reason {
                BlockReason::InvalidPath => 0,
                BlockReason::ReachExceeded => 1,
                BlockReason::SpectrumExhausted => 2,
            }] += 1;
        }
        if let Some(ts) = time_series.as_mut() {
            ts.record(action, &result);
        }
        if result.done() {
            break;
        }
    }

    if let (Some(ts), Some(dir)) = (&time_series, time_series_dir) {
        let path = dir.join(format!("{}-seed-{}.jsonl", policy.name(), seed));
        if let Err(e) = ts.write_jsonl(&path) {
            eprintln!("  Warning: failed to write time series: {}", e);
        }
    }

    let elapsed = start.elapsed();
    let elapsed_secs = elapsed.as_secs_f64().max(0.001);

    let counters = env.counters();
    let summary = metrics.summary();
    let spectrum = env.spectrum();
    let invariants_hold = invariants.violations == 0;

    let mut pass = true;
    if scenario.criteria.require_invariants && !invariants_hold {
        pass = false;
    }
    if scenario.criteria.require_full_episode && counters.total_requests != scenario.episode_length {
        pass = false;
    }
    if let Some(min_blocking) = scenario.criteria.min_blocking {
        if counters.blocking_probability() < min_blocking {
            pass = false;
        }
    }

    Ok(BenchResult {
        scenario: scenario.label.to_string(),
        policy: policy.name(),
        seed,
        pass,
        requests: counters.total_requests,
        allocated: counters.allocated,
        blocked: counters.blocked,
        blocked_invalid_path: reasons[0],
        blocked_reach: reasons[1],
        blocked_spectrum: reasons[2],
        blocking_probability: counters.blocking_probability(),
        final_utilization: spectrum.utilization(),
        final_fragmentation: spectrum.fragmentation(),
        final_load_balance: spectrum.load_balance(),
        mean_qot: summary.qot,
        mean_reward: summary.mean_reward,
        composite_score: composite_score(&summary),
        invariants_hold,
        elapsed_ms: elapsed.as_millis(),
        steps_per_sec: counters.total_requests as f64 / elapsed_secs,
    })
}

/// Run Monte Carlo: N runs of a scenario under one policy, aggregate stats.
pub fn run_monte_carlo(
    scenario: &Scenario,
    policy: Policy,
    n_runs: usize,
    base_seed: u64,
    time_series_base: Option<&std::path::Path>,
) -> Result<MonteCarloReport, ConfigError> {
    let ts_dir = time_series_base.map(|base| base.join(scenario.name.to_lowercase()));

    let mut results = Vec::with_capacity(n_runs);
    for i in 0..n_runs {
        let seed = base_seed + i as u64;
        results.push(run_single(scenario, policy, i, seed, ts_dir.as_deref())?);
    }

    Ok(aggregate(scenario, policy, results))
}

fn stats_of(results: &[BenchResult], f: impl Fn(&BenchResult) -> f64) -> Stats {
    Stats::from_samples(&results.iter().map(f).collect::<Vec<_>>())
}

/// Aggregate individual runs into a MonteCarloReport.
fn aggregate(scenario: &Scenario, policy: Policy, results: Vec<BenchResult>) -> MonteCarloReport {
    let n = results.len();
    let passed = results.iter().filter(|r| r.pass).count();

    MonteCarloReport {
        scenario_name: scenario.name.to_string(),
        label: scenario.label.to_string(),
        category: scenario.category.to_string(),
        policy: policy.name(),
        n_runs: n,
        pass_rate: passed as f64 / n.max(1) as f64,
        blocking_probability: stats_of(&results, |r| r.blocking_probability),
        final_utilization: stats_of(&results, |r| r.final_utilization),
        final_fragmentation: stats_of(&results, |r| r.final_fragmentation),
        final_load_balance: stats_of(&results, |r| r.final_load_balance),
        mean_qot: stats_of(&results, |r| r.mean_qot),
        composite_score: stats_of(&results, |r| r.composite_score),
        elapsed_ms: stats_of(&results, |r| r.elapsed_ms as f64),
        steps_per_sec: stats_of(&results, |r| r.steps_per_sec),
        individual_runs: results,
    }
}
