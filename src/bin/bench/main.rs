// RMSA Benchmark Runner v0.1.0: baseline policies across topology presets
// Monte Carlo (N=30), seedable PRNG, optional per-step JSONL trail
//
// Usage:
//   cargo run --release --bin bench                          # All scenarios × all policies
//   cargo run --release --bin bench -- --runs 5              # Quick mode (5 runs each)
//   cargo run --release --bin bench -- NSFNET                # Filter by name/label/category
//   cargo run --release --bin bench -- --policy random       # Single policy
//   cargo run --release --bin bench -- --time-series         # Enable JSONL output
//   cargo run --release --bin bench -- --seed 42             # Custom base seed
//
// RUST_LOG=rmsa_engine=debug shows every blocked request.

mod monte_carlo;
mod policy;
mod report;
mod scenarios;
mod time_series;

use policy::{Policy, ALL_POLICIES};
use report::*;
use scenarios::*;
use std::error::Error;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

// ─── CLI Parsing ────────────────────────────────────────────────────────────

struct CliArgs {
    runs: usize,
    seed: u64,
    time_series: bool,
    policy: Option<String>,
    filter: Option<String>,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut cli = CliArgs {
        runs: 30,
        seed: 0,
        time_series: false,
        policy: None,
        filter: None,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--runs" => {
                i += 1;
                if i < args.len() {
                    cli.runs = args[i].parse().unwrap_or(30);
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    cli.seed = args[i].parse().unwrap_or(0);
                }
            }
            "--policy" => {
                i += 1;
                if i < args.len() {
                    cli.policy = Some(args[i].to_lowercase());
                }
            }
            "--time-series" => {
                cli.time_series = true;
            }
            arg if !arg.starts_with('-') => {
                cli.filter = Some(arg.to_string());
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    cli
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .init();
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let cli = parse_args();
    let all_scenarios = scenarios();

    let to_run: Vec<&Scenario> = match &cli.filter {
        Some(f) => {
            let f_lower = f.to_lowercase();
            all_scenarios.iter()
                .filter(|s| s.name.to_lowercase().contains(&f_lower)
                          || s.label.to_lowercase().contains(&f_lower)
                          || s.category.to_lowercase().contains(&f_lower))
                .collect()
        }
        None => all_scenarios.iter().collect(),
    };

    let policies: Vec<Policy> = match &cli.policy {
        Some(name) => ALL_POLICIES.iter().copied().filter(|p| p.name() == name).collect(),
        None => ALL_POLICIES.to_vec(),
    };

    if to_run.is_empty() || policies.is_empty() {
        eprintln!("Nothing to run for filter {:?} / policy {:?}", cli.filter, cli.policy);
        std::process::exit(1);
    }

    let ts_dir = if cli.time_series {
        Some(std::path::Path::new("benchmark-results/time-series").to_path_buf())
    } else {
        None
    };

    println!("\n  RMSA Benchmark Runner v0.1.0");
    println!("  PRNG: ChaCha8Rng | Runs/scenario: {} | Base seed: {}", cli.runs, cli.seed);
    println!("  Running {} scenario(s) × {} policy(ies)...\n", to_run.len(), policies.len());
    println!("  {:<24} {:<15} {:>5} {:>13} {:>7} {:>7} {:>9} {:>7}",
        "Scenario", "Policy", "Pass%", "Blocking", "Util", "Frag", "Score", "Time");
    println!("  {}", "-".repeat(96));

    let suite_start = Instant::now();
    let mut mc_reports = Vec::new();

    for scenario in &to_run {
        for &policy in &policies {
            let report = monte_carlo::run_monte_carlo(
                scenario,
                policy,
                cli.runs,
                cli.seed,
                ts_dir.as_deref(),
            )?;

            let pass_pct = report.pass_rate * 100.0;
            let status = if report.pass_rate >= 1.0 { "PASS" } else { "FAIL" };

            println!("  {:<24} {:<15} {:>4}% {:>6.3}±{:<5.3} {:>7.3} {:>7.3} {:>9.1} {:>5.0}ms  {}",
                report.label,
                report.policy,
                pass_pct as u32,
                report.blocking_probability.mean,
                report.blocking_probability.half_width(),
                report.final_utilization.mean,
                report.final_fragmentation.mean,
                report.composite_score.mean,
                report.elapsed_ms.mean,
                status,
            );

            mc_reports.push(report);
        }
    }

    let suite_elapsed = suite_start.elapsed();

    // ─── Summary ────────────────────────────────────────────────────────

    let total = mc_reports.len();
    let passed = mc_reports.iter().filter(|r| r.pass_rate >= 1.0).count();
    let failed = total - passed;
    let winners = winners(&mc_reports);

    println!("  {}", "-".repeat(96));
    println!("  Total: {}  Passed: {}  Failed: {}  Suite time: {:.1}s\n",
        total, passed, failed, suite_elapsed.as_secs_f64());

    println!("  Best policy per scenario (composite score):");
    for w in &winners {
        println!("    {:<24} {:<15} {:>9.1}", w.scenario, w.policy, w.composite_score);
    }
    println!();

    // ─── Write JSON Report ──────────────────────────────────────────────

    let ts = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis();
    let timestamp = format!("{}", ts);

    let report = BenchReport {
        timestamp: timestamp.clone(),
        version: "0.1.0",
        prng: "ChaCha8Rng",
        n_runs_per_scenario: cli.runs,
        summary: Summary {
            total,
            passed,
            failed,
            pass_rate: passed as f64 / total as f64,
        },
        winners,
        scenarios: mc_reports,
    };

    let dir = std::path::Path::new("benchmark-results");
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("bench-{}.json", timestamp));
    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(&path, &json)?;
    println!("  Results saved to: {}\n", path.display());

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
