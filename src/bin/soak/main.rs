// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Silicon Thermal Simulation Suite ("The Die") - Soak Runner
//
// Headless, seeded scenario runs against the pure engine.
//
// Usage:
//   cargo run --release --bin soak                         # all scenarios, 10 seeds each
//   cargo run --release --bin soak -- --runs 3             # quick mode
//   cargo run --release --bin soak -- MELTDOWN             # filter by name/label/category
//   cargo run --release --bin soak -- --ticks 5000         # override per-scenario tick count
//   cargo run --release --bin soak -- --time-series out/   # per-tick JSONL under out/<scenario>/
//   cargo run --release --bin soak -- --seed 42            # custom base seed

mod monte_carlo;
mod report;
mod scenarios;
mod time_series;

use std::path::PathBuf;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use log::info;

use report::*;
use scenarios::*;

// ─── CLI Parsing ────────────────────────────────────────────────────────────

struct CliArgs {
    runs: usize,
    seed: u64,
    ticks: Option<u64>,
    time_series: Option<PathBuf>,
    filter: Option<String>,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut cli = CliArgs { runs: 10, seed: 0, ticks: None, time_series: None, filter: None };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--runs" => {
                i += 1;
                if i < args.len() {
                    cli.runs = args[i].parse().unwrap_or(10);
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    cli.seed = args[i].parse().unwrap_or(0);
                }
            }
            "--ticks" => {
                i += 1;
                if i < args.len() {
                    cli.ticks = args[i].parse().ok();
                }
            }
            "--time-series" => {
                i += 1;
                cli.time_series = Some(
                    args.get(i).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("soak-results/time-series")),
                );
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

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = parse_args();
    let all_scenarios = scenarios();

    let to_run: Vec<&Scenario> = match &cli.filter {
        Some(f) => {
            let f_lower = f.to_lowercase();
            all_scenarios
                .iter()
                .filter(|s| {
                    s.name.to_lowercase().contains(&f_lower)
                        || s.label.to_lowercase().contains(&f_lower)
                        || s.category.to_lowercase().contains(&f_lower)
                })
                .collect()
        }
        None => all_scenarios.iter().collect(),
    };

    if to_run.is_empty() {
        eprintln!("No scenarios match filter: {:?}", cli.filter);
        std::process::exit(1);
    }

    info!("PRNG: ChaCha8Rng | runs/scenario: {} | base seed: {}", cli.runs, cli.seed);
    println!("\n  Thermal Engine Soak Runner v{}", env!("CARGO_PKG_VERSION"));
    println!("  Running {} scenario(s)...\n", to_run.len());
    println!(
        "  {:<30} {:>5} {:>12} {:>10} {:>9} {:>8} {:>7}",
        "Scenario", "Pass%", "Final°C", "Peak°C", "Health", "Power W", "Time"
    );
    println!("  {}", "-".repeat(88));

    let suite_start = Instant::now();
    let mut reports = Vec::new();

    for scenario in &to_run {
        let ticks = cli.ticks.unwrap_or(scenario.ticks);
        let report =
            monte_carlo::run_monte_carlo(scenario, cli.runs, cli.seed, ticks, cli.time_series.as_deref());

        let status = if report.pass_rate >= 1.0 { "PASS" } else { "FAIL" };
        println!(
            "  {:<30} {:>4}% {:>12.2} {:>10.1} {:>9.4} {:>8.1} {:>5.0}ms  {}",
            report.label,
            (report.pass_rate * 100.0) as u32,
            report.final_temp.mean,
            report.peak_temp.max,
            report.final_health.mean,
            report.mean_power.mean,
            report.elapsed_ms.mean,
            status,
        );
        for run in report.individual_runs.iter().filter(|r| !r.pass) {
            for failure in &run.failures {
                println!("      seed {}: {}", run.seed, failure);
            }
        }

        reports.push(report);
    }

    let total = reports.len();
    let passed = reports.iter().filter(|r| r.pass_rate >= 1.0).count();
    let failed = total - passed;

    println!("  {}", "-".repeat(88));
    println!(
        "  Total: {}  Passed: {}  Failed: {}  Suite time: {:.1}s\n",
        total,
        passed,
        failed,
        suite_start.elapsed().as_secs_f64()
    );

    // ─── Write JSON Report ──────────────────────────────────────────────

    let timestamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis().to_string();
    let report = SoakReport {
        timestamp: timestamp.clone(),
        version: env!("CARGO_PKG_VERSION"),
        prng: "ChaCha8Rng",
        n_runs_per_scenario: cli.runs,
        summary: Summary {
            total,
            passed,
            failed,
            pass_rate: passed as f64 / total as f64,
        },
        scenarios: reports,
    };

    let dir = std::path::Path::new("soak-results");
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("soak-{}.json", timestamp));
    std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
    println!("  Results saved to: {}\n", path.display());

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
