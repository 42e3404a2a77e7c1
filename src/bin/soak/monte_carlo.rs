// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Silicon Thermal Simulation Suite ("The Die") - Seeded Multi-Run Driver
//
// Each scenario runs N times with seeds base..base+N, aggregated to mean ± 95% CI.

use std::path::Path;
use std::time::Instant;

use log::{debug, warn};
use thermal_engine::{Engine, EngineConfig, Input, ThermalStatus};

use crate::report::*;
use crate::scenarios::Scenario;
use crate::time_series::TimeSeriesRecorder;

/// Run one scenario with one seed.
pub fn run_single(scenario: &Scenario, seed: u64, ticks: u64, time_series_dir: Option<&Path>) -> RunResult {
    let start = Instant::now();
    let mut engine = Engine::new(EngineConfig::with_seed(seed));
    let mut failures = Vec::new();
    let ticks = match (scenario.setup)(&mut engine) {
        Ok(()) => ticks,
        Err(e) => {
            warn!("{} setup failed: {e}", scenario.name);
            failures.push(format!("setup failed: {e}"));
            0
        }
    };

    let mut time_series = time_series_dir.map(|_| TimeSeriesRecorder::new());

    let capacity = engine.history().len();
    let mut last_health = engine.state().silicon_health;
    let mut simulated_seconds = 0.0;
    let mut peak_temp = f64::NEG_INFINITY;
    let mut min_temp = f64::INFINITY;
    let mut power_sum = 0.0;
    let mut peak_power = f64::NEG_INFINITY;
    let mut fps_sum = 0.0;
    let mut throttled_ticks = 0;
    let mut max_condensation_risk: f64 = 0.0;
    let mut health_violation = false;
    let mut history_violation = false;

    for tick in 0..ticks {
        if let Some(curve) = scenario.load_curve {
            engine.set_input(Input::TargetLoad(curve(tick)));
        }

        let result = match engine.advance(scenario.real_dt) {
            Ok(result) => result,
            Err(e) => {
                failures.push(format!("tick {tick} rejected: {e}"));
                break;
            }
        };
        let state = &result.state;

        simulated_seconds += result.dt;
        peak_temp = peak_temp.max(state.current_temp);
        min_temp = min_temp.min(state.current_temp);
        power_sum += state.power_draw;
        peak_power = peak_power.max(state.power_draw);
        fps_sum += state.fps;
        max_condensation_risk = max_condensation_risk.max(state.condensation_risk);
        if state.thermal_status == ThermalStatus::Throttling {
            throttled_ticks += 1;
        }

        if state.silicon_health > last_health && !health_violation {
            health_violation = true;
            failures.push(format!("tick {tick}: silicon health increased"));
        }
        last_health = state.silicon_health;
        if state.history.len() > capacity && !history_violation {
            history_violation = true;
            failures.push(format!("tick {tick}: history exceeded {capacity} samples"));
        }

        if let Some(ts) = time_series.as_mut() {
            ts.record(tick, &result);
        }
    }

    if let (Some(ts), Some(dir)) = (&time_series, time_series_dir) {
        let path = dir.join(format!("seed-{seed}.jsonl"));
        if let Err(e) = ts.write_jsonl(&path) {
            warn!("failed to write time series {}: {e}", path.display());
        }
    }

    let state = engine.state();
    let criteria = &scenario.criteria;
    let ambient = state.inputs.ambient_temp;

    if criteria.require_finite
        && !(state.current_temp.is_finite() && state.heatsink_temp.is_finite() && state.coolant_temp.is_finite())
    {
        failures.push("non-finite temperature".to_string());
    }
    if let Some(delta) = criteria.max_final_ambient_delta {
        if !((state.current_temp - ambient).abs() <= delta) {
            failures.push(format!("final temp {:.2} not within {delta} of ambient", state.current_temp));
        }
    }
    if let Some(expected) = criteria.final_status {
        if state.thermal_status != expected {
            failures.push(format!("final status {} (expected {expected})", state.thermal_status));
        }
    }
    if let Some(min_health) = criteria.min_final_health {
        if state.silicon_health < min_health {
            failures.push(format!("final health {:.4} below {min_health}", state.silicon_health));
        }
    }

    let executed = engine.tick_count().max(1) as f64;
    let result = RunResult {
        scenario: scenario.name.to_string(),
        seed,
        pass: failures.is_empty(),
        failures,
        ticks: engine.tick_count(),
        simulated_seconds,
        final_temp: state.current_temp,
        peak_temp,
        min_temp,
        final_clock: state.current_clock,
        final_health: state.silicon_health,
        final_mtbf: state.mtbf,
        final_status: state.thermal_status.label().to_string(),
        mean_power: power_sum / executed,
        peak_power,
        mean_fps: fps_sum / executed,
        throttled_ticks,
        max_condensation_risk,
        history_len: state.history.len(),
        elapsed_ms: start.elapsed().as_millis(),
    };
    debug!("{} seed {} -> pass={} final={:.2}°C", scenario.name, seed, result.pass, result.final_temp);
    result
}

/// N seeded runs of one scenario, aggregated.
pub fn run_monte_carlo(
    scenario: &Scenario,
    n_runs: usize,
    base_seed: u64,
    ticks: u64,
    time_series_base: Option<&Path>,
) -> ScenarioReport {
    let ts_dir = time_series_base.map(|base| base.join(scenario.name.to_lowercase()));

    let results: Vec<RunResult> = (0..n_runs)
        .map(|i| run_single(scenario, base_seed + i as u64, ticks, ts_dir.as_deref()))
        .collect();

    aggregate(scenario, results)
}

fn aggregate(scenario: &Scenario, results: Vec<RunResult>) -> ScenarioReport {
    let n = results.len();
    let passed = results.iter().filter(|r| r.pass).count();
    let stat = |f: fn(&RunResult) -> f64| Stats::from_samples(&results.iter().map(f).collect::<Vec<_>>());

    ScenarioReport {
        scenario_name: scenario.name.to_string(),
        label: scenario.label.to_string(),
        category: scenario.category.to_string(),
        n_runs: n,
        pass_rate: if n > 0 { passed as f64 / n as f64 } else { 0.0 },
        final_temp: stat(|r| r.final_temp),
        peak_temp: stat(|r| r.peak_temp),
        final_health: stat(|r| r.final_health),
        mean_power: stat(|r| r.mean_power),
        mean_fps: stat(|r| r.mean_fps),
        throttled_ticks: stat(|r| r.throttled_ticks as f64),
        elapsed_ms: stat(|r| r.elapsed_ms as f64),
        individual_runs: results,
    }
}
