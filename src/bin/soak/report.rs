// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Silicon Thermal Simulation Suite ("The Die") - Soak Report Types

use serde::Serialize;

// ─── Statistics (per-metric aggregation over seeds) ─────────────────────────

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
    /// Non-finite samples are excluded; `n` counts only what was kept.
    pub fn from_samples(samples: &[f64]) -> Self {
        let kept: Vec<f64> = samples.iter().copied().filter(|x| x.is_finite()).collect();
        let n = kept.len();
        if n == 0 {
            return Self { mean: 0.0, std_dev: 0.0, ci_lower: 0.0, ci_upper: 0.0, min: 0.0, max: 0.0, n: 0 };
        }
        let mean = kept.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            kept.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
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
            min: kept.iter().copied().fold(f64::INFINITY, f64::min),
            max: kept.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            n,
        }
    }
}

// ─── Single-Run Result ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub scenario: String,
    pub seed: u64,
    pub pass: bool,
    pub failures: Vec<String>,
    pub ticks: u64,
    pub simulated_seconds: f64,
    pub final_temp: f64,
    pub peak_temp: f64,
    pub min_temp: f64,
    pub final_clock: f64,
    pub final_health: f64,
    pub final_mtbf: f64,
    pub final_status: String,
    pub mean_power: f64,
    pub peak_power: f64,
    pub mean_fps: f64,
    pub throttled_ticks: u64,
    pub max_condensation_risk: f64,
    pub history_len: usize,
    pub elapsed_ms: u128,
}

// ─── Per-Scenario Aggregation ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub scenario_name: String,
    pub label: String,
    pub category: String,
    pub n_runs: usize,
    pub pass_rate: f64,
    pub final_temp: Stats,
    pub peak_temp: Stats,
    pub final_health: Stats,
    pub mean_power: Stats,
    pub mean_fps: Stats,
    pub throttled_ticks: Stats,
    pub elapsed_ms: Stats,
    pub individual_runs: Vec<RunResult>,
}

// ─── Top-Level Report ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SoakReport {
    pub timestamp: String,
    pub version: &'static str,
    pub prng: &'static str,
    pub n_runs_per_scenario: usize,
    pub summary: Summary,
    pub scenarios: Vec<ScenarioReport>,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_over_known_samples() {
        let stats = Stats::from_samples(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(stats.n, 4);
        assert!((stats.mean - 2.5).abs() < 1e-12);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
        assert!(stats.ci_lower < stats.mean && stats.mean < stats.ci_upper);
    }

    #[test]
    fn stats_skip_non_finite() {
        let stats = Stats::from_samples(&[f64::NAN, 5.0, f64::INFINITY]);
        assert_eq!(stats.n, 1);
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.std_dev, 0.0);
    }
}
