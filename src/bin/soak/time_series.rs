// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Silicon Thermal Simulation Suite ("The Die") - Per-Tick JSONL Time Series

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use thermal_engine::TickResult;

#[derive(Debug, Serialize)]
pub struct TickSnapshot {
    pub tick: u64,
    pub dt: f64,
    pub current_temp: f64,
    pub heatsink_temp: f64,
    pub coolant_temp: f64,
    pub current_clock: f64,
    pub target_clock: f64,
    pub current_load: f64,
    pub power_draw: f64,
    pub heat_in: f64,
    pub silicon_health: f64,
    pub condensation_risk: f64,
    pub fps: f64,
    pub thermal_status: &'static str,
}

impl TickSnapshot {
    pub fn from_result(tick: u64, result: &TickResult) -> Self {
        let state = &result.state;
        Self {
            tick,
            dt: result.dt,
            current_temp: state.current_temp,
            heatsink_temp: state.heatsink_temp,
            coolant_temp: state.coolant_temp,
            current_clock: state.current_clock,
            target_clock: state.target_clock,
            current_load: state.current_load,
            power_draw: state.power_draw,
            heat_in: result.power.heat_in,
            silicon_health: state.silicon_health,
            condensation_risk: state.condensation_risk,
            fps: state.fps,
            thermal_status: state.thermal_status.label(),
        }
    }
}

/// Accumulates snapshots for one run and writes them as JSONL.
#[derive(Default)]
pub struct TimeSeriesRecorder {
    snapshots: Vec<TickSnapshot>,
}

impl TimeSeriesRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, tick: u64, result: &TickResult) {
        self.snapshots.push(TickSnapshot::from_result(tick, result));
    }

    pub fn write_jsonl(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
        for snapshot in &self.snapshots {
            serde_json::to_writer(&mut file, snapshot)?;
            writeln!(file)?;
        }
        file.flush()
    }
}
