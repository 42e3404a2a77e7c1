// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Silicon Thermal Simulation Suite ("The Die") - Simulation Core

use std::collections::VecDeque;

use log::{debug, info, trace, warn};
use rand::RngCore;
use rand_chacha::ChaCha8Rng;
use wasm_bindgen::prelude::*;

use crate::classifier;
use crate::config::{EngineConfig, MAX_REAL_DT};
use crate::entropy::seeded_rng;
use crate::environment;
use crate::error::SimError;
use crate::governor;
use crate::history::HistoryRecorder;
use crate::inputs::Input;
use crate::power;
use crate::reliability;
use crate::thermal;
use crate::types::*;

// ─── Timestep ────────────────────────────────────────────────────────────────

/// Simulated seconds to integrate for `real_dt` seconds of wall time.
///
/// The real interval is clamped to `[0, MAX_REAL_DT]` (a clock stepping
/// backwards integrates nothing) and then dilated. NaN/∞ input and a
/// dilation that turns the step negative or non-finite are rejected.
pub fn integration_dt(real_dt: f64, time_dilation: f64) -> Result<f64, SimError> {
    if !real_dt.is_finite() {
        return Err(SimError::NonFiniteTimestep(real_dt));
    }
    let dt = real_dt.clamp(0.0, MAX_REAL_DT) * time_dilation;
    if !dt.is_finite() || dt < 0.0 {
        return Err(SimError::InvalidTimeDilation(time_dilation));
    }
    Ok(dt)
}

// ─── Engine ──────────────────────────────────────────────────────────────────

/// One simulation session: the state record, the injected RNG and the
/// sampling clock. Ticks are serialized by `&mut self`.
#[derive(Debug, Clone)]
pub struct Engine<R: RngCore = ChaCha8Rng> {
    state: SimulationState,
    rng: R,
    recorder: HistoryRecorder,
    wall_clock_ms: Option<f64>,
    last_power: PowerBreakdown,
    tick_count: u64,
}

impl Engine<ChaCha8Rng> {
    pub fn new(config: EngineConfig) -> Self {
        let rng = seeded_rng(config.seed);
        Self::with_rng(config, rng)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(EngineConfig::with_seed(seed))
    }
}

impl Default for Engine<ChaCha8Rng> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<R: RngCore> Engine<R> {
    pub fn with_rng(config: EngineConfig, rng: R) -> Self {
        let recorder = HistoryRecorder::new(config.history_capacity);
        let state = SimulationState::new(
            config.inputs,
            config.material.preset(),
            config.cooling.preset(),
            recorder.capacity(),
        );
        debug!(
            "engine created: cooling={} material={} history={}",
            config.cooling,
            state.material.name,
            recorder.capacity()
        );
        Self {
            state,
            rng,
            recorder,
            wall_clock_ms: None,
            last_power: PowerBreakdown::default(),
            tick_count: 0,
        }
    }

    /// Tick driven by the host's frame clock (milliseconds). The first call
    /// only anchors the clock and integrates zero time.
    pub fn tick(&mut self, now_ms: f64) -> Result<TickResult, SimError> {
        if !now_ms.is_finite() {
            warn!("tick rejected: wall clock {now_ms}");
            return Err(SimError::NonFiniteTimestep(now_ms));
        }
        let real_dt = match self.wall_clock_ms {
            Some(last) => (now_ms - last) / 1000.0,
            None => 0.0,
        };
        let dt = self.checked_dt(real_dt)?;
        self.wall_clock_ms = Some(now_ms);
        Ok(self.step(dt, now_ms))
    }

    /// Tick with an explicit real elapsed time in seconds. The internal wall
    /// clock moves forward by the same amount.
    pub fn advance(&mut self, real_dt: f64) -> Result<TickResult, SimError> {
        let dt = self.checked_dt(real_dt)?;
        let now_ms = self.wall_clock_ms.unwrap_or(0.0) + real_dt.max(0.0) * 1000.0;
        self.wall_clock_ms = Some(now_ms);
        Ok(self.step(dt, now_ms))
    }

    fn checked_dt(&self, real_dt: f64) -> Result<f64, SimError> {
        integration_dt(real_dt, self.state.inputs.time_dilation).map_err(|e| {
            warn!("tick rejected: {e}");
            e
        })
    }

    /// Run every stage once, in order, against the shared state.
    fn step(&mut self, dt: f64, wall_clock_ms: f64) -> TickResult {
        let state = &mut self.state;

        environment::update(state, &mut self.rng, dt);
        governor::update(state, &mut self.rng, dt, wall_clock_ms);
        let power = power::update(state, &mut self.rng);
        thermal::update(state, power.heat_in, dt);
        reliability::update(state, dt);
        classifier::update(state, &mut self.rng);

        let sample = HistorySample {
            temp: state.current_temp,
            clock: state.current_clock,
            health: state.silicon_health,
        };
        self.recorder.record(&mut state.history, sample, dt);

        self.last_power = power;
        self.tick_count += 1;
        trace!(
            "tick {} dt={:.4} temp={:.2} clock={:.2} draw={:.1} status={}",
            self.tick_count,
            dt,
            state.current_temp,
            state.current_clock,
            state.power_draw,
            state.thermal_status
        );

        TickResult { state: self.state.clone(), power, dt }
    }

    // ─── Operator writes ─────────────────────────────────────────────────────

    pub fn set_input(&mut self, input: Input) {
        match &input {
            Input::Cooling(kind) => {
                info!("cooling switched {} -> {}", self.state.cooling_type.kind, kind)
            }
            Input::Material(material) => debug!("material set to {}", material.name),
            other => debug!("input {} updated", other.field()),
        }
        input.apply(&mut self.state);
    }

    /// String-keyed numeric write, as issued by slider and toggle handlers.
    pub fn set_field(&mut self, field: &str, value: f64) -> Result<(), SimError> {
        let input = Input::from_field(field, value)?;
        self.set_input(input);
        Ok(())
    }

    pub fn set_cooling_type(&mut self, kind: CoolingKind) {
        self.set_input(Input::Cooling(kind));
    }

    pub fn set_material(&mut self, material: Material) {
        self.set_input(Input::Material(material));
    }

    /// Return all three temperatures to ambient and clear the halt latch.
    /// Everything else (health, clocks, history) carries over.
    pub fn reset(&mut self) {
        let ambient = self.state.inputs.ambient_temp;
        self.state.current_temp = ambient;
        self.state.heatsink_temp = ambient;
        self.state.coolant_temp = ambient;
        self.state.is_halted = false;
        self.state.halt_reason = None;
        info!("reset to ambient {ambient:.1} °C");
    }

    // ─── Read access ─────────────────────────────────────────────────────────

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Direct state access for hosts and tests that stage a scenario.
    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    pub fn history(&self) -> &VecDeque<HistorySample> {
        &self.state.history
    }

    pub fn last_power(&self) -> PowerBreakdown {
        self.last_power
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn wall_clock_ms(&self) -> Option<f64> {
        self.wall_clock_ms
    }
}

// ─── JS handle ───────────────────────────────────────────────────────────────

/// Browser-facing handle around the production engine. Method bindings live
/// in `lib.rs`.
#[wasm_bindgen]
pub struct ThermalSimulation {
    pub(crate) engine: Engine<ChaCha8Rng>,
}

impl ThermalSimulation {
    pub fn from_engine(engine: Engine<ChaCha8Rng>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Engine<ChaCha8Rng> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine<ChaCha8Rng> {
        &mut self.engine
    }
}

// ===========================================================================
// Tests
// ===========================================================================
