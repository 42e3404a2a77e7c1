// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Silicon Thermal Simulation Suite ("The Die") - Status Classifier & Throttle Policy

use log::warn;
use rand::RngCore;

use crate::config::{BASE_CLOCK, CRITICAL_TEMP, FPS_PER_GHZ, THROTTLE_SPAN, THROTTLE_THRESHOLD};
use crate::entropy;
use crate::types::{FeatureFlags, SimulationState, ThermalStatus};

/// Clock fraction removed at full throttle severity.
const THROTTLE_DEPTH: f64 = 0.9;
/// Headroom above base clock before the part reports OVERCLOCKED.
const OVERCLOCK_MARGIN: f64 = 1.0;

const FPS_PENALTY_SCALE: f64 = 59.8;
const STALL_SPIKE: f64 = 59.9;
const STALL_CHANCE_SCALE: f64 = 0.2;
const FPS_JITTER: f64 = 5.0;

// ─── Throttle ───────────────────────────────────────────────────────────────

/// 0 at the threshold, saturating at 1 thirty degrees above it.
pub fn throttle_severity(temp: f64) -> f64 {
    ((temp - THROTTLE_THRESHOLD) / THROTTLE_SPAN).min(1.0)
}

pub fn throttle_limit(severity: f64) -> f64 {
    BASE_CLOCK * (1.0 - THROTTLE_DEPTH * severity)
}

/// Outcome of the throttle check for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Throttle {
    /// Die at or below the threshold.
    Cool,
    /// Safety engaged: clock capped at `limit`. The live clock is capped too,
    /// not left to smooth down toward the capped target.
    Engaged { severity: f64, limit: f64 },
    /// Safety disabled: status only.
    Bypassed { severity: f64 },
}

pub fn evaluate_throttle(temp: f64, flags: &FeatureFlags) -> Throttle {
    if temp.is_nan() || temp <= THROTTLE_THRESHOLD {
        return Throttle::Cool;
    }
    let severity = throttle_severity(temp);
    if flags.disable_safety {
        Throttle::Bypassed { severity }
    } else {
        Throttle::Engaged { severity, limit: throttle_limit(severity) }
    }
}

// ─── Classification ─────────────────────────────────────────────────────────

/// Temperature/clock label used when no experimental override owns the status.
pub fn default_status(temp: f64, target_clock: f64) -> ThermalStatus {
    if temp > CRITICAL_TEMP {
        ThermalStatus::Critical
    } else if target_clock > BASE_CLOCK + OVERCLOCK_MARGIN {
        ThermalStatus::Overclocked
    } else {
        ThermalStatus::Optimal
    }
}

/// Classifier stage: status label, throttle clamp, simulated fps.
pub fn update<R: RngCore>(state: &mut SimulationState, rng: &mut R) {
    let previous = state.thermal_status;

    if state.flags.default_classification() {
        state.thermal_status = default_status(state.current_temp, state.target_clock);
    }

    let mut penalty = 0.0;
    match evaluate_throttle(state.current_temp, &state.flags) {
        Throttle::Cool => {
            if state.thermal_status == ThermalStatus::Throttling {
                state.thermal_status = ThermalStatus::Optimal;
            }
        }
        Throttle::Engaged { severity, limit } => {
            state.target_clock = state.target_clock.min(limit);
            state.current_clock = state.current_clock.min(limit);
            state.thermal_status = ThermalStatus::Throttling;
            penalty = severity * FPS_PENALTY_SCALE;
            if entropy::chance(rng, severity * STALL_CHANCE_SCALE) {
                penalty += STALL_SPIKE;
            }
        }
        Throttle::Bypassed { .. } => {
            state.thermal_status = ThermalStatus::CriticalHeat;
        }
    }

    if previous != state.thermal_status
        && matches!(state.thermal_status, ThermalStatus::Throttling | ThermalStatus::CriticalHeat)
    {
        warn!(
            "thermal status {} -> {} at {:.1} °C",
            previous, state.thermal_status, state.current_temp
        );
    }

    let raw_fps = state.current_clock * FPS_PER_GHZ;
    state.fps = (raw_fps - penalty + entropy::uniform(rng, 0.0, FPS_JITTER)).max(0.0);
}
