// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Silicon Thermal Simulation Suite ("The Die") - Environmental Model

use rand::RngCore;

use crate::entropy;
use crate::types::{CoolingKind, SimulationState};

// Magnus-form coefficients.
const MAGNUS_A: f64 = 17.27;
const MAGNUS_B: f64 = 237.7;

/// Risk units gained per simulated second while below the dew point.
const CONDENSATION_RISE: f64 = 10.0;
/// Risk units shed per simulated second while above the dew point.
const CONDENSATION_DECAY: f64 = 5.0;
const CONDENSATION_MAX: f64 = 100.0;

const ENTROPY_GAIN: f64 = 0.5;

/// Dew point in Celsius from air temperature and relative humidity (percent).
///
/// Zero humidity yields NaN (`-inf / inf` in the Magnus form). No surface
/// compares below NaN, so condensation risk only decays.
pub fn dew_point(ambient_temp: f64, humidity: f64) -> f64 {
    let alpha =
        (MAGNUS_A * ambient_temp) / (MAGNUS_B + ambient_temp) + (humidity / 100.0).ln();
    (MAGNUS_B * alpha) / (MAGNUS_A - alpha)
}

/// Surface checked against the dew point: the cold plate for AIO loops,
/// the die itself everywhere else.
pub fn condensation_surface(state: &SimulationState) -> f64 {
    match state.cooling_type.kind {
        CoolingKind::Aio => state.heatsink_temp,
        _ => state.current_temp,
    }
}

/// Advance condensation risk by one step, clamped to `[0, 100]`.
pub fn step_condensation(risk: f64, surface_temp: f64, dew_point: f64, dt: f64) -> f64 {
    if surface_temp < dew_point {
        (risk + CONDENSATION_RISE * dt).min(CONDENSATION_MAX)
    } else {
        (risk - CONDENSATION_DECAY * dt).max(0.0)
    }
}

/// Environmental stage: dew point, condensation risk, lattice entropy.
pub fn update<R: RngCore>(state: &mut SimulationState, rng: &mut R, dt: f64) {
    state.dew_point = dew_point(state.inputs.ambient_temp, state.inputs.humidity);
    let surface = condensation_surface(state);
    state.condensation_risk =
        step_condensation(state.condensation_risk, surface, state.dew_point, dt);

    // Random lattice heating, always drawn so the RNG stream does not depend
    // on the entropy slider.
    let spike = entropy::unit(rng) * state.inputs.entropy * ENTROPY_GAIN * dt;
    state.current_temp += spike;
}
