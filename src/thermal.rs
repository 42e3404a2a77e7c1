// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Silicon Thermal Simulation Suite ("The Die") - Thermal Model
//
// Seven mutually exclusive cooling modes, each an explicit-Euler update of
// die / heatsink / coolant temperatures. Nothing here is clamped.

use crate::config::{ABSOLUTE_ZERO, NOMINAL_VOLTAGE, WATER_SPECIFIC_HEAT};
use crate::types::{CoolingKind, SimulationState};

// ─── Constants ──────────────────────────────────────────────────────────────

/// Die heat capacity divisor shared by every mode.
const DIE_THERMAL_MASS: f64 = 10.0;
const PASTE_CONDUCTANCE_SCALE: f64 = 20.0;

const AIR_COOLING_GAIN: f64 = 2.5;
const AIR_HEATSINK_CORE_WEIGHT: f64 = 0.8;

const AIO_BLOCK_MASS: f64 = 50.0;
const AIO_WATER_CONDUCTANCE: f64 = 150.0;
const AIO_RADIATOR_GAIN: f64 = 18.0;
const AIO_WATER_GRAMS: f64 = 200.0;
const AIO_AMBIENT_LEAK: f64 = 0.05;

const TEC_BASE_POWER_W: f64 = 200.0;
const TEC_PUMP_EFFICIENCY: f64 = 0.6;
const TEC_COOLING_GAIN: f64 = 4.0;
const TEC_AMBIENT_LEAK: f64 = 0.1;

const LN2_BOIL_POINT: f64 = -196.0;
const LN2_PULL_RATE: f64 = 2.0;
const LN2_POT_MASS: f64 = 200.0;

const PHASE_TARGET: f64 = -50.0;
const PHASE_COMPRESSOR_W: f64 = 300.0;
const PHASE_REMOVAL_GAIN: f64 = 10.0;
const PHASE_AMBIENT_LEAK: f64 = 0.05;

const LHE_BOIL_POINT: f64 = -269.0;
const LHE_PULL_RATE: f64 = 3.0;
const LHE_POT_MASS: f64 = 100.0;

// ─── Shared terms ───────────────────────────────────────────────────────────

/// Airflow effectiveness: quadratic in fan speed, degraded by dust.
pub fn fan_efficiency(fan_speed: f64, dust_density: f64) -> f64 {
    let dust_penalty = 1.0 - dust_density / 120.0;
    (0.1 + (fan_speed / 100.0).powi(2) * 5.0) * dust_penalty
}

pub fn paste_conductance(paste_quality: f64) -> f64 {
    paste_quality * PASTE_CONDUCTANCE_SCALE
}

/// Per-step quantities every mode may draw on.
#[derive(Debug, Clone, Copy)]
struct StepTerms {
    heat_in: f64,
    dt: f64,
    fan_efficiency: f64,
    heat_to_block: f64,
    ambient: f64,
}

impl StepTerms {
    fn new(state: &SimulationState, heat_in: f64, dt: f64) -> Self {
        Self {
            heat_in,
            dt,
            fan_efficiency: fan_efficiency(state.inputs.fan_speed, state.inputs.dust_density),
            heat_to_block: (state.current_temp - state.heatsink_temp)
                * paste_conductance(state.inputs.paste_quality),
            ambient: state.inputs.ambient_temp,
        }
    }

    /// Die update when block-to-sink conduction leaves the die.
    fn die_with_block(&self, state: &mut SimulationState) {
        state.current_temp += ((self.heat_in - self.heat_to_block) / DIE_THERMAL_MASS) * self.dt;
    }
}

// ─── Mode dispatch ──────────────────────────────────────────────────────────

/// Thermal stage: integrate the active cooling mode by `dt` simulated seconds.
pub fn update(state: &mut SimulationState, heat_in: f64, dt: f64) {
    let terms = StepTerms::new(state, heat_in, dt);
    match state.cooling_type.kind {
        CoolingKind::Air => integrate_air(state, &terms),
        CoolingKind::Aio => integrate_aio(state, &terms),
        CoolingKind::Tec => integrate_tec(state, &terms),
        CoolingKind::Ln2 => integrate_ln2(state, &terms),
        CoolingKind::Phase => integrate_phase(state, &terms),
        CoolingKind::Lhe => integrate_lhe(state, &terms),
        CoolingKind::Bec => integrate_bec(state, &terms),
    }
}

/// Aggregate heat flow straight from die to air. The dissipation factor is
/// capped at 1.0 (instant equilibrium) so very conductive materials cannot
/// overshoot ambient in one step.
fn integrate_air(state: &mut SimulationState, t: &StepTerms) {
    let cooling_power = t.fan_efficiency * state.material.conductivity * AIR_COOLING_GAIN;
    let dissipation = ((cooling_power / 10.0) * t.dt).min(1.0);

    state.current_temp += (t.heat_in / DIE_THERMAL_MASS) * t.dt;
    state.current_temp -= (state.current_temp - t.ambient) * dissipation;
    state.heatsink_temp =
        state.current_temp * AIR_HEATSINK_CORE_WEIGHT + t.ambient * (1.0 - AIR_HEATSINK_CORE_WEIGHT);
}

/// Die -> cold plate -> coolant -> radiator chain.
fn integrate_aio(state: &mut SimulationState, t: &StepTerms) {
    let heat_to_water = (state.heatsink_temp - state.coolant_temp) * AIO_WATER_CONDUCTANCE;
    let rad_dissipation = (state.coolant_temp - t.ambient) * (t.fan_efficiency * AIO_RADIATOR_GAIN);
    let water_mass = AIO_WATER_GRAMS * WATER_SPECIFIC_HEAT;

    t.die_with_block(state);
    state.heatsink_temp += ((t.heat_to_block - heat_to_water) / AIO_BLOCK_MASS) * t.dt;
    state.coolant_temp += ((heat_to_water - rad_dissipation) / water_mass) * t.dt;
    state.coolant_temp += (t.ambient - state.coolant_temp) * AIO_AMBIENT_LEAK * t.dt;
}

/// Peltier pump: pumped heat leaves the die, pumped heat plus the module's
/// own draw lands on the hot side.
fn integrate_tec(state: &mut SimulationState, t: &StepTerms) {
    let tec_power = TEC_BASE_POWER_W * (state.inputs.voltage / NOMINAL_VOLTAGE);
    let heat_pumped = tec_power * TEC_PUMP_EFFICIENCY;
    let hot_side = heat_pumped + tec_power;
    let cooling_power = t.fan_efficiency * state.material.conductivity * TEC_COOLING_GAIN;
    let dissipated = (state.heatsink_temp - t.ambient) * cooling_power;

    state.current_temp += ((t.heat_in - heat_pumped) / DIE_THERMAL_MASS) * t.dt;
    state.heatsink_temp += ((hot_side - dissipated) / state.material.thermal_mass) * t.dt;
    // imperfect insulation
    state.current_temp += (t.ambient - state.current_temp) * TEC_AMBIENT_LEAK * t.dt;
}

/// Open pot with continuous top-up: the pot relaxes toward the boil point.
fn integrate_ln2(state: &mut SimulationState, t: &StepTerms) {
    t.die_with_block(state);
    state.heatsink_temp -= (state.heatsink_temp - LN2_BOIL_POINT) * LN2_PULL_RATE * t.dt;
    state.heatsink_temp += (t.heat_to_block / LN2_POT_MASS) * t.dt;
}

/// Compressor loop with a power-limited removal rate.
fn integrate_phase(state: &mut SimulationState, t: &StepTerms) {
    let removal = PHASE_COMPRESSOR_W.min((state.heatsink_temp - PHASE_TARGET) * PHASE_REMOVAL_GAIN);

    t.die_with_block(state);
    state.heatsink_temp += ((t.heat_to_block - removal) / state.material.thermal_mass) * t.dt;
    state.heatsink_temp -= (state.heatsink_temp - t.ambient) * PHASE_AMBIENT_LEAK * t.dt;
}

fn integrate_lhe(state: &mut SimulationState, t: &StepTerms) {
    t.die_with_block(state);
    state.heatsink_temp -= (state.heatsink_temp - LHE_BOIL_POINT) * LHE_PULL_RATE * t.dt;
    state.heatsink_temp += (t.heat_to_block / LHE_POT_MASS) * t.dt;
}

/// Condensate sink locked at absolute zero; no sink integration.
fn integrate_bec(state: &mut SimulationState, t: &StepTerms) {
    t.die_with_block(state);
    state.heatsink_temp = ABSOLUTE_ZERO;
}

// ===========================================================================
// Tests
// ===========================================================================
