// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Silicon Thermal Simulation Suite ("The Die") - Power Model

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::config::{BASE_CLOCK, NOMINAL_VOLTAGE, SUPERCONDUCTING_TEMP};
use crate::entropy;
use crate::governor::Composition;
use crate::types::{PowerBreakdown, SimulationState};

// ─── Constants ──────────────────────────────────────────────────────────────

const STATIC_BASE_W: f64 = 15.0;
const STATIC_TEMP_COEFF: f64 = 0.015;
/// Leakage stops growing past this die temperature.
const STATIC_TEMP_CAP: f64 = 150.0;
const DYNAMIC_BASE_W: f64 = 120.0;
const REFERENCE_CORES: f64 = 8.0;

const SMT_FACTOR: f64 = 1.2;
const RECURSIVE_SMT_FACTOR: f64 = 8.0;
const DARK_SILICON_EFFICIENCY: f64 = 0.6;
const NEURAL_PREDICTION_EFFICIENCY: f64 = 0.85;

const TUNNELING_VOLTAGE_COEFF: f64 = 2.5;
const TUNNELING_GAIN: f64 = 2.0;

/// Heat input while the singularity sink is open.
const SINGULARITY_HEAT: f64 = -1.0e6;
const FUSION_OUTPUT_W: f64 = 5000.0;
const FUSION_INVERSION: f64 = 3.0;
const REALITY_HEAT_CHAOS: f64 = 5.0;
const REALITY_DRAW_CHAOS: f64 = 2.0;

// ─── Heat-input cascade ─────────────────────────────────────────────────────

/// Experimental overrides of the heat that reaches the thermal integrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeatModifier {
    Superconductor,
    Singularity,
    Fusion,
    RealityFail,
}

/// Evaluation order of the heat cascade.
pub const HEAT_CASCADE: [HeatModifier; 4] = [
    HeatModifier::Superconductor,
    HeatModifier::Singularity,
    HeatModifier::Fusion,
    HeatModifier::RealityFail,
];

impl HeatModifier {
    pub fn is_active(&self, state: &SimulationState) -> bool {
        match self {
            Self::Superconductor => is_superconducting(state),
            Self::Singularity => state.flags.singularity,
            Self::Fusion => state.flags.fusion,
            Self::RealityFail => !state.flags.reality_anchor,
        }
    }

    pub fn composition(&self) -> Composition {
        match self {
            Self::RealityFail => Composition::Scale,
            _ => Composition::Replace,
        }
    }

    fn evaluate<R: RngCore>(&self, power: &PowerBreakdown, load_factor: f64, rng: &mut R) -> f64 {
        match self {
            Self::Superconductor => 0.0,
            Self::Singularity => SINGULARITY_HEAT,
            Self::Fusion => {
                (power.static_power + power.dynamic_power) * (1.0 - load_factor * FUSION_INVERSION)
            }
            Self::RealityFail => entropy::uniform(rng, -REALITY_HEAT_CHAOS, REALITY_HEAT_CHAOS),
        }
    }
}

/// Zero-resistance regime: flag set and die below the critical temperature.
pub fn is_superconducting(state: &SimulationState) -> bool {
    state.flags.superconductor && state.current_temp < SUPERCONDUCTING_TEMP
}

// ─── Power terms ────────────────────────────────────────────────────────────

pub fn static_power(state: &SimulationState) -> f64 {
    if state.flags.vacuum_energy {
        return 0.0;
    }
    let leakage =
        ((state.current_temp.min(STATIC_TEMP_CAP) - 25.0) * STATIC_TEMP_COEFF).exp();
    let dark_silicon = if state.flags.dark_silicon { DARK_SILICON_EFFICIENCY } else { 1.0 };
    STATIC_BASE_W
        * leakage
        * (state.inputs.voltage / NOMINAL_VOLTAGE)
        * core_factor(state)
        * dark_silicon
}

pub fn dynamic_power(state: &SimulationState) -> f64 {
    let clock_ratio = state.current_clock / BASE_CLOCK;
    let load_factor = state.current_load / 100.0;
    let smt = if state.flags.recursive_smt {
        RECURSIVE_SMT_FACTOR
    } else if state.inputs.smt_enabled {
        SMT_FACTOR
    } else {
        1.0
    };
    let efficiency = if state.flags.neural_prediction { NEURAL_PREDICTION_EFFICIENCY } else { 1.0 };
    DYNAMIC_BASE_W
        * load_factor
        * clock_ratio.powi(3)
        * state.inputs.voltage.powi(2)
        * core_factor(state)
        * smt
        * efficiency
}

pub fn tunneling_leakage(state: &SimulationState) -> f64 {
    if state.flags.quantum {
        (state.inputs.voltage * TUNNELING_VOLTAGE_COEFF).exp() * TUNNELING_GAIN
    } else {
        0.0
    }
}

fn core_factor(state: &SimulationState) -> f64 {
    state.inputs.core_count as f64 / REFERENCE_CORES
}

/// Full power accounting for the current state.
///
/// Draws from `rng` only when the reality anchor is off: heat chaos first,
/// then draw chaos.
pub fn compute<R: RngCore>(state: &SimulationState, rng: &mut R) -> PowerBreakdown {
    let load_factor = state.current_load / 100.0;
    let mut power = PowerBreakdown {
        static_power: static_power(state),
        dynamic_power: dynamic_power(state),
        tunneling_leakage: tunneling_leakage(state),
        parasitic_power: state.cooling_type.parasitic_power,
        ..PowerBreakdown::default()
    };

    let mut draw = power.static_power
        + power.dynamic_power
        + power.parasitic_power
        + power.tunneling_leakage;
    if state.flags.fusion {
        draw += FUSION_OUTPUT_W * load_factor;
    }

    let mut heat = power.static_power + power.dynamic_power + power.tunneling_leakage;
    for modifier in HEAT_CASCADE {
        if !modifier.is_active(state) {
            continue;
        }
        let value = modifier.evaluate(&power, load_factor, rng);
        heat = match modifier.composition() {
            Composition::Scale => heat * value,
            Composition::Replace => value,
        };
    }

    if !state.flags.reality_anchor {
        draw *= entropy::uniform(rng, 0.0, REALITY_DRAW_CHAOS);
    }

    power.power_draw = draw;
    power.heat_in = heat;
    power
}

/// Power stage: publishes the draw into state and returns the breakdown.
pub fn update<R: RngCore>(state: &mut SimulationState, rng: &mut R) -> PowerBreakdown {
    let power = compute(state, rng);
    state.power_draw = power.power_draw;
    power
}

// ===========================================================================
// Tests
// ===========================================================================
