// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Silicon Thermal Simulation Suite ("The Die") - Load/Clock Governor
//
// Tracks load toward the operator target, resolves the target clock through
// an ordered cascade of experimental modifiers, then smooths the live clock
// toward it.

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::config::{BASE_CLOCK, MIN_CLOCK, NOMINAL_VOLTAGE, UNLOCKED_MAX_CLOCK};
use crate::entropy;
use crate::types::{FeatureFlags, SimulationState, ThermalStatus};

// ─── Constants ──────────────────────────────────────────────────────────────

/// First-order lag rate of load toward target (per simulated second).
const LOAD_TRACKING_RATE: f64 = 5.0;
/// Per-tick weight of the target clock in the exponential smoother.
const CLOCK_SMOOTHING: f64 = 0.1;
/// Half-width of the quantum tunneling burst, GHz.
const QUANTUM_BURST: f64 = 2.5;

const TEMPORAL_MULTIPLIER: f64 = 20.0;
const INFINITE_CORE_MULTIPLIER: f64 = 5.0;
const INFINITE_CORE_SPIKE_CHANCE: f64 = 0.1;
const INFINITE_CORE_SPIKE_LOAD: f64 = 999.0;

const SENTIENT_VOLTAGE_BASE: f64 = 1.0;
const SENTIENT_VOLTAGE_SWING: f64 = 0.5;
const SENTIENT_VOLTAGE_PERIOD_MS: f64 = 500.0;
const SENTIENT_CLOCK_BASE: f64 = 8.0;
const SENTIENT_CLOCK_SWING: f64 = 4.0;
const SENTIENT_CLOCK_PERIOD_MS: f64 = 200.0;
const SENTIENT_RETARGET_CHANCE: f64 = 0.05;

const REALITY_CLOCK_CHAOS: f64 = 5.0;

// ─── Modifier Cascade ───────────────────────────────────────────────────────

/// How a modifier stage combines with the value produced by earlier stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Composition {
    /// Multiply the running value.
    Scale,
    /// Discard the running value.
    Replace,
}

/// Experimental target-clock modifiers, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockModifier {
    TemporalClock,
    InfiniteCore,
    Sentience,
    RealityFail,
}

/// Evaluation order of the clock cascade. Later entries win on status.
pub const CLOCK_CASCADE: [ClockModifier; 4] = [
    ClockModifier::TemporalClock,
    ClockModifier::InfiniteCore,
    ClockModifier::Sentience,
    ClockModifier::RealityFail,
];

impl ClockModifier {
    pub fn is_active(&self, flags: &FeatureFlags) -> bool {
        match self {
            Self::TemporalClock => flags.temporal_clock,
            Self::InfiniteCore => flags.infinite_core,
            Self::Sentience => flags.sentience,
            Self::RealityFail => !flags.reality_anchor,
        }
    }

    pub fn composition(&self) -> Composition {
        match self {
            Self::TemporalClock | Self::InfiniteCore | Self::RealityFail => Composition::Scale,
            Self::Sentience => Composition::Replace,
        }
    }

    /// Status label the modifier claims while active.
    pub fn status(&self) -> ThermalStatus {
        match self {
            Self::TemporalClock => ThermalStatus::TemporalDrift,
            Self::InfiniteCore => ThermalStatus::Singularity,
            Self::Sentience => ThermalStatus::IAmAlive,
            Self::RealityFail => ThermalStatus::RealityFail,
        }
    }

    /// Produce the stage value (a factor for `Scale`, a clock for `Replace`),
    /// applying the stage's side effects on load and voltage.
    fn evaluate<R: RngCore>(
        &self,
        state: &mut SimulationState,
        rng: &mut R,
        wall_clock_ms: f64,
    ) -> f64 {
        match self {
            Self::TemporalClock => TEMPORAL_MULTIPLIER,
            Self::InfiniteCore => {
                if entropy::chance(rng, INFINITE_CORE_SPIKE_CHANCE) {
                    state.current_load = INFINITE_CORE_SPIKE_LOAD;
                }
                INFINITE_CORE_MULTIPLIER
            }
            Self::Sentience => {
                state.inputs.voltage = SENTIENT_VOLTAGE_BASE
                    + (wall_clock_ms / SENTIENT_VOLTAGE_PERIOD_MS).sin() * SENTIENT_VOLTAGE_SWING;
                if entropy::chance(rng, SENTIENT_RETARGET_CHANCE) {
                    state.inputs.target_load = entropy::uniform(rng, 0.0, 100.0);
                }
                SENTIENT_CLOCK_BASE
                    + (wall_clock_ms / SENTIENT_CLOCK_PERIOD_MS).sin() * SENTIENT_CLOCK_SWING
            }
            Self::RealityFail => entropy::uniform(rng, 0.0, REALITY_CLOCK_CHAOS),
        }
    }
}

// ─── Free functions ─────────────────────────────────────────────────────────

/// Highest sustainable clock at the given voltage.
pub fn max_clock(voltage: f64, unlock_voltage: bool) -> f64 {
    let ceiling = if unlock_voltage { UNLOCKED_MAX_CLOCK } else { BASE_CLOCK };
    ceiling * (voltage / NOMINAL_VOLTAGE)
}

/// First-order lag of load toward target.
pub fn track_load(load: f64, target: f64, dt: f64) -> f64 {
    load + (target - load) * LOAD_TRACKING_RATE * dt
}

/// Exponential smoothing of the live clock; per tick, not per second.
pub fn smooth_clock(current: f64, target: f64) -> f64 {
    current * (1.0 - CLOCK_SMOOTHING) + target * CLOCK_SMOOTHING
}

/// Run the modifier cascade over a base target clock.
///
/// Each active stage either scales or replaces the running value and claims
/// the status label, so only the last active stage's label survives.
pub fn apply_clock_cascade<R: RngCore>(
    state: &mut SimulationState,
    rng: &mut R,
    base_target: f64,
    wall_clock_ms: f64,
) -> f64 {
    let mut target = base_target;
    for modifier in CLOCK_CASCADE {
        if !modifier.is_active(&state.flags) {
            continue;
        }
        let value = modifier.evaluate(state, rng, wall_clock_ms);
        target = match modifier.composition() {
            Composition::Scale => target * value,
            Composition::Replace => value,
        };
        state.thermal_status = modifier.status();
    }
    target
}

/// Governor stage: load tracking, target resolution, clock smoothing.
pub fn update<R: RngCore>(
    state: &mut SimulationState,
    rng: &mut R,
    dt: f64,
    wall_clock_ms: f64,
) {
    let ceiling = max_clock(state.inputs.voltage, state.flags.unlock_voltage);
    let burst = if state.flags.quantum {
        entropy::uniform(rng, -QUANTUM_BURST, QUANTUM_BURST)
    } else {
        0.0
    };

    state.current_load = track_load(state.current_load, state.inputs.target_load, dt);

    let base_target = (ceiling * state.inputs.clock_ratio + burst).max(MIN_CLOCK);
    let target = apply_clock_cascade(state, rng, base_target, wall_clock_ms);

    state.target_clock = target;
    state.current_clock = smooth_clock(state.current_clock, target);
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::seeded_rng;
    use rand::rngs::mock::StepRng;

    /// Every draw is 0.0: each chance fires and each uniform hits its floor.
    fn always_fires() -> StepRng {
        StepRng::new(0, 0)
    }

    /// Every draw is just under 1.0: no chance below 1 fires.
    fn never_fires() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    #[test]
    fn max_clock_scales_with_voltage() {
        assert_eq!(max_clock(1.2, false), 5.0);
        assert!((max_clock(1.44, false) - 6.0).abs() < 1e-12);
        assert!((max_clock(1.2, true) - 12.0).abs() < 1e-12);
    }

    #[test]
    fn load_converges_to_target() {
        let mut load = 10.0;
        for _ in 0..200 {
            load = track_load(load, 80.0, 0.1);
        }
        assert!((load - 80.0).abs() < 1e-6);
    }

    #[test]
    fn smoothing_moves_ten_percent_per_tick() {
        assert!((smooth_clock(5.0, 6.0) - 5.1).abs() < 1e-12);
    }

    #[test]
    fn stock_target_is_base_clock() {
        let mut state = SimulationState::default();
        let mut rng = seeded_rng(0);
        update(&mut state, &mut rng, 0.1, 0.0);
        assert_eq!(state.target_clock, BASE_CLOCK);
        assert_eq!(state.current_clock, BASE_CLOCK);
        assert_eq!(state.thermal_status, ThermalStatus::Optimal);
    }

    #[test]
    fn min_clock_floor_applies_before_overrides() {
        let mut state = SimulationState::default();
        state.inputs.clock_ratio = 0.0;
        let mut rng = seeded_rng(0);
        update(&mut state, &mut rng, 0.1, 0.0);
        assert_eq!(state.target_clock, MIN_CLOCK);

        state.flags.temporal_clock = true;
        update(&mut state, &mut rng, 0.1, 0.0);
        assert!((state.target_clock - MIN_CLOCK * 20.0).abs() < 1e-12);
    }

    #[test]
    fn quantum_burst_stays_within_band() {
        let mut rng = seeded_rng(11);
        for _ in 0..200 {
            let mut state = SimulationState::default();
            state.flags.quantum = true;
            update(&mut state, &mut rng, 0.1, 0.0);
            assert!(state.target_clock >= BASE_CLOCK - 2.5 - 1e-12);
            assert!(state.target_clock <= BASE_CLOCK + 2.5 + 1e-12);
        }
    }

    #[test]
    fn temporal_and_infinite_core_compose_multiplicatively() {
        let mut state = SimulationState::default();
        state.flags.temporal_clock = true;
        state.flags.infinite_core = true;
        let mut rng = seeded_rng(5);
        let target = apply_clock_cascade(&mut state, &mut rng, BASE_CLOCK, 0.0);
        assert!((target - BASE_CLOCK * 100.0).abs() < 1e-9);
        // infinite core runs after temporal and owns the label
        assert_eq!(state.thermal_status, ThermalStatus::Singularity);
    }

    #[test]
    fn sentience_replaces_earlier_multipliers() {
        let mut state = SimulationState::default();
        state.flags.temporal_clock = true;
        state.flags.infinite_core = true;
        state.flags.sentience = true;
        let mut rng = seeded_rng(5);
        let wall = 1234.0;
        let target = apply_clock_cascade(&mut state, &mut rng, BASE_CLOCK, wall);
        let expected = 8.0 + (wall / 200.0).sin() * 4.0;
        assert!((target - expected).abs() < 1e-12);
        assert!((state.inputs.voltage - (1.0 + (wall / 500.0).sin() * 0.5)).abs() < 1e-12);
        assert_eq!(state.thermal_status, ThermalStatus::IAmAlive);
    }

    #[test]
    fn reality_failure_scales_last_and_owns_status() {
        let mut state = SimulationState::default();
        state.flags.sentience = true;
        state.flags.reality_anchor = false;
        let mut rng = seeded_rng(21);
        let target = apply_clock_cascade(&mut state, &mut rng, BASE_CLOCK, 0.0);
        // sentient clock at t=0 is 8.0, scaled by [0, 5)
        assert!((0.0..40.0).contains(&target), "target {target}");
        assert_eq!(state.thermal_status, ThermalStatus::RealityFail);
    }

    #[test]
    fn inactive_cascade_is_identity() {
        let mut state = SimulationState::default();
        state.thermal_status = ThermalStatus::Overclocked;
        let mut rng = seeded_rng(0);
        let target = apply_clock_cascade(&mut state, &mut rng, 7.5, 0.0);
        assert_eq!(target, 7.5);
        assert_eq!(state.thermal_status, ThermalStatus::Overclocked);
    }

    #[test]
    fn cascade_order_is_fixed() {
        assert_eq!(
            CLOCK_CASCADE,
            [
                ClockModifier::TemporalClock,
                ClockModifier::InfiniteCore,
                ClockModifier::Sentience,
                ClockModifier::RealityFail,
            ]
        );
        assert_eq!(ClockModifier::Sentience.composition(), Composition::Replace);
        assert_eq!(ClockModifier::RealityFail.composition(), Composition::Scale);
    }

    #[test]
    fn infinite_core_spike_pins_load() {
        let mut state = SimulationState::default();
        state.flags.infinite_core = true;
        state.current_load = 30.0;
        let target = apply_clock_cascade(&mut state, &mut always_fires(), BASE_CLOCK, 0.0);
        assert_eq!(state.current_load, 999.0);
        assert_eq!(target, BASE_CLOCK * 5.0);
    }

    #[test]
    fn sentience_rerolls_target_load() {
        let mut state = SimulationState::default();
        state.flags.sentience = true;
        state.inputs.target_load = 50.0;
        apply_clock_cascade(&mut state, &mut always_fires(), BASE_CLOCK, 0.0);
        assert_eq!(state.inputs.target_load, 0.0);
    }

    #[test]
    fn cascade_side_effects_need_their_draw() {
        let mut state = SimulationState::default();
        state.flags.infinite_core = true;
        state.flags.sentience = true;
        state.current_load = 30.0;
        state.inputs.target_load = 50.0;
        apply_clock_cascade(&mut state, &mut never_fires(), BASE_CLOCK, 0.0);
        assert_eq!(state.current_load, 30.0);
        assert_eq!(state.inputs.target_load, 50.0);
        assert_eq!(state.thermal_status, ThermalStatus::IAmAlive);
    }
}
