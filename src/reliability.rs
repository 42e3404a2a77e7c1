// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Silicon Thermal Simulation Suite ("The Die") - Reliability Model

use crate::config::NOMINAL_VOLTAGE;
use crate::types::SimulationState;

/// Rated lifetime at 25 °C and nominal voltage, in hours (ten years).
pub const RATED_MTBF_HOURS: f64 = 87_600.0;

const REFERENCE_TEMP: f64 = 25.0;

const EM_BASE_CURRENT: f64 = 0.1;
const EM_THERMAL_COEFF: f64 = 0.05;
const EM_DECAY_RATE: f64 = 1.0e-5;

/// Failure rate doubles every 10 °C.
const ARRHENIUS_DOUBLING: f64 = 10.0;
const VOLTAGE_ACCELERATION_EXP: i32 = 4;

const LEAKAGE_VOLTAGE_COEFF: f64 = 1.5;
const LEAKAGE_TEMP_COEFF: f64 = 0.04;
const LEAKAGE_SCALE_MA: f64 = 0.5;

pub fn current_density(voltage: f64, load_factor: f64) -> f64 {
    voltage * load_factor + EM_BASE_CURRENT
}

/// Electromigration wear for one step. Never negative.
pub fn health_decay(voltage: f64, load_factor: f64, temp: f64, dt: f64) -> f64 {
    let density = current_density(voltage, load_factor);
    let activation = ((temp - REFERENCE_TEMP) * EM_THERMAL_COEFF).exp();
    (EM_DECAY_RATE * density.powi(2) * activation * dt).max(0.0)
}

pub fn mtbf(temp: f64, voltage: f64) -> f64 {
    let thermal = 2.0_f64.powf((temp - REFERENCE_TEMP) / ARRHENIUS_DOUBLING);
    let electrical = (voltage / NOMINAL_VOLTAGE).powi(VOLTAGE_ACCELERATION_EXP);
    RATED_MTBF_HOURS / (thermal * electrical)
}

/// Subthreshold leakage in mA.
pub fn leakage_current(voltage: f64, temp: f64) -> f64 {
    (voltage * LEAKAGE_VOLTAGE_COEFF).exp()
        * ((temp - REFERENCE_TEMP) * LEAKAGE_TEMP_COEFF).exp()
        * LEAKAGE_SCALE_MA
}

/// Lumped paste + material + airflow resistance in K/W.
pub fn thermal_resistance(paste_quality: f64, conductivity: f64, fan_speed: f64) -> f64 {
    let paste = (1.0 / paste_quality) * 0.05;
    let material = (1.0 / conductivity) * 0.1;
    let airflow = (1.0 / (fan_speed / 10.0 + 0.1)) * 0.02;
    paste + material + airflow
}

/// Reliability stage. Health only ever moves down.
pub fn update(state: &mut SimulationState, dt: f64) {
    let voltage = state.inputs.voltage;
    let temp = state.current_temp;
    let load_factor = state.current_load / 100.0;

    let decay = health_decay(voltage, load_factor, temp, dt);
    // NaN decay (from an unbounded die) must not resurrect health
    if decay > 0.0 {
        state.silicon_health = (state.silicon_health - decay).max(0.0);
    }

    state.mtbf = mtbf(temp, voltage);
    state.leakage_current = leakage_current(voltage, temp);
    state.thermal_resistance = thermal_resistance(
        state.inputs.paste_quality,
        state.material.conductivity,
        state.inputs.fan_speed,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mtbf_at_reference_conditions() {
        assert!((mtbf(25.0, 1.2) - RATED_MTBF_HOURS).abs() < 1e-6);
        // +10 °C halves it
        assert!((mtbf(35.0, 1.2) - RATED_MTBF_HOURS / 2.0).abs() < 1e-6);
        // 2x voltage => 16x acceleration
        assert!((mtbf(25.0, 2.4) - RATED_MTBF_HOURS / 16.0).abs() < 1e-6);
    }

    #[test]
    fn leakage_grows_with_voltage_and_temperature() {
        let base = leakage_current(1.2, 25.0);
        assert!((base - (1.8_f64).exp() * 0.5).abs() < 1e-12);
        assert!(leakage_current(1.4, 25.0) > base);
        assert!(leakage_current(1.2, 80.0) > base);
    }

    #[test]
    fn thermal_resistance_survives_stopped_fan() {
        let r = thermal_resistance(0.9, 1.0, 0.0);
        assert!(r.is_finite());
        assert!((r - (0.05 / 0.9 + 0.1 + 0.2)).abs() < 1e-12);
    }

    #[test]
    fn idle_still_wears() {
        // base current density keeps a trickle of wear at zero load
        assert!(health_decay(1.2, 0.0, 25.0, 0.1) > 0.0);
    }

    #[test]
    fn health_never_increases_and_floors_at_zero() {
        let mut state = SimulationState::default();
        state.current_load = 100.0;
        state.inputs.voltage = 3.0;
        state.current_temp = 400.0;
        let mut last = state.silicon_health;
        for _ in 0..500 {
            update(&mut state, 0.1);
            assert!(state.silicon_health <= last);
            last = state.silicon_health;
        }
        assert_eq!(state.silicon_health, 0.0);
    }

    #[test]
    fn nan_temperature_does_not_restore_health() {
        let mut state = SimulationState::default();
        state.silicon_health = 42.0;
        state.current_temp = f64::NAN;
        update(&mut state, 0.1);
        assert_eq!(state.silicon_health, 42.0);
    }

    #[test]
    fn update_publishes_all_metrics() {
        let mut state = SimulationState::default();
        update(&mut state, 0.1);
        assert!((state.mtbf - RATED_MTBF_HOURS).abs() < 1e-6);
        assert!(state.leakage_current > 0.0);
        assert!(state.thermal_resistance > 0.0);
        assert!(state.silicon_health < 100.0);
    }
}
