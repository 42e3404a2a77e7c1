// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Silicon Thermal Simulation Suite ("The Die") - Soak Scenarios
//
// Engine untouched: every scenario is a setup function plus an optional
// load curve replayed against a fresh seeded engine.

use thermal_engine::{CoolingKind, Engine, Flag, Input, MaterialKind, SimError, ThermalStatus};

// ─── Scenario Configuration ─────────────────────────────────────────────────

pub struct Scenario {
    pub name: &'static str,
    pub label: &'static str,
    pub category: &'static str,
    pub ticks: u64,
    /// Real seconds fed to `Engine::advance` per tick.
    pub real_dt: f64,
    /// Fails on an unknown input name so a typo cannot pass as a stock run.
    pub setup: fn(&mut Engine) -> Result<(), SimError>,
    pub load_curve: Option<fn(u64) -> f64>,
    pub criteria: PassCriteria,
}

/// Per-run acceptance checks. History bound and health monotonicity are
/// always enforced; the rest are opt-in.
#[derive(Default)]
pub struct PassCriteria {
    /// Final die temperature must sit within this many degrees of ambient.
    pub max_final_ambient_delta: Option<f64>,
    pub final_status: Option<ThermalStatus>,
    pub min_final_health: Option<f64>,
    /// Final temperatures must be finite.
    pub require_finite: bool,
}

// ─── Setup Functions ────────────────────────────────────────────────────────

fn apply(engine: &mut Engine, writes: &[(&str, f64)]) -> Result<(), SimError> {
    for (field, value) in writes {
        engine.set_field(field, *value)?;
    }
    Ok(())
}

fn idle_air(engine: &mut Engine) -> Result<(), SimError> {
    engine.set_cooling_type(CoolingKind::Air);
    engine.set_material(MaterialKind::Copper.preset());
    apply(engine, &[("target_load", 0.0), ("fan_speed", 100.0)])
}

fn gaming_aio(engine: &mut Engine) -> Result<(), SimError> {
    engine.set_cooling_type(CoolingKind::Aio);
    engine.set_material(MaterialKind::Copper.preset());
    apply(engine, &[("fan_speed", 70.0), ("voltage", 1.25)])
}

fn ln2_bench(engine: &mut Engine) -> Result<(), SimError> {
    engine.set_cooling_type(CoolingKind::Ln2);
    engine.set_material(MaterialKind::Silver.preset());
    apply(engine, &[("target_load", 100.0), ("voltage", 1.5), ("unlock_voltage", 1.0)])
}

fn meltdown(engine: &mut Engine) -> Result<(), SimError> {
    engine.set_cooling_type(CoolingKind::Air);
    engine.set_material(MaterialKind::Aerogel.preset());
    apply(engine, &[("target_load", 100.0), ("fan_speed", 0.0), ("voltage", 1.4)])
}

fn meltdown_unsafe(engine: &mut Engine) -> Result<(), SimError> {
    meltdown(engine)?;
    engine.set_input(Input::Flag(Flag::DisableSafety, true));
    Ok(())
}

fn chaos(engine: &mut Engine) -> Result<(), SimError> {
    engine.set_cooling_type(CoolingKind::Phase);
    for flag in [Flag::Quantum, Flag::Sentience, Flag::InfiniteCore, Flag::Fusion] {
        engine.set_input(Input::Flag(flag, true));
    }
    engine.set_input(Input::Flag(Flag::RealityAnchor, false));
    apply(engine, &[("entropy", 100.0), ("time_dilation", 0.5)])
}

// ─── Load Curves ────────────────────────────────────────────────────────────

/// Menu / gameplay / loading-screen cycle.
fn gaming_load(tick: u64) -> f64 {
    match tick % 400 {
        0..=59 => 15.0,
        60..=339 => 85.0,
        _ => 100.0,
    }
}

// ─── Scenario Table ─────────────────────────────────────────────────────────

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario { name: "IDLE_AIR", label: "Idle Air (copper, fan 100)", category: "baseline",
            ticks: 1200, real_dt: 0.05, setup: idle_air, load_curve: None,
            criteria: PassCriteria {
                max_final_ambient_delta: Some(1.0),
                final_status: Some(ThermalStatus::Optimal),
                require_finite: true,
                ..Default::default()
            } },
        Scenario { name: "GAMING_AIO", label: "Gaming on AIO", category: "baseline",
            ticks: 2400, real_dt: 1.0 / 60.0, setup: gaming_aio, load_curve: Some(gaming_load),
            criteria: PassCriteria { require_finite: true, min_final_health: Some(99.0), ..Default::default() } },
        Scenario { name: "LN2_BENCH", label: "LN2 Bench Run (unlocked)", category: "extreme",
            ticks: 1200, real_dt: 0.05, setup: ln2_bench, load_curve: None,
            criteria: PassCriteria { require_finite: true, ..Default::default() } },
        Scenario { name: "MELTDOWN_SAFE", label: "Meltdown (safety on)", category: "failure",
            ticks: 1200, real_dt: 0.05, setup: meltdown, load_curve: None,
            criteria: PassCriteria {
                final_status: Some(ThermalStatus::Throttling),
                require_finite: true,
                ..Default::default()
            } },
        Scenario { name: "MELTDOWN_UNSAFE", label: "Meltdown (safety off)", category: "failure",
            ticks: 1200, real_dt: 0.05, setup: meltdown_unsafe, load_curve: None,
            criteria: PassCriteria {
                final_status: Some(ThermalStatus::CriticalHeat),
                require_finite: true,
                ..Default::default()
            } },
        Scenario { name: "CHAOS", label: "Reality Failure", category: "experimental",
            ticks: 1200, real_dt: 0.05, setup: chaos, load_curve: None,
            criteria: PassCriteria::default() },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_scenario_sets_up_cleanly() {
        for scenario in scenarios() {
            let mut engine = Engine::with_seed(1);
            assert!((scenario.setup)(&mut engine).is_ok(), "{} setup failed", scenario.name);
        }
    }

    #[test]
    fn misspelled_field_fails_setup() {
        let mut engine = Engine::with_seed(1);
        let before = engine.state().inputs.clone();
        let result = apply(&mut engine, &[("fan_sped", 10.0)]);
        assert!(matches!(result, Err(SimError::UnknownInput(_))));
        assert_eq!(engine.state().inputs, before);
    }
}
