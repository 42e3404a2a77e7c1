#[cfg(test)]
mod tests {
    use thermal_engine::config::{BASE_CLOCK, HISTORY_CAPACITY};
    use thermal_engine::*;

    fn engine() -> Engine {
        Engine::with_seed(7)
    }

    fn run(engine: &mut Engine, ticks: usize, real_dt: f64) {
        for _ in 0..ticks {
            engine.advance(real_dt).unwrap();
        }
    }

    // ========== Environment ==========

    #[test]
    fn test_dew_point_reference() {
        let mut sim = engine();
        sim.advance(0.05).unwrap();
        let dp = sim.state().dew_point;
        assert!((dp - 13.9).abs() < 0.1, "dew point {dp}");
    }

    #[test]
    fn test_condensation_builds_on_cold_die() {
        let mut sim = engine();
        sim.set_cooling_type(CoolingKind::Ln2);
        sim.set_field("target_load", 0.0).unwrap();
        run(&mut sim, 600, 0.1);
        let state = sim.state();
        assert!(state.current_temp < state.dew_point);
        assert_eq!(state.condensation_risk, 100.0);
    }

    // ========== Thermal ==========

    #[test]
    fn test_air_idle_converges_to_ambient() {
        let mut sim = engine();
        sim.set_material(MaterialKind::Copper.preset());
        sim.set_field("target_load", 0.0).unwrap();
        sim.set_field("fan_speed", 100.0).unwrap();
        sim.set_field("voltage", 1.2).unwrap();
        sim.state_mut().current_temp = 70.0;
        run(&mut sim, 2000, 0.1);
        let state = sim.state();
        assert!(
            (state.current_temp - 25.0).abs() < 1.0,
            "idle die settled at {:.3}",
            state.current_temp
        );
    }

    #[test]
    fn test_every_cooling_mode_stays_finite_at_stock_settings() {
        for kind in CoolingKind::ALL {
            let mut sim = engine();
            sim.set_cooling_type(kind);
            run(&mut sim, 500, 0.05);
            let state = sim.state();
            assert!(state.current_temp.is_finite(), "{kind}: die {}", state.current_temp);
            assert!(state.heatsink_temp.is_finite(), "{kind}: sink {}", state.heatsink_temp);
            assert!(state.coolant_temp.is_finite(), "{kind}: coolant {}", state.coolant_temp);
        }
    }

    #[test]
    fn test_bec_sink_locked() {
        let mut sim = engine();
        sim.set_cooling_type(CoolingKind::Bec);
        run(&mut sim, 10, 0.05);
        assert_eq!(sim.state().heatsink_temp, -273.15);
        assert_eq!(sim.state().power_draw, sim.last_power().power_draw);
        assert!(sim.last_power().parasitic_power == 5000.0);
    }

    // ========== Throttle policy ==========

    #[test]
    fn test_throttle_with_safety_on() {
        let mut sim = engine();
        sim.state_mut().current_temp = 105.0;
        let result = sim.advance(0.01).unwrap();
        assert_eq!(result.state.thermal_status, ThermalStatus::Throttling);
        assert!(result.state.current_clock < BASE_CLOCK);
    }

    #[test]
    fn test_throttle_bypassed_with_safety_off() {
        let mut hot = engine();
        hot.set_field("disable_safety", 1.0).unwrap();
        hot.state_mut().current_temp = 105.0;

        let mut cool = engine();
        cool.set_field("disable_safety", 1.0).unwrap();
        cool.state_mut().current_temp = 50.0;

        let hot_result = hot.advance(0.01).unwrap();
        let cool_result = cool.advance(0.01).unwrap();
        assert_eq!(hot_result.state.thermal_status, ThermalStatus::CriticalHeat);
        assert_eq!(
            hot_result.state.current_clock.to_bits(),
            cool_result.state.current_clock.to_bits()
        );
    }

    #[test]
    fn test_throttling_reverts_when_cool() {
        let mut sim = engine();
        sim.state_mut().current_temp = 105.0;
        sim.advance(0.01).unwrap();
        assert_eq!(sim.state().thermal_status, ThermalStatus::Throttling);
        sim.state_mut().current_temp = 60.0;
        sim.advance(0.01).unwrap();
        assert_eq!(sim.state().thermal_status, ThermalStatus::Optimal);
    }

    // ========== Experimental modifiers ==========

    #[test]
    fn test_superconductor_removes_heat_input() {
        let mut sim = engine();
        sim.set_field("superconductor", 1.0).unwrap();
        sim.set_field("quantum", 1.0).unwrap();
        sim.set_field("target_load", 100.0).unwrap();
        sim.state_mut().current_temp = -190.0;
        let result = sim.advance(0.01).unwrap();
        assert_eq!(result.power.heat_in, 0.0);
        assert!(result.power.power_draw > 0.0);
    }

    #[test]
    fn test_clock_cascade_last_status_wins() {
        let mut sim = engine();
        sim.set_field("temporal_clock", 1.0).unwrap();
        sim.set_field("sentience", 1.0).unwrap();
        sim.advance(0.05).unwrap();
        assert_eq!(sim.state().thermal_status, ThermalStatus::IAmAlive);

        sim.set_field("reality_anchor", 0.0).unwrap();
        sim.advance(0.05).unwrap();
        assert_eq!(sim.state().thermal_status, ThermalStatus::RealityFail);
    }

    #[test]
    fn test_sentience_drives_voltage() {
        let mut sim = engine();
        sim.set_field("sentience", 1.0).unwrap();
        sim.advance(0.05).unwrap();
        // wall clock 50 ms
        let expected = 1.0 + (50.0_f64 / 500.0).sin() * 0.5;
        assert!((sim.state().inputs.voltage - expected).abs() < 1e-12);
    }

    #[test]
    fn test_temporal_clock_multiplies_target() {
        let mut sim = engine();
        sim.set_field("temporal_clock", 1.0).unwrap();
        sim.advance(0.05).unwrap();
        assert_eq!(sim.state().target_clock, 20.0 * BASE_CLOCK);
        assert_eq!(sim.state().thermal_status, ThermalStatus::TemporalDrift);
    }

    #[test]
    fn test_matter_shift_is_carried_only() {
        let mut a = engine();
        let mut b = engine();
        b.set_field("matter_shift", 1.0).unwrap();
        run(&mut a, 50, 0.05);
        run(&mut b, 50, 0.05);
        assert!(b.state().flags.matter_shift);
        assert_eq!(a.state().current_temp.to_bits(), b.state().current_temp.to_bits());
    }

    // ========== History ==========

    #[test]
    fn test_history_prefilled_and_bounded() {
        let mut sim = engine();
        assert_eq!(sim.history().len(), HISTORY_CAPACITY);
        run(&mut sim, 1000, 0.1);
        assert_eq!(sim.history().len(), HISTORY_CAPACITY);
        let newest = sim.history().back().unwrap();
        assert_eq!(newest.temp, sim.state().current_temp);
    }

    #[test]
    fn test_custom_history_capacity() {
        let config = EngineConfig::from_json(r#"{"history_capacity": 8}"#).unwrap();
        let mut sim = Engine::new(config);
        run(&mut sim, 50, 0.1);
        assert_eq!(sim.history().len(), 8);
    }

    // ========== Reset ==========

    #[test]
    fn test_reset_idempotent_at_idle() {
        let mut sim = engine();
        sim.set_field("target_load", 0.0).unwrap();
        run(&mut sim, 200, 0.05);
        sim.state_mut().current_temp = 95.0;
        sim.state_mut().heatsink_temp = 80.0;
        sim.state_mut().is_halted = true;
        sim.state_mut().halt_reason = Some(HaltReason::Heat);

        sim.reset();
        sim.reset();
        let state = sim.state();
        let ambient = state.inputs.ambient_temp;
        assert_eq!(state.current_temp, ambient);
        assert_eq!(state.heatsink_temp, ambient);
        assert_eq!(state.coolant_temp, ambient);
        assert!(!state.is_halted);
        assert!(state.halt_reason.is_none());

        sim.advance(0.1).unwrap();
        assert!((sim.state().current_temp - ambient).abs() < 1.0);
    }

    // ========== Boundary errors ==========

    #[test]
    fn test_non_finite_tick_rejected() {
        let mut sim = engine();
        sim.tick(0.0).unwrap();
        sim.tick(16.0).unwrap();
        let before = sim.state().clone();
        assert!(matches!(sim.tick(f64::NAN), Err(SimError::NonFiniteTimestep(_))));
        assert_eq!(sim.state(), &before);
        // the wall clock did not move either
        assert_eq!(sim.wall_clock_ms(), Some(16.0));
    }

    #[test]
    fn test_clock_stepping_backwards_integrates_nothing() {
        let mut sim = engine();
        sim.tick(1_000.0).unwrap();
        let result = sim.tick(500.0).unwrap();
        assert_eq!(result.dt, 0.0);
    }

    #[test]
    fn test_long_frame_clamped_then_dilated() {
        let mut sim = engine();
        sim.set_field("time_dilation", 3.0).unwrap();
        sim.tick(0.0).unwrap();
        let result = sim.tick(2_000.0).unwrap();
        assert!((result.dt - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_cooling_type_fails_at_configuration() {
        assert!(matches!(
            "FREON".parse::<CoolingKind>(),
            Err(SimError::UnknownCoolingType(_))
        ));
        assert!(EngineConfig::from_json(r#"{"cooling": "FREON"}"#).is_err());
        assert!(matches!(
            Input::cooling("freon"),
            Err(SimError::UnknownCoolingType(_))
        ));
    }

    #[test]
    fn test_wasm_handle_wraps_engine() {
        let mut sim = ThermalSimulation::from_engine(Engine::with_seed(3));
        sim.engine_mut().advance(0.05).unwrap();
        assert_eq!(sim.current_temp(), sim.engine().state().current_temp);
        assert_eq!(sim.thermal_status(), "OPTIMAL");
        assert_eq!(sim.cooling_type(), "AIR");
    }
}
