// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Silicon Thermal Simulation Suite ("The Die")

pub mod types;
pub mod config;
pub mod error;
pub mod entropy;
pub mod environment;
pub mod governor;
pub mod power;
pub mod thermal;
pub mod reliability;
pub mod classifier;
pub mod history;
pub mod inputs;
pub mod simulation;

pub use config::EngineConfig;
pub use error::SimError;
pub use inputs::{Flag, Input};
pub use simulation::{Engine, ThermalSimulation};
pub use types::*;

use wasm_bindgen::prelude::*;

fn js_error(err: SimError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_js<T: serde::Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

/// Install the browser console logger.
///
/// @param {string} level - "trace", "debug", "info", "warn" or "error"
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: &str) {
    let log_level = match level.to_lowercase().as_str() {
        "trace" => log::Level::Trace,
        "debug" => log::Level::Debug,
        "warn" => log::Level::Warn,
        "error" => log::Level::Error,
        _ => log::Level::Info,
    };

    #[cfg(target_arch = "wasm32")]
    let _ = wasm_logger::init(wasm_logger::Config::new(log_level));

    log::info!("thermal engine logging at {}", log_level);
}

// ─── WASM Interface ──────────────────────────────────────────────────────────

#[wasm_bindgen]
impl ThermalSimulation {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32) -> Self {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        Self::from_engine(Engine::with_seed(u64::from(seed)))
    }

    /// Build from a JSON `EngineConfig`; unknown cooling or material ids fail here.
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(json: &str) -> Result<ThermalSimulation, JsValue> {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        let config = EngineConfig::from_json(json).map_err(js_error)?;
        Ok(Self::from_engine(Engine::new(config)))
    }

    /// Frame-driven tick; pass `performance.now()`.
    pub fn tick(&mut self, now_ms: f64) -> Result<JsValue, JsValue> {
        let result = self.engine.tick(now_ms).map_err(js_error)?;
        Ok(to_js(&result))
    }

    pub fn advance(&mut self, real_dt: f64) -> Result<JsValue, JsValue> {
        let result = self.engine.advance(real_dt).map_err(js_error)?;
        Ok(to_js(&result))
    }

    /// Run N fixed-dt ticks without marshalling snapshots.
    pub fn run_batch(&mut self, ticks: u32, real_dt: f64) -> Result<(), JsValue> {
        for _ in 0..ticks {
            self.engine.advance(real_dt).map_err(js_error)?;
        }
        Ok(())
    }

    /// Slider / toggle write by field name (`fan_speed`, `fanSpeed`, `quantum`, ...).
    pub fn set_input(&mut self, field: &str, value: f64) -> Result<(), JsValue> {
        self.engine.set_field(field, value).map_err(js_error)
    }

    pub fn set_cooling_type(&mut self, id: &str) -> Result<(), JsValue> {
        let kind: CoolingKind = id.parse().map_err(js_error)?;
        self.engine.set_cooling_type(kind);
        Ok(())
    }

    pub fn set_material(&mut self, id: &str) -> Result<(), JsValue> {
        let kind: MaterialKind = id.parse().map_err(js_error)?;
        self.engine.set_material(kind.preset());
        Ok(())
    }

    pub fn set_custom_material(&mut self, name: &str, thermal_mass: f64, conductivity: f64) {
        self.engine.set_material(Material { name: name.to_string(), thermal_mass, conductivity });
    }

    pub fn reset(&mut self) {
        self.engine.reset();
    }

    pub fn get_state(&self) -> JsValue {
        to_js(self.engine.state())
    }

    pub fn get_history(&self) -> JsValue {
        to_js(self.engine.history())
    }

    pub fn get_power(&self) -> JsValue {
        to_js(&self.engine.last_power())
    }

    pub fn current_temp(&self) -> f64 { self.engine.state().current_temp }
    pub fn current_clock(&self) -> f64 { self.engine.state().current_clock }
    pub fn current_load(&self) -> f64 { self.engine.state().current_load }
    pub fn power_draw(&self) -> f64 { self.engine.state().power_draw }
    pub fn fps(&self) -> f64 { self.engine.state().fps }

    pub fn thermal_status(&self) -> String {
        self.engine.state().thermal_status.label().to_string()
    }

    pub fn cooling_type(&self) -> String {
        self.engine.state().cooling_type.kind.id().to_string()
    }
}
