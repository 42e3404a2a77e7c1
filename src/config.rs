// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Silicon Thermal Simulation Suite ("The Die") - Constants & Engine Configuration

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::types::{CoolingKind, MaterialKind, OperatorInputs};

// ─── Clock & Telemetry ──────────────────────────────────────────────────────

/// Stock all-core clock in GHz.
pub const BASE_CLOCK: f64 = 5.0;
/// Floor applied to the resolved target clock before experimental overrides.
pub const MIN_CLOCK: f64 = 0.8;
/// Clock ceiling when the voltage lock is removed.
pub const UNLOCKED_MAX_CLOCK: f64 = 12.0;
/// Reference voltage every voltage-scaling term is normalized against.
pub const NOMINAL_VOLTAGE: f64 = 1.2;
/// Number of graph points kept for telemetry.
pub const HISTORY_CAPACITY: usize = 100;
/// Simulated seconds between history samples.
pub const HISTORY_INTERVAL: f64 = 0.1;

// ─── Integration ────────────────────────────────────────────────────────────

/// Largest real elapsed time (seconds) fed into one explicit-Euler step.
pub const MAX_REAL_DT: f64 = 0.1;

// ─── Thermal Policy ─────────────────────────────────────────────────────────

/// Die temperature above which the throttle policy engages.
pub const THROTTLE_THRESHOLD: f64 = 100.0;
/// Degrees above the threshold at which throttle severity saturates.
pub const THROTTLE_SPAN: f64 = 30.0;
/// Die temperature classified as CRITICAL by the default classifier.
pub const CRITICAL_TEMP: f64 = 110.0;
/// Simulated frames per GHz (5.0 GHz ~ 144 fps).
pub const FPS_PER_GHZ: f64 = 28.8;

// ─── Physics ────────────────────────────────────────────────────────────────

pub const WATER_SPECIFIC_HEAT: f64 = 4.18;
pub const ABSOLUTE_ZERO: f64 = -273.15;
/// Critical temperature below which the superconductor flag removes heat input.
pub const SUPERCONDUCTING_TEMP: f64 = -180.0;

// ─── Engine Configuration ───────────────────────────────────────────────────

/// Startup configuration for one simulation session.
///
/// Every field has a default, so a JSON document only needs the keys it
/// changes. Unknown cooling or material identifiers fail deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub seed: u64,
    pub history_capacity: usize,
    pub inputs: OperatorInputs,
    pub material: MaterialKind,
    pub cooling: CoolingKind,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            history_capacity: HISTORY_CAPACITY,
            inputs: OperatorInputs::default(),
            material: MaterialKind::Aluminum,
            cooling: CoolingKind::Air,
        }
    }
}

impl EngineConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self { seed, ..Self::default() }
    }

    /// Parse a JSON configuration document.
    pub fn from_json(raw: &str) -> Result<Self, SimError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| SimError::Config(e.to_string()))?;
        if config.history_capacity == 0 {
            return Err(SimError::Config("history_capacity must be at least 1".into()));
        }
        Ok(config)
    }
}
