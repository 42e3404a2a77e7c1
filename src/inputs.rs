// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Silicon Thermal Simulation Suite ("The Die") - Operator Inputs
//
// Typed writes into the shared state between ticks. String-keyed lookups
// exist for the JS boundary; field names match case-insensitively and
// ignore underscores, so both `target_load` and `targetLoad` resolve.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::types::{CoolingKind, FeatureFlags, Material, SimulationState};

fn normalize(key: &str) -> String {
    key.trim()
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

// ─── Feature flags ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flag {
    Superconductor,
    Quantum,
    UnlockVoltage,
    DisableSafety,
    RecursiveSmt,
    DarkSilicon,
    NeuralPrediction,
    Singularity,
    VacuumEnergy,
    TemporalClock,
    Fusion,
    MatterShift,
    InfiniteCore,
    RealityAnchor,
    Sentience,
}

impl Flag {
    pub const ALL: [Flag; 15] = [
        Self::Superconductor,
        Self::Quantum,
        Self::UnlockVoltage,
        Self::DisableSafety,
        Self::RecursiveSmt,
        Self::DarkSilicon,
        Self::NeuralPrediction,
        Self::Singularity,
        Self::VacuumEnergy,
        Self::TemporalClock,
        Self::Fusion,
        Self::MatterShift,
        Self::InfiniteCore,
        Self::RealityAnchor,
        Self::Sentience,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Superconductor => "superconductor",
            Self::Quantum => "quantum",
            Self::UnlockVoltage => "unlock_voltage",
            Self::DisableSafety => "disable_safety",
            Self::RecursiveSmt => "recursive_smt",
            Self::DarkSilicon => "dark_silicon",
            Self::NeuralPrediction => "neural_prediction",
            Self::Singularity => "singularity",
            Self::VacuumEnergy => "vacuum_energy",
            Self::TemporalClock => "temporal_clock",
            Self::Fusion => "fusion",
            Self::MatterShift => "matter_shift",
            Self::InfiniteCore => "infinite_core",
            Self::RealityAnchor => "reality_anchor",
            Self::Sentience => "sentience",
        }
    }

    fn slot<'a>(&self, flags: &'a mut FeatureFlags) -> &'a mut bool {
        match self {
            Self::Superconductor => &mut flags.superconductor,
            Self::Quantum => &mut flags.quantum,
            Self::UnlockVoltage => &mut flags.unlock_voltage,
            Self::DisableSafety => &mut flags.disable_safety,
            Self::RecursiveSmt => &mut flags.recursive_smt,
            Self::DarkSilicon => &mut flags.dark_silicon,
            Self::NeuralPrediction => &mut flags.neural_prediction,
            Self::Singularity => &mut flags.singularity,
            Self::VacuumEnergy => &mut flags.vacuum_energy,
            Self::TemporalClock => &mut flags.temporal_clock,
            Self::Fusion => &mut flags.fusion,
            Self::MatterShift => &mut flags.matter_shift,
            Self::InfiniteCore => &mut flags.infinite_core,
            Self::RealityAnchor => &mut flags.reality_anchor,
            Self::Sentience => &mut flags.sentience,
        }
    }

    pub fn get(&self, flags: &FeatureFlags) -> bool {
        match self {
            Self::Superconductor => flags.superconductor,
            Self::Quantum => flags.quantum,
            Self::UnlockVoltage => flags.unlock_voltage,
            Self::DisableSafety => flags.disable_safety,
            Self::RecursiveSmt => flags.recursive_smt,
            Self::DarkSilicon => flags.dark_silicon,
            Self::NeuralPrediction => flags.neural_prediction,
            Self::Singularity => flags.singularity,
            Self::VacuumEnergy => flags.vacuum_energy,
            Self::TemporalClock => flags.temporal_clock,
            Self::Fusion => flags.fusion,
            Self::MatterShift => flags.matter_shift,
            Self::InfiniteCore => flags.infinite_core,
            Self::RealityAnchor => flags.reality_anchor,
            Self::Sentience => flags.sentience,
        }
    }

    pub fn set(&self, flags: &mut FeatureFlags, on: bool) {
        *self.slot(flags) = on;
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Flag {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::ALL
            .iter()
            .copied()
            .find(|f| normalize(f.name()) == wanted)
            .ok_or_else(|| SimError::UnknownInput(s.to_string()))
    }
}

// ─── Input ──────────────────────────────────────────────────────────────────

/// One operator write. Applied verbatim: out-of-range values are the
/// operator's business, not the engine's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum Input {
    TargetLoad(f64),
    FanSpeed(f64),
    AmbientTemp(f64),
    Humidity(f64),
    PasteQuality(f64),
    Voltage(f64),
    DustDensity(f64),
    ClockRatio(f64),
    CoreCount(u32),
    SmtEnabled(bool),
    Entropy(f64),
    TimeDilation(f64),
    Flag(Flag, bool),
    Cooling(CoolingKind),
    Material(Material),
}

impl Input {
    /// Resolve a numeric write by field name. Booleans take any finite
    /// non-zero value as `true`.
    pub fn from_field(field: &str, value: f64) -> Result<Self, SimError> {
        let input = match normalize(field).as_str() {
            "targetload" => Self::TargetLoad(value),
            "fanspeed" => Self::FanSpeed(value),
            "ambienttemp" => Self::AmbientTemp(value),
            "humidity" => Self::Humidity(value),
            "pastequality" => Self::PasteQuality(value),
            "voltage" => Self::Voltage(value),
            "dustdensity" => Self::DustDensity(value),
            "clockratio" => Self::ClockRatio(value),
            "entropy" => Self::Entropy(value),
            "timedilation" => Self::TimeDilation(value),
            "corecount" => {
                if !value.is_finite() || value < 0.0 || value > u32::MAX as f64 {
                    return Err(invalid(field, value));
                }
                Self::CoreCount(value.round() as u32)
            }
            "smtenabled" => Self::SmtEnabled(boolean(field, value)?),
            _ => {
                let flag = Flag::from_str(field)?;
                Self::Flag(flag, boolean(field, value)?)
            }
        };
        Ok(input)
    }

    pub fn cooling(id: &str) -> Result<Self, SimError> {
        Ok(Self::Cooling(id.parse()?))
    }

    pub fn field(&self) -> &'static str {
        match self {
            Self::TargetLoad(_) => "target_load",
            Self::FanSpeed(_) => "fan_speed",
            Self::AmbientTemp(_) => "ambient_temp",
            Self::Humidity(_) => "humidity",
            Self::PasteQuality(_) => "paste_quality",
            Self::Voltage(_) => "voltage",
            Self::DustDensity(_) => "dust_density",
            Self::ClockRatio(_) => "clock_ratio",
            Self::CoreCount(_) => "core_count",
            Self::SmtEnabled(_) => "smt_enabled",
            Self::Entropy(_) => "entropy",
            Self::TimeDilation(_) => "time_dilation",
            Self::Flag(flag, _) => flag.name(),
            Self::Cooling(_) => "cooling_type",
            Self::Material(_) => "material",
        }
    }

    /// Write into the state. Derived fields are never touched.
    pub fn apply(self, state: &mut SimulationState) {
        let inputs = &mut state.inputs;
        match self {
            Self::TargetLoad(v) => inputs.target_load = v,
            Self::FanSpeed(v) => inputs.fan_speed = v,
            Self::AmbientTemp(v) => inputs.ambient_temp = v,
            Self::Humidity(v) => inputs.humidity = v,
            Self::PasteQuality(v) => inputs.paste_quality = v,
            Self::Voltage(v) => inputs.voltage = v,
            Self::DustDensity(v) => inputs.dust_density = v,
            Self::ClockRatio(v) => inputs.clock_ratio = v,
            Self::CoreCount(n) => inputs.core_count = n,
            Self::SmtEnabled(on) => inputs.smt_enabled = on,
            Self::Entropy(v) => inputs.entropy = v,
            Self::TimeDilation(v) => inputs.time_dilation = v,
            Self::Flag(flag, on) => flag.set(&mut state.flags, on),
            Self::Cooling(kind) => state.cooling_type = kind.preset(),
            Self::Material(material) => state.material = material,
        }
    }
}

fn invalid(field: &str, value: f64) -> SimError {
    SimError::InvalidInputValue { field: field.to_string(), value }
}

fn boolean(field: &str, value: f64) -> Result<bool, SimError> {
    if value.is_finite() {
        Ok(value != 0.0)
    } else {
        Err(invalid(field, value))
    }
}
