// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Silicon Thermal Simulation Suite ("The Die") - Type Definitions

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use crate::config::{BASE_CLOCK, HISTORY_CAPACITY};
use crate::error::SimError;

// ─── Cooling Kind ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum CoolingKind {
    Air,
    Aio,
    Tec,
    Ln2,
    Phase,
    Lhe,
    Bec,
}

impl Default for CoolingKind {
    fn default() -> Self { CoolingKind::Air }
}

impl CoolingKind {
    pub const ALL: [CoolingKind; 7] = [
        Self::Air,
        Self::Aio,
        Self::Tec,
        Self::Ln2,
        Self::Phase,
        Self::Lhe,
        Self::Bec,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Air => "AIR",
            Self::Aio => "AIO",
            Self::Tec => "TEC",
            Self::Ln2 => "LN2",
            Self::Phase => "PHASE",
            Self::Lhe => "LHE",
            Self::Bec => "BEC",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Air => "Air Cooling",
            Self::Aio => "AIO Liquid",
            Self::Tec => "Active TEC",
            Self::Ln2 => "Liquid Nitro",
            Self::Phase => "Phase Change",
            Self::Lhe => "Liquid Helium",
            Self::Bec => "Bose-Einstein",
        }
    }

    /// Pump / compressor / Peltier draw added to the reported power.
    pub fn parasitic_power(&self) -> f64 {
        match self {
            Self::Air => 0.0,
            Self::Aio => 5.0,
            Self::Tec => 200.0,
            Self::Ln2 => 0.0,
            Self::Phase => 300.0,
            Self::Lhe => 500.0,
            Self::Bec => 5000.0,
        }
    }

    pub fn preset(&self) -> CoolingType {
        CoolingType { kind: *self, parasitic_power: self.parasitic_power() }
    }
}

impl FromStr for CoolingKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SimError::UnknownCoolingType(s.to_string()))
    }
}

impl fmt::Display for CoolingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Active cooling configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CoolingType {
    pub kind: CoolingKind,
    pub parasitic_power: f64,
}

impl Default for CoolingType {
    fn default() -> Self { CoolingKind::Air.preset() }
}

// ─── Material ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum MaterialKind {
    Aluminum,
    Copper,
    Silver,
    Diamond,
    Graphene,
    Aerogel,
    Neutronium,
}

impl Default for MaterialKind {
    fn default() -> Self { MaterialKind::Aluminum }
}

impl MaterialKind {
    pub const ALL: [MaterialKind; 7] = [
        Self::Aluminum,
        Self::Copper,
        Self::Silver,
        Self::Diamond,
        Self::Graphene,
        Self::Aerogel,
        Self::Neutronium,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Aluminum => "ALUMINUM",
            Self::Copper => "COPPER",
            Self::Silver => "SILVER",
            Self::Diamond => "DIAMOND",
            Self::Graphene => "GRAPHENE",
            Self::Aerogel => "AEROGEL",
            Self::Neutronium => "NEUTRONIUM",
        }
    }

    pub fn preset(&self) -> Material {
        let (name, thermal_mass, conductivity) = match self {
            Self::Aluminum => ("Aluminum", 50.0, 1.0),
            Self::Copper => ("Copper", 150.0, 2.5),
            Self::Silver => ("Silver", 140.0, 3.0),
            Self::Diamond => ("Diamond", 40.0, 15.0),
            Self::Graphene => ("Graphene", 20.0, 10.0),
            Self::Aerogel => ("Graphene Aerogel", 2.0, 0.1),
            Self::Neutronium => ("Neutronium", 99_999.0, 999.0),
        };
        Material { name: name.to_string(), thermal_mass, conductivity }
    }
}

impl FromStr for MaterialKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SimError::UnknownMaterial(s.to_string()))
    }
}

/// Heatsink / cold-plate material.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Material {
    pub name: String,
    pub thermal_mass: f64,
    pub conductivity: f64,
}

impl Default for Material {
    fn default() -> Self { MaterialKind::Aluminum.preset() }
}

// ─── Thermal Status ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThermalStatus {
    Optimal,
    Overclocked,
    Critical,
    Throttling,
    CriticalHeat,
    TemporalDrift,
    Singularity,
    IAmAlive,
    RealityFail,
}

impl Default for ThermalStatus {
    fn default() -> Self { ThermalStatus::Optimal }
}

impl ThermalStatus {
    /// Label shown by telemetry consumers.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Optimal => "OPTIMAL",
            Self::Overclocked => "OVERCLOCKED",
            Self::Critical => "CRITICAL",
            Self::Throttling => "THROTTLING",
            Self::CriticalHeat => "CRITICAL_HEAT",
            Self::TemporalDrift => "TEMPORAL_DRIFT",
            Self::Singularity => "SINGULARITY",
            Self::IAmAlive => "I_AM_ALIVE",
            Self::RealityFail => "REALITY_FAIL",
        }
    }
}

impl fmt::Display for ThermalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ─── Halt Reason ────────────────────────────────────────────────────────────

/// Reason attached to a hardware halt. Kept for the halt overlay; the engine
/// itself never trips a halt while safety is compiled out.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum HaltReason {
    Heat,
    Cold,
}

// ─── Operator Inputs ────────────────────────────────────────────────────────

/// Slider-driven inputs. Written between ticks, never validated beyond type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OperatorInputs {
    /// Percent.
    pub target_load: f64,
    /// Percent.
    pub fan_speed: f64,
    /// Celsius.
    pub ambient_temp: f64,
    /// Percent relative humidity.
    pub humidity: f64,
    pub paste_quality: f64,
    /// Volts.
    pub voltage: f64,
    /// Percent.
    pub dust_density: f64,
    pub clock_ratio: f64,
    pub core_count: u32,
    pub smt_enabled: bool,
    /// 0-100, random lattice heating.
    pub entropy: f64,
    /// Simulated seconds per real second.
    pub time_dilation: f64,
}

impl Default for OperatorInputs {
    fn default() -> Self {
        Self {
            target_load: 10.0,
            fan_speed: 40.0,
            ambient_temp: 25.0,
            humidity: 50.0,
            paste_quality: 0.9,
            voltage: 1.20,
            dust_density: 0.0,
            clock_ratio: 1.0,
            core_count: 8,
            smt_enabled: true,
            entropy: 0.0,
            time_dilation: 1.0,
        }
    }
}

// ─── Feature Flags ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FeatureFlags {
    pub superconductor: bool,
    pub quantum: bool,
    pub unlock_voltage: bool,
    pub disable_safety: bool,
    pub recursive_smt: bool,
    pub dark_silicon: bool,
    pub neural_prediction: bool,
    pub singularity: bool,
    pub vacuum_energy: bool,
    pub temporal_clock: bool,
    pub fusion: bool,
    pub matter_shift: bool,
    pub infinite_core: bool,
    pub reality_anchor: bool,
    pub sentience: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            superconductor: false,
            quantum: false,
            unlock_voltage: false,
            disable_safety: false,
            recursive_smt: false,
            dark_silicon: false,
            neural_prediction: false,
            singularity: false,
            vacuum_energy: false,
            temporal_clock: false,
            fusion: false,
            matter_shift: false,
            infinite_core: false,
            reality_anchor: true,
            sentience: false,
        }
    }
}

impl FeatureFlags {
    /// True when none of the status-owning overrides is in play, so the
    /// default temperature/clock classification applies.
    pub fn default_classification(&self) -> bool {
        !self.sentience && !self.temporal_clock && !self.infinite_core && self.reality_anchor
    }
}

// ─── History ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HistorySample {
    pub temp: f64,
    pub clock: f64,
    pub health: f64,
}

// ─── SimulationState ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationState {
    pub inputs: OperatorInputs,
    pub material: Material,
    pub cooling_type: CoolingType,
    pub flags: FeatureFlags,

    // Thermal
    pub current_temp: f64,
    pub heatsink_temp: f64,
    pub coolant_temp: f64,
    pub dew_point: f64,
    pub condensation_risk: f64,
    pub is_halted: bool,
    pub halt_reason: Option<HaltReason>,

    // Reliability
    pub silicon_health: f64,
    pub leakage_current: f64,
    pub thermal_resistance: f64,
    pub mtbf: f64,

    // Governor / power
    pub current_clock: f64,
    pub target_clock: f64,
    pub current_load: f64,
    pub power_draw: f64,
    pub thermal_status: ThermalStatus,

    pub history: VecDeque<HistorySample>,
    /// Simulated frame rate, not a measurement.
    pub fps: f64,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new(OperatorInputs::default(), Material::default(), CoolingType::default(), HISTORY_CAPACITY)
    }
}

impl SimulationState {
    pub fn new(
        inputs: OperatorInputs,
        material: Material,
        cooling_type: CoolingType,
        history_capacity: usize,
    ) -> Self {
        let ambient = inputs.ambient_temp;
        let load = inputs.target_load;
        let seed_sample = HistorySample { temp: ambient, clock: BASE_CLOCK, health: 100.0 };
        Self {
            inputs,
            material,
            cooling_type,
            flags: FeatureFlags::default(),
            current_temp: ambient,
            heatsink_temp: ambient,
            coolant_temp: ambient,
            dew_point: 0.0,
            condensation_risk: 0.0,
            is_halted: false,
            halt_reason: None,
            silicon_health: 100.0,
            leakage_current: 0.0,
            thermal_resistance: 0.0,
            mtbf: 87_600.0,
            current_clock: BASE_CLOCK,
            target_clock: BASE_CLOCK,
            current_load: load,
            power_draw: 0.0,
            thermal_status: ThermalStatus::Optimal,
            history: std::iter::repeat(seed_sample).take(history_capacity).collect(),
            fps: 60.0,
        }
    }
}

// ─── Power Breakdown ────────────────────────────────────────────────────────

/// Per-tick power accounting. `heat_in` is what reaches the thermal integrator.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct PowerBreakdown {
    pub static_power: f64,
    pub dynamic_power: f64,
    pub tunneling_leakage: f64,
    pub parasitic_power: f64,
    pub power_draw: f64,
    pub heat_in: f64,
}

// ─── TickResult ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct TickResult {
    pub state: SimulationState,
    pub power: PowerBreakdown,
    /// Simulated seconds integrated this tick.
    pub dt: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooling_kind_parses_case_insensitively() {
        assert_eq!("ln2".parse::<CoolingKind>().unwrap(), CoolingKind::Ln2);
        assert_eq!(" Phase ".parse::<CoolingKind>().unwrap(), CoolingKind::Phase);
        assert_eq!(
            "FREON".parse::<CoolingKind>(),
            Err(SimError::UnknownCoolingType("FREON".into()))
        );
    }

    #[test]
    fn cooling_presets_carry_parasitic_power() {
        assert_eq!(CoolingKind::Air.preset().parasitic_power, 0.0);
        assert_eq!(CoolingKind::Tec.preset().parasitic_power, 200.0);
        assert_eq!(CoolingKind::Bec.preset().parasitic_power, 5000.0);
    }

    #[test]
    fn cooling_kind_serializes_as_uppercase_id() {
        for kind in CoolingKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.id()));
        }
    }

    #[test]
    fn material_lookup() {
        let copper = "copper".parse::<MaterialKind>().unwrap().preset();
        assert_eq!(copper.name, "Copper");
        assert_eq!(copper.conductivity, 2.5);
        assert!(matches!("unobtanium".parse::<MaterialKind>(), Err(SimError::UnknownMaterial(_))));
    }

    #[test]
    fn status_labels_match_serialized_form() {
        let all = [
            ThermalStatus::Optimal,
            ThermalStatus::Overclocked,
            ThermalStatus::Critical,
            ThermalStatus::Throttling,
            ThermalStatus::CriticalHeat,
            ThermalStatus::TemporalDrift,
            ThermalStatus::Singularity,
            ThermalStatus::IAmAlive,
            ThermalStatus::RealityFail,
        ];
        for status in all {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.label()));
        }
    }

    #[test]
    fn initial_state_starts_at_ambient_with_full_history() {
        let state = SimulationState::default();
        assert_eq!(state.current_temp, 25.0);
        assert_eq!(state.heatsink_temp, 25.0);
        assert_eq!(state.coolant_temp, 25.0);
        assert_eq!(state.history.len(), HISTORY_CAPACITY);
        assert!(state.flags.reality_anchor);
        assert!(state.flags.default_classification());
    }
}
