// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Silicon Thermal Simulation Suite ("The Die") - Error Types

/// Errors surfaced by configuration and the tick boundary.
///
/// Non-physical simulation output is never an error: only malformed
/// configuration and corrupt timesteps are rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    #[error("unknown cooling type: {0:?}")]
    UnknownCoolingType(String),

    #[error("unknown material: {0:?}")]
    UnknownMaterial(String),

    #[error("unknown input field: {0:?}")]
    UnknownInput(String),

    #[error("invalid value {value} for input field {field:?}")]
    InvalidInputValue { field: String, value: f64 },

    #[error("non-finite timestep: {0}")]
    NonFiniteTimestep(f64),

    #[error("time dilation {0} produces an invalid timestep")]
    InvalidTimeDilation(f64),

    #[error("invalid engine configuration: {0}")]
    Config(String),
}
