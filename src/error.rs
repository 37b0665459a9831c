//! Error types for cloth configuration.
//!
//! Only configuration requests can fail. Numerical trouble inside a step
//! (zero-length springs, degenerate faces, particles at the sphere center)
//! is absorbed where it happens.

use thiserror::Error;

/// Errors returned by fallible cloth operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClothError {
    /// A requested configuration was rejected; nothing was modified.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigIssue),
}

/// The configuration field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigIssue {
    #[error("resolution {cols}x{rows} outside supported range {min}..={max}")]
    Resolution { cols: usize, rows: usize, min: usize, max: usize },
    #[error("cloth extent must be positive and finite")]
    Extent,
    #[error("cloth center must be finite")]
    Center,
    #[error("particle mass must be positive and finite")]
    ParticleMass,
    #[error("damping must be in (0, 1]")]
    Damping,
    #[error("substep duration must be positive and finite")]
    SubstepDuration,
    #[error("at least one relaxation iteration is required")]
    Iterations,
    #[error("substep cap must be at least 1")]
    MaxSubsteps,
    #[error("gravity must be finite")]
    Gravity,
    #[error("particle radius must be non-negative and finite")]
    ParticleRadius,
    #[error("spring stiffness must be in [0, 1]")]
    Stiffness,
    #[error("sphere radius must be positive and finite")]
    SphereRadius,
    #[error("sphere center must be finite")]
    SphereCenter,
    #[error("grid coordinate ({col}, {row}) outside {cols}x{rows} cloth")]
    GridCoordinate { col: usize, row: usize, cols: usize, rows: usize },
}

/// Convenience alias for `Result<T, ClothError>`.
pub type ClothResult<T> = Result<T, ClothError>;
