//! Configuration types for the cloth, the solver and the whole simulation.

use crate::error::{ClothResult, ConfigIssue};
use crate::float::Float;
use crate::sphere::Sphere;
use crate::spring::{SpringKind, SpringStiffness};
use crate::vec::{Vec, Vec3};

/// Smallest supported particle count along either grid axis.
pub const MIN_RESOLUTION: usize = 2;
/// Largest supported particle count along either grid axis.
pub const MAX_RESOLUTION: usize = 64;

/// Configuration for the substep pipeline.
///
/// # Builder Pattern
/// ```
/// use drape::config::SolverConfig;
/// use drape::vec::Vec3;
///
/// let config: SolverConfig<f32> = SolverConfig::new()
///     .with_iterations(8)
///     .with_gravity(Vec3::new(0.0, -9.81, 0.0))
///     .with_damping(0.99)
///     .with_substep(1.0 / 240.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig<F: Float> {
    /// Relaxation passes over all springs per substep. Default: 5.
    pub iterations: usize,
    /// Gravity acceleration. Default: (0, -9.81, 0).
    pub gravity: Vec3<F>,
    /// Multiplier on the implicit velocity, in (0, 1]. 1.0 = no damping. Default: 0.99.
    pub damping: F,
    /// Fixed physics substep in seconds. Default: 1/240.
    pub substep: F,
    /// Most substeps a single `advance` may run. Default: 5.
    pub max_substeps: usize,
    /// Cloth thickness kept between particles and the sphere. Default: 0.02.
    pub particle_radius: F,
    /// Correction scale per spring kind. Default: 1.0 for every kind.
    pub stiffness: SpringStiffness<F>,
}

impl<F: Float> SolverConfig<F> {
    /// Create a new config with default values.
    pub fn new() -> Self {
        SolverConfig {
            iterations: 5,
            gravity: Vec3::new(F::zero(), F::from_f32(-9.81), F::zero()),
            damping: F::from_f32(0.99),
            substep: F::one() / F::from_f32(240.0),
            max_substeps: 5,
            particle_radius: F::from_f32(0.02),
            stiffness: SpringStiffness::default(),
        }
    }

    /// Set the number of relaxation iterations.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the gravity vector.
    pub fn with_gravity(mut self, gravity: Vec3<F>) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the damping factor.
    pub fn with_damping(mut self, damping: F) -> Self {
        self.damping = damping;
        self
    }

    /// Set the fixed substep duration.
    pub fn with_substep(mut self, substep: F) -> Self {
        self.substep = substep;
        self
    }

    /// Set the per-call substep cap.
    pub fn with_max_substeps(mut self, max_substeps: usize) -> Self {
        self.max_substeps = max_substeps;
        self
    }

    /// Set the collision thickness.
    pub fn with_particle_radius(mut self, particle_radius: F) -> Self {
        self.particle_radius = particle_radius;
        self
    }

    /// Set the stiffness of one spring kind.
    pub fn with_stiffness(mut self, kind: SpringKind, value: F) -> Self {
        self.stiffness.set(kind, value);
        self
    }

    pub fn validate(&self) -> ClothResult<()> {
        if self.iterations == 0 {
            return Err(ConfigIssue::Iterations.into());
        }
        if !self.gravity.is_finite() {
            return Err(ConfigIssue::Gravity.into());
        }
        if !self.damping.is_finite() || self.damping <= F::zero() || self.damping > F::one() {
            return Err(ConfigIssue::Damping.into());
        }
        if !self.substep.is_finite() || self.substep <= F::zero() {
            return Err(ConfigIssue::SubstepDuration.into());
        }
        if self.max_substeps == 0 {
            return Err(ConfigIssue::MaxSubsteps.into());
        }
        if !self.particle_radius.is_finite() || self.particle_radius < F::zero() {
            return Err(ConfigIssue::ParticleRadius.into());
        }
        for kind in SpringKind::ALL {
            let k = self.stiffness.get(kind);
            if !k.is_finite() || k < F::zero() || k > F::one() {
                return Err(ConfigIssue::Stiffness.into());
            }
        }
        Ok(())
    }
}

impl<F: Float> Default for SolverConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Plane the sheet is laid out in when built or reset.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClothLayout {
    /// Columns along +X, rows descending along -Y. Row 0 is the top edge.
    Vertical,
    /// Columns along +X, rows along +Z at constant height.
    Horizontal,
}

/// Which particles are anchored when the cloth is built.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PinPattern {
    /// Every particle of row 0.
    TopRow,
    /// The two ends of row 0.
    TopCorners,
    /// Nothing pinned; the sheet falls freely.
    None,
}

/// Configuration for a cloth grid.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClothConfig<F: Float> {
    pub cols: usize,
    pub rows: usize,
    /// World size of the sheet along its column and row directions.
    pub extent: (F, F),
    /// World position of the middle of the sheet.
    pub center: Vec3<F>,
    pub layout: ClothLayout,
    pub pins: PinPattern,
    pub particle_mass: F,
}

impl<F: Float> ClothConfig<F> {
    pub fn new(cols: usize, rows: usize) -> Self {
        ClothConfig {
            cols,
            rows,
            extent: (F::from_f32(4.0), F::from_f32(4.0)),
            center: Vec3::new(F::zero(), F::from_f32(6.0), F::zero()),
            layout: ClothLayout::Vertical,
            pins: PinPattern::TopRow,
            particle_mass: F::from_f32(0.1),
        }
    }

    pub fn with_extent(mut self, width: F, height: F) -> Self {
        self.extent = (width, height);
        self
    }

    pub fn with_center(mut self, center: Vec3<F>) -> Self {
        self.center = center;
        self
    }

    pub fn with_layout(mut self, layout: ClothLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_pins(mut self, pins: PinPattern) -> Self {
        self.pins = pins;
        self
    }

    pub fn with_particle_mass(mut self, mass: F) -> Self {
        self.particle_mass = mass;
        self
    }

    pub fn validate(&self) -> ClothResult<()> {
        validate_resolution(self.cols, self.rows)?;
        let (w, h) = self.extent;
        if !w.is_finite() || !h.is_finite() || w <= F::zero() || h <= F::zero() {
            return Err(ConfigIssue::Extent.into());
        }
        if !self.center.is_finite() {
            return Err(ConfigIssue::Center.into());
        }
        if !self.particle_mass.is_finite() || self.particle_mass <= F::zero() {
            return Err(ConfigIssue::ParticleMass.into());
        }
        Ok(())
    }
}

impl<F: Float> Default for ClothConfig<F> {
    fn default() -> Self {
        Self::new(12, 12)
    }
}

/// Everything needed to build a [`Simulation`](crate::Simulation).
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationConfig<F: Float> {
    pub cloth: ClothConfig<F>,
    pub solver: SolverConfig<F>,
    pub sphere: Sphere<F>,
}

impl<F: Float> SimulationConfig<F> {
    pub fn validate(&self) -> ClothResult<()> {
        self.cloth.validate()?;
        self.solver.validate()?;
        self.sphere.validate()
    }
}

pub(crate) fn validate_resolution(cols: usize, rows: usize) -> ClothResult<()> {
    let range = MIN_RESOLUTION..=MAX_RESOLUTION;
    if range.contains(&cols) && range.contains(&rows) {
        Ok(())
    } else {
        Err(ConfigIssue::Resolution { cols, rows, min: MIN_RESOLUTION, max: MAX_RESOLUTION }.into())
    }
}
