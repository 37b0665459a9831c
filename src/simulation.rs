//! Fixed-substep driver owning one cloth and one sphere.

use crate::cloth::Cloth;
use crate::config::{validate_resolution, SimulationConfig, SolverConfig};
use crate::error::ClothResult;
use crate::float::Float;
use crate::observer::{NoOpStepObserver, StepObserver};
use crate::sphere::Sphere;
use crate::spring::SpringKind;
use crate::vec::{Vec, Vec3};
use alloc::vec::Vec as AllocVec;

/// Owns all mutable simulation state and advances it in fixed substeps.
///
/// Callers feed wall-clock frame time into [`Simulation::advance`]; the
/// driver converts it to whole substeps of `solver.substep` seconds and
/// carries the remainder to the next call. Reads (`positions`, `normals`,
/// `sphere`) observe the state left by the last completed `advance`.
///
/// ```
/// use drape::{Simulation, SimulationConfig};
///
/// let mut sim = Simulation::<f32>::new(SimulationConfig::default()).unwrap();
/// sim.advance(1.0 / 60.0);
/// assert_eq!(sim.positions().len(), 12 * 12);
/// ```
pub struct Simulation<F: Float> {
    config: SimulationConfig<F>,
    cloth: Cloth<F>,
    accumulator: F,
    paused: bool,
    wind: Vec3<F>,
}

impl<F: Float> Simulation<F> {
    pub fn new(config: SimulationConfig<F>) -> ClothResult<Self> {
        if let Err(err) = config.validate() {
            tracing::warn!(%err, "rejected simulation config");
            return Err(err);
        }
        let cloth = Cloth::new(&config.cloth)?;
        tracing::info!(
            cols = config.cloth.cols,
            rows = config.cloth.rows,
            springs = cloth.spring_count(),
            "cloth simulation created"
        );
        Ok(Simulation {
            config,
            cloth,
            accumulator: F::zero(),
            paused: false,
            wind: Vec3::zero(),
        })
    }

    /// Feed `elapsed` seconds of frame time and run the substeps it pays for.
    pub fn advance(&mut self, elapsed: F) {
        self.advance_with(elapsed, &mut NoOpStepObserver);
    }

    /// Same as [`advance`](Self::advance), reporting each substep to `observer`.
    /// Returns the number of substeps run.
    ///
    /// At most `solver.max_substeps` run per call. If time for more is still
    /// pending after that, the backlog is dropped rather than carried.
    pub fn advance_with<O: StepObserver>(&mut self, elapsed: F, observer: &mut O) -> usize {
        if self.paused {
            return 0;
        }
        if !elapsed.is_finite() || elapsed < F::zero() {
            tracing::warn!(elapsed = ?elapsed, "ignoring invalid elapsed time");
            return 0;
        }

        self.accumulator = self.accumulator + elapsed;
        let solver = &self.config.solver;
        let mut steps = 0;
        while self.accumulator >= solver.substep && steps < solver.max_substeps {
            self.cloth.substep(solver, self.wind, &self.config.sphere, observer);
            self.accumulator = self.accumulator - solver.substep;
            steps += 1;
        }

        if self.accumulator >= solver.substep {
            tracing::debug!(
                dropped = ?self.accumulator,
                max_substeps = solver.max_substeps,
                "substep budget exhausted, discarding backlog"
            );
            self.accumulator = F::zero();
        }

        if steps > 0 {
            self.cloth.update_normals();
        }
        steps
    }

    /// Rebuild the cloth in its initial layout at the current resolution.
    pub fn reset(&mut self) {
        match Cloth::new(&self.config.cloth) {
            Ok(cloth) => self.cloth = cloth,
            // The stored config was validated when it was accepted.
            Err(err) => tracing::warn!(%err, "reset failed, keeping current cloth"),
        }
        self.accumulator = F::zero();
        tracing::debug!(cols = self.cloth.cols(), rows = self.cloth.rows(), "cloth reset");
    }

    /// Rebuild the cloth at a new resolution, discarding its physical state.
    ///
    /// Out-of-range sizes are rejected before anything is touched.
    pub fn set_resolution(&mut self, cols: usize, rows: usize) -> ClothResult<()> {
        if let Err(err) = validate_resolution(cols, rows) {
            tracing::warn!(cols, rows, %err, "rejected resolution change");
            return Err(err);
        }
        let mut cloth_config = self.config.cloth;
        cloth_config.cols = cols;
        cloth_config.rows = rows;
        let cloth = Cloth::new(&cloth_config)?;

        self.config.cloth = cloth_config;
        self.cloth = cloth;
        self.accumulator = F::zero();
        tracing::info!(cols, rows, springs = self.cloth.spring_count(), "resolution changed");
        Ok(())
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            tracing::debug!(paused, "pause toggled");
        }
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Move or resize the obstacle. Takes effect on the next substep.
    pub fn set_sphere(&mut self, sphere: Sphere<F>) -> ClothResult<()> {
        sphere.validate()?;
        tracing::debug!(center = ?sphere.center, radius = ?sphere.radius, "sphere moved");
        self.config.sphere = sphere;
        Ok(())
    }

    /// Persistent force added to every free particle each substep.
    pub fn set_wind(&mut self, wind: Vec3<F>) {
        self.wind = wind;
    }

    /// One-shot force picked up by the next substep.
    pub fn apply_force(&mut self, force: Vec3<F>) {
        self.cloth.apply_force(force);
    }

    /// Reposition a pinned particle. Coordinates off the grid are rejected
    /// and leave the cloth untouched.
    pub fn move_pin(&mut self, col: usize, row: usize, pos: Vec3<F>) -> ClothResult<()> {
        if let Err(err) = self.cloth.move_pin(col, row, pos) {
            tracing::warn!(col, row, %err, "rejected pin move");
            return Err(err);
        }
        Ok(())
    }

    /// Row-major snapshot of particle positions.
    pub fn positions(&self) -> AllocVec<Vec3<F>> {
        self.cloth.positions()
    }

    /// Row-major unit normals (zero where degenerate), same order as `positions`.
    pub fn normals(&self) -> &[Vec3<F>] {
        self.cloth.normals()
    }

    pub fn sphere(&self) -> &Sphere<F> {
        &self.config.sphere
    }

    pub fn cloth(&self) -> &Cloth<F> {
        &self.cloth
    }

    pub fn solver(&self) -> &SolverConfig<F> {
        &self.config.solver
    }

    pub fn config(&self) -> &SimulationConfig<F> {
        &self.config
    }

    /// Time received but not yet consumed by a substep.
    pub fn accumulated_time(&self) -> F {
        self.accumulator
    }

    pub fn resolution(&self) -> (usize, usize) {
        (self.cloth.cols(), self.cloth.rows())
    }

    pub fn spring_count(&self, kind: SpringKind) -> usize {
        self.cloth.springs_of_kind(kind).count()
    }
}
