//! Cloth mesh: a Verlet particle grid with structural, shear and bend springs.

use crate::config::{ClothConfig, ClothLayout, PinPattern, SolverConfig};
use crate::error::{ClothResult, ConfigIssue};
use crate::float::Float;
use crate::normals::compute_grid_normals;
use crate::observer::StepObserver;
use crate::particle::Particle;
use crate::sphere::{ContactSummary, Sphere};
use crate::spring::{Spring, SpringKind};
use crate::vec::{Vec, Vec3};
use alloc::vec::Vec as AllocVec;

/// A cloth sheet built from a grid of Verlet particles.
///
/// Particles live in a flat arena; the particle at `(col, row)` has index
/// `row * cols + col`. Springs refer to particles by index and the adjacency
/// never changes after [`Cloth::new`]. Rebuilding at another resolution
/// means constructing a new `Cloth`.
pub struct Cloth<F: Float> {
    particles: AllocVec<Particle<Vec3<F>>>,
    springs: AllocVec<Spring<Vec3<F>>>,
    normals: AllocVec<Vec3<F>>,
    cols: usize,
    rows: usize,
}

impl<F: Float> Cloth<F> {
    /// Build a flat sheet as described by `config`.
    ///
    /// Springs are created in a fixed order, which is also the order they are
    /// relaxed in:
    /// - Structural: horizontal then vertical neighbours
    /// - Shear: both diagonals of every cell
    /// - Bend: skip-one horizontal then skip-one vertical
    ///
    /// Rest lengths are the distances in the initial layout.
    pub fn new(config: &ClothConfig<F>) -> ClothResult<Self> {
        config.validate()?;
        let cols = config.cols;
        let rows = config.rows;

        let (width, height) = config.extent;
        let step_col = width / F::from_usize(cols - 1);
        let step_row = height / F::from_usize(rows - 1);
        let (col_dir, row_dir) = match config.layout {
            ClothLayout::Vertical => (Vec3::unit_x(), -Vec3::unit_y()),
            ClothLayout::Horizontal => (Vec3::unit_x(), Vec3::unit_z()),
        };
        let corner = config.center
            - col_dir.scale(width * F::half())
            - row_dir.scale(height * F::half());

        let mut particles = AllocVec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                let pos = corner
                    + col_dir.scale(F::from_usize(col) * step_col)
                    + row_dir.scale(F::from_usize(row) * step_row);
                particles.push(Particle::new(pos, config.particle_mass));
            }
        }

        let mut springs = AllocVec::new();

        // Structural: horizontal
        for row in 0..rows {
            for col in 0..(cols - 1) {
                let a = row * cols + col;
                springs.push(Spring::from_particles(a, a + 1, &particles, SpringKind::Structural));
            }
        }

        // Structural: vertical
        for row in 0..(rows - 1) {
            for col in 0..cols {
                let a = row * cols + col;
                springs.push(Spring::from_particles(a, a + cols, &particles, SpringKind::Structural));
            }
        }

        // Shear: diagonals
        for row in 0..(rows - 1) {
            for col in 0..(cols - 1) {
                let tl = row * cols + col;
                let tr = tl + 1;
                let bl = tl + cols;
                let br = bl + 1;
                springs.push(Spring::from_particles(tl, br, &particles, SpringKind::Shear));
                springs.push(Spring::from_particles(tr, bl, &particles, SpringKind::Shear));
            }
        }

        // Bend: skip-one horizontal
        for row in 0..rows {
            for col in 0..cols.saturating_sub(2) {
                let a = row * cols + col;
                springs.push(Spring::from_particles(a, a + 2, &particles, SpringKind::Bend));
            }
        }

        // Bend: skip-one vertical
        for row in 0..rows.saturating_sub(2) {
            for col in 0..cols {
                let a = row * cols + col;
                springs.push(Spring::from_particles(a, a + 2 * cols, &particles, SpringKind::Bend));
            }
        }

        let mut cloth = Cloth { particles, springs, normals: AllocVec::new(), cols, rows };
        match config.pins {
            PinPattern::TopRow => cloth.pin_top_row(),
            PinPattern::TopCorners => {
                cloth.particles[0].pin();
                cloth.particles[cols - 1].pin();
            }
            PinPattern::None => {}
        }
        cloth.update_normals();

        tracing::trace!(cols, rows, springs = cloth.springs.len(), "cloth built");
        Ok(cloth)
    }

    /// Arena index of `(col, row)`, rejecting coordinates off the grid.
    pub fn index(&self, col: usize, row: usize) -> ClothResult<usize> {
        if col >= self.cols || row >= self.rows {
            return Err(ConfigIssue::GridCoordinate { col, row, cols: self.cols, rows: self.rows }.into());
        }
        Ok(row * self.cols + col)
    }

    pub fn pin(&mut self, col: usize, row: usize) -> ClothResult<()> {
        let idx = self.index(col, row)?;
        self.particles[idx].pin();
        Ok(())
    }

    pub fn unpin(&mut self, col: usize, row: usize) -> ClothResult<()> {
        let idx = self.index(col, row)?;
        self.particles[idx].unpin();
        Ok(())
    }

    pub fn pin_top_row(&mut self) {
        for p in self.particles.iter_mut().take(self.cols) {
            p.pin();
        }
    }

    /// Reposition a pinned particle. Free particles are not affected.
    pub fn move_pin(&mut self, col: usize, row: usize, pos: Vec3<F>) -> ClothResult<()> {
        let idx = self.index(col, row)?;
        self.particles[idx].move_to(pos);
        self.update_normals();
        Ok(())
    }

    /// Add a force to every free particle for the next substep only.
    pub fn apply_force(&mut self, force: Vec3<F>) {
        for p in self.particles.iter_mut() {
            p.apply_force(force);
        }
    }

    /// Run one fixed substep: integrate, relax springs, resolve the sphere.
    ///
    /// `wind` is a force applied on top of gravity for this substep. Normals
    /// are not refreshed here; call [`Cloth::update_normals`] once the frame's
    /// substeps are done.
    pub fn substep<O: StepObserver>(
        &mut self,
        config: &SolverConfig<F>,
        wind: Vec3<F>,
        sphere: &Sphere<F>,
        observer: &mut O,
    ) -> ContactSummary<F> {
        for p in self.particles.iter_mut() {
            p.apply_acceleration(config.gravity);
            p.apply_force(wind);
            p.integrate(config.substep, config.damping);
        }
        observer.on_integrate();

        for i in 0..config.iterations {
            for s in self.springs.iter() {
                s.solve(&mut self.particles, config.stiffness.get(s.kind));
            }
            observer.on_constraint_iteration(i);
        }

        let contacts = sphere.resolve(&mut self.particles, config.particle_radius);
        observer.on_collision(contacts.resolved);

        observer.on_step_complete();
        contacts
    }

    /// Recompute per-particle normals from the current positions.
    pub fn update_normals(&mut self) {
        compute_grid_normals(&self.particles, self.cols, self.rows, &mut self.normals);
    }

    /// Largest relative deviation of any spring from its rest length.
    pub fn max_strain(&self) -> F {
        self.springs
            .iter()
            .fold(F::zero(), |acc, s| acc.max(s.strain(&self.particles)))
    }

    pub fn positions(&self) -> AllocVec<Vec3<F>> {
        self.particles.iter().map(|p| p.pos).collect()
    }

    pub fn normals(&self) -> &[Vec3<F>] {
        &self.normals
    }

    pub fn position_at(&self, col: usize, row: usize) -> Option<Vec3<F>> {
        let idx = self.index(col, row).ok()?;
        Some(self.particles[idx].pos)
    }

    pub fn particles(&self) -> &[Particle<Vec3<F>>] {
        &self.particles
    }

    pub fn particle(&self, index: usize) -> &Particle<Vec3<F>> {
        &self.particles[index]
    }

    pub fn springs(&self) -> &[Spring<Vec3<F>>] {
        &self.springs
    }

    pub fn spring(&self, index: usize) -> &Spring<Vec3<F>> {
        &self.springs[index]
    }

    pub fn springs_of_kind(&self, kind: SpringKind) -> impl Iterator<Item = &Spring<Vec3<F>>> + '_ {
        self.springs.iter().filter(move |s| s.kind == kind)
    }

    pub fn cols(&self) -> usize { self.cols }
    pub fn rows(&self) -> usize { self.rows }
    pub fn particle_count(&self) -> usize { self.particles.len() }
    pub fn spring_count(&self) -> usize { self.springs.len() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoOpStepObserver;

    fn test_config() -> ClothConfig<f32> {
        ClothConfig::new(4, 3)
    }

    #[test]
    fn correct_particle_count() {
        let cloth = Cloth::new(&test_config()).unwrap();
        assert_eq!(cloth.particle_count(), 12); // 4 * 3
    }

    #[test]
    fn spring_counts_per_kind() {
        let cloth = Cloth::new(&test_config()).unwrap();
        // Horizontal: (4-1)*3 = 9, vertical: 4*(3-1) = 8
        assert_eq!(cloth.springs_of_kind(SpringKind::Structural).count(), 17);
        // (4-1)*(3-1)*2
        assert_eq!(cloth.springs_of_kind(SpringKind::Shear).count(), 12);
        // Horizontal: (4-2)*3 = 6, vertical: 4*(3-2) = 4
        assert_eq!(cloth.springs_of_kind(SpringKind::Bend).count(), 10);
        assert_eq!(cloth.spring_count(), 39);
    }

    #[test]
    fn vertical_layout_spans_extent() {
        let cloth = Cloth::new(&test_config()).unwrap();
        let top_left = cloth.position_at(0, 0).unwrap();
        let bottom_right = cloth.position_at(3, 2).unwrap();
        assert!((top_left.x + 2.0).abs() < 1e-6);
        assert!((top_left.y - 8.0).abs() < 1e-6);
        assert!((bottom_right.x - 2.0).abs() < 1e-6);
        assert!((bottom_right.y - 4.0).abs() < 1e-6);
    }

    #[test]
    fn rest_lengths_positive() {
        let cloth = Cloth::new(&ClothConfig::<f32>::new(2, 2)).unwrap();
        assert!(cloth.springs().iter().all(|s| s.rest_length > 0.0));
        assert_eq!(cloth.max_strain(), 0.0);
    }

    #[test]
    fn top_corners_pattern() {
        let config = test_config().with_pins(PinPattern::TopCorners);
        let cloth = Cloth::new(&config).unwrap();
        let pinned: AllocVec<usize> = (0..cloth.particle_count())
            .filter(|&i| cloth.particle(i).pinned)
            .collect();
        assert_eq!(pinned, [0, 3]);
    }

    #[test]
    fn substep_keeps_pins_in_place() {
        let mut cloth = Cloth::new(&test_config()).unwrap();
        let before = cloth.positions();
        let far_away = Sphere::new(Vec3::new(100.0, 0.0, 0.0), 1.0);
        for _ in 0..10 {
            cloth.substep(&SolverConfig::new(), Vec3::zero(), &far_away, &mut NoOpStepObserver);
        }
        let after = cloth.positions();
        for col in 0..4 {
            assert_eq!(before[col], after[col]);
        }
    }

    #[test]
    fn unpinned_sheet_falls_rigidly() {
        let config = test_config().with_pins(PinPattern::None);
        let mut cloth = Cloth::new(&config).unwrap();
        let before = cloth.positions();
        let far_away = Sphere::new(Vec3::new(100.0, 0.0, 0.0), 1.0);
        cloth.substep(&SolverConfig::new(), Vec3::zero(), &far_away, &mut NoOpStepObserver);
        for (a, b) in before.iter().zip(cloth.positions().iter()) {
            assert!(b.y < a.y, "particle should fall: {:?} -> {:?}", a, b);
        }
        assert!(cloth.max_strain() < 1e-4);
    }

    #[test]
    fn off_grid_coordinates_rejected() {
        let mut cloth = Cloth::new(&ClothConfig::<f32>::new(4, 4)).unwrap();
        assert_eq!(cloth.index(3, 3).unwrap(), 15);
        assert!(cloth.index(4, 0).is_err());
        assert!(cloth.index(0, 4).is_err());
        assert!(cloth.pin(9, 0).is_err());
        assert!(cloth.unpin(0, 9).is_err());
        assert_eq!(cloth.position_at(4, 1), None);
    }

    #[test]
    fn rejects_out_of_range_resolution() {
        assert!(Cloth::new(&ClothConfig::<f32>::new(1, 4)).is_err());
        assert!(Cloth::new(&ClothConfig::<f32>::new(65, 4)).is_err());
    }
}
