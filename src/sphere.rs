//! Analytical sphere collider.
//!
//! Free particles found inside `radius + thickness` are projected back onto
//! that shell. Only `pos` is touched, so the tangential part of the implicit
//! Verlet velocity survives (frictionless sliding) while the radial part is
//! cancelled on the next integration.
//!
//! There is no continuous collision detection: a particle that crosses the
//! whole sphere within one substep is not caught.

use crate::error::{ClothResult, ConfigIssue};
use crate::float::Float;
use crate::particle::Particle;
use crate::vec::{Vec, Vec3};

/// Static collision sphere.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sphere<F: Float> {
    pub center: Vec3<F>,
    pub radius: F,
}

/// Outcome of one collision pass.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ContactSummary<F: Float> {
    /// Particles pushed back to the surface.
    pub resolved: usize,
    /// Deepest penetration found before correction.
    pub max_penetration: F,
}

impl<F: Float> Sphere<F> {
    pub fn new(center: Vec3<F>, radius: F) -> Self {
        Sphere { center, radius }
    }

    pub fn validate(&self) -> ClothResult<()> {
        if !self.center.is_finite() {
            return Err(ConfigIssue::SphereCenter.into());
        }
        if !self.radius.is_finite() || self.radius <= F::zero() {
            return Err(ConfigIssue::SphereRadius.into());
        }
        Ok(())
    }

    /// Push every free particle out of the sphere inflated by `thickness`.
    pub fn resolve(&self, particles: &mut [Particle<Vec3<F>>], thickness: F) -> ContactSummary<F> {
        let shell = self.radius + thickness;
        let mut summary = ContactSummary { resolved: 0, max_penetration: F::zero() };

        for p in particles.iter_mut() {
            if p.pinned {
                continue;
            }
            let offset = p.pos - self.center;
            let distance = offset.length();
            if distance >= shell {
                continue;
            }

            // At the exact center there is no direction to push along.
            let mut direction = offset.normalize();
            if direction == Vec3::zero() {
                direction = Vec3::unit_y();
            }
            p.pos = self.center + direction.scale(shell);

            summary.resolved += 1;
            summary.max_penetration = summary.max_penetration.max(shell - distance);
        }

        summary
    }
}

impl<F: Float> Default for Sphere<F> {
    fn default() -> Self {
        Sphere {
            center: Vec3::new(F::zero(), F::from_f32(5.0), F::from_f32(0.5)),
            radius: F::from_f32(1.2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_sphere() -> Sphere<f32> {
        Sphere::new(Vec3::zero(), 1.0)
    }

    #[test]
    fn pushes_inside_particle_to_shell() {
        let mut particles = [Particle::new(Vec3::new(0.5f32, 0.0, 0.0), 1.0)];
        let summary = unit_sphere().resolve(&mut particles, 0.1);
        assert_eq!(summary.resolved, 1);
        assert!((particles[0].pos.x - 1.1).abs() < 1e-6);
        assert!((summary.max_penetration - 0.6).abs() < 1e-6);
    }

    #[test]
    fn previous_position_untouched() {
        let mut particles = [Particle::new(Vec3::new(0.0f32, 0.5, 0.0), 1.0)];
        particles[0].prev_pos = Vec3::new(0.2, 0.7, 0.0);
        unit_sphere().resolve(&mut particles, 0.0);
        assert_eq!(particles[0].prev_pos, Vec3::new(0.2, 0.7, 0.0));
    }

    #[test]
    fn center_particle_pushed_up() {
        let mut particles = [Particle::new(Vec3::<f32>::zero(), 1.0)];
        unit_sphere().resolve(&mut particles, 0.0);
        assert_eq!(particles[0].pos, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn pinned_particles_ignored() {
        let mut particles = [Particle::new(Vec3::new(0.1f32, 0.0, 0.0), 1.0)];
        particles[0].pin();
        let summary = unit_sphere().resolve(&mut particles, 0.0);
        assert_eq!(summary.resolved, 0);
        assert_eq!(particles[0].pos.x, 0.1);
    }

    #[test]
    fn rejects_bad_radius() {
        assert!(Sphere::new(Vec3::<f32>::zero(), 0.0).validate().is_err());
        assert!(Sphere::new(Vec3::<f32>::zero(), f32::NAN).validate().is_err());
        assert!(unit_sphere().validate().is_ok());
    }
}
