//! Verlet particles with position-based dynamics.

use crate::float::Float;
use crate::vec::Vec;

/// A Verlet particle: position-based dynamics with implicit velocity.
///
/// Velocity is never stored; it is the difference between `pos` and
/// `prev_pos`. Pinned particles are anchors: integration, force injection
/// and collision all skip them.
#[derive(Clone, Debug)]
pub struct Particle<V: Vec> {
    pub pos: V,
    pub prev_pos: V,
    pub acceleration: V,
    pub inv_mass: V::Scalar,
    pub pinned: bool,
}

impl<V: Vec> Particle<V> {
    pub fn new(pos: V, mass: V::Scalar) -> Self {
        let inv_mass = if mass.is_near_zero(V::Scalar::from_f32(1e-10)) {
            V::Scalar::zero()
        } else {
            V::Scalar::one() / mass
        };
        Particle {
            pos,
            prev_pos: pos,
            acceleration: V::zero(),
            inv_mass,
            pinned: false,
        }
    }

    pub fn apply_force(&mut self, force: V) {
        if !self.pinned {
            self.acceleration = self.acceleration + force.scale(self.inv_mass);
        }
    }

    pub fn apply_acceleration(&mut self, accel: V) {
        if !self.pinned {
            self.acceleration = self.acceleration + accel;
        }
    }

    /// Advance one substep: `pos += (pos - prev_pos) * damping + a * dt²`.
    pub fn integrate(&mut self, dt: V::Scalar, damping: V::Scalar) {
        if self.pinned {
            return;
        }
        let velocity = (self.pos - self.prev_pos).scale(damping);
        let new_pos = self.pos + velocity + self.acceleration.scale(dt * dt);
        self.prev_pos = self.pos;
        self.pos = new_pos;
        self.acceleration = V::zero();
    }

    /// Displacement over the last substep.
    pub fn velocity_raw(&self) -> V {
        self.pos - self.prev_pos
    }

    /// Pinning zeroes the implicit velocity so nothing carries over if the
    /// particle is released later.
    pub fn pin(&mut self) {
        self.pinned = true;
        self.prev_pos = self.pos;
        self.acceleration = V::zero();
    }

    pub fn unpin(&mut self) {
        self.pinned = false;
    }

    /// Teleport a pinned particle. Free particles are left alone.
    pub fn move_to(&mut self, pos: V) {
        if self.pinned {
            self.pos = pos;
            self.prev_pos = pos;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec::Vec3;

    #[test]
    fn integrate_applies_damped_velocity() {
        let mut p: Particle<Vec3<f32>> = Particle::new(Vec3::new(1.0, 0.0, 0.0), 1.0);
        p.prev_pos = Vec3::new(0.0, 0.0, 0.0);
        p.integrate(0.1, 0.5);
        assert!((p.pos.x - 1.5).abs() < 1e-6, "pos.x = {}", p.pos.x);
        assert_eq!(p.prev_pos.x, 1.0);
    }

    #[test]
    fn acceleration_is_consumed() {
        let mut p: Particle<Vec3<f32>> = Particle::new(Vec3::zero(), 2.0);
        p.apply_force(Vec3::new(0.0, 4.0, 0.0));
        assert!((p.acceleration.y - 2.0).abs() < 1e-6);
        p.integrate(1.0, 1.0);
        assert_eq!(p.acceleration, Vec3::zero());
        assert!((p.pos.y - 2.0).abs() < 1e-6);
    }

    #[test]
    fn pin_clears_velocity() {
        let mut p: Particle<Vec3<f64>> = Particle::new(Vec3::new(0.0, 1.0, 0.0), 1.0);
        p.prev_pos = Vec3::new(0.0, 2.0, 0.0);
        p.pin();
        assert_eq!(p.velocity_raw(), Vec3::zero());
        p.unpin();
        p.integrate(0.01, 1.0);
        assert_eq!(p.pos, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn move_to_ignores_free_particles() {
        let mut p: Particle<Vec3<f32>> = Particle::new(Vec3::zero(), 1.0);
        p.move_to(Vec3::new(5.0, 5.0, 5.0));
        assert_eq!(p.pos, Vec3::zero());
    }
}
