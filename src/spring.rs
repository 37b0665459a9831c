//! Distance constraints between particles of a cloth grid.

use crate::float::Float;
use crate::particle::Particle;
use crate::vec::Vec;

/// Which grid adjacency produced a spring.
///
/// The kind selects a stiffness from [`SpringStiffness`]; the relaxation
/// itself is identical for every kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpringKind {
    /// Horizontal and vertical neighbours.
    Structural,
    /// Diagonal neighbours.
    Shear,
    /// Neighbours two cells apart along a row or column.
    Bend,
}

impl SpringKind {
    pub const ALL: [SpringKind; 3] = [SpringKind::Structural, SpringKind::Shear, SpringKind::Bend];
}

/// Correction scale per spring kind, each in `[0, 1]`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpringStiffness<F: Float> {
    pub structural: F,
    pub shear: F,
    pub bend: F,
}

impl<F: Float> SpringStiffness<F> {
    /// Every kind resolved as a hard constraint.
    pub fn uniform(value: F) -> Self {
        SpringStiffness { structural: value, shear: value, bend: value }
    }

    pub fn get(&self, kind: SpringKind) -> F {
        match kind {
            SpringKind::Structural => self.structural,
            SpringKind::Shear => self.shear,
            SpringKind::Bend => self.bend,
        }
    }

    pub fn set(&mut self, kind: SpringKind, value: F) {
        match kind {
            SpringKind::Structural => self.structural = value,
            SpringKind::Shear => self.shear = value,
            SpringKind::Bend => self.bend = value,
        }
    }
}

impl<F: Float> Default for SpringStiffness<F> {
    fn default() -> Self {
        Self::uniform(F::one())
    }
}

/// A distance constraint between particles `a` and `b`, stored as indices
/// into the owning cloth's particle arena.
#[derive(Clone, Debug)]
pub struct Spring<V: Vec> {
    pub a: usize,
    pub b: usize,
    pub rest_length: V::Scalar,
    pub kind: SpringKind,
}

impl<V: Vec> Spring<V> {
    /// Build a spring whose rest length is the current endpoint distance.
    pub fn from_particles(a: usize, b: usize, particles: &[Particle<V>], kind: SpringKind) -> Self {
        let rest_length = particles[a].pos.distance(particles[b].pos);
        Spring { a, b, rest_length, kind }
    }

    /// Current endpoint distance.
    pub fn length(&self, particles: &[Particle<V>]) -> V::Scalar {
        particles[self.a].pos.distance(particles[self.b].pos)
    }

    /// Relative deviation from rest length.
    pub fn strain(&self, particles: &[Particle<V>]) -> V::Scalar {
        (self.length(particles) - self.rest_length).abs() / self.rest_length
    }

    /// One relaxation pass over this spring.
    ///
    /// The correction is split by pin state: half to each free end, all of it
    /// to the free end when the other is pinned, nothing when both are.
    pub fn solve(&self, particles: &mut [Particle<V>], stiffness: V::Scalar) {
        let w_a = if particles[self.a].pinned { V::Scalar::zero() } else { V::Scalar::one() };
        let w_b = if particles[self.b].pinned { V::Scalar::zero() } else { V::Scalar::one() };
        let w_total = w_a + w_b;
        if w_total.is_near_zero(V::Scalar::from_f32(1e-10)) {
            return; // both pinned
        }

        let delta = particles[self.b].pos - particles[self.a].pos;
        let dist = delta.length();
        if dist.is_near_zero(V::Scalar::from_f32(1e-10)) {
            return; // degenerate
        }

        let difference = (dist - self.rest_length) / dist;
        let correction = delta.scale(difference * stiffness);

        if w_a > V::Scalar::zero() {
            particles[self.a].pos = particles[self.a].pos + correction.scale(w_a / w_total);
        }
        if w_b > V::Scalar::zero() {
            particles[self.b].pos = particles[self.b].pos - correction.scale(w_b / w_total);
        }
    }
}
