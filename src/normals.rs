//! Per-vertex normals for a row-major particle grid.
//!
//! Every cell is split into two triangles with the same winding. A vertex
//! normal is the normalized sum of the unit normals of the triangles that
//! touch it; edge and corner vertices simply see fewer triangles. Degenerate
//! triangles contribute nothing and an all-degenerate neighbourhood yields
//! the zero vector.

use crate::float::Float;
use crate::particle::Particle;
use crate::vec::{Vec, Vec3};
use alloc::vec::Vec as AllocVec;

/// Recompute `out` from the current particle positions.
///
/// The winding makes a flat sheet built with [`ClothLayout::Vertical`] face
/// +Z and one built with [`ClothLayout::Horizontal`] face +Y.
///
/// [`ClothLayout::Vertical`]: crate::config::ClothLayout::Vertical
/// [`ClothLayout::Horizontal`]: crate::config::ClothLayout::Horizontal
pub fn compute_grid_normals<F: Float>(
    particles: &[Particle<Vec3<F>>],
    cols: usize,
    rows: usize,
    out: &mut AllocVec<Vec3<F>>,
) {
    out.clear();
    out.resize(particles.len(), Vec3::zero());

    for row in 0..rows.saturating_sub(1) {
        for col in 0..cols.saturating_sub(1) {
            let tl = row * cols + col;
            let tr = tl + 1;
            let bl = tl + cols;
            let br = bl + 1;

            let p_tl = particles[tl].pos;
            let p_tr = particles[tr].pos;
            let p_bl = particles[bl].pos;
            let p_br = particles[br].pos;

            let upper = (p_bl - p_tl).cross(p_tr - p_tl).normalize();
            let lower = (p_bl - p_tr).cross(p_br - p_tr).normalize();

            out[tl] = out[tl] + upper;
            out[tr] = out[tr] + upper + lower;
            out[bl] = out[bl] + upper + lower;
            out[br] = out[br] + lower;
        }
    }

    for n in out.iter_mut() {
        *n = n.normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_xz(cols: usize, rows: usize) -> AllocVec<Particle<Vec3<f32>>> {
        let mut particles = AllocVec::new();
        for row in 0..rows {
            for col in 0..cols {
                particles.push(Particle::new(Vec3::new(col as f32, 0.0, row as f32), 1.0));
            }
        }
        particles
    }

    #[test]
    fn flat_sheet_faces_up() {
        let particles = flat_xz(3, 3);
        let mut normals = AllocVec::new();
        compute_grid_normals(&particles, 3, 3, &mut normals);
        assert_eq!(normals.len(), 9);
        for n in &normals {
            assert!((n.y - 1.0).abs() < 1e-6, "normal {:?} should point +Y", n);
        }
    }

    #[test]
    fn collapsed_sheet_gives_zero_normals() {
        let particles: AllocVec<Particle<Vec3<f32>>> =
            (0..4).map(|_| Particle::new(Vec3::zero(), 1.0)).collect();
        let mut normals = AllocVec::new();
        compute_grid_normals(&particles, 2, 2, &mut normals);
        assert!(normals.iter().all(|n| *n == Vec3::zero()));
    }
}
