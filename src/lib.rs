//! Verlet cloth simulation: a spring-constrained particle grid draped over a
//! rigid sphere.
//!
//! `drape` advances a cloth mesh in fixed substeps, each of which integrates
//! particles with damped Verlet, relaxes structural/shear/bend springs
//! iteratively and projects particles out of a collision sphere. Rendering,
//! input and frame pacing live outside; they call [`Simulation::advance`]
//! once per frame and read back positions and normals.
//!
//! # Features
//!
//! - **Verlet integration**: Position-based dynamics with implicit velocity
//! - **Spring relaxation**: Structural, shear and bend distance constraints
//! - **Sphere contact**: Positional projection with a thickness margin
//! - **Shading normals**: Per-vertex normals recomputed every frame
//! - **Fixed substeps**: Frame-rate independent stepping with a catch-up cap
//! - **Observable**: Monitor physics steps via the `StepObserver` trait
//! - **`no_std` compatible**: Works in embedded and WASM environments

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod particle;
pub mod spring;
pub mod sphere;
pub mod normals;
pub mod cloth;
pub mod simulation;
pub mod observer;
pub mod config;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::{Vec, Vec3};
pub use particle::Particle;
pub use spring::{Spring, SpringKind, SpringStiffness};
pub use sphere::{ContactSummary, Sphere};
pub use cloth::Cloth;
pub use simulation::Simulation;
pub use config::{ClothConfig, ClothLayout, PinPattern, SimulationConfig, SolverConfig, MAX_RESOLUTION, MIN_RESOLUTION};
pub use observer::{NoOpStepObserver, StepObserver, TracingObserver};
pub use error::{ClothError, ClothResult, ConfigIssue};
