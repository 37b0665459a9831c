use drape::{
    ClothConfig, ClothError, ConfigIssue, PinPattern, Simulation, SimulationConfig, SolverConfig,
    Sphere, SpringKind, Vec3, MAX_RESOLUTION,
};

fn scenario(cols: usize, rows: usize) -> Simulation<f32> {
    Simulation::new(SimulationConfig {
        cloth: ClothConfig::new(cols, rows),
        solver: SolverConfig::new(),
        sphere: Sphere::new(Vec3::new(0.0, -50.0, 0.0), 1.0),
    })
    .unwrap()
}

fn pinned_positions(sim: &Simulation<f32>) -> Vec<Vec3<f32>> {
    sim.cloth()
        .particles()
        .iter()
        .filter(|p| p.pinned)
        .map(|p| p.pos)
        .collect()
}

#[test]
fn pins_never_drift() {
    let mut sim = scenario(6, 6);
    let pins = pinned_positions(&sim);
    assert_eq!(pins.len(), 6);

    for frame in 0..240 {
        sim.advance(1.0 / 60.0);
        if frame == 100 {
            sim.set_wind(Vec3::new(3.0, 0.0, 1.0));
            sim.apply_force(Vec3::new(0.0, 20.0, 0.0));
        }
    }
    assert_eq!(pinned_positions(&sim), pins);
}

#[test]
fn advance_zero_is_idempotent() {
    let mut sim = scenario(4, 4);
    let dt = sim.solver().substep;
    for _ in 0..10 {
        sim.advance(dt);
    }
    let before = sim.positions();
    for _ in 0..50 {
        sim.advance(0.0);
    }
    assert_eq!(sim.positions(), before);
}

#[test]
fn rejected_resolution_leaves_mesh_untouched() {
    let mut sim = scenario(4, 4);
    let dt = sim.solver().substep;
    for _ in 0..20 {
        sim.advance(dt);
    }
    let before = sim.positions();

    let err = sim.set_resolution(0, 5).unwrap_err();
    assert_eq!(
        err,
        ClothError::InvalidConfiguration(ConfigIssue::Resolution {
            cols: 0,
            rows: 5,
            min: 2,
            max: MAX_RESOLUTION,
        })
    );
    assert!(sim.set_resolution(5, MAX_RESOLUTION + 1).is_err());

    assert_eq!(sim.resolution(), (4, 4));
    assert_eq!(sim.positions(), before);
}

#[test]
fn set_resolution_rebuilds_mesh() {
    let mut sim = scenario(4, 4);
    sim.advance(0.05);
    sim.set_resolution(32, 16).unwrap();

    assert_eq!(sim.resolution(), (32, 16));
    assert_eq!(sim.positions().len(), 32 * 16);
    assert_eq!(sim.normals().len(), 32 * 16);
    assert_eq!(sim.accumulated_time(), 0.0);
    // Horizontal: 31*16, vertical: 32*15
    assert_eq!(sim.spring_count(SpringKind::Structural), 31 * 16 + 32 * 15);
    assert_eq!(sim.spring_count(SpringKind::Shear), 31 * 15 * 2);
    assert_eq!(sim.spring_count(SpringKind::Bend), 30 * 16 + 32 * 14);
    assert_eq!(sim.cloth().max_strain(), 0.0);
}

#[test]
fn pause_blocks_substeps() {
    let mut sim = scenario(4, 4);
    let before = sim.positions();

    sim.set_paused(true);
    assert!(sim.is_paused());
    sim.advance(10.0);
    assert_eq!(sim.positions(), before);

    sim.set_paused(false);
    sim.advance(sim.solver().substep);
    let after = sim.positions();
    let moved = sim
        .cloth()
        .particles()
        .iter()
        .zip(before.iter())
        .any(|(p, b)| !p.pinned && p.pos != *b);
    assert!(moved, "some free particle should move after unpausing: {:?}", after);
}

#[test]
fn reset_restores_initial_layout() {
    let mut sim = scenario(5, 5);
    let initial = sim.positions();
    let initial_normals = sim.normals().to_vec();

    sim.set_wind(Vec3::new(0.0, 0.0, 2.0));
    for _ in 0..30 {
        sim.advance(1.0 / 60.0);
    }
    assert_ne!(sim.positions(), initial);

    sim.reset();
    assert_eq!(sim.positions(), initial);
    assert_eq!(sim.normals(), &initial_normals[..]);
    assert_eq!(sim.accumulated_time(), 0.0);
}

#[test]
fn reset_keeps_current_resolution() {
    let mut sim = scenario(4, 4);
    sim.set_resolution(8, 6).unwrap();
    sim.advance(0.1);
    sim.reset();
    assert_eq!(sim.resolution(), (8, 6));
    let top_row_pinned = (0..8).all(|c| sim.cloth().particle(c).pinned);
    assert!(top_row_pinned);
}

#[test]
fn invalid_config_rejected_at_construction() {
    let config = SimulationConfig {
        cloth: ClothConfig::<f32>::new(4, 4).with_particle_mass(0.0),
        ..SimulationConfig::default()
    };
    assert_eq!(
        Simulation::new(config).err(),
        Some(ClothError::InvalidConfiguration(ConfigIssue::ParticleMass))
    );

    let config = SimulationConfig {
        solver: SolverConfig::<f32>::new().with_substep(0.0),
        ..SimulationConfig::default()
    };
    assert!(Simulation::new(config).is_err());
}

#[test]
fn one_shot_force_applies_once() {
    let mut steady = Simulation::new(SimulationConfig {
        cloth: ClothConfig::<f64>::new(4, 4).with_pins(PinPattern::None),
        solver: SolverConfig::new().with_gravity(Vec3::new(0.0, 0.0, 0.0)).with_damping(1.0),
        sphere: Sphere::new(Vec3::new(0.0, -50.0, 0.0), 1.0),
    })
    .unwrap();
    let dt = steady.solver().substep;
    let start = steady.positions()[0];

    steady.apply_force(Vec3::new(0.1, 0.0, 0.0));
    steady.advance(dt);
    let first = steady.positions()[0].x - start.x;
    steady.advance(dt);
    let second = steady.positions()[0].x - start.x;

    // No further acceleration after the first substep: displacement grows linearly.
    assert!(first > 0.0);
    assert!((second - 2.0 * first).abs() < 1e-9, "first {} second {}", first, second);
}

#[test]
fn off_grid_pin_move_is_rejected() {
    let mut sim = scenario(12, 12);
    let before = sim.positions();
    let err = sim.move_pin(0, 99, Vec3::new(9.0, 9.0, 9.0)).unwrap_err();
    assert_eq!(
        err,
        ClothError::InvalidConfiguration(ConfigIssue::GridCoordinate { col: 0, row: 99, cols: 12, rows: 12 })
    );
    assert_eq!(sim.positions(), before);

    let target = Vec3::new(-2.5, 8.5, 0.0);
    sim.move_pin(0, 0, target).unwrap();
    assert_eq!(sim.positions()[0], target);
}

#[test]
fn advance_refreshes_normals() {
    let mut sim = Simulation::<f32>::new(SimulationConfig::default()).unwrap();
    assert!(sim.normals().iter().all(|n| (n.z - 1.0).abs() < 1e-6));

    for _ in 0..30 {
        sim.advance(1.0 / 60.0);
    }
    // The default sphere pokes through the sheet plane, so contact bends it.
    let bent = sim.normals().iter().filter(|n| (n.z - 1.0).abs() > 1e-3).count();
    assert!(bent > 0, "normals still flat after contact");
    for n in sim.normals() {
        let len = (n.x * n.x + n.y * n.y + n.z * n.z).sqrt();
        assert!((len - 1.0).abs() < 1e-4, "normal {:?} not unit", n);
    }
}
