//! Scene state and collision engine validation
//!
//! Covers the spawn collision-free invariant, determinism under a fixed
//! seed, the exact pair-count behavior of `get_collisions`, query
//! idempotence, the min-distance sentinel, and the all-or-nothing `step`
//! contract.

use std::collections::HashMap;

use urban_sim::simulation::{
    Action, AgentCounts, Car, CarModel, Category, ObjectRef, ScenarioConfig, SceneState, SimError,
    StaticKind, StaticObjectConfig, TrafficLight,
};

/// A config with no spawnable objects, for scenes built by hand.
fn bare_config(static_objects: Vec<StaticObjectConfig>) -> ScenarioConfig {
    ScenarioConfig {
        agents: AgentCounts {
            controlled_cars: 0,
            background_cars: 0,
            pedestrians: 0,
            use_traffic_lights: false,
        },
        car_model: CarModel::Kinematic,
        dimensions: (1000.0, 1000.0),
        static_objects,
        car_start_lanes: Vec::new(),
        ped_start_lanes: Vec::new(),
        goal_states: Vec::new(),
        traffic_lights: Vec::new(),
        max_spawn_attempts: 100,
    }
}

fn terrain_at(x: f64, y: f64) -> StaticObjectConfig {
    StaticObjectConfig {
        kind: StaticKind::Terrain,
        x,
        y,
        angle: 0.0,
        xdim: 100.0,
        ydim: 100.0,
    }
}

fn car_at(x: f64, y: f64) -> Car {
    Car::new(x, y, 0.0, 0.0, CarModel::Kinematic)
}

#[test]
fn test_spawner_produces_collision_free_scene() {
    for seed in [0, 1, 27, 1234] {
        let config = ScenarioConfig::four_way_intersection(2, 6, 4, true, CarModel::Kinematic);
        let scene = SceneState::from_config(config, seed).expect("populate");

        assert_eq!(scene.controlled_cars().len(), 2);
        assert_eq!(scene.background_cars().len(), 6);
        assert_eq!(scene.pedestrians().len(), 4);
        assert_eq!(scene.traffic_lights().len(), 4);

        let report = scene.get_collisions();
        assert!(
            report.dynamic.is_empty(),
            "seed {}: dynamic collisions right after spawn: {:?}",
            seed,
            report.dynamic
        );
        assert!(
            report.statics.is_empty(),
            "seed {}: static collisions right after spawn: {:?}",
            seed,
            report.statics
        );
    }
}

#[test]
fn test_spawn_placement_is_deterministic_per_seed() {
    let config = ScenarioConfig::four_way_intersection(2, 5, 3, true, CarModel::Kinematic);
    let a = SceneState::from_config(config.clone(), 42).expect("populate");
    let b = SceneState::from_config(config, 42).expect("populate");

    assert_eq!(a.controlled_cars(), b.controlled_cars());
    assert_eq!(a.background_cars(), b.background_cars());
    assert_eq!(a.pedestrians(), b.pedestrians());
    assert_eq!(a.traffic_lights(), b.traffic_lights());
}

#[test]
fn test_trajectories_are_deterministic_per_seed() {
    let config = ScenarioConfig::four_way_intersection(2, 4, 0, true, CarModel::Kinematic);
    let mut a = SceneState::from_config(config.clone(), 7).expect("populate");
    let mut b = SceneState::from_config(config, 7).expect("populate");

    let mut actions = HashMap::new();
    for index in 0..a.controlled_cars().len() {
        actions.insert(
            ObjectRef::new(Category::ControlledCars, index),
            Action::Velocity { vel: 5.0 },
        );
    }
    for index in 0..a.background_cars().len() {
        actions.insert(
            ObjectRef::new(Category::BackgroundCars, index),
            Action::Velocity { vel: 3.0 },
        );
    }

    for _ in 0..30 {
        a.step(&actions).expect("step a");
        b.step(&actions).expect("step b");
    }

    assert_eq!(a.controlled_cars(), b.controlled_cars());
    assert_eq!(a.background_cars(), b.background_cars());
    assert_eq!(a.traffic_lights(), b.traffic_lights());
}

#[test]
fn test_single_static_overlap_counts() {
    let mut scene = SceneState::empty(bare_config(vec![terrain_at(0.0, 0.0)]), 0).expect("empty");
    let car = scene.insert_controlled_car(car_at(0.0, 0.0));

    let report = scene.get_collisions();
    assert_eq!(report.statics.len(), 1);
    assert_eq!(report.statics[0].dynamic_index, 0);
    assert_eq!(report.statics[0].static_index, 0);
    assert_eq!(report.statics[0].category, Category::ControlledCars);
    assert!(report.dynamic.is_empty());
    assert!(report.controlled.is_empty());

    assert!(scene.collides_with_any(car));
}

#[test]
fn test_dynamic_pair_reported_once_per_direction() {
    let mut scene = SceneState::empty(bare_config(Vec::new()), 0).expect("empty");
    scene.insert_controlled_car(car_at(0.0, 0.0));
    scene.insert_controlled_car(car_at(10.0, 0.0));

    let report = scene.get_collisions();
    assert_eq!(report.dynamic.len(), 2, "both directions reported");
    assert_eq!(report.controlled.len(), 2);

    let pairs: Vec<(usize, usize)> = report
        .dynamic
        .iter()
        .map(|c| (c.index_a, c.index_b))
        .collect();
    assert!(pairs.contains(&(0, 1)));
    assert!(pairs.contains(&(1, 0)));
    assert!(report.statics.is_empty());
}

#[test]
fn test_controlled_subset_keys_on_outer_participant() {
    // A controlled/background overlap shows up twice in the dynamic list
    // but only once in the controlled list (the direction whose first
    // participant is the controlled car).
    let mut scene = SceneState::empty(bare_config(Vec::new()), 0).expect("empty");
    scene.insert_controlled_car(car_at(0.0, 0.0));
    scene.insert_background_car(car_at(10.0, 0.0));

    let report = scene.get_collisions();
    assert_eq!(report.dynamic.len(), 2);
    assert_eq!(report.controlled.len(), 1);
    assert_eq!(report.controlled[0].category_a, Category::ControlledCars);
    assert_eq!(report.controlled[0].category_b, Category::BackgroundCars);
}

#[test]
fn test_same_index_different_category_is_not_self() {
    // The self-exclusion guard requires both index and category to match.
    let mut scene = SceneState::empty(bare_config(Vec::new()), 0).expect("empty");
    scene.insert_controlled_car(car_at(0.0, 0.0));
    scene.insert_background_car(car_at(0.0, 0.0));

    let report = scene.get_collisions();
    assert_eq!(report.dynamic.len(), 2);
}

#[test]
fn test_queries_are_idempotent_between_steps() {
    let config = ScenarioConfig::four_way_intersection(1, 3, 2, true, CarModel::Kinematic);
    let scene = SceneState::from_config(config, 9).expect("populate");
    let car = ObjectRef::new(Category::ControlledCars, 0);

    assert_eq!(scene.get_collisions(), scene.get_collisions());
    assert_eq!(scene.collides_with_any(car), scene.collides_with_any(car));
    let d1 = scene.min_dist_to_collidable(car);
    let d2 = scene.min_dist_to_collidable(car);
    assert_eq!(d1, d2);
}

#[test]
fn test_min_dist_sentinel_without_collidables() {
    // A lone traffic light can collide with nothing; a lone car in an
    // empty world has nothing to measure against either.
    let mut scene = SceneState::empty(bare_config(Vec::new()), 0).expect("empty");
    let light = scene.insert_traffic_light(
        TrafficLight::new(0.0, 0.0, 0.0, "red").expect("light"),
    );
    let car = scene.insert_controlled_car(car_at(500.0, 500.0));

    assert_eq!(scene.min_dist_to_collidable(light), f64::INFINITY);
    assert_eq!(scene.min_dist_to_collidable(car), f64::INFINITY);
    assert!(!scene.collides_with_any(light));
}

#[test]
fn test_min_dist_is_center_distance() {
    let mut scene = SceneState::empty(bare_config(Vec::new()), 0).expect("empty");
    let a = scene.insert_controlled_car(car_at(0.0, 0.0));
    scene.insert_background_car(car_at(300.0, 400.0));

    let dist = scene.min_dist_to_collidable(a);
    assert!((dist - 500.0).abs() < 1e-9);
}

#[test]
fn test_step_with_unknown_object_leaves_scene_unchanged() {
    let mut scene = SceneState::empty(bare_config(Vec::new()), 0).expect("empty");
    let car = scene.insert_controlled_car(car_at(100.0, 100.0));
    let before = scene.controlled_cars().to_vec();

    let mut actions = HashMap::new();
    actions.insert(car, Action::Velocity { vel: 5.0 });
    actions.insert(
        ObjectRef::new(Category::BackgroundCars, 0),
        Action::Velocity { vel: 5.0 },
    );

    let result = scene.step(&actions);
    assert!(matches!(result, Err(SimError::InvalidAction { .. })));
    assert_eq!(scene.controlled_cars(), before.as_slice());
    assert_eq!(scene.time(), 0);
}

#[test]
fn test_step_rejects_incompatible_action_model_pair() {
    let mut scene = SceneState::empty(bare_config(Vec::new()), 0).expect("empty");
    let car = scene.insert_controlled_car(car_at(0.0, 0.0));

    // Kinematic bicycle cars do not take steering+velocity input.
    let mut actions = HashMap::new();
    actions.insert(
        car,
        Action::SteeringVel {
            steer: 0.1,
            vel: 5.0,
        },
    );
    let result = scene.step(&actions);
    assert!(matches!(result, Err(SimError::InvalidAction { .. })));
}

#[test]
fn test_light_addressed_actions_are_tolerated_and_ignored() {
    // A host supplying a uniform action map must not fail; the light
    // advances by exactly one tick either way.
    let mut scene = SceneState::empty(bare_config(Vec::new()), 0).expect("empty");
    let light = scene.insert_traffic_light(
        TrafficLight::new(0.0, 0.0, 0.0, "red").expect("light"),
    );

    let mut actions = HashMap::new();
    actions.insert(light, Action::Velocity { vel: 1.0 });
    scene.step(&actions).expect("light-addressed action tolerated");
    assert_eq!(scene.traffic_lights()[0].timer(), 1);
    assert_eq!(scene.time(), 1);

    // An unknown light index is still an unknown object.
    let mut bad = HashMap::new();
    bad.insert(
        ObjectRef::new(Category::TrafficLights, 5),
        Action::Velocity { vel: 1.0 },
    );
    let result = scene.step(&bad);
    assert!(matches!(result, Err(SimError::InvalidAction { .. })));
    assert_eq!(scene.traffic_lights()[0].timer(), 1, "failed step mutates nothing");
}

#[test]
fn test_lights_advance_and_idle_objects_carry_forward() {
    let mut scene = SceneState::empty(bare_config(Vec::new()), 0).expect("empty");
    scene.insert_controlled_car(car_at(100.0, 100.0));
    scene.insert_traffic_light(TrafficLight::new(0.0, 0.0, 0.0, "red").expect("light"));
    let before = scene.controlled_cars().to_vec();

    let actions = HashMap::new();
    for _ in 0..200 {
        scene.step(&actions).expect("step");
    }

    assert_eq!(scene.controlled_cars(), before.as_slice());
    assert_eq!(
        scene.traffic_lights()[0].phase(),
        urban_sim::simulation::LightPhase::Green
    );
    assert_eq!(scene.time(), 200);
}

#[test]
fn test_velocity_action_moves_car_along_heading() {
    let mut scene = SceneState::empty(bare_config(Vec::new()), 0).expect("empty");
    let car = scene.insert_controlled_car(car_at(0.0, 0.0));

    let mut actions = HashMap::new();
    actions.insert(car, Action::Velocity { vel: 5.0 });
    scene.step(&actions).expect("step");

    let (x, y) = scene.controlled_cars()[0].state().position();
    assert!((x - 5.0).abs() < 1e-9);
    assert!(y.abs() < 1e-9);
    assert!((scene.controlled_cars()[0].state().speed() - 5.0).abs() < 1e-9);
}

#[test]
fn test_point_model_keeps_spawn_heading_at_rest() {
    use std::f64::consts::FRAC_PI_2;

    let mut scene = SceneState::empty(bare_config(Vec::new()), 0).expect("empty");
    let car = scene.insert_controlled_car(Car::new(0.0, 0.0, FRAC_PI_2, 0.0, CarModel::Point));

    // At rest the footprint must be oriented along the spawn lane, not
    // collapsed to the +x axis.
    let state = scene.controlled_cars()[0].state();
    assert!((state.angle() - FRAC_PI_2).abs() < 1e-9);
    assert!((scene.controlled_cars()[0].footprint().angle - FRAC_PI_2).abs() < 1e-9);

    // First motion continues along that heading.
    let mut actions = HashMap::new();
    actions.insert(car, Action::Velocity { vel: 5.0 });
    scene.step(&actions).expect("step");
    let (x, y) = scene.controlled_cars()[0].state().position();
    assert!(x.abs() < 1e-9);
    assert!((y - 5.0).abs() < 1e-9);
}

#[test]
fn test_destination_assigned_from_goal_catalog() {
    let config = ScenarioConfig::four_way_intersection(2, 3, 0, false, CarModel::Kinematic);
    let goal_angles: Vec<f64> = config
        .goal_states
        .iter()
        .map(|g| g.angle_deg.to_radians())
        .collect();
    let scene = SceneState::from_config(config, 3).expect("populate");

    for car in scene.controlled_cars().iter().chain(scene.background_cars()) {
        let dest = car.destination().expect("destination assigned at spawn");
        assert!(
            goal_angles.iter().any(|a| (a - dest.angle).abs() < 1e-9),
            "destination heading {} not in catalog (radians)",
            dest.angle
        );
    }
}

#[test]
fn test_reset_reproduces_initial_placement() {
    let config = ScenarioConfig::four_way_intersection(1, 4, 2, true, CarModel::ReedsShepp);
    let mut scene = SceneState::from_config(config, 99).expect("populate");
    let initial_cars = scene.background_cars().to_vec();
    let initial_peds = scene.pedestrians().to_vec();

    let mut actions = HashMap::new();
    actions.insert(
        ObjectRef::new(Category::ControlledCars, 0),
        Action::Velocity { vel: 4.0 },
    );
    for _ in 0..10 {
        scene.step(&actions).expect("step");
    }

    scene.reset().expect("reset");
    assert_eq!(scene.time(), 0);
    assert_eq!(scene.background_cars(), initial_cars.as_slice());
    assert_eq!(scene.pedestrians(), initial_peds.as_slice());
}
