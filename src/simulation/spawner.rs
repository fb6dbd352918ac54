//! Deterministic spawn placement via rejection sampling
//!
//! Populates each dynamic category in a fixed order: controlled cars,
//! background cars, pedestrians, then traffic lights. Cars and
//! pedestrians are placed by repeatedly sampling a start lane and a
//! candidate pose, discarding any candidate whose footprint overlaps an
//! existing object. The attempt count is bounded (the scene invariant is
//! enforced by rejection, never by post-hoc correction).

use log::debug;
use rand::seq::IndexedRandom;
use rand::Rng;

use super::dynamics::{Car, Pedestrian};
use super::error::SimError;
use super::scene::{DynamicKind, SceneState};
use super::traffic_light::TrafficLight;
use super::types::{Category, Destination};

/// Populate every dynamic category of an empty scene from its config.
pub(crate) fn populate(scene: &mut SceneState) -> Result<(), SimError> {
    let counts = scene.config.agents.clone();

    for index in 0..counts.controlled_cars {
        let car = sample_car(scene, Category::ControlledCars, index)?;
        scene.insert_controlled_car(car);
    }
    for index in 0..counts.background_cars {
        let car = sample_car(scene, Category::BackgroundCars, index)?;
        scene.insert_background_car(car);
    }
    for index in 0..counts.pedestrians {
        let ped = sample_pedestrian(scene, index)?;
        scene.insert_pedestrian(ped);
    }
    if counts.use_traffic_lights {
        for info in scene.config.traffic_lights.clone() {
            let light = TrafficLight::new(info.x, info.y, info.angle, &info.init_color)?;
            scene.insert_traffic_light(light);
        }
    }

    debug!(
        "populated scene: {} controlled, {} background, {} pedestrians, {} lights",
        scene.controlled_cars.len(),
        scene.background_cars.len(),
        scene.pedestrians.len(),
        scene.traffic_lights.len()
    );
    Ok(())
}

/// Rejection-sample one car onto a random start lane and assign its goal.
fn sample_car(scene: &mut SceneState, category: Category, index: usize) -> Result<Car, SimError> {
    let max_attempts = scene.config.max_spawn_attempts;
    for attempt in 1..=max_attempts {
        let lane_index = scene.rng.random_range(0..scene.statics.car_start_lanes.len());
        let mut car = scene.statics.car_start_lanes[lane_index]
            .generate_car(scene.config.car_model, &mut scene.rng);

        if scene.is_in_collision(DynamicKind::Car, &car.footprint()) {
            continue;
        }

        car.assign_destination(choose_goal(scene));
        if attempt > 1 {
            debug!(
                "placed {} car {} on lane {} after {} attempts",
                category, index, lane_index, attempt
            );
        }
        return Ok(car);
    }
    Err(SimError::SpawnExhaustion {
        category,
        index,
        attempts: max_attempts,
    })
}

/// Rejection-sample one pedestrian onto a random pedestrian start lane.
fn sample_pedestrian(scene: &mut SceneState, index: usize) -> Result<Pedestrian, SimError> {
    let max_attempts = scene.config.max_spawn_attempts;
    for _ in 1..=max_attempts {
        let lane_index = scene.rng.random_range(0..scene.statics.ped_start_lanes.len());
        let ped = scene.statics.ped_start_lanes[lane_index].generate_pedestrian(&mut scene.rng);

        if !scene.is_in_collision(DynamicKind::Pedestrian, &ped.footprint()) {
            return Ok(ped);
        }
    }
    Err(SimError::SpawnExhaustion {
        category: Category::Pedestrians,
        index,
        attempts: max_attempts,
    })
}

/// Draw a goal uniformly from the catalog. The catalog is global (not
/// keyed by the chosen start lane); heading converts degrees to radians.
fn choose_goal(scene: &mut SceneState) -> Destination {
    let choice = scene
        .config
        .goal_states
        .choose(&mut scene.rng)
        .expect("goal catalog is non-empty after config validation");
    Destination {
        x: choice.x,
        y: choice.y,
        vel: choice.vel,
        angle: choice.angle_deg.to_radians(),
    }
}
