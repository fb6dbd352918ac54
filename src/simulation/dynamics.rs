//! Dynamic actors and their kinematic models
//!
//! Cars integrate one of three models (kinematic bicycle, point mass,
//! Reeds-Shepp). An action is applied once per tick by `SceneState::step`;
//! an action a model cannot interpret is a programmer error and is
//! rejected before any state changes, never clamped into something else.

use serde::{Deserialize, Serialize};

use super::error::SimError;
use super::geometry::Footprint;
use super::types::Destination;

/// Car footprint extent along the heading axis.
pub const CAR_LENGTH: f64 = 40.0;
/// Car footprint extent across the heading axis.
pub const CAR_WIDTH: f64 = 20.0;
/// Pedestrian footprint extent (square).
pub const PED_SIZE: f64 = 10.0;

/// Wheelbase used by the bicycle model's heading-rate term.
const WHEELBASE: f64 = 30.0;
/// Speed clamp for cars, both directions.
const MAX_CAR_VEL: f64 = 30.0;
/// Speed clamp for pedestrians.
const MAX_PED_VEL: f64 = 2.0;
/// Heading-rate clamp per unit speed for the Reeds-Shepp model.
const MAX_CURVATURE: f64 = 1.0 / 30.0;

/// Which kinematic model newly spawned cars use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarModel {
    Kinematic,
    Point,
    ReedsShepp,
}

impl CarModel {
    /// Resolve a model from its configuration name.
    pub fn from_name(name: &str) -> Result<Self, SimError> {
        match name {
            "kinematic" => Ok(CarModel::Kinematic),
            "point" => Ok(CarModel::Point),
            "reeds_shepp" => Ok(CarModel::ReedsShepp),
            other => Err(SimError::config(format!(
                "unsupported kinematic model \"{}\"",
                other
            ))),
        }
    }
}

/// Externally supplied control input for one tick (dt = 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Steering angle plus acceleration (bicycle model, pedestrians).
    Steering { steer: f64, acc: f64 },
    /// Steering angle plus target velocity (Reeds-Shepp).
    SteeringVel { steer: f64, vel: f64 },
    /// Raw target velocity along the current heading (all car models).
    Velocity { vel: f64 },
}

/// Model-specific mutable kinematic state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelState {
    Kinematic { x: f64, y: f64, angle: f64, vel: f64 },
    /// `heading` carries the facing direction while the car is at rest;
    /// it tracks the velocity vector whenever the car moves.
    Point { x: f64, y: f64, vx: f64, vy: f64, heading: f64 },
    ReedsShepp { x: f64, y: f64, angle: f64, vel: f64 },
}

impl ModelState {
    fn new(x: f64, y: f64, angle: f64, vel: f64, model: CarModel) -> Self {
        match model {
            CarModel::Kinematic => ModelState::Kinematic { x, y, angle, vel },
            CarModel::Point => ModelState::Point {
                x,
                y,
                vx: vel * angle.cos(),
                vy: vel * angle.sin(),
                heading: angle,
            },
            CarModel::ReedsShepp => ModelState::ReedsShepp { x, y, angle, vel },
        }
    }

    pub fn model(&self) -> CarModel {
        match self {
            ModelState::Kinematic { .. } => CarModel::Kinematic,
            ModelState::Point { .. } => CarModel::Point,
            ModelState::ReedsShepp { .. } => CarModel::ReedsShepp,
        }
    }

    pub fn position(&self) -> (f64, f64) {
        match *self {
            ModelState::Kinematic { x, y, .. }
            | ModelState::Point { x, y, .. }
            | ModelState::ReedsShepp { x, y, .. } => (x, y),
        }
    }

    /// Heading in radians. The point-mass model derives it from the
    /// velocity vector and keeps its last facing direction when
    /// stationary, so a car at rest stays oriented along its spawn lane.
    pub fn angle(&self) -> f64 {
        match *self {
            ModelState::Kinematic { angle, .. } | ModelState::ReedsShepp { angle, .. } => angle,
            ModelState::Point { vx, vy, heading, .. } => {
                if vx == 0.0 && vy == 0.0 {
                    heading
                } else {
                    vy.atan2(vx)
                }
            }
        }
    }

    pub fn speed(&self) -> f64 {
        match *self {
            ModelState::Kinematic { vel, .. } | ModelState::ReedsShepp { vel, .. } => vel,
            ModelState::Point { vx, vy, .. } => (vx * vx + vy * vy).sqrt(),
        }
    }

    /// Whether this model can interpret the action at all.
    fn accepts(&self, action: &Action) -> bool {
        matches!(
            (self, action),
            (ModelState::Kinematic { .. }, Action::Steering { .. })
                | (ModelState::Kinematic { .. }, Action::Velocity { .. })
                | (ModelState::Point { .. }, Action::Steering { .. })
                | (ModelState::Point { .. }, Action::Velocity { .. })
                | (ModelState::ReedsShepp { .. }, Action::SteeringVel { .. })
                | (ModelState::ReedsShepp { .. }, Action::Velocity { .. })
        )
    }

    /// Integrate one tick. The action must already have passed `accepts`.
    fn integrate(&mut self, action: &Action) {
        match self {
            ModelState::Kinematic { x, y, angle, vel } => {
                let (steer, acc) = match *action {
                    Action::Steering { steer, acc } => (steer, acc),
                    Action::Velocity { vel: target } => {
                        (0.0, target.clamp(-MAX_CAR_VEL, MAX_CAR_VEL) - *vel)
                    }
                    _ => return,
                };
                *vel = (*vel + acc).clamp(-MAX_CAR_VEL, MAX_CAR_VEL);
                *angle += *vel / WHEELBASE * steer.tan();
                *x += *vel * angle.cos();
                *y += *vel * angle.sin();
            }
            ModelState::Point { x, y, vx, vy, heading } => {
                let speed = (*vx * *vx + *vy * *vy).sqrt();
                let current = if speed == 0.0 { *heading } else { vy.atan2(*vx) };
                let (new_heading, new_speed) = match *action {
                    Action::Steering { steer, acc } => {
                        (current + steer, (speed + acc).clamp(0.0, MAX_CAR_VEL))
                    }
                    Action::Velocity { vel: target } => (current, target.clamp(0.0, MAX_CAR_VEL)),
                    _ => return,
                };
                *heading = new_heading;
                *vx = new_speed * new_heading.cos();
                *vy = new_speed * new_heading.sin();
                *x += *vx;
                *y += *vy;
            }
            ModelState::ReedsShepp { x, y, angle, vel } => {
                let (steer, target) = match *action {
                    Action::SteeringVel { steer, vel } => (steer, vel),
                    Action::Velocity { vel } => (0.0, vel),
                    _ => return,
                };
                *vel = target.clamp(-MAX_CAR_VEL, MAX_CAR_VEL);
                let max_turn = MAX_CURVATURE * vel.abs();
                *angle += steer.clamp(-max_turn, max_turn);
                *x += *vel * angle.cos();
                *y += *vel * angle.sin();
            }
        }
    }
}

/// A car in the scene. Belongs to either the controlled or the background
/// category; the category is tracked by the owning table, not the car.
#[derive(Debug, Clone, PartialEq)]
pub struct Car {
    state: ModelState,
    destination: Option<Destination>,
}

impl Car {
    pub fn new(x: f64, y: f64, angle: f64, vel: f64, model: CarModel) -> Self {
        Self {
            state: ModelState::new(x, y, angle, vel, model),
            destination: None,
        }
    }

    pub fn state(&self) -> &ModelState {
        &self.state
    }

    pub fn footprint(&self) -> Footprint {
        let (x, y) = self.state.position();
        Footprint::new(x, y, self.state.angle(), CAR_LENGTH, CAR_WIDTH)
    }

    /// The goal pose assigned at spawn, if any.
    pub fn destination(&self) -> Option<&Destination> {
        self.destination.as_ref()
    }

    /// Set the spawn-time goal. A destination, once assigned, is fixed
    /// for the car's lifetime.
    pub(crate) fn assign_destination(&mut self, destination: Destination) {
        debug_assert!(self.destination.is_none(), "destination reassigned");
        self.destination = Some(destination);
    }

    pub(crate) fn check_action(&self, action: &Action) -> Result<(), String> {
        if self.state.accepts(action) {
            Ok(())
        } else {
            Err(format!(
                "{:?} model cannot interpret {:?}",
                self.state.model(),
                action
            ))
        }
    }

    pub(crate) fn apply_action(&mut self, action: &Action) {
        self.state.integrate(action);
    }
}

/// A pedestrian: heading/speed walker with a square footprint.
#[derive(Debug, Clone, PartialEq)]
pub struct Pedestrian {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub vel: f64,
}

impl Pedestrian {
    pub fn new(x: f64, y: f64, angle: f64, vel: f64) -> Self {
        Self { x, y, angle, vel }
    }

    pub fn footprint(&self) -> Footprint {
        Footprint::new(self.x, self.y, self.angle, PED_SIZE, PED_SIZE)
    }

    pub(crate) fn check_action(&self, action: &Action) -> Result<(), String> {
        match action {
            Action::Steering { .. } => Ok(()),
            other => Err(format!("pedestrians cannot interpret {:?}", other)),
        }
    }

    pub(crate) fn apply_action(&mut self, action: &Action) {
        if let Action::Steering { steer, acc } = *action {
            self.angle += steer;
            self.vel = (self.vel + acc).clamp(0.0, MAX_PED_VEL);
            self.x += self.vel * self.angle.cos();
            self.y += self.vel * self.angle.sin();
        }
    }
}
