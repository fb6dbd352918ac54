//! Standalone scene state and collision engine
//!
//! This module contains the authoritative representation of what exists
//! where in a traffic scene. It owns object placement, per-tick kinematic
//! advancement, collision queries, and traffic-light phase timing. It
//! performs no I/O and no rendering; external agents feed it actions and
//! read its state.

mod agents;
mod config;
mod dynamics;
mod error;
mod geometry;
mod scene;
mod spawner;
mod statics;
mod traffic_light;
mod types;

// Re-export public types for external use
// These may not all be used within this crate but are part of the public API
#[allow(unused_imports)]
pub use agents::{Agent, AgentDispatch, CruiseAgent};
#[allow(unused_imports)]
pub use config::{
    AgentCounts, GoalConfig, LaneConfig, ScenarioConfig, StaticObjectConfig, TrafficLightConfig,
    DEFAULT_SPAWN_ATTEMPTS,
};
#[allow(unused_imports)]
pub use dynamics::{Action, Car, CarModel, ModelState, Pedestrian, CAR_LENGTH, CAR_WIDTH};
#[allow(unused_imports)]
pub use error::SimError;
#[allow(unused_imports)]
pub use geometry::Footprint;
#[allow(unused_imports)]
pub use scene::{CollisionReport, DynamicCollision, SceneState, StaticCollision};
#[allow(unused_imports)]
pub use statics::{Lane, StaticKind, StaticObject, StaticWorld};
#[allow(unused_imports)]
pub use traffic_light::{LightPhase, TrafficLight, LIGHT_CYCLE_TICKS};
#[allow(unused_imports)]
pub use types::{Category, Destination, ObjectRef};
