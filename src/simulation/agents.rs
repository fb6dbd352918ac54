//! Agent dispatch boundary
//!
//! The scene does not decide actions; policies do. `AgentDispatch` maps
//! each dynamic object to the agent responsible for it and collects one
//! action per agent before each `step`. Real planners and learned
//! policies live outside this crate; `CruiseAgent` is a demo-grade
//! stand-in used by the headless runner.

use std::collections::HashMap;

use super::dynamics::Action;
use super::scene::SceneState;
use super::types::ObjectRef;

/// A policy responsible for exactly one dynamic object.
pub trait Agent {
    /// The object this agent controls.
    fn target(&self) -> ObjectRef;

    /// Produce the next action from the current scene snapshot, or `None`
    /// to carry the object's state forward unchanged.
    fn act(&mut self, scene: &SceneState) -> Option<Action>;
}

/// Maps dynamic objects to their controlling agents.
#[derive(Default)]
pub struct AgentDispatch {
    agents: Vec<Box<dyn Agent>>,
}

impl AgentDispatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, agent: Box<dyn Agent>) {
        self.agents.push(agent);
    }

    /// Collect one action per registered agent for the next `step` call.
    pub fn collect_actions(&mut self, scene: &SceneState) -> HashMap<ObjectRef, Action> {
        let mut actions = HashMap::new();
        for agent in &mut self.agents {
            if let Some(action) = agent.act(scene) {
                actions.insert(agent.target(), action);
            }
        }
        actions
    }
}

/// Drives a car at a constant target speed, braking to a stop when any
/// collidable object comes within the caution distance.
pub struct CruiseAgent {
    target: ObjectRef,
    speed: f64,
    caution_distance: f64,
}

impl CruiseAgent {
    pub fn new(target: ObjectRef, speed: f64, caution_distance: f64) -> Self {
        Self {
            target,
            speed,
            caution_distance,
        }
    }
}

impl Agent for CruiseAgent {
    fn target(&self) -> ObjectRef {
        self.target
    }

    fn act(&mut self, scene: &SceneState) -> Option<Action> {
        let gap = scene.min_dist_to_collidable(self.target);
        let vel = if gap < self.caution_distance {
            0.0
        } else {
            self.speed
        };
        Some(Action::Velocity { vel })
    }
}
