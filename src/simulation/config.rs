//! Scene layout configuration
//!
//! A `ScenarioConfig` is the externally supplied descriptor for one scene:
//! per-category counts, the kinematic model cars use, the catalog of
//! static features, start lanes, goal poses, and traffic lights. It is
//! loaded once (from JSON or built programmatically), validated, and read
//! only afterwards.

use serde::{Deserialize, Serialize};

use super::dynamics::CarModel;
use super::error::SimError;
use super::statics::StaticKind;

/// Default bound on rejection-sampling attempts per spawned object.
pub const DEFAULT_SPAWN_ATTEMPTS: u32 = 1000;

fn default_spawn_attempts() -> u32 {
    DEFAULT_SPAWN_ATTEMPTS
}

fn default_dimensions() -> (f64, f64) {
    (1000.0, 1000.0)
}

fn default_init_color() -> String {
    "red".to_string()
}

/// One static world feature, tagged by kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticObjectConfig {
    #[serde(rename = "type")]
    pub kind: StaticKind,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub angle: f64,
    pub xdim: f64,
    pub ydim: f64,
}

/// A start lane: footprint geometry that doubles as a spawn region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaneConfig {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub angle: f64,
    pub xdim: f64,
    pub ydim: f64,
}

/// One goal pose in the destination catalog. Heading is given in degrees
/// and converted to radians when assigned to a car.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalConfig {
    pub x: f64,
    pub y: f64,
    pub vel: f64,
    pub angle_deg: f64,
}

/// One traffic light placement. `init_color` lets lights start mid-cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficLightConfig {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub angle: f64,
    #[serde(default = "default_init_color")]
    pub init_color: String,
}

/// Per-category object counts and control flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentCounts {
    pub controlled_cars: usize,
    pub background_cars: usize,
    #[serde(default)]
    pub pedestrians: usize,
    #[serde(default)]
    pub use_traffic_lights: bool,
}

/// Complete scene layout descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub agents: AgentCounts,
    pub car_model: CarModel,
    #[serde(default = "default_dimensions")]
    pub dimensions: (f64, f64),
    pub static_objects: Vec<StaticObjectConfig>,
    pub car_start_lanes: Vec<LaneConfig>,
    #[serde(default)]
    pub ped_start_lanes: Vec<LaneConfig>,
    pub goal_states: Vec<GoalConfig>,
    #[serde(default)]
    pub traffic_lights: Vec<TrafficLightConfig>,
    #[serde(default = "default_spawn_attempts")]
    pub max_spawn_attempts: u32,
}

impl ScenarioConfig {
    /// Parse a scenario from a JSON document and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        let config: ScenarioConfig = serde_json::from_str(json)
            .map_err(|e| SimError::config(format!("failed to parse scenario JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field consistency. Called by the loaders and by
    /// `SceneState::from_config` for programmatically built configs.
    pub fn validate(&self) -> Result<(), SimError> {
        let total_cars = self.agents.controlled_cars + self.agents.background_cars;
        if total_cars > 0 && self.car_start_lanes.is_empty() {
            return Err(SimError::config(
                "cars requested but no car start lanes declared",
            ));
        }
        if total_cars > 0 && self.goal_states.is_empty() {
            return Err(SimError::config(
                "cars requested but the goal state catalog is empty",
            ));
        }
        if self.agents.pedestrians > 0 && self.ped_start_lanes.is_empty() {
            return Err(SimError::config(
                "pedestrians requested but no pedestrian start lanes declared",
            ));
        }
        if self.agents.use_traffic_lights && self.traffic_lights.is_empty() {
            return Err(SimError::config(
                "use_traffic_lights is set but no traffic lights declared",
            ));
        }
        if self.max_spawn_attempts == 0 {
            return Err(SimError::config("max_spawn_attempts must be at least 1"));
        }
        for light in &self.traffic_lights {
            if !matches!(light.init_color.as_str(), "red" | "green" | "yellow") {
                return Err(SimError::config(format!(
                    "unknown traffic light init_color \"{}\"",
                    light.init_color
                )));
            }
        }
        Ok(())
    }

    /// Built-in four-way intersection layout on a 1000x1000 field.
    ///
    /// Two 200-wide streets cross at the center, with terrain blocks in
    /// the corners, sidewalk strips along the street edges, one inbound
    /// start lane per approach, one goal pose per exit, and four traffic
    /// lights (east-west green, north-south red).
    pub fn four_way_intersection(
        controlled_cars: usize,
        background_cars: usize,
        pedestrians: usize,
        use_traffic_lights: bool,
        car_model: CarModel,
    ) -> Self {
        use std::f64::consts::{FRAC_PI_2, PI};

        // Corner terrain blocks, inset so the sidewalk strips stay clear.
        let terrain = [(180.0, 180.0), (820.0, 180.0), (180.0, 820.0), (820.0, 820.0)]
            .into_iter()
            .map(|(x, y)| StaticObjectConfig {
                kind: StaticKind::Terrain,
                x,
                y,
                angle: 0.0,
                xdim: 360.0,
                ydim: 360.0,
            });

        let streets = [0.0, FRAC_PI_2].into_iter().map(|angle| StaticObjectConfig {
            kind: StaticKind::Street,
            x: 500.0,
            y: 500.0,
            angle,
            xdim: 1000.0,
            ydim: 200.0,
        });

        // Inbound half-lanes, right-hand traffic: (center, heading).
        let lane_geometry = [
            ((200.0, 550.0), 0.0),       // from the west, heading east
            ((800.0, 450.0), PI),        // from the east, heading west
            ((550.0, 200.0), FRAC_PI_2), // from the south, heading north
            ((450.0, 800.0), -FRAC_PI_2), // from the north, heading south
        ];
        let lanes: Vec<LaneConfig> = lane_geometry
            .into_iter()
            .map(|((x, y), angle)| LaneConfig {
                x,
                y,
                angle,
                xdim: 400.0,
                ydim: 100.0,
            })
            .collect();

        let lane_features = lanes.iter().map(|lane| StaticObjectConfig {
            kind: StaticKind::Lane,
            x: lane.x,
            y: lane.y,
            angle: lane.angle,
            xdim: lane.xdim,
            ydim: lane.ydim,
        });

        // Sidewalk strips hugging the street edges.
        let sidewalk_geometry = [
            ((180.0, 380.0), 0.0),
            ((820.0, 380.0), 0.0),
            ((180.0, 620.0), 0.0),
            ((820.0, 620.0), 0.0),
            ((380.0, 180.0), FRAC_PI_2),
            ((380.0, 820.0), FRAC_PI_2),
            ((620.0, 180.0), FRAC_PI_2),
            ((620.0, 820.0), FRAC_PI_2),
        ];
        let sidewalks = sidewalk_geometry
            .into_iter()
            .map(|((x, y), angle)| StaticObjectConfig {
                kind: StaticKind::Sidewalk,
                x,
                y,
                angle,
                xdim: 360.0,
                ydim: 40.0,
            });

        let static_objects = terrain
            .chain(streets)
            .chain(lane_features)
            .chain(sidewalks)
            .collect();

        let ped_start_lanes = vec![
            LaneConfig {
                x: 180.0,
                y: 380.0,
                angle: 0.0,
                xdim: 360.0,
                ydim: 40.0,
            },
            LaneConfig {
                x: 820.0,
                y: 620.0,
                angle: PI,
                xdim: 360.0,
                ydim: 40.0,
            },
        ];

        let goal_states = vec![
            GoalConfig {
                x: 950.0,
                y: 450.0,
                vel: 0.0,
                angle_deg: 0.0,
            },
            GoalConfig {
                x: 50.0,
                y: 550.0,
                vel: 0.0,
                angle_deg: 180.0,
            },
            GoalConfig {
                x: 550.0,
                y: 950.0,
                vel: 0.0,
                angle_deg: 90.0,
            },
            GoalConfig {
                x: 450.0,
                y: 50.0,
                vel: 0.0,
                angle_deg: 270.0,
            },
        ];

        let traffic_lights = vec![
            TrafficLightConfig {
                x: 350.0,
                y: 450.0,
                angle: 0.0,
                init_color: "green".to_string(),
            },
            TrafficLightConfig {
                x: 650.0,
                y: 550.0,
                angle: PI,
                init_color: "green".to_string(),
            },
            TrafficLightConfig {
                x: 550.0,
                y: 350.0,
                angle: FRAC_PI_2,
                init_color: "red".to_string(),
            },
            TrafficLightConfig {
                x: 450.0,
                y: 650.0,
                angle: -FRAC_PI_2,
                init_color: "red".to_string(),
            },
        ];

        ScenarioConfig {
            agents: AgentCounts {
                controlled_cars,
                background_cars,
                pedestrians,
                use_traffic_lights,
            },
            car_model,
            dimensions: (1000.0, 1000.0),
            static_objects,
            car_start_lanes: lanes,
            ped_start_lanes,
            goal_states,
            traffic_lights,
            max_spawn_attempts: DEFAULT_SPAWN_ATTEMPTS,
        }
    }
}
