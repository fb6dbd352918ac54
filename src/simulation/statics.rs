//! Static world registry
//!
//! Immutable-after-load set of world features (terrain, lanes, streets,
//! sidewalks) plus the named start lanes used for spawning. Built once per
//! scene from a `ScenarioConfig`; a scene reset constructs a fresh
//! registry rather than mutating this one, so stale geometry can never
//! alias into a new dynamic object set.

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::{LaneConfig, ScenarioConfig};
use super::dynamics::{Car, CarModel, Pedestrian, CAR_LENGTH, PED_SIZE};
use super::geometry::Footprint;

/// Category tag for a static world feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StaticKind {
    Terrain,
    Lane,
    Street,
    Sidewalk,
}

/// An immutable world feature.
#[derive(Debug, Clone)]
pub struct StaticObject {
    pub kind: StaticKind,
    pub footprint: Footprint,
}

/// A spawn lane: a footprint that doubles as a factory for new dynamic
/// actors placed somewhere along its long axis.
#[derive(Debug, Clone)]
pub struct Lane {
    pub footprint: Footprint,
}

impl Lane {
    fn from_config(config: &LaneConfig) -> Self {
        Self {
            footprint: Footprint::new(config.x, config.y, config.angle, config.xdim, config.ydim),
        }
    }

    /// Sample a position along the lane axis, leaving `margin` clear at
    /// each end so the generated footprint stays inside the lane.
    fn sample_offset(&self, rng: &mut StdRng, margin: f64) -> f64 {
        let half_span = (self.footprint.xdim / 2.0 - margin).max(0.0);
        if half_span == 0.0 {
            return 0.0;
        }
        rng.random_range(-half_span..half_span)
    }

    /// Generate a candidate car at rest on this lane, heading along it.
    /// The caller is responsible for collision-testing the candidate.
    pub fn generate_car(&self, model: CarModel, rng: &mut StdRng) -> Car {
        let offset = self.sample_offset(rng, CAR_LENGTH / 2.0);
        let (sin, cos) = self.footprint.angle.sin_cos();
        Car::new(
            self.footprint.x + offset * cos,
            self.footprint.y + offset * sin,
            self.footprint.angle,
            0.0,
            model,
        )
    }

    /// Generate a candidate pedestrian on this lane.
    pub fn generate_pedestrian(&self, rng: &mut StdRng) -> Pedestrian {
        let offset = self.sample_offset(rng, PED_SIZE / 2.0);
        let (sin, cos) = self.footprint.angle.sin_cos();
        Pedestrian::new(
            self.footprint.x + offset * cos,
            self.footprint.y + offset * sin,
            self.footprint.angle,
            0.0,
        )
    }
}

/// The set of static features for one scene.
#[derive(Debug, Clone)]
pub struct StaticWorld {
    pub objects: Vec<StaticObject>,
    pub car_start_lanes: Vec<Lane>,
    pub ped_start_lanes: Vec<Lane>,
    pub dimensions: (f64, f64),
}

impl StaticWorld {
    /// Build the registry from a validated scene configuration. Unknown
    /// feature tags are rejected earlier, when the config is parsed.
    pub fn from_config(config: &ScenarioConfig) -> Self {
        let objects = config
            .static_objects
            .iter()
            .map(|info| StaticObject {
                kind: info.kind,
                footprint: Footprint::new(info.x, info.y, info.angle, info.xdim, info.ydim),
            })
            .collect();

        let car_start_lanes = config.car_start_lanes.iter().map(Lane::from_config).collect();
        let ped_start_lanes = config.ped_start_lanes.iter().map(Lane::from_config).collect();

        Self {
            objects,
            car_start_lanes,
            ped_start_lanes,
            dimensions: config.dimensions,
        }
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}
