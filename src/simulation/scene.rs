//! Scene state: object ownership, tick advancement, collision queries
//!
//! `SceneState` owns the static world registry and all dynamic object
//! tables. All mutation happens inside `step` (and the spawn/reset paths);
//! every query reads the current snapshot directly, so repeated queries
//! between steps return identical results.

use std::collections::HashMap;

use log::debug;
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::config::ScenarioConfig;
use super::dynamics::{Action, Car, Pedestrian};
use super::error::SimError;
use super::geometry::Footprint;
use super::spawner;
use super::statics::{StaticKind, StaticWorld};
use super::traffic_light::TrafficLight;
use super::types::{Category, ObjectRef};

/// Collision class of a dynamic object, used for category-level
/// suppression of pairwise checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DynamicKind {
    Car,
    Pedestrian,
    TrafficLight,
}

/// Whether two dynamic objects need a pairwise check at all. Traffic
/// lights are non-physical markers and never collide.
fn can_collide_dynamic(a: DynamicKind, b: DynamicKind) -> bool {
    !matches!(a, DynamicKind::TrafficLight) && !matches!(b, DynamicKind::TrafficLight)
}

/// Whether a dynamic object of the given class can collide with a static
/// feature. Cars live on lanes and streets; pedestrians additionally walk
/// on sidewalks.
fn can_collide_static(kind: DynamicKind, feature: StaticKind) -> bool {
    match kind {
        DynamicKind::Car => matches!(feature, StaticKind::Terrain | StaticKind::Sidewalk),
        DynamicKind::Pedestrian => matches!(feature, StaticKind::Terrain),
        DynamicKind::TrafficLight => false,
    }
}

/// One dynamic-vs-static collision: the dynamic object and the index of
/// the static feature it overlaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticCollision {
    pub dynamic_index: usize,
    pub static_index: usize,
    pub category: Category,
}

/// One dynamic-vs-dynamic collision. Pairs are reported once per
/// direction: an overlap between objects i and j appears both as (i, j)
/// and as (j, i). Downstream consumers rely on the doubled count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DynamicCollision {
    pub index_a: usize,
    pub index_b: usize,
    pub category_a: Category,
    pub category_b: Category,
}

/// All collisions in the current snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CollisionReport {
    /// Every dynamic-vs-dynamic collision, both directions.
    pub dynamic: Vec<DynamicCollision>,
    /// Every dynamic-vs-static collision.
    pub statics: Vec<StaticCollision>,
    /// Subset of `dynamic` whose first participant is a controlled car.
    pub controlled: Vec<DynamicCollision>,
}

/// The aggregate scene: static world plus all dynamic object tables.
pub struct SceneState {
    pub(crate) config: ScenarioConfig,
    pub(crate) statics: StaticWorld,
    pub(crate) controlled_cars: Vec<Car>,
    pub(crate) background_cars: Vec<Car>,
    pub(crate) pedestrians: Vec<Pedestrian>,
    pub(crate) traffic_lights: Vec<TrafficLight>,
    pub(crate) rng: StdRng,
    seed: u64,
    time: u64,
}

impl SceneState {
    /// Build a scene from a validated config and populate it via the
    /// spawner. Placement is fully reproducible for a given seed.
    pub fn from_config(config: ScenarioConfig, seed: u64) -> Result<Self, SimError> {
        let mut scene = Self::empty(config, seed)?;
        spawner::populate(&mut scene)?;
        Ok(scene)
    }

    /// Build a scene with the static world in place but no dynamic
    /// objects. Callers insert objects explicitly (used by tests and by
    /// hosts that drive their own placement).
    pub fn empty(config: ScenarioConfig, seed: u64) -> Result<Self, SimError> {
        config.validate()?;
        let statics = StaticWorld::from_config(&config);
        Ok(Self {
            config,
            statics,
            controlled_cars: Vec::new(),
            background_cars: Vec::new(),
            pedestrians: Vec::new(),
            traffic_lights: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            seed,
            time: 0,
        })
    }

    /// Rebuild the scene from its current config: fresh registry, fresh
    /// dynamic tables, RNG re-derived from the stored seed.
    pub fn reset(&mut self) -> Result<(), SimError> {
        let config = self.config.clone();
        self.reset_with(config)
    }

    /// Rebuild the scene from a new config.
    pub fn reset_with(&mut self, config: ScenarioConfig) -> Result<(), SimError> {
        config.validate()?;
        self.statics = StaticWorld::from_config(&config);
        self.config = config;
        self.controlled_cars.clear();
        self.background_cars.clear();
        self.pedestrians.clear();
        self.traffic_lights.clear();
        self.rng = StdRng::seed_from_u64(self.seed);
        self.time = 0;
        spawner::populate(self)
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    pub fn statics(&self) -> &StaticWorld {
        &self.statics
    }

    pub fn controlled_cars(&self) -> &[Car] {
        &self.controlled_cars
    }

    pub fn background_cars(&self) -> &[Car] {
        &self.background_cars
    }

    pub fn pedestrians(&self) -> &[Pedestrian] {
        &self.pedestrians
    }

    pub fn traffic_lights(&self) -> &[TrafficLight] {
        &self.traffic_lights
    }

    /// Ticks elapsed since the last populate/reset.
    pub fn time(&self) -> u64 {
        self.time
    }

    pub fn category_len(&self, category: Category) -> usize {
        match category {
            Category::ControlledCars => self.controlled_cars.len(),
            Category::BackgroundCars => self.background_cars.len(),
            Category::Pedestrians => self.pedestrians.len(),
            Category::TrafficLights => self.traffic_lights.len(),
        }
    }

    /// Insert under the next sequential index of the category table.
    pub fn insert_controlled_car(&mut self, car: Car) -> ObjectRef {
        self.controlled_cars.push(car);
        ObjectRef::new(Category::ControlledCars, self.controlled_cars.len() - 1)
    }

    pub fn insert_background_car(&mut self, car: Car) -> ObjectRef {
        self.background_cars.push(car);
        ObjectRef::new(Category::BackgroundCars, self.background_cars.len() - 1)
    }

    pub fn insert_pedestrian(&mut self, ped: Pedestrian) -> ObjectRef {
        self.pedestrians.push(ped);
        ObjectRef::new(Category::Pedestrians, self.pedestrians.len() - 1)
    }

    pub fn insert_traffic_light(&mut self, light: TrafficLight) -> ObjectRef {
        self.traffic_lights.push(light);
        ObjectRef::new(Category::TrafficLights, self.traffic_lights.len() - 1)
    }

    /// Snapshot of every dynamic object's collision class and footprint,
    /// in fixed category order then index order. Collision queries and
    /// the spawner both iterate this.
    pub(crate) fn dynamic_entries(&self) -> Vec<(ObjectRef, DynamicKind, Footprint)> {
        let mut entries = Vec::with_capacity(
            self.controlled_cars.len()
                + self.background_cars.len()
                + self.pedestrians.len()
                + self.traffic_lights.len(),
        );
        for (i, car) in self.controlled_cars.iter().enumerate() {
            entries.push((
                ObjectRef::new(Category::ControlledCars, i),
                DynamicKind::Car,
                car.footprint(),
            ));
        }
        for (i, car) in self.background_cars.iter().enumerate() {
            entries.push((
                ObjectRef::new(Category::BackgroundCars, i),
                DynamicKind::Car,
                car.footprint(),
            ));
        }
        for (i, ped) in self.pedestrians.iter().enumerate() {
            entries.push((
                ObjectRef::new(Category::Pedestrians, i),
                DynamicKind::Pedestrian,
                ped.footprint(),
            ));
        }
        for (i, light) in self.traffic_lights.iter().enumerate() {
            entries.push((
                ObjectRef::new(Category::TrafficLights, i),
                DynamicKind::TrafficLight,
                light.footprint(),
            ));
        }
        entries
    }

    /// Whether a candidate footprint of the given class overlaps anything
    /// already in the scene. Used by the spawner's rejection sampling.
    pub(crate) fn is_in_collision(&self, kind: DynamicKind, footprint: &Footprint) -> bool {
        for feature in &self.statics.objects {
            if can_collide_static(kind, feature.kind) && footprint.collides(&feature.footprint) {
                return true;
            }
        }
        for (_, other_kind, other_fp) in self.dynamic_entries() {
            if can_collide_dynamic(kind, other_kind) && footprint.collides(&other_fp) {
                return true;
            }
        }
        false
    }

    /// Compute every collision in the current snapshot.
    ///
    /// Dynamic pairs come from an all-pairs double loop with a
    /// self-exclusion guard; the symmetric pair is *not* deduplicated, so
    /// each overlap appears once per direction. The controlled list keys
    /// on the outer participant: a controlled/background overlap appears
    /// once there, a controlled/controlled overlap twice.
    pub fn get_collisions(&self) -> CollisionReport {
        let entries = self.dynamic_entries();
        let mut report = CollisionReport::default();

        for (obj, kind, fp) in &entries {
            for (j, feature) in self.statics.objects.iter().enumerate() {
                if can_collide_static(*kind, feature.kind) && fp.collides(&feature.footprint) {
                    report.statics.push(StaticCollision {
                        dynamic_index: obj.index,
                        static_index: j,
                        category: obj.category,
                    });
                }
            }

            for (other, other_kind, other_fp) in &entries {
                let is_self = obj.index == other.index && obj.category == other.category;
                if is_self {
                    continue;
                }
                if can_collide_dynamic(*kind, *other_kind) && fp.collides(other_fp) {
                    let pair = DynamicCollision {
                        index_a: obj.index,
                        index_b: other.index,
                        category_a: obj.category,
                        category_b: other.category,
                    };
                    report.dynamic.push(pair);
                    if obj.category == Category::ControlledCars {
                        report.controlled.push(pair);
                    }
                }
            }
        }
        report
    }

    /// Whether the named object currently intersects any other object,
    /// dynamic or static. An unknown object collides with nothing.
    pub fn collides_with_any(&self, obj: ObjectRef) -> bool {
        let report = self.get_collisions();
        report.dynamic.iter().any(|c| {
            (c.index_a == obj.index && c.category_a == obj.category)
                || (c.index_b == obj.index && c.category_b == obj.category)
        }) || report
            .statics
            .iter()
            .any(|c| c.dynamic_index == obj.index && c.category == obj.category)
    }

    /// Minimum center distance from the named object to any object it can
    /// collide with. Returns infinity when no collidable object exists
    /// (or the object is unknown); a planning aid, never an error.
    pub fn min_dist_to_collidable(&self, obj: ObjectRef) -> f64 {
        let entries = self.dynamic_entries();
        let Some((_, kind, fp)) = entries
            .iter()
            .find(|(entry, _, _)| *entry == obj)
            .copied()
        else {
            return f64::INFINITY;
        };

        let mut min = OrderedFloat(f64::INFINITY);
        for feature in &self.statics.objects {
            if can_collide_static(kind, feature.kind) {
                min = min.min(OrderedFloat(fp.dist_to(&feature.footprint)));
            }
        }
        for (other, other_kind, other_fp) in &entries {
            if *other == obj {
                continue;
            }
            if can_collide_dynamic(kind, *other_kind) {
                min = min.min(OrderedFloat(fp.dist_to(other_fp)));
            }
        }
        min.into_inner()
    }

    /// Apply one tick: validate the whole action map, then integrate each
    /// targeted object in category/index order, then advance every
    /// traffic light regardless of the map. Entries addressed to lights
    /// are accepted and ignored.
    ///
    /// Validation happens before any mutation, so a failed call leaves
    /// the scene exactly as it was. Objects without an action carry their
    /// state forward unchanged.
    pub fn step(&mut self, actions: &HashMap<ObjectRef, Action>) -> Result<(), SimError> {
        for (&target, action) in actions {
            self.check_action(target, action)?;
        }

        for category in [Category::ControlledCars, Category::BackgroundCars] {
            let cars = match category {
                Category::ControlledCars => &mut self.controlled_cars,
                _ => &mut self.background_cars,
            };
            for (index, car) in cars.iter_mut().enumerate() {
                if let Some(action) = actions.get(&ObjectRef::new(category, index)) {
                    car.apply_action(action);
                }
            }
        }
        for (index, ped) in self.pedestrians.iter_mut().enumerate() {
            if let Some(action) = actions.get(&ObjectRef::new(Category::Pedestrians, index)) {
                ped.apply_action(action);
            }
        }
        for light in &mut self.traffic_lights {
            light.step();
        }

        self.time += 1;
        debug!("scene advanced to tick {}", self.time);
        Ok(())
    }

    fn check_action(&self, target: ObjectRef, action: &Action) -> Result<(), SimError> {
        if target.index >= self.category_len(target.category) {
            return Err(SimError::action(target, "unknown object id"));
        }
        match target.category {
            Category::ControlledCars => self.controlled_cars[target.index]
                .check_action(action)
                .map_err(|reason| SimError::action(target, reason)),
            Category::BackgroundCars => self.background_cars[target.index]
                .check_action(action)
                .map_err(|reason| SimError::action(target, reason)),
            Category::Pedestrians => self.pedestrians[target.index]
                .check_action(action)
                .map_err(|reason| SimError::action(target, reason)),
            // Lights take no input; an addressed entry is tolerated so a
            // host can supply a uniform action map. The timer advances in
            // the unconditional light loop either way.
            Category::TrafficLights => Ok(()),
        }
    }

    /// Print a summary of the scene state.
    pub fn print_summary(&self) {
        println!("=== Scene Summary ===");
        println!("Tick: {}", self.time);
        println!(
            "Static features: {}, start lanes: {}",
            self.statics.object_count(),
            self.statics.car_start_lanes.len()
        );
        for category in Category::ALL {
            println!("{}: {}", category, self.category_len(category));
        }
        for (i, car) in self.controlled_cars.iter().enumerate() {
            let (x, y) = car.state().position();
            println!(
                "  controlled car {}: pos=({:.1}, {:.1}), heading={:.2}, speed={:.1}",
                i,
                x,
                y,
                car.state().angle(),
                car.state().speed()
            );
        }
        for (i, light) in self.traffic_lights.iter().enumerate() {
            println!(
                "  traffic light {}: phase={:?}, timer={}",
                i,
                light.phase(),
                light.timer()
            );
        }
        let report = self.get_collisions();
        println!(
            "Collisions: {} dynamic, {} static, {} controlled",
            report.dynamic.len(),
            report.statics.len(),
            report.controlled.len()
        );
    }
}
