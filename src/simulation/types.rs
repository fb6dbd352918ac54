//! Core types shared across the scene engine

use std::fmt;

/// Dynamic object category. Each category is a dense table inside the
/// scene; an object is addressed by `(Category, index)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    ControlledCars,
    BackgroundCars,
    Pedestrians,
    TrafficLights,
}

impl Category {
    /// Fixed iteration order used by spawn and collision loops.
    /// Query results depend on this order staying stable.
    pub const ALL: [Category; 4] = [
        Category::ControlledCars,
        Category::BackgroundCars,
        Category::Pedestrians,
        Category::TrafficLights,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::ControlledCars => "controlled_cars",
            Category::BackgroundCars => "background_cars",
            Category::Pedestrians => "pedestrians",
            Category::TrafficLights => "traffic_lights",
        };
        write!(f, "{}", name)
    }
}

/// Stable handle for one dynamic object: its category plus its dense index
/// within that category. Indices are assigned in spawn order and never
/// reused during a scene's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    pub category: Category,
    pub index: usize,
}

impl ObjectRef {
    pub fn new(category: Category, index: usize) -> Self {
        Self { category, index }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.category, self.index)
    }
}

/// Goal pose assigned to a car at spawn time. Immutable for the car's
/// lifetime; route planning toward it is an external concern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Destination {
    pub x: f64,
    pub y: f64,
    /// Target speed at the goal.
    pub vel: f64,
    /// Target heading in radians (config supplies degrees).
    pub angle: f64,
}
