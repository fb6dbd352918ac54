//! Traffic light timing state machine
//!
//! A fixed-period Moore machine with no external input: the timer advances
//! once per tick, wraps modulo the cycle length, and the phase is a pure
//! function of the wrapped timer. Lights are non-physical markers and
//! never participate in collision checks.

use super::error::SimError;
use super::geometry::Footprint;

/// Full signal cycle length in ticks.
pub const LIGHT_CYCLE_TICKS: u32 = 400;
/// Timer value at which the phase switches from red to green.
const GREEN_START: u32 = 200;
/// Timer value at which the phase switches from green to yellow.
const YELLOW_START: u32 = 350;

/// Light housing footprint, for rendering layers; not collidable.
const LIGHT_XDIM: f64 = 20.0;
const LIGHT_YDIM: f64 = 60.0;

/// Discrete signal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightPhase {
    Red,
    Green,
    Yellow,
}

/// One traffic light with its cyclic timer.
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficLight {
    timer: u32,
    footprint: Footprint,
}

impl TrafficLight {
    /// Create a light mid-cycle from its configured initial color:
    /// red starts the cycle at 0, green at 200, yellow at 350.
    pub fn new(x: f64, y: f64, angle: f64, init_color: &str) -> Result<Self, SimError> {
        let timer = match init_color {
            "red" => 0,
            "green" => GREEN_START,
            "yellow" => YELLOW_START,
            other => {
                return Err(SimError::config(format!(
                    "unknown traffic light init_color \"{}\"",
                    other
                )))
            }
        };
        Ok(Self {
            timer,
            footprint: Footprint::new(x, y, angle, LIGHT_XDIM, LIGHT_YDIM),
        })
    }

    /// Advance the timer by one tick. Lights take no input; `step` exists
    /// for interface uniformity with the other dynamic objects and is
    /// called unconditionally every scene tick.
    pub fn step(&mut self) {
        self.timer = (self.timer + 1) % LIGHT_CYCLE_TICKS;
    }

    pub fn timer(&self) -> u32 {
        self.timer
    }

    /// Phase schedule: red on [0, 200), green on [200, 350), yellow on
    /// [350, 400).
    pub fn phase(&self) -> LightPhase {
        if self.timer < GREEN_START {
            LightPhase::Red
        } else if self.timer < YELLOW_START {
            LightPhase::Green
        } else {
            LightPhase::Yellow
        }
    }

    /// Coarse two-state projection used by planners that only care whether
    /// the approach is passable: yellow counts as imminent red. The
    /// horizon argument is accepted for interface compatibility but not
    /// used; true future-phase prediction is not implemented.
    pub fn future_color(&self, _horizon: u32) -> &'static str {
        match self.phase() {
            LightPhase::Red | LightPhase::Yellow => "red",
            LightPhase::Green => "green",
        }
    }

    pub fn footprint(&self) -> Footprint {
        self.footprint
    }
}
