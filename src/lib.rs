//! Urban driving scene simulation library
//!
//! A deterministic multi-agent traffic scene engine: static world features,
//! dynamic actors, cross-category collision detection, and traffic-light
//! timing. Rendering, planning, and learning layers consume this core from
//! the outside.

pub mod simulation;
