//! Polybounce - balls bouncing around inside an arbitrary polygon
//!
//! Core modules:
//! - `sim`: Physics and collision resolution (geometry, boundary, blocks, ball pairs, tick)
//! - `scheduler`: Paused/Running state machine driven by an external frame signal
//! - `platform`: Frame driver abstraction (who calls us back every frame)
//! - `scene`: Default scene initializer
//! - `audio`: Collision sound cues
//! - `tuning` / `settings`: Data-driven physics constants and JSON settings

pub mod audio;
pub mod platform;
pub mod scene;
pub mod scheduler;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use scheduler::{CollisionListener, Renderer, Scheduler, SimPhase};
pub use settings::Settings;
pub use tuning::PhysicsTuning;

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Playfield dimensions (pixels)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    /// Nominal ball speed (pixels per tick) that ball-ball collisions renormalize to
    pub const BALL_SPEED: f32 = 4.0;
    pub const BALL_COUNT: usize = 3;

    /// Corner hits scale speed by a factor drawn from this range
    pub const CORNER_FACTOR_MIN: f32 = 0.7;
    pub const CORNER_FACTOR_MAX: f32 = 1.3;

    /// Max angular deviation applied after a reflection (radians, ~15 degrees)
    pub const ANGLE_JITTER: f32 = std::f32::consts::PI / 12.0;
    /// Perturbed boundary reflections must stay at least this far from the incident direction
    pub const INCIDENT_GUARD: f32 = std::f32::consts::FRAC_PI_2;

    /// Block grid defaults
    pub const BLOCK_WIDTH: f32 = 40.0;
    pub const BLOCK_HEIGHT: f32 = 14.0;
    pub const BLOCK_ROWS: u32 = 6;
    pub const BLOCK_COLS: u32 = 14;
    pub const BLOCK_SPACING_X: f32 = 50.0;
    pub const BLOCK_SPACING_Y: f32 = 22.0;
    pub const BLOCK_OFFSET_X: f32 = 50.0;
    pub const BLOCK_OFFSET_Y: f32 = 60.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Rotate a vector by `angle` radians, keeping its length
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

/// Angle of a vector in radians
#[inline]
pub fn heading(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}
