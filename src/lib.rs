//! Bullet Storm - simulation core of a bullet-hell combat loop
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (bullet pool, attack strategies, SAT collision, waves)
//! - `color`: RGBA colors carried by bullets, enemies and bonuses
//! - `settings`: Data-driven tuning loaded from JSON
//! - `error`: Load errors for level and settings files

pub mod color;
pub mod error;
pub mod settings;
pub mod sim;

pub use color::Color;
pub use error::LoadError;
pub use settings::{PlacementRules, SimSettings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation timestep used by the headless runner (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Arena rectangle (centered in a 1920x1080 frame)
    pub const ARENA_LEFT: f32 = 310.0;
    pub const ARENA_TOP: f32 = 165.0;
    pub const ARENA_WIDTH: f32 = 1300.0;
    pub const ARENA_HEIGHT: f32 = 750.0;

    /// Hard ceiling on concurrently constructed bullets
    pub const MAX_BULLETS: usize = 6000;
    /// Bullets expire this far inside the arena edge
    pub const BULLET_EXPIRY_MARGIN: f32 = -20.0;
    /// Bullet triangle footprint
    pub const BULLET_LENGTH: f32 = 20.0;
    pub const BULLET_WIDTH: f32 = 12.0;

    /// Player defaults
    pub const PLAYER_SPEED: f32 = 600.0;
    pub const PLAYER_SIZE: f32 = 20.0;
    pub const PLAYER_HEALTH: i32 = 8;
    /// Primary weapon cadence and muzzle speed
    pub const PRIMARY_FIRE_INTERVAL: f32 = 0.2;
    pub const PRIMARY_BULLET_SPEED: f32 = 900.0;

    /// Enemy defaults
    pub const ENEMY_HEALTH: i32 = 5;
    pub const ENEMY_RADIUS: f32 = 30.0;
    pub const HIT_ANIMATION_DURATION: f32 = 1.0;
    pub const HIT_MAX_SCALE: f32 = 1.5;

    /// Bonus defaults
    pub const BONUS_RADIUS: f32 = 30.0;
    pub const BONUS_LIFETIME: f32 = 10.0;

    /// Octagon footprint used by enemies and bonuses
    pub const OCTAGON_SIDES: usize = 8;
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(std::f32::consts::TAU);
    // rem_euclid can round up to TAU for tiny negative inputs
    if wrapped >= std::f32::consts::TAU {
        0.0
    } else {
        wrapped
    }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Unit vector pointing from `from` toward `to` (zero when the points coincide)
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}
