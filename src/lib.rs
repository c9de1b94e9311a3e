//! Dot Eater - a one-dimensional dot eating arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, AI, collisions, game state)
//! - `settings`: Stage presets and session settings
//! - `error`: Simulation error types

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{SimError, SimResult};
pub use settings::{Settings, StageConfig, StagePreset};

use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Fixed frame timestep used by the headless driver (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Countdown before play starts after a (re)start
    pub const READY_DURATION: f32 = 2.0;

    /// Player defaults
    pub const PLAYER_SPEED: f32 = 360.0;
    pub const PLAYER_POWERUP_SPEED: f32 = PLAYER_SPEED * 1.05;
    pub const PLAYER_HIT_RADIUS: f32 = 40.0;
    pub const PLAYER_DRAW_RADIUS: f32 = 50.0;
    /// Hit and draw radius multiplier while powered up
    pub const POWERUP_RADIUS_SCALE: f32 = 2.5;
    pub const POWERUP_DURATION: f32 = 3.0;
    /// Mouth is open for the first 4 ticks of an 8 tick cycle
    pub const MOUTH_OPEN_TIME: f32 = (1.0 / 60.0) * 4.0;
    pub const MOUTH_CYCLE_TIME: f32 = (1.0 / 60.0) * 8.0;

    /// Enemy defaults
    pub const ENEMY_SPEED: f32 = 440.0;
    pub const ENEMY_PANIC_SPEED: f32 = ENEMY_SPEED * 0.25;
    pub const ENEMY_HIT_RADIUS: f32 = 40.0;
    pub const PANIC_DURATION: f32 = 3.0;
    pub const KNOCKOUT_DURATION: f32 = 1.5;
    /// Base speed of a knocked out enemy before jitter and easing
    pub const KNOCKOUT_BASE_SPEED: f32 = 2000.0;
    /// Knockout jitter is sampled from [-KNOCKOUT_JITTER, KNOCKOUT_JITTER)
    pub const KNOCKOUT_JITTER: i32 = 1000;
    pub const SCORE_KNOCKOUT: u32 = 200;

    /// Dot defaults
    pub const DOT_RADIUS: f32 = 8.0;
    pub const POWER_DOT_RADIUS: f32 = 24.0;
    pub const SCORE_DOT: u32 = 10;
    pub const SCORE_POWER_DOT: u32 = 50;
    /// Offset of the first dot from the left edge
    pub const DOT_START_OFFSET: f32 = 20.0;
    /// Random power dot picks before falling back to a scan
    pub const MAX_POWER_DOT_ATTEMPTS: u32 = 32;
    /// Safety margin applied to the player's hit radius when placing the power dot
    pub const POWER_DOT_CLEARANCE: f32 = 2.0;

    /// Fraction of the stage width between the center and each spawn point
    pub const SPAWN_OFFSET: f32 = 0.333;
}

/// Facing / travel direction along the track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Left,
    #[default]
    Right,
}

impl Direction {
    /// -1.0 for left, +1.0 for right
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Snap a position that left the track back onto it.
///
/// This is a hard snap, not a modulo: anything past `width` lands on 0 and
/// anything below 0 lands on `width`.
#[inline]
pub fn wrap_position(x: f32, width: f32) -> f32 {
    if x > width {
        0.0
    } else if x < 0.0 {
        width
    } else {
        x
    }
}

/// Distances from `from` to `to` travelling right and travelling left on a
/// track of the given width. Both are normalized to be non-negative.
#[inline]
pub fn circular_distances(from: f32, to: f32, width: f32) -> (f32, f32) {
    let mut right = to - from;
    if right < 0.0 {
        right += width;
    }
    let mut left = from - to;
    if left < 0.0 {
        left += width;
    }
    (right, left)
}
