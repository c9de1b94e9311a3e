//! The player-controlled dot eater

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Circle;
use crate::Direction;
use crate::consts::*;
use crate::error::{SimError, SimResult};

/// Player state machine. `Failed` is terminal for the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    Alive,
    Failed,
}

impl PlayerState {
    fn can_enter(self, to: PlayerState) -> bool {
        use PlayerState::*;
        matches!((self, to), (Alive, Failed) | (Failed, Failed))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    dir: Direction,
    state: PlayerState,
    /// Seconds of power-up left
    powerup_timer: f32,
    // Render-only animation state
    mouth_timer: f32,
    mouth_open: bool,
    failed_timer: f32,
    failed_scale: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Self {
            pos: Vec2::ZERO,
            dir: Direction::Right,
            state: PlayerState::Alive,
            powerup_timer: 0.0,
            mouth_timer: 0.0,
            mouth_open: true,
            failed_timer: 0.0,
            failed_scale: 1.0,
        }
    }

    /// Back to a fresh, alive player at `pos` facing right
    pub fn reset(&mut self, pos: Vec2) {
        *self = Self::new();
        self.pos = pos;
    }

    /// Latch the direction from the latest left/right press
    pub fn steer(&mut self, dir: Direction) {
        self.dir = dir;
    }

    fn set_state(&mut self, to: PlayerState) -> SimResult<()> {
        if !self.state.can_enter(to) {
            return Err(SimError::transition("player", self.state, to));
        }
        self.state = to;
        Ok(())
    }

    /// Caught by the enemy. Repeating it is a no-op.
    pub fn finish(&mut self) -> SimResult<()> {
        self.set_state(PlayerState::Failed)
    }

    pub fn start_powerup(&mut self) -> SimResult<()> {
        if self.is_failed() {
            return Err(SimError::transition("player", self.state, self.state));
        }
        self.powerup_timer = POWERUP_DURATION;
        Ok(())
    }

    pub fn is_powered_up(&self) -> bool {
        self.powerup_timer > 0.0
    }

    pub fn is_failed(&self) -> bool {
        self.state == PlayerState::Failed
    }

    pub fn speed(&self) -> f32 {
        if self.is_powered_up() {
            PLAYER_POWERUP_SPEED
        } else {
            PLAYER_SPEED
        }
    }

    /// Collision radius; grows while powered up
    pub fn hit_radius(&self) -> f32 {
        if self.is_powered_up() {
            PLAYER_HIT_RADIUS * POWERUP_RADIUS_SCALE
        } else {
            PLAYER_HIT_RADIUS
        }
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.pos, self.hit_radius())
    }

    /// Advance movement and timers by `dt`
    pub fn update(&mut self, dt: f32) {
        match self.state {
            PlayerState::Alive => {
                self.pos.x += self.dir.sign() * self.speed() * dt;
                if self.powerup_timer > 0.0 {
                    self.powerup_timer = (self.powerup_timer - dt).max(0.0);
                }
                self.mouth_open = self.mouth_timer <= MOUTH_OPEN_TIME;
                self.mouth_timer += dt;
                if self.mouth_timer >= MOUTH_CYCLE_TIME {
                    self.mouth_timer = 0.0;
                }
            }
            PlayerState::Failed => {
                self.failed_scale = (1.0 - self.failed_timer).max(0.0);
                self.failed_timer += dt;
            }
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn direction(&self) -> Direction {
        self.dir
    }

    pub fn powerup_timer(&self) -> f32 {
        self.powerup_timer
    }

    pub fn mouth_open(&self) -> bool {
        self.mouth_open
    }

    /// Shrink factor of the caught animation, 1.0 down to 0.0
    pub fn failed_scale(&self) -> f32 {
        self.failed_scale
    }
}
