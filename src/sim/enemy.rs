//! The pursuing enemy: chase AI, panic flight and knockout

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Circle;
use crate::consts::*;
use crate::error::{SimError, SimResult};
use crate::{Direction, circular_distances};

/// Enemy state machine. `Stop` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyState {
    Alive,
    Knockedout,
    Stop,
}

impl EnemyState {
    fn can_enter(self, to: EnemyState) -> bool {
        use EnemyState::*;
        matches!(
            (self, to),
            (Alive, Knockedout) | (Knockedout, Alive) | (Alive, Stop) | (Knockedout, Stop) | (Stop, Stop)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    dir: Direction,
    state: EnemyState,
    /// Seconds of panic left (flee at reduced speed)
    panic_timer: f32,
    /// Seconds of knockout left
    knockout_timer: f32,
    /// Speed jitter sampled each knocked-out frame
    knockout_jitter: f32,
    /// Leg bob phase (render only)
    leg_timer: f32,
}

impl Default for Enemy {
    fn default() -> Self {
        Self::new()
    }
}

impl Enemy {
    pub fn new() -> Self {
        Self {
            pos: Vec2::ZERO,
            dir: Direction::Right,
            state: EnemyState::Alive,
            panic_timer: 0.0,
            knockout_timer: 0.0,
            knockout_jitter: 0.0,
            leg_timer: 0.0,
        }
    }

    /// Back to a fresh, alive enemy at `pos` facing right
    pub fn reset(&mut self, pos: Vec2) {
        *self = Self::new();
        self.pos = pos;
    }

    fn set_state(&mut self, to: EnemyState) -> SimResult<()> {
        if !self.state.can_enter(to) {
            return Err(SimError::transition("enemy", self.state, to));
        }
        self.state = to;
        Ok(())
    }

    /// Stop for good (game over)
    pub fn finish(&mut self) {
        self.state = EnemyState::Stop;
    }

    /// Eaten by a powered-up player. Only an alive enemy can be knocked out.
    pub fn knockout(&mut self) -> SimResult<()> {
        self.set_state(EnemyState::Knockedout)?;
        self.knockout_timer = KNOCKOUT_DURATION;
        Ok(())
    }

    /// Flee from the player for a while
    pub fn start_panic(&mut self) -> SimResult<()> {
        if self.state == EnemyState::Stop {
            return Err(SimError::transition("enemy", self.state, self.state));
        }
        self.panic_timer = PANIC_DURATION;
        Ok(())
    }

    pub fn is_panicking(&self) -> bool {
        self.panic_timer > 0.0
    }

    pub fn is_knocked_out(&self) -> bool {
        self.state == EnemyState::Knockedout
    }

    /// Current travel speed (pixels/sec)
    ///
    /// A knocked out enemy starts fast and eases quadratically to a halt as the
    /// knockout timer drains.
    pub fn speed(&self) -> f32 {
        match self.state {
            EnemyState::Alive if self.is_panicking() => ENEMY_PANIC_SPEED,
            EnemyState::Alive => ENEMY_SPEED,
            EnemyState::Knockedout => {
                (KNOCKOUT_BASE_SPEED + self.knockout_jitter) * self.knockout_timer * self.knockout_timer
            }
            EnemyState::Stop => 0.0,
        }
    }

    /// Pick a direction from the player's position.
    ///
    /// Chases along the shorter way around the track, or flees the other way
    /// while panicking. Equal distances go left when chasing, right when fleeing.
    pub fn run_ai(&mut self, player_x: f32, stage_width: f32) {
        if self.state != EnemyState::Alive {
            return;
        }
        let (dist_r, dist_l) = circular_distances(self.pos.x, player_x, stage_width);
        let chase = if dist_l <= dist_r {
            Direction::Left
        } else {
            Direction::Right
        };
        self.dir = if self.is_panicking() { chase.flipped() } else { chase };
    }

    /// Advance movement and timers by `dt`
    pub fn update<R: Rng>(&mut self, dt: f32, rng: &mut R) -> SimResult<()> {
        match self.state {
            EnemyState::Alive => {
                self.pos.x += self.dir.sign() * self.speed() * dt;
            }
            EnemyState::Knockedout => {
                self.knockout_jitter = rng.random_range(-KNOCKOUT_JITTER..KNOCKOUT_JITTER) as f32;
                self.pos.x += self.dir.sign() * self.speed() * dt;
                self.knockout_timer -= dt;
                if self.knockout_timer <= 0.0 {
                    self.knockout_timer = 0.0;
                    self.set_state(EnemyState::Alive)?;
                }
            }
            EnemyState::Stop => {}
        }

        if self.panic_timer > 0.0 {
            self.panic_timer = (self.panic_timer - dt).max(0.0);
        }

        self.leg_timer += dt;
        Ok(())
    }

    pub fn hit_radius(&self) -> f32 {
        ENEMY_HIT_RADIUS
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.pos, self.hit_radius())
    }

    /// Points for knocking the enemy out
    pub fn score(&self) -> u32 {
        SCORE_KNOCKOUT
    }

    pub fn state(&self) -> EnemyState {
        self.state
    }

    pub fn direction(&self) -> Direction {
        self.dir
    }

    pub fn panic_timer(&self) -> f32 {
        self.panic_timer
    }

    pub fn knockout_timer(&self) -> f32 {
        self.knockout_timer
    }

    pub fn leg_timer(&self) -> f32 {
        self.leg_timer
    }
}
