//! Session state machine, score and high score

use serde::{Deserialize, Serialize};

use crate::consts::READY_DURATION;
use crate::error::{SimError, SimResult};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// "READY?" countdown, gameplay suspended
    Ready,
    /// Active gameplay
    Playing,
    /// Player was caught
    GameOver,
}

impl GamePhase {
    fn can_enter(self, to: GamePhase) -> bool {
        use GamePhase::*;
        matches!(
            (self, to),
            (Ready, Playing) | (Ready, GameOver) | (Playing, GameOver) | (GameOver, GameOver)
        )
    }
}

/// Session-level state: phase, score, high score and the ready countdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    phase: GamePhase,
    current_score: u32,
    high_score: u32,
    /// Seconds left in the Ready countdown
    state_timer: f32,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self {
            phase: GamePhase::Ready,
            current_score: 0,
            high_score: 0,
            state_timer: READY_DURATION,
        }
    }

    /// Back to the Ready countdown with a zero score
    pub fn reset(&mut self, keep_high_score: bool) {
        self.phase = GamePhase::Ready;
        self.current_score = 0;
        if !keep_high_score {
            self.high_score = 0;
        }
        self.state_timer = READY_DURATION;
    }

    /// Advance the Ready countdown. Returns true on the frame play begins.
    pub fn update(&mut self, dt: f32) -> SimResult<bool> {
        if self.phase != GamePhase::Ready {
            return Ok(false);
        }
        self.state_timer -= dt;
        if self.state_timer <= 0.0 {
            self.state_timer = 0.0;
            self.set_phase(GamePhase::Playing)?;
            return Ok(true);
        }
        Ok(false)
    }

    fn set_phase(&mut self, to: GamePhase) -> SimResult<()> {
        if !self.phase.can_enter(to) {
            return Err(SimError::transition("game", self.phase, to));
        }
        self.phase = to;
        Ok(())
    }

    /// End the session. Repeating it is a no-op.
    pub fn finish(&mut self) {
        self.phase = GamePhase::GameOver;
    }

    /// The only way the score changes; keeps the high score in step.
    pub fn set_current_score(&mut self, score: u32) {
        self.current_score = score;
        self.high_score = self.high_score.max(score);
    }

    pub fn add_score(&mut self, points: u32) {
        self.set_current_score(self.current_score.saturating_add(points));
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_ready(&self) -> bool {
        self.phase == GamePhase::Ready
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn current_score(&self) -> u32 {
        self.current_score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn state_timer(&self) -> f32 {
        self.state_timer
    }
}
