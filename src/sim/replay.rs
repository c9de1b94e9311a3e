//! Deterministic replay with input recording and final-state verification.
//!
//! A session is fully determined by its stage, its seed and the sequence of
//! `(dt, input)` frames fed to it. The [`ReplayRecorder`] captures those from a
//! freshly created session; [`replay`] rebuilds the session from the log and
//! checks it ends in the recorded state.
//!
//! ```
//! use dot_eater::StagePreset;
//! use dot_eater::sim::{ReplayRecorder, Session, TickInput, replay};
//!
//! let mut session = Session::new(StagePreset::Small.config(), 7).unwrap();
//! let mut recorder = ReplayRecorder::new(&session).unwrap();
//! for _ in 0..240 {
//!     recorder.tick(&mut session, &TickInput::default(), 1.0 / 60.0).unwrap();
//! }
//! let log = recorder.finish(&session);
//!
//! let replayed = replay(&log).unwrap();
//! assert_eq!(replayed.game.current_score(), session.game.current_score());
//! ```

use serde::{Deserialize, Serialize};

use super::game::GamePhase;
use super::tick::{Session, SimEvent, TickInput};
use crate::error::{SimError, SimResult};
use crate::settings::StageConfig;

/// One recorded frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayFrame {
    pub dt: f32,
    pub input: TickInput,
}

/// Summary of a session's state used to detect divergence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateChecksum {
    pub frame: u64,
    pub phase: GamePhase,
    pub score: u32,
    pub high_score: u32,
    pub player_x: f32,
    pub enemy_x: f32,
    pub active_dots: usize,
    pub power_dot: Option<usize>,
}

impl StateChecksum {
    pub fn of(session: &Session) -> Self {
        Self {
            frame: session.frame(),
            phase: session.game.phase(),
            score: session.game.current_score(),
            high_score: session.game.high_score(),
            player_x: session.player.pos.x,
            enemy_x: session.enemy.pos.x,
            active_dots: session.dots.active_count(),
            power_dot: session.dots.power_index(),
        }
    }
}

/// A complete replay: how to build the session plus every frame fed to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayLog {
    pub config: StageConfig,
    pub seed: u64,
    pub keep_high_score: bool,
    pub frames: Vec<ReplayFrame>,
    /// State after the last frame, if the recording was finished
    pub final_state: Option<StateChecksum>,
}

impl ReplayLog {
    pub fn to_json(&self) -> SimResult<String> {
        serde_json::to_string(self).map_err(|e| SimError::Replay(e.to_string()))
    }

    pub fn from_json(json: &str) -> SimResult<Self> {
        serde_json::from_str(json).map_err(|e| SimError::Replay(e.to_string()))
    }
}

/// Records frames as they are fed to a session
#[derive(Debug, Clone)]
pub struct ReplayRecorder {
    log: ReplayLog,
}

impl ReplayRecorder {
    /// Start recording. The session must not have been ticked yet.
    pub fn new(session: &Session) -> SimResult<Self> {
        if session.frame() != 0 {
            return Err(SimError::Replay(format!(
                "recording must start on a fresh session (at frame {})",
                session.frame()
            )));
        }
        Ok(Self {
            log: ReplayLog {
                config: session.config(),
                seed: session.seed(),
                keep_high_score: session.keep_high_score(),
                frames: Vec::new(),
                final_state: None,
            },
        })
    }

    pub fn record(&mut self, dt: f32, input: &TickInput) {
        self.log.frames.push(ReplayFrame {
            dt,
            input: input.clone(),
        });
    }

    /// Record a frame and tick the session with it
    pub fn tick(&mut self, session: &mut Session, input: &TickInput, dt: f32) -> SimResult<Vec<SimEvent>> {
        self.record(dt, input);
        session.tick(input, dt)
    }

    pub fn frame_count(&self) -> usize {
        self.log.frames.len()
    }

    /// Close the recording with the session's final state
    pub fn finish(mut self, session: &Session) -> ReplayLog {
        self.log.final_state = Some(StateChecksum::of(session));
        log::info!("Replay recorded: {} frames", self.frame_count());
        self.log
    }
}

/// Rebuild a session from a log, feed it every frame and verify the end state
pub fn replay(log: &ReplayLog) -> SimResult<Session> {
    let mut session = Session::new(log.config, log.seed)?;
    session.set_keep_high_score(log.keep_high_score);

    for frame in &log.frames {
        session.tick(&frame.input, frame.dt)?;
    }

    if let Some(expected) = &log.final_state {
        let actual = StateChecksum::of(&session);
        if &actual != expected {
            return Err(SimError::Replay(format!(
                "diverged: expected {:?}, got {:?}",
                expected, actual
            )));
        }
    }
    Ok(session)
}
