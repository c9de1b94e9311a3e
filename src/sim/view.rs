//! Read-only frame snapshot for the renderer and HUD
//!
//! Nothing in here feeds back into the simulation.

use glam::Vec2;
use serde::Serialize;

use super::enemy::EnemyState;
use super::game::GamePhase;
use super::player::PlayerState;
use super::tick::Session;
use crate::Direction;
use crate::consts::*;

/// Power-up starts blinking when this much time is left
const POWERUP_BLINK_START: f32 = 1.0;
const POWERUP_BLINK_PERIOD: f32 = 0.05;
const READY_BLINK_PERIOD: f32 = 0.1;
const LEG_AMPLITUDE: f32 = 2.0;
/// Leg bob angular speed (660 degrees per second)
const LEG_CYCLE: f32 = 660.0 * std::f32::consts::PI / 180.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub facing: Direction,
    pub state: PlayerState,
    pub draw_radius: f32,
    /// Opacity (fades out with the caught animation)
    pub alpha: f32,
    pub mouth_open: bool,
    /// Draw in the powered-up colour this frame (blinks near the end)
    pub powered_tint: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnemyView {
    pub pos: Vec2,
    pub facing: Direction,
    pub state: EnemyState,
    /// Knocked out enemies are drawn as eyes only
    pub body_visible: bool,
    pub panic_tint: bool,
    /// Vertical leg offset
    pub leg_offset: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DotView {
    pub pos: Vec2,
    pub radius: f32,
    pub power: bool,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudView {
    pub score: u32,
    pub high_score: u32,
    pub phase: GamePhase,
    /// "READY?" is drawn on even blink periods of the countdown
    pub ready_visible: bool,
    /// High score right-aligned in a 10 character field
    pub high_score_text: String,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameView {
    pub frame: u64,
    pub stage_width: f32,
    pub stage_height: f32,
    pub lane_y: f32,
    pub player: PlayerView,
    pub enemy: EnemyView,
    pub dots: Vec<DotView>,
    pub hud: HudView,
}

impl FrameView {
    pub fn from_session(session: &Session) -> Self {
        let player = &session.player;
        let enemy = &session.enemy;
        let game = &session.game;

        let powered = player.is_powered_up();
        let mut draw_radius = if powered {
            PLAYER_DRAW_RADIUS * POWERUP_RADIUS_SCALE
        } else {
            PLAYER_DRAW_RADIUS
        };
        let alpha = if player.is_failed() {
            draw_radius *= player.failed_scale();
            player.failed_scale()
        } else {
            1.0
        };
        let powered_tint = !player.is_failed()
            && powered
            && (player.powerup_timer() > POWERUP_BLINK_START
                || blink_phase_even(player.powerup_timer(), POWERUP_BLINK_PERIOD));

        let ready_visible = game.is_ready() && blink_phase_even(game.state_timer(), READY_BLINK_PERIOD);

        Self {
            frame: session.frame(),
            stage_width: session.stage.width,
            stage_height: session.stage.height,
            lane_y: session.stage.offset_y,
            player: PlayerView {
                pos: player.pos,
                facing: player.direction(),
                state: player.state(),
                draw_radius,
                alpha,
                mouth_open: player.mouth_open(),
                powered_tint,
            },
            enemy: EnemyView {
                pos: enemy.pos,
                facing: enemy.direction(),
                state: enemy.state(),
                body_visible: !enemy.is_knocked_out(),
                panic_tint: enemy.is_panicking(),
                leg_offset: LEG_AMPLITUDE * (LEG_CYCLE * enemy.leg_timer()).cos(),
            },
            dots: session
                .dots
                .iter()
                .map(|dot| DotView {
                    pos: dot.pos,
                    radius: dot.radius(),
                    power: dot.is_power(),
                    active: dot.is_active(),
                })
                .collect(),
            hud: HudView {
                score: game.current_score(),
                high_score: game.high_score(),
                phase: game.phase(),
                ready_visible,
                high_score_text: format!("{:>10}", game.high_score()),
            },
        }
    }
}

/// True when `timer` sits in an even-numbered `period` slice
fn blink_phase_even(timer: f32, period: f32) -> bool {
    ((timer / period).floor() as i64) % 2 == 0
}
