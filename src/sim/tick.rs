//! Per-frame simulation step
//!
//! A [`Session`] owns the stage, the dot batch, the player, the enemy and the
//! game state, and advances them in a fixed order each frame:
//!
//! 1. Ready countdown
//! 2. Enemy AI (reads the player's position before anyone moves)
//! 3. Player and enemy movement
//! 4. Wrap-around correction
//! 5. Player vs dots, then player vs enemy
//! 6. Dot batch respawn once every dot is eaten

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::dot::DotBatch;
use super::enemy::Enemy;
use super::game::Game;
use super::player::Player;
use super::stage::Stage;
use super::view::FrameView;
use crate::Direction;
use crate::consts::SPAWN_OFFSET;
use crate::error::SimResult;
use crate::settings::{Settings, StageConfig};

/// Input commands for a single frame (edge-triggered presses)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Most recent left/right press since the last frame
    pub turn: Option<Direction>,
    /// Restart the session
    pub restart: bool,
}

impl TickInput {
    pub fn turn(dir: Direction) -> Self {
        Self {
            turn: Some(dir),
            ..Default::default()
        }
    }

    pub fn restart() -> Self {
        Self {
            restart: true,
            ..Default::default()
        }
    }
}

/// Something that happened during a frame, in the order it happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// Session was reset by a restart input
    Restarted,
    /// Ready countdown finished
    Playing,
    DotEaten { index: usize, power: bool, score: u32 },
    /// Player powered up and the enemy panicked
    PowerUp,
    EnemyKnockedOut { score: u32 },
    /// Enemy caught the player; the session is over
    PlayerCaught,
    DotsRespawned { power_index: usize },
}

/// One play session: every entity plus the seeded RNG
#[derive(Debug, Clone)]
pub struct Session {
    config: StageConfig,
    seed: u64,
    keep_high_score: bool,
    rng: Pcg32,
    /// Frames ticked since creation
    frame: u64,
    pub game: Game,
    pub stage: Stage,
    pub dots: DotBatch,
    pub player: Player,
    pub enemy: Enemy,
}

impl Session {
    /// Create a session for a stage and lay out its first round
    pub fn new(config: StageConfig, seed: u64) -> SimResult<Self> {
        let stage = Stage::from_config(&config);
        let mut session = Self {
            config,
            seed,
            keep_high_score: true,
            rng: Pcg32::seed_from_u64(seed),
            frame: 0,
            game: Game::new(),
            stage,
            dots: DotBatch::layout(&stage, config.dot_count),
            player: Player::new(),
            enemy: Enemy::new(),
        };
        session.reset_round()?;
        log::info!(
            "Session created: {}x{} stage, {} dots, seed {}",
            stage.width,
            stage.height,
            config.dot_count,
            seed
        );
        Ok(session)
    }

    pub fn from_settings(settings: &Settings) -> SimResult<Self> {
        let mut session = Self::new(settings.preset.config(), settings.resolve_seed())?;
        session.keep_high_score = settings.keep_high_score;
        Ok(session)
    }

    /// Start over: score cleared, entities back at their spawn points, fresh dots.
    /// Only safe between frames.
    pub fn restart(&mut self) -> SimResult<()> {
        self.game.reset(self.keep_high_score);
        self.reset_round()?;
        log::info!("Session restarted (high score {})", self.game.high_score());
        Ok(())
    }

    fn reset_round(&mut self) -> SimResult<()> {
        let lane = self.stage.offset_y;
        let spread = self.stage.width * SPAWN_OFFSET;
        self.player.reset(Vec2::new(self.stage.center_x() - spread, lane));
        self.enemy.reset(Vec2::new(self.stage.center_x() + spread, lane));
        self.respawn_dots()?;
        Ok(())
    }

    fn respawn_dots(&mut self) -> SimResult<usize> {
        let index = self.dots.respawn(&mut self.rng, self.player.circle())?;
        log::info!("Dots respawned, power dot at index {}", index);
        Ok(index)
    }

    /// Advance the session by one frame
    pub fn tick(&mut self, input: &TickInput, dt: f32) -> SimResult<Vec<SimEvent>> {
        let mut events = Vec::new();

        if input.restart {
            self.restart()?;
            events.push(SimEvent::Restarted);
        }

        self.frame += 1;

        if self.game.update(dt)? {
            log::info!("Ready countdown finished, playing");
            events.push(SimEvent::Playing);
        }

        if self.game.is_ready() {
            return Ok(events);
        }

        // AI decides from where the player is before this frame's movement
        self.enemy.run_ai(self.player.pos.x, self.stage.width);

        if let Some(dir) = input.turn {
            self.player.steer(dir);
        }
        self.player.update(dt);
        self.enemy.update(dt, &mut self.rng)?;

        self.player.pos.x = self.stage.wrap(self.player.pos.x);
        self.enemy.pos.x = self.stage.wrap(self.enemy.pos.x);

        if self.game.is_game_over() {
            return Ok(events);
        }

        self.eat_dots(&mut events)?;
        self.check_enemy_contact(&mut events)?;

        if self.dots.all_eaten() {
            let power_index = self.respawn_dots()?;
            events.push(SimEvent::DotsRespawned { power_index });
        }

        Ok(events)
    }

    fn eat_dots(&mut self, events: &mut Vec<SimEvent>) -> SimResult<()> {
        for (index, dot) in self.dots.iter_mut().enumerate() {
            if dot.is_eaten() {
                continue;
            }
            // Radius is re-read per dot: eating the power dot enlarges it mid-pass
            if !self.player.circle().intersects(&dot.circle()) {
                continue;
            }
            let score = dot.score();
            self.game.add_score(score);
            events.push(SimEvent::DotEaten {
                index,
                power: dot.is_power(),
                score,
            });
            log::debug!("Dot {} eaten (+{})", index, score);

            if dot.is_power() {
                self.player.start_powerup()?;
                self.enemy.start_panic()?;
                events.push(SimEvent::PowerUp);
                log::debug!("Power up! Enemy panicking");
            }
            dot.hide();
        }
        Ok(())
    }

    fn check_enemy_contact(&mut self, events: &mut Vec<SimEvent>) -> SimResult<()> {
        if self.enemy.is_knocked_out() {
            return Ok(());
        }
        if !self.player.circle().intersects(&self.enemy.circle()) {
            return Ok(());
        }

        if self.player.is_powered_up() {
            self.enemy.knockout()?;
            let score = self.enemy.score();
            self.game.add_score(score);
            events.push(SimEvent::EnemyKnockedOut { score });
            log::debug!("Enemy knocked out (+{})", score);
        } else {
            self.game.finish();
            self.enemy.finish();
            self.player.finish()?;
            events.push(SimEvent::PlayerCaught);
            log::info!(
                "Game over: score {} (high score {})",
                self.game.current_score(),
                self.game.high_score()
            );
        }
        Ok(())
    }

    /// Read-only snapshot for rendering and HUD
    pub fn view(&self) -> FrameView {
        FrameView::from_session(self)
    }

    pub fn config(&self) -> StageConfig {
        self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn keep_high_score(&self) -> bool {
        self.keep_high_score
    }

    pub fn set_keep_high_score(&mut self, keep: bool) {
        self.keep_high_score = keep;
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::StagePreset;
    use crate::sim::enemy::EnemyState;
    use crate::sim::game::GamePhase;
    use crate::sim::player::PlayerState;

    fn normal_session() -> Session {
        Session::new(StagePreset::Normal.config(), 12345).unwrap()
    }

    /// Session already past the Ready countdown, nothing moved yet
    fn playing_session() -> Session {
        let mut session = normal_session();
        assert!(session.game.update(READY_DURATION).unwrap());
        session
    }

    /// Eat every dot except the listed ones
    fn keep_only_dots(session: &mut Session, keep: &[usize]) {
        for (i, dot) in session.dots.iter_mut().enumerate() {
            if !keep.contains(&i) {
                dot.hide();
            }
        }
    }

    #[test]
    fn test_new_session_layout() {
        let session = normal_session();
        assert_eq!(session.game.phase(), GamePhase::Ready);
        assert!((session.player.pos.x - (640.0 - 1280.0 * 0.333)).abs() < 1e-3);
        assert!((session.enemy.pos.x - (640.0 + 1280.0 * 0.333)).abs() < 1e-3);
        assert_eq!(session.player.pos.y, 240.0);
        assert_eq!(session.dots.len(), 20);
        assert_eq!(session.dots.active_count(), 20);
        assert!(session.dots.power_index().is_some());
    }

    #[test]
    fn test_ready_suspends_gameplay() {
        let mut session = normal_session();
        let player_x = session.player.pos.x;
        let enemy_x = session.enemy.pos.x;

        let events = session.tick(&TickInput::turn(Direction::Left), 1.0).unwrap();
        assert!(events.is_empty());
        assert!(session.game.is_ready());
        assert_eq!(session.player.pos.x, player_x);
        assert_eq!(session.enemy.pos.x, enemy_x);
        // Presses during Ready are dropped
        assert_eq!(session.player.direction(), Direction::Right);

        let events = session.tick(&TickInput::default(), 1.0).unwrap();
        assert_eq!(events.first(), Some(&SimEvent::Playing));
        assert_eq!(session.game.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_player_moves_without_wrap() {
        let mut session = playing_session();
        session.player.pos.x = 100.0;
        session.enemy.pos.x = 1000.0;
        session.tick(&TickInput::default(), 1.0).unwrap();
        assert_eq!(session.player.pos.x, 460.0);
    }

    #[test]
    fn test_player_wraps_past_right_edge() {
        let mut session = playing_session();
        session.player.pos.x = 1270.0;
        session.enemy.pos.x = 640.0;
        session.tick(&TickInput::default(), 1.0).unwrap();
        assert_eq!(session.player.pos.x, 0.0);
    }

    #[test]
    fn test_player_wraps_below_zero() {
        let mut session = playing_session();
        session.player.pos.x = 10.0;
        session.enemy.pos.x = 640.0;
        session.tick(&TickInput::turn(Direction::Left), 0.5).unwrap();
        assert_eq!(session.player.pos.x, 1280.0);
    }

    #[test]
    fn test_wrapped_player_eats_dot_at_left_edge() {
        let mut session = playing_session();
        keep_only_dots(&mut session, &[0, 10]);
        for i in [0, 10] {
            session.dots.iter_mut().nth(i).unwrap().reset(false);
        }
        session.player.pos.x = 1270.0;
        session.enemy.pos.x = 640.0;

        // 1270 + 360 runs off the right edge and snaps to 0, next to dot 0 at x=20
        let events = session.tick(&TickInput::default(), 1.0).unwrap();
        assert_eq!(session.player.pos.x, 0.0);
        assert!(session.dots.get(0).unwrap().is_eaten());
        assert!(session.dots.get(10).unwrap().is_active());
        assert_eq!(session.game.current_score(), 10);
        assert_eq!(
            events,
            vec![SimEvent::DotEaten {
                index: 0,
                power: false,
                score: 10
            }]
        );
    }

    #[test]
    fn test_enemy_ai_reads_player_before_move() {
        let mut session = playing_session();
        keep_only_dots(&mut session, &[5]);
        session.enemy.pos.x = 400.0;
        session.player.pos.x = 1000.0;

        // Before the move the player is 600 to the right (680 left). After moving
        // to 1180 it would be 500 to the left, so only the old read chases right.
        session.tick(&TickInput::default(), 0.5).unwrap();
        assert_eq!(session.player.pos.x, 1180.0);
        assert_eq!(session.enemy.direction(), Direction::Right);
        assert_eq!(session.enemy.pos.x, 620.0);
    }

    #[test]
    fn test_power_dot_powers_up_and_panics_enemy() {
        let mut session = playing_session();
        let power = session.dots.power_index().unwrap();
        let far = (power + 10) % 20;
        keep_only_dots(&mut session, &[power, far]);

        let x = session.dots.get(power).unwrap().pos.x;
        session.player.pos.x = x;
        session.enemy.pos.x = session.stage.wrap(x + 640.0);

        let events = session.tick(&TickInput::default(), 0.0).unwrap();
        assert_eq!(session.game.current_score(), 50);
        assert_eq!(session.player.powerup_timer(), 3.0);
        assert_eq!(session.enemy.panic_timer(), 3.0);
        assert!(session.dots.get(power).unwrap().is_eaten());
        assert!(session.dots.get(far).unwrap().is_active());
        assert_eq!(
            events,
            vec![
                SimEvent::DotEaten {
                    index: power,
                    power: true,
                    score: 50
                },
                SimEvent::PowerUp,
            ]
        );
    }

    #[test]
    fn test_powered_player_knocks_out_enemy() {
        let mut session = playing_session();
        keep_only_dots(&mut session, &[0]);
        session.player.pos.x = 640.0;
        session.player.start_powerup().unwrap();
        session.enemy.pos.x = 690.0;

        let events = session.tick(&TickInput::default(), 0.0).unwrap();
        assert_eq!(session.enemy.state(), EnemyState::Knockedout);
        assert_eq!(session.enemy.knockout_timer(), 1.5);
        assert_eq!(session.game.current_score(), 200);
        assert_eq!(events, vec![SimEvent::EnemyKnockedOut { score: 200 }]);

        // A knocked out enemy can't be eaten twice
        session.tick(&TickInput::default(), 0.0).unwrap();
        assert_eq!(session.game.current_score(), 200);
    }

    #[test]
    fn test_enemy_catches_player() {
        let mut session = playing_session();
        keep_only_dots(&mut session, &[0]);
        session.player.pos.x = 640.0;
        session.enemy.pos.x = 690.0;

        let events = session.tick(&TickInput::default(), 0.0).unwrap();
        assert_eq!(events, vec![SimEvent::PlayerCaught]);
        assert_eq!(session.game.phase(), GamePhase::GameOver);
        assert_eq!(session.enemy.state(), EnemyState::Stop);
        assert_eq!(session.player.state(), PlayerState::Failed);

        // Nothing moves or changes afterwards
        for _ in 0..30 {
            let events = session.tick(&TickInput::turn(Direction::Left), 0.1).unwrap();
            assert!(events.is_empty());
        }
        assert_eq!(session.player.pos.x, 640.0);
        assert_eq!(session.enemy.pos.x, 690.0);
        assert_eq!(session.game.phase(), GamePhase::GameOver);
        assert_eq!(session.enemy.state(), EnemyState::Stop);
        assert_eq!(session.player.state(), PlayerState::Failed);
        assert_eq!(session.player.failed_scale(), 0.0);
    }

    #[test]
    fn test_last_dot_respawns_batch_same_frame() {
        let mut session = playing_session();
        let last = 5;
        keep_only_dots(&mut session, &[last]);
        session.player.pos.x = session.dots.get(last).unwrap().pos.x;
        session.enemy.pos.x = session.stage.wrap(session.player.pos.x + 640.0);

        let events = session.tick(&TickInput::default(), 0.0).unwrap();
        let power_index = match events.last() {
            Some(SimEvent::DotsRespawned { power_index }) => *power_index,
            other => panic!("expected respawn, got {:?}", other),
        };
        assert_eq!(session.dots.active_count(), 20);
        assert_eq!(session.dots.power_index(), Some(power_index));
        let exclusion = session.player.circle().scaled(POWER_DOT_CLEARANCE);
        assert!(!session.dots.get(power_index).unwrap().circle().intersects(&exclusion));
    }

    #[test]
    fn test_restart_keeps_high_score() {
        let mut session = playing_session();
        session.game.add_score(120);
        session.game.finish();
        session.player.finish().unwrap();
        session.enemy.finish();

        let events = session.tick(&TickInput::restart(), 0.0).unwrap();
        assert_eq!(events, vec![SimEvent::Restarted]);
        assert!(session.game.is_ready());
        assert_eq!(session.game.current_score(), 0);
        assert_eq!(session.game.high_score(), 120);
        assert_eq!(session.player.state(), PlayerState::Alive);
        assert_eq!(session.enemy.state(), EnemyState::Alive);
        assert_eq!(session.dots.active_count(), 20);
    }

    #[test]
    fn test_restart_without_keeping_high_score() {
        let mut session = playing_session();
        session.set_keep_high_score(false);
        session.game.add_score(120);
        session.restart().unwrap();
        assert_eq!(session.game.high_score(), 0);
    }

    #[test]
    fn test_enemy_chases_player_around_wrap() {
        let mut session = playing_session();
        keep_only_dots(&mut session, &[10]);
        session.player.pos.x = 300.0;
        session.enemy.pos.x = 1200.0;
        session.player.steer(Direction::Left);
        session.tick(&TickInput::default(), 0.2).unwrap();
        // Shorter way is right, across the edge
        assert_eq!(session.enemy.direction(), Direction::Right);
        assert_eq!(session.enemy.pos.x, 0.0);
    }

    #[test]
    fn test_same_seed_same_run() {
        let inputs = [
            TickInput::default(),
            TickInput::turn(Direction::Left),
            TickInput::default(),
            TickInput::turn(Direction::Right),
        ];
        let mut a = normal_session();
        let mut b = normal_session();
        for i in 0..600 {
            let input = &inputs[i % inputs.len()];
            let ea = a.tick(input, FRAME_DT).unwrap();
            let eb = b.tick(input, FRAME_DT).unwrap();
            assert_eq!(ea, eb);
        }
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.enemy.pos, b.enemy.pos);
        assert_eq!(a.game.current_score(), b.game.current_score());
        assert_eq!(a.dots, b.dots);
        assert_eq!(a.frame(), 600);
    }
}
