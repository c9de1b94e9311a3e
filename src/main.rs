//! Dot Eater entry point
//!
//! Runs a headless session with a built-in autopilot. A windowed front end
//! drives the same `Session` and draws its `FrameView`.
//!
//! Usage: `dot-eater [small|normal|large] [seed] [seconds]`

mod headless {
    use dot_eater::consts::FRAME_DT;
    use dot_eater::sim::{Session, SimEvent, TickInput};
    use dot_eater::{Direction, SimError, SimResult, Settings, StagePreset, circular_distances};

    /// Run away from a hunting enemy closer than this
    const DANGER_DISTANCE: f32 = 250.0;
    const DEFAULT_SECONDS: f32 = 60.0;

    struct Args {
        settings: Settings,
        seconds: f32,
    }

    fn parse_args() -> SimResult<Args> {
        let mut args = std::env::args().skip(1);
        let mut settings = match args.next() {
            Some(preset) => Settings::from_preset(
                StagePreset::from_str(&preset)
                    .ok_or_else(|| SimError::InvalidConfig(format!("unknown stage preset '{preset}'")))?,
            ),
            None => Settings::default(),
        };
        if let Some(seed) = args.next() {
            let seed = seed
                .parse()
                .map_err(|_| SimError::InvalidConfig(format!("seed must be an integer, got '{seed}'")))?;
            settings.seed = Some(seed);
        }
        let seconds = match args.next() {
            Some(s) => s
                .parse()
                .map_err(|_| SimError::InvalidConfig(format!("seconds must be a number, got '{s}'")))?,
            None => DEFAULT_SECONDS,
        };
        Ok(Args { settings, seconds })
    }

    /// Pick a direction: flee a nearby hunting enemy, otherwise head for the nearest dot
    fn autopilot(session: &Session) -> Option<Direction> {
        let player = &session.player;
        let enemy = &session.enemy;
        let width = session.stage.width;

        let hunted = !player.is_powered_up() && !enemy.is_panicking() && !enemy.is_knocked_out();
        let (enemy_r, enemy_l) = circular_distances(player.pos.x, enemy.pos.x, width);
        let wanted = if hunted && enemy_r.min(enemy_l) < DANGER_DISTANCE {
            if enemy_r < enemy_l { Direction::Left } else { Direction::Right }
        } else {
            let (r, l) = session
                .dots
                .iter()
                .filter(|d| d.is_active())
                .map(|d| circular_distances(player.pos.x, d.pos.x, width))
                .min_by(|a, b| a.0.min(a.1).total_cmp(&b.0.min(b.1)))?;
            if r <= l { Direction::Right } else { Direction::Left }
        };

        (wanted != player.direction()).then_some(wanted)
    }

    pub fn run() -> SimResult<()> {
        let args = parse_args()?;
        let mut session = Session::from_settings(&args.settings)?;
        log::info!(
            "Headless run: {} stage, seed {}, {}s",
            args.settings.preset.as_str(),
            args.settings.resolve_seed(),
            args.seconds
        );

        let max_frames = (args.seconds / FRAME_DT).ceil() as u64;
        let mut knockouts = 0;
        let mut batches = 0;
        while session.frame() < max_frames && !session.game.is_game_over() {
            let input = TickInput {
                turn: autopilot(&session),
                ..Default::default()
            };
            for event in session.tick(&input, FRAME_DT)? {
                match event {
                    SimEvent::EnemyKnockedOut { .. } => knockouts += 1,
                    SimEvent::DotsRespawned { .. } => batches += 1,
                    _ => {}
                }
            }
        }

        let view = session.view();
        println!(
            "{:?} after {:.1}s: score {} (high {}), {} knockouts, {} batches cleared",
            view.hud.phase,
            session.frame() as f32 * FRAME_DT,
            view.hud.score,
            view.hud.high_score,
            knockouts,
            batches
        );
        Ok(())
    }
}

fn main() {
    env_logger::init();
    log::info!("Dot Eater starting...");

    if let Err(e) = headless::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

