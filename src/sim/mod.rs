//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through the frame `dt`
//! - Seeded RNG only
//! - Fixed per-frame update order
//! - No rendering or platform dependencies

pub mod collision;
pub mod dot;
pub mod enemy;
pub mod game;
pub mod player;
pub mod replay;
pub mod stage;
pub mod tick;
pub mod view;

pub use collision::circles_intersect;
pub use dot::{Dot, DotBatch};
pub use enemy::{Enemy, EnemyState};
pub use game::{Game, GamePhase};
pub use player::{Player, PlayerState};
pub use replay::{ReplayLog, ReplayRecorder, replay};
pub use stage::Stage;
pub use tick::{Session, SimEvent, TickInput};
pub use view::{DotView, EnemyView, FrameView, HudView, PlayerView};
