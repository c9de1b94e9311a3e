//! Collectible dots and the dot batch

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Circle;
use super::stage::Stage;
use crate::consts::*;
use crate::error::{SimError, SimResult};

/// A single collectible dot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dot {
    pub pos: Vec2,
    radius: f32,
    power: bool,
    active: bool,
}

impl Dot {
    pub fn new(pos: Vec2) -> Self {
        let mut dot = Self {
            pos,
            radius: DOT_RADIUS,
            power: false,
            active: true,
        };
        dot.reset(false);
        dot
    }

    /// Reactivate as a normal or power dot
    pub fn reset(&mut self, power: bool) {
        self.power = power;
        self.radius = if power { POWER_DOT_RADIUS } else { DOT_RADIUS };
        self.active = true;
    }

    /// Mark as eaten
    pub fn hide(&mut self) {
        self.active = false;
    }

    pub fn is_eaten(&self) -> bool {
        !self.active
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_power(&self) -> bool {
        self.power
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn score(&self) -> u32 {
        if self.power { SCORE_POWER_DOT } else { SCORE_DOT }
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.pos, self.radius)
    }
}

/// The full set of dots for a stage. Exactly one is a power dot after every respawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DotBatch {
    dots: Vec<Dot>,
}

impl DotBatch {
    /// Evenly space `count` dots along the stage lane
    pub fn layout(stage: &Stage, count: usize) -> Self {
        let interval = if count > 0 { stage.width / count as f32 } else { 0.0 };
        let dots = (0..count)
            .map(|i| Dot::new(Vec2::new(DOT_START_OFFSET + i as f32 * interval, stage.offset_y)))
            .collect();
        Self { dots }
    }

    /// Reactivate every dot and pick a new power dot that doesn't sit on the player.
    ///
    /// The power dot must clear the player's hit circle doubled. Random picks
    /// are tried first, then every index in order. Returns the power dot index.
    pub fn respawn<R: Rng>(&mut self, rng: &mut R, player: Circle) -> SimResult<usize> {
        let exclusion = player.scaled(POWER_DOT_CLEARANCE);
        let count = self.dots.len();
        if count == 0 {
            return Err(SimError::DegenerateDotBatch { dots: 0, attempts: 0 });
        }

        let mut attempts = 0;
        let mut chosen = None;
        while attempts < MAX_POWER_DOT_ATTEMPTS {
            attempts += 1;
            let index = rng.random_range(0..count);
            if self.power_dot_clears(index, &exclusion) {
                chosen = Some(index);
                break;
            }
        }

        let index = match chosen {
            Some(index) => index,
            None => (0..count)
                .find(|&i| self.power_dot_clears(i, &exclusion))
                .ok_or(SimError::DegenerateDotBatch { dots: count, attempts })?,
        };

        if attempts > 1 {
            log::warn!("Power dot placed after {} attempts (index {})", attempts, index);
        }

        for (i, dot) in self.dots.iter_mut().enumerate() {
            dot.reset(i == index);
        }
        Ok(index)
    }

    /// Would dot `index`, as a power dot, stay clear of the exclusion circle?
    fn power_dot_clears(&self, index: usize, exclusion: &Circle) -> bool {
        let candidate = Circle::new(self.dots[index].pos, POWER_DOT_RADIUS);
        !candidate.intersects(exclusion)
    }

    pub fn all_eaten(&self) -> bool {
        self.dots.iter().all(Dot::is_eaten)
    }

    pub fn active_count(&self) -> usize {
        self.dots.iter().filter(|d| d.is_active()).count()
    }

    pub fn power_index(&self) -> Option<usize> {
        self.dots.iter().position(Dot::is_power)
    }

    pub fn len(&self) -> usize {
        self.dots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Dot> {
        self.dots.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Dot> {
        self.dots.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Dot> {
        self.dots.iter_mut()
    }
}
