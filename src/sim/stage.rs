//! Stage geometry: the wrap-around track

use serde::{Deserialize, Serialize};

use crate::settings::StageConfig;
use crate::wrap_position;

/// Track bounds. Positions live in `[0, width]` after wrap correction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub width: f32,
    pub height: f32,
    /// Vertical lane every entity sits on (render only)
    pub offset_y: f32,
}

impl Stage {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            offset_y: 0.0,
        }
    }

    /// Stage for a screen preset: a quarter of the screen tall, centered vertically
    pub fn from_config(config: &StageConfig) -> Self {
        let mut stage = Self::new(config.screen_width as f32, config.screen_height as f32 / 4.0);
        stage.offset_y = config.screen_height as f32 * 0.5;
        stage
    }

    pub fn center_x(&self) -> f32 {
        self.width * 0.5
    }

    #[inline]
    pub fn wrap(&self, x: f32) -> f32 {
        wrap_position(x, self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::StagePreset;

    #[test]
    fn test_stage_from_normal_preset() {
        let stage = Stage::from_config(&StagePreset::Normal.config());
        assert_eq!(stage.width, 1280.0);
        assert_eq!(stage.height, 120.0);
        assert_eq!(stage.offset_y, 240.0);
        assert_eq!(stage.center_x(), 640.0);
    }

    #[test]
    fn test_stage_wrap() {
        let stage = Stage::new(720.0, 90.0);
        assert_eq!(stage.wrap(721.0), 0.0);
        assert_eq!(stage.wrap(-1.0), 720.0);
        assert_eq!(stage.wrap(360.0), 360.0);
    }
}
