//! Stage presets and session settings
//!
//! The stage is picked once at startup from a closed set of presets.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Seed used when the settings don't name one, so headless runs reproduce
pub const DEFAULT_SEED: u64 = 0x00D0_7EA7;

/// Screen geometry and dot count for one stage preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageConfig {
    pub screen_width: u32,
    pub screen_height: u32,
    pub dot_count: usize,
}

/// Stage size presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StagePreset {
    Small,
    #[default]
    Normal,
    Large,
}

impl StagePreset {
    pub const ALL: [StagePreset; 3] = [StagePreset::Small, StagePreset::Normal, StagePreset::Large];

    pub fn as_str(&self) -> &'static str {
        match self {
            StagePreset::Small => "small",
            StagePreset::Normal => "normal",
            StagePreset::Large => "large",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "small" | "s" => Some(StagePreset::Small),
            "normal" | "n" => Some(StagePreset::Normal),
            "large" | "l" => Some(StagePreset::Large),
            _ => None,
        }
    }

    /// Fixed geometry for this preset
    pub fn config(&self) -> StageConfig {
        match self {
            StagePreset::Small => StageConfig {
                screen_width: 720,
                screen_height: 360,
                dot_count: 10,
            },
            StagePreset::Normal => StageConfig {
                screen_width: 1280,
                screen_height: 480,
                dot_count: 20,
            },
            StagePreset::Large => StageConfig {
                screen_width: 1920,
                screen_height: 720,
                dot_count: 40,
            },
        }
    }
}

/// Session settings chosen at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Stage size preset
    pub preset: StagePreset,
    /// RNG seed (power dot selection, knockout jitter)
    pub seed: Option<u64>,
    /// Keep the high score when the player restarts
    pub keep_high_score: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preset: StagePreset::Normal,
            seed: None,
            keep_high_score: true,
        }
    }
}

impl Settings {
    pub fn from_preset(preset: StagePreset) -> Self {
        Self {
            preset,
            ..Self::default()
        }
    }

    /// Parse settings from a JSON document. Missing fields take defaults.
    pub fn from_json(json: &str) -> SimResult<Self> {
        let settings: Self = serde_json::from_str(json).map_err(|e| SimError::InvalidConfig(e.to_string()))?;
        log::info!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    pub fn to_json(&self) -> SimResult<String> {
        serde_json::to_string(self).map_err(|e| SimError::InvalidConfig(e.to_string()))
    }

    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }
}
