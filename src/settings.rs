//! Runtime configuration
//!
//! Read from LocalStorage on the web; defaults everywhere else. Nothing is
//! ever written back.

use serde::{Deserialize, Serialize};

use crate::consts::{INITIAL_SHAPES, SHAPE_GOAL};

/// Whether the toy runs forever or as a run with a win condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Rules {
    /// Simulate every frame, never end
    #[default]
    FreePlay,
    /// Start/stop gated; explode mode wins on an empty board, add mode on
    /// reaching the shape goal
    Goal,
}

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Triangle fan segments per circle (balls and particles)
    pub fn circle_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 12,
            QualityPreset::Medium => 24,
            QualityPreset::High => 48,
        }
    }
}

/// Toy settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub rules: Rules,
    /// Add-mode win threshold under goal rules
    pub shape_goal: usize,
    /// Shapes spawned on load (free play) or on start (goal rules)
    pub initial_shapes: usize,
    pub quality: QualityPreset,
    /// Fixed RNG seed; the host clock is used when absent
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rules: Rules::FreePlay,
            shape_goal: SHAPE_GOAL,
            initial_shapes: INITIAL_SHAPES,
            quality: QualityPreset::Medium,
            seed: None,
        }
    }
}

impl Settings {
    /// Parse settings JSON; missing keys take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Seed to use, falling back to `fallback` (usually the clock)
    pub fn seed_or(&self, fallback: u64) -> u64 {
        self.seed.unwrap_or(fallback)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "shape_burst_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring malformed settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native: always defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
