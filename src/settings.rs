//! Run settings
//!
//! Loaded from an optional JSON file by the host. The simulation only ever
//! sees the `RunRules` copied out of these settings when a run starts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{BANNER_SECONDS, HURT_WINDOW, MAX_FRAME_DT};
use crate::sim::RunRules;

/// Upper bound accepted for a configured frame delta
const MAX_CONFIGURABLE_DT: f32 = 0.25;

/// What happens to player HP when advancing to the next stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HpCarry {
    /// HP carries over unchanged
    #[default]
    Keep,
    /// HP is restored to max
    Refill,
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed run seed; random when absent
    pub seed: Option<u64>,
    /// Chapter banner duration (seconds)
    pub banner_seconds: f32,
    /// Cap on the elapsed time integrated per frame (seconds)
    pub max_frame_dt: f32,
    /// Uninjured window after a hit (seconds)
    pub hurt_window: f32,
    /// HP policy between stages
    pub hp_carry: HpCarry,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            banner_seconds: BANNER_SECONDS,
            max_frame_dt: MAX_FRAME_DT,
            hurt_window: HURT_WINDOW,
            hp_carry: HpCarry::Keep,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Load settings from a file, falling back to defaults on any failure
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read settings {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Replace out-of-range values with usable ones
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.banner_seconds >= 0.0 && self.banner_seconds.is_finite()) {
            self.banner_seconds = defaults.banner_seconds;
        }
        if self.max_frame_dt.is_nan() || self.max_frame_dt <= 0.0 {
            self.max_frame_dt = defaults.max_frame_dt;
        }
        self.max_frame_dt = self.max_frame_dt.min(MAX_CONFIGURABLE_DT);
        if !(self.hurt_window >= 0.0 && self.hurt_window.is_finite()) {
            self.hurt_window = defaults.hurt_window;
        }
        self
    }

    /// Rules copied into a run
    pub fn rules(&self) -> RunRules {
        let clean = self.clone().sanitized();
        RunRules {
            banner_seconds: clean.banner_seconds,
            max_frame_dt: clean.max_frame_dt,
            hurt_window: clean.hurt_window,
            hp_carry: clean.hp_carry,
        }
    }
}
