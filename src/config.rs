use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Playback tuning shared by every animated model.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    /// Smallest change in playback time (in ticks) worth re-evaluating the pose for.
    pub time_epsilon: f32,
    /// Evaluate once every `update_interval` frames. 0 behaves like 1.
    pub update_interval: u32,
    /// Rate used for clips whose source asset reports 0 ticks per second.
    pub default_ticks_per_second: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            time_epsilon: 0.001,
            update_interval: 1,
            default_ticks_per_second: 25.0,
        }
    }
}

impl AnimationConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn effective_update_interval(&self) -> u32 {
        self.update_interval.max(1)
    }
}
