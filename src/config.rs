//! Runtime configuration, read from TOML.
//!
//! ```toml
//! [grid]
//! snapshot_on_load = true
//!
//! [search]
//! movement_mode = "diagonal_hop"
//!
//! [playback]
//! step_duration_ms = 120
//! ```

use crate::error::Result;
use crate::tile::MovementMode;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GridConfig {
    /// Keep a copy of every successfully loaded layout for `reset` (default: true)
    #[serde(default = "default_snapshot_on_load")]
    pub snapshot_on_load: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SearchConfig {
    /// Movement mode handed to searches until the host picks another one (default: diagonal)
    #[serde(default)]
    pub movement_mode: MovementMode,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PlaybackConfig {
    /// Time spent on each move step in milliseconds (default: 250)
    #[serde(default = "default_step_duration_ms")]
    pub step_duration_ms: u64,
}

impl PlaybackConfig {
    pub fn step_duration(&self) -> Duration {
        Duration::from_millis(self.step_duration_ms)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            snapshot_on_load: default_snapshot_on_load(),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            step_duration_ms: default_step_duration_ms(),
        }
    }
}

fn default_snapshot_on_load() -> bool {
    true
}

fn default_step_duration_ms() -> u64 {
    250
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
