//! Start-up configuration for an [`EventLoop`](crate::EventLoop).
//!
//! The configuration is handed to [`EventLoop::new`](crate::EventLoop::new)
//! and fixed from then on. `slave_mode` picks between the two ways a loop can
//! be run: the blocking [`run`](crate::EventLoop::run) or stepping through
//! [`DrivenLoop::poll`](flowstep_core::DrivenLoop::poll) from a host loop.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use flowstep_core::error::{error, Error, Result};

/// Highest frame rate accepted by [`StartupConfig::validate`].
pub const MAX_FPS_LIMIT: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StartupConfig {
    /// Hand the main loop to an external host instead of blocking in `run()`
    pub slave_mode: bool,
    /// Frames per second of the virtual clock
    pub max_fps: u32,
    /// Upper bound on frames for the blocking loop, `None` for unbounded
    pub max_frames: Option<u64>,
    /// Sleep one frame delta between frames of the blocking loop
    pub pace_frames: bool,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            slave_mode: false,
            max_fps: 60,
            max_frames: None,
            pace_frames: false,
        }
    }
}

impl StartupConfig {
    /// Environment variable hosts conventionally read to switch slave mode on.
    pub const SLAVE_MODE_ENV: &'static str = "FLOWSTEP_SLAVE_MODE";

    /// Default configuration with slave mode switched on.
    pub fn slave() -> Self {
        Self { slave_mode: true, ..Self::default() }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: StartupConfig =
            serde_json::from_str(text).map_err(|e| Error::new(format!("Invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| Error::new(format!("Failed to read config {}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_fps == 0 || self.max_fps > MAX_FPS_LIMIT {
            return error(format!(
                "Invalid config: max_fps must be between 1 and {}, got {}",
                MAX_FPS_LIMIT, self.max_fps
            ));
        }
        if self.max_frames == Some(0) {
            return error("Invalid config: max_frames must be at least 1 when set");
        }
        Ok(())
    }

    /// Seconds of virtual time one frame advances the clock by.
    pub fn frame_delta(&self) -> f64 {
        1.0 / f64::from(self.max_fps)
    }
}

/// Interprets the value of a slave-mode switch such as `FLOWSTEP_SLAVE_MODE`.
///
/// Returns `None` for values that are neither a recognised "on" nor "off".
pub fn parse_switch(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
