//! Game configuration
//!
//! Defaults match the classic 800×600 / 60 FPS tuning. Any field can be
//! overridden from a JSON file; missing fields keep their default.

use std::path::Path;
use std::time::Duration;

use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};

use crate::text::TextChoice;

pub const DEFAULT_FPS: u32 = 60;
pub const DEFAULT_SCREEN_WIDTH: u32 = 800;
pub const DEFAULT_SCREEN_HEIGHT: u32 = 600;
/// Pixels per frame.
pub const INITIAL_FALL_SPEED: f32 = 3.0;
/// Fall speed gained per second of play.
pub const FALL_ACCELERATION: f32 = 0.1;
/// Obstacles per second.
pub const SPAWN_RATE: f32 = 1.0;
/// Pixels per frame.
pub const PLAYER_SPEED: f32 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub target_fps: u32,
    pub screen_width: u32,
    pub screen_height: u32,
    pub initial_fall_speed: f32,
    pub fall_acceleration: f32,
    pub spawn_rate: f32,
    pub player_speed: f32,
    /// Ring the terminal bell for collision and game-over cues.
    pub sound: bool,
    pub text: TextChoice,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            target_fps: DEFAULT_FPS,
            screen_width: DEFAULT_SCREEN_WIDTH,
            screen_height: DEFAULT_SCREEN_HEIGHT,
            initial_fall_speed: INITIAL_FALL_SPEED,
            fall_acceleration: FALL_ACCELERATION,
            spawn_rate: SPAWN_RATE,
            player_speed: PLAYER_SPEED,
            sound: true,
            text: TextChoice::Auto,
        }
    }
}

impl GameConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config = Self::from_json(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let config: GameConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.target_fps > 0, "target_fps must be positive");
        ensure!(
            self.screen_width > 0 && self.screen_height > 0,
            "screen size must be non-zero (got {}x{})",
            self.screen_width,
            self.screen_height
        );
        ensure!(
            self.spawn_rate.is_finite() && self.spawn_rate > 0.0,
            "spawn_rate must be positive (got {})",
            self.spawn_rate
        );
        ensure!(
            Duration::try_from_secs_f32(1.0 / self.spawn_rate).is_ok(),
            "spawn_rate {} gives an unrepresentable spawn interval",
            self.spawn_rate
        );
        ensure!(
            self.initial_fall_speed.is_finite() && self.initial_fall_speed > 0.0,
            "initial_fall_speed must be positive"
        );
        ensure!(
            self.fall_acceleration.is_finite() && self.fall_acceleration >= 0.0,
            "fall_acceleration must not be negative"
        );
        ensure!(
            self.player_speed.is_finite() && self.player_speed >= 0.0,
            "player_speed must not be negative"
        );
        Ok(())
    }

    /// Target wall-clock length of one frame.
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.target_fps.max(1)))
    }

    pub fn tuning(&self) -> Tuning {
        Tuning {
            player_speed: self.player_speed,
            initial_fall_speed: self.initial_fall_speed,
            fall_acceleration: self.fall_acceleration,
            spawn_interval: Duration::from_secs_f32(1.0 / self.spawn_rate),
        }
    }
}

/// The subset of the config the simulation reads every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    pub player_speed: f32,
    pub initial_fall_speed: f32,
    pub fall_acceleration: f32,
    pub spawn_interval: Duration,
}

impl Default for Tuning {
    fn default() -> Self {
        GameConfig::default().tuning()
    }
}
