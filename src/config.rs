use std::f32::consts::{FRAC_PI_2, FRAC_PI_3};
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Top-level tuning, loaded from JSON. Every field has a default so a partial
/// file only overrides what it names.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub motion: MotionConfig,
    pub timing: TimingConfig,
    pub camera: CameraConfig,
    pub input: InputConfig,
}

impl Config {
    /// Read a config file. A missing file is not an error: defaults are used.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }
}

/// Per-tick movement amounts. Speeds are world units per tick, not per second.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub move_speed: f32,
    pub run_speed: f32,
    /// Yaw change per tick while Q/E is held (radians).
    pub turn_rate: f32,
    /// Angle of one fixed turn segment; the segment restarts while the key is held.
    pub turn_segment: f32,
    pub jump_height: f32,
    /// Resting height of the character root (slightly above the ground plane).
    pub base_y: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            move_speed: 0.035,
            run_speed: 0.06,
            turn_rate: 0.011,
            turn_segment: FRAC_PI_3,
            jump_height: 0.5,
            base_y: 0.1,
        }
    }
}

/// Durations in milliseconds.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub jump_standing_ms: u64,
    pub jump_moving_ms: u64,
    pub victory_ms: u64,
    pub turn180_ms: u64,
    pub turn_ms: u64,
    /// Minimum gap between two accepted presses of a gesture key.
    pub debounce_ms: u64,
    /// The animation state is re-evaluated at most this often.
    pub resolve_interval_ms: u64,
    /// Q/E must be held this long before the turn animation shows.
    pub turn_delay_ms: u64,
    /// A turn animation keeps playing this long after Q/E is released.
    pub turn_linger_ms: u64,
    pub crossfade_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            jump_standing_ms: 1000,
            jump_moving_ms: 833,
            victory_ms: 3000,
            turn180_ms: 833,
            turn_ms: 800,
            debounce_ms: 300,
            resolve_interval_ms: 100,
            turn_delay_ms: 200,
            turn_linger_ms: 300,
            crossfade_ms: 200,
        }
    }
}

impl TimingConfig {
    pub fn jump_standing(&self) -> Duration {
        Duration::from_millis(self.jump_standing_ms)
    }
    pub fn jump_moving(&self) -> Duration {
        Duration::from_millis(self.jump_moving_ms)
    }
    pub fn victory(&self) -> Duration {
        Duration::from_millis(self.victory_ms)
    }
    pub fn turn180(&self) -> Duration {
        Duration::from_millis(self.turn180_ms)
    }
    pub fn turn(&self) -> Duration {
        Duration::from_millis(self.turn_ms)
    }
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
    pub fn resolve_interval(&self) -> Duration {
        Duration::from_millis(self.resolve_interval_ms)
    }
    pub fn turn_delay(&self) -> Duration {
        Duration::from_millis(self.turn_delay_ms)
    }
    pub fn turn_linger(&self) -> Duration {
        Duration::from_millis(self.turn_linger_ms)
    }
    pub fn crossfade_secs(&self) -> f32 {
        self.crossfade_ms as f32 / 1000.0
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub zoom_speed: f32,
    pub mouse_sensitivity: f32,
    pub vertical_limit: f32,
    /// Height of the camera above the character before the vertical angle is applied.
    pub offset_y: f32,
    /// Height above the character root the camera looks at.
    pub look_offset_y: f32,
    /// 0 = snap to target, 1 = never move.
    pub damping: f32,
    pub vertical_damping: f32,
    pub rotation_damping: f32,
    pub ground_level: f32,
    pub min_clearance: f32,
    pub fov_deg: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 5.0,
            min_distance: 2.0,
            max_distance: 15.0,
            zoom_speed: 0.5,
            mouse_sensitivity: 0.002,
            vertical_limit: FRAC_PI_2,
            offset_y: 3.0,
            look_offset_y: 1.0,
            damping: 0.1,
            vertical_damping: 0.25,
            rotation_damping: 0.05,
            ground_level: 0.0,
            min_clearance: 0.3,
            fov_deg: 45.0,
        }
    }
}

/// Key binding overrides on top of the built-in layout.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub bindings: Vec<Binding>,
}

/// One `{ "key": "F", "action": "jump" }` entry. Key names follow SDL scancode names.
#[derive(Clone, Debug, Deserialize)]
pub struct Binding {
    pub key: String,
    pub action: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_other_defaults() {
        let cfg: Config =
            serde_json::from_str(r#"{ "motion": { "run_speed": 0.1 }, "timing": { "victory_ms": 500 } }"#)
                .unwrap();
        assert_eq!(cfg.motion.run_speed, 0.1);
        assert_eq!(cfg.motion.move_speed, 0.035);
        assert_eq!(cfg.timing.victory(), Duration::from_millis(500));
        assert_eq!(cfg.timing.jump_moving(), Duration::from_millis(833));
        assert!(cfg.input.bindings.is_empty());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let cfg = Config::load(Path::new("definitely/not/here.json")).unwrap();
        assert_eq!(cfg.camera.max_distance, 15.0);
    }
}
