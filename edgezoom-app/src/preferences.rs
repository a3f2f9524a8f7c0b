use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use edgezoom_core::precision::DEFAULT_PRECISION_BITS;
use edgezoom_core::{FractalParams, ZoomConfig};
use edgezoom_render::{ArithmeticMode, SessionConfig};

// ---------------------------------------------------------------------------
// Application preferences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppPreferences {
    #[serde(default = "default_window_size")]
    pub window_width: f32,
    #[serde(default = "default_window_size")]
    pub window_height: f32,

    /// Evaluated grid size; the frame is scaled to the window.
    #[serde(default = "default_image_size")]
    pub image_width: u32,
    #[serde(default = "default_image_size")]
    pub image_height: u32,

    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    #[serde(default = "default_escape_radius")]
    pub escape_radius: f64,

    /// Scale multiplier per step, in (0, 1).
    #[serde(default = "default_zoom_factor")]
    pub zoom_factor: f64,
    /// How far the center moves toward the target each step, in (0, 1].
    #[serde(default = "default_recenter_fraction")]
    pub recenter_fraction: f64,
    #[serde(default = "default_initial_precision")]
    pub initial_precision: u32,
    /// Optional precision ceiling in bits; `null` lets precision grow.
    #[serde(default)]
    pub max_precision: Option<u32>,
    #[serde(default)]
    pub arithmetic: ArithmeticMode,

    /// Minimum time between animation steps.
    #[serde(default = "default_step_interval_ms")]
    pub step_interval_ms: u64,
    /// Fixed RNG seed for reproducible runs; random when absent.
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default = "default_true")]
    pub show_hud: bool,
    /// Snapshot directory. When empty, `snapshots/` next to the executable is used.
    #[serde(default)]
    pub snapshot_dir: String,
}

fn default_window_size() -> f32 {
    800.0
}
fn default_image_size() -> u32 {
    SessionConfig::DEFAULT_SIZE
}
fn default_max_iterations() -> u32 {
    FractalParams::DEFAULT_MAX_ITERATIONS
}
fn default_escape_radius() -> f64 {
    FractalParams::DEFAULT_ESCAPE_RADIUS
}
fn default_zoom_factor() -> f64 {
    ZoomConfig::DEFAULT_ZOOM_FACTOR
}
fn default_recenter_fraction() -> f64 {
    1.0
}
fn default_initial_precision() -> u32 {
    DEFAULT_PRECISION_BITS
}
fn default_step_interval_ms() -> u64 {
    50
}
fn default_true() -> bool {
    true
}

impl Default for AppPreferences {
    fn default() -> Self {
        Self {
            window_width: default_window_size(),
            window_height: default_window_size(),
            image_width: default_image_size(),
            image_height: default_image_size(),
            max_iterations: default_max_iterations(),
            escape_radius: default_escape_radius(),
            zoom_factor: default_zoom_factor(),
            recenter_fraction: default_recenter_fraction(),
            initial_precision: default_initial_precision(),
            max_precision: None,
            arithmetic: ArithmeticMode::default(),
            step_interval_ms: default_step_interval_ms(),
            seed: None,
            show_hud: true,
            snapshot_dir: String::new(),
        }
    }
}

impl AppPreferences {
    /// Load preferences from next to the executable, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(json) => match serde_json::from_str::<AppPreferences>(&json) {
                    Ok(prefs) => {
                        info!("Loaded preferences from {}", path.display());
                        return prefs;
                    }
                    Err(e) => {
                        error!("Failed to parse preferences: {e}");
                    }
                },
                Err(e) => {
                    error!("Failed to read preferences file: {e}");
                }
            }
        } else {
            debug!("No preferences file at {}", path.display());
        }
        Self::default()
    }

    /// Persist preferences to disk.
    pub fn save(&self) {
        let path = config_path();
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(&path, &json) {
                    error!("Failed to write preferences: {e}");
                } else {
                    debug!("Saved preferences");
                }
            }
            Err(e) => error!("Failed to serialize preferences: {e}"),
        }
    }

    /// Build the session configuration, replacing any invalid value with
    /// its default.
    pub fn session_config(&self) -> SessionConfig {
        let defaults = SessionConfig::default();

        let params = FractalParams::new(self.max_iterations, self.escape_radius)
            .unwrap_or_else(|e| {
                warn!("Ignoring iteration preferences: {e}");
                defaults.params
            });
        let zoom = ZoomConfig::new(self.zoom_factor, self.recenter_fraction, self.max_precision)
            .unwrap_or_else(|e| {
                warn!("Ignoring zoom preferences: {e}");
                defaults.zoom
            });

        let config = SessionConfig {
            width: self.image_width,
            height: self.image_height,
            params,
            zoom,
            arithmetic: self.arithmetic,
            initial_precision: self.initial_precision,
        };
        if let Err(e) = config.validate() {
            warn!("Ignoring image/precision preferences: {e}");
            let fallback = SessionConfig {
                width: defaults.width,
                height: defaults.height,
                initial_precision: defaults.initial_precision,
                ..config
            };
            if let Err(e) = fallback.validate() {
                warn!("Ignoring precision ceiling: {e}");
                return SessionConfig {
                    zoom: ZoomConfig {
                        max_precision: None,
                        ..fallback.zoom
                    },
                    ..fallback
                };
            }
            return fallback;
        }
        config
    }

    /// Where snapshots are written.
    pub fn snapshot_directory(&self) -> PathBuf {
        if self.snapshot_dir.trim().is_empty() {
            crate::app_dir::snapshots_directory()
        } else {
            PathBuf::from(self.snapshot_dir.trim())
        }
    }
}

fn config_path() -> PathBuf {
    crate::app_dir::exe_directory().join("preferences.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_classic_run() {
        let prefs = AppPreferences::default();
        let config = prefs.session_config();
        assert_eq!((config.width, config.height), (800, 800));
        assert_eq!(config.params.max_iterations, 50);
        assert_eq!(config.initial_precision, 100);
        assert_eq!(config.zoom.zoom_factor, 1.0 / 1.1);
        assert_eq!(prefs.step_interval_ms, 50);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let prefs: AppPreferences =
            serde_json::from_str(r#"{"max_iterations": 120, "seed": 9}"#).unwrap();
        assert_eq!(prefs.max_iterations, 120);
        assert_eq!(prefs.seed, Some(9));
        assert_eq!(prefs.image_width, 800);
        assert!(prefs.show_hud);
    }

    #[test]
    fn invalid_values_fall_back() {
        let prefs = AppPreferences {
            zoom_factor: 1.5,
            max_iterations: 0,
            image_width: 0,
            ..AppPreferences::default()
        };
        let config = prefs.session_config();
        assert_eq!(config.zoom, ZoomConfig::default());
        assert_eq!(config.params, FractalParams::default());
        assert_eq!(config.width, 800);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn ceiling_below_initial_precision_is_dropped() {
        let prefs = AppPreferences {
            initial_precision: 100,
            max_precision: Some(80),
            zoom_factor: 0.5,
            ..AppPreferences::default()
        };
        let config = prefs.session_config();
        assert_eq!(config.zoom.max_precision, None);
        assert_eq!(config.zoom.zoom_factor, 0.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn round_trips_through_json() {
        let prefs = AppPreferences {
            max_precision: Some(512),
            arithmetic: ArithmeticMode::Precise,
            ..AppPreferences::default()
        };
        let json = serde_json::to_string(&prefs).unwrap();
        let back: AppPreferences = serde_json::from_str(&json).unwrap();
        assert_eq!(back, prefs);
    }
}
