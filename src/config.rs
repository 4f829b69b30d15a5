//! Application-level configuration loading: table geometry, sensor calibration and
//! runtime knobs of the visualization service.

use std::{
    env, fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};
use validator::{Validate, ValidationErrors};

use crate::{
    engine::{EngineSettings, RenderTarget, TrailSettings, motion},
    error::EngineError,
    geometry::{RealDimensions, SensorDomain, Viewport},
    state::goal_detector::GOAL_COOLDOWN,
};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "HOCKEY_VIZ_CONFIG_PATH";
const DEFAULT_FRAME_RATE_HZ: u32 = 60;

/// Reasons a configuration file could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(#[from] io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(#[from] ValidationErrors),
    #[error("invalid viewport: {0}")]
    Viewport(#[from] EngineError),
}

/// Immutable runtime configuration shared across the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    engine: EngineSettings,
    frame_interval: Duration,
    viewport: Viewport,
    render_targets: Vec<RenderTarget>,
    demo_mode: bool,
    goal_report_url: Option<String>,
}

impl AppConfig {
    /// Load the configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match Self::load_from(&path) {
            Ok(config) => {
                info!(
                    path = %path.display(),
                    table_length = config.engine.dimensions.table_length,
                    table_width = config.engine.dimensions.table_width,
                    demo_mode = config.demo_mode,
                    "loaded visualization config"
                );
                config
            }
            Err(ConfigError::Read(err)) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "unusable config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Read, parse and validate the configuration file at `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let raw: RawConfig = serde_json::from_str(&contents)?;
        raw.validate()?;
        Self::try_from(raw)
    }

    pub fn engine_settings(&self) -> &EngineSettings {
        &self.engine
    }

    /// Delay between two render ticks.
    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Viewport used until the first resize request.
    pub fn initial_viewport(&self) -> Viewport {
        self.viewport
    }

    /// Targets exposed by the broadcast surface.
    pub fn render_targets(&self) -> &[RenderTarget] {
        &self.render_targets
    }

    /// Whether the synthetic sensor feed should run.
    pub fn demo_mode(&self) -> bool {
        self.demo_mode
    }

    /// Base URL of the scoring backend, if goals should be reported.
    pub fn goal_report_url(&self) -> Option<&str> {
        self.goal_report_url.as_deref()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engine: EngineSettings::default(),
            frame_interval: frame_interval(DEFAULT_FRAME_RATE_HZ),
            viewport: Viewport::default(),
            render_targets: RenderTarget::ALL.to_vec(),
            demo_mode: false,
            goal_report_url: None,
        }
    }
}

/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
#[derive(Debug, Deserialize, Validate)]
#[serde(default)]
struct RawConfig {
    #[validate(nested)]
    table: RealDimensions,
    #[validate(nested)]
    sensor: SensorDomain,
    #[validate(range(min = 1))]
    goal_cooldown_ms: u64,
    #[validate(range(min = 1, max = 240))]
    frame_rate_hz: u32,
    #[validate(nested)]
    viewport: RawViewport,
    /// Defaults to one pusher diameter when omitted.
    #[validate(range(exclusive_min = 0.0))]
    hit_radius: Option<f64>,
    render_targets: Vec<RenderTarget>,
    #[validate(nested)]
    trails: RawTrails,
    demo_mode: bool,
    #[validate(url)]
    goal_report_url: Option<String>,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            table: RealDimensions::default(),
            sensor: SensorDomain::default(),
            goal_cooldown_ms: GOAL_COOLDOWN.as_millis() as u64,
            frame_rate_hz: DEFAULT_FRAME_RATE_HZ,
            viewport: RawViewport::default(),
            hit_radius: None,
            render_targets: RenderTarget::ALL.to_vec(),
            trails: RawTrails::default(),
            demo_mode: false,
            goal_report_url: None,
        }
    }
}

impl TryFrom<RawConfig> for AppConfig {
    type Error = ConfigError;

    fn try_from(value: RawConfig) -> Result<Self, Self::Error> {
        let engine = EngineSettings {
            dimensions: value.table,
            sensor: value.sensor,
            goal_cooldown: Duration::from_millis(value.goal_cooldown_ms),
            hit_radius: value.hit_radius.unwrap_or(value.table.pusher_diameter),
            trails: TrailSettings {
                capacity: value.trails.capacity,
                max_age: Duration::from_millis(value.trails.max_age_ms),
            },
        };
        Ok(Self {
            engine,
            frame_interval: frame_interval(value.frame_rate_hz),
            viewport: Viewport::new(value.viewport.width, value.viewport.height)?,
            render_targets: value.render_targets,
            demo_mode: value.demo_mode,
            goal_report_url: value
                .goal_report_url
                .map(|url| url.trim_end_matches('/').to_string()),
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(default)]
struct RawViewport {
    #[validate(range(exclusive_min = 0.0))]
    width: f64,
    #[validate(range(exclusive_min = 0.0))]
    height: f64,
}

impl Default for RawViewport {
    fn default() -> Self {
        let viewport = Viewport::default();
        Self {
            width: viewport.width(),
            height: viewport.height(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(default)]
struct RawTrails {
    #[validate(range(min = 1))]
    capacity: usize,
    #[validate(range(min = 1))]
    max_age_ms: u64,
}

impl Default for RawTrails {
    fn default() -> Self {
        Self {
            capacity: motion::DEFAULT_TRAIL_CAPACITY,
            max_age_ms: motion::DEFAULT_TRAIL_MAX_AGE.as_millis() as u64,
        }
    }
}

fn frame_interval(rate_hz: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(rate_hz.max(1)))
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn empty_object_yields_defaults() {
        let file = write_config("{}");
        let config = AppConfig::load_from(file.path()).unwrap();

        assert_eq!(config.engine_settings(), &EngineSettings::default());
        assert_eq!(config.initial_viewport(), Viewport::default());
        assert_eq!(config.render_targets(), RenderTarget::ALL.as_slice());
        assert!(!config.demo_mode());
        assert!(config.goal_report_url().is_none());
    }

    #[test]
    fn partial_table_overrides_keep_other_defaults() {
        let file = write_config(
            r#"{
                "table": { "table_length": 100, "table_width": 50, "goal_length": 20 },
                "sensor": { "width": 1280 },
                "frame_rate_hz": 30,
                "demo_mode": true,
                "goal_report_url": "http://192.168.0.10:3000/"
            }"#,
        );
        let config = AppConfig::load_from(file.path()).unwrap();
        let engine = config.engine_settings();

        assert_eq!(engine.dimensions.table_length, 100.0);
        assert_eq!(engine.dimensions.puck_diameter, 4.0);
        assert_eq!(engine.sensor.width, 1280.0);
        assert_eq!(engine.sensor.height, 400.0);
        assert_eq!(engine.hit_radius, 5.0);
        assert!(config.demo_mode());
        assert_eq!(config.goal_report_url(), Some("http://192.168.0.10:3000"));
        assert!((config.frame_interval().as_secs_f64() - 1.0 / 30.0).abs() < 1e-9);
    }

    #[test]
    fn invalid_geometry_is_rejected() {
        let file = write_config(r#"{ "table": { "table_length": 20, "table_width": 26 } }"#);
        assert!(matches!(
            AppConfig::load_from(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn invalid_frame_rate_is_rejected() {
        let file = write_config(r#"{ "frame_rate_hz": 0 }"#);
        assert!(matches!(
            AppConfig::load_from(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let file = write_config("{ table: ");
        assert!(matches!(
            AppConfig::load_from(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn unknown_render_target_is_a_parse_error() {
        let file = write_config(r#"{ "render_targets": ["table", "scoreboard"] }"#);
        assert!(matches!(
            AppConfig::load_from(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load_from(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(ConfigError::Read(err)) if err.kind() == ErrorKind::NotFound));
    }
}
