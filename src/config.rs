//! Runtime configuration.
//!
//! Values are resolved from built-in defaults, an optional JSON config file,
//! `SPEEDTRAP_*` environment variables and finally command line flags.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Result, SpeedTrapError};
use crate::logging;
use crate::speed::{SpeedEvaluator, DEFAULT_DISTANCE, DEFAULT_SPEED_LIMIT};

pub const SPEED_LIMIT_ENV: &str = "SPEEDTRAP_SPEED_LIMIT";
pub const DISTANCE_ENV: &str = "SPEEDTRAP_DISTANCE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub speed_limit: f64,
    pub distance: f64,
    pub entry_log: PathBuf,
    pub exit_log: PathBuf,
    pub registry_path: PathBuf,
    pub seed_demo_vehicles: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            speed_limit: DEFAULT_SPEED_LIMIT,
            distance: DEFAULT_DISTANCE,
            entry_log: PathBuf::from("box_a.txt"),
            exit_log: PathBuf::from("box_b.txt"),
            registry_path: PathBuf::from("vehicle_registry.json"),
            seed_demo_vehicles: true,
        }
    }
}

/// Values given on the command line. `None` keeps the resolved value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub speed_limit: Option<f64>,
    pub distance: Option<f64>,
    pub entry_log: Option<PathBuf>,
    pub exit_log: Option<PathBuf>,
    pub registry_path: Option<PathBuf>,
}

impl Config {
    /// Resolve the effective configuration.
    ///
    /// An explicit config path must exist. Without one, `config.json` in the
    /// platform config directory is used when present.
    pub fn resolve(config_path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let (mut config, source) = match config_path {
            Some(path) => (Self::from_file(path)?, path.display().to_string()),
            None => match Self::default_path().filter(|path| path.exists()) {
                Some(path) => (Self::from_file(&path)?, path.display().to_string()),
                None => (Self::default(), "defaults".to_string()),
            },
        };

        config.apply_env()?;
        config.apply_overrides(overrides);
        config.validate()?;

        logging::log_config_resolved(config.speed_limit, config.distance, &source);
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                SpeedTrapError::missing_file(path.display().to_string())
            } else {
                SpeedTrapError::io_error("read config", Some(path.display().to_string()), e)
            }
        })?;

        serde_json::from_str(&contents)
            .map_err(|e| SpeedTrapError::invalid_config(path.display().to_string(), e.to_string()))
    }

    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "speedtrap")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    pub fn apply_env(&mut self) -> Result<()> {
        if let Some(limit) = read_env_number(SPEED_LIMIT_ENV)? {
            self.speed_limit = limit;
        }
        if let Some(distance) = read_env_number(DISTANCE_ENV)? {
            self.distance = distance;
        }
        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(limit) = overrides.speed_limit {
            self.speed_limit = limit;
        }
        if let Some(distance) = overrides.distance {
            self.distance = distance;
        }
        if let Some(path) = &overrides.entry_log {
            self.entry_log = path.clone();
        }
        if let Some(path) = &overrides.exit_log {
            self.exit_log = path.clone();
        }
        if let Some(path) = &overrides.registry_path {
            self.registry_path = path.clone();
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_positive("speed_limit", self.speed_limit)?;
        check_positive("distance", self.distance)
    }

    pub fn evaluator(&self) -> SpeedEvaluator {
        SpeedEvaluator::new(self.speed_limit, self.distance)
    }
}

fn check_positive(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SpeedTrapError::invalid_config(
            field,
            format!("must be a positive number, got {value}"),
        ))
    }
}

fn read_env_number(name: &str) -> Result<Option<f64>> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| SpeedTrapError::invalid_config(name, format!("'{raw}' is not a number"))),
        Err(_) => Ok(None),
    }
}
