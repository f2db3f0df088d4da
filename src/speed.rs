//! Average speed enforcement between two checkpoints.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::checkpoint::{load_checkpoints, CheckpointTable, LoadReport};
use crate::error::{Result, SpeedTrapError};
use crate::logging;

/// Grace margin applied on top of the posted limit before a ticket is due.
pub const GRACE_FACTOR: f64 = 1.05;

pub const DEFAULT_SPEED_LIMIT: f64 = 60.0;
pub const DEFAULT_DISTANCE: f64 = 5.0;

const SECONDS_PER_HOUR: f64 = 3600.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedViolation {
    pub registration: String,
    pub average_speed: f64,
    /// Passage time at the exit checkpoint, as written in the log.
    pub exit_timestamp: String,
}

/// Outcome of evaluating two checkpoint tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeedReport {
    pub violations: BTreeMap<String, SpeedViolation>,
    /// Registrations seen at both checkpoints with the same timestamp.
    pub instantaneous: Vec<String>,
    /// Registrations present in both tables.
    pub evaluated: usize,
}

impl SpeedReport {
    pub fn get(&self, registration: &str) -> Option<&SpeedViolation> {
        self.violations.get(registration)
    }

    pub fn is_speeder(&self, registration: &str) -> bool {
        self.violations.contains_key(registration)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedEvaluator {
    speed_limit: f64,
    distance: f64,
}

impl Default for SpeedEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_SPEED_LIMIT, DEFAULT_DISTANCE)
    }
}

impl SpeedEvaluator {
    /// `distance` and the resulting speeds share one unit (km or miles).
    pub fn new(speed_limit: f64, distance: f64) -> Self {
        Self {
            speed_limit,
            distance,
        }
    }

    pub fn speed_limit(&self) -> f64 {
        self.speed_limit
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn tolerance_threshold(&self) -> f64 {
        self.speed_limit * GRACE_FACTOR
    }

    /// Average speed over the checkpoint distance, rounded to 3 decimals.
    pub fn average_speed(&self, registration: &str, elapsed_seconds: f64) -> Result<f64> {
        if elapsed_seconds <= 0.0 {
            return Err(SpeedTrapError::instantaneous_transit(registration));
        }
        Ok(round3(self.distance / (elapsed_seconds / SECONDS_PER_HOUR)))
    }

    pub fn is_violation(&self, average_speed: f64) -> bool {
        average_speed > self.tolerance_threshold()
    }

    pub fn evaluate(&self, entry: &CheckpointTable, exit: &CheckpointTable) -> SpeedReport {
        let mut report = SpeedReport::default();

        for first in entry.iter() {
            let Some(second) = exit.get(&first.registration) else {
                continue;
            };
            report.evaluated += 1;

            let elapsed = elapsed_seconds(first.timestamp, second.timestamp);
            let average_speed = match self.average_speed(&first.registration, elapsed) {
                Ok(speed) => speed,
                Err(e) => {
                    tracing::warn!(registration = %first.registration, "{}", e);
                    report.instantaneous.push(first.registration.clone());
                    continue;
                }
            };

            if self.is_violation(average_speed) {
                logging::log_violation(
                    &first.registration,
                    average_speed,
                    self.tolerance_threshold(),
                );
                report.violations.insert(
                    first.registration.clone(),
                    SpeedViolation {
                        registration: first.registration.clone(),
                        average_speed,
                        exit_timestamp: second.raw_timestamp.clone(),
                    },
                );
            }
        }

        report.instantaneous.sort();
        report
    }
}

/// Absolute time between two passages, with sub-second precision.
pub fn elapsed_seconds(first: NaiveDateTime, second: NaiveDateTime) -> f64 {
    let delta = second - first;
    let seconds = match delta.num_microseconds() {
        Some(micros) => micros as f64 / 1_000_000.0,
        None => delta.num_seconds() as f64,
    };
    seconds.abs()
}

/// Round to 3 decimal places, ties to even on the exact binary value.
pub fn round3(value: f64) -> f64 {
    format!("{value:.3}").parse().unwrap_or(value)
}

/// Both checkpoint loads plus the evaluation built from them.
#[derive(Debug, Clone)]
pub struct SpeedCheck {
    pub entry: LoadReport,
    pub exit: LoadReport,
    pub report: SpeedReport,
}

impl SpeedCheck {
    pub fn diagnostics(&self) -> Vec<SpeedTrapError> {
        let mut diagnostics = self.entry.diagnostics();
        diagnostics.extend(self.exit.diagnostics());
        diagnostics
    }
}

/// Load both logs and flag speeders. Missing or broken logs yield fewer results, never an error.
pub fn check_logs(entry_log: &Path, exit_log: &Path, evaluator: &SpeedEvaluator) -> SpeedCheck {
    let entry = load_checkpoints(entry_log);
    let exit = load_checkpoints(exit_log);
    let report = evaluator.evaluate(&entry.table, &exit.table);
    SpeedCheck {
        entry,
        exit,
        report,
    }
}
