use serde::{Deserialize, Serialize};
use std::fmt;

use crate::speed::SpeedViolation;

/// A speeding offence attached to a registered vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedTicket {
    pub registration: String,
    pub offence_time: String,
    pub speed: f64,
    pub speed_limit: f64,
}

impl SpeedTicket {
    pub fn new(
        registration: impl Into<String>,
        offence_time: impl Into<String>,
        speed: f64,
        speed_limit: f64,
    ) -> Self {
        Self {
            registration: registration.into(),
            offence_time: offence_time.into(),
            speed,
            speed_limit,
        }
    }

    pub fn from_violation(violation: &SpeedViolation, speed_limit: f64) -> Self {
        Self::new(
            violation.registration.clone(),
            violation.exit_timestamp.trim(),
            violation.average_speed,
            speed_limit,
        )
    }

    /// Offence time, measured speed and posted limit.
    pub fn details(&self) -> (&str, f64, f64) {
        (&self.offence_time, self.speed, self.speed_limit)
    }
}

impl fmt::Display for SpeedTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}",
            self.registration, self.offence_time, self.speed, self.speed_limit
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_violation() {
        let violation = SpeedViolation {
            registration: "ABC123".to_string(),
            average_speed: 150.0,
            exit_timestamp: "2024-01-01T10:02:00".to_string(),
        };
        let ticket = SpeedTicket::from_violation(&violation, 60.0);
        assert_eq!(ticket.registration, "ABC123");
        assert_eq!(ticket.details(), ("2024-01-01T10:02:00", 150.0, 60.0));
    }

    #[test]
    fn test_display() {
        let ticket = SpeedTicket::new("ABC123", "2024-01-01T10:02:00", 150.0, 60.0);
        assert_eq!(ticket.to_string(), "ABC123, 2024-01-01T10:02:00, 150, 60");
    }
}
