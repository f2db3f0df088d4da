//! Registered vehicles and their body-type specific details.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, SpeedTrapError};
use crate::ticket::SpeedTicket;

/// Year of the first production motor car.
const EARLIEST_MODEL_YEAR: u16 = 1886;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WheelDrive {
    #[serde(rename = "2wd")]
    Two,
    #[serde(rename = "4wd")]
    Four,
}

impl WheelDrive {
    pub fn wheels(self) -> u8 {
        match self {
            Self::Two => 2,
            Self::Four => 4,
        }
    }
}

impl TryFrom<u8> for WheelDrive {
    type Error = SpeedTrapError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            2 => Ok(Self::Two),
            4 => Ok(Self::Four),
            other => Err(SpeedTrapError::invalid_vehicle(
                "drive",
                format!("expected 2 or 4, got {other}"),
            )),
        }
    }
}

impl std::str::FromStr for WheelDrive {
    type Err = SpeedTrapError;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_ascii_lowercase();
        let digits = lowered.strip_suffix("wd").unwrap_or(&lowered).trim();
        let value: u8 = digits.parse().map_err(|_| {
            SpeedTrapError::invalid_vehicle("drive", format!("expected 2 or 4, got '{s}'"))
        })?;
        Self::try_from(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum VehicleKind {
    Car { doors: u8 },
    Truck { drive: WheelDrive },
    Suv { passengers: u8 },
}

impl VehicleKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Car { .. } => "Car",
            Self::Truck { .. } => "Truck",
            Self::Suv { .. } => "SUV",
        }
    }
}

impl fmt::Display for VehicleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Car { doors } => write!(f, "{doors} doors"),
            Self::Truck { drive } => write!(f, "{} WD", drive.wheels()),
            Self::Suv { passengers } => write!(f, "{passengers} passengers"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub make: String,
    pub year: u16,
    pub mileage: u32,
    pub price: f64,
    pub registration: String,
    #[serde(flatten)]
    pub kind: VehicleKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket: Option<SpeedTicket>,
}

impl Vehicle {
    pub fn new(
        make: impl Into<String>,
        year: u16,
        mileage: u32,
        price: f64,
        registration: impl AsRef<str>,
        kind: VehicleKind,
    ) -> Self {
        let make: String = make.into();
        Self {
            make: make.trim().to_string(),
            year,
            mileage,
            price,
            registration: normalize_registration(registration.as_ref()),
            kind,
            ticket: None,
        }
    }

    pub fn car(
        make: impl Into<String>,
        year: u16,
        mileage: u32,
        price: f64,
        registration: impl AsRef<str>,
        doors: u8,
    ) -> Self {
        Self::new(make, year, mileage, price, registration, VehicleKind::Car { doors })
    }

    pub fn truck(
        make: impl Into<String>,
        year: u16,
        mileage: u32,
        price: f64,
        registration: impl AsRef<str>,
        drive: WheelDrive,
    ) -> Self {
        Self::new(make, year, mileage, price, registration, VehicleKind::Truck { drive })
    }

    pub fn suv(
        make: impl Into<String>,
        year: u16,
        mileage: u32,
        price: f64,
        registration: impl AsRef<str>,
        passengers: u8,
    ) -> Self {
        Self::new(
            make,
            year,
            mileage,
            price,
            registration,
            VehicleKind::Suv { passengers },
        )
    }

    pub fn kind_label(&self) -> &'static str {
        self.kind.label()
    }

    /// Case-insensitive comparison against the full make name.
    pub fn matches_make(&self, make: &str) -> bool {
        self.make.to_lowercase() == make.trim().to_lowercase()
    }

    pub fn validate(&self) -> Result<()> {
        if self.make.trim().is_empty() {
            return Err(SpeedTrapError::invalid_vehicle("make", "must not be empty"));
        }
        if self.registration.trim().is_empty() {
            return Err(SpeedTrapError::invalid_vehicle(
                "registration",
                "must not be empty",
            ));
        }

        let latest_year = (chrono::Utc::now().year() + 1) as u16;
        if !(EARLIEST_MODEL_YEAR..=latest_year).contains(&self.year) {
            return Err(SpeedTrapError::invalid_vehicle(
                "year",
                format!("must be between {EARLIEST_MODEL_YEAR} and {latest_year}"),
            ));
        }

        if !self.price.is_finite() || self.price < 0.0 {
            return Err(SpeedTrapError::invalid_vehicle(
                "price",
                "must be a non-negative amount",
            ));
        }

        match self.kind {
            VehicleKind::Car { doors } if !(1..=9).contains(&doors) => Err(
                SpeedTrapError::invalid_vehicle("doors", "must be between 1 and 9"),
            ),
            VehicleKind::Suv { passengers } if !(1..=99).contains(&passengers) => Err(
                SpeedTrapError::invalid_vehicle("passengers", "must be between 1 and 99"),
            ),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ticket = match &self.ticket {
            Some(ticket) => ticket.to_string(),
            None => "none".to_string(),
        };
        write!(
            f,
            "Vehicle: {},{},{},{:.2},{},tickets: {}, {}",
            self.make, self.year, self.mileage, self.price, self.registration, ticket, self.kind
        )
    }
}

/// Registrations typed by a user are compared upper-cased.
pub fn normalize_registration(registration: &str) -> String {
    registration.trim().to_uppercase()
}
