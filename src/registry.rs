//! Persistent vehicle registry.
//!
//! The registry is stored as a single JSON document and rewritten in full on
//! every save.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::error::{Result, SpeedTrapError};
use crate::logging;
use crate::ticket::SpeedTicket;
use crate::vehicle::{normalize_registration, Vehicle, WheelDrive};

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct RegistryDocument {
    version: u32,
    #[serde(default)]
    vehicles: Vec<Vehicle>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    vehicles: Vec<Vehicle>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the registry. A missing or empty file gives an empty registry.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No vehicle registry yet, starting empty");
                return Ok(Self::new());
            }
            Err(e) => {
                return Err(SpeedTrapError::io_error(
                    "read vehicle registry",
                    Some(path.display().to_string()),
                    e,
                ))
            }
        };

        if contents.trim().is_empty() {
            tracing::warn!(path = %path.display(), "Vehicle registry contains no data");
            return Ok(Self::new());
        }

        let document: RegistryDocument = serde_json::from_str(&contents).map_err(|e| {
            SpeedTrapError::registry_corrupt(path.display().to_string(), e.to_string())
        })?;

        if document.version != FORMAT_VERSION {
            return Err(SpeedTrapError::registry_corrupt(
                path.display().to_string(),
                format!("unsupported format version {}", document.version),
            ));
        }

        Ok(Self {
            vehicles: document.vehicles,
        })
    }

    /// Write the registry as pretty JSON, replacing the file atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let document = RegistryDocument {
            version: FORMAT_VERSION,
            vehicles: self.vehicles.clone(),
        };
        let json = serde_json::to_string_pretty(&document)?;

        write_atomic(path, json.as_bytes()).map_err(|e| {
            SpeedTrapError::io_error(
                "save vehicle registry",
                Some(path.display().to_string()),
                e,
            )
        })?;

        logging::log_registry_save(path, self.vehicles.len());
        Ok(())
    }

    pub fn add(&mut self, vehicle: Vehicle) -> Result<()> {
        vehicle.validate()?;
        if self.get(&vehicle.registration).is_some() {
            return Err(SpeedTrapError::duplicate_registration(
                vehicle.registration,
            ));
        }
        tracing::debug!(
            registration = %vehicle.registration,
            kind = vehicle.kind_label(),
            "Vehicle registered"
        );
        self.vehicles.push(vehicle);
        Ok(())
    }

    /// Add the vehicle unless its registration is already known.
    pub fn ensure(&mut self, vehicle: Vehicle) -> bool {
        if self.get(&vehicle.registration).is_some() {
            return false;
        }
        self.vehicles.push(vehicle);
        true
    }

    /// Register the three demo vehicles if they are not there yet.
    pub fn seed_demo_vehicles(&mut self) -> usize {
        demo_vehicles()
            .into_iter()
            .filter(|vehicle| self.ensure(vehicle.clone()))
            .count()
    }

    pub fn get(&self, registration: &str) -> Option<&Vehicle> {
        let registration = normalize_registration(registration);
        self.vehicles
            .iter()
            .find(|vehicle| vehicle.registration == registration)
    }

    pub fn get_mut(&mut self, registration: &str) -> Option<&mut Vehicle> {
        let registration = normalize_registration(registration);
        self.vehicles
            .iter_mut()
            .find(|vehicle| vehicle.registration == registration)
    }

    /// Vehicles of the given make, one per distinct make spelling.
    pub fn find_by_make(&self, make: &str) -> Vec<&Vehicle> {
        let mut seen = HashSet::new();
        let mut found = Vec::new();
        for vehicle in &self.vehicles {
            if vehicle.matches_make(make) && seen.insert(vehicle.make.as_str()) {
                found.push(vehicle);
            }
        }
        found
    }

    /// Attach a ticket to the matching vehicle. Returns false when none matches.
    pub fn attach_ticket(&mut self, ticket: SpeedTicket) -> bool {
        match self.get_mut(&ticket.registration) {
            Some(vehicle) => {
                vehicle.ticket = Some(ticket);
                true
            }
            None => false,
        }
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }
}

pub fn demo_vehicles() -> Vec<Vehicle> {
    vec![
        Vehicle::car("BMW 320", 2001, 70000, 15000.0, "NB72826", 4),
        Vehicle::truck(
            "Toyota RAV4",
            2002,
            40000,
            12000.0,
            "ZH85499",
            WheelDrive::Four,
        ),
        Vehicle::suv("Volvo XC60", 2010, 30000, 18500.0, "DA49644", 5),
    ]
}

fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let temp_file = NamedTempFile::new_in(parent)?;
    fs::write(temp_file.path(), contents)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(temp_file.path())?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(temp_file.path(), perms)?;
    }

    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
