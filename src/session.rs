use std::collections::BTreeMap;

use crate::config::Config;
use crate::error::Result;
use crate::registry::Registry;
use crate::speed::{check_logs, SpeedCheck, SpeedViolation};
use crate::ticket::SpeedTicket;
use crate::vehicle::{normalize_registration, Vehicle};

#[derive(Debug, Clone, PartialEq)]
pub enum TicketOutcome {
    /// The speeder is registered and now carries the ticket.
    Issued(SpeedTicket),
    /// The registration was caught speeding but is not in the registry.
    Unregistered(SpeedTicket),
    NoViolation,
}

/// Registry plus the speed check computed once when the session opens.
#[derive(Debug)]
pub struct Session {
    config: Config,
    registry: Registry,
    check: SpeedCheck,
}

impl Session {
    /// Load the registry and evaluate both checkpoint logs.
    pub fn open(config: Config) -> Result<Self> {
        let mut registry = Registry::load(&config.registry_path)?;
        if config.seed_demo_vehicles {
            let seeded = registry.seed_demo_vehicles();
            if seeded > 0 {
                tracing::debug!(seeded = seeded, "Seeded demo vehicles");
            }
        }

        let check = check_logs(&config.entry_log, &config.exit_log, &config.evaluator());
        Ok(Self::new(config, registry, check))
    }

    pub fn new(config: Config, registry: Registry, check: SpeedCheck) -> Self {
        Self {
            config,
            registry,
            check,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn speed_check(&self) -> &SpeedCheck {
        &self.check
    }

    pub fn violations(&self) -> &BTreeMap<String, SpeedViolation> {
        &self.check.report.violations
    }

    /// Register a vehicle and persist the registry.
    pub fn add_vehicle(&mut self, vehicle: Vehicle) -> Result<()> {
        self.registry.add(vehicle)?;
        self.save()
    }

    pub fn find_by_make(&self, make: &str) -> Vec<&Vehicle> {
        self.registry.find_by_make(make)
    }

    /// Turn a recorded violation into a ticket on the matching vehicle.
    pub fn issue_ticket(&mut self, registration: &str) -> Result<TicketOutcome> {
        let registration = normalize_registration(registration);
        let Some(violation) = self.violations().get(&registration) else {
            return Ok(TicketOutcome::NoViolation);
        };

        let ticket = SpeedTicket::from_violation(violation, self.config.speed_limit);
        if self.registry.attach_ticket(ticket.clone()) {
            self.save()?;
            Ok(TicketOutcome::Issued(ticket))
        } else {
            Ok(TicketOutcome::Unregistered(ticket))
        }
    }

    pub fn save(&self) -> Result<()> {
        self.registry.save(&self.config.registry_path)
    }
}
