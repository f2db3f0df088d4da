//! Non-interactive subcommands.
//!
//! Each command owns the resolved [`Config`] and prints its results to
//! stdout; load diagnostics go to stderr.

use colored::Colorize;
use std::io;

use crate::config::Config;
use crate::error::Result;
use crate::menu::{self, TerminalPrompter};
use crate::session::{Session, TicketOutcome};
use crate::speed::check_logs;
use crate::vehicle::Vehicle;

/// Evaluate both checkpoint logs and print every speeder
pub struct CheckCommand {
    config: Config,
    verbose: bool,
}

impl CheckCommand {
    pub fn new(config: Config, verbose: bool) -> Self {
        Self { config, verbose }
    }

    pub fn execute(&self) -> Result<()> {
        let evaluator = self.config.evaluator();
        let check = check_logs(&self.config.entry_log, &self.config.exit_log, &evaluator);

        for diagnostic in check.diagnostics() {
            eprintln!("{diagnostic}");
        }

        println!(
            "{} limit {} (tolerance {:.3}), distance {}",
            "🚦 Speed check:".blue().bold(),
            evaluator.speed_limit(),
            evaluator.tolerance_threshold(),
            evaluator.distance()
        );

        if self.verbose {
            println!(
                "  {} {} records from {}, {} from {}",
                "ℹ".blue(),
                check.entry.table.len(),
                self.config.entry_log.display(),
                check.exit.table.len(),
                self.config.exit_log.display()
            );
        }

        let report = &check.report;
        if report.violations.is_empty() {
            println!("No speed violations found.");
        }
        for violation in report.violations.values() {
            println!(
                "{} {}: {:.3} at {}",
                "→".red(),
                violation.registration.yellow(),
                violation.average_speed,
                violation.exit_timestamp
            );
        }

        for registration in &report.instantaneous {
            println!(
                "{} {}: same timestamp at both checkpoints, speed not computed",
                "⚠".yellow(),
                registration.yellow()
            );
        }

        println!(
            "Total: {} violation(s) among {} vehicle(s) seen at both checkpoints",
            report.violations.len().to_string().green(),
            report.evaluated
        );
        Ok(())
    }
}

/// List every registered vehicle
pub struct ListCommand {
    config: Config,
}

impl ListCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<()> {
        let session = Session::open(self.config.clone())?;
        let vehicles = session.registry().vehicles();

        if vehicles.is_empty() {
            println!("No vehicles registered yet.");
            return Ok(());
        }

        println!("{}", "The following cars are in inventory:".blue().bold());
        for vehicle in vehicles {
            println!("{vehicle}");
        }
        println!("Total: {} vehicle(s)", vehicles.len().to_string().green());
        Ok(())
    }
}

/// Find registered vehicles by make
pub struct FindCommand {
    config: Config,
}

impl FindCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn execute(&self, make: &str) -> Result<()> {
        let session = Session::open(self.config.clone())?;
        let found = session.find_by_make(make);

        if found.is_empty() {
            println!("No vehicle found");
        }
        for vehicle in found {
            println!("{vehicle}");
        }
        Ok(())
    }
}

/// Register a new vehicle
pub struct AddCommand {
    config: Config,
}

impl AddCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn execute(&self, vehicle: Vehicle) -> Result<()> {
        let mut session = Session::open(self.config.clone())?;
        let summary = vehicle.to_string();
        session.add_vehicle(vehicle)?;
        println!("{} Registered {}", "✓".green(), summary);
        Ok(())
    }
}

/// Attach a speed ticket to a registered speeder
pub struct TicketCommand {
    config: Config,
}

impl TicketCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn execute(&self, registration: &str) -> Result<()> {
        let mut session = Session::open(self.config.clone())?;
        for diagnostic in session.speed_check().diagnostics() {
            eprintln!("{diagnostic}");
        }

        match session.issue_ticket(registration)? {
            TicketOutcome::Issued(ticket) => {
                println!(
                    "{} Speed ticket associated with {}",
                    "✓".green(),
                    ticket.registration.cyan()
                );
                println!("  {ticket}");
            }
            TicketOutcome::Unregistered(ticket) => {
                println!(
                    "{} Speeder {} is not in the registry",
                    "⚠".yellow(),
                    ticket.registration.cyan()
                );
                println!("  {ticket}");
            }
            TicketOutcome::NoViolation => println!("No speed ticket found"),
        }
        Ok(())
    }
}

/// Start the interactive menu
pub struct MenuCommand {
    config: Config,
}

impl MenuCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<()> {
        let mut session = Session::open(self.config.clone())?;
        for diagnostic in session.speed_check().diagnostics() {
            eprintln!("{diagnostic}");
        }

        let mut stdout = io::stdout();
        menu::run(&mut session, &mut TerminalPrompter, &mut stdout)
    }
}
