//! Interactive menu over a [`Session`].
//!
//! Input goes through the [`Prompter`] trait so the loop can be driven by
//! scripted answers in tests; [`TerminalPrompter`] is the `dialoguer` version.

use colored::Colorize;
use dialoguer::{Input, Select};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::error::{Result, SpeedTrapError};
use crate::session::{Session, TicketOutcome};
use crate::vehicle::{Vehicle, VehicleKind, WheelDrive};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    NewCar,
    NewTruck,
    NewSuv,
    FindVehicle,
    ShowVehicles,
    Quit,
    ShowSpeedTickets,
}

impl MenuChoice {
    /// Display order. Speed tickets were added after quit got its number.
    pub const ALL: [MenuChoice; 7] = [
        MenuChoice::NewCar,
        MenuChoice::NewTruck,
        MenuChoice::NewSuv,
        MenuChoice::FindVehicle,
        MenuChoice::ShowVehicles,
        MenuChoice::ShowSpeedTickets,
        MenuChoice::Quit,
    ];

    pub fn number(self) -> u8 {
        match self {
            Self::NewCar => 1,
            Self::NewTruck => 2,
            Self::NewSuv => 3,
            Self::FindVehicle => 4,
            Self::ShowVehicles => 5,
            Self::Quit => 6,
            Self::ShowSpeedTickets => 7,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::NewCar => "New car",
            Self::NewTruck => "New truck",
            Self::NewSuv => "New SUV",
            Self::FindVehicle => "Find vehicles by make",
            Self::ShowVehicles => "Show all vehicles",
            Self::Quit => "Quit",
            Self::ShowSpeedTickets => "Show speed tickets",
        }
    }
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}) {}", self.number(), self.label())
    }
}

pub trait Prompter {
    /// Pick one of `items`, returning its index.
    fn select(&mut self, prompt: &str, items: &[String]) -> Result<usize>;

    fn input(&mut self, prompt: &str) -> Result<String>;
}

pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn select(&mut self, prompt: &str, items: &[String]) -> Result<usize> {
        Ok(Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact()?)
    }

    fn input(&mut self, prompt: &str) -> Result<String> {
        Ok(Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?)
    }
}

/// Run the menu until the user quits, then save the registry.
pub fn run(session: &mut Session, prompter: &mut dyn Prompter, out: &mut dyn Write) -> Result<()> {
    let items: Vec<String> = MenuChoice::ALL.iter().map(|c| c.to_string()).collect();

    loop {
        writeln!(out, "{}", " MENU".bold())?;
        let index = prompter.select("Enter your choice", &items)?;
        let choice = *MenuChoice::ALL
            .get(index)
            .ok_or_else(|| anyhow::anyhow!("menu selection {index} is out of range"))?;

        if choice == MenuChoice::Quit {
            session.save()?;
            writeln!(out, "Exiting the program...")?;
            return Ok(());
        }

        match handle(choice, session, prompter, out) {
            Ok(()) => {}
            Err(
                e @ (SpeedTrapError::InvalidVehicle { .. }
                | SpeedTrapError::DuplicateRegistration { .. }),
            ) => writeln!(out, "{e}")?,
            Err(e) => return Err(e),
        }
    }
}

fn handle(
    choice: MenuChoice,
    session: &mut Session,
    prompter: &mut dyn Prompter,
    out: &mut dyn Write,
) -> Result<()> {
    match choice {
        MenuChoice::NewCar | MenuChoice::NewTruck | MenuChoice::NewSuv => {
            writeln!(out, "{} {}", "→".green(), choice.label())?;
            let vehicle = prompt_vehicle(prompter, choice)?;
            let summary = vehicle.to_string();
            session.add_vehicle(vehicle)?;
            writeln!(out, "{} Registered {}", "✓".green(), summary)?;
        }
        MenuChoice::FindVehicle => {
            let make = prompter.input("Enter name")?;
            let found = session.find_by_make(&make);
            if found.is_empty() {
                writeln!(out, "No vehicle found")?;
            }
            for vehicle in found {
                writeln!(out, "{vehicle}")?;
            }
        }
        MenuChoice::ShowVehicles => {
            writeln!(out, "The following cars are in inventory:")?;
            for vehicle in session.registry().vehicles() {
                writeln!(out, "{vehicle}")?;
            }
        }
        MenuChoice::ShowSpeedTickets => {
            let registration = prompter.input("Enter license plate number")?;
            match session.issue_ticket(&registration)? {
                TicketOutcome::Issued(ticket) => {
                    writeln!(
                        out,
                        "{} Speed ticket associated with {}",
                        "✓".green(),
                        ticket.registration.cyan()
                    )?;
                    if let Some(vehicle) = session.registry().get(&ticket.registration) {
                        writeln!(out, "{vehicle}")?;
                    }
                }
                TicketOutcome::Unregistered(ticket) => {
                    writeln!(
                        out,
                        "{} Speeder {} is not in the registry ({})",
                        "⚠".yellow(),
                        ticket.registration.cyan(),
                        ticket
                    )?;
                }
                TicketOutcome::NoViolation => writeln!(out, "No speed ticket found")?,
            }
        }
        MenuChoice::Quit => {}
    }
    Ok(())
}

fn prompt_vehicle(prompter: &mut dyn Prompter, choice: MenuChoice) -> Result<Vehicle> {
    let make = prompter.input("Make")?;
    let year = parse_field("year", &prompter.input("Year")?)?;
    let mileage = parse_field("mileage", &prompter.input("Mileage")?)?;
    let price = parse_field("price", &prompter.input("Price")?)?;
    let registration = prompter.input("License plate number")?;

    let kind = match choice {
        MenuChoice::NewTruck => VehicleKind::Truck {
            drive: prompter.input("WD (2 or 4)")?.parse::<WheelDrive>()?,
        },
        MenuChoice::NewSuv => VehicleKind::Suv {
            passengers: parse_field("passengers", &prompter.input("Passengers")?)?,
        },
        _ => VehicleKind::Car {
            doors: parse_field("doors", &prompter.input("Doors")?)?,
        },
    };

    Ok(Vehicle::new(make, year, mileage, price, registration, kind))
}

fn parse_field<T: FromStr>(field: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| SpeedTrapError::invalid_vehicle(field, format!("'{}' is not a valid number", raw.trim())))
}
