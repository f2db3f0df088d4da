use clap::{Args, Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::process;

use speedtrap::commands::{
    AddCommand, CheckCommand, FindCommand, ListCommand, MenuCommand, TicketCommand,
};
use speedtrap::config::{Config, ConfigOverrides};
use speedtrap::error::Result;
use speedtrap::logging;
use speedtrap::vehicle::{Vehicle, WheelDrive};

#[derive(Parser)]
#[command(name = "speedtrap")]
#[command(version = "0.1.0")]
#[command(about = "Vehicle registry with average speed checks between two checkpoints", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, help = "Enable verbose output", global = true)]
    verbose: bool,

    #[arg(long, help = "Path to a JSON config file", global = true)]
    config: Option<PathBuf>,

    #[arg(long, help = "Posted speed limit", global = true)]
    speed_limit: Option<f64>,

    #[arg(long, help = "Distance between the two checkpoints", global = true)]
    distance: Option<f64>,

    #[arg(long, help = "Checkpoint log of the first camera", global = true)]
    entry: Option<PathBuf>,

    #[arg(long, help = "Checkpoint log of the second camera", global = true)]
    exit: Option<PathBuf>,

    #[arg(long, help = "Vehicle registry file", global = true)]
    registry: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Open the interactive menu")]
    Menu,

    #[command(about = "List vehicles exceeding the speed tolerance")]
    Check,

    #[command(about = "Show all registered vehicles")]
    List,

    #[command(about = "Find registered vehicles by make")]
    Find {
        #[arg(help = "Make to search for, e.g. \"BMW 320\"")]
        make: String,
    },

    #[command(about = "Register a new vehicle")]
    Add {
        #[command(subcommand)]
        kind: AddKind,
    },

    #[command(about = "Attach a speed ticket to a registered speeder")]
    Ticket {
        #[arg(help = "License plate number")]
        registration: String,
    },
}

#[derive(Args)]
struct VehicleArgs {
    #[arg(long)]
    make: String,
    #[arg(long)]
    year: u16,
    #[arg(long)]
    mileage: u32,
    #[arg(long)]
    price: f64,
    #[arg(long, help = "License plate number")]
    registration: String,
}

#[derive(Subcommand)]
enum AddKind {
    #[command(about = "Register a car")]
    Car {
        #[command(flatten)]
        vehicle: VehicleArgs,
        #[arg(long)]
        doors: u8,
    },
    #[command(about = "Register a truck")]
    Truck {
        #[command(flatten)]
        vehicle: VehicleArgs,
        #[arg(long, default_value = "2", help = "Wheel drive, 2 or 4")]
        drive: WheelDrive,
    },
    #[command(about = "Register an SUV")]
    Suv {
        #[command(flatten)]
        vehicle: VehicleArgs,
        #[arg(long)]
        passengers: u8,
    },
}

impl AddKind {
    fn into_vehicle(self) -> Vehicle {
        match self {
            AddKind::Car { vehicle: v, doors } => {
                Vehicle::car(v.make, v.year, v.mileage, v.price, v.registration, doors)
            }
            AddKind::Truck { vehicle: v, drive } => {
                Vehicle::truck(v.make, v.year, v.mileage, v.price, v.registration, drive)
            }
            AddKind::Suv {
                vehicle: v,
                passengers,
            } => Vehicle::suv(v.make, v.year, v.mileage, v.price, v.registration, passengers),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        eprintln!("{}", "Verbose mode enabled".dimmed());
    }
    if let Err(e) = logging::init_logging(cli.verbose) {
        eprintln!("{} {}", "⚠".yellow(), e);
    }

    if let Err(e) = run(cli) {
        eprintln!("{e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let overrides = ConfigOverrides {
        speed_limit: cli.speed_limit,
        distance: cli.distance,
        entry_log: cli.entry,
        exit_log: cli.exit,
        registry_path: cli.registry,
    };
    let config = Config::resolve(cli.config.as_deref(), &overrides)?;

    match cli.command {
        Commands::Menu => MenuCommand::new(config).execute(),
        Commands::Check => CheckCommand::new(config, cli.verbose).execute(),
        Commands::List => ListCommand::new(config).execute(),
        Commands::Find { make } => FindCommand::new(config).execute(&make),
        Commands::Add { kind } => AddCommand::new(config).execute(kind.into_vehicle()),
        Commands::Ticket { registration } => TicketCommand::new(config).execute(&registration),
    }
}
