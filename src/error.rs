use colored::Colorize;
use std::fmt;

#[derive(Debug)]
pub enum SpeedTrapError {
    MissingFile {
        path: String,
    },
    Parse {
        path: String,
        line: usize,
        message: String,
    },
    InstantaneousTransit {
        registration: String,
    },
    InvalidConfig {
        field: String,
        message: String,
    },
    InvalidVehicle {
        field: String,
        message: String,
    },
    DuplicateRegistration {
        registration: String,
    },
    RegistryCorrupt {
        path: String,
        message: String,
    },
    IoError {
        operation: String,
        path: Option<String>,
        source: std::io::Error,
    },
    Other(anyhow::Error),
}

impl SpeedTrapError {
    pub fn missing_file(path: impl Into<String>) -> Self {
        Self::MissingFile { path: path.into() }
    }

    pub fn parse(path: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    pub fn instantaneous_transit(registration: impl Into<String>) -> Self {
        Self::InstantaneousTransit {
            registration: registration.into(),
        }
    }

    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn invalid_vehicle(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidVehicle {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn duplicate_registration(registration: impl Into<String>) -> Self {
        Self::DuplicateRegistration {
            registration: registration.into(),
        }
    }

    pub fn registry_corrupt(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RegistryCorrupt {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn io_error(
        operation: impl Into<String>,
        path: Option<String>,
        source: std::io::Error,
    ) -> Self {
        Self::IoError {
            operation: operation.into(),
            path,
            source,
        }
    }
}

impl fmt::Display for SpeedTrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFile { path } => {
                write!(f, "{} File not found: {}", "✗".red().bold(), path.yellow())
            }
            Self::Parse {
                path,
                line,
                message,
            } => {
                writeln!(f, "{} Could not parse record", "✗".red().bold())?;
                writeln!(f, "  {} Location: {}:{}", "→".blue(), path.yellow(), line)?;
                write!(f, "  {} Error: {}", "→".blue(), message)
            }
            Self::InstantaneousTransit { registration } => write!(
                f,
                "{} Zero elapsed time between checkpoints for {}",
                "✗".red().bold(),
                registration.yellow()
            ),
            Self::InvalidConfig { field, message } => {
                writeln!(f, "{} Invalid configuration", "✗".red().bold())?;
                write!(f, "  {} {}: {}", "→".blue(), field.yellow(), message)
            }
            Self::InvalidVehicle { field, message } => {
                writeln!(f, "{} Invalid vehicle data", "✗".red().bold())?;
                write!(f, "  {} {}: {}", "→".blue(), field.yellow(), message)
            }
            Self::DuplicateRegistration { registration } => write!(
                f,
                "{} A vehicle with registration {} is already registered",
                "✗".red().bold(),
                registration.yellow()
            ),
            Self::RegistryCorrupt { path, message } => {
                writeln!(f, "{} Vehicle registry is unreadable", "✗".red().bold())?;
                writeln!(f, "  {} Path: {}", "→".blue(), path.yellow())?;
                write!(f, "  {} Error: {}", "→".blue(), message)
            }
            Self::IoError {
                operation,
                path,
                source,
            } => {
                writeln!(
                    f,
                    "{} I/O error during: {}",
                    "✗".red().bold(),
                    operation.yellow()
                )?;
                if let Some(path) = path {
                    writeln!(f, "  {} Path: {}", "→".blue(), path)?;
                }
                write!(f, "  {} Error: {}", "→".blue(), source)
            }
            Self::Other(err) => write!(f, "{} {}", "✗".red().bold(), err),
        }
    }
}

impl std::error::Error for SpeedTrapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError { source, .. } => Some(source),
            Self::Other(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SpeedTrapError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            operation: "unknown".to_string(),
            path: None,
            source: err,
        }
    }
}

impl From<anyhow::Error> for SpeedTrapError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err)
    }
}

impl From<serde_json::Error> for SpeedTrapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Other(anyhow::anyhow!("JSON error: {}", err))
    }
}

impl From<dialoguer::Error> for SpeedTrapError {
    fn from(err: dialoguer::Error) -> Self {
        Self::Other(anyhow::anyhow!("Dialog error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, SpeedTrapError>;
