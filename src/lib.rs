//! Vehicle registry with an average speed check between two checkpoints.

pub mod checkpoint;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod menu;
pub mod registry;
pub mod session;
pub mod speed;
pub mod ticket;
pub mod vehicle;

pub use checkpoint::{load_checkpoints, CheckpointTable, LoadReport};
pub use error::{Result, SpeedTrapError};
pub use speed::{SpeedEvaluator, SpeedReport, SpeedViolation};
