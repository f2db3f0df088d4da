use anyhow::Result;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured logging based on verbosity level
pub fn init_logging(verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("speedtrap=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("speedtrap=warn"))
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(true)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if verbose {
        tracing::info!("Verbose logging enabled");
    }

    Ok(())
}

/// Log the outcome of loading one checkpoint file
pub fn log_checkpoint_load(path: &Path, records: usize, skipped: usize) {
    if skipped > 0 {
        tracing::warn!(
            path = %path.display(),
            records = records,
            skipped = skipped,
            "Checkpoint log loaded with skipped lines"
        );
    } else {
        tracing::debug!(
            path = %path.display(),
            records = records,
            "Checkpoint log loaded"
        );
    }
}

/// Log a detected speed violation
pub fn log_violation(registration: &str, average_speed: f64, threshold: f64) {
    tracing::info!(
        registration = registration,
        average_speed = average_speed,
        threshold = threshold,
        "Speed violation detected"
    );
}

/// Log registry persistence
pub fn log_registry_save(path: &Path, vehicles: usize) {
    tracing::debug!(
        path = %path.display(),
        vehicles = vehicles,
        "Vehicle registry saved"
    );
}

/// Log the effective speed-check settings
pub fn log_config_resolved(speed_limit: f64, distance: f64, source: &str) {
    tracing::debug!(
        speed_limit = speed_limit,
        distance = distance,
        source = source,
        "Configuration resolved"
    );
}
