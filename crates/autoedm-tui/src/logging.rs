use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

const FILE_FILTER: &str = "autoedm=info,autoedm_core=info";
const STDERR_FILTER: &str = "autoedm=warn,autoedm_core=warn";

/// `RUST_LOG` when set, otherwise `default`
fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log to `{data_dir}/autoedm/autoedm.log`. The terminal belongs to the UI
/// while it runs, so nothing may be written to stdout/stderr.
pub fn init_file_logging() -> Result<PathBuf> {
    let log_dir = dirs::data_dir()
        .ok_or_else(|| anyhow!("Could not determine data directory"))?
        .join("autoedm");
    std::fs::create_dir_all(&log_dir)?;

    let log_path = log_dir.join("autoedm.log");
    let file = OpenOptions::new().create(true).append(true).open(&log_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(FILE_FILTER))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to set tracing subscriber: {}", e))?;

    tracing::info!("Logging initialized to: {:?}", log_path);
    Ok(log_path)
}

/// Compact logs on stderr for the headless commands
pub fn init_stderr_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(STDERR_FILTER))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("Failed to set tracing subscriber: {}", e))
}
