//! Environment configuration for the simulator.
use std::env;
use std::path::PathBuf;

/// Settings read from the environment (and `.env`).
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Directory for the log file; stderr only when unset.
    pub log_dir: Option<PathBuf>,
    /// Default data directory when `--data-dir` is not given.
    pub data_dir: Option<PathBuf>,
}

impl EnvConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `LOG_DIR` - Directory receiving `board-cli.log`
    /// - `BOARD_DATA_DIR` - Content directory (default: `data`)
    pub fn from_env() -> Self {
        Self {
            log_dir: read_env::<PathBuf>("LOG_DIR"),
            data_dir: read_env::<PathBuf>("BOARD_DATA_DIR"),
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
