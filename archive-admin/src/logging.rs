//! File logging

use std::fs;
use std::fs::File;
use std::io;
use std::path::Path;

use simplelog::ConfigBuilder;
use simplelog::LevelFilter;
use simplelog::WriteLogger;
use thiserror::Error;

/// Logging setup error type.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("cannot open log file: {0}")]
    Io(#[from] io::Error),

    #[error("a logger is already installed")]
    AlreadySet(#[from] log::SetLoggerError),
}

/// Sends `log` records at or above `level` to `path`, truncating it.
///
/// Can be called once per process.
pub fn init_file_logger(path: &Path, level: LevelFilter) -> Result<(), LoggingError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .add_filter_ignore_str("rustls")
        .build();
    WriteLogger::init(level, config, file)?;
    log::info!("Logging to {} at {}", path.display(), level);
    Ok(())
}
