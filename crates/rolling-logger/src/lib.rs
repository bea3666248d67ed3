//! Rolling Logger
//!
//! Installs a global `tracing` subscriber that keeps the most recent lines
//! in memory, optionally writes a size-rotated file (native only) and can
//! forward every line to a sink such as the browser console.
//!
//! ```ignore
//! rolling_logger::init(LoggerConfig::new("GeckoRack"), None)?;
//! tracing::info!(rack_id = 3, "racks loaded");
//! let lines = rolling_logger::recent_lines();
//! ```

mod buffer;
#[cfg(not(target_arch = "wasm32"))]
mod file;
mod layer;

use std::sync::{Arc, OnceLock};

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::prelude::*;

pub use buffer::{LogBuffer, DEFAULT_CAPACITY};
#[cfg(not(target_arch = "wasm32"))]
pub use file::{RollingFile, DEFAULT_MAX_BACKUPS, DEFAULT_MAX_BYTES};
pub use layer::{format_line, RollingLayer, Sink};

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("log file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("a global logger is already installed")]
    AlreadyInitialized,
    #[error("logger not initialized")]
    NotInitialized,
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub app_name: String,
    pub max_level: Level,
    pub buffer_lines: usize,
    /// Directory for `<app_name>.log`; ignored in the browser
    pub dir: Option<std::path::PathBuf>,
    pub max_file_bytes: u64,
    pub max_backups: usize,
}

impl LoggerConfig {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            max_level: if cfg!(debug_assertions) { Level::DEBUG } else { Level::INFO },
            buffer_lines: DEFAULT_CAPACITY,
            dir: None,
            max_file_bytes: 1024 * 1024,
            max_backups: 3,
        }
    }

    pub fn with_dir(mut self, dir: impl Into<std::path::PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.max_level = level;
        self
    }
}

static BUFFER: OnceLock<Arc<LogBuffer>> = OnceLock::new();

/// Install the global subscriber. Only the first call succeeds.
pub fn init(config: LoggerConfig, sink: Option<Sink>) -> Result<(), LoggerError> {
    if BUFFER.get().is_some() {
        return Err(LoggerError::AlreadyInitialized);
    }

    let buffer = Arc::new(LogBuffer::new(config.buffer_lines));
    let mut layer = RollingLayer::new(buffer.clone(), config.max_level);

    #[cfg(not(target_arch = "wasm32"))]
    if let Some(dir) = &config.dir {
        let file = RollingFile::open(dir, &config.app_name, config.max_file_bytes, config.max_backups)?;
        layer = layer.with_file(file);
    }
    if let Some(sink) = sink {
        layer = layer.with_sink(sink);
    }

    tracing::subscriber::set_global_default(tracing_subscriber::registry().with(layer))
        .map_err(|_| LoggerError::AlreadyInitialized)?;
    BUFFER.set(buffer).map_err(|_| LoggerError::AlreadyInitialized)?;

    tracing::info!(app = %config.app_name, "logger initialized");
    Ok(())
}

/// Native shorthand: log to `<dir>/<app_name>.log` with default limits
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logger(dir: impl Into<std::path::PathBuf>, app_name: &str) -> Result<(), LoggerError> {
    init(LoggerConfig::new(app_name).with_dir(dir), None)
}

/// Buffered lines, oldest first; empty before [`init`]
pub fn recent_lines() -> Vec<String> {
    BUFFER.get().map(|b| b.snapshot()).unwrap_or_default()
}

pub fn clear_recent() {
    if let Some(buffer) = BUFFER.get() {
        buffer.clear();
    }
}

fn ensure_init() -> Result<(), LoggerError> {
    BUFFER.get().map(|_| ()).ok_or(LoggerError::NotInitialized)
}

pub fn info(message: &str) -> Result<(), LoggerError> {
    ensure_init()?;
    tracing::info!(target: "app", "{message}");
    Ok(())
}

pub fn warn(message: &str) -> Result<(), LoggerError> {
    ensure_init()?;
    tracing::warn!(target: "app", "{message}");
    Ok(())
}

pub fn error(message: &str) -> Result<(), LoggerError> {
    ensure_init()?;
    tracing::error!(target: "app", "{message}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // single test owns the process-wide subscriber
    #[test]
    fn test_global_init_once() {
        assert!(matches!(info("too early"), Err(LoggerError::NotInitialized)));
        assert!(recent_lines().is_empty());

        let dir = tempfile::tempdir().unwrap();
        init(LoggerConfig::new("GeckoRack").with_dir(dir.path()).with_level(Level::INFO), None).unwrap();

        info("racks loaded").unwrap();
        error("move failed").unwrap();

        let lines = recent_lines();
        assert!(lines.iter().any(|l| l.ends_with("INFO app: racks loaded")));
        assert!(lines.iter().any(|l| l.ends_with("ERROR app: move failed")));

        let file = std::fs::read_to_string(dir.path().join("GeckoRack.log")).unwrap();
        assert!(file.contains("move failed"));

        assert!(matches!(
            init(LoggerConfig::new("again"), None),
            Err(LoggerError::AlreadyInitialized)
        ));

        clear_recent();
        assert!(recent_lines().is_empty());
    }
}
