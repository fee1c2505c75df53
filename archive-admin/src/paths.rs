//! Where the admin keeps its files.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use directories::ProjectDirs;
use log::debug;

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "archive";
const APPLICATION: &str = "archive-admin";

/// Name of the log file written by the running process.
pub const LATEST_LOG: &str = "latest.log";

/// Default number of rotated logs to keep.
pub const MAX_OLD_LOGS: usize = 25;

/// Data, config and log directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminPaths {
    data_dir: PathBuf,
    config_dir: PathBuf,
    log_dir: PathBuf,
}

impl AdminPaths {
    /// Platform directories, or `None` if there is no home directory.
    ///
    /// - Linux: `~/.local/share/archive-admin`, `~/.config/archive-admin`,
    ///   `~/.cache/archive-admin`
    /// - macOS: `~/Library/Application Support/org.archive.archive-admin`,
    ///   `~/Library/Caches/org.archive.archive-admin`
    pub fn discover() -> Option<Self> {
        let dirs = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)?;
        Some(Self {
            data_dir: dirs.data_dir().to_path_buf(),
            config_dir: dirs.config_dir().to_path_buf(),
            log_dir: dirs.cache_dir().to_path_buf(),
        })
    }

    /// Everything under one root, as `data/`, `config/` and `logs/`.
    pub fn at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            data_dir: root.join("data"),
            config_dir: root.join("config"),
            log_dir: root.join("logs"),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// The settings database.
    pub fn settings_db(&self) -> PathBuf {
        self.data_dir.join("settings.db")
    }

    /// The current log file.
    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join(LATEST_LOG)
    }

    /// Creates every directory.
    pub fn ensure_dirs(&self) -> io::Result<()> {
        for dir in [&self.data_dir, &self.config_dir, &self.log_dir] {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// Archives the current log under a timestamped name and removes all but
    /// the newest `keep` archives.
    ///
    /// Call before installing the logger.
    pub fn rotate_logs(&self, keep: usize) -> io::Result<()> {
        let latest = self.log_file();
        if latest.exists() {
            let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S_%3f");
            fs::rename(&latest, self.log_dir.join(format!("{}.log", stamp)))?;
        }
        self.prune_logs(keep)
    }

    /// Archived logs, oldest first.
    pub fn archived_logs(&self) -> io::Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.log_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        let mut logs: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension().is_some_and(|ext| ext == "log")
                    && path.file_name().is_some_and(|name| name != LATEST_LOG)
            })
            .collect();
        // Timestamped names sort chronologically.
        logs.sort();
        Ok(logs)
    }

    fn prune_logs(&self, keep: usize) -> io::Result<()> {
        let logs = self.archived_logs()?;
        let excess = logs.len().saturating_sub(keep);
        for path in &logs[..excess] {
            debug!("Removing old log {}", path.display());
            fs::remove_file(path)?;
        }
        Ok(())
    }
}
