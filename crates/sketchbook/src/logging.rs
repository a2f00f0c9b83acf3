//! Log output. The terminal belongs to the UI, so logs go to a file.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

/// Name of the log file inside the data directory.
const LOG_FILE: &str = "sketchbook.log";

/// Default log location, if a home directory exists.
pub fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "sketchbook").map(|dirs| dirs.data_local_dir().join(LOG_FILE))
}

/// Install the global subscriber. `RUST_LOG` overrides the `info` default.
///
/// Returns the log path, or `None` when no file could be opened, in which
/// case logging stays off.
pub fn init(path: Option<&Path>) -> Option<PathBuf> {
    let path = path.map(Path::to_path_buf).or_else(default_path)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    let file = File::create(&path).ok()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .ok()?;

    Some(path)
}
