//! Centralized path resolution for aquasonda
//!
//! ```text
//! <base>/
//! └── data/
//!     ├── config.toml
//!     ├── aquasonda.db
//!     └── logs/
//!         └── aquasonda_YYYY-MM-DD.log
//! ```
//!
//! `<base>` is `$AQUASONDA_HOME` when set, otherwise the working directory.

use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};

static BASE_DIRECTORY: Lazy<PathBuf> = Lazy::new(|| {
    std::env::var_os("AQUASONDA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
});

pub fn get_base_directory() -> &'static Path {
    BASE_DIRECTORY.as_path()
}

pub fn get_data_directory() -> PathBuf {
    get_base_directory().join("data")
}

pub fn get_logs_directory() -> PathBuf {
    get_data_directory().join("logs")
}

/// Resolve a configured path: absolute paths are kept, relative ones are
/// placed under the base directory.
pub fn resolve(path: &str) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        get_base_directory().join(candidate)
    }
}

/// Create the data and logs directories
pub fn ensure_all_directories() -> Result<(), String> {
    for dir in [get_data_directory(), get_logs_directory()] {
        std::fs::create_dir_all(&dir)
            .map_err(|e| format!("Failed to create directory {}: {}", dir.display(), e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_keeps_absolute_paths() {
        let abs = if cfg!(windows) { "C:\\db\\a.db" } else { "/var/lib/a.db" };
        assert_eq!(resolve(abs), PathBuf::from(abs));
    }

    #[test]
    fn test_logs_live_under_data() {
        assert!(get_logs_directory().starts_with(get_data_directory()));
    }
}
