//! Platform-specific paths for run configurations.
//!
//! - **User config**: `~/.config/pacsurr/` (Linux), `~/Library/Application Support/pacsurr/` (macOS), `%APPDATA%\pacsurr\` (Windows)
//! - **Named configs**: `<user config>/runs/<name>.toml`
//! - **Default config**: `<user config>/config.toml`
//!
//! # Example
//!
//! ```rust,no_run
//! use pacsurr_config::paths;
//!
//! // Find a config by name (searches the working directory, then the user directory)
//! if let Some(path) = paths::find_config("theta-gamma") {
//!     println!("Found config at: {:?}", path);
//! }
//! ```

use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Application name used for directory paths.
const APP_NAME: &str = "pacsurr";

/// Subdirectory for named run configurations.
const RUNS_SUBDIR: &str = "runs";

/// File name of the default configuration.
const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Returns the user-specific configuration directory.
///
/// Falls back to `./pacsurr` if the platform config directory cannot be
/// determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the directory holding named run configurations.
pub fn user_runs_dir() -> PathBuf {
    user_config_dir().join(RUNS_SUBDIR)
}

/// Returns the path of the default configuration file.
pub fn default_config_path() -> PathBuf {
    user_config_dir().join(DEFAULT_CONFIG_FILE)
}

/// Find a configuration file by path or name.
///
/// Searches in the following order:
/// 1. `name` as a path to an existing file
/// 2. `<name>.toml` in the user runs directory
///
/// The `.toml` extension is optional.
pub fn find_config(name: &str) -> Option<PathBuf> {
    find_config_in(name, &user_runs_dir())
}

fn find_config_in(name: &str, runs_dir: &Path) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }

    let filename = if name.ends_with(".toml") {
        name.to_string()
    } else {
        format!("{name}.toml")
    };

    let candidate = runs_dir.join(filename);
    candidate.is_file().then_some(candidate)
}

/// Ensure the user config directory exists.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_user_config_dir() -> Result<PathBuf, ConfigError> {
    let dir = user_config_dir();

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::create_dir(&dir, e))?;
        tracing::debug!(dir = %dir.display(), "created user config directory");
    }

    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_user_config_dir() {
        let dir = user_config_dir();
        assert!(dir.ends_with(APP_NAME));
    }

    #[test]
    fn test_default_config_path() {
        let path = default_config_path();
        assert!(path.starts_with(user_config_dir()));
        assert_eq!(path.file_name().unwrap(), "config.toml");
    }

    #[test]
    fn test_find_config_by_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("run.toml");
        fs::write(&path, "nperm = 10").unwrap();

        assert_eq!(find_config(path.to_str().unwrap()), Some(path));
    }

    #[test]
    fn test_find_config_by_name() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("theta.toml");
        fs::write(&path, "").unwrap();

        assert_eq!(find_config_in("theta", temp_dir.path()), Some(path.clone()));
        assert_eq!(find_config_in("theta.toml", temp_dir.path()), Some(path));
    }

    #[test]
    fn test_find_config_not_found() {
        let temp_dir = TempDir::new().unwrap();
        assert!(find_config_in("nonexistent_run_12345", temp_dir.path()).is_none());
        assert!(find_config("nonexistent_run_12345").is_none());
    }

    #[test]
    fn test_find_config_ignores_directories() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("dir.toml")).unwrap();
        assert!(find_config_in("dir", temp_dir.path()).is_none());
    }
}
