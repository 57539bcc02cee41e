//! Error types for configuration operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Configuration file not found
    #[error("configuration not found: {0}")]
    NotFound(String),

    /// Validation errors
    #[error("validation failed: {0}")]
    Validation(#[from] crate::validation::ValidationError),

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;
    use std::error::Error;

    fn mock_io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "mock")
    }

    #[test]
    fn read_file_factory_produces_correct_variant() {
        let err = ConfigError::read_file("/some/path", mock_io_err());
        assert!(
            matches!(err, ConfigError::ReadFile { ref path, .. } if path == std::path::Path::new("/some/path"))
        );
    }

    #[test]
    fn write_file_display() {
        let err = ConfigError::write_file("/a/run.toml", mock_io_err());
        let msg = err.to_string();
        assert!(msg.contains("failed to write file"), "got: {msg}");
        assert!(msg.contains("/a/run.toml"), "got: {msg}");
    }

    #[test]
    fn create_dir_display() {
        let err = ConfigError::create_dir("/a/b", mock_io_err());
        let msg = err.to_string();
        assert!(msg.contains("failed to create directory"), "got: {msg}");
        assert!(msg.contains("/a/b"), "got: {msg}");
    }

    #[test]
    fn not_found_display() {
        let err = ConfigError::NotFound("theta-gamma".to_string());
        assert_eq!(err.to_string(), "configuration not found: theta-gamma");
    }

    #[test]
    fn validation_wraps_message() {
        let err = ConfigError::from(ValidationError::UnknownMethod(42));
        assert!(err.to_string().starts_with("validation failed:"));
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn io_variants_expose_source() {
        assert!(ConfigError::read_file("/x", mock_io_err()).source().is_some());
        assert!(ConfigError::write_file("/x", mock_io_err()).source().is_some());
        assert!(ConfigError::create_dir("/x", mock_io_err()).source().is_some());
        assert!(ConfigError::NotFound("x".to_string()).source().is_none());
    }
}
