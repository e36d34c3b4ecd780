//! Error types for loading the vehicle table.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort loading. Bad lap-time cells are never reported here;
/// they become missing values instead.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Data file does not exist.
    #[error("data file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Data file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to read parquet {path}: {message}")]
    Parquet { path: PathBuf, message: String },

    #[error("unsupported file extension: .{extension}")]
    UnsupportedExtension { extension: String },

    /// The file has no header row at all.
    #[error("no header row in {path}")]
    EmptyHeader { path: PathBuf },

    /// A required column is absent after trimming column names.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    /// Column mapping file could not be parsed.
    #[error("invalid column config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    /// Map an I/O error on `path`, distinguishing "not found" from other failures.
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, LoadError>;
