use std::path::PathBuf;
use thiserror::Error;

use crate::driver::RunReport;

/// The main error type for embed-driver operations.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Failed to read config from {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config YAML from {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid! Unrecognized mode '{0}' (supported: ultra_feedback, pos_neg, set, single)")]
    InvalidMode(String),

    #[error("Unsupported model type: '{0}' (supported: gpt2, llama)")]
    UnsupportedModelType(String),

    #[error("Missing required setting: {0}")]
    MissingSetting(&'static str),

    #[error("Invalid setting {setting}: {message}")]
    InvalidSetting {
        setting: &'static str,
        message: String,
    },

    #[error("Failed to initialise logging: {0}")]
    Logging(String),

    #[error("Unknown subset '{subset}' for mode {mode}")]
    UnknownSubset { subset: String, mode: String },

    #[error("Unsupported output format: {0}")]
    UnsupportedOutput(String),

    #[error("Failed to serialize report: {0}")]
    ReportSerialize(#[source] serde_json::Error),

    #[error("Run failed with {failed} failed and {skipped} skipped invocation(s)")]
    RunFailed {
        failed: usize,
        skipped: usize,
        report: RunReport,
    },
}

/// Error returned by a [`crate::driver::DataProcessor`] for a single invocation.
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with {status}")]
    ExitStatus { program: String, status: String },

    #[error("{0}")]
    Rejected(String),
}
