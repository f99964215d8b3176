use std::fmt;
use std::path::PathBuf;

use credit_rules::compliance::BatchError;
use credit_rules::rules::EditorError;

use crate::config::ConfigError;
use crate::telemetry::TelemetryError;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Input {
        path: PathBuf,
        source: std::io::Error,
    },
    Json(serde_json::Error),
    Batch(BatchError),
    Rule(EditorError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Input { path, source } => {
                write!(f, "unable to read {}: {}", path.display(), source)
            }
            AppError::Json(err) => write!(f, "invalid json: {}", err),
            AppError::Batch(err) => write!(f, "batch error: {}", err),
            AppError::Rule(err) => write!(f, "rule error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Input { source, .. } => Some(source),
            AppError::Json(err) => Some(err),
            AppError::Batch(err) => Some(err),
            AppError::Rule(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<BatchError> for AppError {
    fn from(value: BatchError) -> Self {
        Self::Batch(value)
    }
}

impl From<EditorError> for AppError {
    fn from(value: EditorError) -> Self {
        Self::Rule(value)
    }
}
