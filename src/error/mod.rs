use thiserror::Error;

use crate::storage::StorageError;
use crate::telemetry::TelemetryError;
use crate::template::TemplateError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
}

impl AppError {
    /// Stable machine readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Template(TemplateError::NotFound(_)) => "TEMPLATE_NOT_FOUND",
            AppError::Template(TemplateError::NoTemplateSelected) => "NO_TEMPLATE_SELECTED",
            AppError::Template(TemplateError::Storage(_)) => "STORAGE_ERROR",
            AppError::Template(_) => "TEMPLATE_ERROR",
            AppError::Telemetry(_) => "TELEMETRY_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
