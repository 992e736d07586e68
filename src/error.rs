//! Error types.
//!
//! Library code returns typed errors:
//! - [`DataError`]: the input is unusable (missing file/column, unparseable cell).
//!   These are fatal for the figure being built.
//! - [`FitError`]: a single series cannot be fitted. Callers that fit many
//!   groups skip the group and keep going.
//!
//! The binary converts both into [`AppError`], which carries the process exit code.

use std::path::PathBuf;

use crate::domain::Axis;

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Input file not found: '{}'", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read '{source_name}': {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    #[error("Missing required column `{column}` in '{source_name}'")]
    MissingColumn { source_name: String, column: String },

    #[error("Invalid value '{value}' for column `{column}` in '{source_name}' (line {line}): expected a number")]
    InvalidValue {
        source_name: String,
        line: usize,
        column: String,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FitError {
    #[error("Insufficient data: need at least {needed} points, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("Non-positive {axis} value {value} at index {index} (logarithm undefined)")]
    NonPositiveValue { axis: Axis, index: usize, value: f64 },

    #[error("All x values are identical ({x}); the fit is underdetermined")]
    DegenerateX { x: f64 },

    #[error("Polynomial degree must be at least 1")]
    ZeroDegree,

    #[error("Least-squares system is too ill-conditioned to solve")]
    IllConditioned,
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<DataError> for AppError {
    fn from(err: DataError) -> Self {
        AppError::new(2, err.to_string())
    }
}

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        AppError::new(3, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_errors_map_to_exit_code_2() {
        let err: AppError = DataError::MissingColumn {
            source_name: "sizes.csv".to_string(),
            column: "Size".to_string(),
        }
        .into();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "Missing required column `Size` in 'sizes.csv'");
    }

    #[test]
    fn fit_errors_map_to_exit_code_3() {
        let err: AppError = FitError::InsufficientData { needed: 2, got: 1 }.into();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("got 1"));
    }
}
