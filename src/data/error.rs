use std::path::PathBuf;

use thiserror::Error;

use super::model::Column;

/// Errors raised by the data layer.
///
/// Load failures are fatal for the dataset in question; the other variants
/// describe requests against the schema that cannot be answered.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("dataset unavailable at {}: {reason}", .path.display())]
    DataUnavailable { path: PathBuf, reason: String },

    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("column '{}' is not numeric", .0.name())]
    NotNumeric(Column),
}

impl DashboardError {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        DashboardError::DataUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
