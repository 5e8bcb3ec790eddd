//! Failure kinds of the rate-loading subsystem

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DashboardError {
    /// Transport error or non-2xx status from the rate provider.
    #[error("Network failure: {0}")]
    Network(String),
    /// The provider answered but did not report success.
    #[error("Rate provider returned an unsuccessful result: {0}")]
    ApplicationFailure(String),
    /// The fetch failed and there was no usable cached snapshot.
    #[error("Failed to fetch exchange rates and no cached data available")]
    NoDataAvailable,
    #[error("Failed to read `{key}` from store: {reason}")]
    PersistenceRead { key: String, reason: String },
    #[error("Failed to write `{key}` to store: {reason}")]
    PersistenceWrite { key: String, reason: String },
}

pub type Result<T> = std::result::Result<T, DashboardError>;
