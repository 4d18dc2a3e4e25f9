//! Error types for tzsched-core.
//!
//! Zone and input problems are reported before any schedule is built;
//! publish problems carry the transport message through untouched.

use thiserror::Error;

/// The main error type for tzsched operations.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Invalid timezone name provided.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Timezone offsets or transitions the compiler cannot express.
    #[error("Unsupported timezone offset: {0}")]
    InvalidTimezoneOffset(String),

    /// Local interval outside `0 <= start < end <= 24`.
    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    /// Malformed anchor or published schedule data.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A single publish or retract request failed.
    #[error("Publish failed for {target}: {message}")]
    PublishFailure {
        /// Month and description of the failing request.
        target: String,
        /// Transport error payload, verbatim.
        message: String,
    },

    /// At least one member of a publish batch failed.
    #[error("Reconciliation aborted: {} request(s) in the batch failed", .failures.len())]
    ReconciliationAborted {
        /// Every failing member of the batch.
        failures: Vec<ScheduleError>,
    },
}

/// Result type alias for tzsched operations.
pub type Result<T> = std::result::Result<T, ScheduleError>;
