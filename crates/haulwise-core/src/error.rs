//! Error types for `haulwise-core`.
//!
//! Validation messages are shown to the submitter as-is, so they name the
//! offending fields but never echo submitted values back.

use haulwise_mail::MailError;

/// A submission that cannot be turned into a [`crate::DemoRequest`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// One or more required fields were absent or blank.
    #[error("Missing required fields: {}", .fields.join(", "))]
    MissingFields { fields: Vec<&'static str> },

    /// The email address failed the pattern or length check.
    #[error("Invalid email address")]
    InvalidEmail,
}

/// Errors from relaying a validated demo request.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    /// The mandatory notification to the operations inbox was not accepted.
    #[error("team notification failed: {0}")]
    TeamNotification(#[source] MailError),
}
