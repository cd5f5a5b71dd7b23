//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{QuestionError, ResultError};
use quiz_core::session::SessionError;
use storage::repository::StorageError;

/// Errors emitted by the login gate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
}

/// Errors emitted by `QuestionBankService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionBankError {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `AdminSettingsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ResultsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResultsError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by a `ResultSink` while delivering a finalized result.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DeliveryError {
    #[error("result delivery is not configured")]
    Disabled,
    #[error("no notification address configured")]
    NoDestination,
    #[error("mail endpoint returned status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by the quiz flow.
///
/// Delivery failures are recoverable: the submission stays unset and the
/// caller may retry `finalize`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("result delivery failed: {0}")]
    Delivery(#[source] DeliveryError),
    #[error(transparent)]
    Record(#[from] ResultError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
