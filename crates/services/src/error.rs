//! Shared error types for the services crate.

use thiserror::Error;

use prep_core::model::RecordError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by the chat-completion client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AiError {
    #[error("content generation is not configured")]
    Disabled,
    #[error("content generation returned an empty response")]
    EmptyResponse,
    #[error("content generation returned malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("content generation failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// A question bank could not produce questions for a session.
///
/// Always recoverable: the caller may simply ask again.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("could not generate {what}; please try again")]
    Failed {
        what: String,
        #[source]
        source: AiError,
    },
    #[error("the {bank} question bank cannot serve a {kind}")]
    Unsupported { bank: &'static str, kind: String },
}

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no option selected for the current question")]
    NothingSelected,
    #[error("session already completed")]
    Completed,
    #[error("session has no questions")]
    Empty,
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Record(#[from] RecordError),
}

/// Errors emitted by `WritingLabService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WritingLabError {
    #[error("essay cannot be empty")]
    EmptyEssay,
    #[error("essay theme cannot be empty")]
    EmptyTheme,
    #[error(transparent)]
    Ai(#[from] AiError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
