//! Error types shared across the crate.
//!
//! None of these are fatal: the store's fail-open surface turns
//! [`StoreError`] into a log line, and the dispatch loop collects
//! [`DispatchError`]s per recipient instead of stopping.

use std::path::PathBuf;

use thiserror::Error;

use crate::validation::ValidationError;

/// Failure reading or writing the contacts file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("contacts file {path} could not be read: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("{path} is a database without a contacts table")]
    NotAContactsFile { path: PathBuf },

    #[error("failed to prepare contacts file schema: {0:#}")]
    Migration(anyhow::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a create, edit or delete request.
#[derive(Debug, Error)]
pub enum ContactError {
    #[error("{}", join_messages(.0))]
    Invalid(Vec<ValidationError>),

    #[error("Contact not found")]
    NotFound,

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl ContactError {
    /// User-facing messages, one per problem.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Invalid(errors) => errors.iter().map(ToString::to_string).collect(),
            other => vec![other.to_string()],
        }
    }
}

/// Failure to deliver a single message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("invalid phone number {0:?}")]
    InvalidPhone(String),

    #[error("{0}")]
    Failed(String),
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
