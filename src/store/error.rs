#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::Display;

/// Result alias used by every record store and repository operation.
pub type StoreResult<T> = Result<T, StoreError>;

/// An enum to represent the ways a record store operation can fail.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// The request never produced a response (connection, TLS, timeout).
    #[error("Could not reach the record store: {0}")]
    Transport(String),
    /// The store answered with a non-success status.
    #[error("The record store rejected the request ({status}): {message}")]
    Rejected {
        /// HTTP-style status code returned by the store.
        status:  u16,
        /// Message reported by the store, or the raw body.
        message: String,
    },
    /// A record could not be decoded into the expected shape.
    #[error("Could not decode a record: {0}")]
    Decode(#[from] serde_json::Error),
    /// A write succeeded but no record came back.
    #[error("The record store returned no record for {action} on `{table}`")]
    NoResult {
        /// Table the write targeted.
        table:  String,
        /// The write that came back empty (`create`, `update`).
        action: &'static str,
    },
    /// The store has been switched off.
    #[error("The record store is unavailable")]
    Unavailable,
}

impl StoreError {
    /// Wraps any transport-level error.
    pub fn transport<E: Display>(err: E) -> Self {
        StoreError::Transport(err.to_string())
    }

    /// Builds a `NoResult` error for `table`.
    pub(crate) fn no_result(table: &str, action: &'static str) -> Self {
        StoreError::NoResult {
            table: table.to_string(),
            action,
        }
    }
}

/// Collapses a `StoreResult` into the sentinel values the UI layer expects:
/// empty collections, `None`, or `false`. The failure is logged, not returned.
pub trait OrSentinel<T> {
    /// Returns the value, or `T::default()` after logging the failure.
    fn or_sentinel(self, context: &str) -> T
    where
        T: Default;

    /// Returns `Some(value)`, or `None` after logging the failure.
    fn or_none(self, context: &str) -> Option<T>;

    /// Returns whether the operation succeeded, logging the failure if not.
    fn succeeded(self, context: &str) -> bool;
}

impl<T> OrSentinel<T> for StoreResult<T> {
    fn or_sentinel(self, context: &str) -> T
    where
        T: Default,
    {
        self.or_none(context).unwrap_or_default()
    }

    fn or_none(self, context: &str) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("{context}: {e}");
                None
            }
        }
    }

    fn succeeded(self, context: &str) -> bool {
        self.or_none(context).is_some()
    }
}
