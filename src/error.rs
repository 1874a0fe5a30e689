//! Error types raised by resource loaders.
//!
//! [`LoadError`] is what a [`Loader`](crate::Loader) returns when it cannot
//! produce a [`Loaded`](crate::Loaded) record. The orchestrator never re-raises
//! it: every variant is absorbed into an `ERROR` entry in the store.
//!
//! A loader that *completes* with `success: false` is not an error at this
//! level; it is a regular [`Loaded`](crate::Loaded) carrying a message.

use thiserror::Error;

/// # Errors produced by a loader invocation.
///
/// `Failed` is committed as `{status: ERROR, key, message}` with the loader's
/// message. Every other variant ends up as `{status: ERROR, message: <generic
/// failure text>}`; its detail is only visible through events and logs.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// Loader rejected the request with a message of its own.
    ///
    /// Same outcome as `Loaded::failure(message)`.
    #[error("load failed: {message}")]
    Failed {
        /// Message supplied by the loader.
        message: String,
    },

    /// Loader raised an error (transport, decoding, ...).
    #[error("loader raised: {error}")]
    Raised {
        /// The underlying error message.
        error: String,
    },

    /// Loader panicked while its future was being polled.
    #[error("loader panicked: {info}")]
    Panicked {
        /// Panic payload, if it was a string.
        info: String,
    },

    /// Loader observed its cancellation token and gave up.
    #[error("loader cancelled")]
    Canceled,
}

impl LoadError {
    /// Shorthand for [`LoadError::Raised`] from anything displayable.
    pub fn raised(error: impl std::fmt::Display) -> Self {
        LoadError::Raised {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use loadvisor::LoadError;
    ///
    /// let err = LoadError::raised("connection refused");
    /// assert_eq!(err.as_label(), "load_raised");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            LoadError::Failed { .. } => "load_failed",
            LoadError::Raised { .. } => "load_raised",
            LoadError::Panicked { .. } => "load_panicked",
            LoadError::Canceled => "load_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            LoadError::Failed { message } => format!("failed: {message}"),
            LoadError::Raised { error } => format!("error: {error}"),
            LoadError::Panicked { info } => format!("panic: {info}"),
            LoadError::Canceled => "loader cancelled".to_string(),
        }
    }
}
