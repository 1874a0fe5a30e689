//! # Entry: the tracked state of one resource.

use super::Status;

/// State record for one resource (or one resource × sub-key).
///
/// Fields other than `status` have no lifecycle of their own: they are
/// replaced wholesale together with a status transition. The only exception
/// is [`Store::set_status`](crate::Store::set_status), which flips `status`
/// and keeps the rest, so the last good `resource` stays readable while a
/// refresh is `IN_PROGRESS`.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<T, P> {
    /// Current load status.
    pub status: Status,
    /// Loaded payload. Set on `SUCCESS`; not cleared by a later `ERROR`.
    pub resource: Option<T>,
    /// Identity of the parameterization that produced `resource`.
    pub key: Option<String>,
    /// Parameters echoed back by the loader.
    pub params: Option<P>,
    /// Human-readable status or error text.
    pub message: Option<String>,
}

impl<T, P> Entry<T, P> {
    /// Entry with only `status` set.
    pub fn with_status(status: Status) -> Self {
        Self {
            status,
            resource: None,
            key: None,
            params: None,
            message: None,
        }
    }

    /// `SUCCESS` entry holding `resource`.
    pub fn success(resource: T) -> Self {
        Self {
            resource: Some(resource),
            ..Self::with_status(Status::Success)
        }
    }

    /// `ERROR` entry with a message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::with_status(Status::Error)
        }
    }

    #[inline]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    #[inline]
    pub fn with_params(mut self, params: P) -> Self {
        self.params = Some(params);
        self
    }

    #[inline]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T, P> Default for Entry<T, P> {
    /// `{status: INIT}`, the value of every absent entry.
    fn default() -> Self {
        Self::with_status(Status::Init)
    }
}
