//! # Result record returned by a loader.

use crate::store::{Entry, Status};

/// What a [`Loader`](crate::Loader) resolved with.
///
/// `success: false` is a regular outcome (a `LoadFailure`), not an error:
/// it is committed as an `ERROR` entry carrying `message`.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T, P> {
    /// Whether the load produced usable data.
    pub success: bool,
    /// Loaded payload.
    pub data: Option<T>,
    /// Parameters that were actually used (echoed to observers).
    pub params: Option<P>,
    /// Status or error text.
    pub message: Option<String>,
}

impl<T, P> Loaded<T, P> {
    /// Successful load of `data`.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            params: None,
            message: None,
        }
    }

    /// Failed load with a message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            params: None,
            message: Some(message.into()),
        }
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

    #[inline]
    pub fn with_data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }

    /// Status this result commits.
    #[inline]
    pub fn status(&self) -> Status {
        if self.success {
            Status::Success
        } else {
            Status::Error
        }
    }

    /// Builds the entry committed for this result, tagged with the caller's key.
    pub fn into_entry(self, key: Option<String>) -> Entry<T, P> {
        Entry {
            status: self.status(),
            resource: self.data,
            key,
            params: self.params,
            message: self.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_commits_everything() {
        let entry = Loaded::success(vec![1, 2])
            .with_params("page=1")
            .with_message("fresh")
            .into_entry(Some("k1".into()));

        assert_eq!(entry.status, Status::Success);
        assert_eq!(entry.resource, Some(vec![1, 2]));
        assert_eq!(entry.key.as_deref(), Some("k1"));
        assert_eq!(entry.params, Some("page=1"));
        assert_eq!(entry.message.as_deref(), Some("fresh"));
    }

    #[test]
    fn failure_may_still_carry_data() {
        let entry: Entry<u8, ()> = Loaded::failure("partial").with_data(3).into_entry(None);
        assert_eq!(entry.status, Status::Error);
        assert_eq!(entry.resource, Some(3));
        assert_eq!(entry.message.as_deref(), Some("partial"));
    }
}
