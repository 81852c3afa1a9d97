use thiserror::Error;

/// Errors reported by [`Dictionary`](crate::Dictionary) operations and its
/// iterators.
///
/// Every error is raised before the dictionary is modified, so a failed call
/// never leaves a partial update behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Error {
    /// A required key or value was absent.
    #[error("key and value must both be present")]
    InvalidArgument,
    /// The key is not stored in the dictionary.
    #[error("key not found in dictionary")]
    NotFound,
    /// An iterator was advanced past its last entry.
    #[error("no more elements to iterate")]
    NoMoreElements,
}

/// Shorthand for results whose error type is [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
