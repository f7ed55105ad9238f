//! Error types for list models.

/// Result type alias for list model operations.
pub type Result<T> = std::result::Result<T, ListError>;

/// Errors that can occur when configuring or mutating a list model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListError {
    /// A field descriptor or sort request was not usable.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// A positional operation referred to a row past the end of the list.
    #[error("Index {index} is out of range for a list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

impl ListError {
    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an index out of range error.
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }
}
