use thiserror::Error;

/// Result type for content store operations
pub type BlobResult<T> = Result<T, BlobError>;

/// Errors that can occur during content store operations
#[derive(Error, Debug)]
pub enum BlobError {
    #[error("Content not found: {key}")]
    NotFound { key: String },

    #[error("Invalid request: {message}")]
    Invalid { message: String },

    #[error("Content exceeds the maximum of {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("Upload stream interrupted after {received} bytes: {source}")]
    Interrupted {
        received: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("Storage backend error: {source}")]
    Backend {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl BlobError {
    /// Create a backend error from any error type
    pub fn backend<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend {
            source: Box::new(error),
        }
    }

    /// Create an invalid request error
    pub fn invalid<S: Into<String>>(message: S) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(key: S) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Map an I/O error on an existing key, turning `ENOENT` into `NotFound`
    pub fn from_io_for_key(err: std::io::Error, key: &str) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::not_found(key)
        } else {
            Self::Io { source: err }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether retrying the same operation may succeed.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            Self::Interrupted { .. } | Self::Io { .. } | Self::Backend { .. }
        )
    }
}
