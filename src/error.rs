//! Error types for the catalog.
//!
//! Every failure is a variant of [`CragmapError`]. Callers that only need the
//! coarse category (for example to pick an HTTP status) use [`CragmapError::kind`].

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CragmapError>;

/// Coarse error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller supplied missing or out-of-range input.
    InvalidArgument,
    /// A named entity does not exist. Queries never produce this; empty
    /// results are returned instead.
    NotFound,
    /// The backing store could not serve the request.
    StoreUnavailable,
}

#[derive(Debug, Error)]
pub enum CragmapError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("catalog is closed")]
    StoreClosed,

    #[error("store unavailable during {operation}: {detail}")]
    StoreUnavailable {
        operation: &'static str,
        detail: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl CragmapError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Wrap a backing-store failure with the operation that hit it.
    pub fn store(operation: &'static str, detail: impl std::fmt::Display) -> Self {
        Self::StoreUnavailable {
            operation,
            detail: detail.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::StoreClosed
            | Self::StoreUnavailable { .. }
            | Self::Io(_)
            | Self::Serialization(_) => ErrorKind::StoreUnavailable,
        }
    }

    /// Message that is safe to hand to an external client.
    ///
    /// Caller errors are echoed verbatim. Store failures collapse to a generic
    /// message so file paths and decoder details stay in the logs.
    pub fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::InvalidArgument | ErrorKind::NotFound => self.to_string(),
            ErrorKind::StoreUnavailable => "location store is unavailable".to_string(),
        }
    }
}

#[cfg(feature = "snapshot")]
impl From<bincode::Error> for CragmapError {
    fn from(err: bincode::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for CragmapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
