//! Error types for recoverable feed operations.
//!
//! Running out of data is not an error: cursors report it by comparing equal
//! to [`Empty`](crate::Empty) or [`End`](crate::End). Broken preconditions
//! panic instead of returning one of these.

use thiserror::Error;

/// Result type for feed operations
pub type Result<T> = std::result::Result<T, FeedError>;

/// Feed errors
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed is exhausted")]
    Exhausted,

    #[error("stream is finished, no more chunks can be appended")]
    Finished,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
