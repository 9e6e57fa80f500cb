//! Feed Common
//!
//! Pieces shared by feed-framework and stream-framework: the sentinels a
//! cursor is compared against, the cursor trait consumers are written
//! against, and the error type for the few recoverable operations.

pub mod error;
pub mod sentinel;
pub mod traits;

pub use error::{FeedError, Result};
pub use sentinel::{Empty, End};
pub use traits::{FeedCursor, FeedCursorExt};
