pub mod cursor;
#[cfg(feature = "streaming")]
pub mod pump;
pub mod stream;

pub use cursor::StreamFeed;
pub use feed_common::{Empty, End, FeedCursor, FeedCursorExt, FeedError};
#[cfg(feature = "streaming")]
pub use pump::ReadPump;
pub use stream::Stream;
