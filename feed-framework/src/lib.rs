pub mod feed;
pub mod forward;
pub mod window;

pub use feed::{adapt_iter, Feed};
pub use feed_common::{Empty, End, FeedCursor, FeedCursorExt, FeedError};
pub use forward::{adapt_slice, adapt_str, ForwardFeed, MultiPass, SliceSource, StrSource};
pub use window::Window;
