use crate::window::Window;
use feed_common::{Empty, End, FeedCursor};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A replayable cursor over a single-pass source.
///
/// Every `Feed` holds an absolute position and a shared handle to the
/// [`Window`] buffering its source. Cloning a feed is a checkpoint: it
/// registers one more live cursor at the same position and copies no tokens.
/// Dropping a feed releases its position, which may let the window discard
/// tokens no cursor can reach anymore.
///
/// The source is pulled lazily, one token ahead of the furthest cursor.
pub struct Feed<I: Iterator> {
    pos: usize,
    window: Rc<RefCell<Window<I>>>,
}

/// Adapts any iterator into a [`Feed`].
pub fn adapt_iter<T>(source: T) -> Feed<T::IntoIter>
where
    T: IntoIterator,
    T::Item: Clone,
{
    Feed::new(source.into_iter())
}

impl<I: Iterator> Feed<I> {
    /// Creates the first cursor over `source`, positioned at its first token.
    pub fn new(source: I) -> Self {
        Self {
            pos: 0,
            window: Rc::new(RefCell::new(Window::new(source))),
        }
    }

    /// Returns the absolute position of this cursor.
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Returns true if the source is exhausted at this position.
    pub fn is_end(&self) -> bool {
        self.window.borrow().is_end(self.pos)
    }

    /// Same as [`is_end`](Self::is_end): a single-pass source has no pending state.
    pub fn is_empty(&self) -> bool {
        self.is_end()
    }

    /// Steps to the next position, pulling from the source if needed.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the end of the feed.
    pub fn advance(&mut self) -> &mut Self {
        self.pos = self.window.borrow_mut().advance(self.pos);
        self
    }

    /// Absolute position of the oldest token still buffered.
    pub fn window_start(&self) -> usize {
        self.window.borrow().start()
    }

    /// Number of tokens currently buffered for all cursors of this feed.
    pub fn window_len(&self) -> usize {
        self.window.borrow().len()
    }

    /// Number of live cursors sharing this feed's buffer.
    pub fn live_cursors(&self) -> usize {
        self.window.borrow().live_cursors()
    }
}

impl<I> Feed<I>
where
    I: Iterator,
    I::Item: Clone,
{
    /// Returns the current token without advancing.
    pub fn peek(&self) -> Option<I::Item> {
        let window = self.window.borrow();
        if window.is_end(self.pos) {
            None
        } else {
            Some(window.get(self.pos).clone())
        }
    }

    /// Returns the current token.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the end of the feed.
    pub fn get(&self) -> I::Item {
        self.window.borrow().get(self.pos).clone()
    }

    /// Advances the cursor and returns the token it stepped over.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the end of the feed.
    pub fn bump(&mut self) -> I::Item {
        let token = self.get();
        self.advance();
        token
    }
}

impl<I: Iterator> Clone for Feed<I> {
    fn clone(&self) -> Self {
        self.window.borrow_mut().add_client(self.pos);
        Self {
            pos: self.pos,
            window: Rc::clone(&self.window),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        // Register the new position before releasing the old one, so moving
        // within the same window never trims what we are about to point at.
        source.window.borrow_mut().add_client(source.pos);
        self.window.borrow_mut().remove_client(self.pos);
        self.pos = source.pos;
        self.window = Rc::clone(&source.window);
    }
}

impl<I: Iterator> Drop for Feed<I> {
    fn drop(&mut self) {
        self.window.borrow_mut().remove_client(self.pos);
    }
}

impl<I: Iterator> PartialEq for Feed<I> {
    /// Cursors are equal when they sit at the same position of the same feed.
    /// Cursors of different feeds are never equal.
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos && Rc::ptr_eq(&self.window, &other.window)
    }
}

impl<I: Iterator> PartialEq<Empty> for Feed<I> {
    fn eq(&self, _: &Empty) -> bool {
        self.is_empty()
    }
}

impl<I: Iterator> PartialEq<End> for Feed<I> {
    fn eq(&self, _: &End) -> bool {
        self.is_end()
    }
}

impl<I: Iterator> fmt::Debug for Feed<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Feed")
            .field("offset", &self.pos)
            .field("end", &self.is_end())
            .finish_non_exhaustive()
    }
}

impl<I> Iterator for Feed<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.peek()?;
        self.advance();
        Some(token)
    }
}

impl<I> FeedCursor for Feed<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Token = I::Item;

    fn peek(&self) -> Option<I::Item> {
        Feed::peek(self)
    }

    fn advance(&mut self) {
        Feed::advance(self);
    }

    fn is_empty(&self) -> bool {
        Feed::is_empty(self)
    }

    fn is_end(&self) -> bool {
        Feed::is_end(self)
    }
}
