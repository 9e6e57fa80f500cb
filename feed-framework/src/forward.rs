//! Cursors over sources that already support durable positions.
//!
//! A [`MultiPass`] source can be copied and compared, so there is nothing to
//! buffer: [`ForwardFeed`] holds the source's own position and delegates to
//! it. It behaves exactly like a [`Feed`](crate::Feed) over the same data.

use feed_common::{Empty, End, FeedCursor};

/// A source whose positions can be copied, compared, and resumed.
///
/// Clones must be independent: stepping one never affects another. Two
/// positions compare equal only if they refer to the same underlying data
/// at the same place.
pub trait MultiPass: Clone + PartialEq {
    /// The token type yielded by the source.
    type Token;

    /// Returns the token at this position, or `None` at the end.
    fn current(&self) -> Option<Self::Token>;

    /// Moves to the next position.
    ///
    /// # Panics
    ///
    /// Implementations panic when already at the end.
    fn step(&mut self);
}

/// A position in a borrowed slice.
#[derive(Debug, Clone, Copy)]
pub struct SliceSource<'a, T> {
    data: &'a [T],
    index: usize,
}

impl<'a, T> SliceSource<'a, T> {
    pub fn new(data: &'a [T]) -> Self {
        Self { data, index: 0 }
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl<T> PartialEq for SliceSource<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.data, other.data) && self.index == other.index
    }
}

impl<T: Clone> MultiPass for SliceSource<'_, T> {
    type Token = T;

    fn current(&self) -> Option<T> {
        self.data.get(self.index).cloned()
    }

    fn step(&mut self) {
        assert!(
            self.index < self.data.len(),
            "SliceSource: cannot step past the end of the slice"
        );
        self.index += 1;
    }
}

/// A position in a borrowed string, yielding `char`s.
#[derive(Debug, Clone, Copy)]
pub struct StrSource<'a> {
    text: &'a str,
    /// Byte offset of the current char.
    offset: usize,
}

impl<'a> StrSource<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, offset: 0 }
    }

    /// Returns the current offset in bytes.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl PartialEq for StrSource<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.text, other.text) && self.offset == other.offset
    }
}

impl MultiPass for StrSource<'_> {
    type Token = char;

    fn current(&self) -> Option<char> {
        self.text[self.offset..].chars().next()
    }

    fn step(&mut self) {
        let Some(ch) = self.current() else {
            panic!("StrSource: cannot step past the end of the string");
        };
        self.offset += ch.len_utf8();
    }
}

/// A cursor that delegates to a [`MultiPass`] source without buffering.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardFeed<S: MultiPass> {
    source: S,
}

/// Adapts a slice into a [`ForwardFeed`].
pub fn adapt_slice<T: Clone>(data: &[T]) -> ForwardFeed<SliceSource<'_, T>> {
    ForwardFeed::new(SliceSource::new(data))
}

/// Adapts a string into a [`ForwardFeed`] of `char`s.
pub fn adapt_str(text: &str) -> ForwardFeed<StrSource<'_>> {
    ForwardFeed::new(StrSource::new(text))
}

impl<S: MultiPass> ForwardFeed<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Returns the underlying source position.
    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn peek(&self) -> Option<S::Token> {
        self.source.current()
    }

    /// Returns the current token.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the end of the feed.
    pub fn get(&self) -> S::Token {
        match self.source.current() {
            Some(token) => token,
            None => panic!("ForwardFeed: cannot read past the end of the feed"),
        }
    }

    pub fn advance(&mut self) -> &mut Self {
        self.source.step();
        self
    }

    /// Advances the cursor and returns the token it stepped over.
    pub fn bump(&mut self) -> S::Token {
        let token = self.get();
        self.source.step();
        token
    }

    pub fn is_end(&self) -> bool {
        self.source.current().is_none()
    }

    pub fn is_empty(&self) -> bool {
        self.is_end()
    }
}

impl<S: MultiPass> PartialEq<Empty> for ForwardFeed<S> {
    fn eq(&self, _: &Empty) -> bool {
        self.is_empty()
    }
}

impl<S: MultiPass> PartialEq<End> for ForwardFeed<S> {
    fn eq(&self, _: &End) -> bool {
        self.is_end()
    }
}

impl<S: MultiPass> Iterator for ForwardFeed<S> {
    type Item = S::Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.source.current()?;
        self.source.step();
        Some(token)
    }
}

impl<S: MultiPass> FeedCursor for ForwardFeed<S> {
    type Token = S::Token;

    fn peek(&self) -> Option<S::Token> {
        ForwardFeed::peek(self)
    }

    fn advance(&mut self) {
        ForwardFeed::advance(self);
    }

    fn is_empty(&self) -> bool {
        ForwardFeed::is_empty(self)
    }

    fn is_end(&self) -> bool {
        ForwardFeed::is_end(self)
    }
}
