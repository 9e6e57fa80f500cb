use crate::stream::{Link, Node};
use feed_common::{Empty, End, FeedCursor};
use std::fmt;
use std::rc::Rc;

/// A cursor into a [`Stream`](crate::Stream).
///
/// Holds a chunk and an index inside it. When the index runs off the end of
/// its chunk and the producer has appended more, reads continue in the next
/// chunk transparently. Cloning is a checkpoint: chunks never change once
/// appended, so a copied `(chunk, index)` pair always reads the same tokens.
pub struct StreamFeed<T> {
    node: Rc<Node<T>>,
    index: usize,
}

/// Where the next token of a cursor lives, if anywhere.
enum Lookup<'a, T> {
    Token(&'a T),
    /// Caught up with the producer; more may arrive.
    Pending,
    /// The stream is finished and fully read.
    End,
}

impl<T> StreamFeed<T> {
    pub(crate) fn new(node: Rc<Node<T>>) -> Self {
        Self { node, index: 0 }
    }

    fn lookup(&self) -> Lookup<'_, T> {
        let mut node: &Node<T> = &self.node;
        let mut index = self.index;
        loop {
            if let Some(token) = node.data.get(index) {
                return Lookup::Token(token);
            }
            match node.next.get() {
                None => return Lookup::Pending,
                Some(Link::Finished) => return Lookup::End,
                Some(Link::Chunk(next)) => {
                    node = &**next;
                    index = 0;
                }
            }
        }
    }

    /// Steps past the current token, moving into later chunks as needed.
    ///
    /// # Panics
    ///
    /// Panics if no token is available at this position.
    pub fn advance(&mut self) -> &mut Self {
        while self.index >= self.node.data.len() {
            let next = match self.node.next.get() {
                Some(Link::Chunk(next)) => Rc::clone(next),
                Some(Link::Finished) => {
                    panic!("StreamFeed: cannot advance past the end of the stream")
                }
                None => panic!("StreamFeed: cannot advance past the data appended so far"),
            };
            self.node = next;
            self.index = 0;
        }
        self.index += 1;
        self
    }

    /// Returns true if no token is available right now.
    pub fn is_empty(&self) -> bool {
        !matches!(self.lookup(), Lookup::Token(_))
    }

    /// Returns true if the stream is finished and this cursor has read all of it.
    pub fn is_end(&self) -> bool {
        matches!(self.lookup(), Lookup::End)
    }

    /// Returns true if this cursor has caught up with an unfinished stream.
    pub fn is_pending(&self) -> bool {
        matches!(self.lookup(), Lookup::Pending)
    }
}

impl<T: Clone> StreamFeed<T> {
    /// Returns the current token, or `None` if nothing is available yet.
    pub fn peek(&self) -> Option<T> {
        match self.lookup() {
            Lookup::Token(token) => Some(token.clone()),
            Lookup::Pending | Lookup::End => None,
        }
    }

    /// Returns the current token.
    ///
    /// # Panics
    ///
    /// Panics if no token is available at this position.
    pub fn get(&self) -> T {
        match self.lookup() {
            Lookup::Token(token) => token.clone(),
            Lookup::Pending | Lookup::End => {
                panic!("StreamFeed: no token available at this position")
            }
        }
    }

    /// Advances the cursor and returns the token it stepped over.
    pub fn bump(&mut self) -> T {
        let token = self.get();
        self.advance();
        token
    }
}

impl<T> Clone for StreamFeed<T> {
    fn clone(&self) -> Self {
        Self {
            node: Rc::clone(&self.node),
            index: self.index,
        }
    }
}

impl<T> PartialEq for StreamFeed<T> {
    /// Cursors are equal when they hold the same chunk at the same index.
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.node, &other.node) && self.index == other.index
    }
}

impl<T> PartialEq<Empty> for StreamFeed<T> {
    fn eq(&self, _: &Empty) -> bool {
        self.is_empty()
    }
}

impl<T> PartialEq<End> for StreamFeed<T> {
    fn eq(&self, _: &End) -> bool {
        self.is_end()
    }
}

impl<T> fmt::Debug for StreamFeed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.lookup() {
            Lookup::Token(_) => "ready",
            Lookup::Pending => "pending",
            Lookup::End => "end",
        };
        f.debug_struct("StreamFeed")
            .field("index", &self.index)
            .field("chunk_len", &self.node.data.len())
            .field("state", &state)
            .finish()
    }
}

impl<T: Clone> Iterator for StreamFeed<T> {
    type Item = T;

    /// Yields the next token, or `None` while nothing is available. Iteration
    /// can resume after the producer appends more.
    fn next(&mut self) -> Option<T> {
        let token = self.peek()?;
        self.advance();
        Some(token)
    }
}

impl<T: Clone> FeedCursor for StreamFeed<T> {
    type Token = T;

    fn peek(&self) -> Option<T> {
        StreamFeed::peek(self)
    }

    fn advance(&mut self) {
        StreamFeed::advance(self);
    }

    fn is_empty(&self) -> bool {
        StreamFeed::is_empty(self)
    }

    fn is_end(&self) -> bool {
        StreamFeed::is_end(self)
    }
}
