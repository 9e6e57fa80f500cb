use crate::cursor::StreamFeed;
use feed_common::{FeedError, Result};
use std::cell::OnceCell;
use std::rc::Rc;
use tracing::{debug, trace};

/// What follows a chunk. Set exactly once.
pub(crate) enum Link<T> {
    Chunk(Rc<Node<T>>),
    Finished,
}

/// One immutable chunk of a [`Stream`] and the link to whatever follows it.
pub(crate) struct Node<T> {
    pub(crate) data: Box<[T]>,
    pub(crate) next: OnceCell<Link<T>>,
}

impl<T> Node<T> {
    fn new(data: Box<[T]>) -> Self {
        Self {
            data,
            next: OnceCell::new(),
        }
    }

    /// An empty node already marked as the end of its stream.
    fn sealed() -> Self {
        let node = Self::new(Box::default());
        node.link(Link::Finished);
        node
    }

    fn link(&self, link: Link<T>) {
        if self.next.set(link).is_err() {
            panic!("Stream: chunk is already linked");
        }
    }
}

impl<T> Drop for Node<T> {
    fn drop(&mut self) {
        // Unlink iteratively so a long chain held by a single cursor does not
        // overflow the stack when released.
        let mut link = self.next.take();
        while let Some(Link::Chunk(node)) = link {
            link = match Rc::try_unwrap(node) {
                Ok(mut node) => node.next.take(),
                Err(_) => None,
            };
        }
    }
}

/// An append-only log of immutable chunks.
///
/// One producer appends chunks while any number of [`StreamFeed`] cursors
/// read forward at their own pace. Chunks are shared, never copied; a chunk
/// is freed once no cursor can reach it anymore.
///
/// The stream only holds its tail. A cursor created with
/// [`begin`](Self::begin) starts at the beginning of the current tail chunk.
pub struct Stream<T> {
    /// `None` once finished.
    tail: Option<Rc<Node<T>>>,
    chunks: usize,
}

impl<T> Stream<T> {
    /// Creates an empty stream.
    pub fn new() -> Self {
        Self {
            tail: Some(Rc::new(Node::new(Box::default()))),
            chunks: 0,
        }
    }

    /// Appends a chunk, making it visible to every existing cursor.
    ///
    /// # Panics
    ///
    /// Panics if the stream is finished.
    pub fn append<C>(&mut self, chunk: C)
    where
        C: IntoIterator<Item = T>,
    {
        let Some(tail) = self.tail.take() else {
            panic!("Stream: append after finish");
        };
        let node = Rc::new(Node::new(chunk.into_iter().collect()));
        trace!(chunk = self.chunks, len = node.data.len(), "appending chunk");
        tail.link(Link::Chunk(Rc::clone(&node)));
        self.tail = Some(node);
        self.chunks += 1;
    }

    /// Like [`append`](Self::append), but reports a finished stream as an error.
    pub fn try_append<C>(&mut self, chunk: C) -> Result<()>
    where
        C: IntoIterator<Item = T>,
    {
        if self.is_finished() {
            return Err(FeedError::Finished);
        }
        self.append(chunk);
        Ok(())
    }

    /// Marks the stream as complete.
    ///
    /// Cursors that read up to the last chunk compare equal to
    /// [`End`](feed_common::End) from now on.
    ///
    /// # Panics
    ///
    /// Panics if the stream is already finished.
    pub fn finish(&mut self) {
        let Some(tail) = self.tail.take() else {
            panic!("Stream: finish called twice");
        };
        tail.link(Link::Finished);
        debug!(chunks = self.chunks, "stream finished");
    }

    pub fn is_finished(&self) -> bool {
        self.tail.is_none()
    }

    /// Number of chunks appended so far.
    pub fn chunk_count(&self) -> usize {
        self.chunks
    }

    /// Returns a cursor at the beginning of the current tail chunk.
    ///
    /// On a finished stream the cursor is already at the end.
    pub fn begin(&self) -> StreamFeed<T> {
        match &self.tail {
            Some(tail) => StreamFeed::new(Rc::clone(tail)),
            None => StreamFeed::new(Rc::new(Node::sealed())),
        }
    }
}

impl<T> Default for Stream<T> {
    fn default() -> Self {
        Self::new()
    }
}
