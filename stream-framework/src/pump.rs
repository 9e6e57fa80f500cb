//! Feeding a [`Stream`] from a blocking reader.

use crate::stream::Stream;
use feed_common::Result;
use std::io::{self, Read};
use tracing::{debug, trace};

/// Reads a [`Read`] into a [`Stream<u8>`] one chunk at a time.
///
/// Each successful read becomes one chunk. When the reader reports EOF the
/// stream is finished.
pub struct ReadPump<R> {
    reader: R,
    chunk_size: usize,
    done: bool,
}

impl<R: Read> ReadPump<R> {
    pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

    pub fn new(reader: R) -> Self {
        Self {
            reader,
            chunk_size: Self::DEFAULT_CHUNK_SIZE,
            done: false,
        }
    }

    /// Sets the largest chunk a single read may append.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "ReadPump: chunk size must be positive");
        self.chunk_size = chunk_size;
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Returns true once the reader hit EOF.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Performs one read and appends what it got.
    ///
    /// Returns the number of bytes appended. `Ok(0)` means the reader is
    /// exhausted and the stream has been finished.
    pub fn pump(&mut self, stream: &mut Stream<u8>) -> Result<usize> {
        if self.done {
            return Ok(0);
        }

        let mut chunk = vec![0u8; self.chunk_size];
        let read = loop {
            match self.reader.read(&mut chunk) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        };

        if read == 0 {
            self.done = true;
            if !stream.is_finished() {
                stream.finish();
            }
            debug!(chunks = stream.chunk_count(), "reader exhausted");
            return Ok(0);
        }

        chunk.truncate(read);
        stream.try_append(chunk)?;
        trace!(bytes = read, "pumped chunk");
        Ok(read)
    }

    /// Pumps until the reader is exhausted. Returns the total number of bytes appended.
    pub fn pump_to_end(&mut self, stream: &mut Stream<u8>) -> Result<usize> {
        let mut total = 0;
        loop {
            match self.pump(stream)? {
                0 => return Ok(total),
                n => total += n,
            }
        }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}
