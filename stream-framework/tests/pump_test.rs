#![cfg(feature = "streaming")]

use std::io::{self, Read};
use stream_framework::{End, FeedError, ReadPump, Stream};

/// A reader that fails after yielding its data.
struct FailingReader {
    data: &'static [u8],
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.data.is_empty() {
            return Err(io::Error::new(io::ErrorKind::ConnectionReset, "peer went away"));
        }
        let n = buf.len().min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

#[test]
fn test_pump_chunks_and_finishes() {
    let mut stream = Stream::new();
    let cursor = stream.begin();
    let mut pump = ReadPump::new(&b"hello world"[..]).with_chunk_size(4);

    assert_eq!(pump.pump(&mut stream).unwrap(), 4);
    assert_eq!(stream.chunk_count(), 1);
    assert_eq!(pump.pump_to_end(&mut stream).unwrap(), 7);
    assert!(pump.is_done());
    assert!(stream.is_finished());
    assert_eq!(stream.chunk_count(), 3);

    let mut reader = cursor.clone();
    let text: Vec<u8> = reader.by_ref().collect();
    assert_eq!(text, b"hello world");
    assert_eq!(reader, End);
}

#[test]
fn test_pump_after_done_is_noop() {
    let mut stream = Stream::new();
    let mut pump = ReadPump::new(io::empty());
    assert_eq!(pump.pump(&mut stream).unwrap(), 0);
    assert_eq!(pump.pump(&mut stream).unwrap(), 0);
    assert!(stream.is_finished());
}

#[test]
fn test_reader_error_is_reported() {
    let mut stream = Stream::new();
    let cursor = stream.begin();
    let mut pump = ReadPump::new(FailingReader { data: b"ab" }).with_chunk_size(8);

    let err = pump.pump_to_end(&mut stream).unwrap_err();
    assert!(matches!(err, FeedError::Io(_)));
    assert!(!stream.is_finished());
    assert_eq!(cursor.collect::<Vec<_>>(), b"ab".to_vec());
}

#[test]
fn test_default_chunk_size() {
    let pump = ReadPump::new(io::empty());
    assert_eq!(pump.chunk_size(), ReadPump::<io::Empty>::DEFAULT_CHUNK_SIZE);
}

#[test]
#[should_panic(expected = "chunk size must be positive")]
fn test_zero_chunk_size_panics() {
    let _ = ReadPump::new(io::empty()).with_chunk_size(0);
}
