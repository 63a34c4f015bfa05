//! Buffered stream adapter.

use crate::decode;
use crate::engine::TransformEngine;
use crate::error::CodecResult;
use std::io::{self, BufRead, Cursor, Read, Seek, SeekFrom};
use tracing::debug;

/// Rewindable reader over eagerly transformed source.
///
/// The underlying stream is consumed to completion on construction, decoded
/// through the one-shot gateway, and the transformed text is exposed back
/// through the same read interface, so line-oriented and seek-based
/// consumers work against the rewritten source unchanged. No partial or
/// lazy reading is supported.
pub struct TranscodedReader {
    inner: Cursor<Vec<u8>>,
}

impl TranscodedReader {
    /// Drain `source` and decode it through the gateway
    pub fn new<R: Read>(mut source: R, engine: &dyn TransformEngine) -> CodecResult<Self> {
        let mut raw = Vec::new();
        source.read_to_end(&mut raw)?;
        let (text, _) = decode::decode(engine, &raw)?;
        debug!(raw = raw.len(), transformed = text.len(), "buffered stream ready");
        Ok(Self {
            inner: Cursor::new(text.into_bytes()),
        })
    }

    /// Length in bytes of the transformed text
    pub fn len(&self) -> usize {
        self.inner.get_ref().len()
    }

    /// True when the transformed text is empty
    pub fn is_empty(&self) -> bool {
        self.inner.get_ref().is_empty()
    }
}

impl Read for TranscodedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl BufRead for TranscodedReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.inner.consume(amt)
    }
}

impl Seek for TranscodedReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}
