//! Source loading layer.
//!
//! The file-reading front of the pipeline: raw bytes in, interpreter-ready
//! text out. Sources declaring a recognized coding are routed through the
//! registry's decode gateway; everything else falls through to plain UTF-8.
//! Loading a file through this layer is what triggers the transcoding — no
//! caller ever invokes the engine directly.

use crate::coding;
use crate::error::{CodecError, CodecResult};
use crate::registry;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Read and decode one source file
pub fn read_source(path: &Path) -> CodecResult<String> {
    let raw = fs::read(path)?;
    debug!(path = %path.display(), bytes = raw.len(), "loading source");
    decode_source(&raw)
}

/// Decode raw source bytes, honoring a declared coding.
///
/// A declared but unrecognized name is not an error; the bytes are read as
/// plain UTF-8, exactly as if no declaration were present.
pub fn decode_source(raw: &[u8]) -> CodecResult<String> {
    if let Some(name) = coding::declared_coding(raw) {
        if let Some(codec) = registry::lookup(&name) {
            debug!(coding = %name, "transcoding source");
            let (text, _) = codec.decode(raw)?;
            return Ok(text);
        }
    }
    String::from_utf8(raw.to_vec()).map_err(|_| CodecError::Encoding)
}
