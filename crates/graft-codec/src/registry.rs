//! Codec descriptor and the process-wide registry hook.
//!
//! The host's lookup mechanism is global, so the registry is a write-once,
//! read-many process-scoped cell rather than a mutable singleton.
//! Installation happens once during process initialization; lookups after
//! that are idempotent reads and need no locking.

use crate::coding::CODING_ALIASES;
use crate::decode;
use crate::engine::{QueryRewriter, TransformEngine};
use crate::error::CodecResult;
use crate::incremental::IncrementalDecoder;
use crate::stream::TranscodedReader;
use once_cell::sync::OnceCell;
use std::io::{Read, Write};
use std::sync::Arc;
use tracing::debug;

/// Immutable bundle of codec operations for the recognized codings.
///
/// The decode direction routes through the transform engine; the encode
/// direction needs no transform and reuses the host's native UTF-8
/// behavior. A descriptor handed out once stays referentially stable for
/// the process lifetime, so callers may cache it.
pub struct Codec {
    engine: Arc<dyn TransformEngine>,
}

impl Codec {
    fn new(engine: Arc<dyn TransformEngine>) -> Self {
        Self { engine }
    }

    /// Encode text to bytes (native UTF-8 passthrough)
    pub fn encode(&self, text: &str) -> Vec<u8> {
        text.as_bytes().to_vec()
    }

    /// One-shot decode of a complete buffer
    pub fn decode(&self, input: &[u8]) -> CodecResult<(String, usize)> {
        decode::decode(self.engine.as_ref(), input)
    }

    /// Fresh incremental decoder for one chunked decode session
    pub fn incremental_decoder(&self) -> IncrementalDecoder {
        IncrementalDecoder::new(Arc::clone(&self.engine))
    }

    /// Rewindable reader over the transformed content of `source`
    pub fn reader<R: Read>(&self, source: R) -> CodecResult<TranscodedReader> {
        TranscodedReader::new(source, self.engine.as_ref())
    }

    /// Stream writer: encoding outward is plain UTF-8, so the sink is used
    /// as-is.
    pub fn writer<W: Write>(&self, sink: W) -> W {
        sink
    }
}

static REGISTRY: OnceCell<Arc<Codec>> = OnceCell::new();

/// Install the registry hook with the default engine. Idempotent.
pub fn install() -> Arc<Codec> {
    install_with(Arc::new(QueryRewriter))
}

/// Install the registry hook with an explicit engine.
///
/// The first installation wins: later calls do not duplicate entries or
/// swap engines, they return the descriptor already registered, so cached
/// lookups stay identity-stable.
pub fn install_with(engine: Arc<dyn TransformEngine>) -> Arc<Codec> {
    let codec = REGISTRY.get_or_init(|| {
        debug!(aliases = ?CODING_ALIASES, "installing codec registry");
        Arc::new(Codec::new(engine))
    });
    Arc::clone(codec)
}

/// Look up a codec by declared coding name.
///
/// `None` for anything outside the recognized alias set (or before any
/// installation) is the normal fall-through signal, not an error: the
/// caller continues with its own resolution.
pub fn lookup(name: &str) -> Option<Arc<Codec>> {
    if !CODING_ALIASES.contains(&name) {
        return None;
    }
    REGISTRY.get().map(Arc::clone)
}
