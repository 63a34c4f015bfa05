//! Incremental transcoder.
//!
//! The engine needs the complete logical unit to rewrite embedded literals,
//! so this decoder accumulates chunks and transforms only when the caller
//! signals finalization. Correctness over incrementality.

use crate::engine::TransformEngine;
use crate::error::{CodecError, CodecResult};
use std::sync::Arc;

/// Outcome of one incremental feed.
///
/// `Pending` and `Complete("")` are distinct values: a consumer can tell
/// "more input needed" apart from "decoded the empty string".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeStep {
    /// More input is required before any output can be produced
    Pending,
    /// Finalization ran; the transformed text (possibly empty)
    Complete(String),
}

impl DecodeStep {
    /// True once this step carries transformed output
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }
}

/// Accumulate-then-finalize decoder for chunked input.
///
/// One instance serves one decode session: ACCUMULATING until the final
/// chunk, then FINALIZED for good. Calls are expected from a single caller,
/// sequentially.
pub struct IncrementalDecoder {
    engine: Arc<dyn TransformEngine>,
    buffer: Vec<u8>,
    finalized: bool,
}

impl IncrementalDecoder {
    /// Create a decoder for a fresh session
    pub fn new(engine: Arc<dyn TransformEngine>) -> Self {
        Self {
            engine,
            buffer: Vec::new(),
            finalized: false,
        }
    }

    /// Feed one chunk.
    ///
    /// Non-final chunks only grow the internal buffer and report
    /// [`DecodeStep::Pending`]; partial or even malformed input never
    /// errors mid-stream. The final chunk drains the buffer exactly once,
    /// runs the engine's text-only transform over the whole accumulated
    /// unit, and transitions this decoder to its terminal state. Engine
    /// errors therefore surface only at finalization.
    pub fn decode(&mut self, chunk: &[u8], is_final: bool) -> CodecResult<DecodeStep> {
        if self.finalized {
            return Err(CodecError::Finalized);
        }

        self.buffer.extend_from_slice(chunk);
        if !is_final {
            return Ok(DecodeStep::Pending);
        }

        let buffered = std::mem::take(&mut self.buffer);
        self.finalized = true;
        let text = self.engine.transform_text(&buffered)?;
        Ok(DecodeStep::Complete(text))
    }

    /// True once finalization has run
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }
}
