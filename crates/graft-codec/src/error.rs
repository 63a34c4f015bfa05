//! Codec pipeline error types

use crate::engine::TransformError;
use std::io;
use thiserror::Error;

/// Errors surfaced by the transcoding pipeline.
///
/// Every failure is terminal for the operation that raised it; the pipeline
/// performs no retries and has no partial-success mode.
#[derive(Debug, Error)]
pub enum CodecError {
    /// IO error reading a source
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Source bytes are not valid UTF-8
    #[error("source is not valid UTF-8")]
    Encoding,

    /// The transform engine rejected the embedded syntax
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// An incremental decoder was fed after finalization
    #[error("incremental decoder already finalized")]
    Finalized,
}

/// Specialized Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;
