//! Transcoding pipeline for query-embedded Lua sources.
//!
//! Lua files containing backtick-fenced query literals are illegal Lua as
//! written. This crate lets them run on a stock interpreter anyway by
//! intercepting the step that turns raw file bytes into source text: files
//! opt in with a `-- coding: gql` comment on one of their first two lines,
//! and the loading layer rewrites every fenced literal into a plain Lua
//! string before the interpreter ever tokenizes the file.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  script.lua                                  │
//! │                                              │
//! │  -- coding: gql                              │
//! │  local q = `query { viewer { login } }`      │
//! └──────────────────────────────────────────────┘
//!             │  read_source / require
//!             ▼
//! ┌──────────────────────────────────────────────┐
//! │  registry lookup("gql") → Codec              │
//! │  decode gateway → QueryRewriter              │
//! └──────────────────────────────────────────────┘
//!             │
//!             ▼
//! ┌──────────────────────────────────────────────┐
//! │  -- coding: utf-8                            │
//! │  -- coding: gql                              │
//! │  local q = [[query { viewer { login } }]]    │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Three consumption protocols share the same engine: the one-shot
//! [`decode::decode`] gateway, the accumulate-then-finalize
//! [`IncrementalDecoder`], and the rewindable [`TranscodedReader`] for
//! line-oriented consumers. The registry is installed once per process and
//! answers only for the closed alias set in [`CODING_ALIASES`]; every other
//! name falls through to plain UTF-8 reading.

pub mod coding;
pub mod decode;
pub mod engine;
pub mod error;
pub mod incremental;
pub mod registry;
pub mod source;
pub mod stream;

pub use coding::{declared_coding, CODING_ALIASES, UTF8_CODING_LINE};
pub use engine::{QueryRewriter, TransformEngine, TransformError, Transformed};
pub use error::{CodecError, CodecResult};
pub use incremental::{DecodeStep, IncrementalDecoder};
pub use registry::{install, install_with, lookup, Codec};
pub use source::{decode_source, read_source};
pub use stream::TranscodedReader;
