//! Execution harness for query-coded Lua sources.
//!
//! `graft-run` launches a script or module as if it were the program's
//! entry point, with the codec registry installed in front of every source
//! load. The harness itself never decodes anything: loading the target
//! through the source layer (or through `require`) is what triggers the
//! registry hook when a file declares a recognized coding.

pub mod cli;
pub mod harness;

pub use cli::{InvalidInvocation, RunMode, USAGE};
pub use harness::{Harness, HarnessError};
