//! Argument surface for the `graft-run` harness.

use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

/// Usage text printed on invalid invocation
pub const USAGE: &str = "\
Wraps a Lua command to allow it to recognize query-coded files with
no source modifications.

Usage:
    graft-run -m module.to.run [args...]
    graft-run path/to/script.lua [args...]
";

/// Raw argument surface.
///
/// Help and version flags are disabled: the usage contract (exactly one
/// message, on stdout, exit status 1) belongs to [`RunMode::from_args`],
/// not to clap's error machinery.
#[derive(Debug, Parser)]
#[command(name = "graft-run", disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// Run the target as a module resolved on the interpreter search path
    #[arg(short = 'm', value_name = "MODULE")]
    pub module: Option<String>,

    /// Script path followed by the arguments handed to the target
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "TARGET")]
    pub rest: Vec<String>,
}

/// The resolved execution mode: one closed variant per target shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Execute a module located by standard module resolution
    Module {
        /// Dotted module name
        name: String,
        /// Arguments visible to the executed module
        args: Vec<String>,
    },
    /// Execute a script file directly
    Script {
        /// Script path, also the target's `arg[0]` identity
        path: PathBuf,
        /// Arguments visible to the executed script
        args: Vec<String>,
    },
}

/// Marker for the usage-and-exit path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid invocation")]
pub struct InvalidInvocation;

impl RunMode {
    /// Map raw arguments onto a mode, or signal an invalid invocation.
    ///
    /// Every failure collapses onto the same usage path: no target at all,
    /// and `-m` without a following module name. Nothing is loaded or
    /// imported before this decision.
    pub fn from_args<I>(argv: I) -> Result<Self, InvalidInvocation>
    where
        I: IntoIterator<Item = String>,
    {
        let cli = Cli::try_parse_from(argv).map_err(|_| InvalidInvocation)?;

        match cli.module {
            Some(name) => Ok(RunMode::Module {
                name,
                args: cli.rest,
            }),
            None => {
                let mut rest = cli.rest.into_iter();
                match rest.next() {
                    Some(path) => Ok(RunMode::Script {
                        path: PathBuf::from(path),
                        args: rest.collect(),
                    }),
                    None => Err(InvalidInvocation),
                }
            }
        }
    }
}
