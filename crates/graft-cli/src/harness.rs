//! Execution harness: runs a script or module as the program entry point.
//!
//! The harness owns one Lua state and does identity/argument bookkeeping
//! only. Decoding happens in the source layer it loads through, which is
//! where the registry hook fires for query-coded files; the interpreter
//! itself is stock.

use crate::cli::RunMode;
use graft_codec::{declared_coding, decode_source, lookup, read_source, CodecError};
use mlua::{Function, Lua, MultiValue, Table, Value, Variadic};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Harness error type
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Source loading or transcoding failed
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Interpreter-level failure (load or runtime)
    #[error(transparent)]
    Lua(#[from] mlua::Error),

    /// Module resolution exhausted the search path
    #[error("module '{name}' not found, tried {tried:?}")]
    ModuleNotFound {
        /// Dotted module name as requested
        name: String,
        /// Candidate paths probed, in search-path order
        tried: Vec<PathBuf>,
    },
}

/// Runs a target as the program's main chunk.
pub struct Harness {
    lua: Lua,
}

impl Harness {
    /// Create an interpreter with the codec registry installed and a
    /// transcoding-aware searcher wired into `package.searchers`, so both
    /// the entry point and anything it `require`s load through the same
    /// source layer.
    pub fn new() -> Result<Self, HarnessError> {
        graft_codec::install();
        let lua = Lua::new();
        install_searcher(&lua)?;
        Ok(Self { lua })
    }

    /// The interpreter state, for callers that need to prepare or inspect
    /// globals around a run
    pub fn lua(&self) -> &Lua {
        &self.lua
    }

    /// Execute the resolved mode
    pub fn run(&self, mode: RunMode) -> Result<(), HarnessError> {
        match mode {
            RunMode::Module { name, args } => self.run_module(&name, &args),
            RunMode::Script { path, args } => self.run_script(&path, &args),
        }
    }

    /// Execute `path` as the entry point.
    ///
    /// The chunk is named `@<path>` so the script observes the same
    /// current-file identity as a directly launched one, and it executes
    /// against the shared globals table, so top-level definitions are
    /// visible to reflective self-lookup.
    pub fn run_script(&self, path: &Path, args: &[String]) -> Result<(), HarnessError> {
        let source = read_source(path)?;
        self.set_arg_table(path, args)?;

        let chunk_args: Variadic<String> = args.iter().cloned().collect();
        self.lua
            .load(&source)
            .set_name(format!("@{}", path.display()))
            .call::<()>(chunk_args)?;
        Ok(())
    }

    /// Resolve `name` against `package.path` and execute the hit as main
    pub fn run_module(&self, name: &str, args: &[String]) -> Result<(), HarnessError> {
        let path = self.resolve_module(name)?;
        debug!(module = name, path = %path.display(), "resolved module");
        self.run_script(&path, args)
    }

    fn resolve_module(&self, name: &str) -> Result<PathBuf, HarnessError> {
        let package: Table = self.lua.globals().get("package")?;
        let search_path: String = package.get("path")?;
        resolve_on_path(name, &search_path).map_err(|tried| HarnessError::ModuleNotFound {
            name: name.to_string(),
            tried,
        })
    }

    /// Build the `arg` table the way a directly launched script sees it:
    /// `arg[0]` is the script path, trailing arguments fill 1..
    fn set_arg_table(&self, path: &Path, args: &[String]) -> Result<(), HarnessError> {
        let table = self.lua.create_table()?;
        table.set(0, path.display().to_string())?;
        for (i, arg) in args.iter().enumerate() {
            table.set(i + 1, arg.as_str())?;
        }
        self.lua.globals().set("arg", table)?;
        Ok(())
    }
}

/// Substitute a module name into each `?` template of a `;`-separated
/// search path, returning the first existing file or every path probed.
fn resolve_on_path(name: &str, search_path: &str) -> Result<PathBuf, Vec<PathBuf>> {
    let slashed = name.replace('.', "/");
    let mut tried = Vec::new();
    for template in search_path.split(';').filter(|t| !t.is_empty()) {
        let candidate = PathBuf::from(template.replace('?', &slashed));
        if candidate.is_file() {
            return Ok(candidate);
        }
        tried.push(candidate);
    }
    Err(tried)
}

/// Wire a searcher into `package.searchers` that loads query-coded modules
/// through the transcoding layer.
///
/// It sits after the preload table and ahead of the stock file loader, and
/// claims only files that declare a recognized coding; everything else is
/// answered with a not-handled message so the stock searchers proceed.
fn install_searcher(lua: &Lua) -> Result<(), HarnessError> {
    let searcher = lua.create_function(|lua, name: String| {
        let package: Table = lua.globals().get("package")?;
        let search_path: String = package.get("path")?;

        let path = match resolve_on_path(&name, &search_path) {
            Ok(path) => path,
            Err(_) => return not_handled(lua, &name),
        };
        let raw = std::fs::read(&path).map_err(mlua::Error::external)?;
        let coded = declared_coding(&raw)
            .map(|coding| lookup(&coding).is_some())
            .unwrap_or(false);
        if !coded {
            return not_handled(lua, &name);
        }

        debug!(module = %name, path = %path.display(), "loading query-coded module");
        let source = decode_source(&raw).map_err(mlua::Error::external)?;
        let loader = lua
            .load(&source)
            .set_name(format!("@{}", path.display()))
            .into_function()?;
        Ok(MultiValue::from_iter([
            Value::Function(loader),
            Value::String(lua.create_string(path.display().to_string())?),
        ]))
    })?;

    let insert: Function = lua
        .load("return function(s) table.insert(package.searchers, 2, s) end")
        .eval()?;
    insert.call::<()>(searcher)?;
    Ok(())
}

/// Searcher protocol answer for modules this layer does not claim
fn not_handled(lua: &Lua, name: &str) -> mlua::Result<MultiValue> {
    let message = lua.create_string(format!("no query-coded file for '{name}'"))?;
    Ok(MultiValue::from_iter([Value::String(message)]))
}
