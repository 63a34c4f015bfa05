//! Integration tests for the execution harness: entry-point identity,
//! argument bookkeeping, and transcoded execution end to end.

use graft_cli::cli::RunMode;
use graft_cli::harness::{Harness, HarnessError};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_script(dir: &TempDir, name: &str, source: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, source).unwrap();
    path
}

fn global_string(harness: &Harness, name: &str) -> Option<String> {
    harness.lua().globals().get::<Option<String>>(name).unwrap()
}

fn prepend_search_path(harness: &Harness, dir: &Path) {
    harness
        .lua()
        .load(format!(
            "package.path = [[{}/?.lua;]] .. package.path",
            dir.display()
        ))
        .exec()
        .unwrap();
}

#[test]
fn script_mode_runs_plain_lua() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "main.lua", "answer = tostring(41 + 1)\n");

    let harness = Harness::new().unwrap();
    harness.run_script(&script, &[]).unwrap();

    assert_eq!(global_string(&harness, "answer").as_deref(), Some("42"));
}

#[test]
fn script_mode_argument_vector_without_extra_args() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        &dir,
        "main.lua",
        "seen_zero = arg[0]\nseen_count = tostring(#arg)\nseen_one = arg[1]\n",
    );

    let harness = Harness::new().unwrap();
    harness.run_script(&script, &[]).unwrap();

    // Just the script path: arg[0] set, nothing at 1 and up.
    assert_eq!(
        global_string(&harness, "seen_zero").as_deref(),
        Some(script.display().to_string().as_str())
    );
    assert_eq!(global_string(&harness, "seen_count").as_deref(), Some("0"));
    assert_eq!(global_string(&harness, "seen_one"), None);
}

#[test]
fn script_mode_shifts_trailing_args_into_view() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        &dir,
        "main.lua",
        "first = arg[1]\nsecond = arg[2]\nvia_varargs = select('#', ...) .. ':' .. (select(1, ...))\n",
    );

    let harness = Harness::new().unwrap();
    harness
        .run_script(&script, &["alpha".to_string(), "beta".to_string()])
        .unwrap();

    assert_eq!(global_string(&harness, "first").as_deref(), Some("alpha"));
    assert_eq!(global_string(&harness, "second").as_deref(), Some("beta"));
    assert_eq!(global_string(&harness, "via_varargs").as_deref(), Some("2:alpha"));
}

#[test]
fn script_observes_its_own_path_as_chunk_identity() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "main.lua", "error('boom')\n");

    let harness = Harness::new().unwrap();
    let err = harness.run_script(&script, &[]).unwrap_err();

    // Runtime errors carry the chunk name, which is the script path.
    assert!(err.to_string().contains(&script.display().to_string()));
}

#[test]
fn top_level_definitions_land_in_the_shared_globals() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        &dir,
        "main.lua",
        "function main() return 'entry' end\nreflected = tostring(_G.main ~= nil)\n",
    );

    let harness = Harness::new().unwrap();
    harness.run_script(&script, &[]).unwrap();

    assert_eq!(global_string(&harness, "reflected").as_deref(), Some("true"));
}

#[test]
fn query_coded_script_is_transcoded_before_execution() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        &dir,
        "coded.lua",
        "-- coding: gql\nquery = `query {\n  viewer { login }\n}`\n",
    );

    let harness = Harness::new().unwrap();
    harness.run_script(&script, &[]).unwrap();

    assert_eq!(
        global_string(&harness, "query").as_deref(),
        Some("query {\n  viewer { login }\n}")
    );
}

#[test]
fn transcoded_and_pretranscoded_runs_are_equivalent() {
    let dir = TempDir::new().unwrap();
    let coded = write_script(&dir, "coded.lua", "-- coding: gql\nresult = `{ me }` .. '!'\n");

    // Decode the coded file, persist the transformed text, and run that
    // as a plain script.
    graft_codec::install();
    let raw = fs::read(&coded).unwrap();
    let text = graft_codec::decode_source(&raw).unwrap();
    let plain = write_script(&dir, "plain.lua", &text);

    let via_codec = Harness::new().unwrap();
    via_codec.run_script(&coded, &[]).unwrap();

    let direct = Harness::new().unwrap();
    direct.run_script(&plain, &[]).unwrap();

    assert_eq!(
        global_string(&via_codec, "result"),
        global_string(&direct, "result")
    );
    assert_eq!(global_string(&direct, "result").as_deref(), Some("{ me }!"));
}

#[test]
fn module_mode_resolves_on_the_search_path() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("tools")).unwrap();
    write_script(
        &dir,
        "tools/report.lua",
        "ran_as = arg[0]\nmodule_arg = arg[1]\n",
    );

    let harness = Harness::new().unwrap();
    prepend_search_path(&harness, dir.path());
    harness
        .run_module("tools.report", &["--limit".to_string()])
        .unwrap();

    // The module observes the resolved path as its entry-point identity
    // and only its own arguments.
    let ran_as = global_string(&harness, "ran_as").unwrap();
    assert!(ran_as.ends_with("tools/report.lua"));
    assert_eq!(global_string(&harness, "module_arg").as_deref(), Some("--limit"));
}

#[test]
fn module_mode_missing_module_names_the_candidates() {
    let harness = Harness::new().unwrap();
    let err = harness.run_module("no.such.module", &[]).unwrap_err();

    match err {
        HarnessError::ModuleNotFound { name, tried } => {
            assert_eq!(name, "no.such.module");
            assert!(!tried.is_empty());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn require_routes_query_coded_modules_through_the_codec() {
    let dir = TempDir::new().unwrap();
    write_script(
        &dir,
        "queries.lua",
        "-- coding: gql\nreturn { viewer = `{ viewer { login } }` }\n",
    );
    let main = write_script(
        &dir,
        "main.lua",
        "local queries = require('queries')\nviewer = queries.viewer\n",
    );

    let harness = Harness::new().unwrap();
    prepend_search_path(&harness, dir.path());
    harness.run_script(&main, &[]).unwrap();

    assert_eq!(
        global_string(&harness, "viewer").as_deref(),
        Some("{ viewer { login } }")
    );
}

#[test]
fn require_leaves_plain_modules_to_the_stock_searchers() {
    let dir = TempDir::new().unwrap();
    write_script(&dir, "plainmod.lua", "return { kind = 'plain' }\n");
    let main = write_script(
        &dir,
        "main.lua",
        "kind = require('plainmod').kind\n",
    );

    let harness = Harness::new().unwrap();
    prepend_search_path(&harness, dir.path());
    harness.run_script(&main, &[]).unwrap();

    assert_eq!(global_string(&harness, "kind").as_deref(), Some("plain"));
}

#[test]
fn malformed_query_literal_fails_the_load() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "bad.lua", "-- coding: gql\nq = `never closed\n");

    let harness = Harness::new().unwrap();
    let err = harness.run_script(&script, &[]).unwrap_err();

    assert!(matches!(err, HarnessError::Codec(_)));
}

#[test]
fn run_mode_dispatch_covers_both_variants() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "main.lua", "ok = 'script'\n");

    let harness = Harness::new().unwrap();
    harness
        .run(RunMode::Script {
            path: script,
            args: vec![],
        })
        .unwrap();
    assert_eq!(global_string(&harness, "ok").as_deref(), Some("script"));
}
