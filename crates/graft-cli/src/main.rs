use anyhow::Result;
use graft_cli::{cli::RunMode, cli::USAGE, harness::Harness};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Filter comes from GRAFT_LOG; default stays quiet so the only thing
    // this binary ever prints on its own is the usage text.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("GRAFT_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let mode = match RunMode::from_args(std::env::args()) {
        Ok(mode) => mode,
        Err(_) => {
            println!("{USAGE}");
            std::process::exit(1);
        }
    };

    Harness::new()?.run(mode)?;
    Ok(())
}
