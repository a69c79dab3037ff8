//! `kwtriage` entry point.
//!
//! Reports go to stdout; diagnostics go through `tracing` to stderr
//! (`RUST_LOG`, default `info`).

use clap::Parser;
use kwtriage_cli::Cli;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("kwtriage v{} starting", kwtriage_core::VERSION);

    let code = Cli::parse().run();
    std::process::exit(code);
}
