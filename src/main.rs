//! Binary for hazel

#![warn(missing_docs)]

mod cmd;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[doc(hidden)]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = cmd::Cli::parse();

    match cli.command {
        cmd::Commands::Show(a) => a.run(),
        cmd::Commands::Simulate(a) => a.run(),
        cmd::Commands::Compare(a) => a.run(),
    }
}
