//! AssetSleuth: unused image asset finder for Xcode projects.
//!
//! Thin binary entry point. All logic lives in the `assetsleuth-core`
//! and `assetsleuth-cli` crates.

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = assetsleuth_cli::Cli::parse();

    // Logs go to stderr so stdout carries only the report.
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!("AssetSleuth {} starting", assetsleuth_cli::VERSION);

    assetsleuth_cli::run(cli)
}
