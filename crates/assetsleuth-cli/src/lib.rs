/// AssetSleuth CLI: command-line frontend for `assetsleuth-core`.
///
/// Parses arguments, runs the analysis on a background thread, renders its
/// progress and results, and removes unused resources on `clear`.
pub mod cli;
pub mod render;
pub mod session;

pub use cli::{Cli, Command, ScanArgs};

/// Version printed by the `version` command.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Dispatch a parsed command line.
///
/// Running without a subcommand prints the version.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Command::Analyze(args)) => session::run(session::Mode::Analyze, &args),
        Some(Command::Clear(args)) => session::run(session::Mode::Clear, &args),
        Some(Command::Version) | None => {
            println!("{VERSION}");
            Ok(())
        }
    }
}
