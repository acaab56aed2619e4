/// Command-line surface (clap derive) and boundary validation.
use assetsleuth_core::model::ExcludeSet;
use assetsleuth_core::{SearchStrategy, SearchUnusedResourcesConfig};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::collections::BTreeSet;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(
    name = "assetsleuth",
    about = "Detects unused image assets in Xcode projects. Supports Swift, Objective-C and R.swift naming conventions.",
    version
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). Logs go to stderr.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Maximum tracing level for the configured verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            _ => tracing::Level::DEBUG,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze image assets and list every `.imageset` not referenced from source code
    Analyze(ScanArgs),

    /// Analyze, then delete every unused `.imageset` from disk
    Clear(ScanArgs),

    /// Print the current version
    Version,
}

#[derive(Debug, Clone, Args)]
pub struct ScanArgs {
    /// Project source root
    pub project_path: PathBuf,

    /// Root of the asset catalogs (`*.xcassets`)
    pub resources_path: PathBuf,

    /// Ignore paths matching this glob during both walks. The glob is
    /// matched against the absolute path and `*` crosses `/`. `{a,b}`
    /// alternation and `**` are also accepted.
    /// For example: `*.generated.swift`, `*/{Generated,Pods}/*`
    #[arg(short = 'f', long = "exclude", value_name = "GLOB", num_args = 1..)]
    pub excluded_paths: Vec<String>,

    /// Exclude a search strategy from analysis.
    ///
    /// `objc`: .m files for `"<name>"`.
    /// `swift`: .swift files for `"<name>"`.
    /// `r-swift`: .swift files for `R.image.<name>`.
    /// `r-swift-bare`: .swift files for `.<name>`.
    #[arg(short = 's', long = "skip-strategy", value_name = "STRATEGY", num_args = 1..)]
    pub excluded_strategies: Vec<SearchStrategy>,

    /// Matching threads per file (defaults to the number of logical CPUs)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub threads: Option<u16>,

    /// Write the full report as JSON
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// Write the unused resources as CSV
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ArgsError {
    #[error("`{0}` - empty")]
    EmptyPath(&'static str),

    #[error("every search strategy has been excluded")]
    NoStrategies,

    #[error(transparent)]
    Config(#[from] assetsleuth_core::error::ConfigError),
}

impl ScanArgs {
    /// Validate the arguments and build the immutable scan configuration.
    pub fn to_config(&self) -> Result<SearchUnusedResourcesConfig, ArgsError> {
        if self.project_path.as_os_str().is_empty() {
            return Err(ArgsError::EmptyPath("project-path"));
        }
        if self.resources_path.as_os_str().is_empty() {
            return Err(ArgsError::EmptyPath("resources-path"));
        }

        let strategies: BTreeSet<SearchStrategy> = SearchStrategy::ALL
            .into_iter()
            .filter(|s| !self.excluded_strategies.contains(s))
            .collect();
        if strategies.is_empty() {
            return Err(ArgsError::NoStrategies);
        }

        let excludes = ExcludeSet::new(self.excluded_paths.iter().cloned())?;
        let config = SearchUnusedResourcesConfig::new(excludes, strategies);
        Ok(match self.threads {
            Some(n) => config.with_threads(usize::from(n)),
            None => config,
        })
    }
}
