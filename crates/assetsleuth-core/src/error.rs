/// Error types for the scanning engine.
///
/// Errors fall into two groups. Entity-local errors (`EntryError`,
/// `WalkError`, `MapError`) concern a single directory or file: the engine
/// logs them and keeps going. Call-level errors (`CleanerError`,
/// `ConfigError`, `ReportError`) are returned to the caller.
use std::path::PathBuf;
use thiserror::Error;

/// A single directory entry could not be classified.
#[derive(Debug, Error)]
pub enum EntryError {
    #[error("hidden entry skipped: {}", path.display())]
    Hidden { path: PathBuf },

    #[error("cannot get stats for {}: {source}", path.display())]
    CannotStat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown entry type: {}", path.display())]
    UnknownType { path: PathBuf },
}

/// A directory could not be opened. Scoped to that subtree.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("cannot open directory {}: {reason}", path.display())]
    CannotOpenDirectory { path: PathBuf, reason: String },
}

impl WalkError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::CannotOpenDirectory { path, .. } => path,
        }
    }
}

/// A source file could not be opened and mapped for scanning.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot open {}: file is empty", path.display())]
    Empty { path: PathBuf },

    #[error("cannot map {}: {source}", path.display())]
    Map {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Invalid configuration detected at the boundary.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid exclusion glob `{pattern}`: {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// An unknown search strategy identifier.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown strategy `{0}` (expected one of: objc, swift, r-swift, r-swift-bare)")]
pub struct StrategyParseError(pub String);

/// One resource that could not be removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Errors surfaced by `ProjectCleaner` and the analysis pipeline.
#[derive(Debug, Error)]
pub enum CleanerError {
    #[error("wrong state: expected {expected}, current: {current}")]
    WrongState {
        expected: &'static str,
        current: &'static str,
    },

    #[error("no resources to search for")]
    NoResources,

    #[error(transparent)]
    CannotOpenRoot(#[from] WalkError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot build matching thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("cannot spawn analysis thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("analysis thread panicked")]
    Panicked,

    #[error("failed to remove {} of {} resources (first: {}: {})",
        failures.len(),
        failures.len() + removed.len(),
        failures.first().map(|f| f.path.display().to_string()).unwrap_or_default(),
        failures.first().map(|f| f.reason.as_str()).unwrap_or_default())]
    Remove {
        removed: Vec<PathBuf>,
        failures: Vec<RemoveFailure>,
    },
}

/// Report export failures.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("cannot write report to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot serialise JSON report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot write CSV report: {0}")]
    Csv(#[from] csv::Error),
}
