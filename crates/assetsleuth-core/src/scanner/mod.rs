/// Scanner module: orchestrates catalog building and usage scanning.
///
/// The pipeline is two passes over the filesystem:
/// - **Catalog** ([`catalog`]): walk the assets root, turn each asset
///   container into a `Resource`.
/// - **Usage** ([`usage`]): walk the project root, search every Swift and
///   Objective-C file for each still-unreferenced resource, in parallel per
///   file, funnelling results through the [`aggregator`].
///
/// [`start_analysis`] runs both passes on a background thread and streams
/// [`ScanProgress`] over a bounded channel so a frontend can render live
/// counters while the scan runs.
pub mod aggregator;
pub mod catalog;
pub mod mapped;
pub mod progress;
pub mod usage;
pub mod walker;

use crate::cleaner::ProjectCleaner;
use crate::error::CleanerError;
use crate::model::{Resource, SearchUnusedResourcesConfig, SourceEntry};
use progress::ScanProgress;

use crossbeam_channel::Receiver;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;

/// Maximum number of progress messages that may queue up in the channel.
///
/// One message is sent per processed source file. If the frontend falls
/// behind, the scanner stalls briefly rather than consuming unbounded heap.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 4_096;

/// Everything a full analysis needs.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub project_path: PathBuf,
    pub assets_path: PathBuf,
    pub config: SearchUnusedResourcesConfig,
}

/// Result of a completed analysis.
#[derive(Debug, Default)]
pub struct AnalysisOutcome {
    /// The full catalog, as built before scanning.
    pub catalog: HashSet<Resource>,
    pub used: HashMap<Resource, BTreeSet<SourceEntry>>,
    pub unused: HashSet<Resource>,
    pub processed_files: u64,
    /// Wall-clock time for catalog + usage scan.
    pub elapsed: Duration,
}

/// Handle to a running or completed analysis.
pub struct AnalysisHandle {
    /// Receiver for progress updates from the analysis thread.
    pub progress_rx: Receiver<ScanProgress>,
    thread: thread::JoinHandle<Result<AnalysisOutcome, CleanerError>>,
}

impl AnalysisHandle {
    /// `true` once the analysis thread has returned.
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the analysis to finish and take its result.
    pub fn join(self) -> Result<AnalysisOutcome, CleanerError> {
        self.thread.join().map_err(|_| CleanerError::Panicked)?
    }
}

/// Run catalog + usage scan synchronously, reporting through `progress`.
pub fn run_analysis(
    request: &AnalysisRequest,
    progress: &mut dyn FnMut(ScanProgress),
) -> Result<AnalysisOutcome, CleanerError> {
    let start = Instant::now();
    let mut cleaner = ProjectCleaner::new(&request.project_path, &request.assets_path);

    let catalog = cleaner.find_all_resources(&request.config)?;
    progress(ScanProgress::Catalogued {
        resources: catalog.len(),
    });

    let report = cleaner.find_unused_resources(&request.config, progress)?;
    let elapsed = start.elapsed();
    progress(ScanProgress::Complete { duration: elapsed });

    Ok(AnalysisOutcome {
        catalog,
        used: report.used,
        unused: report.unused,
        processed_files: report.processed_files,
        elapsed,
    })
}

/// Start a full analysis on a background thread.
///
/// Returns an [`AnalysisHandle`] for receiving progress and, eventually,
/// the outcome.
pub fn start_analysis(request: AnalysisRequest) -> Result<AnalysisHandle, CleanerError> {
    let (progress_tx, progress_rx) =
        crossbeam_channel::bounded::<ScanProgress>(PROGRESS_CHANNEL_CAPACITY);

    let thread = thread::Builder::new()
        .name("assetsleuth-analysis".into())
        .spawn(move || {
            info!(
                "Starting analysis of {} (assets: {})",
                request.project_path.display(),
                request.assets_path.display()
            );
            // A dropped receiver only means nobody is watching; keep going.
            run_analysis(&request, &mut |update| {
                let _ = progress_tx.send(update);
            })
        })
        .map_err(CleanerError::Spawn)?;

    Ok(AnalysisHandle {
        progress_rx,
        thread,
    })
}
