/// One `analyze` / `clear` run: start the background analysis, render its
/// progress, print the results, export reports, and optionally remove the
/// unused resources.
use crate::cli::ScanArgs;
use crate::render;
use anyhow::{Context, Result};
use assetsleuth_core::report::AnalysisReport;
use assetsleuth_core::scanner::progress::ScanProgress;
use assetsleuth_core::scanner::{start_analysis, AnalysisOutcome, AnalysisRequest};
use assetsleuth_core::{CleanerError, ProjectCleaner};
use colored::Colorize;
use std::io::{IsTerminal, Write};
use tracing::info;

/// What to do once the analysis has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Analyze,
    Clear,
}

impl Mode {
    fn label(self) -> &'static str {
        match self {
            Self::Analyze => "analyze",
            Self::Clear => "clear",
        }
    }
}

/// Live counters mirrored from the progress channel.
#[derive(Debug, Default)]
struct ProgressState {
    total: usize,
    found: usize,
    processed: u64,
    current_file: String,
}

impl ProgressState {
    /// Apply one message. Returns `true` when the progress line changed.
    fn apply(&mut self, msg: ScanProgress) -> bool {
        match msg {
            ScanProgress::Catalogued { resources } => {
                self.total = resources;
                false
            }
            ScanProgress::FileProcessed {
                found,
                processed,
                current_file,
            } => {
                self.found = found;
                self.processed = processed;
                self.current_file = current_file;
                true
            }
            ScanProgress::Complete { .. } => false,
        }
    }
}

pub fn run(mode: Mode, args: &ScanArgs) -> Result<()> {
    let config = args.to_config().context("invalid arguments")?;
    println!(
        "{}",
        render::config_banner(mode.label(), &args.project_path, &args.resources_path, &config)
    );

    let handle = start_analysis(AnalysisRequest {
        project_path: args.project_path.clone(),
        assets_path: args.resources_path.clone(),
        config,
    })
    .context("cannot start analysis")?;

    let interactive = std::io::stderr().is_terminal();
    let mut state = ProgressState::default();
    // Lock stderr per write only: the analysis thread logs to it too.
    for msg in handle.progress_rx.iter() {
        if let ScanProgress::Catalogued { resources } = msg {
            println!("Detected {resources} resources.");
        }
        if state.apply(msg) && interactive {
            let line = render::progress_line(
                state.found,
                state.total,
                state.processed,
                &state.current_file,
            );
            let mut stderr = std::io::stderr().lock();
            let _ = write!(stderr, "\x1b[2K\r{line}");
            let _ = stderr.flush();
        }
    }
    if interactive && state.processed > 0 {
        eprintln!();
    }

    let outcome = match handle.join() {
        Ok(outcome) => outcome,
        Err(CleanerError::NoResources) => {
            println!("{}", "No image resources found. Nothing to analyze.".yellow());
            return Ok(());
        }
        Err(err) => return Err(err).context("analysis failed"),
    };

    let report = AnalysisReport::from_outcome(&outcome);
    println!("\n{}", render::summary(&report));
    if !outcome.unused.is_empty() {
        println!("\n{}", "Unused resources".bold());
        println!("{}", render::unused_table(&outcome.unused));
    }

    if let Some(path) = &args.json {
        report
            .write_json(path)
            .with_context(|| format!("cannot export JSON report to {}", path.display()))?;
        info!("JSON report written to {}", path.display());
    }
    if let Some(path) = &args.csv {
        report
            .write_csv(path)
            .with_context(|| format!("cannot export CSV report to {}", path.display()))?;
        info!("CSV report written to {}", path.display());
    }

    if mode == Mode::Clear {
        clear(args, &outcome)?;
    }
    Ok(())
}

fn clear(args: &ScanArgs, outcome: &AnalysisOutcome) -> Result<()> {
    if outcome.unused.is_empty() {
        println!("\n{}", "Skip. All resources are in use".green());
        return Ok(());
    }

    let cleaner = ProjectCleaner::new(&args.project_path, &args.resources_path);
    match cleaner.remove(&outcome.unused) {
        Ok(summary) => {
            println!(
                "\n{}",
                format!("{} resources have been removed.", summary.removed.len()).green()
            );
            Ok(())
        }
        Err(CleanerError::Remove { removed, failures }) => {
            println!(
                "\n{}",
                format!("{} resources have been removed.", removed.len()).yellow()
            );
            for failure in &failures {
                eprintln!(
                    "  {} {}: {}",
                    "Failed".red().bold(),
                    failure.path.display(),
                    failure.reason.red()
                );
            }
            anyhow::bail!("{} resources could not be removed", failures.len())
        }
        Err(err) => Err(err).context("removal failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_state_tracks_latest_counters() {
        let mut state = ProgressState::default();
        assert!(!state.apply(ScanProgress::Catalogued { resources: 7 }));
        assert!(state.apply(ScanProgress::FileProcessed {
            found: 2,
            processed: 5,
            current_file: "Home.swift".into(),
        }));
        assert!(!state.apply(ScanProgress::Complete {
            duration: std::time::Duration::from_millis(3),
        }));

        assert_eq!(state.total, 7);
        assert_eq!(state.found, 2);
        assert_eq!(state.processed, 5);
        assert_eq!(state.current_file, "Home.swift");
    }
}
