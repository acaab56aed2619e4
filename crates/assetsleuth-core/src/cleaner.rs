/// `ProjectCleaner`: the state machine that gates the pipeline.
///
/// ```text
/// Idle --find_all_resources--> Processing --> Processed(resources)
///                                   |
///                                   +--(catalog failure)--> Idle
/// ```
///
/// `find_unused_resources` is only legal from `Processed` with a non-empty
/// catalog. `remove` has no precondition. Calling out of order returns a
/// typed error; it never panics.
use crate::error::{CleanerError, RemoveFailure};
use crate::model::{Resource, SearchUnusedResourcesConfig};
use crate::scanner::catalog;
use crate::scanner::progress::ScanProgress;
use crate::scanner::usage::{self, UsageReport};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanerState {
    Idle,
    Processing,
    Processed(HashSet<Resource>),
}

impl CleanerState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Processing => "processing",
            Self::Processed(_) => "processed",
        }
    }
}

/// Paths removed by a fully successful [`ProjectCleaner::remove`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RemovalSummary {
    pub removed: Vec<PathBuf>,
}

pub struct ProjectCleaner {
    project_path: PathBuf,
    assets_path: PathBuf,
    state: CleanerState,
}

impl ProjectCleaner {
    pub fn new(project_path: impl Into<PathBuf>, assets_path: impl Into<PathBuf>) -> Self {
        Self {
            project_path: project_path.into(),
            assets_path: assets_path.into(),
            state: CleanerState::Idle,
        }
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    pub fn assets_path(&self) -> &Path {
        &self.assets_path
    }

    pub fn state(&self) -> &CleanerState {
        &self.state
    }

    /// Build the resource catalog from the assets path.
    pub fn find_all_resources(
        &mut self,
        config: &SearchUnusedResourcesConfig,
    ) -> Result<HashSet<Resource>, CleanerError> {
        if self.state != CleanerState::Idle {
            return Err(CleanerError::WrongState {
                expected: "idle",
                current: self.state.label(),
            });
        }

        info!("Start project processing");
        self.state = CleanerState::Processing;
        match catalog::find_all_resources(&self.assets_path, config) {
            Ok(resources) => {
                info!("Processing finished. Resources count: {}", resources.len());
                self.state = CleanerState::Processed(resources.clone());
                Ok(resources)
            }
            Err(err) => {
                self.state = CleanerState::Idle;
                Err(err.into())
            }
        }
    }

    /// Scan the project for references to the catalogued resources.
    pub fn find_unused_resources(
        &self,
        config: &SearchUnusedResourcesConfig,
        progress: &mut dyn FnMut(ScanProgress),
    ) -> Result<UsageReport, CleanerError> {
        let CleanerState::Processed(resources) = &self.state else {
            return Err(CleanerError::WrongState {
                expected: "processed",
                current: self.state.label(),
            });
        };
        if resources.is_empty() {
            return Err(CleanerError::NoResources);
        }

        info!("Start searching for unused resources");
        usage::find_unused_resources(&self.project_path, resources, config, progress)
    }

    /// Delete every resource's container from disk.
    ///
    /// Best-effort: every resource is attempted (in path order) even after a
    /// failure. Succeeds only if all were removed; otherwise the error lists
    /// what was removed and what failed, with the OS reason. Deletions are
    /// never retried.
    pub fn remove(&self, resources: &HashSet<Resource>) -> Result<RemovalSummary, CleanerError> {
        info!("{} resources will be removed", resources.len());

        let mut paths: Vec<&Path> = resources.iter().map(|r| r.path.as_path()).collect();
        paths.sort();
        paths.dedup();

        let mut removed = Vec::with_capacity(paths.len());
        let mut failures = Vec::new();
        for path in paths {
            match delete_path(path) {
                Ok(()) => removed.push(path.to_path_buf()),
                Err(err) => {
                    warn!("Cannot remove {}: {err}", path.display());
                    failures.push(RemoveFailure {
                        path: path.to_path_buf(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        if failures.is_empty() {
            Ok(RemovalSummary { removed })
        } else {
            Err(CleanerError::Remove { removed, failures })
        }
    }
}

fn delete_path(path: &Path) -> std::io::Result<()> {
    if fs::symlink_metadata(path)?.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}
