/// Directory walker using `jwalk`.
///
/// Produces a lazy, depth-first, pre-order sequence of classified
/// [`SourceEntry`] values under a root. Pruning happens in jwalk's
/// `process_read_dir` hook, before any child directory is opened:
///
/// - hidden children (`.git`, `.DS_Store`, ...) are dropped,
/// - children whose absolute path matches an exclusion glob are dropped,
///   so an excluded directory is never read,
/// - asset containers are yielded but not descended into; their content is
///   read one level deep by the catalog builder.
///
/// Entries that cannot be classified are logged and skipped. A directory
/// that cannot be read yields one `WalkError` for that subtree; siblings
/// continue.
use crate::error::{EntryError, WalkError};
use crate::model::{ExcludeSet, SourceEntry, ASSET_CONTAINER_SUFFIX};
use crate::model::source_entry::is_hidden;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// A configured walk over one subtree.
pub struct SourceWalker {
    root: PathBuf,
    excludes: Arc<ExcludeSet>,
}

impl SourceWalker {
    /// Prepare a walk of `root`.
    ///
    /// A relative `root` (`.`, `./App`) is resolved against the working
    /// directory so every yielded path, and every glob match, is absolute.
    /// Fails with `CannotOpenDirectory` if `root` cannot be read as a
    /// directory. An excluded root is valid and simply yields nothing.
    pub fn open(root: impl Into<PathBuf>, excludes: &ExcludeSet) -> Result<Self, WalkError> {
        let root = root.into();
        let root = std::path::absolute(&root).map_err(|err| WalkError::CannotOpenDirectory {
            path: root.clone(),
            reason: err.to_string(),
        })?;
        std::fs::read_dir(&root).map_err(|err| WalkError::CannotOpenDirectory {
            path: root.clone(),
            reason: err.to_string(),
        })?;
        Ok(Self {
            root,
            excludes: Arc::new(excludes.clone()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Iterate every entry below the root in pre-order.
    ///
    /// The root itself is not yielded. Children of a directory are visited
    /// in file-name order so runs over the same tree are reproducible.
    pub fn entries(&self) -> impl Iterator<Item = Result<SourceEntry, WalkError>> {
        let root_excluded = self.excludes.is_match(&self.root);
        if root_excluded {
            debug!("Ignore {}", self.root.display());
        }

        let excludes = Arc::clone(&self.excludes);
        let walker = jwalk::WalkDir::new(&self.root)
            .skip_hidden(false)
            .follow_links(false)
            .sort(true)
            .parallelism(jwalk::Parallelism::Serial)
            .process_read_dir(move |depth, _dir, _state, children| {
                // The root itself comes through with no depth; only its
                // descendants are filtered.
                if depth.is_none() {
                    return;
                }
                children.retain(|child| match child {
                    Ok(entry) => {
                        let name = entry.file_name.to_string_lossy();
                        if is_hidden(&name) {
                            return false;
                        }
                        let path = entry.path();
                        if excludes.is_match(&path) {
                            debug!("Ignore {}", path.display());
                            return false;
                        }
                        true
                    }
                    Err(_) => true,
                });
                for entry in children.iter_mut().flatten() {
                    if entry.file_type.is_dir()
                        && entry.file_name.to_string_lossy().ends_with(ASSET_CONTAINER_SUFFIX)
                    {
                        entry.read_children_path = None;
                    }
                }
            });

        let root = self.root.clone();
        walker
            .into_iter()
            .take_while(move |_| !root_excluded)
            .filter_map(move |item| match item {
                Ok(entry) if entry.depth == 0 => None,
                Ok(entry) => classify(&entry.path()).map(Ok),
                Err(err) => {
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| root.clone());
                    Some(Err(WalkError::CannotOpenDirectory {
                        path,
                        reason: err.to_string(),
                    }))
                }
            })
    }
}

/// List the immediate children of `dir` (no recursion), classified.
///
/// Used for asset containers, which are not expected to nest. Hidden and
/// unclassifiable children are skipped the same way the full walk skips
/// them.
pub fn list_children(dir: &Path) -> Result<Vec<SourceEntry>, WalkError> {
    let read = std::fs::read_dir(dir).map_err(|err| WalkError::CannotOpenDirectory {
        path: dir.to_path_buf(),
        reason: err.to_string(),
    })?;

    let mut children: Vec<SourceEntry> = read
        .filter_map(|item| match item {
            Ok(entry) => classify(&entry.path()),
            Err(err) => {
                warn!("Cannot read entry in {}: {err}", dir.display());
                None
            }
        })
        .collect();
    children.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(children)
}

/// Classify one path, logging and swallowing entry-level failures.
fn classify(path: &Path) -> Option<SourceEntry> {
    match SourceEntry::classify(path) {
        Ok(entry) => Some(entry),
        Err(EntryError::Hidden { .. }) => None,
        Err(err @ EntryError::UnknownType { .. }) => {
            debug!("{err}");
            None
        }
        Err(err @ EntryError::CannotStat { .. }) => {
            warn!("{err}");
            None
        }
    }
}
