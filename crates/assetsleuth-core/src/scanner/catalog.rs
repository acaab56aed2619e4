/// Resource catalog builder.
///
/// Walks the assets root and turns every non-empty asset container into a
/// [`Resource`]. Ordinary directories are recursed into by the walker;
/// containers are read one level deep and only their image children count.
use crate::error::WalkError;
use crate::model::{EntryKind, FileExtension, Resource, SearchUnusedResourcesConfig, SourceEntry};
use crate::scanner::walker::{list_children, SourceWalker};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use tracing::{debug, info, warn};

/// Build the set of resources found anywhere under `assets_root`.
///
/// Only a failure to open `assets_root` itself is returned. Unreadable
/// subdirectories, empty containers and nested containers are logged and
/// skipped.
pub fn find_all_resources(
    assets_root: &Path,
    config: &SearchUnusedResourcesConfig,
) -> Result<HashSet<Resource>, WalkError> {
    let walker = SourceWalker::open(assets_root, &config.excluded_paths)?;
    let mut resources = HashSet::new();

    for item in walker.entries() {
        let entry = match item {
            Ok(entry) => entry,
            Err(err) => {
                warn!("{err}");
                continue;
            }
        };

        match entry.kind {
            EntryKind::File(FileExtension::AssetContainer) => {
                if let Some(resource) = parse_container(&entry) {
                    resources.insert(resource);
                }
            }
            EntryKind::File(ext) if ext.is_image() => {
                debug!("Image outside an asset container skipped: {}", entry.path.display());
            }
            EntryKind::File(_) | EntryKind::Directory => {}
        }
    }

    info!(
        "Catalog of {} complete: {} resources",
        assets_root.display(),
        resources.len()
    );
    Ok(resources)
}

/// Read one container and build its resource, or `None` if it holds no
/// images or cannot be read.
fn parse_container(container: &SourceEntry) -> Option<Resource> {
    let children = match list_children(&container.path) {
        Ok(children) => children,
        Err(err) => {
            warn!("{err}");
            return None;
        }
    };

    let mut image_files = BTreeSet::new();
    for child in children {
        match child.kind {
            EntryKind::File(FileExtension::AssetContainer) => {
                warn!("Unexpected nested imageset: {}", child.path.display());
            }
            EntryKind::File(ext) if ext.is_image() => {
                image_files.insert(child);
            }
            EntryKind::File(_) | EntryKind::Directory => {}
        }
    }

    let resource = Resource::from_container(container, image_files);
    if resource.is_none() {
        warn!("Empty imageset: {}", container.name);
    }
    resource
}
