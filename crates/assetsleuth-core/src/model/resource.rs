/// One logical image asset, resolved from an asset container directory.
use crate::model::source_entry::{SourceEntry, ASSET_CONTAINER_SUFFIX};
use compact_str::CompactString;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// An asset container's resolved content.
///
/// Equality and hashing cover every field, including each image member,
/// so two containers with the same name at different paths (or with
/// different images) are distinct resources.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Resource {
    /// Container name with the `.imageset` suffix stripped.
    pub name: CompactString,
    /// Absolute path of the container directory.
    pub path: PathBuf,
    /// Sum of the contained image files' on-disk sizes.
    pub size: u64,
    /// The image files inside the container. Never empty.
    pub image_files: BTreeSet<SourceEntry>,
}

impl Resource {
    /// Build a resource from a container entry and its image children.
    ///
    /// Returns `None` when `image_files` is empty: an empty container is
    /// not a resource.
    pub fn from_container(container: &SourceEntry, image_files: BTreeSet<SourceEntry>) -> Option<Self> {
        if image_files.is_empty() {
            return None;
        }
        let name = container
            .name
            .strip_suffix(ASSET_CONTAINER_SUFFIX)
            .unwrap_or(&container.name);
        let size = image_files.iter().map(|f| f.size_bytes).sum();
        Some(Self {
            name: CompactString::new(name),
            path: container.path.clone(),
            size,
            image_files,
        })
    }
}

/// Lightweight index of a resource inside a scan's catalog arena.
///
/// The aggregator keys its state by index so the hot path never hashes a
/// whole `Resource` (which includes its image set).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(pub u32);

impl ResourceId {
    #[inline]
    pub fn new(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize, "ResourceId overflow");
        Self(index as u32)
    }

    #[inline]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}
