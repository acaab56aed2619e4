/// Data model for AssetSleuth.
///
/// Re-exports the classified filesystem entry, the resource entity and the
/// scan configuration.
pub mod config;
pub mod resource;
pub mod source_entry;

pub use config::{ExcludeSet, SearchUnusedResourcesConfig, ASSET_DIR_GLOBS};
pub use resource::{Resource, ResourceId};
pub use source_entry::{EntryKind, FileExtension, SourceEntry, ASSET_CONTAINER_SUFFIX};
