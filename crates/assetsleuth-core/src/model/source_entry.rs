/// A single classified filesystem entry produced by the directory walker.
///
/// Entries are built fresh for every directory read and never mutated.
/// Anything that outlives the walk step (e.g. a `Resource`) copies the
/// entries it needs.
use crate::error::EntryError;
use crate::strategy::SearchStrategy;
use compact_str::CompactString;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Directory-name suffix that marks an asset container.
pub const ASSET_CONTAINER_SUFFIX: &str = ".imageset";

/// Closed set of file extensions the scanner understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileExtension {
    Swift,
    ObjcImpl,
    ObjcHeader,
    ObjcppImpl,
    AssetContainer,
    Jpg,
    Jpeg,
    Png,
    Pdf,
    Gif,
}

impl FileExtension {
    /// Map a raw extension (text after the last `.`) to a known variant.
    ///
    /// Matching is exact: `PNG` is not `png`, the same way Xcode treats
    /// asset catalogs on a case-sensitive volume.
    pub fn from_raw(raw: &str) -> Option<Self> {
        Some(match raw {
            "swift" => Self::Swift,
            "m" => Self::ObjcImpl,
            "h" => Self::ObjcHeader,
            "mm" => Self::ObjcppImpl,
            "imageset" => Self::AssetContainer,
            "jpg" => Self::Jpg,
            "jpeg" => Self::Jpeg,
            "png" => Self::Png,
            "pdf" => Self::Pdf,
            "gif" => Self::Gif,
            _ => return None,
        })
    }

    /// `true` for the image types collected into a resource.
    pub fn is_image(self) -> bool {
        matches!(
            self,
            Self::Jpg | Self::Jpeg | Self::Png | Self::Pdf | Self::Gif
        )
    }

    /// Strategies that make sense for source files of this type.
    ///
    /// Headers, Objective-C++, images and containers are never searched.
    pub fn available_strategies(self) -> &'static [SearchStrategy] {
        match self {
            Self::Swift => &[
                SearchStrategy::QualifiedAccessor,
                SearchStrategy::BareAccessor,
                SearchStrategy::NativeLiteral,
            ],
            Self::ObjcImpl => &[SearchStrategy::ObjcLiteral],
            Self::ObjcHeader
            | Self::ObjcppImpl
            | Self::AssetContainer
            | Self::Jpg
            | Self::Jpeg
            | Self::Png
            | Self::Pdf
            | Self::Gif => &[],
        }
    }
}

/// What kind of entry this is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "type", content = "extension", rename_all = "lowercase")]
pub enum EntryKind {
    Directory,
    File(FileExtension),
}

/// One directory entry: name, absolute path, on-disk size and kind.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SourceEntry {
    /// File or directory name only.
    pub name: CompactString,
    /// Absolute path of the entry.
    pub path: PathBuf,
    /// Space allocated on disk (512-byte block rounded on Unix).
    pub size_bytes: u64,
    pub kind: EntryKind,
}

impl SourceEntry {
    /// Stat `path` and classify it.
    ///
    /// Directories whose name ends in [`ASSET_CONTAINER_SUFFIX`] become
    /// `File(AssetContainer)`; a regular file with that suffix is an unknown
    /// type. Hidden names, unreadable metadata and unknown extensions are
    /// errors the walker logs and skips.
    pub fn classify(path: &Path) -> Result<Self, EntryError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .ok_or_else(|| EntryError::UnknownType {
                path: path.to_path_buf(),
            })?;

        if is_hidden(&name) {
            return Err(EntryError::Hidden {
                path: path.to_path_buf(),
            });
        }

        // Follows symlinks, so a linked source file is scanned like any other.
        let meta = std::fs::metadata(path).map_err(|source| EntryError::CannotStat {
            path: path.to_path_buf(),
            source,
        })?;

        let kind = if meta.is_dir() {
            if name.ends_with(ASSET_CONTAINER_SUFFIX) {
                EntryKind::File(FileExtension::AssetContainer)
            } else {
                EntryKind::Directory
            }
        } else {
            let ext = name
                .rsplit_once('.')
                .and_then(|(_, raw)| FileExtension::from_raw(raw))
                // Only a directory can be a container.
                .filter(|ext| *ext != FileExtension::AssetContainer)
                .ok_or_else(|| EntryError::UnknownType {
                    path: path.to_path_buf(),
                })?;
            EntryKind::File(ext)
        };

        Ok(Self {
            name: CompactString::new(name.as_ref()),
            path: path.to_path_buf(),
            size_bytes: allocated_size(&meta),
            kind,
        })
    }

    /// The entry's extension, if it is a typed file.
    pub fn extension(&self) -> Option<FileExtension> {
        match self.kind {
            EntryKind::File(ext) => Some(ext),
            EntryKind::Directory => None,
        }
    }
}

/// `.`/`..` and dot-files are never visited.
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

#[cfg(unix)]
fn allocated_size(meta: &std::fs::Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    meta.blocks() * 512
}

#[cfg(not(unix))]
fn allocated_size(meta: &std::fs::Metadata) -> u64 {
    meta.len()
}
