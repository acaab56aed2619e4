/// Read-only memory-mapped view of a source file.
///
/// Acquisition is open → size (seek to end) → map. Any failure releases
/// whatever was already acquired before returning. Dropping a `MappedFile`
/// unmaps and then closes the descriptor, exactly once, on every exit path
/// of the owner, including unwinding out of a matching task.
use crate::error::MapError;
use memmap2::{Mmap, MmapOptions};
use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::{Path, PathBuf};

pub struct MappedFile {
    // Field order matters: the mapping is dropped before the descriptor.
    map: Mmap,
    _file: File,
    path: PathBuf,
}

impl MappedFile {
    /// Map `path` read-only.
    ///
    /// Empty files are rejected: there is nothing to map and nothing to
    /// find in them.
    pub fn open(path: &Path) -> Result<Self, MapError> {
        let mut file = File::open(path).map_err(|source| MapError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let size = file.seek(SeekFrom::End(0)).map_err(|source| MapError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        if size == 0 {
            return Err(MapError::Empty {
                path: path.to_path_buf(),
            });
        }
        let len = usize::try_from(size).map_err(|_| MapError::Map {
            path: path.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "file larger than address space",
            ),
        })?;

        // SAFETY: the mapping is read-only and private to this process. A
        // concurrent writer truncating the file could fault a reader; source
        // trees are not expected to change during a scan.
        let map = unsafe { MmapOptions::new().len(len).map(&file) }.map_err(|source| {
            MapError::Map {
                path: path.to_path_buf(),
                source,
            }
        })?;

        Ok(Self {
            map,
            _file: file,
            path: path.to_path_buf(),
        })
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.map
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn maps_whole_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("View.swift");
        fs::write(&path, b"image = R.image.iconHome()").unwrap();

        let mapped = MappedFile::open(&path).unwrap();
        assert_eq!(mapped.len(), 26);
        assert_eq!(mapped.as_bytes(), b"image = R.image.iconHome()");
        assert_eq!(mapped.path(), path.as_path());
    }

    #[test]
    fn empty_file_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Empty.swift");
        fs::write(&path, b"").unwrap();

        assert!(matches!(MappedFile::open(&path), Err(MapError::Empty { .. })));
    }

    #[test]
    fn missing_file_is_rejected() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            MappedFile::open(&tmp.path().join("missing.m")),
            Err(MapError::Open { .. })
        ));
    }

    /// Repeated acquire/release must not leak descriptors; a leak would
    /// exhaust the default soft limit long before 4 096 iterations.
    #[test]
    fn release_is_deterministic() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Loop.m");
        fs::write(&path, b"@\"icon\"").unwrap();

        for _ in 0..4_096 {
            let mapped = MappedFile::open(&path).unwrap();
            assert!(!mapped.is_empty());
        }
    }
}
