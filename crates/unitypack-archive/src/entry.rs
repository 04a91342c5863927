use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const PATHNAME: &str = "pathname";
const ASSET: &str = "asset";
const ASSET_META: &str = "asset.meta";

/// One unit staged out of the archive: an opaque directory holding a
/// `pathname` descriptor and, optionally, an `asset` payload and an
/// `asset.meta` sidecar. A missing payload marks a directory-only entry.
#[derive(Clone, Debug)]
pub struct StagedEntry {
    /// Opaque name assigned by the archive, used in diagnostics only.
    pub id: String,
    dir: PathBuf,
    has_pathname: bool,
    pub has_payload: bool,
    pub has_sidecar: bool,
}

impl StagedEntry {
    /// Classify one staged directory by probing its children.
    pub fn from_dir(dir: PathBuf) -> Self {
        let id = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            id,
            has_pathname: dir.join(PATHNAME).exists(),
            has_payload: dir.join(ASSET).exists(),
            has_sidecar: dir.join(ASSET_META).exists(),
            dir,
        }
    }

    /// An entry without a pathname descriptor cannot be placed anywhere.
    pub fn is_complete(&self) -> bool {
        self.has_pathname
    }

    /// Raw descriptor bytes; decoding is the relocator's job.
    pub fn read_pathname(&self) -> io::Result<Vec<u8>> {
        fs::read(self.dir.join(PATHNAME))
    }

    pub fn payload_path(&self) -> PathBuf {
        self.dir.join(ASSET)
    }

    pub fn sidecar_path(&self) -> PathBuf {
        self.dir.join(ASSET_META)
    }
}

/// Enumerate staged entries in directory-listing order. The order is
/// unspecified and not guaranteed stable across runs.
pub fn staged_entries(staging: &Path) -> io::Result<Vec<StagedEntry>> {
    let mut entries = Vec::new();
    for dirent in fs::read_dir(staging)? {
        let dirent = dirent?;
        if dirent.file_type()?.is_dir() {
            entries.push(StagedEntry::from_dir(dirent.path()));
        }
    }
    Ok(entries)
}
