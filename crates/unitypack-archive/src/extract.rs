use std::path::{Path, PathBuf};
use std::{env, fs};

use tracing::debug;

use crate::error::Result;
use crate::options::ExtractOptions;
use crate::relocate::relocate_entries;
use crate::report::ExtractReport;
use crate::stage::stage_archive;

/// Extract a `.unitypackage` archive into the configured output root.
///
/// The archive is unpacked into a temporary staging directory first, then
/// every staged entry is validated against the output root before its
/// artifacts are moved into place. The staging directory is removed on
/// every exit path, including errors.
pub fn extract_package(archive: impl AsRef<Path>, options: &ExtractOptions) -> Result<ExtractReport> {
    let root = resolve_output_root(options.output_root.as_deref())?;

    let staging = tempfile::Builder::new().prefix("unitypack-").tempdir()?;

    let format = stage_archive(archive.as_ref(), staging.path())?;
    debug!(
        ?format,
        staging = %staging.path().display(),
        root = %root.display(),
        "staged archive"
    );

    relocate_entries(staging.path(), &root, options)
}

/// Canonical output root, created if missing, resolved once per run and
/// passed explicitly from here on.
fn resolve_output_root(configured: Option<&Path>) -> Result<PathBuf> {
    let root = match configured {
        Some(path) => path.to_path_buf(),
        None => env::current_dir()?,
    };
    fs::create_dir_all(&root)?;
    Ok(root.canonicalize()?)
}
