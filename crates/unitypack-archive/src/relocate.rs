use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use tracing::{debug, warn};

use crate::entry::{StagedEntry, staged_entries};
use crate::error::{Error, Result};
use crate::options::ExtractOptions;
use crate::report::{EntryOutcome, EntryRecord, ExtractReport};
use crate::sanitize::{is_contained, resolve_target, sanitize_pathname};

/// Move every staged entry to its resolved destination under `root`.
///
/// `root` must already be canonical. Validation failures (escaping
/// destination, missing descriptor) become per-entry skip outcomes and
/// never abort the pass; I/O failures do abort it, leaving entries already
/// relocated in place.
pub fn relocate_entries(
    staging: &Path,
    root: &Path,
    options: &ExtractOptions,
) -> Result<ExtractReport> {
    let mut report = ExtractReport::default();
    for entry in staged_entries(staging)? {
        let record = relocate_entry(&entry, root, options)?;
        if let Some(callback) = &options.on_entry {
            callback(&record);
        }
        report.entries.push(record);
    }
    Ok(report)
}

fn relocate_entry(
    entry: &StagedEntry,
    root: &Path,
    options: &ExtractOptions,
) -> Result<EntryRecord> {
    if !entry.is_complete() {
        debug!(id = %entry.id, "staged entry has no pathname descriptor, skipping");
        return Ok(EntryRecord {
            id: entry.id.clone(),
            pathname: None,
            outcome: EntryOutcome::SkippedIncomplete,
        });
    }

    let raw = entry.read_pathname()?;
    let pathname = sanitize_pathname(&decode_pathname(&raw, options.encoding));

    let target = resolve_target(root, &pathname);
    if !is_contained(root, &target) {
        warn!(
            id = %entry.id,
            destination = %target.display(),
            root = %root.display(),
            "skipping entry: destination escapes the output root"
        );
        return Ok(EntryRecord {
            id: entry.id.clone(),
            pathname: Some(pathname),
            outcome: EntryOutcome::SkippedUnsafe { attempted: target },
        });
    }

    let meta = options.extract_meta && entry.has_sidecar;
    let outcome = if entry.has_payload {
        ensure_parent(&target)?;
        clear_conflict(&target, false)?;
        move_file(&entry.payload_path(), &target)?;
        if meta {
            let sidecar = sidecar_target(&target);
            clear_conflict(&sidecar, false)?;
            move_file(&entry.sidecar_path(), &sidecar)?;
        }
        EntryOutcome::Extracted { path: target, meta }
    } else {
        // Directory-only entry: the directory itself is the artifact.
        clear_conflict(&target, true)?;
        fs::create_dir_all(&target).map_err(|source| Error::Relocate {
            path: target.clone(),
            source,
        })?;
        if meta {
            let sidecar = sidecar_target(&target);
            clear_conflict(&sidecar, false)?;
            move_file(&entry.sidecar_path(), &sidecar)?;
        }
        EntryOutcome::Directory { path: target, meta }
    };

    Ok(EntryRecord {
        id: entry.id.clone(),
        pathname: Some(pathname),
        outcome,
    })
}

/// Decode the descriptor and keep its first line, stripping one trailing
/// line terminator.
fn decode_pathname(raw: &[u8], encoding: &'static Encoding) -> String {
    let (text, _, _) = encoding.decode(raw);
    let line = text.split('\n').next().unwrap_or_default();
    line.strip_suffix('\r').unwrap_or(line).to_owned()
}

fn sidecar_target(target: &Path) -> PathBuf {
    let mut path = target.as_os_str().to_owned();
    path.push(".meta");
    PathBuf::from(path)
}

/// Colliding entries resolve last-write-wins: an earlier entry may have
/// left a node of the other kind at this target, which neither a rename
/// nor `create_dir_all` can replace on its own.
fn clear_conflict(target: &Path, keep_dir: bool) -> Result<()> {
    let removed = match fs::symlink_metadata(target) {
        Ok(existing) if keep_dir && !existing.is_dir() => fs::remove_file(target),
        Ok(existing) if !keep_dir && existing.is_dir() => fs::remove_dir_all(target),
        _ => return Ok(()),
    };
    removed.map_err(|source| Error::Relocate {
        path: target.to_path_buf(),
        source,
    })
}

fn ensure_parent(target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|source| Error::Relocate {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Move with a copy+remove fallback: the staging tempdir may live on a
/// different filesystem than the destination, and Windows renames refuse
/// to overwrite.
fn move_file(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to)
        .and_then(|_| fs::remove_file(from))
        .map_err(|source| Error::Relocate {
            path: to.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_first_line_stripped() {
        assert_eq!(
            decode_pathname(b"Assets/rock.png\n", encoding_rs::UTF_8),
            "Assets/rock.png"
        );
        assert_eq!(
            decode_pathname(b"Assets/rock.png\r\n", encoding_rs::UTF_8),
            "Assets/rock.png"
        );
        assert_eq!(
            decode_pathname(b"Assets/rock.png", encoding_rs::UTF_8),
            "Assets/rock.png"
        );
    }

    #[test]
    fn descriptor_decodes_with_configured_encoding() {
        let (bytes, _, _) = encoding_rs::SHIFT_JIS.encode("Assets/素材.png\n");
        assert_eq!(
            decode_pathname(&bytes, encoding_rs::SHIFT_JIS),
            "Assets/素材.png"
        );
    }

    #[test]
    fn sidecar_name_appends_meta_extension() {
        assert_eq!(
            sidecar_target(Path::new("/out/Assets/rock.png")),
            Path::new("/out/Assets/rock.png.meta")
        );
    }

    fn canonical_root(tmp: &Path) -> PathBuf {
        let root = tmp.join("out");
        fs::create_dir_all(&root).unwrap();
        root.canonicalize().unwrap()
    }

    fn stage_entry(staging: &Path, id: &str, pathname: &str, asset: Option<&[u8]>) -> StagedEntry {
        let dir = staging.join(id);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("pathname"), pathname).unwrap();
        if let Some(asset) = asset {
            fs::write(dir.join("asset"), asset).unwrap();
        }
        StagedEntry::from_dir(dir)
    }

    #[test]
    fn payload_replaces_directory_left_at_target() {
        let tmp = tempfile::tempdir().unwrap();
        let root = canonical_root(tmp.path());
        let staging = tmp.path().join("staging");
        let options = ExtractOptions::default();

        let dir_entry = stage_entry(&staging, "aaaa", "Assets/Foo\n", None);
        let file_entry = stage_entry(&staging, "bbbb", "Assets/Foo\n", Some(b"file-wins"));

        relocate_entry(&dir_entry, &root, &options).unwrap();
        assert!(root.join("Assets/Foo").is_dir());
        relocate_entry(&file_entry, &root, &options).unwrap();
        assert_eq!(fs::read(root.join("Assets/Foo")).unwrap(), b"file-wins");
    }

    #[test]
    fn directory_replaces_file_left_at_target() {
        let tmp = tempfile::tempdir().unwrap();
        let root = canonical_root(tmp.path());
        let staging = tmp.path().join("staging");
        let options = ExtractOptions::default();

        let file_entry = stage_entry(&staging, "aaaa", "Assets/Foo\n", Some(b"file-first"));
        let dir_entry = stage_entry(&staging, "bbbb", "Assets/Foo\n", None);

        relocate_entry(&file_entry, &root, &options).unwrap();
        assert!(root.join("Assets/Foo").is_file());
        relocate_entry(&dir_entry, &root, &options).unwrap();
        assert!(root.join("Assets/Foo").is_dir());
    }

    #[test]
    fn io_failure_aborts_and_keeps_prior_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let root = canonical_root(tmp.path());
        let staging = tmp.path().join("staging");
        let options = ExtractOptions::default();

        // A plain file where the next entry needs a directory chain makes
        // create_dir_all fail regardless of the user the tests run as.
        fs::create_dir_all(root.join("Assets")).unwrap();
        fs::write(root.join("Assets/blocker"), b"in the way").unwrap();

        let good = stage_entry(&staging, "good", "Assets/ok.txt\n", Some(b"ok"));
        let bad = stage_entry(&staging, "bad", "Assets/blocker/inner.txt\n", Some(b"x"));

        relocate_entry(&good, &root, &options).unwrap();
        let result = relocate_entry(&bad, &root, &options);
        assert!(matches!(result, Err(Error::Relocate { .. })));
        // no rollback: the earlier entry stays in place
        assert_eq!(fs::read(root.join("Assets/ok.txt")).unwrap(), b"ok");
        assert!(!root.join("Assets/blocker/inner.txt").exists());
    }
}
