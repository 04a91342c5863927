use std::path::{Component, Path, PathBuf};

/// Characters Windows-family filesystems forbid in path components.
const WINDOWS_RESERVED: &[char] = &['>', ':', '"', '|', '?', '*'];

/// Replace characters the target platform's filesystem forbids with `_`.
///
/// `/` stays untouched, it remains the path separator. No `..` or
/// absolute-path handling happens here; that is [`resolve_target`] and
/// [`is_contained`]'s job.
pub fn sanitize_pathname(raw: &str) -> String {
    if cfg!(windows) {
        replace_reserved(raw)
    } else {
        raw.to_owned()
    }
}

fn replace_reserved(raw: &str) -> String {
    raw.chars()
        .map(|c| if WINDOWS_RESERVED.contains(&c) { '_' } else { c })
        .collect()
}

/// Join `pathname` onto `root` and resolve the candidate to an absolute,
/// canonical form.
///
/// `root` must already be canonical. The candidate usually does not exist
/// yet, so its longest existing ancestor is canonicalized (following
/// symlinks) and the remaining components are collapsed lexically. Escape
/// attempts are judged on this resolved form, not on surface syntax:
/// symlinks already present under the root and `..` sequences that
/// net-cancel are only decidable after resolution.
pub fn resolve_target(root: &Path, pathname: &str) -> PathBuf {
    resolve_unverified(&root.join(pathname))
}

/// True when `candidate` lies strictly inside `root`: the root must be a
/// proper ancestor, never equal to the candidate. Both sides are expected
/// in resolved form.
pub fn is_contained(root: &Path, candidate: &Path) -> bool {
    candidate.starts_with(root) && candidate != root
}

fn resolve_unverified(candidate: &Path) -> PathBuf {
    let mut resolved = PathBuf::new();
    let mut walk_fs = true;
    for component in candidate.components() {
        match component {
            Component::Prefix(prefix) => resolved.push(prefix.as_os_str()),
            Component::RootDir => resolved.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(name) => {
                resolved.push(name);
                if walk_fs {
                    // Once a component is missing the rest cannot exist
                    // either; fall back to lexical handling from there on.
                    match resolved.canonicalize() {
                        Ok(canonical) => resolved = canonical,
                        Err(_) => walk_fs = false,
                    }
                }
            }
        }
    }
    resolved
}
