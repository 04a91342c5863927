use std::path::PathBuf;

/// Outcome of processing one staged entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryOutcome {
    /// Payload moved into place; `meta` marks whether a sidecar followed it.
    Extracted { path: PathBuf, meta: bool },
    /// Directory-only entry; a directory now exists at `path`.
    Directory { path: PathBuf, meta: bool },
    /// The resolved destination escaped the output root; nothing was written.
    SkippedUnsafe { attempted: PathBuf },
    /// The staged entry had no pathname descriptor.
    SkippedIncomplete,
}

/// One staged entry and what happened to it.
#[derive(Clone, Debug)]
pub struct EntryRecord {
    /// Opaque staging id, for diagnostics.
    pub id: String,
    /// Decoded, sanitized relative pathname, when the entry had one.
    pub pathname: Option<String>,
    pub outcome: EntryOutcome,
}

/// Accumulated outcomes for one extraction run.
#[derive(Clone, Debug, Default)]
pub struct ExtractReport {
    pub entries: Vec<EntryRecord>,
}

impl ExtractReport {
    /// Entries that ended up on disk, as a file or a directory.
    pub fn extracted_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| {
                matches!(
                    e.outcome,
                    EntryOutcome::Extracted { .. } | EntryOutcome::Directory { .. }
                )
            })
            .count()
    }

    pub fn skipped_unsafe_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, EntryOutcome::SkippedUnsafe { .. }))
            .count()
    }

    pub fn skipped_incomplete_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, EntryOutcome::SkippedIncomplete))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped_unsafe_count() + self.skipped_incomplete_count()
    }
}
