//! Path-safe extraction of Unity `.unitypackage` archives.
//!
//! A `.unitypackage` is a (usually gzip-compressed) tar archive with a flat
//! internal layout: every logical asset is one opaque top-level directory
//! holding a `pathname` descriptor, an optional `asset` payload and an
//! optional `asset.meta` sidecar. The pathname is author-controlled data, so
//! extraction runs in two phases: the whole archive is unpacked into a
//! temporary staging directory first, then every staged entry is validated
//! against the output root before anything is moved into place.
//!
//! # Architecture
//!
//! - `stage.rs` - Format detection and unpacking into the staging area
//! - `entry.rs` - Staged entry model (`pathname` / `asset` / `asset.meta`)
//! - `sanitize.rs` - Pathname sanitization and containment checks
//! - `relocate.rs` - Moves staged artifacts to their resolved targets
//! - `report.rs` - Per-entry outcomes

pub use error::{Error, Result};
pub use extract::extract_package;
pub use options::ExtractOptions;
pub use report::{EntryOutcome, EntryRecord, ExtractReport};
pub use sanitize::{is_contained, resolve_target, sanitize_pathname};
pub use stage::PackageFormat;

pub mod entry;
mod error;
mod extract;
pub mod options;
mod relocate;
mod report;
mod sanitize;
mod stage;
