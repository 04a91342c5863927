use std::path::PathBuf;
use std::sync::Arc;

use encoding_rs::Encoding;

use crate::report::EntryRecord;

/// Options controlling a single extraction run.
#[derive(Clone)]
pub struct ExtractOptions {
    /// Destination directory. Defaults to the process's current working
    /// directory, resolved once at the start of the run.
    pub output_root: Option<PathBuf>,
    /// Encoding used to decode the `pathname` descriptor of each entry.
    pub encoding: &'static Encoding,
    /// Move `asset.meta` sidecars alongside their assets.
    pub extract_meta: bool,
    /// Invoked once per staged entry, after its outcome is decided.
    pub on_entry: Option<Arc<dyn Fn(&EntryRecord) + Send + Sync>>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            output_root: None,
            encoding: encoding_rs::UTF_8,
            extract_meta: false,
            on_entry: None,
        }
    }
}

impl ExtractOptions {
    pub fn output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = Some(root.into());
        self
    }

    pub fn encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn extract_meta(mut self, enabled: bool) -> Self {
        self.extract_meta = enabled;
        self
    }

    pub fn on_entry(mut self, callback: Arc<dyn Fn(&EntryRecord) + Send + Sync>) -> Self {
        self.on_entry = Some(callback);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = ExtractOptions::default();
        assert!(options.output_root.is_none());
        assert_eq!(options.encoding, encoding_rs::UTF_8);
        assert!(!options.extract_meta);
        assert!(options.on_entry.is_none());
    }

    #[test]
    fn builder_chain() {
        let options = ExtractOptions::default()
            .output_root("/tmp/out")
            .encoding(encoding_rs::SHIFT_JIS)
            .extract_meta(true);
        assert_eq!(options.output_root, Some(PathBuf::from("/tmp/out")));
        assert_eq!(options.encoding, encoding_rs::SHIFT_JIS);
        assert!(options.extract_meta);
    }
}
