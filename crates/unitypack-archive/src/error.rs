use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unsupported archive format: expected a tar or gzip-compressed tar")]
    UnsupportedFormat,

    #[error("failed to stage archive contents: {source}")]
    Stage {
        #[source]
        source: io::Error,
    },

    #[error("failed to relocate '{path}': {source}")]
    Relocate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
