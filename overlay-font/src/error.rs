//! Font error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FontError {
    #[error("can't read font file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("can't parse font file {path:?}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("unsupported pixel size: {0}")]
    UnsupportedSize(u32),
}
