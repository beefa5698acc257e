//! Fatal error taxonomy for a documentation run.
//!
//! Every variant aborts the run. Recoverable extraction problems are not
//! errors; see [`crate::extract::ExtractIssue`].

use std::path::PathBuf;

use crate::summary::SummaryError;
use crate::transform::TransformError;

/// Errors that abort a documentation run.
#[derive(Debug, thiserror::Error)]
pub enum EodocError {
    #[error("cannot read input directory {root:?}: {source}")]
    Discovery {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("cannot create output directory {path:?}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read artifact {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("page for artifact {artifact} would be overwritten by aggregate page {page}")]
    PageCollision { artifact: String, page: String },

    #[error("failed to transform artifact {artifact}: {source}")]
    Transform {
        artifact: String,
        #[source]
        source: TransformError,
    },

    #[error("cannot load transform definition {path:?}: {source}")]
    Definition {
        path: PathBuf,
        #[source]
        source: TransformError,
    },

    #[error("summary validation failed: {0}")]
    Summary(#[from] SummaryError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for documentation runs.
pub type Result<T> = std::result::Result<T, EodocError>;
