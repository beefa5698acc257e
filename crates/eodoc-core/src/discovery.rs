//! Artifact discovery - recursively enumerate IR files under an input root.
//!
//! Entries are visited depth-first and sorted by file name at every
//! directory level, so the resulting order equals the lexicographic order
//! of relative path components and does not depend on the file system.

use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::artifact::Artifact;
use crate::error::{EodocError, Result};

/// Collect every file under `root` whose name ends with `.<extension>`.
///
/// Any unreadable directory (including the root itself) aborts discovery;
/// partial results are never returned.
pub fn discover(root: &Path, extension: &str) -> Result<Vec<Artifact>> {
    let suffix = format!(".{extension}");
    let mut artifacts = Vec::new();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|source| EodocError::Discovery {
            root: root.to_path_buf(),
            source,
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !entry.file_name().to_string_lossy().ends_with(&suffix) {
            continue;
        }

        match Artifact::new(root, path, extension) {
            Some(artifact) => {
                debug!(path = %artifact.display_path(), "discovered artifact");
                artifacts.push(artifact);
            }
            None => debug!(path = ?path, "skipping entry without a file stem"),
        }
    }

    Ok(artifacts)
}
