//! Discovered IR artifacts and the package names derived from their paths.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One discovered IR file. Immutable once discovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Absolute (or root-joined) path to the file.
    pub path: PathBuf,
    /// Path relative to the input root.
    pub relative: PathBuf,
    /// File name without extension.
    pub base_name: String,
}

impl Artifact {
    /// Build an artifact from its full path, the input root it was found
    /// under, and the artifact extension (without the dot).
    ///
    /// The base name is the file name with `.<extension>` removed, so
    /// multi-part extensions such as `eo.xml` are stripped whole. Returns
    /// `None` when `path` does not live under `root` or has no file name.
    pub fn new(root: &Path, path: &Path, extension: &str) -> Option<Self> {
        let relative = path.strip_prefix(root).ok()?.to_path_buf();
        let file_name = relative.file_name()?.to_string_lossy().into_owned();
        let base_name = match file_name.strip_suffix(&format!(".{extension}")) {
            Some(base) if !base.is_empty() => base.to_string(),
            _ => relative.file_stem()?.to_string_lossy().into_owned(),
        };
        Some(Self {
            path: path.to_path_buf(),
            relative,
            base_name,
        })
    }

    /// Directory portion of the relative path (empty for root-level artifacts).
    pub fn relative_dir(&self) -> PathBuf {
        self.relative
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }

    /// Package this artifact belongs to.
    pub fn package(&self) -> PackageName {
        PackageName::from_relative_path(&self.relative)
    }

    /// Relative path rendered with `/` separators on every platform.
    pub fn display_path(&self) -> String {
        self.relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Dot-joined directory segments of an artifact's relative path.
///
/// Artifacts directly under the input root belong to the root package,
/// whose name is the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct PackageName(String);

impl PackageName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Derive the package name from a path relative to the input root.
    pub fn from_relative_path(relative: &Path) -> Self {
        let segments: Vec<String> = relative
            .parent()
            .into_iter()
            .flat_map(Path::components)
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        Self(segments.join("."))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// File name of this package's aggregate page.
    pub fn page_name(&self) -> String {
        format!("package_{}.html", self.0)
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
