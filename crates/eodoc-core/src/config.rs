//! Run configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{EodocError, Result};

/// Default directory scanned for artifacts.
pub const DEFAULT_INPUT_DIR: &str = "target/eo";
/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "docs";
/// Default artifact extension (without the dot).
pub const DEFAULT_EXTENSION: &str = "xmir";

/// Configuration for one documentation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocsConfig {
    /// Root directory holding IR artifacts.
    pub input_dir: PathBuf,
    /// Root of the generated documentation tree.
    pub output_dir: PathBuf,
    /// Artifact file extension, without the leading dot.
    pub extension: String,
    /// Optional transform definition file; the built-in one is used if unset.
    pub transform: Option<PathBuf>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            extension: DEFAULT_EXTENSION.to_string(),
            transform: None,
        }
    }
}

impl DocsConfig {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    /// Set the artifact extension.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Set a transform definition file.
    pub fn with_transform(mut self, path: impl Into<PathBuf>) -> Self {
        self.transform = Some(path.into());
        self
    }

    /// Create from environment variables
    ///
    /// Reads (all optional, defaults otherwise):
    /// - EODOC_INPUT
    /// - EODOC_OUTPUT
    /// - EODOC_EXTENSION
    /// - EODOC_TRANSFORM
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`DocsConfig::from_env`], reading values through `lookup`.
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let defaults = Self::default();
        Self {
            input_dir: get("EODOC_INPUT")
                .map(PathBuf::from)
                .unwrap_or(defaults.input_dir),
            output_dir: get("EODOC_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            extension: get("EODOC_EXTENSION").unwrap_or(defaults.extension),
            transform: get("EODOC_TRANSFORM").map(PathBuf::from),
        }
    }

    /// Reject configurations that cannot produce a sound run.
    pub fn validate(&self) -> Result<()> {
        if self.extension.is_empty() {
            return Err(EodocError::Config("extension must not be empty".to_string()));
        }
        if self.extension.starts_with('.') {
            return Err(EodocError::Config(format!(
                "extension {:?} must not start with a dot",
                self.extension
            )));
        }
        if self.input_dir == self.output_dir {
            return Err(EodocError::Config(format!(
                "output directory {:?} must differ from input directory",
                self.output_dir
            )));
        }
        Ok(())
    }
}
