//! Structured observability hooks for documentation runs.
//!
//! - `RunSpan` tags every event of one run with its input root
//! - emit functions cover run start, each rendered artifact, extraction
//!   issues, and run completion
//!
//! Verbosity follows `RUST_LOG`; see [`crate::telemetry::init_tracing`].

use std::path::Path;

use tracing::{info, warn};

use crate::extract::ExtractIssue;

/// RAII guard that enters a run-scoped tracing span for the duration of a run.
pub struct RunSpan {
    _span: tracing::span::EnteredSpan,
}

impl RunSpan {
    /// Create and enter a span tagged with the input root.
    pub fn enter(input_dir: &Path) -> Self {
        let span = tracing::info_span!("eodoc.run", input = %input_dir.display());
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: run started.
pub fn emit_run_started(input_dir: &Path, output_dir: &Path) {
    info!(
        event = "docs.run_started",
        input = %input_dir.display(),
        output = %output_dir.display(),
    );
}

/// Emit event: one artifact transformed and its page written.
pub fn emit_artifact_rendered(artifact: &str, package: &str, entities: usize, sheets: usize) {
    tracing::debug!(
        event = "docs.artifact_rendered",
        artifact = %artifact,
        package = %package,
        entities = entities,
        sheets = sheets,
    );
}

/// Emit event: a recoverable extraction problem (warning level).
pub fn emit_extract_issue(artifact: &str, issue: &ExtractIssue) {
    warn!(event = "docs.extract_issue", artifact = %artifact, issue = %issue);
}

/// Emit event: run finished.
pub fn emit_run_finished(artifacts: usize, packages: usize, duration_ms: u64) {
    info!(
        event = "docs.run_finished",
        artifacts = artifacts,
        packages = packages,
        duration_ms = duration_ms,
    );
}
