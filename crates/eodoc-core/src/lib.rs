//! eodoc Core Library
//!
//! Turns a tree of XMIR artifacts into browsable documentation: one HTML
//! page per artifact, one per package, a global `packages.html`, and a
//! hierarchical `summary.xml`.

pub mod artifact;
pub mod config;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod escape;
pub mod extract;
pub mod html;
pub mod obs;
pub mod output;
pub mod package;
pub mod summary;
pub mod telemetry;
pub mod transform;

pub use artifact::{Artifact, PackageName};
pub use config::DocsConfig;
pub use discovery::discover;
pub use engine::{extract_file, DocEngine, RunReport};
pub use error::{EodocError, Result};
pub use extract::{
    Entity, ExtractIssue, ExtractedFacts, Extraction, FactExtractor, Metadata, METADATA_KEYS,
};
pub use html::{HtmlEmitter, STYLESHEET};
pub use package::{PackageBucket, PackageMap, ALL_PACKAGES_PAGE};
pub use summary::{EodocDocument, SummaryError, SummaryPackage, SUMMARY_FILE};
pub use telemetry::init_tracing;
pub use transform::{
    FragmentTransformer, TemplateTransformer, TransformDefinition, TransformError,
    DEFAULT_DEFINITION,
};

/// eodoc version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
