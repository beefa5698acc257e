//! Documentation Aggregation Engine.
//!
//! One run: discover artifacts, then for each artifact in discovery order
//! extract facts (tolerant), transform to a fragment (strict), write its
//! page and accumulate both into the [`PackageMap`]. After the loop the
//! aggregate pages and `summary.xml` are written from the accumulated map.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::artifact::Artifact;
use crate::config::DocsConfig;
use crate::discovery::discover;
use crate::error::{EodocError, Result};
use crate::extract::{Extraction, FactExtractor};
use crate::html::{check_page_collisions, HtmlEmitter};
use crate::obs::{
    emit_artifact_rendered, emit_extract_issue, emit_run_finished, emit_run_started, RunSpan,
};
use crate::output::ensure_dir;
use crate::package::PackageMap;
use crate::summary::{EodocDocument, SUMMARY_FILE};
use crate::transform::{FragmentTransformer, TemplateTransformer, TransformDefinition};

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub output_dir: PathBuf,
    pub summary: PathBuf,
    pub artifacts: usize,
    pub packages: usize,
    /// Aggregate pages written, `packages.html` included.
    pub aggregate_pages: usize,
    pub extract_issues: usize,
}

/// Drives one documentation run over a configured input tree.
pub struct DocEngine<T = TemplateTransformer> {
    config: DocsConfig,
    transformer: T,
    extractor: FactExtractor,
}

impl DocEngine<TemplateTransformer> {
    /// Engine with the template transformer, loading the configured
    /// definition file or falling back to the built-in one.
    pub fn from_config(config: DocsConfig) -> Result<Self> {
        let definition = match &config.transform {
            Some(path) => TransformDefinition::from_file(path).map_err(|source| {
                EodocError::Definition {
                    path: path.clone(),
                    source,
                }
            })?,
            None => TransformDefinition::default(),
        };
        Ok(Self::with_transformer(
            config,
            TemplateTransformer::new(definition),
        ))
    }
}

impl<T: FragmentTransformer> DocEngine<T> {
    pub fn with_transformer(config: DocsConfig, transformer: T) -> Self {
        Self {
            config,
            transformer,
            extractor: FactExtractor::new(),
        }
    }

    /// Run the whole pipeline. Stops at the first fatal error.
    pub fn run(&self) -> Result<RunReport> {
        self.config.validate()?;
        let started = Instant::now();
        let input = &self.config.input_dir;
        let output = &self.config.output_dir;
        let _span = RunSpan::enter(input);
        emit_run_started(input, output);

        let artifacts = discover(input, &self.config.extension)?;
        check_page_collisions(&artifacts)?;
        ensure_dir(output)?;

        let html = HtmlEmitter::new(output);
        html.write_stylesheet()?;

        let mut packages = PackageMap::new();
        let mut extract_issues = 0;
        for artifact in &artifacts {
            let text = read_artifact(artifact)?;
            let extraction = self.extractor.extract(&text);
            extract_issues += extraction.issues.len();
            for issue in &extraction.issues {
                emit_extract_issue(&artifact.display_path(), issue);
            }

            let fragment = self
                .transformer
                .transform(artifact, &text)
                .map_err(|source| EodocError::Transform {
                    artifact: artifact.display_path(),
                    source,
                })?;
            html.write_artifact_page(artifact, &fragment)?;

            let facts = extraction.facts;
            emit_artifact_rendered(
                &artifact.display_path(),
                artifact.package().as_str(),
                facts.entities.len(),
                facts.sheets.len(),
            );
            packages.add(artifact, fragment, facts);
        }

        let aggregate_pages = html.write_package_pages(&packages)?.len();

        let summary = output.join(SUMMARY_FILE);
        EodocDocument::from_packages(&packages)?.write(&summary)?;

        emit_run_finished(
            packages.artifact_count(),
            packages.package_count(),
            started.elapsed().as_millis() as u64,
        );
        Ok(RunReport {
            output_dir: output.clone(),
            summary,
            artifacts: packages.artifact_count(),
            packages: packages.package_count(),
            aggregate_pages,
            extract_issues,
        })
    }
}

/// Run the fact extractor over a single file.
pub fn extract_file(path: &Path) -> Result<Extraction> {
    let bytes = std::fs::read(path).map_err(|source| EodocError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(FactExtractor::new().extract(&decode_text(path, bytes)))
}

fn read_artifact(artifact: &Artifact) -> Result<String> {
    let bytes = std::fs::read(&artifact.path).map_err(|source| EodocError::Read {
        path: artifact.path.clone(),
        source,
    })?;
    Ok(decode_text(&artifact.path, bytes))
}

fn decode_text(path: &Path, bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!(path = ?path, "artifact is not valid UTF-8; invalid bytes replaced");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::TransformError;
    use std::fs;
    use tempfile::tempdir;

    struct Failing;

    impl FragmentTransformer for Failing {
        fn transform(&self, _: &Artifact, _: &str) -> std::result::Result<String, TransformError> {
            Err(TransformError::Source {
                reason: "boom".to_string(),
            })
        }
    }

    #[test]
    fn transform_failure_names_artifact() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in");
        fs::create_dir_all(input.join("pkg")).unwrap();
        fs::write(input.join("pkg/bad.xmir"), "<program/>").unwrap();

        let engine =
            DocEngine::with_transformer(DocsConfig::new(&input, dir.path().join("out")), Failing);
        match engine.run() {
            Err(EodocError::Transform { artifact, .. }) => assert_eq!(artifact, "pkg/bad.xmir"),
            other => panic!("expected Transform error, got {other:?}"),
        }
    }

    #[test]
    fn non_utf8_artifact_is_decoded_lossily() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("x.xmir");
        let mut bytes = br#"<program author="a"><sheet>s"#.to_vec();
        bytes.push(0xFF);
        bytes.extend_from_slice(b"</sheet>");
        fs::write(&path, bytes).unwrap();

        let extraction = extract_file(&path).unwrap();
        assert_eq!(extraction.facts.metadata.author.as_deref(), Some("a"));
        assert_eq!(extraction.facts.sheets, vec!["s\u{FFFD}"]);
    }

    #[test]
    fn missing_definition_file_is_fatal() {
        let config = DocsConfig::new("in", "out").with_transform("/no/such/template.html");
        assert!(matches!(
            DocEngine::from_config(config),
            Err(EodocError::Definition { .. })
        ));
    }
}
