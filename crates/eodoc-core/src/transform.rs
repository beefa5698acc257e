//! Fragment transformation - render one artifact into an HTML fragment.
//!
//! [`FragmentTransformer`] is the seam the engine calls through. The
//! built-in [`TemplateTransformer`] fills a [`TransformDefinition`] (an HTML
//! template with `{{placeholder}}` slots) from the artifact text.
//!
//! Unlike fact extraction, transformation is strict: an artifact without a
//! document element cannot be rendered and fails the run.

use std::path::Path;

use crate::artifact::Artifact;
use crate::escape::{escape_html, escape_html_text};
use crate::extract::{ExtractedFacts, FactExtractor};

/// Built-in transform definition used when none is configured.
pub const DEFAULT_DEFINITION: &str = r#"<section class="eo-artifact" id="{{path}}">
<h2 class="eo-name">{{name}}</h2>
<p class="eo-path"><code>{{path}}</code> in <span class="eo-package">{{package}}</span></p>
{{metadata}}
{{objects}}
{{sheets}}
</section>
"#;

/// Errors raised while loading a definition or rendering an artifact.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("malformed transform definition: {reason}")]
    Definition { reason: String },

    #[error("cannot render artifact: {reason}")]
    Source { reason: String },

    #[error("cannot read transform definition {path:?}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Renders one artifact's raw text into an HTML fragment. Implementations
/// see only the text, never facts extracted for the summary.
pub trait FragmentTransformer {
    fn transform(&self, artifact: &Artifact, source: &str) -> Result<String, TransformError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Name,
    Path,
    Package,
    Metadata,
    Objects,
    Sheets,
}

impl Slot {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "name" => Some(Self::Name),
            "path" => Some(Self::Path),
            "package" => Some(Self::Package),
            "metadata" => Some(Self::Metadata),
            "objects" => Some(Self::Objects),
            "sheets" => Some(Self::Sheets),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Slot(Slot),
}

/// A parsed HTML template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformDefinition {
    segments: Vec<Segment>,
}

impl TransformDefinition {
    /// Parse a template. Unknown placeholders and unterminated `{{` are errors.
    pub fn parse(template: &str) -> Result<Self, TransformError> {
        let mut segments = Vec::new();
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            if start > 0 {
                segments.push(Segment::Text(rest[..start].to_string()));
            }
            let after = &rest[start + 2..];
            let end = after.find("}}").ok_or_else(|| TransformError::Definition {
                reason: format!(
                    "unterminated placeholder at byte {}",
                    template.len() - rest.len() + start
                ),
            })?;
            let name = after[..end].trim();
            let slot = Slot::parse(name).ok_or_else(|| TransformError::Definition {
                reason: format!("unknown placeholder {{{{{name}}}}}"),
            })?;
            segments.push(Segment::Slot(slot));
            rest = &after[end + 2..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_string()));
        }

        Ok(Self { segments })
    }

    /// Load and parse a template file.
    pub fn from_file(path: &Path) -> Result<Self, TransformError> {
        let template = std::fs::read_to_string(path).map_err(|source| TransformError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&template)
    }
}

impl Default for TransformDefinition {
    fn default() -> Self {
        Self::parse(DEFAULT_DEFINITION).expect("built-in definition is well-formed")
    }
}

/// Template-driven transformer.
#[derive(Debug, Clone, Default)]
pub struct TemplateTransformer {
    definition: TransformDefinition,
    extractor: FactExtractor,
}

impl TemplateTransformer {
    pub fn new(definition: TransformDefinition) -> Self {
        Self {
            definition,
            extractor: FactExtractor::new(),
        }
    }
}

impl FragmentTransformer for TemplateTransformer {
    fn transform(&self, artifact: &Artifact, source: &str) -> Result<String, TransformError> {
        let attributes =
            self.extractor
                .document_attributes(source)
                .ok_or_else(|| TransformError::Source {
                    reason: "no <program> or <object> document element".to_string(),
                })?;
        let name = attributes
            .iter()
            .find(|(k, v)| k == "name" && !v.is_empty())
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| artifact.base_name.clone());
        let facts = self.extractor.extract(source).facts;

        let mut out = String::new();
        for segment in &self.definition.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Slot(Slot::Name) => out.push_str(&escape_html_text(&name)),
                Segment::Slot(Slot::Path) => out.push_str(&escape_html(&artifact.display_path())),
                Segment::Slot(Slot::Package) => {
                    let package = artifact.package();
                    let label = if package.is_root() {
                        "(root)"
                    } else {
                        package.as_str()
                    };
                    out.push_str(&escape_html_text(label));
                }
                Segment::Slot(Slot::Metadata) => render_metadata(&facts, &mut out),
                Segment::Slot(Slot::Objects) => render_objects(&facts, &mut out),
                Segment::Slot(Slot::Sheets) => render_sheets(&facts, &mut out),
            }
        }
        Ok(out)
    }
}

fn render_metadata(facts: &ExtractedFacts, out: &mut String) {
    let entries = facts.metadata.entries();
    if entries.is_empty() {
        return;
    }
    out.push_str("<dl class=\"eo-metadata\">");
    for (key, value) in entries {
        out.push_str(&format!(
            "<dt>{}</dt><dd>{}</dd>",
            key,
            escape_html_text(value)
        ));
    }
    out.push_str("</dl>");
}

fn render_objects(facts: &ExtractedFacts, out: &mut String) {
    if facts.entities.is_empty() {
        return;
    }
    out.push_str("<ul class=\"eo-objects\">");
    for entity in &facts.entities {
        out.push_str("<li>");
        match &entity.name {
            Some(name) => out.push_str(&format!("<code>{}</code>", escape_html_text(name))),
            None => out.push_str("<em>anonymous</em>"),
        }
        if let Some(base) = &entity.base {
            out.push_str(&format!(
                " &larr; <code class=\"eo-base\">{}</code>",
                escape_html_text(base)
            ));
        }
        match (entity.line, entity.pos) {
            (Some(line), Some(pos)) => {
                out.push_str(&format!(" <span class=\"eo-loc\">{line}:{pos}</span>"))
            }
            (Some(line), None) => out.push_str(&format!(" <span class=\"eo-loc\">{line}</span>")),
            _ => {}
        }
        out.push_str("</li>");
    }
    out.push_str("</ul>");
}

fn render_sheets(facts: &ExtractedFacts, out: &mut String) {
    if facts.sheets.is_empty() {
        return;
    }
    out.push_str("<ol class=\"eo-sheets\">");
    for sheet in &facts.sheets {
        out.push_str(&format!("<li>{}</li>", escape_html_text(sheet)));
    }
    out.push_str("</ol>");
}
