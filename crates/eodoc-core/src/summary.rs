//! XML summary - one hierarchical document describing every package,
//! artifact, declared entity, and processing sheet.
//!
//! ```text
//! eodoc
//! └── package[@name]*
//!     └── object*
//!         ├── metadata { author, version, time, dob, revision, ms }?
//!         ├── objects { o[@name, @base, @line, @pos]* }?
//!         └── sheets { sheet* }?
//! ```
//!
//! The document is validated as a whole before a single byte is written.

use std::collections::HashSet;
use std::path::Path;

use crate::artifact::PackageName;
use crate::error::Result;
use crate::escape::escape_xml;
use crate::extract::{Entity, ExtractedFacts};
use crate::output::write_atomic;
use crate::package::PackageMap;

/// Summary file name at the output root.
pub const SUMMARY_FILE: &str = "summary.xml";

/// Declaration written before the document body.
pub const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Validation failures of the package-to-facts mapping.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SummaryError {
    #[error("package {0:?} appears more than once")]
    DuplicatePackage(String),

    #[error("package {0:?} has no artifact list")]
    MissingArtifacts(String),
}

/// One `<package>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryPackage {
    pub name: PackageName,
    pub objects: Vec<ExtractedFacts>,
}

/// In-memory shape of `summary.xml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EodocDocument {
    pub packages: Vec<SummaryPackage>,
}

impl EodocDocument {
    /// Build from `(package, artifact facts)` entries in first-seen order.
    ///
    /// A `None` artifact list or a repeated package name fails validation.
    /// Packages with an empty list are skipped.
    pub fn build<I>(entries: I) -> std::result::Result<Self, SummaryError>
    where
        I: IntoIterator<Item = (PackageName, Option<Vec<ExtractedFacts>>)>,
    {
        let mut seen = HashSet::new();
        let mut packages = Vec::new();

        for (name, objects) in entries {
            if !seen.insert(name.clone()) {
                return Err(SummaryError::DuplicatePackage(name.to_string()));
            }
            let objects = objects.ok_or_else(|| SummaryError::MissingArtifacts(name.to_string()))?;
            if objects.is_empty() {
                continue;
            }
            packages.push(SummaryPackage { name, objects });
        }

        Ok(Self { packages })
    }

    /// Build from the run's accumulated package map.
    pub fn from_packages(packages: &PackageMap) -> std::result::Result<Self, SummaryError> {
        Self::build(
            packages
                .buckets()
                .iter()
                .map(|b| (b.name.clone(), Some(b.facts.clone()))),
        )
    }

    /// Serialize with the XML declaration header.
    pub fn to_xml(&self) -> String {
        let mut out = String::from(XML_HEADER);
        if self.packages.is_empty() {
            out.push_str("<eodoc/>\n");
            return out;
        }
        out.push_str("<eodoc>\n");
        for package in &self.packages {
            out.push_str(&format!(
                "  <package name=\"{}\">\n",
                escape_xml(package.name.as_str())
            ));
            for facts in &package.objects {
                write_object(facts, &mut out);
            }
            out.push_str("  </package>\n");
        }
        out.push_str("</eodoc>\n");
        out
    }

    /// Serialize and write to `path`.
    pub fn write(&self, path: &Path) -> Result<()> {
        write_atomic(path, self.to_xml().as_bytes())
    }
}

fn write_object(facts: &ExtractedFacts, out: &mut String) {
    if facts.is_empty() {
        out.push_str("    <object/>\n");
        return;
    }
    out.push_str("    <object>\n");

    let metadata = facts.metadata.entries();
    if !metadata.is_empty() {
        out.push_str("      <metadata>\n");
        for (key, value) in metadata {
            out.push_str(&format!("        <{key}>{}</{key}>\n", escape_xml(value)));
        }
        out.push_str("      </metadata>\n");
    }

    if !facts.entities.is_empty() {
        out.push_str("      <objects>\n");
        for entity in &facts.entities {
            out.push_str(&format!("        <o{}/>\n", entity_attributes(entity)));
        }
        out.push_str("      </objects>\n");
    }

    if !facts.sheets.is_empty() {
        out.push_str("      <sheets>\n");
        for sheet in &facts.sheets {
            out.push_str(&format!("        <sheet>{}</sheet>\n", escape_xml(sheet)));
        }
        out.push_str("      </sheets>\n");
    }

    out.push_str("    </object>\n");
}

fn entity_attributes(entity: &Entity) -> String {
    let mut attrs = String::new();
    if let Some(name) = &entity.name {
        attrs.push_str(&format!(" name=\"{}\"", escape_xml(name)));
    }
    if let Some(base) = &entity.base {
        attrs.push_str(&format!(" base=\"{}\"", escape_xml(base)));
    }
    if let Some(line) = entity.line {
        attrs.push_str(&format!(" line=\"{line}\""));
    }
    if let Some(pos) = entity.pos {
        attrs.push_str(&format!(" pos=\"{pos}\""));
    }
    attrs
}
