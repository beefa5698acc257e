//! Tolerant fact extraction from raw XMIR text.
//!
//! The extractor never parses the document structurally. It scans for three
//! shapes of markup and keeps whatever it finds:
//!
//! - the first document element (`<program ...>` or `<object ...>`) and its
//!   recognised metadata attributes
//! - every `<o ...>` declaration and its `name`/`base`/`line`/`pos` attributes
//! - every `<sheet>...</sheet>` element, in source order
//!
//! Anything that does not match is reported as an [`ExtractIssue`] next to
//! the facts instead of failing. Every field of the result is
//! present-or-absent; nothing is defaulted.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Metadata attribute names recognised on the document element.
pub const METADATA_KEYS: [&str; 6] = ["author", "version", "time", "dob", "revision", "ms"];

/// Document-level metadata. Keys absent from the source stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ms: Option<String>,
}

impl Metadata {
    fn slot(&mut self, key: &str) -> Option<&mut Option<String>> {
        match key {
            "author" => Some(&mut self.author),
            "version" => Some(&mut self.version),
            "time" => Some(&mut self.time),
            "dob" => Some(&mut self.dob),
            "revision" => Some(&mut self.revision),
            "ms" => Some(&mut self.ms),
            _ => None,
        }
    }

    /// Present entries in the fixed key order of [`METADATA_KEYS`].
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("author", &self.author),
            ("version", &self.version),
            ("time", &self.time),
            ("dob", &self.dob),
            ("revision", &self.revision),
            ("ms", &self.ms),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.as_deref().map(|v| (k, v)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

/// One declared entity (`<o>` element). Only non-empty fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<u32>,
}

impl Entity {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.base.is_none() && self.line.is_none() && self.pos.is_none()
    }
}

/// Everything extracted from one artifact. All fields may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFacts {
    pub metadata: Metadata,
    pub entities: Vec<Entity>,
    pub sheets: Vec<String>,
}

impl ExtractedFacts {
    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty() && self.entities.is_empty() && self.sheets.is_empty()
    }
}

/// A local extraction problem. Never fatal; the affected field is left empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractIssue {
    #[error("no document element found; metadata left empty")]
    MissingDocumentElement,

    #[error("declaration #{index}: attribute {attribute}={value:?} is not a non-negative integer")]
    InvalidNumber {
        index: usize,
        attribute: &'static str,
        value: String,
    },

    #[error("{count} <sheet> element(s) without a closing tag")]
    UnterminatedSheet { count: usize },
}

/// Facts plus the issues met while extracting them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub facts: ExtractedFacts,
    pub issues: Vec<ExtractIssue>,
}

/// Pattern-based scanner. Compile once per run and reuse for every artifact.
#[derive(Debug, Clone)]
pub struct FactExtractor {
    document: Regex,
    declaration: Regex,
    attribute: Regex,
    sheet: Regex,
    sheet_open: Regex,
}

impl Default for FactExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FactExtractor {
    pub fn new() -> Self {
        Self {
            document: Regex::new(r"<(?:program|object)\b([^>]*)>").expect("static pattern"),
            declaration: Regex::new(r"<o\b([^>]*)>").expect("static pattern"),
            attribute: Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
                .expect("static pattern"),
            sheet: Regex::new(r"(?s)<sheet\b[^>]*>(.*?)</sheet\s*>").expect("static pattern"),
            sheet_open: Regex::new(r"<sheet\b[^>/]*>").expect("static pattern"),
        }
    }

    /// Extract facts from raw artifact text. Never fails.
    pub fn extract(&self, text: &str) -> Extraction {
        let mut issues = Vec::new();
        let metadata = self.metadata(text, &mut issues);
        let entities = self.entities(text, &mut issues);
        let sheets = self.sheets(text, &mut issues);
        Extraction {
            facts: ExtractedFacts {
                metadata,
                entities,
                sheets,
            },
            issues,
        }
    }

    /// Attributes of the first document element, if any.
    pub(crate) fn document_attributes(&self, text: &str) -> Option<Vec<(String, String)>> {
        self.document
            .captures(text)
            .map(|caps| self.attributes(caps.get(1).map_or("", |m| m.as_str())))
    }

    fn metadata(&self, text: &str, issues: &mut Vec<ExtractIssue>) -> Metadata {
        let mut metadata = Metadata::default();
        let Some(attrs) = self.document_attributes(text) else {
            issues.push(ExtractIssue::MissingDocumentElement);
            return metadata;
        };
        for (name, value) in attrs {
            let key = name.to_ascii_lowercase();
            if let Some(slot) = metadata.slot(&key) {
                if slot.is_none() {
                    *slot = Some(value);
                }
            }
        }
        metadata
    }

    fn entities(&self, text: &str, issues: &mut Vec<ExtractIssue>) -> Vec<Entity> {
        let mut entities = Vec::new();
        for (index, caps) in self.declaration.captures_iter(text).enumerate() {
            let mut entity = Entity::default();
            for (name, value) in self.attributes(caps.get(1).map_or("", |m| m.as_str())) {
                match name.as_str() {
                    "name" if entity.name.is_none() && !value.is_empty() => {
                        entity.name = Some(value)
                    }
                    "base" if entity.base.is_none() && !value.is_empty() => {
                        entity.base = Some(value)
                    }
                    "line" if entity.line.is_none() => {
                        entity.line = parse_number(index, "line", &value, issues)
                    }
                    "pos" if entity.pos.is_none() => {
                        entity.pos = parse_number(index, "pos", &value, issues)
                    }
                    _ => {}
                }
            }
            if !entity.is_empty() {
                entities.push(entity);
            }
        }
        entities
    }

    fn sheets(&self, text: &str, issues: &mut Vec<ExtractIssue>) -> Vec<String> {
        let mut closed = 0;
        let mut sheets = Vec::new();
        for caps in self.sheet.captures_iter(text) {
            closed += 1;
            let name = decode_entities(caps.get(1).map_or("", |m| m.as_str()).trim());
            if !name.is_empty() {
                sheets.push(name);
            }
        }
        let opened = self.sheet_open.find_iter(text).count();
        if opened > closed {
            issues.push(ExtractIssue::UnterminatedSheet {
                count: opened - closed,
            });
        }
        sheets
    }

    fn attributes(&self, raw: &str) -> Vec<(String, String)> {
        self.attribute
            .captures_iter(raw)
            .map(|caps| {
                let name = caps[1].to_string();
                let value = caps
                    .get(2)
                    .or_else(|| caps.get(3))
                    .map_or("", |m| m.as_str());
                (name, decode_entities(value))
            })
            .collect()
    }
}

fn parse_number(
    index: usize,
    attribute: &'static str,
    value: &str,
    issues: &mut Vec<ExtractIssue>,
) -> Option<u32> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<u32>() {
        Ok(n) => Some(n),
        Err(_) => {
            issues.push(ExtractIssue::InvalidNumber {
                index,
                attribute,
                value: value.to_string(),
            });
            None
        }
    }
}

/// Decode the five predefined XML entities. `&amp;` goes last so that
/// `&amp;lt;` decodes to the literal text `&lt;`.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
