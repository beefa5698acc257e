//! HTML emitter - per-artifact pages, per-package pages, and `packages.html`.
//!
//! Every page is a minimal shell linking `styles.css` at the output root by
//! a relative href, so the tree can be browsed straight from disk.

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::debug;

use crate::artifact::Artifact;
use crate::error::{EodocError, Result};
use crate::escape::escape_html_text;
use crate::output::write_atomic;
use crate::package::{PackageBucket, PackageMap, ALL_PACKAGES_PAGE};

/// Stylesheet file name at the output root.
pub const STYLESHEET: &str = "styles.css";

const DEFAULT_CSS: &str = "body { font-family: sans-serif; margin: 2em; }
.eo-artifact { border-bottom: 1px solid #ddd; padding-bottom: 1em; }
.eo-path { color: #666; }
.eo-metadata dt { font-weight: bold; }
.eo-loc { color: #999; font-size: smaller; }
";

/// Wrap `body` in a page shell titled `title`.
pub fn page_shell(title: &str, stylesheet_href: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\"/>\n<title>{}</title>\n<link rel=\"stylesheet\" href=\"{}\"/>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html_text(title),
        stylesheet_href,
        body
    )
}

/// Relative href from a page `depth` directories below the output root.
pub fn stylesheet_href(depth: usize) -> String {
    format!("{}{}", "../".repeat(depth), STYLESHEET)
}

/// Fail if a root-level artifact's page shares its file name with an
/// aggregate page (`packages.html` or `package_<name>.html` of a package
/// present in `artifacts`). Checked before anything is written.
pub fn check_page_collisions(artifacts: &[Artifact]) -> Result<()> {
    let mut aggregate: HashSet<String> = artifacts
        .iter()
        .map(Artifact::package)
        .filter(|p| !p.is_root())
        .map(|p| p.page_name())
        .collect();
    aggregate.insert(ALL_PACKAGES_PAGE.to_string());

    for artifact in artifacts.iter().filter(|a| a.package().is_root()) {
        let page = format!("{}.html", artifact.base_name);
        if aggregate.contains(&page) {
            return Err(EodocError::PageCollision {
                artifact: artifact.display_path(),
                page,
            });
        }
    }
    Ok(())
}

/// Writes HTML pages under one output root.
#[derive(Debug, Clone)]
pub struct HtmlEmitter {
    output_dir: PathBuf,
}

impl HtmlEmitter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Create `styles.css`. Must run before any page is written.
    pub fn write_stylesheet(&self) -> Result<PathBuf> {
        let path = self.output_dir.join(STYLESHEET);
        write_atomic(&path, DEFAULT_CSS.as_bytes())?;
        Ok(path)
    }

    /// Output path of an artifact's page: `<out>/<relative dir>/<base>.html`.
    pub fn artifact_page_path(&self, artifact: &Artifact) -> PathBuf {
        self.output_dir
            .join(artifact.relative_dir())
            .join(format!("{}.html", artifact.base_name))
    }

    /// Write one artifact's page wrapping its fragment.
    pub fn write_artifact_page(&self, artifact: &Artifact, fragment: &str) -> Result<PathBuf> {
        let path = self.artifact_page_path(artifact);
        let depth = artifact.relative_dir().components().count();
        let html = page_shell(&artifact.display_path(), &stylesheet_href(depth), fragment);
        write_atomic(&path, html.as_bytes())?;
        debug!(page = ?path, "wrote artifact page");
        Ok(path)
    }

    /// Write one aggregate page per named package plus `packages.html`.
    pub fn write_package_pages(&self, packages: &PackageMap) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for bucket in packages.buckets().iter().filter(|b| b.has_page()) {
            let title = format!("Package {}", bucket.name);
            written.push(self.write_aggregate(bucket, &title)?);
        }
        written.push(self.write_aggregate(packages.all(), "All packages")?);
        Ok(written)
    }

    fn write_aggregate(&self, bucket: &PackageBucket, title: &str) -> Result<PathBuf> {
        let path = self.output_dir.join(&bucket.page);
        let body = format!(
            "<h1>{}</h1>\n{}",
            escape_html_text(title),
            bucket.fragments.concat()
        );
        let html = page_shell(title, &stylesheet_href(0), &body);
        write_atomic(&path, html.as_bytes())?;
        debug!(page = ?path, fragments = bucket.len(), "wrote aggregate page");
        Ok(path)
    }
}
