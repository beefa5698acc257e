//! Package grouping - accumulate fragments and facts per package.
//!
//! [`PackageMap`] is the one accumulator of a run. It is an explicit value
//! threaded through the artifact loop and finalised once, so the engine can
//! be invoked repeatedly within one process.

use std::collections::HashMap;

use crate::artifact::{Artifact, PackageName};
use crate::extract::ExtractedFacts;

/// File name of the global aggregate page.
pub const ALL_PACKAGES_PAGE: &str = "packages.html";

/// Fragments and facts of one package, in accumulation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageBucket {
    pub name: PackageName,
    /// Aggregate page file name, relative to the output root.
    pub page: String,
    pub fragments: Vec<String>,
    pub facts: Vec<ExtractedFacts>,
}

impl PackageBucket {
    fn new(name: PackageName) -> Self {
        let page = name.page_name();
        Self {
            name,
            page,
            fragments: Vec::new(),
            facts: Vec::new(),
        }
    }

    /// The "all" pseudo-package backing `packages.html`.
    fn all() -> Self {
        Self {
            name: PackageName::default(),
            page: ALL_PACKAGES_PAGE.to_string(),
            fragments: Vec::new(),
            facts: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Whether this bucket gets its own `package_<name>.html` page.
    pub fn has_page(&self) -> bool {
        !self.name.is_root() && !self.is_empty()
    }
}

/// Package name to bucket, in first-seen order, plus the global bucket.
#[derive(Debug, Clone)]
pub struct PackageMap {
    buckets: Vec<PackageBucket>,
    index: HashMap<PackageName, usize>,
    all: PackageBucket,
}

impl Default for PackageMap {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageMap {
    pub fn new() -> Self {
        Self {
            buckets: Vec::new(),
            index: HashMap::new(),
            all: PackageBucket::all(),
        }
    }

    /// Append one artifact's fragment and facts to its package and to the
    /// global bucket. Creates the package bucket on first sight.
    pub fn add(&mut self, artifact: &Artifact, fragment: String, facts: ExtractedFacts) {
        let name = artifact.package();
        let idx = match self.index.get(&name) {
            Some(&idx) => idx,
            None => {
                self.buckets.push(PackageBucket::new(name.clone()));
                self.index.insert(name, self.buckets.len() - 1);
                self.buckets.len() - 1
            }
        };

        self.all.fragments.push(fragment.clone());
        self.all.facts.push(facts.clone());

        let bucket = &mut self.buckets[idx];
        bucket.fragments.push(fragment);
        bucket.facts.push(facts);
    }

    /// Real package buckets in the order their packages were first seen.
    pub fn buckets(&self) -> &[PackageBucket] {
        &self.buckets
    }

    pub fn get(&self, name: &PackageName) -> Option<&PackageBucket> {
        self.index.get(name).map(|&idx| &self.buckets[idx])
    }

    /// Every fragment across all packages, in discovery order.
    pub fn all(&self) -> &PackageBucket {
        &self.all
    }

    pub fn artifact_count(&self) -> usize {
        self.all.len()
    }

    pub fn package_count(&self) -> usize {
        self.buckets.len()
    }
}
