// Content scanning.
// Reads content sources and extracts the repositories they reference.

pub mod extract;
pub mod source;

use std::collections::BTreeSet;

use crate::error::Result;
use crate::github::RepoRef;

pub use extract::extract_references;
pub use source::{ContentFile, ContentSource, DirectorySource, FileSource};

/// Union of every reference found across a source.
pub fn collect_references(source: &dyn ContentSource) -> Result<BTreeSet<RepoRef>> {
    let mut repos = BTreeSet::new();
    for file in source.collect()? {
        repos.extend(extract_references(&file.text));
    }
    Ok(repos)
}
