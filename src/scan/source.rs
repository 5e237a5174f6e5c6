// Content sources for the preload scan.
// A source yields the raw text of every candidate content file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::DEFAULT_EXTENSIONS;
use crate::error::{RepoCardError, Result};

/// One content file read from a source.
#[derive(Debug, Clone)]
pub struct ContentFile {
    pub path: PathBuf,
    pub text: String,
}

/// Collects candidate texts for reference extraction.
///
/// `Err` means the source as a whole is unreadable and the scan cannot
/// start. Problems confined to part of the source are logged and skipped.
pub trait ContentSource {
    fn collect(&self) -> Result<Vec<ContentFile>>;
}

/// Recursive scan of a content directory for files with known extensions.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    extensions: Vec<String>,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Replace the recognized extensions (without leading dot, case-insensitive).
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.into().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    fn is_content_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|e| *e == ext)
            })
    }
}

impl ContentSource for DirectorySource {
    fn collect(&self) -> Result<Vec<ContentFile>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.root).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(RepoCardError::ContentRoot {
                        path: self.root.clone(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    let path = e.path().map(|p| p.display().to_string()).unwrap_or_default();
                    warn!(%path, error = %e, "Skipping unreadable content path");
                    continue;
                }
            };

            if !entry.file_type().is_file() || !self.is_content_file(entry.path()) {
                continue;
            }

            match fs::read_to_string(entry.path()) {
                Ok(text) => files.push(ContentFile {
                    path: entry.path().to_path_buf(),
                    text,
                }),
                Err(e) => {
                    warn!(path = %entry.path().display(), error = %e, "Skipping unreadable content file");
                }
            }
        }

        debug!(root = %self.root.display(), files = files.len(), "Collected content files");
        Ok(files)
    }
}

/// A single content file. Failing to read it is fatal.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ContentSource for FileSource {
    fn collect(&self) -> Result<Vec<ContentFile>> {
        let text = fs::read_to_string(&self.path).map_err(|e| RepoCardError::ContentRoot {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        Ok(vec![ContentFile {
            path: self.path.clone(),
            text,
        }])
    }
}
