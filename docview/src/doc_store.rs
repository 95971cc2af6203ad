//! Read-only access to stored documentation
//!
//! Generated documents live under `<docs_dir>/repositories/` as
//! `<repo>_<YYYYMMDD>_<HHMMSS>.md`, with a `<repo>_latest.md` pointer file
//! holding the file name of the newest one.

use itertools::Itertools;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Subdirectory holding the markdown documents
pub const REPOSITORIES_DIR: &str = "repositories";

/// Suffix of pointer files naming the latest document
const LATEST_SUFFIX: &str = "_latest";

/// Errors that can occur while reading the store
#[derive(Error, Debug)]
pub enum DocStoreError {
    #[error("No documentation found for repository '{repo}' in {dir}", dir = .dir.display())]
    NotFound { repo: String, dir: PathBuf },

    #[error("Failed to read {path}: {source}", path = .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A stored documentation file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDoc {
    /// Repository name from the file name
    pub repo: String,
    /// Generation timestamp from the file name (`YYYYMMDD_HHMMSS`)
    pub timestamp: String,
    /// Full path to the markdown file
    pub path: PathBuf,
}

impl StoredDoc {
    /// Parse a stored document from its path
    ///
    /// # Returns
    /// * `Some(StoredDoc)` - The file follows the `<repo>_<date>_<time>.md` pattern
    /// * `None` - Pointer files and anything else
    pub fn from_path(path: &Path) -> Option<Self> {
        if path.extension().and_then(|s| s.to_str()) != Some("md") {
            return None;
        }

        let stem = path.file_stem()?.to_str()?;
        if stem.ends_with(LATEST_SUFFIX) {
            return None;
        }

        let mut parts = stem.rsplitn(3, '_');
        let time = parts.next()?;
        let date = parts.next()?;
        let repo = parts.next()?;

        let is_digits = |s: &str, len: usize| s.len() == len && s.bytes().all(|b| b.is_ascii_digit());
        if repo.is_empty() || !is_digits(date, 8) || !is_digits(time, 6) {
            return None;
        }

        Some(Self {
            repo: repo.to_string(),
            timestamp: format!("{}_{}", date, time),
            path: path.to_path_buf(),
        })
    }
}

/// All stored documents of one repository, newest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoDocs {
    /// Repository name
    pub repo: String,
    /// Stored documents, newest first
    pub docs: Vec<StoredDoc>,
}

/// Documentation store rooted at a docs directory
#[derive(Debug, Clone)]
pub struct DocStore {
    base_dir: PathBuf,
}

impl DocStore {
    /// Create a store rooted at `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Directory holding the markdown documents
    pub fn repos_dir(&self) -> PathBuf {
        self.base_dir.join(REPOSITORIES_DIR)
    }

    /// Find the latest document of a repository
    ///
    /// The pointer file wins when its target exists; otherwise the document
    /// with the greatest timestamp is used.
    pub fn latest(&self, repo: &str) -> Result<StoredDoc, DocStoreError> {
        let repos_dir = self.repos_dir();

        let pointer = repos_dir.join(format!("{}{}.md", repo, LATEST_SUFFIX));
        if pointer.is_file() {
            let target_name = fs::read_to_string(&pointer).map_err(|source| DocStoreError::Io {
                path: pointer.clone(),
                source,
            })?;
            let target = repos_dir.join(target_name.trim());
            match StoredDoc::from_path(&target) {
                Some(doc) if target.is_file() => return Ok(doc),
                _ => log::warn!(
                    "Latest pointer {} names a missing document, falling back to scan",
                    pointer.display()
                ),
            }
        }

        self.scan()?
            .into_iter()
            .filter(|doc| doc.repo == repo)
            .max_by(|a, b| a.timestamp.cmp(&b.timestamp))
            .ok_or_else(|| DocStoreError::NotFound {
                repo: repo.to_string(),
                dir: repos_dir,
            })
    }

    /// Read the latest document of a repository
    pub fn read_latest(&self, repo: &str) -> Result<String, DocStoreError> {
        let doc = self.latest(repo)?;
        log::info!("Reading {}", doc.path.display());

        fs::read_to_string(&doc.path).map_err(|source| DocStoreError::Io {
            path: doc.path.clone(),
            source,
        })
    }

    /// List stored documents grouped by repository, sorted by name
    pub fn list(&self) -> Result<Vec<RepoDocs>, DocStoreError> {
        let grouped = self
            .scan()?
            .into_iter()
            .into_group_map_by(|doc| doc.repo.clone());

        Ok(grouped
            .into_iter()
            .sorted_by(|a, b| a.0.cmp(&b.0))
            .map(|(repo, docs)| RepoDocs {
                repo,
                docs: docs
                    .into_iter()
                    .sorted_by(|a, b| b.timestamp.cmp(&a.timestamp))
                    .collect(),
            })
            .collect())
    }

    /// Collect every stored document in the repositories directory
    fn scan(&self) -> Result<Vec<StoredDoc>, DocStoreError> {
        let repos_dir = self.repos_dir();
        if !repos_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut docs = Vec::new();
        for entry in WalkDir::new(&repos_dir).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| DocStoreError::Io {
                path: repos_dir.clone(),
                source: e.into(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(doc) = StoredDoc::from_path(entry.path()) {
                docs.push(doc);
            }
        }

        log::debug!("Found {} stored document(s) in {}", docs.len(), repos_dir.display());
        Ok(docs)
    }
}
