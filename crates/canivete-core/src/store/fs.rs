//! Filesystem-backed report store.
//!
//! Layout: one subdirectory per client under the storage root, artifact
//! files named `relatorio_{YYYYMMDD_HHMM}.xlsx`. Directories double as the
//! owner index and filenames as the time index.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::error::StoreError;

use super::{artifact_name, ReportStore, StoredArtifact, ARTIFACT_EXTENSION};

/// Report store rooted at a local directory.
#[derive(Debug, Clone)]
pub struct FsReportStore {
    root: PathBuf,
}

impl FsReportStore {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// the first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Storage root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn owner_dir(&self, owner: &str) -> PathBuf {
        self.root.join(owner)
    }
}

/// Reject names that could escape the owner's namespace.
fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
}

fn check_owner(owner: &str) -> Result<(), StoreError> {
    if is_safe_name(owner) {
        Ok(())
    } else {
        Err(StoreError::InvalidOwner {
            owner: owner.to_string(),
        })
    }
}

impl ReportStore for FsReportStore {
    fn save(
        &self,
        owner: &str,
        bytes: &[u8],
        timestamp: NaiveDateTime,
    ) -> Result<StoredArtifact, StoreError> {
        check_owner(owner)?;

        let dir = self.owner_dir(owner);
        fs::create_dir_all(&dir)?;

        let name = artifact_name(timestamp);
        let path = dir.join(&name);

        // Write to a sibling temp file first so readers never observe a
        // partially written artifact.
        let tmp = dir.join(format!(".{name}.tmp"));
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)?;

        info!(owner, name = %name, bytes = bytes.len(), "saved report artifact");

        Ok(StoredArtifact {
            owner: owner.to_string(),
            name,
        })
    }

    fn list_owners(&self) -> Result<Vec<String>, StoreError> {
        let mut owners = Vec::new();

        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(owners),
            Err(e) => return Err(e.into()),
        };

        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    owners.push(name.to_string());
                }
            }
        }

        owners.sort();
        Ok(owners)
    }

    fn list_artifacts(&self, owner: &str) -> Result<Vec<String>, StoreError> {
        check_owner(owner)?;

        let mut names = Vec::new();

        let entries = match fs::read_dir(self.owner_dir(owner)) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(names),
            Err(e) => return Err(e.into()),
        };

        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if name.ends_with(&format!(".{ARTIFACT_EXTENSION}")) && !name.starts_with('.') {
                    names.push(name.to_string());
                }
            }
        }

        // Timestamped filenames, so lexicographic descending is newest first
        names.sort_by(|a, b| b.cmp(a));
        debug!(owner, count = names.len(), "listed report artifacts");
        Ok(names)
    }

    fn read(&self, owner: &str, name: &str) -> Result<Vec<u8>, StoreError> {
        check_owner(owner)?;

        let not_found = || StoreError::ArtifactNotFound {
            owner: owner.to_string(),
            name: name.to_string(),
        };

        if !is_safe_name(name) {
            return Err(not_found());
        }

        let path = self.owner_dir(owner).join(name);
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(not_found()),
            Err(e) => Err(e.into()),
        }
    }
}
