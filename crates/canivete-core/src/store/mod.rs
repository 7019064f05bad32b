//! Per-client persistence of rendered report artifacts.

mod fs;

pub use fs::FsReportStore;

use chrono::NaiveDateTime;

use crate::error::StoreError;

/// Prefix of every stored artifact filename.
pub const ARTIFACT_PREFIX: &str = "relatorio_";

/// Extension of every stored artifact filename.
pub const ARTIFACT_EXTENSION: &str = "xlsx";

/// Listings shown to accountants are capped to this many artifacts; the
/// store itself never discards older ones.
pub const LISTING_CAP: usize = 20;

/// Handle to a persisted artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    /// Username of the client that owns the artifact.
    pub owner: String,

    /// Artifact filename within the owner's namespace.
    pub name: String,
}

/// Storage backend for rendered reports.
///
/// Artifacts are immutable once written and never deleted. Filenames embed
/// the save timestamp at minute granularity; a second save by the same
/// owner within the same minute overwrites the first. Owner names that
/// could escape the storage root fail with [`StoreError::InvalidOwner`].
pub trait ReportStore {
    /// Persist `bytes` under the owner's namespace.
    fn save(
        &self,
        owner: &str,
        bytes: &[u8],
        timestamp: NaiveDateTime,
    ) -> Result<StoredArtifact, StoreError>;

    /// Usernames of every client that has ever saved an artifact, sorted.
    fn list_owners(&self) -> Result<Vec<String>, StoreError>;

    /// All artifact names under `owner`, most recent first.
    fn list_artifacts(&self, owner: &str) -> Result<Vec<String>, StoreError>;

    /// Read an artifact back. Fails with [`StoreError::ArtifactNotFound`]
    /// when no such name exists under the owner's namespace.
    fn read(&self, owner: &str, name: &str) -> Result<Vec<u8>, StoreError>;
}

/// Filename for an artifact saved at `timestamp`, truncated to the minute.
pub fn artifact_name(timestamp: NaiveDateTime) -> String {
    format!(
        "{}{}.{}",
        ARTIFACT_PREFIX,
        timestamp.format("%Y%m%d_%H%M"),
        ARTIFACT_EXTENSION
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_artifact_name_truncates_to_minute() {
        let t = NaiveDate::from_ymd_opt(2025, 3, 15)
            .unwrap()
            .and_hms_opt(14, 7, 59)
            .unwrap();
        assert_eq!(artifact_name(t), "relatorio_20250315_1407.xlsx");
    }
}
