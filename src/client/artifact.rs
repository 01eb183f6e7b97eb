//! Local artifact holding the most recent bid.

use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::RateResult;

/// Label written before the bid text.
pub const ARTIFACT_PREFIX: &str = "Dólar: ";

/// A file overwritten with `"Dólar: <bid>"` on every successful run.
#[derive(Debug, Clone)]
pub struct Artifact {
    path: PathBuf,
}

impl Artifact {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the file's contents with the label followed by `bid`.
    ///
    /// `bid` is written byte-for-byte as received; the file is created when
    /// absent and truncated otherwise.
    pub async fn write_bid(&self, bid: &[u8]) -> RateResult<()> {
        if fs::metadata(&self.path).await.is_err() {
            fs::File::create(&self.path).await?;
        }

        let mut content = Vec::with_capacity(ARTIFACT_PREFIX.len() + bid.len());
        content.extend_from_slice(ARTIFACT_PREFIX.as_bytes());
        content.extend_from_slice(bid);
        fs::write(&self.path, content).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RateError;

    #[tokio::test]
    async fn test_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = Artifact::new(dir.path().join("cotacao.txt"));

        artifact.write_bid(b"5.43").await.unwrap();

        let content = fs::read_to_string(artifact.path()).await.unwrap();
        assert_eq!(content, "Dólar: 5.43");
    }

    #[tokio::test]
    async fn test_overwrites_instead_of_appending() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = Artifact::new(dir.path().join("cotacao.txt"));

        artifact.write_bid(b"5.4321").await.unwrap();
        artifact.write_bid(b"5.1").await.unwrap();

        let content = fs::read_to_string(artifact.path()).await.unwrap();
        assert_eq!(content, "Dólar: 5.1");
    }

    #[tokio::test]
    async fn test_unwritable_path_is_artifact_error() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = Artifact::new(dir.path().join("no-such-dir").join("cotacao.txt"));

        let err = artifact.write_bid(b"5.43").await.unwrap_err();
        assert!(matches!(err, RateError::ArtifactWrite(_)));
    }
}
