//! # File Store
//!
//! Read/write seam used by the per-file optimizer. [`LocalFileStore`] is the
//! real filesystem; tests plug in an in-memory store with controllable
//! timing.

use async_trait::async_trait;
use std::io;
use std::path::Path;

/// Byte-level file access
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Read a whole file
    async fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Write a whole file, replacing any previous content
    async fn write(&self, path: &Path, data: &[u8]) -> io::Result<()>;
}

/// Local filesystem through `tokio::fs`
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileStore;

#[async_trait]
impl FileStore for LocalFileStore {
    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        tokio::fs::read(path).await
    }

    /// Parent directories of the destination are created on demand
    async fn write(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, data).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("dist/img/icons/logo.png");

        LocalFileStore.write(&dest, b"png bytes").await.unwrap();
        assert_eq!(LocalFileStore.read(&dest).await.unwrap(), b"png bytes");
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = LocalFileStore
            .read(&temp_dir.path().join("missing.gif"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
