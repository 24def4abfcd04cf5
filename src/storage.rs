//! Object storage for media binaries.
//!
//! The pipeline stores bytes under an opaque path and later hands out a
//! public URL for it; where the bytes actually live (local media directory,
//! SFTP host) is an implementation detail behind `MediaStorage`.

use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::path::PathBuf;

use crate::sftp::{SftpClient, SftpConfig, SftpError};

/// Storage-level errors
#[derive(Debug)]
pub enum StorageError {
    /// Local filesystem failure
    Io(std::io::Error),
    /// Remote upload failure
    Sftp(SftpError),
    /// Background upload task failed to complete
    TaskFailed(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(err) => write!(f, "Storage I/O error: {}", err),
            StorageError::Sftp(err) => write!(f, "Storage upload error: {}", err),
            StorageError::TaskFailed(msg) => write!(f, "Storage task failed: {}", msg),
        }
    }
}

impl StdError for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err)
    }
}

impl From<SftpError> for StorageError {
    fn from(err: SftpError) -> Self {
        StorageError::Sftp(err)
    }
}

/// Binary object store consumed by the ingestion pipeline
pub trait MediaStorage {
    /// Store `bytes` under `path` and return the stored path
    fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
    ) -> impl Future<Output = Result<String, StorageError>> + Send;

    /// Public URL for a previously stored path
    fn public_url(&self, path: &str) -> String;
}

/// Stores media files under a local directory
pub struct LocalDirStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalDirStorage {
    pub fn new(root: PathBuf, public_base_url: String) -> Self {
        Self {
            root,
            public_base_url,
        }
    }
}

impl MediaStorage for LocalDirStorage {
    async fn put(&self, path: &str, bytes: Vec<u8>) -> Result<String, StorageError> {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full_path, &bytes).await?;
        Ok(path.to_string())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_base_url.trim_end_matches('/'), path)
    }
}

/// Uploads media files to an SFTP host.
///
/// ssh2 is blocking, so each upload opens a fresh session on a blocking
/// worker thread.
pub struct SftpStorage {
    config: SftpConfig,
    remote_dir: PathBuf,
    public_base_url: String,
}

impl SftpStorage {
    pub fn new(config: SftpConfig, remote_dir: PathBuf, public_base_url: String) -> Self {
        Self {
            config,
            remote_dir,
            public_base_url,
        }
    }
}

impl MediaStorage for SftpStorage {
    async fn put(&self, path: &str, bytes: Vec<u8>) -> Result<String, StorageError> {
        let config = self.config.clone();
        let remote_path = self.remote_dir.join(path);
        let stored = path.to_string();
        tokio::task::spawn_blocking(move || -> Result<(), SftpError> {
            let client = SftpClient::connect(&config)?;
            client.upload_bytes(&bytes, &remote_path)
        })
        .await
        .map_err(|e| StorageError::TaskFailed(e.to_string()))??;
        Ok(stored)
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_base_url.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::runtime::Runtime;

    #[test]
    fn test_local_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalDirStorage::new(
            dir.path().to_path_buf(),
            "https://cdn.example.com/media/".to_string(),
        );

        let rt = Runtime::new().unwrap();
        let stored = rt
            .block_on(storage.put("1700_abc.jpg", vec![1, 2, 3]))
            .unwrap();
        assert_eq!(stored, "1700_abc.jpg");
        assert_eq!(std::fs::read(dir.path().join("1700_abc.jpg")).unwrap(), vec![1, 2, 3]);
        assert_eq!(
            storage.public_url(&stored),
            "https://cdn.example.com/media/1700_abc.jpg"
        );
    }
}
