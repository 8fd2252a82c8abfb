//! Local storage for uploaded food images.
//!
//! Files are written flat into one directory, which the router also serves
//! read-only under `/images`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

/// Distinct names tried for uploads landing in the same millisecond.
const MAX_NAME_ATTEMPTS: u32 = 16;

/// Errors from the upload directory.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("upload i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored file names never contain separators or parent references.
    #[error("invalid file name: {0}")]
    InvalidName(String),
}

/// The directory uploads are written to.
#[derive(Debug, Clone)]
pub struct UploadDir {
    root: PathBuf,
}

impl UploadDir {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Create the directory if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Io` if the directory cannot be created.
    pub async fn ensure(&self) -> Result<(), UploadError> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Write an upload and return the stored file name.
    ///
    /// The name is `<unix millis><sanitized original name>`. An existing file
    /// is never overwritten: on a clash a `_<n>` counter follows the millis.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Io` if the file cannot be written.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String, UploadError> {
        self.ensure().await?;
        self.save_stamped(Utc::now().timestamp_millis(), original_name, bytes)
            .await
    }

    async fn save_stamped(
        &self,
        millis: i64,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<String, UploadError> {
        let sanitized = sanitize_file_name(original_name);

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let file_name = if attempt == 0 {
                format!("{millis}{sanitized}")
            } else {
                format!("{millis}_{attempt}{sanitized}")
            };
            let path = self.root.join(&file_name);

            let mut file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };

            let written = async {
                file.write_all(bytes).await?;
                file.flush().await
            }
            .await;
            if let Err(e) = written {
                drop(file);
                if let Err(cleanup) = tokio::fs::remove_file(&path).await {
                    tracing::warn!(file = %file_name, "Failed to remove partial upload: {cleanup}");
                }
                return Err(e.into());
            }

            tracing::debug!(file = %file_name, size = bytes.len(), "Stored upload");
            return Ok(file_name);
        }

        Err(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("no free name for {sanitized:?} after {MAX_NAME_ATTEMPTS} attempts"),
        )
        .into())
    }

    /// Delete a stored file. Returns `false` if it was already gone.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::InvalidName` for names that would escape the
    /// directory, `UploadError::Io` for other filesystem failures.
    pub async fn remove(&self, file_name: &str) -> Result<bool, UploadError> {
        if file_name.is_empty()
            || file_name == "."
            || file_name == ".."
            || file_name.contains(['/', '\\'])
        {
            return Err(UploadError::InvalidName(file_name.to_owned()));
        }

        match tokio::fs::remove_file(self.root.join(file_name)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Reduce a client-supplied file name to `[A-Za-z0-9._-]`.
///
/// Anything up to the last path separator is dropped first.
#[must_use]
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    base.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect()
}
