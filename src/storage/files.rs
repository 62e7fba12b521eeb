//! Directory-backed blob store for uploaded images.

use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

const MAX_NAME_LEN: usize = 100;
const MAX_SAVE_ATTEMPTS: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum FileStoreError {
    #[error("invalid file name '{0}'")]
    InvalidName(String),

    #[error("file '{0}' does not exist")]
    NotFound(String),

    #[error("file store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Stores uploads under a single flat directory; files are addressed by their generated name.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens (and creates, if needed) the upload directory.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, FileStoreError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `bytes` under a freshly generated name and returns that name.
    ///
    /// Files are created with create-new semantics, so an existing file is never overwritten.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String, FileStoreError> {
        for _ in 0..MAX_SAVE_ATTEMPTS {
            let name = generate_stored_name(original_name);
            let path = self.root.join(&name);
            let file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(f) => f,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    warn!(name = %name, "Generated upload name already taken, retrying");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            write_or_remove(file, &path, bytes).await?;
            debug!(name = %name, size = bytes.len(), "Stored upload");
            return Ok(name);
        }
        Err(FileStoreError::Io(std::io::Error::new(
            ErrorKind::AlreadyExists,
            "could not find a free upload name",
        )))
    }

    /// Removes a stored file by name.
    pub async fn delete(&self, name: &str) -> Result<(), FileStoreError> {
        let path = self.resolve(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(FileStoreError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn exists(&self, name: &str) -> Result<bool, FileStoreError> {
        let path = self.resolve(name)?;
        Ok(tokio::fs::try_exists(&path).await?)
    }

    /// Creates and removes a marker file to prove the directory accepts writes.
    pub async fn check_writable(&self) -> Result<(), FileStoreError> {
        let marker = self.root.join(format!(".preflight-{}", Utc::now().timestamp_millis()));
        tokio::fs::write(&marker, b"ok").await?;
        tokio::fs::remove_file(&marker).await?;
        Ok(())
    }

    fn resolve(&self, name: &str) -> Result<PathBuf, FileStoreError> {
        if !is_plain_file_name(name) {
            return Err(FileStoreError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

/// Writes `bytes` through `writer`; on failure the partial file at `path` is removed.
async fn write_or_remove<W>(mut writer: W, path: &Path, bytes: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let written = match writer.write_all(bytes).await {
        Ok(()) => writer.flush().await,
        Err(e) => Err(e),
    };
    if written.is_err() {
        drop(writer);
        if let Err(cleanup) = tokio::fs::remove_file(path).await {
            warn!(path = %path.display(), error = %cleanup, "Failed to remove partial upload");
        }
    }
    written
}

/// Only a single path component, no traversal and no hidden files.
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\', '\0'])
        && !name.contains("..")
}

/// Reduces a client-supplied file name to a safe ASCII base name.
pub fn sanitize_file_name(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    let cleaned = if cleaned.len() > MAX_NAME_LEN {
        // Keep the tail so the extension survives.
        &cleaned[cleaned.len() - MAX_NAME_LEN..]
    } else {
        cleaned
    };

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

/// `<unix-millis>-<8 hex chars>-<sanitized name>`.
pub fn generate_stored_name(original: &str) -> String {
    let suffix: [u8; 4] = rand::random();
    format!(
        "{}-{}-{}",
        Utc::now().timestamp_millis(),
        hex::encode(suffix),
        sanitize_file_name(original)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "portfolio-files-{}-{}",
            tag,
            uuid::Uuid::new_v4()
        ))
    }

    #[test]
    fn sanitize_strips_directories_and_odd_characters() {
        assert_eq!(sanitize_file_name("photos/My Vase (1).png"), "My_Vase__1_.png");
        assert_eq!(sanitize_file_name("C:\\tmp\\lamp.jpg"), "lamp.jpg");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name(".hidden"), "hidden");
        assert_eq!(sanitize_file_name(""), "upload");
        assert_eq!(sanitize_file_name("///"), "upload");
    }

    #[test]
    fn long_names_keep_their_extension() {
        let long = format!("{}.jpeg", "a".repeat(300));
        let cleaned = sanitize_file_name(&long);
        assert_eq!(cleaned.len(), MAX_NAME_LEN);
        assert!(cleaned.ends_with(".jpeg"));
    }

    #[test]
    fn generated_names_differ_for_the_same_original() {
        let a = generate_stored_name("vase.png");
        let b = generate_stored_name("vase.png");
        assert_ne!(a, b);
        assert!(a.ends_with("-vase.png"));
        assert!(is_plain_file_name(&a));
    }

    #[test]
    fn plain_names_reject_traversal() {
        assert!(is_plain_file_name("123-abcd-vase.png"));
        assert!(!is_plain_file_name("../secret"));
        assert!(!is_plain_file_name("a/b.png"));
        assert!(!is_plain_file_name(".env"));
        assert!(!is_plain_file_name(""));
    }

    #[tokio::test]
    async fn save_then_delete_round_trip() {
        let dir = scratch_dir("roundtrip");
        let store = FileStore::open(&dir).await.unwrap();

        let first = store.save("vase.png", b"one").await.unwrap();
        let second = store.save("vase.png", b"two").await.unwrap();
        assert_ne!(first, second);
        assert_eq!(tokio::fs::read(dir.join(&first)).await.unwrap(), b"one");
        assert_eq!(tokio::fs::read(dir.join(&second)).await.unwrap(), b"two");

        store.delete(&first).await.unwrap();
        assert!(!store.exists(&first).await.unwrap());
        assert!(matches!(
            store.delete(&first).await,
            Err(FileStoreError::NotFound(_))
        ));
        assert!(matches!(
            store.delete("../escape").await,
            Err(FileStoreError::InvalidName(_))
        ));

        store.check_writable().await.unwrap();
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    /// Accepts a few bytes, then fails like a full disk.
    struct FailingWriter {
        accepted: usize,
    }

    impl AsyncWrite for FailingWriter {
        fn poll_write(
            mut self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
            buf: &[u8],
        ) -> std::task::Poll<std::io::Result<usize>> {
            if self.accepted >= 2 {
                return std::task::Poll::Ready(Err(std::io::Error::new(
                    ErrorKind::Other,
                    "no space left",
                )));
            }
            let n = buf.len().min(2 - self.accepted);
            self.accepted += n;
            std::task::Poll::Ready(Ok(n))
        }

        fn poll_flush(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::task::Poll::Ready(Ok(()))
        }

        fn poll_shutdown(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::task::Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn failed_write_removes_the_partial_file() {
        let dir = scratch_dir("partial");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("123-abcd-vase.png");
        tokio::fs::write(&path, b"pa").await.unwrap();

        let result = write_or_remove(FailingWriter { accepted: 0 }, &path, b"payload").await;
        assert!(result.is_err());
        assert!(!tokio::fs::try_exists(&path).await.unwrap());

        let ok_path = dir.join("456-abcd-vase.png");
        let file = tokio::fs::File::create(&ok_path).await.unwrap();
        write_or_remove(file, &ok_path, b"payload").await.unwrap();
        assert_eq!(tokio::fs::read(&ok_path).await.unwrap(), b"payload");
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
