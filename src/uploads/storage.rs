use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Filesystem store for uploaded files. Each file lives at
/// `<data_dir>/uploads/<page_id>/<file_id>`, where `file_id` is a generated
/// UUID; the display name is kept in the database, never on disk.
pub struct UploadStorage {
    base_path: PathBuf,
}

impl UploadStorage {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            base_path: data_dir.join("uploads"),
        }
    }

    fn page_dir(&self, page_id: i64) -> PathBuf {
        self.base_path.join(page_id.to_string())
    }

    #[must_use]
    pub fn file_path(&self, page_id: i64, file_id: &str) -> PathBuf {
        self.page_dir(page_id).join(file_id)
    }

    /// Write `data` under a fresh file id and return the id. The bytes are
    /// fully on disk when this returns; a failed write leaves whatever made
    /// it to disk in place.
    pub async fn save(&self, page_id: i64, data: &[u8]) -> std::io::Result<String> {
        let file_id = Uuid::new_v4().to_string();

        let dir = self.page_dir(page_id);
        fs::create_dir_all(&dir).await?;

        let mut file = File::create(dir.join(&file_id)).await?;
        file.write_all(data).await?;
        file.flush().await?;

        Ok(file_id)
    }

    /// Remove a stored file. Returns whether it existed.
    pub async fn delete(&self, page_id: i64, file_id: &str) -> std::io::Result<bool> {
        match fs::remove_file(self.file_path(page_id, file_id)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Remove a page's whole upload directory. Used when the page itself is
    /// deleted; a page that never had uploads has no directory.
    pub async fn delete_page_dir(&self, page_id: i64) -> std::io::Result<()> {
        match fs::remove_dir_all(self.page_dir(page_id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_writes_under_page_dir() {
        let temp_dir = TempDir::new().unwrap();
        let storage = UploadStorage::new(temp_dir.path());

        let data = b"file content";
        let file_id = storage.save(7, data).await.unwrap();

        let path = storage.file_path(7, &file_id);
        assert!(path.ends_with(format!("uploads/7/{file_id}")));
        assert_eq!(std::fs::read(&path).unwrap(), data);
    }

    #[tokio::test]
    async fn test_each_save_gets_a_fresh_id() {
        let temp_dir = TempDir::new().unwrap();
        let storage = UploadStorage::new(temp_dir.path());

        let a = storage.save(1, b"same bytes").await.unwrap();
        let b = storage.save(1, b"same bytes").await.unwrap();
        assert_ne!(a, b);
        assert!(storage.file_path(1, &a).exists());
        assert!(storage.file_path(1, &b).exists());
    }

    #[tokio::test]
    async fn test_delete() {
        let temp_dir = TempDir::new().unwrap();
        let storage = UploadStorage::new(temp_dir.path());

        let file_id = storage.save(1, b"bytes").await.unwrap();
        assert!(storage.delete(1, &file_id).await.unwrap());
        assert!(!storage.delete(1, &file_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_page_dir() {
        let temp_dir = TempDir::new().unwrap();
        let storage = UploadStorage::new(temp_dir.path());

        let file_id = storage.save(1, b"bytes").await.unwrap();
        storage.delete_page_dir(1).await.unwrap();
        assert!(!storage.file_path(1, &file_id).exists());

        // absent directory is fine
        storage.delete_page_dir(42).await.unwrap();
    }
}
