mod storage;

pub use storage::UploadStorage;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;

use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::Attachment;

/// Upload manager: pairs the filesystem store with attachment records so
/// files can be addressed by `(page_id, file_name)`.
pub struct Uploads {
    storage: UploadStorage,
    store: Arc<dyn Store>,
}

impl Uploads {
    pub fn new(data_dir: &Path, store: Arc<dyn Store>) -> Self {
        Self {
            storage: UploadStorage::new(data_dir),
            store,
        }
    }

    /// Store `data` under a generated file id and record the attachment.
    /// Returns the file id.
    pub async fn upload(&self, page_id: i64, file_name: &str, data: &[u8]) -> Result<String> {
        let file_id = self.storage.save(page_id, data).await?;

        self.store.create_attachment(&Attachment {
            id: 0,
            page_id,
            file_name: file_name.to_string(),
            file_id: file_id.clone(),
            created_at: Utc::now(),
        })?;

        Ok(file_id)
    }

    /// Resolve an uploaded file's on-disk path from its display name.
    pub fn read(&self, page_id: i64, file_name: &str) -> Result<PathBuf> {
        let attachment = self
            .store
            .get_attachment(page_id, file_name)?
            .ok_or(Error::NotFound)?;
        Ok(self.storage.file_path(page_id, &attachment.file_id))
    }

    /// All attachment file names for a page, in the order they were recorded.
    pub fn list(&self, page_id: i64) -> Result<Vec<String>> {
        let attachments = self.store.list_attachments(page_id)?;
        Ok(attachments.into_iter().map(|a| a.file_name).collect())
    }

    /// Drop the attachment record and its file. The record is authoritative:
    /// a missing file on disk is tolerated, a missing record is an error.
    pub async fn delete(&self, page_id: i64, file_name: &str) -> Result<()> {
        let attachment = self
            .store
            .get_attachment(page_id, file_name)?
            .ok_or(Error::NotFound)?;

        self.store.delete_attachment(page_id, file_name)?;
        self.storage.delete(page_id, &attachment.file_id).await?;
        Ok(())
    }

    /// Remove every uploaded file belonging to a page.
    pub async fn remove_page_files(&self, page_id: i64) -> Result<()> {
        self.storage.delete_page_dir(page_id).await?;
        Ok(())
    }
}
