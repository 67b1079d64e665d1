mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // Page operations
    fn create_page(&self, page: &Page) -> Result<i64>;
    fn get_page(&self, id: i64) -> Result<Option<Page>>;
    fn get_page_by_key(&self, created_ts: i64) -> Result<Option<Page>>;
    fn list_pages(&self) -> Result<Vec<Page>>;
    fn update_page(&self, page: &Page) -> Result<()>;
    fn delete_page(&self, id: i64) -> Result<bool>;

    // History operations
    fn create_history(&self, entry: &History) -> Result<i64>;
    fn list_page_history(&self, page_id: i64) -> Result<Vec<History>>;

    // Attachment operations
    fn create_attachment(&self, attachment: &Attachment) -> Result<i64>;
    fn get_attachment(&self, page_id: i64, file_name: &str) -> Result<Option<Attachment>>;
    fn list_attachments(&self, page_id: i64) -> Result<Vec<Attachment>>;
    fn delete_attachment(&self, page_id: i64, file_name: &str) -> Result<bool>;

    fn close(&self) -> Result<()>;
}
