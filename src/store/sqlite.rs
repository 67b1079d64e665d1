use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};

use super::Store;
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns a guard to the underlying database connection.
    /// This allows consuming applications to execute custom SQL.
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn()
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn page_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Page> {
    Ok(Page {
        id: row.get(0)?,
        created_ts: row.get(1)?,
        title: row.get(2)?,
        preview: row.get(3)?,
        body: row.get(4)?,
        created_at: parse_datetime(&row.get::<_, String>(5)?),
        updated_at: parse_datetime(&row.get::<_, String>(6)?),
    })
}

const PAGE_COLUMNS: &str = "id, created_ts, title, preview, body, created_at, updated_at";

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // Page operations

    fn create_page(&self, page: &Page) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO pages (created_ts, title, preview, body, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                page.created_ts,
                page.title,
                page.preview,
                page.body,
                format_datetime(&page.created_at),
                format_datetime(&page.updated_at),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn get_page(&self, id: i64) -> Result<Option<Page>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {PAGE_COLUMNS} FROM pages WHERE id = ?1"),
            params![id],
            page_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_page_by_key(&self, created_ts: i64) -> Result<Option<Page>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {PAGE_COLUMNS} FROM pages WHERE created_ts = ?1 ORDER BY id LIMIT 1"),
            params![created_ts],
            page_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_pages(&self) -> Result<Vec<Page>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {PAGE_COLUMNS} FROM pages ORDER BY updated_at DESC, id DESC"
        ))?;

        let rows = stmt.query_map([], page_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_page(&self, page: &Page) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE pages SET title = ?1, preview = ?2, body = ?3, updated_at = ?4 WHERE id = ?5",
            params![
                page.title,
                page.preview,
                page.body,
                format_datetime(&page.updated_at),
                page.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_page(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM pages WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // History operations

    fn create_history(&self, entry: &History) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO history (page_id, body, updated_at) VALUES (?1, ?2, ?3)",
            params![
                entry.page_id,
                entry.body,
                format_datetime(&entry.updated_at),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn list_page_history(&self, page_id: i64) -> Result<Vec<History>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, page_id, body, updated_at FROM history
             WHERE page_id = ?1 ORDER BY id DESC",
        )?;

        let rows = stmt.query_map(params![page_id], |row| {
            Ok(History {
                id: row.get(0)?,
                page_id: row.get(1)?,
                body: row.get(2)?,
                updated_at: parse_datetime(&row.get::<_, String>(3)?),
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Attachment operations

    fn create_attachment(&self, attachment: &Attachment) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO attachments (page_id, file_name, file_id, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                attachment.page_id,
                attachment.file_name,
                attachment.file_id,
                format_datetime(&attachment.created_at),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn get_attachment(&self, page_id: i64, file_name: &str) -> Result<Option<Attachment>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, page_id, file_name, file_id, created_at FROM attachments
             WHERE page_id = ?1 AND file_name = ?2 ORDER BY id LIMIT 1",
            params![page_id, file_name],
            |row| {
                Ok(Attachment {
                    id: row.get(0)?,
                    page_id: row.get(1)?,
                    file_name: row.get(2)?,
                    file_id: row.get(3)?,
                    created_at: parse_datetime(&row.get::<_, String>(4)?),
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_attachments(&self, page_id: i64) -> Result<Vec<Attachment>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, page_id, file_name, file_id, created_at FROM attachments
             WHERE page_id = ?1 ORDER BY id",
        )?;

        let rows = stmt.query_map(params![page_id], |row| {
            Ok(Attachment {
                id: row.get(0)?,
                page_id: row.get(1)?,
                file_name: row.get(2)?,
                file_id: row.get(3)?,
                created_at: parse_datetime(&row.get::<_, String>(4)?),
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn delete_attachment(&self, page_id: i64, file_name: &str) -> Result<bool> {
        let rows = self.conn().execute(
            "DELETE FROM attachments WHERE page_id = ?1 AND file_name = ?2",
            params![page_id, file_name],
        )?;
        Ok(rows > 0)
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (TempDir, SqliteStore) {
        let temp = TempDir::new().unwrap();
        let store = SqliteStore::new(temp.path().join("test.db")).unwrap();
        store.initialize().unwrap();
        (temp, store)
    }

    #[test]
    fn test_initialize_creates_tables() {
        let (_temp, store) = test_store();

        let conn = store.conn();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&"pages".to_string()));
        assert!(tables.contains(&"history".to_string()));
        assert!(tables.contains(&"attachments".to_string()));
    }

    #[test]
    fn test_page_crud() {
        let (_temp, store) = test_store();

        let mut page = Page::new("# First\nhello world", Utc::now());
        page.id = store.create_page(&page).unwrap();

        let fetched = store.get_page(page.id).unwrap().unwrap();
        assert_eq!(fetched.title, "First");
        assert_eq!(fetched.preview, "hello world");
        assert_eq!(fetched.created_ts, page.created_ts);

        let by_key = store.get_page_by_key(page.created_ts).unwrap().unwrap();
        assert_eq!(by_key.id, page.id);

        page.apply_edit("# Renamed\nnew body", Utc::now());
        store.update_page(&page).unwrap();
        let fetched = store.get_page(page.id).unwrap().unwrap();
        assert_eq!(fetched.title, "Renamed");
        assert_eq!(fetched.body, "# Renamed\nnew body");

        let deleted = store.delete_page(page.id).unwrap();
        assert!(deleted);
        assert!(store.get_page(page.id).unwrap().is_none());
    }

    #[test]
    fn test_update_missing_page_is_not_found() {
        let (_temp, store) = test_store();

        let page = Page::new("# Ghost\n", Utc::now());
        assert!(matches!(store.update_page(&page), Err(Error::NotFound)));
    }

    #[test]
    fn test_list_pages_most_recently_updated_first() {
        let (_temp, store) = test_store();

        let t0 = Utc::now();
        let mut older = Page::new("# Older\n", t0);
        older.id = store.create_page(&older).unwrap();

        let mut newer = Page::new("# Newer\n", t0 + chrono::Duration::seconds(1));
        newer.id = store.create_page(&newer).unwrap();

        older.apply_edit("# Older\nedited later", t0 + chrono::Duration::seconds(10));
        store.update_page(&older).unwrap();

        let pages = store.list_pages().unwrap();
        let titles: Vec<_> = pages.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["Older", "Newer"]);
    }

    #[test]
    fn test_history_append_and_order() {
        let (_temp, store) = test_store();

        let mut page = Page::new("# Page\nv1", Utc::now());
        page.id = store.create_page(&page).unwrap();

        for body in ["v1", "v2"] {
            store
                .create_history(&History {
                    id: 0,
                    page_id: page.id,
                    body: body.to_string(),
                    updated_at: Utc::now(),
                })
                .unwrap();
        }

        let entries = store.list_page_history(page.id).unwrap();
        assert_eq!(entries.len(), 2);
        // newest snapshot first
        assert_eq!(entries[0].body, "v2");
        assert_eq!(entries[1].body, "v1");
    }

    #[test]
    fn test_attachment_crud_and_order() {
        let (_temp, store) = test_store();

        let mut page = Page::new("# Page\n", Utc::now());
        page.id = store.create_page(&page).unwrap();

        for (name, file_id) in [("foo.txt", "id-1"), ("bar.txt", "id-2")] {
            store
                .create_attachment(&Attachment {
                    id: 0,
                    page_id: page.id,
                    file_name: name.to_string(),
                    file_id: file_id.to_string(),
                    created_at: Utc::now(),
                })
                .unwrap();
        }

        let names: Vec<_> = store
            .list_attachments(page.id)
            .unwrap()
            .into_iter()
            .map(|a| a.file_name)
            .collect();
        assert_eq!(names, ["foo.txt", "bar.txt"]);

        let found = store.get_attachment(page.id, "bar.txt").unwrap().unwrap();
        assert_eq!(found.file_id, "id-2");

        assert!(store.delete_attachment(page.id, "bar.txt").unwrap());
        assert!(store.get_attachment(page.id, "bar.txt").unwrap().is_none());
        assert!(!store.delete_attachment(page.id, "bar.txt").unwrap());
    }

    #[test]
    fn test_duplicate_file_names_resolve_to_oldest() {
        let (_temp, store) = test_store();

        let mut page = Page::new("# Page\n", Utc::now());
        page.id = store.create_page(&page).unwrap();

        for file_id in ["first", "second"] {
            store
                .create_attachment(&Attachment {
                    id: 0,
                    page_id: page.id,
                    file_name: "dup.txt".to_string(),
                    file_id: file_id.to_string(),
                    created_at: Utc::now(),
                })
                .unwrap();
        }

        let found = store.get_attachment(page.id, "dup.txt").unwrap().unwrap();
        assert_eq!(found.file_id, "first");
    }

    #[test]
    fn test_deleting_page_cascades() {
        let (_temp, store) = test_store();

        let mut page = Page::new("# Page\nbody", Utc::now());
        page.id = store.create_page(&page).unwrap();

        store
            .create_history(&History {
                id: 0,
                page_id: page.id,
                body: "body".to_string(),
                updated_at: Utc::now(),
            })
            .unwrap();
        store
            .create_attachment(&Attachment {
                id: 0,
                page_id: page.id,
                file_name: "foo.txt".to_string(),
                file_id: "id-1".to_string(),
                created_at: Utc::now(),
            })
            .unwrap();

        store.delete_page(page.id).unwrap();

        assert!(store.list_page_history(page.id).unwrap().is_empty());
        assert!(store.list_attachments(page.id).unwrap().is_empty());
    }
}
