pub const SCHEMA: &str = r#"
-- Markdown pages. created_ts is the creation instant in microseconds and is
-- the key pages are addressed by in URLs.
CREATE TABLE IF NOT EXISTS pages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    created_ts INTEGER NOT NULL,
    title TEXT NOT NULL DEFAULT '',
    preview TEXT NOT NULL DEFAULT '',
    body TEXT NOT NULL DEFAULT '',
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

-- Append-only body snapshots, one per edit of an existing page.
CREATE TABLE IF NOT EXISTS history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    page_id INTEGER NOT NULL REFERENCES pages(id) ON DELETE CASCADE,
    body TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Uploaded files. file_id is the generated on-disk name; file_name is the
-- display name. No uniqueness on (page_id, file_name): uploads never dedup,
-- lookups take the oldest match.
CREATE TABLE IF NOT EXISTS attachments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    page_id INTEGER NOT NULL REFERENCES pages(id) ON DELETE CASCADE,
    file_name TEXT NOT NULL,
    file_id TEXT NOT NULL,
    created_at TEXT DEFAULT (datetime('now'))
);

-- Create indexes
CREATE INDEX IF NOT EXISTS idx_pages_created_ts ON pages(created_ts);
CREATE INDEX IF NOT EXISTS idx_history_page ON history(page_id);
CREATE INDEX IF NOT EXISTS idx_attachments_page ON attachments(page_id);
"#;
