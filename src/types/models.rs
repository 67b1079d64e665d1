use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of characters of body text kept as the index preview.
const PREVIEW_LEN: usize = 100;

/// A single markdown document. `created_ts` is the creation instant in
/// microseconds since the epoch and doubles as the page's URL key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: i64,
    pub created_ts: i64,
    pub title: String,
    pub preview: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An immutable snapshot of a page's prior body, taken before each edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    pub id: i64,
    pub page_id: i64,
    pub body: String,
    pub updated_at: DateTime<Utc>,
}

/// A file associated with a page. `file_id` is the generated on-disk name;
/// `file_name` is the name the file was uploaded under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub id: i64,
    pub page_id: i64,
    pub file_name: String,
    pub file_id: String,
    pub created_at: DateTime<Utc>,
}

impl Page {
    /// Build a fresh page from submitted markdown. Title and preview are
    /// derived from the body; `created_ts` is taken from `now` and never
    /// changes afterwards.
    #[must_use]
    pub fn new(body: &str, now: DateTime<Utc>) -> Self {
        let (title, preview) = derive_title_and_preview(body);
        Self {
            id: 0,
            created_ts: now.timestamp_micros(),
            title,
            preview,
            body: body.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the body with newly submitted markdown, re-deriving title
    /// and preview and bumping `updated_at`.
    pub fn apply_edit(&mut self, body: &str, now: DateTime<Utc>) {
        let (title, preview) = derive_title_and_preview(body);
        self.title = title;
        self.preview = preview;
        self.body = body.to_string();
        self.updated_at = now;
    }
}

/// The first line of the submitted text (after leading whitespace, minus any
/// leading `#`/space run) becomes the title; the first `PREVIEW_LEN` chars of
/// the remainder become the preview. Text without a newline is all title.
fn derive_title_and_preview(body: &str) -> (String, String) {
    let (first_line, rest) = match body.trim_start().split_once('\n') {
        Some((first, rest)) => (first, rest),
        None => (body, ""),
    };
    let first_line = first_line.strip_suffix('\r').unwrap_or(first_line);
    let title = first_line.trim_start_matches(['#', ' ']).to_string();
    let preview = rest.chars().take(PREVIEW_LEN).collect();
    (title, preview)
}
