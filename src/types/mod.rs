mod models;

pub use models::{Attachment, History, Page};
