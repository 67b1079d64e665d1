mod attachments;
mod pages;
pub mod response;
mod router;
pub mod templates;

pub use router::{AppState, create_router};
