//! # Jotter
//!
//! A personal markdown notes server, usable both as a standalone binary and
//! as a library.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! jotter = { version = "0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::path::PathBuf;
//! use jotter::server::{AppState, create_router};
//! use jotter::store::{SqliteStore, Store};
//!
//! let store = SqliteStore::new(&PathBuf::from("./data/jotter.db")).unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState::new(Arc::new(store), PathBuf::from("./data")));
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes the CLI. Disable with `default-features = false`.

pub mod config;
pub mod error;
pub mod markdown;
pub mod server;
pub mod store;
pub mod types;
pub mod uploads;
