//! # Mel
//!
//! A permission-gated project tracking server, usable both as a standalone
//! binary and as a library.
//!
//! Every request is authenticated with HTTP Basic credentials, its path is
//! resolved into a resource carrying the caller's capabilities, and the verb
//! is checked against them before the operation runs. See [`dispatch`].
//!
//! ## Library Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mel::auth::PasswordHasher;
//! use mel::config::HashConfig;
//! use mel::server::{AppState, create_router};
//! use mel::store::{SqliteStore, Store};
//!
//! let store = SqliteStore::new("./data/mel.db")?;
//! store.initialize()?;
//!
//! let hasher = PasswordHasher::new(HashConfig::default())?;
//! let state = Arc::new(AppState::new(Arc::new(store), hasher));
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): includes the CLI module and builds the `mel` binary.
//!   Disable with `default-features = false`.

pub mod auth;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod resource;
pub mod server;
pub mod store;
pub mod types;
