//! Account storage for the bookfinder service.
//!
//! The [`CredentialStore`](user::store::CredentialStore) trait is the only
//! contract the web layer relies on. Two backends implement it: PostgreSQL
//! through Diesel ([`DbConnection`](db::connection::DbConnection)) and an
//! in-memory map ([`MemoryStore`](user::store::MemoryStore)).
//!
//! # Usage
//!
//! ```rust,no_run
//! use bf_models::{db::connection::DbConnection, user::store::CredentialStore};
//!
//! let db = DbConnection::new("postgres://localhost/bookfinder")
//!     .unwrap()
//!     .setup()
//!     .unwrap();
//!
//! let users = db.list().unwrap();
//! println!("Found {} users", users.len());
//! ```

pub mod db;
pub mod error;
pub mod prelude;
mod schema;
pub mod user;
