//! Audio Stories backend layer
//!
//! Documents are addressed by collection and id and carry a write version
//! used for optimistic transactions. Two stores implement the contract: an
//! in-memory one and a SQLite one built on sqlx. Authentication sits behind
//! the `AuthService` trait, and `Backend` bundles both for the stores above.

pub mod auth;
pub mod backend;
pub mod connection;
pub mod document;
pub mod field_path;
pub mod flaky;
pub mod memory;
pub mod migrations;
pub mod sqlite;
pub mod transaction;

pub use auth::{uid_for_email, AuthService, MemoryAuthService};
pub use backend::{Backend, STORIES, USERS};
pub use connection::{connect, connect_in_memory, DatabaseConfig, DbPool};
pub use document::{Document, DocumentStore};
pub use flaky::FlakyDocumentStore;
pub use memory::MemoryDocumentStore;
pub use migrations::{current_version, run_migrations, verify_integrity};
pub use sqlite::SqliteDocumentStore;
pub use transaction::{run_transaction, DEFAULT_TRANSACTION_ATTEMPTS};
