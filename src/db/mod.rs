//! Credential storage for the accounts server.
//!
//! `CredentialStore` is the only seam the authentication service sees;
//! Postgres backs it in production and a hash map backs it in tests.

pub mod models;
pub mod postgres;
pub mod store;

pub use models::{PublicUser, UserRecord, DEFAULT_ROLE};
pub use postgres::PgCredentialStore;
pub use store::{CredentialStore, MemoryCredentialStore};
