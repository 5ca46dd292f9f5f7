//! Authentication module for the accounts server
//!
//! Registration, password login and bearer token issuance.

pub mod handlers;
mod password;
mod service;
pub mod token;

pub use password::{hash_password, verify_password, DEFAULT_COST};
pub use service::{AuthService, Session};
pub use token::{parse_ttl, Claims, TokenIssuer};
