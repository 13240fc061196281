//! Storage layer for session credentials.
//!
//! The backend authenticates requests with cookies. In a browser those live
//! in the cookie jar; here they live behind the [`CredentialStore`] trait so
//! a command-line session survives between runs.
//!
//! List and item data is never stored locally.
//!
//! # Modules
//!
//! - `backend`: Credential store trait
//! - `json`: JSON file implementation with atomic writes
//! - `memory`: Process-memory implementation
//! - `models`: Cookie records and `Set-Cookie` parsing

pub mod backend;
pub mod json;
pub mod memory;
pub mod models;

pub use backend::CredentialStore;
pub use json::JsonCredentialStore;
pub use memory::MemoryCredentialStore;
pub use models::CookieRecord;
