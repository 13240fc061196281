//! Session access layer.
//!
//! Mediates every call to the backend: bounded request time, cookie
//! credentials, one refresh-and-retry on 401, login redirection and
//! response decoding.
//!
//! # Modules
//!
//! - `transport`: Request/response types and the `Transport` seam
//! - `navigator`: Full-page navigation seam
//! - `context`: Shared session context
//! - `retry`: Retry-on-401 phases
//! - `auth`: Session check, refresh, login and logout
//! - `client`: Retrying client and typed REST endpoints

pub mod auth;
pub mod client;
pub mod context;
pub mod navigator;
pub mod retry;
pub mod transport;

pub use auth::AuthService;
pub use client::{decode, decode_empty, merge_headers, ApiClient, ApiRequest};
pub use context::SessionContext;
pub use navigator::{Navigator, RecordingNavigator, TerminalNavigator};
pub use retry::{RetryPhase, UnauthorizedStep};
pub use transport::{
    HttpMethod, HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError,
};
