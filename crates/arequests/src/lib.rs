//! arequests: requests-style async HTTP on top of reqwest
//!
//! A thin layer that gives `reqwest` the ergonomics of Python's `requests`:
//! module-level [`get`]/[`post`]/[`request`] functions, a [`Session`] carrying
//! default headers and query parameters, and a buffered [`Response`] with
//! `status_code()`, `text()` and `json()`.
//!
//! # Architecture
//!
//! - `Session`: owns one `reqwest::Client`, merges its defaults into each call
//! - `RequestOptions`: per-call headers, params, body, timeout, auth
//! - `Response`: status, headers and the fully read body
//!
//! Connection reuse, TLS, redirects and cookies are all left to `reqwest`.

pub mod api;
pub mod config;
mod encoding;
pub mod error;
pub mod options;
pub mod response;
pub mod session;

pub use api::{delete, get, get_with, head, options, patch, post, put, request};
pub use config::SessionConfig;
pub use error::{Error, ErrorCategory, Result};
pub use options::{Auth, Body, RequestOptions};
pub use response::{Response, ResponseBuilder};
pub use session::Session;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
