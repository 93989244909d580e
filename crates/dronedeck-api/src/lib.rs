//! HTTP transport layer for the dronedeck fleet dashboard.
//!
//! This crate owns everything network-shaped so that `dronedeck-core`
//! stays a pure in-process coordination layer:
//!
//! - **[`Transport`]** — the seam the core mutates through: one async
//!   `send(method, path, body)` call returning raw JSON or [`ApiError`].
//!   Test suites substitute scripted implementations here.
//! - **[`HttpTransport`]** — the production implementation backed by
//!   `reqwest`, with TLS-mode selection and API-key injection.
//! - **[`ApiError`]** — transport-level failure taxonomy with
//!   classification helpers (`is_transient()`, `status()`) that the core
//!   uses for retry decisions.

pub mod error;
pub mod transport;

pub use error::ApiError;
pub use transport::{HttpTransport, Method, TlsMode, Transport, TransportConfig};
