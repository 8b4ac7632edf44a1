//! `unkey-http` is an async HTTP client for the Unkey key-management API.
//!
//! The crate wraps the `v1/<resource>.<action>` endpoints with ergonomic
//! methods on [`UnkeyClient`]:
//! - keys: create, verify, lookup, update, delete
//! - API namespaces, rate limits, identities, migrations
//!
//! Calls execute with bounded retries and a pluggable backoff strategy. The
//! [`gateway`] module adds a minimal axum surface proxying three routes to
//! the client.

mod client;
mod error;
mod options;
mod request;
mod telemetry;

pub mod config;
pub mod gateway;

pub use client::UnkeyClient;
pub use error::UnkeyError;
pub use options::{Backoff, ClientOptions};
pub use telemetry::{HostEnv, SystemEnv, Telemetry};

pub type Result<T> = std::result::Result<T, UnkeyError>;
