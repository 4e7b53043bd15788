//! Capability relay — expose actions, resources, and prompt templates to
//! remote callers over an HTTP request/response channel.
//!
//! A server builds a [`Registry`], registers its capabilities, and serves it
//! through [`HttpTransport`]; a client opens a [`ClientSession`] and issues
//! list/call/read/get requests against it.

pub mod client;
pub mod config;
pub mod dispatch;
pub mod registry;
pub mod sample;
pub mod transport;
pub mod types;
pub mod uri;

pub use client::ClientSession;
pub use dispatch::Dispatcher;
pub use registry::Registry;
pub use transport::HttpTransport;
