//! Transport layer carrying call requests and results between processes.

pub mod http;

pub use http::HttpTransport;
