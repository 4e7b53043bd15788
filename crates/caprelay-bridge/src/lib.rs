//! Function-calling bridge — lets a generative language model drive a
//! caprelay capability server.
//!
//! The bridge exports the server's action descriptors as function
//! declarations, forwards the model's chosen calls through a client session,
//! and feeds the results back into the conversation until the model settles
//! on a final answer.

pub mod declarations;
pub mod genai;
pub mod runner;

pub use genai::GenAiClient;
pub use runner::{Bridge, BridgeOutcome};

use thiserror::Error;

/// Failures raised by the bridge itself.
///
/// Capability-side errors are not raised here: a failed or unknown action is
/// fed back to the model as a function response through the normal channel.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The model API call failed.
    #[error("model api failure: {0}")]
    Model(String),
    /// The model API answered without any usable candidate.
    #[error("empty model response")]
    EmptyResponse,
    /// The deadline elapsed after the given number of completed turns.
    #[error("deadline exceeded after {0} turns")]
    DeadlineExceeded(usize),
    /// The capability session itself failed (handshake, listing, transport).
    #[error(transparent)]
    Protocol(#[from] caprelay::types::Error),
}
