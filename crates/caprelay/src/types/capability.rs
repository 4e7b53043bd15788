//! Capability descriptors, prompt messages, and handshake types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::schema::InputSchema;

/// Protocol version this crate implements.
pub const PROTOCOL_VERSION: &str = "0.1";

/// Server name constant.
pub const SERVER_NAME: &str = env!("CARGO_PKG_NAME");

/// Server version constant.
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Descriptor for one registered action, as listed to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionDescriptor {
    /// Action name (unique within the registry).
    pub name: String,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Parameters the action accepts.
    #[serde(rename = "inputSchema")]
    pub input_schema: InputSchema,
}

/// Descriptor for one registered resource template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    /// URI or URI template, e.g. `user://{user_id}`.
    #[serde(rename = "uriTemplate")]
    pub uri_template: String,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Placeholder names in template order; empty for a concrete URI.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<String>,
}

/// Descriptor for one registered prompt template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDescriptor {
    /// Prompt name (unique within the registry).
    pub name: String,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Arguments the prompt accepts.
    #[serde(default)]
    pub arguments: InputSchema,
}

/// Role tag on a prompt message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// One message in an expanded prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

impl PromptMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// What a prompt handler may return.
#[derive(Debug, Clone)]
pub enum PromptOutput {
    /// A single text block.
    Text(String),
    /// An ordered sequence of role-tagged messages.
    Messages(Vec<PromptMessage>),
}

impl PromptOutput {
    /// Normalize into the message-sequence wire shape; a single text block
    /// becomes one user-role message.
    pub fn into_messages(self) -> Vec<PromptMessage> {
        match self {
            PromptOutput::Text(text) => vec![PromptMessage::user(text)],
            PromptOutput::Messages(messages) => messages,
        }
    }
}

/// Payload of a successful get-prompt call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptPayload {
    pub messages: Vec<PromptMessage>,
}

/// Implementation info exchanged during the handshake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Implementation {
    /// Name of the implementation.
    pub name: String,
    /// Version string.
    pub version: String,
}

/// How many capabilities of each kind a server exposes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CapabilityCounts {
    pub actions: usize,
    pub resources: usize,
    pub prompts: usize,
}

/// Handshake request sent by a connecting client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandshakeRequest {
    /// Requested protocol version.
    pub protocol_version: String,
    /// Client implementation info.
    pub client_info: Implementation,
}

/// Handshake response establishing a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandshakeResponse {
    /// Protocol version the server speaks.
    pub protocol_version: String,
    /// Server implementation info.
    pub server_info: Implementation,
    /// Identifier assigned to this session.
    pub session_id: String,
    /// Capability counts at session open.
    pub capabilities: CapabilityCounts,
    /// Server-side timestamp of the session open.
    pub opened_at: DateTime<Utc>,
}
