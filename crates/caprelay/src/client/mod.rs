//! Client session: typed access to a remote capability server.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::types::{
    ActionDescriptor, ArgMap, CallRequest, CallResult, CapabilityCounts, Error, HandshakeRequest,
    HandshakeResponse, Implementation, PromptDescriptor, PromptMessage, PromptPayload,
    ResourceDescriptor, Result, PROTOCOL_VERSION,
};

/// Default per-call deadline.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// One client connection to a capability server.
///
/// Methods take `&mut self`: a session is single-flight — one request awaits
/// its response before the next is issued. Remote failures surface the wire
/// `errorKind` and message verbatim; the client never retries on its own.
#[derive(Debug)]
pub struct ClientSession {
    http: reqwest::Client,
    base: String,
    call_timeout: Duration,
    server_info: Implementation,
    session_id: String,
    capabilities: CapabilityCounts,
}

impl ClientSession {
    /// Open a session against `base` (e.g. `http://127.0.0.1:8000`) with the
    /// default per-call deadline.
    pub async fn connect(base: &str) -> Result<Self> {
        Self::connect_with(base, DEFAULT_CALL_TIMEOUT).await
    }

    /// Open a session with an explicit per-call deadline.
    ///
    /// Performs the handshake; a handshake failure is fatal to the session.
    pub async fn connect_with(base: &str, call_timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::new();
        let base = base.trim_end_matches('/').to_string();

        let request = HandshakeRequest {
            protocol_version: PROTOCOL_VERSION.to_string(),
            client_info: Implementation {
                name: format!("{}-client", env!("CARGO_PKG_NAME")),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };
        let response = http
            .post(format!("{base}/handshake"))
            .timeout(call_timeout)
            .json(&request)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        if !response.status().is_success() {
            return Err(Error::transport(format!(
                "handshake failed with status {}",
                response.status()
            )));
        }
        let handshake: HandshakeResponse = response.json().await.map_err(map_reqwest_error)?;

        tracing::debug!(
            server = %handshake.server_info.name,
            session = %handshake.session_id,
            "session opened"
        );

        Ok(Self {
            http,
            base,
            call_timeout,
            server_info: handshake.server_info,
            session_id: handshake.session_id,
            capabilities: handshake.capabilities,
        })
    }

    /// Server identity captured at handshake time.
    pub fn server_info(&self) -> &Implementation {
        &self.server_info
    }

    /// Session identifier assigned by the server.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Capability counts advertised at handshake time.
    pub fn capabilities(&self) -> CapabilityCounts {
        self.capabilities
    }

    /// List registered action descriptors.
    pub async fn list_actions(&mut self) -> Result<Vec<ActionDescriptor>> {
        let value = self.roundtrip(&CallRequest::ListActions).await?;
        parse_listing(&value, "actions")
    }

    /// Invoke an action by name.
    pub async fn call_action(&mut self, id: &str, arguments: ArgMap) -> Result<Value> {
        self.roundtrip(&CallRequest::CallAction {
            id: id.to_string(),
            arguments,
        })
        .await
    }

    /// List registered resource templates.
    pub async fn list_resources(&mut self) -> Result<Vec<ResourceDescriptor>> {
        let value = self.roundtrip(&CallRequest::ListResources).await?;
        parse_listing(&value, "resources")
    }

    /// Read a resource by concrete URI.
    pub async fn read_resource(&mut self, uri: &str) -> Result<Value> {
        self.roundtrip(&CallRequest::ReadResource {
            uri: uri.to_string(),
        })
        .await
    }

    /// List registered prompt descriptors.
    pub async fn list_prompts(&mut self) -> Result<Vec<PromptDescriptor>> {
        let value = self.roundtrip(&CallRequest::ListPrompts).await?;
        parse_listing(&value, "prompts")
    }

    /// Expand a prompt into its message sequence.
    pub async fn get_prompt(&mut self, id: &str, arguments: ArgMap) -> Result<Vec<PromptMessage>> {
        let value = self
            .roundtrip(&CallRequest::GetPrompt {
                id: id.to_string(),
                arguments,
            })
            .await?;
        let payload: PromptPayload = serde_json::from_value(value)
            .map_err(|e| Error::transport(format!("malformed prompt payload: {e}")))?;
        Ok(payload.messages)
    }

    async fn roundtrip(&mut self, request: &CallRequest) -> Result<Value> {
        let response = self
            .http
            .post(format!("{}/rpc", self.base))
            .timeout(self.call_timeout)
            .json(request)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        if !response.status().is_success() {
            return Err(Error::transport(format!(
                "rpc failed with status {}",
                response.status()
            )));
        }
        let result: CallResult = response.json().await.map_err(map_reqwest_error)?;
        result.into_result()
    }
}

fn map_reqwest_error(error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::timeout(error.to_string())
    } else {
        Error::transport(error.to_string())
    }
}

fn parse_listing<T: DeserializeOwned>(value: &Value, key: &str) -> Result<Vec<T>> {
    let list = value.get(key).cloned().unwrap_or(Value::Array(Vec::new()));
    serde_json::from_value(list)
        .map_err(|e| Error::transport(format!("malformed {key} listing: {e}")))
}
