//! Wire envelopes: the request and result shapes carried over the transport.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{Error, ErrorKind, Result};
use super::schema::ArgMap;

/// A single protocol request: `{kind, id?, uri?, arguments?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum CallRequest {
    /// List registered action descriptors.
    ListActions,
    /// Invoke an action by name.
    CallAction {
        id: String,
        #[serde(default)]
        arguments: ArgMap,
    },
    /// List registered resource templates.
    ListResources,
    /// Read a resource by concrete URI.
    ReadResource { uri: String },
    /// List registered prompt descriptors.
    ListPrompts,
    /// Expand a prompt by name.
    GetPrompt {
        id: String,
        #[serde(default)]
        arguments: ArgMap,
    },
}

impl CallRequest {
    /// The wire `kind` tag, for logging.
    pub fn kind_name(&self) -> &'static str {
        match self {
            CallRequest::ListActions => "list-actions",
            CallRequest::CallAction { .. } => "call-action",
            CallRequest::ListResources => "list-resources",
            CallRequest::ReadResource { .. } => "read-resource",
            CallRequest::ListPrompts => "list-prompts",
            CallRequest::GetPrompt { .. } => "get-prompt",
        }
    }
}

/// Success envelope: `{"ok": true, "result": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessEnvelope {
    pub ok: bool,
    pub result: Value,
}

/// Failure envelope: `{"ok": false, "errorKind": ..., "message": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureEnvelope {
    pub ok: bool,
    #[serde(rename = "errorKind")]
    pub error_kind: ErrorKind,
    pub message: String,
}

/// Either wire shape of a call result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CallResult {
    Success(SuccessEnvelope),
    Failure(FailureEnvelope),
}

impl CallResult {
    pub fn success(result: Value) -> Self {
        CallResult::Success(SuccessEnvelope { ok: true, result })
    }

    pub fn failure(error: &Error) -> Self {
        CallResult::Failure(FailureEnvelope {
            ok: false,
            error_kind: error.kind(),
            message: error.to_string(),
        })
    }

    /// Collapse back into a dispatch result (client side).
    pub fn into_result(self) -> Result<Value> {
        match self {
            CallResult::Success(s) => Ok(s.result),
            CallResult::Failure(f) => Err(Error::from_wire(f.error_kind, f.message)),
        }
    }
}

impl From<Result<Value>> for CallResult {
    fn from(result: Result<Value>) -> Self {
        match result {
            Ok(value) => CallResult::success(value),
            Err(error) => CallResult::failure(&error),
        }
    }
}
