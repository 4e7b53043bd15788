//! Minimal client for the Generative Language `generateContent` endpoint.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::declarations::FunctionDeclaration;
use crate::BridgeError;

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";

/// One conversation entry sent to or received from the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// A user turn holding a single text part.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part {
                text: Some(text.into()),
                ..Default::default()
            }],
        }
    }

    /// A user turn holding function responses.
    pub fn function_responses(parts: Vec<Part>) -> Self {
        Self {
            role: "user".to_string(),
            parts,
        }
    }
}

/// A single content part: text, a requested call, or a fed-back response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, rename = "functionCall", skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    #[serde(
        default,
        rename = "functionResponse",
        skip_serializing_if = "Option::is_none"
    )]
    pub function_response: Option<FunctionResponse>,
}

/// A call the model asked for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: Map<String, Value>,
}

/// A dispatched call's result fed back to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub name: String,
    pub response: Value,
}

/// What one model turn produced.
#[derive(Debug, Clone)]
pub struct ModelTurn {
    /// Concatenated text parts, if any.
    pub text: Option<String>,
    /// Calls the model requested, in order.
    pub calls: Vec<FunctionCall>,
}

impl ModelTurn {
    /// A turn with no requested calls ends the loop.
    pub fn is_final(&self) -> bool {
        self.calls.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// REST client for the model-selection API.
pub struct GenAiClient {
    http: reqwest::Client,
    base: String,
    model: String,
    api_key: String,
}

impl GenAiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Point the client at a different endpoint (tests use a local mock).
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self.base = self.base.trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// One generateContent round trip.
    ///
    /// Returns the parsed turn plus the raw candidate content, which the
    /// caller appends to the conversation verbatim.
    pub async fn generate(
        &self,
        contents: &[Content],
        tools: &[FunctionDeclaration],
    ) -> Result<(ModelTurn, Content), BridgeError> {
        let mut body = json!({ "contents": contents });
        if !tools.is_empty() {
            let declarations: Vec<Value> = tools
                .iter()
                .map(|t| {
                    json!({
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.parameters_schema(),
                    })
                })
                .collect();
            body["tools"] = json!([{ "functionDeclarations": declarations }]);
        }

        let url = format!("{}/v1beta/models/{}:generateContent", self.base, self.model);
        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| BridgeError::Model(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(BridgeError::Model(format!(
                "status {status}: {}",
                detail.chars().take(200).collect::<String>()
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| BridgeError::Model(format!("malformed response: {e}")))?;
        let content = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .ok_or(BridgeError::EmptyResponse)?;

        let mut texts = Vec::new();
        let mut calls = Vec::new();
        for part in &content.parts {
            if let Some(text) = &part.text {
                texts.push(text.clone());
            }
            if let Some(call) = &part.function_call {
                calls.push(call.clone());
            }
        }
        let turn = ModelTurn {
            text: if texts.is_empty() {
                None
            } else {
                Some(texts.join(""))
            },
            calls,
        };
        Ok((turn, content))
    }
}
