//! The bounded function-calling loop.

use std::time::Instant;

use serde_json::json;

use caprelay::client::ClientSession;

use crate::declarations::declare_actions;
use crate::genai::{Content, FunctionResponse, GenAiClient, Part};
use crate::BridgeError;

/// Default cap on model turns per run.
pub const DEFAULT_TURN_LIMIT: usize = 8;

/// Outcome of one conversation run.
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeOutcome {
    /// The model produced a final message with no further calls.
    Final { text: String, turns: usize },
    /// The turn limit was reached before a final message.
    TurnLimit { turns: usize },
}

/// Drives a model's function calls against one client session.
pub struct Bridge {
    model: GenAiClient,
    turn_limit: usize,
}

impl Bridge {
    pub fn new(model: GenAiClient) -> Self {
        Self {
            model,
            turn_limit: DEFAULT_TURN_LIMIT,
        }
    }

    pub fn with_turn_limit(mut self, limit: usize) -> Self {
        self.turn_limit = limit;
        self
    }

    /// Run one user message to completion.
    ///
    /// Each turn sends the conversation so far. Every call the model requests
    /// is dispatched through `session`; the result — or the error, including
    /// an unknown action — is fed back as a function response. The loop stops
    /// on a final message, the turn limit, or the deadline, whichever comes
    /// first.
    pub async fn run(
        &self,
        session: &mut ClientSession,
        user_message: &str,
        deadline: Option<Instant>,
    ) -> Result<BridgeOutcome, BridgeError> {
        let actions = session.list_actions().await?;
        let declarations = declare_actions(&actions);
        tracing::debug!(actions = declarations.len(), "declared actions to the model");

        let mut contents = vec![Content::user_text(user_message)];

        for turn in 1..=self.turn_limit {
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    return Err(BridgeError::DeadlineExceeded(turn - 1));
                }
            }

            let (parsed, raw) = self.model.generate(&contents, &declarations).await?;
            contents.push(raw);

            if parsed.is_final() {
                return Ok(BridgeOutcome::Final {
                    text: parsed.text.unwrap_or_default(),
                    turns: turn,
                });
            }

            let mut responses = Vec::new();
            for call in &parsed.calls {
                tracing::debug!(action = %call.name, "model requested call");
                let response = match session.call_action(&call.name, call.args.clone()).await {
                    Ok(value) => json!({ "result": value }),
                    Err(error) => json!({
                        "error": {
                            "kind": error.kind().as_str(),
                            "message": error.to_string(),
                        }
                    }),
                };
                responses.push(Part {
                    function_response: Some(FunctionResponse {
                        name: call.name.clone(),
                        response,
                    }),
                    ..Default::default()
                });
            }
            contents.push(Content::function_responses(responses));
        }

        tracing::warn!(limit = self.turn_limit, "turn limit reached without a final message");
        Ok(BridgeOutcome::TurnLimit {
            turns: self.turn_limit,
        })
    }
}
