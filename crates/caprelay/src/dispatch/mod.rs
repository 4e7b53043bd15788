//! Request dispatch: the single entry point turning a call request into a
//! result.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::registry::Registry;
use crate::types::{CallRequest, Error, PromptPayload, Result};

/// Resolves call requests against a read-only registry.
///
/// The dispatcher holds no state between calls; every dispatch is
/// independent. Registration is expected to be complete before the first
/// call — the registry arrives already behind an `Arc`.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Execute one call request.
    ///
    /// Every failure is a typed error; handler failures are caught and
    /// wrapped, never propagated as a crash. List requests cannot fail.
    pub fn dispatch(&self, request: &CallRequest) -> Result<Value> {
        match request {
            CallRequest::ListActions => {
                Ok(json!({ "actions": self.registry.actions().collect::<Vec<_>>() }))
            }
            CallRequest::CallAction { id, arguments } => {
                let entry = self
                    .registry
                    .lookup_action(id)
                    .map_err(|_| Error::unknown_action(id))?;
                entry.descriptor.input_schema.validate(arguments)?;
                (entry.handler)(arguments).map_err(|e| {
                    tracing::debug!(action = %id, "handler failed: {e:#}");
                    Error::handler(format!("{e:#}"))
                })
            }
            CallRequest::ListResources => {
                Ok(json!({ "resources": self.registry.resources().collect::<Vec<_>>() }))
            }
            CallRequest::ReadResource { uri } => {
                let (entry, values) = self.registry.resolve_resource(uri)?;
                (entry.handler)(&values).map_err(|e| {
                    tracing::debug!(uri = %uri, "handler failed: {e:#}");
                    Error::handler(format!("{e:#}"))
                })
            }
            CallRequest::ListPrompts => {
                Ok(json!({ "prompts": self.registry.prompts().collect::<Vec<_>>() }))
            }
            CallRequest::GetPrompt { id, arguments } => {
                let entry = self.registry.lookup_prompt(id)?;
                entry.descriptor.arguments.validate(arguments)?;
                let output = (entry.handler)(arguments).map_err(|e| {
                    tracing::debug!(prompt = %id, "handler failed: {e:#}");
                    Error::handler(format!("{e:#}"))
                })?;
                let payload = PromptPayload {
                    messages: output.into_messages(),
                };
                serde_json::to_value(payload).map_err(|e| Error::handler(e.to_string()))
            }
        }
    }
}
