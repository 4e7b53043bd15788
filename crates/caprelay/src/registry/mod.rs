//! The owning store of registered capabilities for one server instance.
//!
//! There is no global registry: a `Registry` is built explicitly, populated
//! before any session opens, and handed to the server. Registration order is
//! preserved — it drives listing order and the resource tie-break.

use std::collections::HashMap;

use serde_json::Value;

use crate::types::{
    ActionDescriptor, ArgMap, CapabilityCounts, CapabilityKind, Error, InputSchema,
    PromptDescriptor, PromptOutput, ResourceDescriptor, Result,
};
use crate::uri::{self, ParamValues, UriTemplate};

/// Synchronous handler bound to an action.
pub type ActionHandler = Box<dyn Fn(&ArgMap) -> anyhow::Result<Value> + Send + Sync>;

/// Handler bound to a resource template; receives the extracted parameters.
pub type ResourceHandler = Box<dyn Fn(&ParamValues) -> anyhow::Result<Value> + Send + Sync>;

/// Handler bound to a prompt template.
pub type PromptHandler = Box<dyn Fn(&ArgMap) -> anyhow::Result<PromptOutput> + Send + Sync>;

/// A registered action: descriptor plus bound handler.
pub struct ActionEntry {
    pub descriptor: ActionDescriptor,
    pub handler: ActionHandler,
}

/// A registered resource template.
pub struct ResourceEntry {
    pub descriptor: ResourceDescriptor,
    pub template: UriTemplate,
    pub handler: ResourceHandler,
}

/// A registered prompt template.
pub struct PromptEntry {
    pub descriptor: PromptDescriptor,
    pub handler: PromptHandler,
}

/// Registry of every capability one server exposes.
#[derive(Default)]
pub struct Registry {
    actions: Vec<ActionEntry>,
    action_index: HashMap<String, usize>,
    resources: Vec<ResourceEntry>,
    resource_index: HashMap<String, usize>,
    prompts: Vec<PromptEntry>,
    prompt_index: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an invocable action.
    ///
    /// Fails with a duplicate-identifier error if `name` is already taken;
    /// the registry is unchanged on failure. An empty description is stored
    /// as none.
    pub fn register_action(
        &mut self,
        name: &str,
        schema: InputSchema,
        description: &str,
        handler: ActionHandler,
    ) -> Result<()> {
        if self.action_index.contains_key(name) {
            return Err(Error::duplicate_identifier(CapabilityKind::Action, name));
        }
        let descriptor = ActionDescriptor {
            name: name.to_string(),
            description: non_empty(description),
            input_schema: schema,
        };
        self.action_index.insert(name.to_string(), self.actions.len());
        self.actions.push(ActionEntry { descriptor, handler });
        Ok(())
    }

    /// Register a resource under a URI or URI template.
    ///
    /// The parameter schema is derived from the template: every placeholder
    /// is a required string parameter.
    pub fn register_resource(
        &mut self,
        uri_template: &str,
        description: &str,
        handler: ResourceHandler,
    ) -> Result<()> {
        let template = UriTemplate::parse(uri_template)?;
        if self.resource_index.contains_key(template.raw()) {
            return Err(Error::duplicate_identifier(
                CapabilityKind::Resource,
                uri_template,
            ));
        }
        let descriptor = ResourceDescriptor {
            uri_template: template.raw().to_string(),
            description: non_empty(description),
            parameters: template.param_names(),
        };
        self.resource_index
            .insert(template.raw().to_string(), self.resources.len());
        self.resources.push(ResourceEntry {
            descriptor,
            template,
            handler,
        });
        Ok(())
    }

    /// Register a prompt template.
    pub fn register_prompt(
        &mut self,
        name: &str,
        schema: InputSchema,
        description: &str,
        handler: PromptHandler,
    ) -> Result<()> {
        if self.prompt_index.contains_key(name) {
            return Err(Error::duplicate_identifier(CapabilityKind::Prompt, name));
        }
        let descriptor = PromptDescriptor {
            name: name.to_string(),
            description: non_empty(description),
            arguments: schema,
        };
        self.prompt_index.insert(name.to_string(), self.prompts.len());
        self.prompts.push(PromptEntry { descriptor, handler });
        Ok(())
    }

    /// Look up an action by name.
    pub fn lookup_action(&self, name: &str) -> Result<&ActionEntry> {
        self.action_index
            .get(name)
            .map(|&i| &self.actions[i])
            .ok_or_else(|| Error::not_found(CapabilityKind::Action, name))
    }

    /// Look up a prompt by name.
    pub fn lookup_prompt(&self, name: &str) -> Result<&PromptEntry> {
        self.prompt_index
            .get(name)
            .map(|&i| &self.prompts[i])
            .ok_or_else(|| Error::not_found(CapabilityKind::Prompt, name))
    }

    /// Resolve a concrete URI against the registered templates.
    pub fn resolve_resource(&self, uri: &str) -> Result<(&ResourceEntry, ParamValues)> {
        let (index, values) = uri::resolve(self.resources.iter().map(|e| &e.template), uri)?;
        Ok((&self.resources[index], values))
    }

    /// Action descriptors in registration order.
    pub fn actions(&self) -> impl Iterator<Item = &ActionDescriptor> + '_ {
        self.actions.iter().map(|e| &e.descriptor)
    }

    /// Resource descriptors in registration order.
    pub fn resources(&self) -> impl Iterator<Item = &ResourceDescriptor> + '_ {
        self.resources.iter().map(|e| &e.descriptor)
    }

    /// Prompt descriptors in registration order.
    pub fn prompts(&self) -> impl Iterator<Item = &PromptDescriptor> + '_ {
        self.prompts.iter().map(|e| &e.descriptor)
    }

    /// Capability counts, as advertised in the handshake.
    pub fn counts(&self) -> CapabilityCounts {
        CapabilityCounts {
            actions: self.actions.len(),
            resources: self.resources.len(),
            prompts: self.prompts.len(),
        }
    }
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
