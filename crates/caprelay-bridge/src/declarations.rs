//! Export of action descriptors as model-facing function declarations.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use caprelay::types::ActionDescriptor;

/// One parameter of a declared function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclaredParam {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    pub required: bool,
}

/// A function the model may select: `{name, description, parameters}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Vec<DeclaredParam>,
}

impl FunctionDeclaration {
    pub fn from_action(descriptor: &ActionDescriptor) -> Self {
        Self {
            name: descriptor.name.clone(),
            description: descriptor.description.clone().unwrap_or_default(),
            parameters: descriptor
                .input_schema
                .params()
                .iter()
                .map(|p| DeclaredParam {
                    name: p.name.clone(),
                    param_type: p.param_type.as_str().to_string(),
                    required: p.required,
                })
                .collect(),
        }
    }

    /// The JSON Schema object shape the generateContent API expects.
    pub fn parameters_schema(&self) -> Value {
        let mut properties = serde_json::Map::new();
        for param in &self.parameters {
            properties.insert(param.name.clone(), json!({ "type": param.param_type }));
        }
        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// Declare every listed action.
pub fn declare_actions(actions: &[ActionDescriptor]) -> Vec<FunctionDeclaration> {
    actions.iter().map(FunctionDeclaration::from_action).collect()
}
