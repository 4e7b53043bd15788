//! Input schemas: ordered, named, typed parameters validated before dispatch.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{Error, Result};

/// Argument mapping attached to call-action and get-prompt requests.
pub type ArgMap = serde_json::Map<String, Value>;

/// Value shape a parameter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl ParamType {
    /// Whether `value` has this shape.
    pub fn admits(&self, value: &Value) -> bool {
        match self {
            ParamType::String => value.is_string(),
            ParamType::Integer => value.is_i64() || value.is_u64(),
            ParamType::Number => value.is_number(),
            ParamType::Boolean => value.is_boolean(),
            ParamType::Array => value.is_array(),
            ParamType::Object => value.is_object(),
        }
    }

    /// The lowercase type name, identical to its serde form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
            ParamType::Array => "array",
            ParamType::Object => "object",
        }
    }
}

/// One named, typed parameter with required/optional marking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParamType,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Ordered parameter set for an action or prompt.
///
/// Declaration order is preserved and is the order descriptors list
/// parameters in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputSchema {
    params: Vec<ParamSpec>,
}

impl InputSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a required parameter.
    pub fn required(mut self, name: &str, param_type: ParamType) -> Self {
        self.params.push(ParamSpec {
            name: name.to_string(),
            param_type,
            required: true,
            description: None,
        });
        self
    }

    /// Append an optional parameter.
    pub fn optional(mut self, name: &str, param_type: ParamType) -> Self {
        self.params.push(ParamSpec {
            name: name.to_string(),
            param_type,
            required: false,
            description: None,
        });
        self
    }

    /// Attach a description to the most recently appended parameter.
    pub fn described(mut self, text: &str) -> Self {
        if let Some(last) = self.params.last_mut() {
            last.description = Some(text.to_string());
        }
        self
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Validate an argument mapping against this schema.
    ///
    /// Missing required parameters, wrong value shapes, and undeclared names
    /// all fail; the error message lists every violation found.
    pub fn validate(&self, args: &ArgMap) -> Result<()> {
        let mut problems = Vec::new();

        for spec in &self.params {
            match args.get(&spec.name) {
                None if spec.required => {
                    problems.push(format!("missing required parameter '{}'", spec.name));
                }
                None => {}
                Some(value) if !spec.param_type.admits(value) => {
                    problems.push(format!(
                        "parameter '{}' expects {}",
                        spec.name,
                        spec.param_type.as_str()
                    ));
                }
                Some(_) => {}
            }
        }

        for name in args.keys() {
            if !self.params.iter().any(|p| &p.name == name) {
                problems.push(format!("undeclared parameter '{name}'"));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(Error::invalid_arguments(problems.join("; ")))
        }
    }
}
