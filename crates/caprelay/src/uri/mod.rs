//! URI template parsing and resolution.
//!
//! A template looks like `weather://{city}/{date}`: a scheme followed by
//! `/`-separated segments, each either a literal or a `{named}` placeholder.
//! Matching is segment-aligned — equal scheme, equal segment count, literals
//! compare exactly, and a placeholder binds the aligned URI segment. There is
//! no cross-segment wildcard matching.

use std::collections::HashMap;

use crate::types::{Error, Result};

/// Parameter values extracted from a matched URI.
pub type ParamValues = HashMap<String, String>;

/// One path segment of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A parsed URI template such as `user://{user_id}`.
#[derive(Debug, Clone)]
pub struct UriTemplate {
    raw: String,
    scheme: String,
    segments: Vec<Segment>,
}

impl UriTemplate {
    /// Parse a template string.
    ///
    /// Fails on a missing scheme, malformed or empty placeholders, and
    /// duplicate parameter names.
    pub fn parse(raw: &str) -> Result<Self> {
        let (scheme, rest) = raw
            .split_once("://")
            .ok_or_else(|| Error::invalid_arguments(format!("uri template '{raw}' has no scheme")))?;
        if scheme.is_empty() {
            return Err(Error::invalid_arguments(format!(
                "uri template '{raw}' has an empty scheme"
            )));
        }

        let mut segments = Vec::new();
        let mut names: Vec<&str> = Vec::new();
        for part in rest.split('/') {
            if let Some(inner) = part.strip_prefix('{') {
                let name = inner.strip_suffix('}').ok_or_else(|| {
                    Error::invalid_arguments(format!(
                        "uri template '{raw}' has an unterminated placeholder '{part}'"
                    ))
                })?;
                if name.is_empty()
                    || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                {
                    return Err(Error::invalid_arguments(format!(
                        "uri template '{raw}' has an invalid placeholder name '{name}'"
                    )));
                }
                if names.contains(&name) {
                    return Err(Error::invalid_arguments(format!(
                        "uri template '{raw}' repeats placeholder '{name}'"
                    )));
                }
                names.push(name);
                segments.push(Segment::Param(name.to_string()));
            } else if part.contains('{') || part.contains('}') {
                return Err(Error::invalid_arguments(format!(
                    "uri template '{raw}' mixes braces into literal segment '{part}'"
                )));
            } else {
                segments.push(Segment::Literal(part.to_string()));
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            scheme: scheme.to_string(),
            segments,
        })
    }

    /// The template string as registered.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Placeholder names in template order.
    pub fn param_names(&self) -> Vec<String> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Param(name) => Some(name.clone()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Literal segments before the first placeholder; higher is more specific.
    pub fn specificity(&self) -> usize {
        self.segments
            .iter()
            .take_while(|s| matches!(s, Segment::Literal(_)))
            .count()
    }

    /// Try to match a concrete URI, binding placeholder values.
    ///
    /// A placeholder never binds an empty segment.
    pub fn match_uri(&self, uri: &str) -> Option<ParamValues> {
        let (scheme, rest) = uri.split_once("://")?;
        if scheme != self.scheme {
            return None;
        }
        let parts: Vec<&str> = rest.split('/').collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut values = ParamValues::new();
        for (segment, part) in self.segments.iter().zip(&parts) {
            match segment {
                Segment::Literal(lit) => {
                    if lit != part {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if part.is_empty() {
                        return None;
                    }
                    values.insert(name.clone(), (*part).to_string());
                }
            }
        }
        Some(values)
    }
}

/// Resolve `uri` against `templates`, in registration order.
///
/// Returns the winning template's index and the bound parameters. When
/// several templates match, the most specific wins; a remaining tie goes to
/// the earliest registered.
pub fn resolve<'a, I>(templates: I, uri: &str) -> Result<(usize, ParamValues)>
where
    I: IntoIterator<Item = &'a UriTemplate>,
{
    let mut best: Option<(usize, usize, ParamValues)> = None;
    for (index, template) in templates.into_iter().enumerate() {
        if let Some(values) = template.match_uri(uri) {
            let specificity = template.specificity();
            let better = match &best {
                None => true,
                Some((best_specificity, _, _)) => specificity > *best_specificity,
            };
            if better {
                best = Some((specificity, index, values));
            }
        }
    }
    match best {
        Some((_, index, values)) => Ok((index, values)),
        None => Err(Error::resource_not_found(uri)),
    }
}
