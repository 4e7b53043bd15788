//! Sample capability catalog served by the default binary.
//!
//! Collaborator code: it only registers capabilities against a registry and
//! has no special access to the protocol layer. Useful as a demo server and
//! as a fixture for end-to-end tests.

use anyhow::Context;
use serde_json::{json, Map, Value};

use crate::registry::Registry;
use crate::types::{ArgMap, InputSchema, ParamType, PromptMessage, PromptOutput, Result};
use crate::uri::ParamValues;

/// Build a registry populated with the full sample catalog.
pub fn sample_registry() -> Result<Registry> {
    let mut registry = Registry::new();
    register_sample_capabilities(&mut registry)?;
    Ok(registry)
}

/// Register the sample actions, resources, and prompts.
pub fn register_sample_capabilities(registry: &mut Registry) -> Result<()> {
    register_actions(registry)?;
    register_resources(registry)?;
    register_prompts(registry)?;
    Ok(())
}

fn register_actions(registry: &mut Registry) -> Result<()> {
    registry.register_action(
        "greet",
        InputSchema::new()
            .required("name", ParamType::String)
            .described("Name to greet"),
        "Return a simple greeting",
        Box::new(|args| {
            let name = str_arg(args, "name")?;
            Ok(json!(format!("Hello, {name}!")))
        }),
    )?;

    registry.register_action(
        "add",
        InputSchema::new()
            .required("a", ParamType::Integer)
            .required("b", ParamType::Integer),
        "Add two integers",
        Box::new(|args| {
            let a = int_arg(args, "a")?;
            let b = int_arg(args, "b")?;
            Ok(json!(a + b))
        }),
    )?;

    registry.register_action(
        "search_users",
        InputSchema::new()
            .required("department", ParamType::String)
            .described("Department to filter by, e.g. \"engineering\""),
        "Find users belonging to a department",
        Box::new(|args| {
            let department = str_arg(args, "department")?;
            let matches: Vec<Value> = users()
                .into_iter()
                .filter(|u| u["department"] == department)
                .collect();
            Ok(Value::Array(matches))
        }),
    )?;

    Ok(())
}

fn register_resources(registry: &mut Registry) -> Result<()> {
    registry.register_resource(
        "config://app",
        "Application settings",
        Box::new(|_| {
            Ok(json!({
                "app_name": "caprelay sample",
                "version": env!("CARGO_PKG_VERSION"),
                "debug": false,
            }))
        }),
    )?;

    registry.register_resource(
        "data://users",
        "All registered users",
        Box::new(|_| Ok(Value::Array(users()))),
    )?;

    registry.register_resource(
        "user://{user_id}",
        "A single user looked up by id",
        Box::new(|params| {
            let user_id = param(params, "user_id")?;
            users()
                .into_iter()
                .find(|u| u["id"] == user_id.as_str())
                .with_context(|| format!("user {user_id} not found"))
        }),
    )?;

    registry.register_resource(
        "weather://{city}/{date}",
        "Forecast for a city on a given date (YYYY-MM-DD)",
        Box::new(|params| {
            let city = param(params, "city")?;
            let date = param(params, "date")?;
            let parsed = chrono::NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .with_context(|| format!("invalid date '{date}', expected YYYY-MM-DD"))?;
            Ok(json!({
                "city": city,
                "date": parsed.to_string(),
                "temperature_c": 15,
                "condition": "clear",
                "humidity": 45,
            }))
        }),
    )?;

    registry.register_resource(
        "status://server",
        "Server status snapshot",
        Box::new(|_| {
            Ok(json!({
                "status": "running",
                "time": chrono::Utc::now().to_rfc3339(),
            }))
        }),
    )?;

    Ok(())
}

fn register_prompts(registry: &mut Registry) -> Result<()> {
    registry.register_prompt(
        "explain_topic",
        InputSchema::new()
            .required("topic", ParamType::String)
            .described("Topic to explain"),
        "Ask for a beginner-friendly explanation of a topic",
        Box::new(|args| {
            let topic = str_arg(args, "topic")?;
            Ok(PromptOutput::Text(format!(
                "Explain \"{topic}\" in terms a newcomer can follow. \
                 Include one concrete example."
            )))
        }),
    )?;

    registry.register_prompt(
        "code_review",
        InputSchema::new()
            .required("language", ParamType::String)
            .required("code", ParamType::String)
            .optional("focus", ParamType::String)
            .described("Review angle; defaults to overall quality"),
        "Ask for a review of a code snippet",
        Box::new(|args| {
            let language = str_arg(args, "language")?;
            let code = str_arg(args, "code")?;
            let focus = opt_str_arg(args, "focus").unwrap_or("overall quality");
            Ok(PromptOutput::Text(format!(
                "Review the following {language} code.\n\n\
                 Pay particular attention to {focus}.\n\n\
                 ```{language}\n{code}\n```\n"
            )))
        }),
    )?;

    registry.register_prompt(
        "roleplay_teacher",
        InputSchema::new()
            .required("subject", ParamType::String)
            .described("Subject the teacher specializes in"),
        "Set up a teacher persona as conversation history",
        Box::new(|args| {
            let subject = str_arg(args, "subject")?;
            Ok(PromptOutput::Messages(vec![
                PromptMessage::user(format!(
                    "You are an excellent {subject} teacher. \
                     Answer your student's questions patiently."
                )),
                PromptMessage::assistant(format!(
                    "Understood. As a {subject} teacher, ask me anything."
                )),
            ]))
        }),
    )?;

    registry.register_prompt(
        "generate_report",
        InputSchema::new()
            .required("title", ParamType::String)
            .required("sections", ParamType::Array)
            .described("Section headings to include")
            .optional("include_summary", ParamType::Boolean),
        "Ask for a report with the given structure",
        Box::new(|args| {
            let title = str_arg(args, "title")?;
            let sections: Vec<String> = args
                .get("sections")
                .and_then(Value::as_array)
                .context("missing array argument 'sections'")?
                .iter()
                .filter_map(Value::as_str)
                .map(|s| format!("- {s}"))
                .collect();
            let include_summary = args
                .get("include_summary")
                .and_then(Value::as_bool)
                .unwrap_or(true);
            let summary_line = if include_summary {
                "\nFinish with a short summary."
            } else {
                ""
            };
            Ok(PromptOutput::Text(format!(
                "Write a report titled \"{title}\" with these sections:\n{}\n{summary_line}",
                sections.join("\n")
            )))
        }),
    )?;

    Ok(())
}

// Shared demo data, used by both the search action and the user resources.
fn users() -> Vec<Value> {
    vec![
        json!({
            "id": "u001",
            "name": "Alice Moreau",
            "department": "engineering",
            "skills": ["rust", "protocols"],
        }),
        json!({
            "id": "u002",
            "name": "Bruno Costa",
            "department": "sales",
            "skills": ["negotiation", "spreadsheets"],
        }),
        json!({
            "id": "u003",
            "name": "Chen Wei",
            "department": "engineering",
            "skills": ["typescript", "react"],
        }),
    ]
}

// Argument accessors; callers run after schema validation.
fn str_arg<'a>(args: &'a ArgMap, name: &str) -> anyhow::Result<&'a str> {
    args.get(name)
        .and_then(Value::as_str)
        .with_context(|| format!("missing string argument '{name}'"))
}

fn opt_str_arg<'a>(args: &'a ArgMap, name: &str) -> Option<&'a str> {
    args.get(name).and_then(Value::as_str)
}

fn int_arg(args: &Map<String, Value>, name: &str) -> anyhow::Result<i64> {
    args.get(name)
        .and_then(Value::as_i64)
        .with_context(|| format!("missing integer argument '{name}'"))
}

fn param(params: &ParamValues, name: &str) -> anyhow::Result<String> {
    params
        .get(name)
        .cloned()
        .with_context(|| format!("missing template parameter '{name}'"))
}
