//! Example: direct capability calls against a running server.
//!
//! Demonstrates the client API without any language model in the loop: the
//! caller names each action, resource, and prompt explicitly.
//!
//! Usage:
//!   cargo run --bin caprelay            # in one terminal
//!   cargo run --example direct_client   # in another

use caprelay::types::ArgMap;
use caprelay::ClientSession;
use serde_json::json;

fn args(value: serde_json::Value) -> ArgMap {
    match value {
        serde_json::Value::Object(map) => map,
        _ => unreachable!("argument literals are objects"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let base = std::env::var("CAPRELAY_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".into());
    let mut session = ClientSession::connect(&base).await?;
    println!(
        "Connected to {} v{} (session {})\n",
        session.server_info().name,
        session.server_info().version,
        session.session_id()
    );

    // 1. Actions
    println!("== Actions ==");
    for action in session.list_actions().await? {
        println!("  {} — {}", action.name, action.description.unwrap_or_default());
    }
    let greeting = session
        .call_action("greet", args(json!({"name": "caprelay"})))
        .await?;
    println!("  greet -> {greeting}");
    let sum = session
        .call_action("add", args(json!({"a": 5, "b": 7})))
        .await?;
    println!("  add -> {sum}\n");

    // 2. Resources
    println!("== Resources ==");
    for resource in session.list_resources().await? {
        println!("  {}", resource.uri_template);
    }
    let config = session.read_resource("config://app").await?;
    println!("  config://app -> {config}");
    let user = session.read_resource("user://u001").await?;
    println!("  user://u001 -> {user}\n");

    // 3. Prompts
    println!("== Prompts ==");
    for prompt in session.list_prompts().await? {
        println!("  {} — {}", prompt.name, prompt.description.unwrap_or_default());
    }
    let messages = session
        .get_prompt("explain_topic", args(json!({"topic": "URI templates"})))
        .await?;
    for message in messages {
        println!("  [{:?}] {}", message.role, message.content);
    }

    Ok(())
}
