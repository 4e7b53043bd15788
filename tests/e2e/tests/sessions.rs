//! End-to-end session behavior: many clients against one sample server.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::Barrier;

use caprelay::dispatch::Dispatcher;
use caprelay::sample;
use caprelay::transport::HttpTransport;
use caprelay::types::ArgMap;
use caprelay::ClientSession;

// ─── Helpers ───────────────────────────────────────────────────────────────

async fn spawn_sample_server() -> String {
    let registry = sample::sample_registry().expect("sample catalog registers cleanly");
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = HttpTransport::new(Dispatcher::new(Arc::new(registry))).router();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn args(value: serde_json::Value) -> ArgMap {
    match value {
        serde_json::Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn every_capability_kind_is_reachable() {
    let base = spawn_sample_server().await;
    let mut session = ClientSession::connect(&base).await.unwrap();

    let actions = session.list_actions().await.unwrap();
    let resources = session.list_resources().await.unwrap();
    let prompts = session.list_prompts().await.unwrap();
    assert_eq!(actions.len(), 3);
    assert_eq!(resources.len(), 5);
    assert_eq!(prompts.len(), 4);

    // Registration order is the listing order.
    assert_eq!(resources[0].uri_template, "config://app");
    assert_eq!(resources[2].uri_template, "user://{user_id}");
    assert_eq!(resources[2].parameters, vec!["user_id"]);

    let sum = session
        .call_action("add", args(json!({"a": 5, "b": 7})))
        .await
        .unwrap();
    assert_eq!(sum, json!(12));

    let found = session
        .call_action("search_users", args(json!({"department": "engineering"})))
        .await
        .unwrap();
    assert_eq!(found.as_array().unwrap().len(), 2);

    let config = session.read_resource("config://app").await.unwrap();
    assert_eq!(config["app_name"], "caprelay sample");

    let users = session.read_resource("data://users").await.unwrap();
    assert_eq!(users.as_array().unwrap().len(), 3);

    let status = session.read_resource("status://server").await.unwrap();
    assert_eq!(status["status"], "running");

    let messages = session
        .get_prompt(
            "code_review",
            args(json!({
                "language": "rust",
                "code": "fn add(a: i64, b: i64) -> i64 { a + b }",
                "focus": "readability"
            })),
        )
        .await
        .unwrap();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].content.contains("readability"));

    let report = session
        .get_prompt(
            "generate_report",
            args(json!({
                "title": "Quarterly",
                "sections": ["intro", "numbers"],
            })),
        )
        .await
        .unwrap();
    assert!(report[0].content.contains("- intro"));
    assert!(report[0].content.contains("short summary"));
}

#[tokio::test(flavor = "multi_thread")]
async fn reading_the_same_uri_twice_gives_the_same_binding() {
    let base = spawn_sample_server().await;
    let mut session = ClientSession::connect(&base).await.unwrap();

    let first = session.read_resource("user://u002").await.unwrap();
    let second = session.read_resource("user://u002").await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first["name"], "Bruno Costa");
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_sessions_do_not_interfere() {
    let base = spawn_sample_server().await;
    let barrier = Arc::new(Barrier::new(8));

    let mut workers = Vec::new();
    for n in 0..8_i64 {
        let base = base.clone();
        let barrier = barrier.clone();
        workers.push(tokio::spawn(async move {
            let mut session = ClientSession::connect(&base).await.unwrap();
            barrier.wait().await;
            for i in 0..5_i64 {
                let sum = session
                    .call_action("add", args(json!({"a": n, "b": i})))
                    .await
                    .unwrap();
                assert_eq!(sum, json!(n + i));
            }
            session.session_id().to_string()
        }));
    }

    let mut ids = Vec::new();
    for worker in workers {
        ids.push(worker.await.unwrap());
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 8, "every session got its own id");
}

#[tokio::test(flavor = "multi_thread")]
async fn a_failed_call_leaves_the_session_usable() {
    let base = spawn_sample_server().await;
    let mut session = ClientSession::connect(&base).await.unwrap();

    assert!(session.call_action("missing", ArgMap::new()).await.is_err());
    assert!(session.read_resource("user://u999").await.is_err());

    // The same session keeps working after failures.
    let greeting = session
        .call_action("greet", args(json!({"name": "Ford"})))
        .await
        .unwrap();
    assert_eq!(greeting, json!("Hello, Ford!"));
}
