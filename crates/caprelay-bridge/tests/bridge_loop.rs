//! Bridge loop tests: a scripted model against a real capability server.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{extract::State, Json, Router};
use serde_json::{json, Value};

use caprelay::dispatch::Dispatcher;
use caprelay::registry::Registry;
use caprelay::transport::HttpTransport;
use caprelay::types::{InputSchema, ParamType};
use caprelay::ClientSession;
use caprelay_bridge::genai::GenAiClient;
use caprelay_bridge::runner::{Bridge, BridgeOutcome};
use caprelay_bridge::BridgeError;

// ─── Helpers ───────────────────────────────────────────────────────────────

/// Scripted generateContent stand-in: answers from a queue and records every
/// request body it saw.
struct MockModel {
    responses: Mutex<VecDeque<Value>>,
    requests: Mutex<Vec<Value>>,
}

impl MockModel {
    fn scripted(responses: Vec<Value>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn request(&self, index: usize) -> Value {
        self.requests.lock().unwrap()[index].clone()
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

async fn handle_generate(
    State(model): State<Arc<MockModel>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    model.requests.lock().unwrap().push(body);
    let next = model
        .responses
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or(json!({ "candidates": [] }));
    Json(next)
}

async fn serve_mock_model(model: Arc<MockModel>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = Router::new().fallback(handle_generate).with_state(model);
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn function_call_response(name: &str, args: Value) -> Value {
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{ "functionCall": { "name": name, "args": args } }]
            }
        }]
    })
}

fn final_text_response(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] }
        }]
    })
}

/// Capability server with a counting `add` action.
async fn spawn_add_server() -> (String, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();
    let mut registry = Registry::new();
    registry
        .register_action(
            "add",
            InputSchema::new()
                .required("a", ParamType::Integer)
                .required("b", ParamType::Integer),
            "Add two integers",
            Box::new(move |args| {
                seen.fetch_add(1, Ordering::SeqCst);
                let a = args.get("a").and_then(Value::as_i64).unwrap_or(0);
                let b = args.get("b").and_then(Value::as_i64).unwrap_or(0);
                Ok(json!(a + b))
            }),
        )
        .unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = HttpTransport::new(Dispatcher::new(Arc::new(registry))).router();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (format!("http://{addr}"), calls)
}

fn bridge_for(model_base: &str) -> Bridge {
    Bridge::new(
        GenAiClient::new("test-key")
            .with_base(model_base)
            .with_model("test-model"),
    )
}

// ─── Tests ─────────────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn dispatches_once_and_feeds_back_the_result() {
    let (server_base, calls) = spawn_add_server().await;
    let model = MockModel::scripted(vec![
        function_call_response("add", json!({ "a": 2, "b": 3 })),
        final_text_response("The sum is 5."),
    ]);
    let model_base = serve_mock_model(model.clone()).await;

    let mut session = ClientSession::connect(&server_base).await.unwrap();
    let outcome = bridge_for(&model_base)
        .run(&mut session, "what is 2 plus 3", None)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        BridgeOutcome::Final {
            text: "The sum is 5.".to_string(),
            turns: 2
        }
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // The second model request carries the conversation: user message, the
    // model's call, and the fed-back result 5.
    let second = model.request(1);
    let contents = second["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 3);
    let feedback = &contents[2]["parts"][0]["functionResponse"];
    assert_eq!(feedback["name"], "add");
    assert_eq!(feedback["response"]["result"], 5);
}

#[tokio::test(flavor = "multi_thread")]
async fn declares_registered_actions_to_the_model() {
    let (server_base, _) = spawn_add_server().await;
    let model = MockModel::scripted(vec![final_text_response("nothing to do")]);
    let model_base = serve_mock_model(model.clone()).await;

    let mut session = ClientSession::connect(&server_base).await.unwrap();
    let outcome = bridge_for(&model_base)
        .run(&mut session, "just chat", None)
        .await
        .unwrap();

    assert!(matches!(outcome, BridgeOutcome::Final { turns: 1, .. }));
    let first = model.request(0);
    let declaration = &first["tools"][0]["functionDeclarations"][0];
    assert_eq!(declaration["name"], "add");
    assert_eq!(declaration["parameters"]["properties"]["a"]["type"], "integer");
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_action_flows_back_as_an_error_response() {
    let (server_base, calls) = spawn_add_server().await;
    let model = MockModel::scripted(vec![
        function_call_response("subtract", json!({ "a": 9, "b": 4 })),
        final_text_response("I cannot subtract here."),
    ]);
    let model_base = serve_mock_model(model.clone()).await;

    let mut session = ClientSession::connect(&server_base).await.unwrap();
    let outcome = bridge_for(&model_base)
        .run(&mut session, "subtract 4 from 9", None)
        .await
        .unwrap();

    assert!(matches!(outcome, BridgeOutcome::Final { .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let feedback = model.request(1)["contents"][2]["parts"][0]["functionResponse"].clone();
    assert_eq!(feedback["response"]["error"]["kind"], "unknown_action");
    assert_eq!(
        feedback["response"]["error"]["message"],
        "unknown action 'subtract'"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn several_calls_in_one_turn_are_all_dispatched() {
    let (server_base, calls) = spawn_add_server().await;
    let model = MockModel::scripted(vec![
        json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        { "functionCall": { "name": "add", "args": { "a": 1, "b": 2 } } },
                        { "functionCall": { "name": "add", "args": { "a": 3, "b": 4 } } }
                    ]
                }
            }]
        }),
        final_text_response("3 and 7."),
    ]);
    let model_base = serve_mock_model(model.clone()).await;

    let mut session = ClientSession::connect(&server_base).await.unwrap();
    let outcome = bridge_for(&model_base)
        .run(&mut session, "two sums please", None)
        .await
        .unwrap();

    assert!(matches!(outcome, BridgeOutcome::Final { turns: 2, .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let parts = model.request(1)["contents"][2]["parts"].clone();
    assert_eq!(parts.as_array().unwrap().len(), 2);
    assert_eq!(parts[0]["functionResponse"]["response"]["result"], 3);
    assert_eq!(parts[1]["functionResponse"]["response"]["result"], 7);
}

#[tokio::test(flavor = "multi_thread")]
async fn turn_limit_stops_a_model_that_never_finishes() {
    let (server_base, calls) = spawn_add_server().await;
    let model = MockModel::scripted(vec![
        function_call_response("add", json!({ "a": 1, "b": 1 })),
        function_call_response("add", json!({ "a": 2, "b": 2 })),
        function_call_response("add", json!({ "a": 3, "b": 3 })),
    ]);
    let model_base = serve_mock_model(model.clone()).await;

    let mut session = ClientSession::connect(&server_base).await.unwrap();
    let outcome = bridge_for(&model_base)
        .with_turn_limit(3)
        .run(&mut session, "keep adding", None)
        .await
        .unwrap();

    assert_eq!(outcome, BridgeOutcome::TurnLimit { turns: 3 });
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(model.request_count(), 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn an_elapsed_deadline_stops_the_loop_before_the_model_is_called() {
    let (server_base, _) = spawn_add_server().await;
    let model = MockModel::scripted(vec![final_text_response("never sent")]);
    let model_base = serve_mock_model(model.clone()).await;

    let mut session = ClientSession::connect(&server_base).await.unwrap();
    let deadline = Instant::now() - Duration::from_millis(1);
    let err = bridge_for(&model_base)
        .run(&mut session, "too late", Some(deadline))
        .await
        .unwrap_err();

    assert!(matches!(err, BridgeError::DeadlineExceeded(0)));
    assert_eq!(model.request_count(), 0);
}
