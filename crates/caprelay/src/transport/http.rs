//! HTTP transport — JSON envelopes over request/response framing.
//!
//! Routes: `POST /handshake` opens a session, `POST /rpc` carries one
//! request envelope per round trip, `GET /health` is a liveness probe.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::dispatch::Dispatcher;
use crate::types::{
    CallRequest, CallResult, Error, HandshakeRequest, HandshakeResponse, Implementation, Result,
    PROTOCOL_VERSION, SERVER_NAME, SERVER_VERSION,
};

/// Serves one dispatcher to any number of concurrent client sessions.
///
/// Each inbound request runs on its own task; within a session the client is
/// single-flight, so per-session ordering follows from request/response
/// framing alone.
pub struct HttpTransport {
    dispatcher: Arc<Dispatcher>,
}

impl HttpTransport {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Build the router; exposed separately so tests can serve it in-process.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/rpc", post(Self::handle_rpc))
            .route("/handshake", post(Self::handle_handshake))
            .route("/health", get(|| async { "ok" }))
            .layer(CorsLayer::permissive())
            .with_state(self.dispatcher.clone())
    }

    /// Bind `addr` and serve until the process stops.
    pub async fn run(&self, addr: &str) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::transport(format!("bind {addr}: {e}")))?;

        tracing::info!("http transport listening on {addr}");

        axum::serve(listener, self.router())
            .await
            .map_err(|e| Error::transport(e.to_string()))?;

        Ok(())
    }

    async fn handle_handshake(
        State(dispatcher): State<Arc<Dispatcher>>,
        Json(request): Json<HandshakeRequest>,
    ) -> Json<HandshakeResponse> {
        let session_id = uuid::Uuid::new_v4().to_string();

        if request.protocol_version != PROTOCOL_VERSION {
            tracing::warn!(
                "client requested protocol version {}, server speaks {}. Proceeding with server version.",
                request.protocol_version,
                PROTOCOL_VERSION
            );
        }
        tracing::info!(
            session = %session_id,
            client = %request.client_info.name,
            version = %request.client_info.version,
            "session opened"
        );

        Json(HandshakeResponse {
            protocol_version: PROTOCOL_VERSION.to_string(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
            session_id,
            capabilities: dispatcher.registry().counts(),
            opened_at: chrono::Utc::now(),
        })
    }

    async fn handle_rpc(
        State(dispatcher): State<Arc<Dispatcher>>,
        Json(request): Json<CallRequest>,
    ) -> Json<CallResult> {
        let request_id = uuid::Uuid::new_v4();
        let span = tracing::debug_span!("rpc", %request_id, kind = request.kind_name());
        let _guard = span.enter();

        let result = dispatcher.dispatch(&request);
        if let Err(error) = &result {
            tracing::debug!(kind = error.kind().as_str(), "dispatch failed: {error}");
        }
        Json(result.into())
    }
}
