//! Loopback session hosting a webhook handler under test.
//!
//! A session owns one ephemeral HTTP listener for its whole lifetime. The
//! listener is acquired eagerly at construction and released only through
//! [`DialogflowBench::close`]; a session left open holds its bound port.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use reqwest::Client;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::bench_contract::WebhookRequest;
use crate::bench_exchange::IntentExchange;
use crate::bench_request::{build_webhook_request, IntentTriggerOptions};

/// Client-side deadline applied to every exchange. An exchange still in
/// flight past this point is abandoned and rejected.
const BENCH_EXCHANGE_DEADLINE_MS: u64 = 1_000;

/// Port used when the session config does not name one.
const BENCH_DEFAULT_PORT: u16 = 3000;

#[async_trait]
/// The system under test: receives a decoded webhook request and produces
/// the JSON body of the webhook response.
pub trait WebhookHandler: Send + Sync + 'static {
    async fn handle(&self, request: WebhookRequest) -> Result<Value>;
}

#[async_trait]
impl<F> WebhookHandler for F
where
    F: Fn(WebhookRequest) -> Value + Send + Sync + 'static,
{
    async fn handle(&self, request: WebhookRequest) -> Result<Value> {
        Ok(self(request))
    }
}

#[derive(Debug, Clone)]
/// Session configuration. Port 0 binds an ephemeral port; the resolved
/// address is available through [`DialogflowBench::local_addr`].
pub struct BenchConfig {
    pub port: u16,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            port: BENCH_DEFAULT_PORT,
        }
    }
}

struct BenchServerState {
    handler: Arc<dyn WebhookHandler>,
}

/// Test session owning the loopback listener for one webhook handler.
pub struct DialogflowBench {
    local_addr: SocketAddr,
    client: Client,
    shutdown: oneshot::Sender<()>,
    serve_handle: JoinHandle<()>,
}

impl DialogflowBench {
    /// Start a session on the default port.
    pub async fn start(handler: impl WebhookHandler) -> Result<Self> {
        Self::start_with_config(handler, BenchConfig::default()).await
    }

    /// Start a session, binding the listener immediately.
    pub async fn start_with_config(
        handler: impl WebhookHandler,
        config: BenchConfig,
    ) -> Result<Self> {
        let bind_addr = SocketAddr::from(([127, 0, 0, 1], config.port));
        let listener = TcpListener::bind(bind_addr)
            .await
            .with_context(|| format!("failed to bind webhook bench listener on {bind_addr}"))?;
        let local_addr = listener
            .local_addr()
            .context("failed to resolve bound webhook bench address")?;

        let state = Arc::new(BenchServerState {
            handler: Arc::new(handler),
        });
        let app = build_bench_router(state);
        let (shutdown, shutdown_rx) = oneshot::channel();
        let serve_handle = tokio::spawn(async move {
            let serve_result = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(error) = serve_result {
                warn!("webhook bench listener exited unexpectedly: {error}");
            }
        });

        let client = Client::builder()
            .timeout(Duration::from_millis(BENCH_EXCHANGE_DEADLINE_MS))
            .build()
            .context("failed to construct webhook bench client")?;

        debug!("webhook bench listening: addr={local_addr}");
        Ok(Self {
            local_addr,
            client,
            shutdown,
            serve_handle,
        })
    }

    /// Resolved address of the bound listener.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Prepare an exchange delivering a synthesized trigger for `intent_id`.
    ///
    /// Concurrent exchanges against the same session are independent.
    pub fn trigger_intent(
        &self,
        intent_id: &str,
        options: &IntentTriggerOptions,
    ) -> IntentExchange {
        let request = build_webhook_request(intent_id, options);
        IntentExchange::from_request(self.client.clone(), self.endpoint(), request)
    }

    /// Prepare an exchange delivering an arbitrary JSON body through the
    /// same pipeline, bypassing request synthesis.
    pub fn send_payload(&self, payload: Value) -> IntentExchange {
        IntentExchange::from_raw(self.client.clone(), self.endpoint(), payload)
    }

    /// Release the listener. Completes once the serve task has shut down;
    /// the port is immediately available for rebinding afterwards.
    pub async fn close(self) -> Result<()> {
        let _ = self.shutdown.send(());
        self.serve_handle
            .await
            .context("webhook bench listener task did not shut down cleanly")?;
        debug!("webhook bench closed: addr={}", self.local_addr);
        Ok(())
    }

    fn endpoint(&self) -> String {
        format!("http://{}/", self.local_addr)
    }
}

fn build_bench_router(state: Arc<BenchServerState>) -> Router {
    Router::new().route("/", any(dispatch_webhook)).with_state(state)
}

async fn dispatch_webhook(
    State(state): State<Arc<BenchServerState>>,
    body: Bytes,
) -> Response {
    let request: WebhookRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(error) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": {
                        "code": "bench_invalid_webhook_request",
                        "message": error.to_string(),
                    }
                })),
            )
                .into_response();
        }
    };

    debug!(
        "webhook bench dispatch: action={}",
        request.query_result.action
    );
    match state.handler.handle(request).await {
        Ok(response_body) => (StatusCode::OK, Json(response_body)).into_response(),
        Err(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": {
                    "code": "bench_handler_failed",
                    "message": error.to_string(),
                }
            })),
        )
            .into_response(),
    }
}
