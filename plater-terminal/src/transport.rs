/// Fire-and-forget delivery of export payloads over HTTP
///
/// `submit` returns as soon as the request is queued. The result shows up
/// later on [`ExportClient::poll_outcome`] and in the log; nothing is retried
/// and the session never sees it.
use std::time::Duration;

use plater_core::{CoreError, ExportPayload};
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to start transport runtime: {0}")]
    Runtime(#[from] std::io::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("failed to encode payload: {0}")]
    Payload(#[from] CoreError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    Delivered { status: u16 },
    Failed { reason: String },
}

pub struct ExportClient {
    runtime: Runtime,
    client: reqwest::Client,
    endpoint: String,
    outcomes_tx: UnboundedSender<ExportOutcome>,
    outcomes_rx: UnboundedReceiver<ExportOutcome>,
}

impl ExportClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(endpoint, client)
    }

    pub fn with_client(
        endpoint: impl Into<String>,
        client: reqwest::Client,
    ) -> Result<Self, TransportError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("plater-export")
            .enable_all()
            .build()?;
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();

        Ok(Self {
            runtime,
            client,
            endpoint: endpoint.into(),
            outcomes_tx,
            outcomes_rx,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST the payload as JSON without waiting for the response.
    ///
    /// Only encoding fails here; delivery errors arrive as outcomes.
    pub fn submit(&self, payload: &ExportPayload) -> Result<(), TransportError> {
        let request = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(payload.to_json()?);
        let endpoint = self.endpoint.clone();
        let triangles = payload.triangles.len();
        let outcomes = self.outcomes_tx.clone();

        debug!(%endpoint, triangles, "queueing export");
        self.runtime.spawn(async move {
            let outcome = match request.send().await.and_then(|r| r.error_for_status()) {
                Ok(response) => {
                    let status = response.status().as_u16();
                    info!(%endpoint, status, triangles, "export delivered");
                    ExportOutcome::Delivered { status }
                }
                Err(err) => {
                    error!(%endpoint, error = %err, "export failed");
                    ExportOutcome::Failed {
                        reason: err.to_string(),
                    }
                }
            };
            // The UI may already be gone
            let _ = outcomes.send(outcome);
        });
        Ok(())
    }

    /// Next finished delivery, if any
    pub fn poll_outcome(&mut self) -> Option<ExportOutcome> {
        self.outcomes_rx.try_recv().ok()
    }
}
