//! Client for the agent-team backend's `/agentTask` endpoint.
//!
//! The backend runs a supervisor graph over a team of agents and streams its
//! progress back as NDJSON, one [`AgentChunk`](crate::model::AgentChunk) per
//! agent step.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use std::sync::Arc;

use crate::client::{ByteStream, ClientError, Result, TaskStreaming};
use crate::http::{add_extra_headers, build_http_client};
use crate::log::{ErrorLog, TracingLog};
use crate::model::AgentTask;
use crate::options::{ClientOptions, Framing};

/// Agent-team client using HTTP transport.
pub struct AgentTaskClient {
    options: ClientOptions,
    http: reqwest::Client,
    log: Arc<dyn ErrorLog>,
}

impl AgentTaskClient {
    /// Create a client; errors are logged through [`TracingLog`].
    pub fn new(options: ClientOptions) -> Result<Self> {
        let http = build_http_client(&options)?;
        Ok(Self {
            options,
            http,
            log: Arc::new(TracingLog),
        })
    }

    /// Client for a backend on `http://localhost:8000`.
    pub fn local() -> Result<Self> {
        Self::new(ClientOptions::default())
    }

    /// Replace the error logger.
    pub fn with_log(mut self, log: Arc<dyn ErrorLog>) -> Self {
        self.log = log;
        self
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    async fn send(&self, messages: Vec<String>) -> Result<ByteStream> {
        if messages.is_empty() {
            return Err(ClientError::Config(
                "at least one message is required".to_string(),
            ));
        }

        let url = self.options.task_url();
        let task = AgentTask::new(messages);
        tracing::debug!(%url, messages = task.messages.len(), "sending agent task");

        let mut req = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json");
        req = add_extra_headers(req, &self.options.extra_headers);

        let response = req.json(&task).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        if response.content_length() == Some(0) {
            return Err(ClientError::BodyUnreadable);
        }

        Ok(response.bytes_stream().boxed())
    }
}

#[async_trait]
impl TaskStreaming for AgentTaskClient {
    async fn open_stream(&self, messages: Vec<String>) -> Result<ByteStream> {
        self.send(messages)
            .await
            .inspect_err(|e| self.log.error("opening stream", e))
    }

    fn framing(&self) -> Framing {
        self.options.framing
    }

    fn log(&self) -> &dyn ErrorLog {
        self.log.as_ref()
    }
}
