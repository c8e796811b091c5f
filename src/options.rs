//! Client configuration.

use std::collections::HashMap;
use std::time::Duration;

/// Default backend location.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Path of the task endpoint below the base URL.
pub const TASK_PATH: &str = "/agentTask";

/// How the response byte stream is cut into JSON objects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Framing {
    /// Every transport chunk holds exactly one JSON object.
    ///
    /// Trailing whitespace (the backend's `\n`) is accepted. A chunk holding
    /// half an object, or two objects, is a parse error.
    #[default]
    PerChunk,

    /// Newline-delimited JSON, buffered across chunks.
    Lines,
}

/// Options for [`AgentTaskClient`](crate::agent_task::AgentTaskClient).
///
/// # Example
/// ```rust
/// use agentstream::options::{ClientOptions, Framing};
/// use std::time::Duration;
///
/// let options = ClientOptions::default()
///     .with_base_url("http://10.0.0.5:8000".to_string())
///     .with_timeout(Duration::from_secs(300))
///     .with_framing(Framing::Lines);
///
/// assert_eq!(options.task_url(), "http://10.0.0.5:8000/agentTask");
/// ```
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base URL of the backend, without the endpoint path
    pub base_url: String,

    /// Request timeout; `None` leaves the request unbounded
    pub timeout: Option<Duration>,

    /// HTTP proxy URL
    pub proxy: Option<String>,

    /// Additional HTTP headers to include in requests
    pub extra_headers: Option<HashMap<String, String>>,

    /// Chunk framing for the response stream
    pub framing: Framing,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            proxy: None,
            extra_headers: None,
            framing: Framing::default(),
        }
    }
}

impl ClientOptions {
    /// Full URL of the task endpoint.
    pub fn task_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), TASK_PATH)
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the proxy URL.
    pub fn with_proxy(mut self, proxy: String) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Set extra headers.
    pub fn with_extra_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.extra_headers = Some(headers);
        self
    }

    /// Add a single extra header.
    pub fn with_header(mut self, key: String, value: String) -> Self {
        self.extra_headers
            .get_or_insert_with(HashMap::new)
            .insert(key, value);
        self
    }

    /// Set the chunk framing.
    pub fn with_framing(mut self, framing: Framing) -> Self {
        self.framing = framing;
        self
    }
}
