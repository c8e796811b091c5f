//! Wire models for the agent-team task endpoint.

use serde::{Deserialize, Serialize};

/// Agent-routing recursion cap sent with every task.
pub const MAX_DEPTH: u32 = 150;

/// Name of the agent whose chunks carry routing decisions instead of output.
pub const SUPERVISOR: &str = "supervisor";

/// Request body posted to `/agentTask`.
///
/// `max_depth` and `stream` are fixed; build one with [`AgentTask::new`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentTask {
    /// Conversation messages, oldest first
    pub messages: Vec<String>,

    /// Recursion limit for agent routing
    pub max_depth: u32,

    /// Ask the backend for a streamed (NDJSON) response
    pub stream: bool,
}

impl AgentTask {
    /// Create a streaming task for the given messages.
    pub fn new(messages: Vec<String>) -> Self {
        Self {
            messages,
            max_depth: MAX_DEPTH,
            stream: true,
        }
    }
}

/// One progress update emitted by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AgentChunk {
    /// Agent that produced this chunk
    pub current_agent: String,

    /// Agent routed to next; only meaningful for supervisor chunks
    #[serde(default)]
    pub next_agent: String,

    /// Output text of the agent
    #[serde(default)]
    pub messages: String,
}

impl AgentChunk {
    /// Whether this chunk is a supervisor routing decision.
    pub fn is_supervisor(&self) -> bool {
        self.current_agent == SUPERVISOR
    }

    /// Human-readable transcript line for this chunk, newline included.
    pub fn transcript_line(&self) -> String {
        if self.is_supervisor() {
            format!("Routing to the next agent: {}\n", self.next_agent)
        } else {
            format!(
                "The response of {} is: {}\n",
                self.current_agent, self.messages
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_payload_shape() {
        let task = AgentTask::new(vec!["research rust".to_string()]);
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "messages": ["research rust"],
                "max_depth": 150,
                "stream": true
            })
        );
    }

    #[test]
    fn chunk_uses_camel_case() {
        let chunk: AgentChunk = serde_json::from_str(
            r#"{"currentAgent":"search","nextAgent":"supervisor","messages":"found it"}"#,
        )
        .unwrap();
        assert_eq!(chunk.current_agent, "search");
        assert_eq!(chunk.next_agent, "supervisor");
        assert_eq!(chunk.messages, "found it");
    }

    #[test]
    fn chunk_requires_current_agent() {
        let parsed = serde_json::from_str::<AgentChunk>(r#"{"nextAgent":"a","messages":""}"#);
        assert!(parsed.is_err());

        let chunk: AgentChunk = serde_json::from_str(r#"{"currentAgent":"writer"}"#).unwrap();
        assert_eq!(chunk.next_agent, "");
        assert_eq!(chunk.messages, "");
    }

    #[test]
    fn transcript_lines() {
        let output = AgentChunk {
            current_agent: "agentA".to_string(),
            next_agent: String::new(),
            messages: "hello".to_string(),
        };
        assert!(!output.is_supervisor());
        assert_eq!(output.transcript_line(), "The response of agentA is: hello\n");

        let routing = AgentChunk {
            current_agent: SUPERVISOR.to_string(),
            next_agent: "agentB".to_string(),
            messages: "Routing to next node: agentB".to_string(),
        };
        assert!(routing.is_supervisor());
        assert_eq!(routing.transcript_line(), "Routing to the next agent: agentB\n");
    }
}
