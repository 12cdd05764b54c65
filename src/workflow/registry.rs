//! Agent and tool registries consulted by `agent` and `tool` nodes.
//!
//! Grounded in `agent_flow.models.agent.AgentRegistry` / `AgentDefinition` and
//! `agent_flow.models.tool.ToolRegistry` / `ToolDefinition`. Both registries
//! are process-wide shared state (see §5 of the spec), so they use
//! `tokio::sync::RwLock` the way [`crate::server::InMemoryTaskStore`] does —
//! concurrent reads, serialized writes.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{A2AError, A2AResult};

/// A connection an `agent` node can send text to and read a reply from.
///
/// Concrete bindings (LLM providers, remote A2A agents) are external
/// collaborators; the core only needs this contract. [`connect`] is
/// idempotent — callers check [`is_connected`] before calling it.
///
/// [`connect`]: WorkflowAgent::connect
/// [`is_connected`]: WorkflowAgent::is_connected
#[async_trait]
pub trait WorkflowAgent: Send + Sync {
    /// Whether the agent is ready to receive messages without reconnecting.
    fn is_connected(&self) -> bool {
        true
    }

    /// Establishes whatever connection the agent needs. The default
    /// implementation is a no-op for agents that are always connected.
    async fn connect(&self) -> A2AResult<()> {
        Ok(())
    }

    /// Sends `text` to the agent and returns its reply as JSON. A reply
    /// shaped like `{"content": ...}` or `{"text": ...}` is unwrapped by the
    /// caller (see [`super::executor`]'s agent-node handling), not here.
    async fn send_message(&self, text: &str) -> A2AResult<serde_json::Value>;
}

/// Registry of agents an `agent` node's `config.agent_id` resolves against.
#[derive(Clone)]
pub struct AgentRegistry {
    agents: Arc<RwLock<HashMap<String, Arc<dyn WorkflowAgent>>>>,
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self {
            agents: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn register(&self, agent_id: impl Into<String>, agent: Arc<dyn WorkflowAgent>) {
        self.agents.write().await.insert(agent_id.into(), agent);
    }

    pub async fn get(&self, agent_id: &str) -> A2AResult<Arc<dyn WorkflowAgent>> {
        self.agents.read().await.get(agent_id).cloned().ok_or_else(|| {
            A2AError::TaskNotFound {
                message: format!("agent '{agent_id}' not found in registry"),
                data: None,
            }
        })
    }

    pub async fn contains(&self, agent_id: &str) -> bool {
        self.agents.read().await.contains_key(agent_id)
    }
}

/// A callable a `tool` node invokes with merged parameters.
#[async_trait]
pub trait WorkflowTool: Send + Sync {
    /// Whether the tool can currently be invoked.
    async fn is_available(&self) -> bool {
        true
    }

    /// Invokes the tool with the merged parameter map and returns its result.
    async fn execute(
        &self,
        parameters: serde_json::Map<String, serde_json::Value>,
    ) -> A2AResult<serde_json::Value>;
}

/// Registry of tools a `tool` node's `config.tool_id` resolves against.
#[derive(Clone)]
pub struct ToolRegistry {
    tools: Arc<RwLock<HashMap<String, Arc<dyn WorkflowTool>>>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn register(&self, tool_id: impl Into<String>, tool: Arc<dyn WorkflowTool>) {
        self.tools.write().await.insert(tool_id.into(), tool);
    }

    pub async fn get(&self, tool_id: &str) -> A2AResult<Arc<dyn WorkflowTool>> {
        self.tools.read().await.get(tool_id).cloned().ok_or_else(|| A2AError::TaskNotFound {
            message: format!("tool '{tool_id}' not found in registry"),
            data: None,
        })
    }

    pub async fn contains(&self, tool_id: &str) -> bool {
        self.tools.read().await.contains_key(tool_id)
    }
}

/// Binds a [`WorkflowAgent`] to a remote A2A agent via [`crate::client::A2AClient`],
/// so `agent` nodes can compose real A2A peers into a workflow graph.
#[cfg(feature = "client")]
pub struct A2aClientAgent {
    client: crate::client::A2AClient,
}

#[cfg(feature = "client")]
impl A2aClientAgent {
    pub async fn connect_to(url: &str) -> A2AResult<Self> {
        let client = crate::client::A2AClient::from_url(url).await?;
        Ok(Self { client })
    }
}

#[cfg(feature = "client")]
#[async_trait]
impl WorkflowAgent for A2aClientAgent {
    async fn send_message(&self, text: &str) -> A2AResult<serde_json::Value> {
        let task = self.client.send_text(text).await?;
        let reply_text = task
            .artifacts
            .first()
            .and_then(|artifact| artifact.parts.first())
            .and_then(|part| part.text_value())
            .map(str::to_string);
        match reply_text {
            Some(text) => Ok(serde_json::Value::String(text)),
            None => Ok(serde_json::to_value(&task).unwrap_or(serde_json::Value::Null)),
        }
    }
}
