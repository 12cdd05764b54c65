//! The workflow scheduler: per-run state, the ready-queue step executor, and
//! the [`WorkflowExecutor`] registry that tracks many runs by id.
//!
//! Grounded in `agent_flow.engine.executor.{WorkflowExecution, NodeExecution,
//! MessageValue, ExecutionStatus, NodeExecutionStatus}`. The Python original
//! exposes a single blocking `execute_all`; this port keeps that (as
//! [`WorkflowRun::execute_all`]) and additionally exposes
//! [`WorkflowRun::execute_step`] plus the registry's
//! [`WorkflowExecutor::continue_execution`] so a host can cooperatively
//! interleave many runs instead of blocking a task per workflow.

use std::collections::{HashMap, HashSet, VecDeque};

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{A2AError, A2AResult};
use crate::workflow::condition::{self, ConditionType};
use crate::workflow::model::{EdgeType, NodeType, Workflow, WorkflowEdge, WorkflowNode};
use crate::workflow::registry::{AgentRegistry, ToolRegistry};
use crate::workflow::transform::{self, TransformType};

/// Default safety budget for a single run — see spec §4.F "Termination".
pub const DEFAULT_MAX_STEPS: usize = 1000;

/// Status of an entire workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Canceled,
}

/// Status of a single node within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeExecutionStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Skipped,
}

/// A value flowing along an edge between nodes — the workflow engine's
/// internal payload, distinct from the protocol's [`crate::types::Message`].
#[derive(Debug, Clone)]
pub struct WorkflowValue {
    pub content: Value,
    pub content_type: String,
    pub metadata: Map<String, Value>,
    pub timestamp: DateTime<Utc>,
    pub source_node_id: Option<String>,
}

impl WorkflowValue {
    pub fn new(content: Value, content_type: impl Into<String>) -> Self {
        Self {
            content,
            content_type: content_type.into(),
            metadata: Map::new(),
            timestamp: Utc::now(),
            source_node_id: None,
        }
    }

    pub fn from_source(content: Value, content_type: impl Into<String>, source_node_id: &str) -> Self {
        let mut v = Self::new(content, content_type);
        v.source_node_id = Some(source_node_id.to_string());
        v
    }

    pub fn with_metadata(mut self, key: &str, value: Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    /// Projects the content to text the way the source's `MessageValue.__str__` does.
    pub fn as_text(&self) -> String {
        transform::value_as_text(&self.content)
    }

    fn infer_content_type(value: &Value) -> &'static str {
        if value.is_string() {
            "text"
        } else {
            "json"
        }
    }
}

/// Per-node execution state for one run.
#[derive(Debug, Clone)]
pub struct NodeExecution {
    pub node_id: String,
    /// Inputs received so far, keyed by the edge id that delivered them.
    /// Kept as an ordered vec (not a map) so "use the first available
    /// input" matches the source's insertion-ordered dict behavior exactly.
    pub input_values: Vec<(String, WorkflowValue)>,
    pub output_value: Option<WorkflowValue>,
    pub status: NodeExecutionStatus,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
}

impl NodeExecution {
    fn new(node_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            input_values: Vec::new(),
            output_value: None,
            status: NodeExecutionStatus::Pending,
            start_time: None,
            end_time: None,
            error_message: None,
        }
    }

    fn first_input(&self) -> Option<&WorkflowValue> {
        self.input_values.first().map(|(_, v)| v)
    }

    fn put(&mut self, edge_id: impl Into<String>, value: WorkflowValue) {
        self.input_values.push((edge_id.into(), value));
    }
}

/// State for one execution of a [`Workflow`] against an agent and tool
/// registry — the unit the spec calls "workflow execution".
pub struct WorkflowRun {
    pub id: Uuid,
    pub workflow: Workflow,
    pub status: ExecutionStatus,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    pub results: Map<String, Value>,
    pub max_steps: usize,
    steps_taken: usize,
    node_executions: HashMap<String, NodeExecution>,
    execution_queue: VecDeque<String>,
    completed_nodes: HashSet<String>,
    input_data: Map<String, Value>,
    agent_registry: AgentRegistry,
    tool_registry: ToolRegistry,
}

impl WorkflowRun {
    /// Validates `workflow` and prepares a fresh, not-yet-started run.
    pub fn new(
        workflow: Workflow,
        agent_registry: AgentRegistry,
        tool_registry: ToolRegistry,
        input_data: Map<String, Value>,
    ) -> Result<Self, crate::workflow::model::WorkflowValidationError> {
        workflow.validate()?;
        let node_executions = workflow
            .nodes
            .keys()
            .map(|id| (id.clone(), NodeExecution::new(id)))
            .collect();
        Ok(Self {
            id: Uuid::new_v4(),
            workflow,
            status: ExecutionStatus::Pending,
            start_time: None,
            end_time: None,
            error_message: None,
            results: Map::new(),
            max_steps: DEFAULT_MAX_STEPS,
            steps_taken: 0,
            node_executions,
            execution_queue: VecDeque::new(),
            completed_nodes: HashSet::new(),
            input_data,
            agent_registry,
            tool_registry,
        })
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Seeds the ready queue with the graph's start nodes and marks the run
    /// running. Returns `false` (and sets `Failed`) if there is no start
    /// node — `validate` already rejects this, so this only re-triggers in
    /// the pathological case the graph was mutated after construction.
    pub fn start(&mut self) -> bool {
        self.status = ExecutionStatus::Running;
        self.start_time = Some(Utc::now());
        self.completed_nodes.clear();
        self.results.clear();

        let start_nodes: Vec<String> = self
            .workflow
            .start_nodes()
            .iter()
            .map(|n| n.id.clone())
            .collect();

        if start_nodes.is_empty() {
            self.status = ExecutionStatus::Failed;
            self.error_message = Some("Workflow has no start nodes".to_string());
            return false;
        }

        self.execution_queue = start_nodes.iter().cloned().collect();

        if !self.input_data.is_empty() {
            let payload = Value::Object(self.input_data.clone());
            for node_id in &start_nodes {
                if let Some(execution) = self.node_executions.get_mut(node_id) {
                    execution.put("input", WorkflowValue::new(payload.clone(), "json"));
                }
            }
        }

        info!(run_id = %self.id, "started workflow execution");
        true
    }

    /// Executes one ready-queue step. Returns `Ok(true)` if a step ran or
    /// was deferred, `Ok(false)` once the run has reached a terminal state.
    pub async fn execute_step(&mut self) -> A2AResult<bool> {
        if self.status != ExecutionStatus::Running {
            return Ok(false);
        }

        let Some(node_id) = self.execution_queue.pop_front() else {
            if self.completed_nodes.len() == self.workflow.nodes.len() {
                self.finish_successfully();
            }
            return Ok(false);
        };

        let Some(node) = self.workflow.nodes.get(&node_id).cloned() else {
            warn!(%node_id, "node not found in workflow, skipping");
            return Ok(false);
        };

        if matches!(
            self.node_executions[&node_id].status,
            NodeExecutionStatus::Completed | NodeExecutionStatus::Failed
        ) {
            return Ok(true);
        }

        let required = self.required_inputs(&node);
        let available: HashSet<&str> = self.node_executions[&node_id]
            .input_values
            .iter()
            .map(|(id, _)| id.as_str())
            .collect();
        if !required.iter().all(|id| available.contains(id.as_str())) {
            self.execution_queue.push_back(node_id);
            return Ok(true);
        }

        {
            let execution = self.node_executions.get_mut(&node_id).unwrap();
            execution.status = NodeExecutionStatus::Running;
            execution.start_time = Some(Utc::now());
        }

        debug!(node = %node.name, %node_id, node_type = ?node.node_type, "executing node");

        let outcome = self.run_node(&node).await;

        match outcome {
            Ok(output) => {
                let execution = self.node_executions.get_mut(&node_id).unwrap();
                execution.output_value = Some(output.clone());
                execution.status = NodeExecutionStatus::Completed;
                execution.end_time = Some(Utc::now());
                self.completed_nodes.insert(node_id.clone());

                if node.node_type == NodeType::Output {
                    let output_key = node
                        .config
                        .get("output_key")
                        .and_then(|v| v.as_str())
                        .unwrap_or("output");
                    self.results.insert(output_key.to_string(), output.content.clone());
                }

                self.route_downstream(&node, &output);
                info!(node = %node.name, %node_id, "node completed");
                Ok(true)
            }
            Err(err) => {
                let message = err.to_string();
                {
                    let execution = self.node_executions.get_mut(&node_id).unwrap();
                    execution.status = NodeExecutionStatus::Failed;
                    execution.end_time = Some(Utc::now());
                    execution.error_message = Some(message.clone());
                }
                warn!(node = %node.name, %node_id, error = %message, "node failed");
                self.route_error(&node, &message)
            }
        }
    }

    /// Advances at most `budget` steps, or until the run leaves `Running`.
    /// Returns whether the run is still active (for cooperative interleaving
    /// via [`WorkflowExecutor::continue_execution`]).
    pub async fn continue_execution(&mut self, budget: usize) -> A2AResult<bool> {
        if self.status == ExecutionStatus::Pending {
            self.start();
        }
        for _ in 0..budget {
            if self.status != ExecutionStatus::Running {
                break;
            }
            self.steps_taken += 1;
            if self.steps_taken > self.max_steps {
                self.status = ExecutionStatus::Failed;
                self.error_message = Some("Exceeded maximum execution steps".to_string());
                self.end_time = Some(Utc::now());
                return Err(A2AError::max_steps_exceeded(format!(
                    "workflow '{}' exceeded its step budget of {}",
                    self.workflow.name, self.max_steps
                )));
            }
            if !self.execute_step().await? {
                break;
            }
        }
        Ok(self.status == ExecutionStatus::Running)
    }

    /// Drives the run to completion in one call, mirroring the source's
    /// blocking `execute_all`.
    pub async fn execute_all(&mut self) -> A2AResult<Map<String, Value>> {
        if self.status == ExecutionStatus::Pending {
            self.start();
        }
        loop {
            match self.continue_execution(self.max_steps.saturating_sub(self.steps_taken).max(1)).await {
                Ok(true) => continue,
                Ok(false) => break,
                Err(err) => return Err(err),
            }
        }
        Ok(self.results.clone())
    }

    pub fn cancel(&mut self) {
        if self.status == ExecutionStatus::Running {
            self.status = ExecutionStatus::Canceled;
            self.end_time = Some(Utc::now());
            info!(run_id = %self.id, "workflow execution canceled");
        }
    }

    /// Snapshot of every node's current status, for a caller polling a run
    /// that was advanced via [`WorkflowExecutor::continue_execution`].
    pub fn node_status(&self) -> HashMap<String, NodeExecutionStatus> {
        self.node_executions
            .iter()
            .map(|(id, execution)| (id.clone(), execution.status))
            .collect()
    }

    fn finish_successfully(&mut self) {
        self.status = ExecutionStatus::Completed;
        self.end_time = Some(Utc::now());
        for execution in self.node_executions.values_mut() {
            if execution.status == NodeExecutionStatus::Pending {
                execution.status = NodeExecutionStatus::Skipped;
            }
        }
        info!(run_id = %self.id, steps = self.steps_taken, "workflow execution completed");
    }

    fn required_inputs(&self, node: &WorkflowNode) -> HashSet<String> {
        let all: HashSet<String> = node.incoming_edges.iter().cloned().collect();
        if node.node_type == NodeType::Conditional {
            if let Some(required) = node.config.get("required_inputs").and_then(|v| v.as_array()) {
                if !required.is_empty() {
                    return required
                        .iter()
                        .filter_map(|v| v.as_str())
                        .filter(|id| all.contains(*id))
                        .map(str::to_string)
                        .collect();
                }
            }
        }
        all
    }

    fn route_downstream(&mut self, node: &WorkflowNode, output: &WorkflowValue) {
        for edge_id in &node.outgoing_edges {
            let Some(edge) = self.workflow.edges.get(edge_id).cloned() else {
                continue;
            };
            if !self.should_follow_edge(&edge, Some(output)) {
                continue;
            }
            self.deliver(&edge, output.clone());
        }
    }

    fn route_error(&mut self, node: &WorkflowNode, error_message: &str) -> A2AResult<bool> {
        let error_edges: Vec<WorkflowEdge> = node
            .outgoing_edges
            .iter()
            .filter_map(|id| self.workflow.edges.get(id).cloned())
            .filter(|edge| edge.edge_type == EdgeType::Error)
            .collect();

        if error_edges.is_empty() {
            self.status = ExecutionStatus::Failed;
            self.error_message = Some(format!("Node {} failed: {}", node.name, error_message));
            self.end_time = Some(Utc::now());
            return Ok(false);
        }

        let error_value = WorkflowValue::from_source(Value::String(error_message.to_string()), "text", &node.id)
            .with_metadata("error", Value::Bool(true));
        for edge in &error_edges {
            self.deliver(edge, error_value.clone());
        }
        Ok(true)
    }

    fn deliver(&mut self, edge: &WorkflowEdge, value: WorkflowValue) {
        if !self.completed_nodes.contains(&edge.target_node_id)
            && !self.execution_queue.contains(&edge.target_node_id)
        {
            self.execution_queue.push_back(edge.target_node_id.clone());
        }
        if let Some(target) = self.node_executions.get_mut(&edge.target_node_id) {
            target.put(edge.id.clone(), value);
        }
    }

    fn should_follow_edge(&self, edge: &WorkflowEdge, output: Option<&WorkflowValue>) -> bool {
        match edge.edge_type {
            EdgeType::Data | EdgeType::Success => true,
            EdgeType::Error => false,
            EdgeType::ConditionTrue | EdgeType::ConditionFalse => {
                let Some(output) = output else { return false };
                let condition_type =
                    ConditionType::parse(edge.config.get("type").and_then(|v| v.as_str()).unwrap_or("contains"));
                let target = edge.config.get("target").and_then(|v| v.as_str()).unwrap_or("");
                let result = condition::evaluate(condition_type, &output.as_text(), target);
                if edge.edge_type == EdgeType::ConditionTrue {
                    result
                } else {
                    !result
                }
            }
        }
    }

    async fn run_node(&self, node: &WorkflowNode) -> A2AResult<WorkflowValue> {
        match node.node_type {
            NodeType::Input => self.run_input_node(node),
            NodeType::Output => self.run_output_node(node),
            NodeType::Agent => self.run_agent_node(node).await,
            NodeType::Tool => self.run_tool_node(node).await,
            NodeType::Conditional => self.run_conditional_node(node),
            NodeType::Transform => self.run_transform_node(node),
        }
    }

    fn run_input_node(&self, node: &WorkflowNode) -> A2AResult<WorkflowValue> {
        let input_key = node.config.get("input_key").and_then(|v| v.as_str());
        let value = input_key
            .and_then(|key| self.input_data.get(key).cloned())
            .or_else(|| self.node_executions[&node.id].first_input().map(|v| v.content.clone()))
            .or_else(|| node.config.get("default_value").cloned())
            .unwrap_or(Value::Null);

        let content_type = WorkflowValue::infer_content_type(&value);
        Ok(WorkflowValue::from_source(value, content_type, &node.id))
    }

    fn run_output_node(&self, node: &WorkflowNode) -> A2AResult<WorkflowValue> {
        let input = self.node_executions[&node.id].first_input().ok_or_else(|| {
            A2AError::InternalError {
                message: format!("no input available for output node '{}'", node.name),
                data: None,
            }
        })?;
        Ok(input.clone())
    }

    async fn run_agent_node(&self, node: &WorkflowNode) -> A2AResult<WorkflowValue> {
        let agent_id = node
            .config
            .get("agent_id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| A2AError::InvalidParams {
                message: format!("agent node '{}' is missing agent_id configuration", node.name),
                data: None,
            })?;
        let agent = self.agent_registry.get(agent_id).await?;
        if !agent.is_connected() {
            agent.connect().await?;
        }

        let input = self.node_executions[&node.id].first_input().ok_or_else(|| {
            A2AError::InternalError {
                message: "no input message available for agent node".to_string(),
                data: None,
            }
        })?;

        let reply = agent.send_message(&input.as_text()).await?;
        let unwrapped = unwrap_agent_reply(reply);
        Ok(WorkflowValue::from_source(unwrapped, "text", &node.id)
            .with_metadata("agent_id", Value::String(agent_id.to_string())))
    }

    async fn run_tool_node(&self, node: &WorkflowNode) -> A2AResult<WorkflowValue> {
        let tool_id = node
            .config
            .get("tool_id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| A2AError::InvalidParams {
                message: format!("tool node '{}' is missing tool_id configuration", node.name),
                data: None,
            })?;
        let tool = self.tool_registry.get(tool_id).await?;
        if !tool.is_available().await {
            return Err(A2AError::InternalError {
                message: format!("tool '{tool_id}' is not available"),
                data: None,
            });
        }

        let mut parameters = node
            .config
            .get("parameters")
            .and_then(|v| v.as_object())
            .cloned()
            .unwrap_or_default();

        for (_, value) in &self.node_executions[&node.id].input_values {
            merge_tool_input(&mut parameters, value, node.config.get("input_parameter").and_then(|v| v.as_str()));
        }

        let result = tool.execute(parameters).await?;
        Ok(WorkflowValue::from_source(result, "json", &node.id)
            .with_metadata("tool_id", Value::String(tool_id.to_string())))
    }

    fn run_conditional_node(&self, node: &WorkflowNode) -> A2AResult<WorkflowValue> {
        let condition_type = ConditionType::parse(
            node.config.get("condition_type").and_then(|v| v.as_str()).unwrap_or("always"),
        );
        let target = node.config.get("condition_value").and_then(|v| v.as_str()).unwrap_or("");

        let input = self.node_executions[&node.id].first_input();
        if input.is_none() && condition_type != ConditionType::Always {
            return Err(A2AError::InternalError {
                message: "no input message available for conditional node".to_string(),
                data: None,
            });
        }

        let content = input.map(|v| v.as_text()).unwrap_or_default();
        let result = condition::evaluate(condition_type, &content, target);
        Ok(WorkflowValue::from_source(Value::Bool(result), "boolean", &node.id))
    }

    fn run_transform_node(&self, node: &WorkflowNode) -> A2AResult<WorkflowValue> {
        let input = self.node_executions[&node.id].first_input().ok_or_else(|| {
            A2AError::InternalError {
                message: "no input message available for transform node".to_string(),
                data: None,
            }
        })?;
        let transform_type = TransformType::parse(
            node.config.get("transform_type").and_then(|v| v.as_str()).unwrap_or("passthrough"),
        );
        let transform_config = node
            .config
            .get("transform_config")
            .and_then(|v| v.as_object())
            .cloned()
            .unwrap_or_default();

        let result = transform::apply(transform_type, &input.content, &transform_config);
        let content_type = WorkflowValue::infer_content_type(&result);
        Ok(WorkflowValue::from_source(result, content_type, &node.id))
    }
}

/// Unwraps an agent reply shaped like `{"content": ...}` or `{"text": ...}`,
/// matching `_execute_agent_node`'s response cleanup.
fn unwrap_agent_reply(reply: Value) -> Value {
    match &reply {
        Value::Object(map) => map
            .get("content")
            .or_else(|| map.get("text"))
            .cloned()
            .unwrap_or(reply),
        other => other.clone(),
    }
}

/// Merges one delivered input into a tool's parameter map: object content
/// merges key-by-key, a JSON-parseable string merges its parsed object, and
/// anything else becomes a single named parameter if `input_parameter` names one.
fn merge_tool_input(parameters: &mut Map<String, Value>, value: &WorkflowValue, input_parameter: Option<&str>) {
    match &value.content {
        Value::Object(map) => {
            for (k, v) in map {
                parameters.insert(k.clone(), v.clone());
            }
        }
        Value::String(s) => {
            if let Ok(Value::Object(parsed)) = serde_json::from_str::<Value>(s) {
                for (k, v) in parsed {
                    parameters.insert(k, v);
                }
            } else if let Some(name) = input_parameter {
                parameters.insert(name.to_string(), Value::String(s.clone()));
            }
        }
        other => {
            if let Some(name) = input_parameter {
                parameters.insert(name.to_string(), other.clone());
            }
        }
    }
}

/// Registry of in-flight and finished workflow runs, keyed by run id, so a
/// host can poll progress without blocking on [`WorkflowRun::execute_all`].
#[derive(Clone)]
pub struct WorkflowExecutor {
    runs: std::sync::Arc<RwLock<HashMap<Uuid, WorkflowRun>>>,
}

impl Default for WorkflowExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowExecutor {
    pub fn new() -> Self {
        Self {
            runs: std::sync::Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Validates and starts a new run, returning its id.
    pub async fn start_run(
        &self,
        workflow: Workflow,
        agent_registry: AgentRegistry,
        tool_registry: ToolRegistry,
        input_data: Map<String, Value>,
    ) -> Result<Uuid, crate::workflow::model::WorkflowValidationError> {
        let mut run = WorkflowRun::new(workflow, agent_registry, tool_registry, input_data)?;
        run.start();
        let id = run.id;
        self.runs.write().await.insert(id, run);
        Ok(id)
    }

    /// Advances a run by at most `budget` steps. Returns `Ok(true)` if the
    /// run is still active afterward.
    pub async fn continue_execution(&self, run_id: Uuid, budget: usize) -> A2AResult<bool> {
        let mut runs = self.runs.write().await;
        let run = runs.get_mut(&run_id).ok_or_else(|| A2AError::TaskNotFound {
            message: format!("workflow run '{run_id}' not found"),
            data: None,
        })?;
        run.continue_execution(budget).await
    }

    pub async fn get_execution_status(&self, run_id: Uuid) -> Option<HashMap<String, NodeExecutionStatus>> {
        self.runs.read().await.get(&run_id).map(WorkflowRun::node_status)
    }

    pub async fn get_run_status(&self, run_id: Uuid) -> Option<ExecutionStatus> {
        self.runs.read().await.get(&run_id).map(|r| r.status)
    }

    pub async fn cancel_run(&self, run_id: Uuid) -> A2AResult<()> {
        let mut runs = self.runs.write().await;
        let run = runs.get_mut(&run_id).ok_or_else(|| A2AError::TaskNotFound {
            message: format!("workflow run '{run_id}' not found"),
            data: None,
        })?;
        run.cancel();
        Ok(())
    }

    /// Evicts finished runs (`Completed`/`Failed`/`Canceled`) whose `end_time`
    /// is older than `max_age`, so the registry does not grow unbounded.
    pub async fn cleanup_old_executions(&self, max_age: ChronoDuration) {
        let cutoff = Utc::now() - max_age;
        let mut runs = self.runs.write().await;
        runs.retain(|_, run| match (run.status, run.end_time) {
            (ExecutionStatus::Completed | ExecutionStatus::Failed | ExecutionStatus::Canceled, Some(end)) => {
                end > cutoff
            }
            _ => true,
        });
    }
}
