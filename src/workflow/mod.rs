//! Workflow execution engine — a node/edge DAG composing agent calls into a
//! directed graph, executed by a ready-queue scheduler.
//!
//! Grounded in `agent_flow/engine/executor.py` (the scheduler, node
//! semantics, and per-run tracking) and `agent_flow/models/{workflow,agent,
//! tool}.py` (the graph and registry shapes, inferred from their usage in
//! the executor since the model files themselves weren't in the retrieved
//! source). This module is engine-internal: it is not part of the protocol
//! wire contract in [`crate::types`], it composes calls to agents that speak
//! that wire contract.
//!
//! ```
//! use a2a_rs::workflow::{
//!     AgentRegistry, EdgeType, NodeType, ToolRegistry, Workflow, WorkflowEdge,
//!     WorkflowNode, WorkflowRun,
//! };
//! use serde_json::{json, Map};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut wf = Workflow::new("greeting");
//! wf.add_node(WorkflowNode::new("in", "Input", NodeType::Input).with_config({
//!     let mut c = Map::new();
//!     c.insert("input_key".into(), json!("greeting"));
//!     c
//! }));
//! wf.add_node(WorkflowNode::new("out", "Output", NodeType::Output));
//! wf.add_edge(WorkflowEdge::new("e1", "in", "out", EdgeType::Data));
//!
//! let mut input_data = Map::new();
//! input_data.insert("greeting".into(), json!("hello"));
//!
//! let mut run = WorkflowRun::new(wf, AgentRegistry::new(), ToolRegistry::new(), input_data).unwrap();
//! let results = run.execute_all().await.unwrap();
//! assert_eq!(results.get("output"), Some(&json!("hello")));
//! # }
//! ```

pub mod condition;
pub mod executor;
pub mod model;
pub mod registry;
pub mod router;
pub mod transform;

pub use condition::ConditionType;
pub use executor::{
    ExecutionStatus, NodeExecution, NodeExecutionStatus, WorkflowExecutor, WorkflowRun,
    WorkflowValue, DEFAULT_MAX_STEPS,
};
pub use model::{EdgeType, NodeType, Workflow, WorkflowEdge, WorkflowNode, WorkflowValidationError};
pub use registry::{AgentRegistry, ToolRegistry, WorkflowAgent, WorkflowTool};
pub use router::{AgentRouter, KeywordRouter, RandomRouter, RoutableAgent, RoutingDecision};
pub use transform::TransformType;

#[cfg(feature = "client")]
pub use registry::A2aClientAgent;
