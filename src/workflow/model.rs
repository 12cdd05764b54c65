//! Workflow graph model — nodes, edges, and the workflow they compose.
//!
//! Mirrors `agent_flow.models.workflow.{Workflow, WorkflowNode, WorkflowEdge,
//! NodeType, EdgeType}` from the source SDK: a DAG of typed nodes connected by
//! typed edges. Cycles are permitted (the scheduler bounds traversal with a
//! step budget); what is not permitted is a graph with no start node.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Kind of work a [`WorkflowNode`] performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// Emits a value sourced from workflow input, an incoming edge, or a
    /// configured default.
    Input,
    /// Terminal sink: records its input under `results[config.output_key]`.
    Output,
    /// Forwards text to a registered agent and wraps the reply.
    Agent,
    /// Invokes a registered tool with merged parameters.
    Tool,
    /// Evaluates a condition against its input and emits a boolean.
    Conditional,
    /// Applies a transform (passthrough / extract / template / json).
    Transform,
}

/// Kind of dependency a [`WorkflowEdge`] represents, governing whether the
/// scheduler follows it after the source node completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    /// Always followed; carries the source's output to the target.
    Data,
    /// Always followed on successful node completion.
    Success,
    /// Followed only when the source node failed.
    Error,
    /// Followed when the edge's own condition evaluates true.
    ConditionTrue,
    /// Followed when the edge's own condition evaluates false.
    ConditionFalse,
}

/// A node in the workflow graph.
///
/// `incoming_edges`/`outgoing_edges` hold edge ids rather than owned edges or
/// back-references, so the graph stays a flat arena indexed by id — no
/// ownership cycles between nodes and edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowNode {
    pub id: String,
    pub name: String,
    pub node_type: NodeType,
    #[serde(default)]
    pub config: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub position: Option<(f64, f64)>,
    #[serde(default)]
    pub incoming_edges: Vec<String>,
    #[serde(default)]
    pub outgoing_edges: Vec<String>,
}

impl WorkflowNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            node_type,
            config: serde_json::Map::new(),
            position: None,
            incoming_edges: Vec::new(),
            outgoing_edges: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: serde_json::Map<String, serde_json::Value>) -> Self {
        self.config = config;
        self
    }
}

/// A typed connection between two nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowEdge {
    pub id: String,
    pub source_node_id: String,
    pub target_node_id: String,
    pub edge_type: EdgeType,
    #[serde(default)]
    pub config: serde_json::Map<String, serde_json::Value>,
}

impl WorkflowEdge {
    pub fn new(
        id: impl Into<String>,
        source_node_id: impl Into<String>,
        target_node_id: impl Into<String>,
        edge_type: EdgeType,
    ) -> Self {
        Self {
            id: id.into(),
            source_node_id: source_node_id.into(),
            target_node_id: target_node_id.into(),
            edge_type,
            config: serde_json::Map::new(),
        }
    }
}

/// A reason [`Workflow::validate`] rejected a graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowValidationError {
    #[error("edge {edge_id} references unknown source node {node_id}")]
    UnknownSourceNode { edge_id: String, node_id: String },
    #[error("edge {edge_id} references unknown target node {node_id}")]
    UnknownTargetNode { edge_id: String, node_id: String },
    #[error("workflow has no start node (a node with no incoming edges)")]
    NoStartNode,
}

/// The DAG of nodes and edges an execution runs over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub nodes: HashMap<String, WorkflowNode>,
    pub edges: HashMap<String, WorkflowEdge>,
}

impl Workflow {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            nodes: HashMap::new(),
            edges: HashMap::new(),
        }
    }

    /// Adds a node, returning its id for convenience when wiring edges.
    pub fn add_node(&mut self, node: WorkflowNode) -> String {
        let id = node.id.clone();
        self.nodes.insert(id.clone(), node);
        id
    }

    /// Adds an edge and threads its id into the endpoints' adjacency lists.
    pub fn add_edge(&mut self, edge: WorkflowEdge) -> String {
        let id = edge.id.clone();
        if let Some(source) = self.nodes.get_mut(&edge.source_node_id) {
            source.outgoing_edges.push(id.clone());
        }
        if let Some(target) = self.nodes.get_mut(&edge.target_node_id) {
            target.incoming_edges.push(id.clone());
        }
        self.edges.insert(id.clone(), edge);
        id
    }

    /// Nodes with no incoming edges — the scheduler's initial ready set.
    pub fn start_nodes(&self) -> Vec<&WorkflowNode> {
        self.nodes
            .values()
            .filter(|n| n.incoming_edges.is_empty())
            .collect()
    }

    /// Pure structural check: every edge references nodes that exist, and at
    /// least one start node is reachable. Calling this twice on the same
    /// graph yields the same result (no mutation, no I/O).
    pub fn validate(&self) -> Result<(), WorkflowValidationError> {
        for edge in self.edges.values() {
            if !self.nodes.contains_key(&edge.source_node_id) {
                return Err(WorkflowValidationError::UnknownSourceNode {
                    edge_id: edge.id.clone(),
                    node_id: edge.source_node_id.clone(),
                });
            }
            if !self.nodes.contains_key(&edge.target_node_id) {
                return Err(WorkflowValidationError::UnknownTargetNode {
                    edge_id: edge.id.clone(),
                    node_id: edge.target_node_id.clone(),
                });
            }
        }
        if self.start_nodes().is_empty() {
            return Err(WorkflowValidationError::NoStartNode);
        }
        Ok(())
    }
}
