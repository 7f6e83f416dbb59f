//! petgraph-based directed graph over a workflow snapshot.
//!
//! Nodes are indexed in node-list order, so `NodeIndex::index()` is the
//! node's position in `Workflow::nodes`. Building never fails: an edge whose
//! source or target is not a known node id is left out of the graph and
//! recorded in `dangling`.

pub mod cycle;
pub mod reach;

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::parse::types::{Branch, Workflow, WorkflowEdge, WorkflowNode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeLabel {
    pub edge_id: String,
    pub branch: Option<Branch>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Source,
    Target,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Source => write!(f, "source"),
            Endpoint::Target => write!(f, "target"),
        }
    }
}

/// An edge endpoint naming a node id that does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingEdge {
    pub edge_id: String,
    pub endpoint: Endpoint,
    pub node_id: String,
}

/// Adjacency view: every node id in node-list order with its neighbors.
pub type Adjacency = Vec<(String, Vec<String>)>;

pub struct WorkflowGraph {
    pub graph: DiGraph<String, EdgeLabel>,
    /// First occurrence of each node id.
    pub node_indices: HashMap<String, NodeIndex>,
    pub dangling: Vec<DanglingEdge>,
}

impl WorkflowGraph {
    pub fn build(nodes: &[WorkflowNode], edges: &[WorkflowEdge]) -> Self {
        let mut graph = DiGraph::with_capacity(nodes.len(), edges.len());
        let mut node_indices = HashMap::with_capacity(nodes.len());
        let mut dangling = Vec::new();

        for node in nodes {
            let id = node.id().to_string();
            let idx = graph.add_node(id.clone());
            node_indices.entry(id).or_insert(idx);
        }

        for edge in edges {
            let source_idx = node_indices.get(&edge.source).copied();
            let target_idx = node_indices.get(&edge.target).copied();

            if source_idx.is_none() {
                dangling.push(DanglingEdge {
                    edge_id: edge.id.clone(),
                    endpoint: Endpoint::Source,
                    node_id: edge.source.clone(),
                });
            }
            if target_idx.is_none() {
                dangling.push(DanglingEdge {
                    edge_id: edge.id.clone(),
                    endpoint: Endpoint::Target,
                    node_id: edge.target.clone(),
                });
            }

            if let (Some(s), Some(t)) = (source_idx, target_idx) {
                graph.add_edge(
                    s,
                    t,
                    EdgeLabel {
                        edge_id: edge.id.clone(),
                        branch: edge.branch(),
                    },
                );
            }
        }

        WorkflowGraph {
            graph,
            node_indices,
            dangling,
        }
    }

    pub fn from_workflow(workflow: &Workflow) -> Self {
        Self::build(&workflow.nodes, &workflow.edges)
    }

    pub fn index_of(&self, node_id: &str) -> Option<NodeIndex> {
        self.node_indices.get(node_id).copied()
    }

    pub fn id_of(&self, idx: NodeIndex) -> &str {
        &self.graph[idx]
    }

    /// Forward adjacency: node id -> target ids, in edge-list order.
    pub fn forward_adjacency(&self) -> Adjacency {
        self.adjacency(Direction::Outgoing)
    }

    /// Reverse adjacency: node id -> source ids, in edge-list order.
    pub fn reverse_adjacency(&self) -> Adjacency {
        self.adjacency(Direction::Incoming)
    }

    fn adjacency(&self, direction: Direction) -> Adjacency {
        let mut adj: Adjacency = self
            .graph
            .node_weights()
            .map(|id| (id.clone(), Vec::new()))
            .collect();

        for edge in self.graph.raw_edges() {
            let (from, to) = match direction {
                Direction::Outgoing => (edge.source(), edge.target()),
                Direction::Incoming => (edge.target(), edge.source()),
            };
            adj[from.index()].1.push(self.graph[to].clone());
        }

        adj
    }

    pub fn outgoing_count(&self, idx: NodeIndex) -> usize {
        self.graph.edges_directed(idx, Direction::Outgoing).count()
    }

    pub fn incoming_count(&self, idx: NodeIndex) -> usize {
        self.graph.edges_directed(idx, Direction::Incoming).count()
    }

    /// Branch markers of a node's outgoing edges.
    pub fn outgoing_branches(&self, idx: NodeIndex) -> Vec<Option<Branch>> {
        self.graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| e.weight().branch.clone())
            .collect()
    }
}
