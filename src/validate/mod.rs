//! Static validation of a workflow snapshot.
//!
//! Structural rules run first, in a fixed order, then per-node config rules
//! in node-list order, then the edge/id integrity rules. Every rule runs
//! regardless of earlier failures. An empty result means the workflow may
//! be executed.

pub mod node_rules;
pub mod structural;

use tracing::debug;

use crate::error::Diagnostic;
use crate::graph::WorkflowGraph;
use crate::parse::types::{Workflow, WorkflowEdge, WorkflowNode};

/// Validate a node/edge snapshot. Pure and total: never fails, never panics
/// on dangling edges or duplicate ids.
pub fn validate(nodes: &[WorkflowNode], edges: &[WorkflowEdge]) -> Vec<Diagnostic> {
    let graph = WorkflowGraph::build(nodes, edges);

    let mut errors = structural::validate_structural(nodes, &graph);

    for (i, node) in nodes.iter().enumerate() {
        errors.extend(node_rules::validate_node(node, &graph, i));
    }

    errors.extend(structural::validate_integrity(nodes, &graph));

    debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        diagnostics = errors.len(),
        "validated workflow graph"
    );
    errors
}

pub fn validate_workflow(workflow: &Workflow) -> Vec<Diagnostic> {
    validate(&workflow.nodes, &workflow.edges)
}

pub fn is_valid(workflow: &Workflow) -> bool {
    validate_workflow(workflow).is_empty()
}
