//! Graph-level structural rules (S001–S009).

use std::collections::HashSet;

use petgraph::graph::NodeIndex;

use crate::error::Diagnostic;
use crate::graph::reach::{can_reach_end, reachable_from_start};
use crate::graph::{WorkflowGraph, cycle};
use crate::parse::types::WorkflowNode;

/// Shape rules, in order: start count, end count, cycles, forward
/// reachability, end out-degree, backward reachability, terminal type.
pub fn validate_structural(nodes: &[WorkflowNode], graph: &WorkflowGraph) -> Vec<Diagnostic> {
    let mut errors = Vec::new();

    let starts: Vec<NodeIndex> = indices_where(nodes, WorkflowNode::is_start);
    let ends: Vec<NodeIndex> = indices_where(nodes, WorkflowNode::is_end);

    s001_exactly_one_start(&starts, &mut errors);
    s002_at_least_one_end(&ends, &mut errors);
    s003_no_cycles(graph, &mut errors);
    s004_all_reachable_from_start(nodes, graph, &starts, &mut errors);
    s005_end_has_no_outgoing(nodes, graph, &ends, &mut errors);
    s006_all_reach_end(nodes, graph, &ends, &mut errors);
    s007_only_end_is_terminal(nodes, graph, &mut errors);

    errors
}

/// Edge and id integrity: dangling edge endpoints and duplicate node ids.
pub fn validate_integrity(nodes: &[WorkflowNode], graph: &WorkflowGraph) -> Vec<Diagnostic> {
    let mut errors = Vec::new();
    s008_no_dangling_edges(graph, &mut errors);
    s009_unique_node_ids(nodes, &mut errors);
    errors
}

fn indices_where(nodes: &[WorkflowNode], pred: impl Fn(&WorkflowNode) -> bool) -> Vec<NodeIndex> {
    nodes
        .iter()
        .enumerate()
        .filter(|&(_, n)| pred(n))
        .map(|(i, _)| NodeIndex::new(i))
        .collect()
}

fn s001_exactly_one_start(starts: &[NodeIndex], errors: &mut Vec<Diagnostic>) {
    if starts.len() != 1 {
        errors.push(Diagnostic::structural(
            "S001",
            format!(
                "Workflow must have exactly 1 START node, found {}",
                starts.len()
            ),
            None,
        ));
    }
}

fn s002_at_least_one_end(ends: &[NodeIndex], errors: &mut Vec<Diagnostic>) {
    if ends.is_empty() {
        errors.push(Diagnostic::structural(
            "S002",
            "Workflow must have at least 1 END node, found 0",
            None,
        ));
    }
}

fn s003_no_cycles(graph: &WorkflowGraph, errors: &mut Vec<Diagnostic>) {
    if cycle::has_cycle(graph) {
        errors.push(Diagnostic::structural(
            "S003",
            "Workflow graph contains a cycle",
            None,
        ));
    }
}

fn s004_all_reachable_from_start(
    nodes: &[WorkflowNode],
    graph: &WorkflowGraph,
    starts: &[NodeIndex],
    errors: &mut Vec<Diagnostic>,
) {
    // No start node: reported by S001 alone.
    let Some(&start) = starts.first() else { return };

    let reachable = reachable_from_start(graph, Some(start));
    for (i, node) in nodes.iter().enumerate() {
        if !reachable.contains(&NodeIndex::new(i)) {
            errors.push(Diagnostic::structural(
                "S004",
                format!("Node '{}' is not reachable from START", node.id()),
                Some(node.id().to_string()),
            ));
        }
    }
}

fn s005_end_has_no_outgoing(
    nodes: &[WorkflowNode],
    graph: &WorkflowGraph,
    ends: &[NodeIndex],
    errors: &mut Vec<Diagnostic>,
) {
    for &idx in ends {
        let count = graph.outgoing_count(idx);
        if count > 0 {
            let id = nodes[idx.index()].id();
            errors.push(Diagnostic::structural(
                "S005",
                format!("END node '{}' must not have outgoing edges, found {}", id, count),
                Some(id.to_string()),
            ));
        }
    }
}

fn s006_all_reach_end(
    nodes: &[WorkflowNode],
    graph: &WorkflowGraph,
    ends: &[NodeIndex],
    errors: &mut Vec<Diagnostic>,
) {
    // No end node: reported by S002 alone.
    if ends.is_empty() {
        return;
    }

    let reaching = can_reach_end(graph, ends);
    for (i, node) in nodes.iter().enumerate() {
        if !reaching.contains(&NodeIndex::new(i)) {
            errors.push(Diagnostic::structural(
                "S006",
                format!("Node '{}' cannot reach an END node", node.id()),
                Some(node.id().to_string()),
            ));
        }
    }
}

fn s007_only_end_is_terminal(
    nodes: &[WorkflowNode],
    graph: &WorkflowGraph,
    errors: &mut Vec<Diagnostic>,
) {
    for (i, node) in nodes.iter().enumerate() {
        if !node.is_end() && graph.outgoing_count(NodeIndex::new(i)) == 0 {
            errors.push(Diagnostic::structural(
                "S007",
                format!(
                    "Only END nodes may be terminal; {} node '{}' has no outgoing edges",
                    node.node_type(),
                    node.id()
                ),
                Some(node.id().to_string()),
            ));
        }
    }
}

fn s008_no_dangling_edges(graph: &WorkflowGraph, errors: &mut Vec<Diagnostic>) {
    for d in &graph.dangling {
        errors.push(Diagnostic::structural(
            "S008",
            format!(
                "Edge '{}' references unknown {} node '{}'",
                d.edge_id, d.endpoint, d.node_id
            ),
            None,
        ));
    }
}

fn s009_unique_node_ids(nodes: &[WorkflowNode], errors: &mut Vec<Diagnostic>) {
    let mut seen = HashSet::new();
    for node in nodes {
        if !seen.insert(node.id()) {
            errors.push(Diagnostic::structural(
                "S009",
                format!("Duplicate node id '{}'", node.id()),
                Some(node.id().to_string()),
            ));
        }
    }
}
