//! Three-color depth-first cycle detection.

use petgraph::graph::NodeIndex;

use super::WorkflowGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// True if the graph has at least one directed cycle (self-loops included).
///
/// Every white node, in node-list order, roots a fresh DFS. The DFS keeps an
/// explicit stack of `(node, remaining neighbors)` frames and a color per
/// node; reaching a gray node closes a cycle and returns immediately.
pub fn has_cycle(graph: &WorkflowGraph) -> bool {
    let g = &graph.graph;
    let mut color = vec![Color::White; g.node_count()];

    for root in g.node_indices() {
        if color[root.index()] != Color::White {
            continue;
        }

        color[root.index()] = Color::Gray;
        let mut stack = vec![(root, g.neighbors(root))];

        while let Some((node, neighbors)) = stack.last_mut() {
            let node: NodeIndex = *node;
            match neighbors.next() {
                Some(next) => match color[next.index()] {
                    Color::Gray => return true,
                    Color::Black => {}
                    Color::White => {
                        color[next.index()] = Color::Gray;
                        stack.push((next, g.neighbors(next)));
                    }
                },
                None => {
                    color[node.index()] = Color::Black;
                    stack.pop();
                }
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::types::{EmptyConfig, NodeConfig, Position, WorkflowEdge, WorkflowNode};

    fn graph(ids: &[&str], edges: &[(&str, &str)]) -> WorkflowGraph {
        let nodes: Vec<WorkflowNode> = ids
            .iter()
            .map(|id| {
                WorkflowNode::new(
                    id.to_string(),
                    Position::new(0.0, 0.0),
                    id.to_string(),
                    NodeConfig::Start(EmptyConfig {}),
                )
            })
            .collect();
        let edges: Vec<WorkflowEdge> = edges
            .iter()
            .enumerate()
            .map(|(i, (s, t))| WorkflowEdge {
                id: format!("e{i}"),
                source: s.to_string(),
                target: t.to_string(),
                source_handle: None,
                label: None,
            })
            .collect();
        WorkflowGraph::build(&nodes, &edges)
    }

    #[test]
    fn empty_graph_is_acyclic() {
        assert!(!has_cycle(&graph(&[], &[])));
    }

    #[test]
    fn chain_is_acyclic() {
        assert!(!has_cycle(&graph(&["a", "b", "c"], &[("a", "b"), ("b", "c")])));
    }

    #[test]
    fn diamond_is_acyclic() {
        // Shared descendant `d` is black on the second visit, not gray.
        let g = graph(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
        );
        assert!(!has_cycle(&g));
    }

    #[test]
    fn back_edge_is_cycle() {
        let g = graph(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);
        assert!(has_cycle(&g));
    }

    #[test]
    fn self_loop_is_cycle() {
        assert!(has_cycle(&graph(&["a"], &[("a", "a")])));
    }

    #[test]
    fn cycle_in_disconnected_component() {
        let g = graph(&["a", "b", "x", "y"], &[("a", "b"), ("x", "y"), ("y", "x")]);
        assert!(has_cycle(&g));
    }

    #[test]
    fn parallel_edges_are_not_a_cycle() {
        assert!(!has_cycle(&graph(&["a", "b"], &[("a", "b"), ("a", "b")])));
    }
}
