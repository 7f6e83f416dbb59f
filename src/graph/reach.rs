//! Breadth-first reachability: forward from the start node, backward from
//! the end nodes.

use std::collections::HashSet;

use petgraph::graph::NodeIndex;
use petgraph::visit::{Bfs, Reversed, VisitMap};

use super::WorkflowGraph;

/// Nodes reachable from `start` by following edges forward. Empty when there
/// is no start node.
pub fn reachable_from_start(graph: &WorkflowGraph, start: Option<NodeIndex>) -> HashSet<NodeIndex> {
    let mut reachable = HashSet::new();
    let Some(start) = start else {
        return reachable;
    };

    let mut bfs = Bfs::new(&graph.graph, start);
    while let Some(nx) = bfs.next(&graph.graph) {
        reachable.insert(nx);
    }
    reachable
}

/// Nodes from which at least one of `ends` can be reached. The BFS runs over
/// the reversed graph with every end node seeded in the first level.
pub fn can_reach_end(graph: &WorkflowGraph, ends: &[NodeIndex]) -> HashSet<NodeIndex> {
    let mut reaching = HashSet::new();
    let Some((&first, rest)) = ends.split_first() else {
        return reaching;
    };

    let reversed = Reversed(&graph.graph);
    let mut bfs = Bfs::new(reversed, first);
    for &end in rest {
        if bfs.discovered.visit(end) {
            bfs.stack.push_back(end);
        }
    }

    while let Some(nx) = bfs.next(reversed) {
        reaching.insert(nx);
    }
    reaching
}
