//! In-place edits on a workflow held by the editor: node patches,
//! connections and cascading deletes.

use crate::error::EditError;
use crate::factory;
use crate::parse::types::*;

/// A partial update of one node. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub label: Option<String>,
    pub config: Option<NodeConfig>,
}

/// Apply `patch` to the node with `node_id`. Id and type are preserved; a
/// config of a different node type is rejected and nothing is changed.
pub fn patch_node(workflow: &mut Workflow, node_id: &str, patch: NodePatch) -> Result<(), EditError> {
    let node = workflow
        .node_mut(node_id)
        .ok_or_else(|| EditError::NodeNotFound(node_id.to_string()))?;

    if let Some(config) = patch.config {
        node.set_config(config)?;
    }
    if let Some(label) = patch.label {
        node.set_label(label);
    }
    Ok(())
}

pub fn add_node(workflow: &mut Workflow, node_type: NodeType, position: Position) -> String {
    let node = factory::make_node(node_type, position);
    let id = node.id().to_string();
    workflow.nodes.push(node);
    id
}

/// Remove a node and every edge that references it.
pub fn remove_node(workflow: &mut Workflow, node_id: &str) -> Result<WorkflowNode, EditError> {
    let pos = workflow
        .nodes
        .iter()
        .position(|n| n.id() == node_id)
        .ok_or_else(|| EditError::NodeNotFound(node_id.to_string()))?;

    let removed = workflow.nodes.remove(pos);
    workflow
        .edges
        .retain(|e| e.source != node_id && e.target != node_id);
    Ok(removed)
}

/// Connect two nodes. A handle on the source (a conditional's `TRUE` or
/// `FALSE` port) becomes the edge's branch marker.
pub fn connect(
    workflow: &mut Workflow,
    source: &str,
    target: &str,
    source_handle: Option<&str>,
) -> Result<String, EditError> {
    for id in [source, target] {
        if workflow.node(id).is_none() {
            return Err(EditError::NodeNotFound(id.to_string()));
        }
    }

    let edge = match source_handle.map(str::trim).filter(|h| !h.is_empty()) {
        Some(handle) if handle.eq_ignore_ascii_case("true") => {
            factory::make_branch_edge(source, target, Branch::True)
        }
        Some(handle) if handle.eq_ignore_ascii_case("false") => {
            factory::make_branch_edge(source, target, Branch::False)
        }
        Some(handle) => WorkflowEdge {
            source_handle: Some(handle.to_string()),
            label: Some(handle.to_string()),
            ..factory::make_edge(source, target)
        },
        None => factory::make_edge(source, target),
    };

    let id = edge.id.clone();
    workflow.edges.push(edge);
    Ok(id)
}

pub fn remove_edge(workflow: &mut Workflow, edge_id: &str) -> bool {
    let before = workflow.edges.len();
    workflow.edges.retain(|e| e.id != edge_id);
    workflow.edges.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline() -> (Workflow, String, String, String) {
        let mut w = factory::empty_workflow();
        let start = add_node(&mut w, NodeType::Start, Position::new(0.0, 0.0));
        let cmd = add_node(&mut w, NodeType::Command, Position::new(100.0, 0.0));
        let end = add_node(&mut w, NodeType::End, Position::new(200.0, 0.0));
        connect(&mut w, &start, &cmd, None).unwrap();
        connect(&mut w, &cmd, &end, None).unwrap();
        (w, start, cmd, end)
    }

    #[test]
    fn patch_preserves_id_and_type() {
        let (mut w, _, cmd, _) = pipeline();
        patch_node(
            &mut w,
            &cmd,
            NodePatch {
                label: Some("List files".into()),
                config: Some(NodeConfig::Command(CommandConfig {
                    command: "ls".into(),
                    args: "-la".into(),
                    output_key: None,
                })),
            },
        )
        .unwrap();

        let node = w.node(&cmd).unwrap();
        assert_eq!(node.id(), cmd);
        assert_eq!(node.node_type(), NodeType::Command);
        assert_eq!(node.label(), "List files");
    }

    #[test]
    fn mismatched_patch_changes_nothing() {
        let (mut w, _, cmd, _) = pipeline();
        let before = w.clone();
        let result = patch_node(
            &mut w,
            &cmd,
            NodePatch {
                label: Some("ignored".into()),
                config: Some(factory::default_config_for(NodeType::Conditional)),
            },
        );
        assert!(matches!(result, Err(EditError::ConfigTypeMismatch { .. })));
        assert_eq!(w, before);
    }

    #[test]
    fn remove_node_cascades_edges() {
        let (mut w, start, cmd, end) = pipeline();
        remove_node(&mut w, &cmd).unwrap();
        assert_eq!(w.nodes.len(), 2);
        assert!(w.edges.is_empty());
        assert!(w.node(&start).is_some());
        assert!(w.node(&end).is_some());
    }

    #[test]
    fn connect_unknown_node_fails() {
        let (mut w, start, _, _) = pipeline();
        assert_eq!(
            connect(&mut w, &start, "nope", None),
            Err(EditError::NodeNotFound("nope".into()))
        );
    }

    #[test]
    fn connect_handle_becomes_branch() {
        let (mut w, start, _, end) = pipeline();
        let id = connect(&mut w, &start, &end, Some("true")).unwrap();
        let edge = w.edges.iter().find(|e| e.id == id).unwrap();
        assert_eq!(edge.branch(), Some(Branch::True));
        assert!(remove_edge(&mut w, &id));
        assert!(!remove_edge(&mut w, &id));
    }
}
