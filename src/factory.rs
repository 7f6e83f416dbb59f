//! Construction of nodes, edges and workflows with type-correct defaults.

use uuid::Uuid;

use crate::parse::types::*;

pub fn uid() -> String {
    Uuid::new_v4().to_string()
}

/// A fresh default config for `node_type`. Every call builds a new value, so
/// two nodes never share config state.
pub fn default_config_for(node_type: NodeType) -> NodeConfig {
    match node_type {
        NodeType::Start => NodeConfig::Start(EmptyConfig {}),
        NodeType::HttpRequest => NodeConfig::HttpRequest(HttpRequestConfig::default()),
        NodeType::Command => NodeConfig::Command(CommandConfig::default()),
        NodeType::Conditional => NodeConfig::Conditional(ConditionalConfig::default()),
        NodeType::End => NodeConfig::End(EmptyConfig {}),
    }
}

pub fn default_label_for(node_type: NodeType) -> &'static str {
    match node_type {
        NodeType::Start => "Start",
        NodeType::HttpRequest => "HTTP request",
        NodeType::Command => "Run command",
        NodeType::Conditional => "Condition",
        NodeType::End => "End",
    }
}

pub fn make_node(node_type: NodeType, position: Position) -> WorkflowNode {
    WorkflowNode::new(
        uid(),
        position,
        default_label_for(node_type).to_string(),
        default_config_for(node_type),
    )
}

pub fn make_edge(source: &str, target: &str) -> WorkflowEdge {
    WorkflowEdge {
        id: uid(),
        source: source.to_string(),
        target: target.to_string(),
        source_handle: None,
        label: None,
    }
}

/// An outgoing edge of a conditional node. The marker is written to both
/// `sourceHandle` and `label`, so `WorkflowEdge::branch` reads the same value
/// whichever field a consumer looks at.
pub fn make_branch_edge(source: &str, target: &str, branch: Branch) -> WorkflowEdge {
    let marker = branch.as_str().to_string();
    WorkflowEdge {
        source_handle: Some(marker.clone()),
        label: Some(marker),
        ..make_edge(source, target)
    }
}

pub fn empty_workflow() -> Workflow {
    Workflow {
        id: uid(),
        name: "WORKFLOW".into(),
        description: String::new(),
        nodes: vec![],
        edges: vec![],
    }
}

/// Sample ETL pipeline: start → extract → transform → load → end.
pub fn seed_etl_workflow() -> Workflow {
    let mut w = empty_workflow();
    w.name = "ETL".into();
    w.description = "Simple ETL: extract, transform, load.".into();

    let start = make_node(NodeType::Start, Position::new(80.0, 80.0));
    let extract = command_node("Extract data", "bash", "extract.sh", Some("rawData"), 360.0);
    let transform = command_node(
        "Transform data",
        "python",
        "transform.py",
        Some("cleanedData"),
        640.0,
    );
    let load = command_node("Load results", "python", "load.py", None, 920.0);
    let end = make_node(NodeType::End, Position::new(1200.0, 80.0));

    w.edges = vec![
        make_edge(start.id(), extract.id()),
        make_edge(extract.id(), transform.id()),
        make_edge(transform.id(), load.id()),
        make_edge(load.id(), end.id()),
    ];
    w.nodes = vec![start, extract, transform, load, end];
    w
}

fn command_node(label: &str, command: &str, args: &str, output_key: Option<&str>, x: f64) -> WorkflowNode {
    WorkflowNode::new(
        uid(),
        Position::new(x, 80.0),
        label.to_string(),
        NodeConfig::Command(CommandConfig {
            command: command.into(),
            args: args.into(),
            output_key: output_key.map(Into::into),
        }),
    )
}
