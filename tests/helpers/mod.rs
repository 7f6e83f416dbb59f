#![allow(dead_code)]

use miniflow::parse::*;

// =============================================================================
// Node builders (fixed ids, so diagnostics are predictable)
// =============================================================================

fn node(id: &str, label: &str, config: NodeConfig) -> WorkflowNode {
    WorkflowNode::new(id.into(), Position::new(0.0, 0.0), label.into(), config)
}

pub fn start(id: &str) -> WorkflowNode {
    node(id, "Start", NodeConfig::Start(EmptyConfig {}))
}

pub fn end(id: &str) -> WorkflowNode {
    node(id, "End", NodeConfig::End(EmptyConfig {}))
}

pub fn command(id: &str, cmd: &str) -> WorkflowNode {
    node(
        id,
        "Run command",
        NodeConfig::Command(CommandConfig {
            command: cmd.into(),
            args: String::new(),
            output_key: None,
        }),
    )
}

pub fn http(id: &str, url: &str) -> WorkflowNode {
    node(
        id,
        "HTTP request",
        NodeConfig::HttpRequest(HttpRequestConfig {
            url: url.into(),
            ..HttpRequestConfig::default()
        }),
    )
}

pub fn http_with(id: &str, config: HttpRequestConfig) -> WorkflowNode {
    node(id, "HTTP request", NodeConfig::HttpRequest(config))
}

pub fn conditional(id: &str, left_path: &str) -> WorkflowNode {
    node(
        id,
        "Condition",
        NodeConfig::Conditional(ConditionalConfig {
            left_path: left_path.into(),
            op: CompareOp::Eq,
            right_value: "ok".into(),
        }),
    )
}

// =============================================================================
// Edge builders
// =============================================================================

pub fn edge(source: &str, target: &str) -> WorkflowEdge {
    WorkflowEdge {
        id: format!("{}->{}", source, target),
        source: source.into(),
        target: target.into(),
        source_handle: None,
        label: None,
    }
}

pub fn branch(source: &str, target: &str, marker: &str) -> WorkflowEdge {
    WorkflowEdge {
        source_handle: Some(marker.into()),
        ..edge(source, target)
    }
}

// =============================================================================
// Workflows
// =============================================================================

pub fn workflow(nodes: Vec<WorkflowNode>, edges: Vec<WorkflowEdge>) -> Workflow {
    Workflow {
        id: "test-wf".into(),
        name: "Test Workflow".into(),
        description: String::new(),
        nodes,
        edges,
    }
}

/// start → cmd → end
pub fn linear() -> Workflow {
    workflow(
        vec![start("start"), command("cmd", "echo"), end("end")],
        vec![edge("start", "cmd"), edge("cmd", "end")],
    )
}

/// Codes of every diagnostic, in emission order.
pub fn codes(workflow: &Workflow) -> Vec<String> {
    miniflow::validate::validate_workflow(workflow)
        .into_iter()
        .map(|d| d.code)
        .collect()
}
