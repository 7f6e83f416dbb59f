//! Per-node configuration rules (N001–N009).
//! Match arms here must track `WorkflowNode` in `parse/types.rs`.

use petgraph::graph::NodeIndex;

use crate::error::Diagnostic;
use crate::graph::WorkflowGraph;
use crate::parse::types::*;

/// Validate one node. `index` is the node's position in the node list.
/// Returns all errors found; one failing rule never hides another.
pub fn validate_node(node: &WorkflowNode, graph: &WorkflowGraph, index: usize) -> Vec<Diagnostic> {
    let mut errors = Vec::new();
    let node_id = node.id();

    match node {
        WorkflowNode::Start(_) | WorkflowNode::End(_) => {}
        WorkflowNode::Command(n) => {
            if is_blank(&n.data.config.command) {
                errors.push(Diagnostic::configuration(
                    "N001",
                    format!("Command node '{}' must have a non-empty command", node_id),
                    node_id,
                ));
            }
        }
        WorkflowNode::HttpRequest(n) => {
            validate_http_request(&n.data.config, node_id, &mut errors);
        }
        WorkflowNode::Conditional(n) => {
            if is_blank(&n.data.config.left_path) {
                errors.push(Diagnostic::configuration(
                    "N007",
                    format!("Conditional node '{}' must have a left path", node_id),
                    node_id,
                ));
            }
            if !has_true_false_branches(graph, NodeIndex::new(index)) {
                errors.push(Diagnostic::configuration(
                    "N008",
                    format!(
                        "Conditional node '{}' must have exactly 2 outgoing edges: TRUE and FALSE",
                        node_id
                    ),
                    node_id,
                ));
            }
        }
    }

    errors
}

fn validate_http_request(cfg: &HttpRequestConfig, node_id: &str, errors: &mut Vec<Diagnostic>) {
    if is_blank(&cfg.url) {
        errors.push(Diagnostic::configuration(
            "N002",
            format!("HTTP request node '{}' must have a URL", node_id),
            node_id,
        ));
    } else if !is_http_url(&cfg.url) {
        errors.push(Diagnostic::configuration(
            "N003",
            format!(
                "HTTP request node '{}' URL must start with http:// or https://, found '{}'",
                node_id, cfg.url
            ),
            node_id,
        ));
    }

    if cfg.method.is_none() {
        errors.push(Diagnostic::configuration(
            "N009",
            format!(
                "HTTP request node '{}' must have a method: GET, POST, PUT, PATCH or DELETE",
                node_id
            ),
            node_id,
        ));
    }

    if !(cfg.timeout_ms.is_finite() && cfg.timeout_ms > 0.0) {
        errors.push(Diagnostic::configuration(
            "N004",
            format!(
                "HTTP request node '{}' timeoutMs must be a number > 0, found {}",
                node_id, cfg.timeout_ms
            ),
            node_id,
        ));
    }

    if !(cfg.retries.is_finite() && cfg.retries >= 0.0) {
        errors.push(Diagnostic::configuration(
            "N005",
            format!(
                "HTTP request node '{}' retries must be a number >= 0, found {}",
                node_id, cfg.retries
            ),
            node_id,
        ));
    }

    for (field, text) in [
        ("headersJson", &cfg.headers_json),
        ("queryParamsJson", &cfg.query_params_json),
        ("bodyJson", &cfg.body_json),
    ] {
        if !is_blank_or_json(text) {
            errors.push(Diagnostic::configuration(
                "N006",
                format!("HTTP request node '{}' {} is not valid JSON", node_id, field),
                node_id,
            ));
        }
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// `^https?://.+`, scheme case-insensitive.
fn is_http_url(url: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        url.len() > scheme.len()
            && url.is_char_boundary(scheme.len())
            && url[..scheme.len()].eq_ignore_ascii_case(scheme)
    })
}

fn is_blank_or_json(text: &str) -> bool {
    is_blank(text) || serde_json::from_str::<serde_json::Value>(text).is_ok()
}

/// Outgoing branch markers must be exactly the multiset {TRUE, FALSE}.
fn has_true_false_branches(graph: &WorkflowGraph, idx: NodeIndex) -> bool {
    let mut branches = graph.outgoing_branches(idx);
    branches.sort();
    branches == [Some(Branch::True), Some(Branch::False)]
}
