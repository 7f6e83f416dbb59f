//! Workflow JSON record: parse, import and export.

pub mod types;

pub use types::*;

use tracing::warn;

use crate::error::Diagnostic;

/// Deserialize a workflow JSON string into a `Workflow`.
pub fn parse(json: &str) -> Result<Workflow, Diagnostic> {
    serde_json::from_str::<Workflow>(json).map_err(|e| {
        Diagnostic::integration("P001", format!("Failed to parse workflow JSON: {}", e))
    })
}

/// Import a workflow file. Malformed input is a no-op: it is logged and
/// `None` is returned.
pub fn import(json: &str) -> Option<Workflow> {
    match parse(json) {
        Ok(workflow) => Some(workflow),
        Err(diagnostic) => {
            warn!(error = %diagnostic, "ignoring unparseable workflow import");
            None
        }
    }
}

/// Serialize a workflow as pretty-printed JSON for export.
pub fn export(workflow: &Workflow) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(workflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_malformed_is_none() {
        assert!(import("{ not json").is_none());
        assert!(import(r#"{"name": "missing id"}"#).is_none());
    }

    #[test]
    fn parse_error_is_integration_diagnostic() {
        let err = parse("[]").unwrap_err();
        assert_eq!(err.code, "P001");
        assert_eq!(err.category, crate::error::Category::Integration);
    }

    #[test]
    fn missing_config_fields_take_defaults() {
        let json = r#"{
            "id": "w1",
            "nodes": [
                {"id": "h", "type": "http_request", "position": {"x": 0, "y": 0},
                 "data": {"label": "Fetch", "config": {"url": "https://example.com"}}}
            ]
        }"#;
        let workflow = parse(json).unwrap();
        let WorkflowNode::HttpRequest(node) = &workflow.nodes[0] else {
            panic!("expected http_request node");
        };
        assert_eq!(node.data.config.url, "https://example.com");
        assert_eq!(node.data.config.timeout_ms, 5000.0);
        assert_eq!(node.data.config.method, Some(HttpMethod::Get));
        assert!(workflow.edges.is_empty());
    }
}
