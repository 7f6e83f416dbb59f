use miniflow::parse::{self, *};

#[test]
fn parse_example_workflow() {
    let json = include_str!("fixtures/linear_workflow.json");
    let workflow = parse::parse(json).expect("Should parse example workflow");

    assert_eq!(workflow.id, "wf-linear");
    assert_eq!(workflow.name, "Nightly report");
    assert_eq!(workflow.nodes.len(), 6);
    assert_eq!(workflow.edges.len(), 6);

    let types: Vec<NodeType> = workflow.nodes.iter().map(|n| n.node_type()).collect();
    assert_eq!(
        types,
        [
            NodeType::Start,
            NodeType::HttpRequest,
            NodeType::Command,
            NodeType::Conditional,
            NodeType::Command,
            NodeType::End,
        ]
    );
}

#[test]
fn parse_http_config_fields() {
    let workflow = parse::parse(include_str!("fixtures/linear_workflow.json")).unwrap();
    let Some(WorkflowNode::HttpRequest(node)) = workflow.node("fetch") else {
        panic!("fetch should be an http_request node");
    };
    let cfg = &node.data.config;
    assert_eq!(cfg.method, Some(HttpMethod::Post));
    assert_eq!(cfg.headers_json, r#"{"Accept": "application/json"}"#);
    assert_eq!(cfg.timeout_ms, 10000.0);
    assert_eq!(cfg.retries, 2.0);
    assert_eq!(cfg.context_key, "metrics");
}

#[test]
fn parse_optional_output_key() {
    let workflow = parse::parse(include_str!("fixtures/linear_workflow.json")).unwrap();
    let output_key = |id: &str| match workflow.node(id) {
        Some(WorkflowNode::Command(n)) => n.data.config.output_key.clone(),
        other => panic!("expected command node, got {:?}", other),
    };
    assert_eq!(output_key("render").as_deref(), Some("report"));
    assert_eq!(output_key("notify"), None);
}

#[test]
fn edge_branch_markers() {
    let workflow = parse::parse(include_str!("fixtures/linear_workflow.json")).unwrap();
    let branches: Vec<Option<Branch>> = workflow.outgoing("check").map(|e| e.branch()).collect();
    assert_eq!(branches, [Some(Branch::True), Some(Branch::False)]);
    assert_eq!(workflow.outgoing("start").next().and_then(|e| e.branch()), None);
}

#[test]
fn export_round_trip_preserves_workflow() {
    let original = parse::parse(include_str!("fixtures/linear_workflow.json")).unwrap();
    let exported = parse::export(&original).unwrap();
    let reparsed = parse::parse(&exported).unwrap();
    assert_eq!(reparsed, original);
}

#[test]
fn export_uses_wire_names() {
    let workflow = parse::parse(include_str!("fixtures/linear_workflow.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&parse::export(&workflow).unwrap()).unwrap();

    assert_eq!(value["nodes"][1]["type"], "http_request");
    assert_eq!(value["nodes"][1]["data"]["config"]["timeoutMs"], 10000.0);
    assert_eq!(value["nodes"][3]["data"]["config"]["op"], "==");
    assert_eq!(value["edges"][3]["sourceHandle"], "TRUE");
    // Absent optional edge fields stay absent.
    assert!(value["edges"][0].get("label").is_none());
}

#[test]
fn unknown_node_type_fails() {
    let err = parse::parse(include_str!("fixtures/malformed.json")).unwrap_err();
    assert_eq!(err.code, "P001");
    assert!(err.message.starts_with("Failed to parse workflow JSON"));
}

#[test]
fn import_malformed_is_a_no_op() {
    assert!(parse::import(include_str!("fixtures/malformed.json")).is_none());
    assert!(parse::import("").is_none());
    assert!(parse::import(include_str!("fixtures/cycle.json")).is_some());
}
