//! Workflow record types: the serde target for the editor's workflow JSON.
//!
//! Field names are camelCase on the wire. When a node type or config shape
//! changes, review `factory`, `validate::node_rules` and `codegen` as well;
//! every match over `WorkflowNode` and `NodeConfig` is exhaustive on purpose.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::EditError;

// =============================================================================
// TOP-LEVEL WORKFLOW
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub nodes: Vec<WorkflowNode>,
    #[serde(default)]
    pub edges: Vec<WorkflowEdge>,
}

impl Workflow {
    pub fn node(&self, node_id: &str) -> Option<&WorkflowNode> {
        self.nodes.iter().find(|n| n.id() == node_id)
    }

    pub fn node_mut(&mut self, node_id: &str) -> Option<&mut WorkflowNode> {
        self.nodes.iter_mut().find(|n| n.id() == node_id)
    }

    pub fn outgoing<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a WorkflowEdge> {
        self.edges.iter().filter(move |e| e.source == node_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }
}

// =============================================================================
// EDGES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Canonical TRUE/FALSE tag on a conditional node's outgoing edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Branch {
    True,
    False,
    Other(String),
}

impl Branch {
    pub fn as_str(&self) -> &str {
        match self {
            Branch::True => "TRUE",
            Branch::False => "FALSE",
            Branch::Other(s) => s,
        }
    }

    fn from_marker(raw: &str) -> Option<Branch> {
        let marker = raw.trim().to_uppercase();
        match marker.as_str() {
            "" => None,
            "TRUE" => Some(Branch::True),
            "FALSE" => Some(Branch::False),
            _ => Some(Branch::Other(marker)),
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl WorkflowEdge {
    /// The edge's branch marker. This is the only place the marker is read:
    /// a non-blank `label` wins over `sourceHandle`, both compared
    /// case-insensitively.
    pub fn branch(&self) -> Option<Branch> {
        self.label
            .as_deref()
            .and_then(Branch::from_marker)
            .or_else(|| self.source_handle.as_deref().and_then(Branch::from_marker))
    }
}

// =============================================================================
// NODE TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Start,
    HttpRequest,
    Command,
    Conditional,
    End,
}

impl NodeType {
    pub const ALL: [NodeType; 5] = [
        NodeType::Start,
        NodeType::HttpRequest,
        NodeType::Command,
        NodeType::Conditional,
        NodeType::End,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Start => "start",
            NodeType::HttpRequest => "http_request",
            NodeType::Command => "command",
            NodeType::Conditional => "conditional",
            NodeType::End => "end",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown node type '{}'", s))
    }
}

// =============================================================================
// NODE BASE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData<C> {
    pub label: String,
    pub config: C,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeBase<C> {
    pub id: String,
    pub position: Position,
    pub data: NodeData<C>,
}

// =============================================================================
// WORKFLOW NODE — tagged union over the 5 node types
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WorkflowNode {
    #[serde(rename = "start")]
    Start(NodeBase<EmptyConfig>),
    #[serde(rename = "http_request")]
    HttpRequest(NodeBase<HttpRequestConfig>),
    #[serde(rename = "command")]
    Command(NodeBase<CommandConfig>),
    #[serde(rename = "conditional")]
    Conditional(NodeBase<ConditionalConfig>),
    #[serde(rename = "end")]
    End(NodeBase<EmptyConfig>),
}

impl WorkflowNode {
    /// Assemble a node from its parts. The variant is chosen by the config.
    pub fn new(id: String, position: Position, label: String, config: NodeConfig) -> Self {
        match config {
            NodeConfig::Start(config) => WorkflowNode::Start(base(id, position, label, config)),
            NodeConfig::HttpRequest(config) => {
                WorkflowNode::HttpRequest(base(id, position, label, config))
            }
            NodeConfig::Command(config) => WorkflowNode::Command(base(id, position, label, config)),
            NodeConfig::Conditional(config) => {
                WorkflowNode::Conditional(base(id, position, label, config))
            }
            NodeConfig::End(config) => WorkflowNode::End(base(id, position, label, config)),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            WorkflowNode::Start(n) => &n.id,
            WorkflowNode::HttpRequest(n) => &n.id,
            WorkflowNode::Command(n) => &n.id,
            WorkflowNode::Conditional(n) => &n.id,
            WorkflowNode::End(n) => &n.id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            WorkflowNode::Start(n) => &n.data.label,
            WorkflowNode::HttpRequest(n) => &n.data.label,
            WorkflowNode::Command(n) => &n.data.label,
            WorkflowNode::Conditional(n) => &n.data.label,
            WorkflowNode::End(n) => &n.data.label,
        }
    }

    pub fn position(&self) -> &Position {
        match self {
            WorkflowNode::Start(n) => &n.position,
            WorkflowNode::HttpRequest(n) => &n.position,
            WorkflowNode::Command(n) => &n.position,
            WorkflowNode::Conditional(n) => &n.position,
            WorkflowNode::End(n) => &n.position,
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            WorkflowNode::Start(_) => NodeType::Start,
            WorkflowNode::HttpRequest(_) => NodeType::HttpRequest,
            WorkflowNode::Command(_) => NodeType::Command,
            WorkflowNode::Conditional(_) => NodeType::Conditional,
            WorkflowNode::End(_) => NodeType::End,
        }
    }

    pub fn is_start(&self) -> bool {
        matches!(self, WorkflowNode::Start(_))
    }

    pub fn is_end(&self) -> bool {
        matches!(self, WorkflowNode::End(_))
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        let label = label.into();
        match self {
            WorkflowNode::Start(n) => n.data.label = label,
            WorkflowNode::HttpRequest(n) => n.data.label = label,
            WorkflowNode::Command(n) => n.data.label = label,
            WorkflowNode::Conditional(n) => n.data.label = label,
            WorkflowNode::End(n) => n.data.label = label,
        }
    }

    pub fn set_position(&mut self, position: Position) {
        match self {
            WorkflowNode::Start(n) => n.position = position,
            WorkflowNode::HttpRequest(n) => n.position = position,
            WorkflowNode::Command(n) => n.position = position,
            WorkflowNode::Conditional(n) => n.position = position,
            WorkflowNode::End(n) => n.position = position,
        }
    }

    /// Replace the node's config. The id and type never change, so a config
    /// of another type is rejected.
    pub fn set_config(&mut self, config: NodeConfig) -> Result<(), EditError> {
        match (self, config) {
            (WorkflowNode::Start(n), NodeConfig::Start(c)) => n.data.config = c,
            (WorkflowNode::HttpRequest(n), NodeConfig::HttpRequest(c)) => n.data.config = c,
            (WorkflowNode::Command(n), NodeConfig::Command(c)) => n.data.config = c,
            (WorkflowNode::Conditional(n), NodeConfig::Conditional(c)) => n.data.config = c,
            (WorkflowNode::End(n), NodeConfig::End(c)) => n.data.config = c,
            (node, config) => {
                return Err(EditError::ConfigTypeMismatch {
                    node_id: node.id().to_string(),
                    node_type: node.node_type().as_str(),
                    patch: config.node_type().as_str(),
                });
            }
        }
        Ok(())
    }
}

fn base<C>(id: String, position: Position, label: String, config: C) -> NodeBase<C> {
    NodeBase {
        id,
        position,
        data: NodeData { label, config },
    }
}

// =============================================================================
// NODE CONFIGS
// =============================================================================

/// Config of `start` and `end` nodes: always `{}` on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmptyConfig {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// Editor form values arrive loosely typed: a cleared numeric input is
/// written as `null` and a number may come back as a string. Anything that
/// is not a number reads as NaN, so validation reports it instead of the
/// whole record failing to parse.
fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    })
}

/// Unknown, blank or `null` methods read as `None`.
fn lenient_method<'de, D>(deserializer: D) -> Result<Option<HttpMethod>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim())),
        _ => None,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HttpRequestConfig {
    /// `None` when the stored method is `null`, blank or not one of the five.
    #[serde(deserialize_with = "lenient_method")]
    pub method: Option<HttpMethod>,
    pub url: String,
    pub headers_json: String,
    pub query_params_json: String,
    pub body_json: String,
    /// NaN when the stored value is not a number; serialized back as `null`.
    #[serde(deserialize_with = "lenient_number")]
    pub timeout_ms: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub retries: f64,
    pub context_key: String,
}

impl Default for HttpRequestConfig {
    fn default() -> Self {
        HttpRequestConfig {
            method: Some(HttpMethod::Get),
            url: String::new(),
            headers_json: "{}".into(),
            query_params_json: "{}".into(),
            body_json: "{}".into(),
            timeout_ms: 5000.0,
            retries: 0.0,
            context_key: "http".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommandConfig {
    pub command: String,
    pub args: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_key: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompareOp {
    #[default]
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "contains")]
    Contains,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::Contains => "contains",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConditionalConfig {
    pub left_path: String,
    pub op: CompareOp,
    pub right_value: String,
}

/// A config detached from its node, keyed by node type.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeConfig {
    Start(EmptyConfig),
    HttpRequest(HttpRequestConfig),
    Command(CommandConfig),
    Conditional(ConditionalConfig),
    End(EmptyConfig),
}

impl NodeConfig {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeConfig::Start(_) => NodeType::Start,
            NodeConfig::HttpRequest(_) => NodeType::HttpRequest,
            NodeConfig::Command(_) => NodeType::Command,
            NodeConfig::Conditional(_) => NodeType::Conditional,
            NodeConfig::End(_) => NodeType::End,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(handle: Option<&str>, label: Option<&str>) -> WorkflowEdge {
        WorkflowEdge {
            id: "e".into(),
            source: "a".into(),
            target: "b".into(),
            source_handle: handle.map(Into::into),
            label: label.map(Into::into),
        }
    }

    #[test]
    fn branch_prefers_label() {
        assert_eq!(edge(Some("FALSE"), Some("true")).branch(), Some(Branch::True));
    }

    #[test]
    fn branch_falls_back_to_handle_when_label_blank() {
        assert_eq!(edge(Some("false"), Some("  ")).branch(), Some(Branch::False));
        assert_eq!(edge(Some(" False "), None).branch(), Some(Branch::False));
    }

    #[test]
    fn branch_absent_or_other() {
        assert_eq!(edge(None, None).branch(), None);
        assert_eq!(
            edge(Some("maybe"), None).branch(),
            Some(Branch::Other("MAYBE".into()))
        );
    }

    #[test]
    fn node_type_from_str() {
        assert_eq!("http_request".parse::<NodeType>(), Ok(NodeType::HttpRequest));
        assert!("loop".parse::<NodeType>().is_err());
    }

    #[test]
    fn set_config_rejects_other_type() {
        let mut node = WorkflowNode::new(
            "n1".into(),
            Position::new(0.0, 0.0),
            "Run".into(),
            NodeConfig::Command(CommandConfig::default()),
        );
        let err = node
            .set_config(NodeConfig::Conditional(ConditionalConfig::default()))
            .unwrap_err();
        assert_eq!(
            err,
            EditError::ConfigTypeMismatch {
                node_id: "n1".into(),
                node_type: "command",
                patch: "conditional",
            }
        );
    }

    #[test]
    fn loose_http_fields_read_as_invalid_values() {
        let cfg: HttpRequestConfig = serde_json::from_str(
            r#"{"method": "delete", "timeoutMs": null, "retries": "2"}"#,
        )
        .unwrap();
        assert_eq!(cfg.method, Some(HttpMethod::Delete));
        assert!(cfg.timeout_ms.is_nan());
        assert_eq!(cfg.retries, 2.0);

        let cfg: HttpRequestConfig =
            serde_json::from_str(r#"{"method": "", "timeoutMs": "soon", "retries": {}}"#).unwrap();
        assert_eq!(cfg.method, None);
        assert!(cfg.timeout_ms.is_nan());
        assert!(cfg.retries.is_nan());
    }

    #[test]
    fn nan_timeout_serializes_as_null() {
        let cfg = HttpRequestConfig {
            timeout_ms: f64::NAN,
            method: None,
            ..HttpRequestConfig::default()
        };
        let json = serde_json::to_value(&cfg).unwrap();
        assert_eq!(json["timeoutMs"], serde_json::Value::Null);
        assert_eq!(json["method"], serde_json::Value::Null);
    }

    #[test]
    fn empty_config_serializes_as_empty_object() {
        let json = serde_json::to_string(&EmptyConfig {}).unwrap();
        assert_eq!(json, "{}");
    }
}
