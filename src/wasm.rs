//! WASM entry points for the browser editor.

use wasm_bindgen::prelude::*;

use crate::codegen;
use crate::error::Diagnostic;
use crate::factory;
use crate::parse::types::{NodeType, Position, WorkflowNode};

/// Validate a workflow JSON: parse + graph validation.
/// Returns a JSON array of diagnostics; empty means the workflow may run.
#[wasm_bindgen]
pub fn validate_workflow(json: &str) -> JsValue {
    let result = validate_workflow_inner(json);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn validate_workflow_inner(json: &str) -> Vec<DiagnosticDto> {
    match crate::parse::parse(json) {
        Ok(workflow) => crate::validate::validate_workflow(&workflow)
            .into_iter()
            .map(DiagnosticDto::from)
            .collect(),
        Err(diagnostic) => vec![DiagnosticDto::from(diagnostic)],
    }
}

/// Create a node of `node_type` at (x, y) with a fresh id and default config.
/// Returns `null` for an unknown type.
#[wasm_bindgen]
pub fn make_node(node_type: &str, x: f64, y: f64) -> JsValue {
    match make_node_inner(node_type, x, y) {
        Some(node) => serde_wasm_bindgen::to_value(&node).unwrap_or(JsValue::NULL),
        None => JsValue::NULL,
    }
}

fn make_node_inner(node_type: &str, x: f64, y: f64) -> Option<WorkflowNode> {
    let node_type = node_type.parse::<NodeType>().ok()?;
    Some(factory::make_node(node_type, Position::new(x, y)))
}

/// Full pipeline: parse → validate → codegen.
/// Returns a JSON object with either `source` (success) or `errors` (failure).
#[wasm_bindgen]
pub fn generate_code(json: &str) -> JsValue {
    let result = generate_code_inner(json);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn generate_code_inner(json: &str) -> GenerateResult {
    let workflow = match crate::parse::parse(json) {
        Ok(w) => w,
        Err(diagnostic) => return GenerateResult::Errors(vec![diagnostic.into()]),
    };

    let diagnostics = crate::validate::validate_workflow(&workflow);
    if !diagnostics.is_empty() {
        return GenerateResult::Errors(diagnostics.into_iter().map(DiagnosticDto::from).collect());
    }

    GenerateResult::Success {
        class_name: codegen::class_name(&workflow.name),
        source: codegen::generate(&workflow),
    }
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiagnosticDto {
    code: String,
    category: String,
    message: String,
    node_id: Option<String>,
}

impl From<Diagnostic> for DiagnosticDto {
    fn from(d: Diagnostic) -> Self {
        DiagnosticDto {
            code: d.code,
            message: d.message,
            category: d.category.to_string(),
            node_id: d.node_id,
        }
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "status")]
enum GenerateResult {
    #[serde(rename = "success", rename_all = "camelCase")]
    Success { class_name: String, source: String },
    #[serde(rename = "errors")]
    Errors(Vec<DiagnosticDto>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparseable_json_is_one_diagnostic() {
        let result = validate_workflow_inner("nope");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].code, "P001");
        assert_eq!(result[0].category, "Integration");
        assert!(result[0].message.starts_with("Failed to parse workflow JSON"));
    }

    #[test]
    fn seed_workflow_generates() {
        let json = crate::parse::export(&factory::seed_etl_workflow()).unwrap();
        assert!(validate_workflow_inner(&json).is_empty());
        match generate_code_inner(&json) {
            GenerateResult::Success { class_name, source } => {
                assert_eq!(class_name, "EtlWorkflow");
                assert!(source.contains("public class EtlWorkflow"));
            }
            GenerateResult::Errors(errors) => panic!("unexpected errors: {errors:?}"),
        }
    }

    #[test]
    fn invalid_workflow_does_not_generate() {
        let json = crate::parse::export(&factory::empty_workflow()).unwrap();
        let GenerateResult::Errors(errors) = generate_code_inner(&json) else {
            panic!("empty workflow must not generate");
        };
        let codes: Vec<&str> = errors.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, ["S001", "S002"]);
        assert_eq!(
            errors[0].message,
            "Workflow must have exactly 1 START node, found 0"
        );
    }

    #[test]
    fn make_node_rejects_unknown_type() {
        assert!(make_node_inner("loop", 0.0, 0.0).is_none());
        let node = make_node_inner("conditional", 10.0, 20.0).unwrap();
        assert_eq!(node.node_type(), NodeType::Conditional);
    }
}
