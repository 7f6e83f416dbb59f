//! Codegen: Workflow → a standalone Java class for the execution engine.
//!
//! Public API: `generate(workflow) -> String`
//!
//! The class walks the graph as a `switch` state machine: `current` holds
//! the id of the node to run next, each node is one `case`, and the loop
//! ends when `current` becomes `null`. Node behavior is delegated to the
//! engine's `Steps` runtime helpers. Output depends only on the input, so
//! regenerating an unchanged workflow yields identical text.

mod literal;
mod writer;

use crate::parse::types::*;
use writer::CodeWriter;

pub use literal::class_name;

/// Generate Java source for a validated workflow.
pub fn generate(workflow: &Workflow) -> String {
    let mut w = CodeWriter::new();

    w.line("// Generated by miniflow. Do not edit.");
    w.line(&format!(
        "// Workflow: {} ({})",
        literal::comment(&workflow.name),
        literal::comment(&workflow.id)
    ));
    w.blank();
    w.line("import java.util.HashMap;");
    w.line("import java.util.Map;");
    w.blank();

    w.block_open(&format!("public class {}", class_name(&workflow.name)));
    w.blank();

    w.block_open("public static void main(String[] args) throws Exception");
    w.line("Map<String, Object> context = new HashMap<>();");
    w.line("run(context);");
    w.block_close();
    w.blank();

    emit_run(workflow, &mut w);

    w.block_close();
    w.finish()
}

fn emit_run(workflow: &Workflow, w: &mut CodeWriter) {
    let start = workflow.nodes.iter().find(|n| n.is_start()).map(|n| n.id());

    w.block_open("public static void run(Map<String, Object> context) throws Exception");
    w.line(&format!("String current = {};", literal::optional_string(start)));
    w.block_open("while (current != null)");
    w.block_open("switch (current)");

    for node in &workflow.nodes {
        w.block_open(&format!("case {}:", literal::string(node.id())));
        w.line(&format!("// {}", literal::comment(node.label())));
        emit_node(workflow, node, w);
        w.line("break;");
        w.block_close();
    }

    w.line("default:");
    w.indent();
    w.line("throw new IllegalStateException(\"Unknown node: \" + current);");
    w.dedent();

    w.block_close();
    w.block_close();
    w.block_close();
}

fn emit_node(workflow: &Workflow, node: &WorkflowNode, w: &mut CodeWriter) {
    match node {
        WorkflowNode::Start(_) => {
            emit_next(workflow, node.id(), w);
        }
        WorkflowNode::End(_) => {
            w.line("current = null;");
        }
        WorkflowNode::Command(n) => {
            let cfg = &n.data.config;
            w.line(&format!(
                "Steps.command(context, {}, {}, {});",
                literal::string(&cfg.command),
                literal::string(&cfg.args),
                literal::optional_string(cfg.output_key.as_deref().filter(|k| !k.trim().is_empty()))
            ));
            emit_next(workflow, node.id(), w);
        }
        WorkflowNode::HttpRequest(n) => {
            let cfg = &n.data.config;
            w.line(&format!(
                "Steps.http(context, {}, {}, {}, {}, {}, {}, {}, {});",
                literal::optional_string(cfg.method.map(|m| m.as_str())),
                literal::string(&cfg.url),
                literal::string(&cfg.headers_json),
                literal::string(&cfg.query_params_json),
                literal::string(&cfg.body_json),
                literal::number(cfg.timeout_ms),
                literal::number(cfg.retries),
                literal::string(&cfg.context_key)
            ));
            emit_next(workflow, node.id(), w);
        }
        WorkflowNode::Conditional(n) => {
            let cfg = &n.data.config;
            w.line(&format!(
                "boolean branch = Steps.compare(context, {}, {}, {});",
                literal::string(&cfg.left_path),
                literal::string(cfg.op.as_str()),
                literal::string(&cfg.right_value)
            ));
            let on_true = branch_target(workflow, node.id(), &Branch::True);
            let on_false = branch_target(workflow, node.id(), &Branch::False);
            w.line(&format!(
                "current = branch ? {} : {};",
                literal::optional_string(on_true),
                literal::optional_string(on_false)
            ));
        }
    }
}

/// First outgoing edge in edge-list order, as the engine resolves it.
fn emit_next(workflow: &Workflow, node_id: &str, w: &mut CodeWriter) {
    let next = workflow.outgoing(node_id).next().map(|e| e.target.as_str());
    w.line(&format!("current = {};", literal::optional_string(next)));
}

fn branch_target<'a>(workflow: &'a Workflow, node_id: &'a str, branch: &Branch) -> Option<&'a str> {
    workflow
        .outgoing(node_id)
        .find(|e| e.branch().as_ref() == Some(branch))
        .map(|e| e.target.as_str())
}
