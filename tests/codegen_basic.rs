use miniflow::codegen;
use miniflow::parse;

fn example_source() -> String {
    let workflow = parse::parse(include_str!("fixtures/linear_workflow.json")).unwrap();
    codegen::generate(&workflow)
}

#[test]
fn codegen_example_workflow() {
    insta::assert_snapshot!("linear_workflow_java", example_source());
}

#[test]
fn codegen_is_deterministic() {
    assert_eq!(example_source(), example_source());
}

#[test]
fn codegen_escapes_string_literals() {
    let source = example_source();
    assert!(source.contains(r#""{\"Accept\": \"application/json\"}""#));
    assert!(!source.contains("\t"));
}

#[test]
fn codegen_branches_on_conditionals() {
    let source = example_source();
    assert!(source.contains(r#"current = branch ? "end" : "notify";"#));
    assert_eq!(source.matches("case \"").count(), 6);
}

#[test]
fn codegen_class_name_from_workflow_name() {
    assert_eq!(codegen::class_name("Nightly report"), "NightlyReportWorkflow");
    assert!(example_source().contains("public class NightlyReportWorkflow {"));
}
