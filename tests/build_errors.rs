//! Failure behavior: every error aborts the build, no partial program is returned

use es3_ast::es3::building::{build_ast, AstBuilder, BuildError};
use es3_ast::es3::config::BuildConfig;
use es3_ast::es3::loader::{LoaderError, SourceLoader};
use es3_ast::es3::parsing::{parse_source, NodeKind, ParseNode, DEFAULT_MAX_DEPTH};
use es3_ast::es3::transforms::TransformError;
use rstest::rstest;

fn build_error(source: &str) -> BuildError {
    let tree = parse_source(source).unwrap();
    build_ast(tree, &BuildConfig::default()).unwrap_err()
}

fn failed_stage(source: &str) -> (String, String) {
    match SourceLoader::from_string(source).build() {
        Err(LoaderError::Transform {
            error: TransformError::StageFailed { stage, message, .. },
            ..
        }) => (stage, message),
        other => panic!("expected a stage failure for {:?}, got {:?}", source, other),
    }
}

#[test]
fn test_unsupported_construct() {
    let err = build_error("a; debugger; b;");
    assert!(matches!(
        err,
        BuildError::UnsupportedConstruct { kind: "DEBUGGER", .. }
    ));
    assert_eq!(err.span().range(), 3..11);
}

#[test]
fn test_structural_node_out_of_place() {
    let stray = ParseNode::imaginary(NodeKind::Args, 0..2, vec![]);
    let err = AstBuilder::new().build(stray).unwrap_err();
    assert_eq!(err.to_string(), "Unsupported construct: ARGS");
}

#[rstest]
#[case::exponent_without_dot("1e5")]
#[case::integer_overflow("2147483648")]
#[case::hex_overflow("0xFFFFFFFF")]
fn test_number_literal_failures(#[case] source: &str) {
    match build_error(source) {
        BuildError::LiteralParseFailure { what, text, .. } => {
            assert_eq!(what, "number");
            assert_eq!(text, source);
        }
        other => panic!("expected a literal failure, got {:?}", other),
    }
}

#[rstest]
#[case::expression("l: x = 1;", "ASSIGN")]
#[case::declaration("l: var a;", "VAR")]
#[case::break_statement("l: break;", "BREAK")]
fn test_labels_on_unlabelable_statements(#[case] source: &str, #[case] kind: &str) {
    match build_error(source) {
        BuildError::InvalidLabelTarget { kind: found, .. } => assert_eq!(found, kind),
        other => panic!("expected an invalid label target, got {:?}", other),
    }
}

#[test]
fn test_malformed_node() {
    let node = ParseNode::imaginary(NodeKind::While, 0..5, vec![]);
    let err = AstBuilder::new().build(node).unwrap_err();
    assert_eq!(err.to_string(), "Malformed WHILE node: missing first operand");
}

#[test]
fn test_errors_surface_through_the_pipeline() {
    let (stage, message) = failed_stage("debugger");
    assert_eq!(stage, "Building");
    assert_eq!(message, "Unsupported construct: DEBUGGER");

    let (stage, message) = failed_stage("var 1;");
    assert_eq!(stage, "Parsing");
    assert_eq!(message, "Expected identifier, found '1' at byte 4");

    let (stage, _) = failed_stage("a # b");
    assert_eq!(stage, "Parsing");
}

#[test]
fn test_loader_reports_position() {
    let err = SourceLoader::from_string("var a;\n\nx = 1e5;")
        .build()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "3:5: Stage 'Building' failed: Invalid number literal: 1e5"
    );
}

#[test]
fn test_nesting_limit() {
    let config = BuildConfig::with_max_depth(64);
    let source = format!("{}a{}", "[".repeat(200), "]".repeat(200));

    let err = SourceLoader::from_string(source.as_str())
        .build_with(config.clone())
        .unwrap_err();
    assert!(err.to_string().contains("Nesting deeper than 64 levels"));

    let shallow = format!("{}a{}", "[".repeat(5), "]".repeat(5));
    assert!(SourceLoader::from_string(shallow).build_with(config).is_ok());
}

fn nested_arrays(levels: usize) -> String {
    format!("{}1{}", "[".repeat(levels), "]".repeat(levels))
}

fn nested_blocks(levels: usize) -> String {
    format!("{}{}", "{".repeat(levels), "}".repeat(levels))
}

// The statement and its expression take two levels before the first array.
#[rstest]
#[case::arrays(nested_arrays(DEFAULT_MAX_DEPTH - 2))]
#[case::blocks(nested_blocks(DEFAULT_MAX_DEPTH))]
fn test_default_depth_limit_builds_on_a_test_thread(#[case] source: String) {
    let nodes = SourceLoader::from_string(source).build().unwrap();
    assert_eq!(nodes.len(), 1);
}

#[rstest]
#[case::arrays(nested_arrays(DEFAULT_MAX_DEPTH - 1))]
#[case::blocks(nested_blocks(DEFAULT_MAX_DEPTH + 1))]
fn test_one_level_past_the_default_limit(#[case] source: String) {
    let (stage, message) = failed_stage(&source);
    assert_eq!(stage, "Parsing");
    assert!(
        message.starts_with(&format!("Nesting deeper than {} levels", DEFAULT_MAX_DEPTH)),
        "unexpected message: {}",
        message
    );
}

#[test]
fn test_deep_tree_built_directly() {
    let tree = parse_source(&nested_arrays(DEFAULT_MAX_DEPTH - 2)).unwrap();
    let nodes = build_ast(tree, &BuildConfig::default()).unwrap();
    assert_eq!(nodes.len(), 1);
}
