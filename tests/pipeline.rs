//! Pipeline, loader, config and output format integration

use es3_ast::es3::config::BuildConfig;
use es3_ast::es3::formats::{to_json_program, to_sexp_program};
use es3_ast::es3::loader::{Encoding, SourceLoader};
use es3_ast::es3::token::Token;
use es3_ast::es3::transforms::standard::{string_to_ast_with, STRING_TO_AST, TOKENIZATION};
use std::fs;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn test_fixture_program() {
    let nodes = SourceLoader::from_path(fixture("counter.js"), Encoding::Utf8)
        .unwrap()
        .build()
        .unwrap();
    insta::assert_snapshot!(
        to_sexp_program(&nodes),
        @"(function Counter (start) (block (= (. this count) start))) (= (. (. Counter prototype) next) (function _ () (block (return (= (. this count) (+ (. this count) 1)))))) (= (def c) (new Counter (0))) (post++ (. c count))"
    );
}

#[test]
fn test_fixture_config() {
    let config = BuildConfig::from_yaml_file(fixture("shallow.yaml")).unwrap();
    assert_eq!(config, BuildConfig::with_max_depth(16));

    let deep = format!("x = {}1{};", "(".repeat(40), ")".repeat(40));
    assert!(SourceLoader::from_string(deep.as_str()).build().is_ok());
    assert!(SourceLoader::from_string(deep).build_with(config).is_err());
}

#[test]
fn test_missing_config_keys_keep_defaults() {
    let config = BuildConfig::from_yaml_str("{}").unwrap();
    assert_eq!(config, BuildConfig::default());
}

#[test]
fn test_utf16_file() {
    let source = "var s = 'ü';";
    let mut bytes = vec![0xFF, 0xFE];
    for unit in source.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    let dir = std::env::temp_dir().join("es3-ast-pipeline-test");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("utf16.js");
    fs::write(&path, &bytes).unwrap();

    let loader = SourceLoader::from_path(&path, Encoding::Utf16Le).unwrap();
    assert_eq!(loader.source(), source);
    assert_eq!(to_sexp_program(&loader.build().unwrap()), "(= (def s) 'ü')");
}

#[test]
fn test_tokenization_keeps_trivia() {
    let tokens = TOKENIZATION
        .run("a /* c */\nb".to_string())
        .unwrap()
        .into_iter()
        .map(|(token, _)| token)
        .collect::<Vec<_>>();
    assert_eq!(
        tokens,
        vec![
            Token::Identifier,
            Token::BlockComment,
            Token::LineTerminator,
            Token::Identifier
        ]
    );
}

#[test]
fn test_static_and_configured_pipelines_agree() {
    let source = "if (a) { b = [1, 2.5, 'c']; }".to_string();
    let fixed = STRING_TO_AST.run(source.clone()).unwrap();
    let configured = string_to_ast_with(BuildConfig::default()).run(source).unwrap();
    assert_eq!(fixed, configured);
}

#[test]
fn test_json_output() {
    let nodes = SourceLoader::from_string("a.b").build().unwrap();
    insta::assert_snapshot!(to_json_program(&nodes).unwrap(), @r#"
    [
      {
        "type": "MemberAccess",
        "object": {
          "type": "Identifier",
          "name": "a",
          "is_definition": false,
          "span": {
            "start": 0,
            "end": 1
          }
        },
        "property": "b",
        "span": {
          "start": 0,
          "end": 3
        }
      }
    ]
    "#);
}
