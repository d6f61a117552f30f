//! JSON serialization of the AST
//!
//! Nodes are internally tagged: every object has a `"type"` key naming its variant, next to
//! the variant's fields and its `"span"`.

use crate::es3::ast::Node;

/// Pretty-printed JSON for one node
pub fn to_json(node: &Node) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(node)
}

/// Pretty-printed JSON array for the top-level nodes of a program
pub fn to_json_program(nodes: &[Node]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::es3::loader::SourceLoader;
    use serde_json::Value;

    #[test]
    fn test_variant_tag_and_fields() {
        let nodes = SourceLoader::from_string("x = 'hi'").build().unwrap();
        let value: Value = serde_json::from_str(&to_json(&nodes[0]).unwrap()).unwrap();

        assert_eq!(value["type"], "Assign");
        assert_eq!(value["target"]["type"], "Identifier");
        assert_eq!(value["target"]["name"], "x");
        assert_eq!(value["value"]["value"], "hi");
        assert_eq!(value["value"]["quote"], "'");
        assert_eq!(value["span"]["start"], 0);
        assert_eq!(value["span"]["end"], 8);
    }

    #[test]
    fn test_private_attributes_are_serialized() {
        let nodes = SourceLoader::from_string("var a; l: while (a) {}").build().unwrap();
        let value: Value = serde_json::from_str(&to_json_program(&nodes).unwrap()).unwrap();

        assert_eq!(value[0]["is_definition"], true);
        assert_eq!(value[1]["label"], "l");
        assert_eq!(value[1]["style"], "PreTest");
    }
}
