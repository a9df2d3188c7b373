//! Struct definitions keyed by name.

use std::collections::BTreeMap;

use super::Definition;
use crate::analysis::{DeclarationKind, FileFacts};

/// Every struct declared in a file, with its verbatim text.
///
/// A repeated name keeps the last declaration parsed.
pub fn structs_map(facts: &FileFacts) -> BTreeMap<String, Definition> {
    let mut map = BTreeMap::new();
    for decl in facts.declarations_by_kind(DeclarationKind::Struct) {
        let definition = Definition::from_declaration(facts, decl).with_raw_text(&decl.text);
        map.insert(decl.name.clone(), definition);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::GoParser;
    use std::path::Path;

    #[test]
    fn test_structs_map_skips_non_structs() {
        let source = r#"
package v1

type HelloRequest struct {
    Name string
}

type HelloReply struct {
    Message string
}

type GreeterClient interface {
    SayHello() error
}

type Code int32
"#;
        let facts = GoParser::new()
            .unwrap()
            .parse(Path::new("greeter.pb.go"), source.as_bytes())
            .unwrap();
        let map = structs_map(&facts);

        assert_eq!(map.len(), 2);
        let request = &map["HelloRequest"];
        assert_eq!(request.package, "v1");
        assert_eq!(
            request.raw_text.as_deref(),
            Some("type HelloRequest struct {\n    Name string\n}")
        );
        assert!(map["HelloReply"].raw_text.as_ref().unwrap().contains("Message string"));
    }
}
