//! C++ front-end.

use tree_sitter::{Language, Node};

use super::lower::{node_text, significant_children, Grammar, HandlerParts, Role};

pub struct CppGrammar {
    language: Language,
}

impl CppGrammar {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_cpp::LANGUAGE.into(),
        }
    }
}

impl Default for CppGrammar {
    fn default() -> Self {
        Self::new()
    }
}

/// Name declared by a (possibly reference or pointer) declarator.
fn declarator_name(node: Node, source: &[u8]) -> Option<String> {
    if node.kind() == "identifier" {
        return Some(node_text(node, source).to_string());
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.named_children(&mut cursor).collect();
    children
        .into_iter()
        .find_map(|child| declarator_name(child, source))
}

impl Grammar for CppGrammar {
    fn language_id(&self) -> &'static str {
        "cpp"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["cpp", "cc", "cxx", "hpp", "hh", "hxx"]
    }

    fn language(&self) -> &Language {
        &self.language
    }

    fn role(&self, node: Node) -> Role {
        match node.kind() {
            "try_statement" => Role::Try,
            "catch_clause" => Role::Handler,
            "compound_statement" => Role::Block,
            "expression_statement" => Role::ExpressionStatement,
            "throw_statement" => Role::Throw,
            "comment" => Role::Comment,
            _ => Role::Other,
        }
    }

    fn handler_parts<'t>(&self, node: Node<'t>, source: &[u8]) -> HandlerParts<'t> {
        let mut exception_types = Vec::new();
        let mut binding = None;

        if let Some(params) = node.child_by_field_name("parameters") {
            let mut cursor = params.walk();
            let declaration = params
                .named_children(&mut cursor)
                .find(|c| c.kind() == "parameter_declaration");

            // catch (...) has no declaration and leaves the filter list empty
            if let Some(decl) = declaration {
                if let Some(ty) = decl.child_by_field_name("type") {
                    exception_types.push(node_text(ty, source).to_string());
                }
                binding = decl
                    .child_by_field_name("declarator")
                    .and_then(|d| declarator_name(d, source));
            }
        }

        HandlerParts {
            exception_types,
            binding,
            body: node.child_by_field_name("body"),
        }
    }

    fn is_rethrow(&self, node: Node, _source: &[u8], _binding: Option<&str>) -> bool {
        // Only `throw;` re-raises the in-flight exception. `throw e;` throws a
        // copy, sliced to the static type of `e`.
        significant_children(self, node).is_empty()
    }
}
