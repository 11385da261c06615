//! Java front-end.

use tree_sitter::{Language, Node};

use super::lower::{node_text, significant_children, Grammar, HandlerParts, Role};

pub struct JavaGrammar {
    language: Language,
}

impl JavaGrammar {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_java::LANGUAGE.into(),
        }
    }
}

impl Default for JavaGrammar {
    fn default() -> Self {
        Self::new()
    }
}

impl Grammar for JavaGrammar {
    fn language_id(&self) -> &'static str {
        "java"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["java"]
    }

    fn language(&self) -> &Language {
        &self.language
    }

    fn role(&self, node: Node) -> Role {
        match node.kind() {
            "try_statement" | "try_with_resources_statement" => Role::Try,
            "catch_clause" => Role::Handler,
            "finally_clause" => Role::Finally,
            "block" => Role::Block,
            "expression_statement" => Role::ExpressionStatement,
            "throw_statement" => Role::Throw,
            "line_comment" | "block_comment" => Role::Comment,
            _ => Role::Other,
        }
    }

    fn handler_parts<'t>(&self, node: Node<'t>, source: &[u8]) -> HandlerParts<'t> {
        let mut exception_types = Vec::new();
        let mut binding = None;

        let mut cursor = node.walk();
        let param = node
            .named_children(&mut cursor)
            .find(|c| c.kind() == "catch_formal_parameter");

        if let Some(param) = param {
            binding = param
                .child_by_field_name("name")
                .map(|n| node_text(n, source).to_string());

            let mut param_cursor = param.walk();
            let catch_type = param
                .named_children(&mut param_cursor)
                .find(|c| c.kind() == "catch_type");
            if let Some(catch_type) = catch_type {
                // `catch (IOException | SQLException e)` lists alternatives
                let mut type_cursor = catch_type.walk();
                exception_types = catch_type
                    .named_children(&mut type_cursor)
                    .map(|t| node_text(t, source).to_string())
                    .collect();
            }
        }

        HandlerParts {
            exception_types,
            binding,
            body: node.child_by_field_name("body"),
        }
    }

    fn is_rethrow(&self, node: Node, source: &[u8], binding: Option<&str>) -> bool {
        let operand = significant_children(self, node).into_iter().next();
        match (operand, binding) {
            (Some(op), Some(name)) => op.kind() == "identifier" && node_text(op, source) == name,
            _ => false,
        }
    }
}
