//! Python front-end.

use tree_sitter::{Language, Node};

use super::lower::{node_text, significant_children, Grammar, HandlerParts, Role};

pub struct PythonGrammar {
    language: Language,
}

impl PythonGrammar {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_python::LANGUAGE.into(),
        }
    }

    /// Types named by an `except` filter expression.
    fn filter_types(node: Node, source: &[u8], out: &mut Vec<String>) {
        match node.kind() {
            // except (KeyError, IndexError):
            "tuple" | "parenthesized_expression" => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    Self::filter_types(child, source, out);
                }
            }
            "comment" => {}
            _ => out.push(node_text(node, source).to_string()),
        }
    }
}

impl Default for PythonGrammar {
    fn default() -> Self {
        Self::new()
    }
}

impl Grammar for PythonGrammar {
    fn language_id(&self) -> &'static str {
        "python"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["py", "pyi"]
    }

    fn language(&self) -> &Language {
        &self.language
    }

    fn role(&self, node: Node) -> Role {
        match node.kind() {
            "try_statement" => Role::Try,
            "except_clause" | "except_group_clause" => Role::Handler,
            // `else:` also belongs to if/for/while; only the try form is special
            "else_clause" if node.parent().map(|p| p.kind()) == Some("try_statement") => {
                Role::Else
            }
            "finally_clause" => Role::Finally,
            "block" => Role::Block,
            "expression_statement" => Role::ExpressionStatement,
            "raise_statement" => Role::Throw,
            "comment" => Role::Comment,
            _ => Role::Other,
        }
    }

    fn handler_parts<'t>(&self, node: Node<'t>, source: &[u8]) -> HandlerParts<'t> {
        let mut exception_types = Vec::new();
        let mut binding = None;
        let mut body = None;
        let mut after_as = false;

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if !child.is_named() {
                if matches!(child.kind(), "as" | ",") {
                    after_as = true;
                }
                continue;
            }
            match child.kind() {
                "block" => body = Some(child),
                "comment" => {}
                "as_pattern" => {
                    if let Some(filter) = child.named_child(0) {
                        Self::filter_types(filter, source, &mut exception_types);
                    }
                    binding = child
                        .child_by_field_name("alias")
                        .map(|alias| node_text(alias, source).to_string());
                }
                _ if after_as => binding = Some(node_text(child, source).to_string()),
                _ => Self::filter_types(child, source, &mut exception_types),
            }
        }

        HandlerParts {
            exception_types,
            binding,
            body,
        }
    }

    fn is_rethrow(&self, node: Node, source: &[u8], binding: Option<&str>) -> bool {
        let mut cursor = node.walk();
        let has_cause = node.children(&mut cursor).any(|c| c.kind() == "from");
        if has_cause {
            return false;
        }

        match significant_children(self, node).first() {
            // bare `raise`
            None => true,
            Some(op) => match binding {
                Some(name) => op.kind() == "identifier" && node_text(*op, source) == name,
                None => false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::engine::{classify_all, walk, Verdict};
    use crate::frontend::FrontEnd;
    use crate::syntax::{StatementKind, SyntaxTree};

    fn parse(source: &str) -> SyntaxTree {
        PythonGrammar::new()
            .parse(Path::new("sample.py"), source.as_bytes())
            .expect("should lower")
    }

    fn first_kind(tree: &SyntaxTree) -> Option<StatementKind> {
        classify_all(tree)
            .next()
            .and_then(|f| f.clause.statements().and_then(|s| s.first()).map(|s| s.kind.clone()))
    }

    #[test]
    fn test_bare_raise_is_rethrow() {
        let tree = parse(
            r#"
def load(path):
    try:
        return read(path)
    except OSError as exc:
        logger.exception("read failed: %s", exc)
        raise
"#,
        );
        let finding = classify_all(&tree).next().expect("one handler");
        assert_eq!(finding.verdict, Verdict::Propagating);
        assert_eq!(finding.clause.binding.as_deref(), Some("exc"));
        assert_eq!(finding.clause.exception_types, vec!["OSError"]);
        let last = finding.clause.statements().and_then(|s| s.last()).map(|s| &s.kind);
        assert_eq!(last, Some(&StatementKind::Rethrow));
    }

    #[test]
    fn test_raise_bound_name_is_rethrow() {
        let tree = parse(
            r#"
try:
    run()
except ValueError as err:
    raise err
"#,
        );
        assert_eq!(first_kind(&tree), Some(StatementKind::Rethrow));
    }

    #[test]
    fn test_raise_from_is_throw() {
        let tree = parse(
            r#"
try:
    run()
except (KeyError, IndexError) as err:
    raise LookupFailed("missing") from err
"#,
        );
        let finding = classify_all(&tree).next().expect("one handler");
        assert_eq!(finding.verdict, Verdict::Propagating);
        assert_eq!(finding.clause.exception_types, vec!["KeyError", "IndexError"]);
        assert_eq!(first_kind(&tree), Some(StatementKind::Throw));
    }

    #[test]
    fn test_pass_and_default_return_hide() {
        let tree = parse(
            r#"
def settings():
    try:
        return load()
    except Exception:
        pass
    try:
        return load()
    except:
        log.warning("falling back")
        return {}
"#,
        );
        let lines: Vec<_> = walk(&tree).map(|f| f.clause.span.start_line).collect();
        assert_eq!(lines, vec![5, 9]);
    }

    #[test]
    fn test_else_and_finally_are_walked() {
        let tree = parse(
            r#"
try:
    a()
except RuntimeError:
    raise
else:
    try:
        b()
    except RuntimeError:
        pass
finally:
    try:
        c()
    except RuntimeError:
        pass
"#,
        );
        let lines: Vec<_> = walk(&tree).map(|f| f.clause.span.start_line).collect();
        assert_eq!(lines, vec![9, 14]);
        let outer = classify_all(&tree).next().expect("outer handler");
        assert!(outer.try_construct.orelse.is_some());
        assert!(outer.try_construct.finalizer.is_some());
    }

    #[test]
    fn test_conditional_raise_hides() {
        let tree = parse(
            r#"
try:
    run()
except Exception as e:
    if strict:
        raise
"#,
        );
        assert_eq!(walk(&tree).count(), 1);
    }
}
