//! JavaScript and TypeScript front-ends.
//!
//! The three grammars share node names for everything this rule cares
//! about; TypeScript only adds an optional type annotation on the catch
//! parameter.

use tree_sitter::{Language, Node};

use super::lower::{node_text, significant_children, Grammar, HandlerParts, Role};

pub struct EcmaGrammar {
    language_id: &'static str,
    extensions: &'static [&'static str],
    language: Language,
}

impl EcmaGrammar {
    pub fn javascript() -> Self {
        Self {
            language_id: "javascript",
            extensions: &["js", "jsx", "mjs", "cjs"],
            language: tree_sitter_javascript::LANGUAGE.into(),
        }
    }

    pub fn typescript() -> Self {
        Self {
            language_id: "typescript",
            extensions: &["ts", "mts", "cts"],
            language: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        }
    }

    pub fn tsx() -> Self {
        Self {
            language_id: "tsx",
            extensions: &["tsx"],
            language: tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

impl Grammar for EcmaGrammar {
    fn language_id(&self) -> &'static str {
        self.language_id
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        self.extensions
    }

    fn language(&self) -> &Language {
        &self.language
    }

    fn role(&self, node: Node) -> Role {
        match node.kind() {
            "try_statement" => Role::Try,
            "catch_clause" => Role::Handler,
            "finally_clause" => Role::Finally,
            "statement_block" => Role::Block,
            "expression_statement" => Role::ExpressionStatement,
            "throw_statement" => Role::Throw,
            "comment" | "html_comment" => Role::Comment,
            _ => Role::Other,
        }
    }

    fn handler_parts<'t>(&self, node: Node<'t>, source: &[u8]) -> HandlerParts<'t> {
        // Destructured parameters have no single name to rethrow.
        let binding = node
            .child_by_field_name("parameter")
            .filter(|p| p.kind() == "identifier")
            .map(|p| node_text(p, source).to_string());

        let exception_types = node
            .child_by_field_name("type")
            .map(|t| node_text(t, source).trim_start_matches(':').trim().to_string())
            .filter(|t| !t.is_empty())
            .into_iter()
            .collect();

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

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::engine::{classify_all, walk, Verdict};
    use crate::frontend::lower::MAX_NESTING;
    use crate::frontend::{FrontEnd, FrontEndError};
    use crate::syntax::{StatementKind, SyntaxTree};

    fn parse(grammar: EcmaGrammar, source: &str) -> SyntaxTree {
        grammar
            .parse(Path::new("sample"), source.as_bytes())
            .expect("should lower")
    }

    #[test]
    fn test_javascript_rethrow_and_swallow() {
        let tree = parse(
            EcmaGrammar::javascript(),
            r#"
async function load(id) {
  try {
    return await fetchUser(id);
  } catch (err) {
    console.error(err);
    throw err;
  }
}

function parse(text) {
  try {
    return JSON.parse(text);
  } catch {
    return {};
  }
}
"#,
        );
        let findings: Vec<_> = classify_all(&tree)
            .map(|f| (f.clause.span.start_line, f.verdict))
            .collect();
        assert_eq!(
            findings,
            vec![(5, Verdict::Propagating), (14, Verdict::Hiding)]
        );
    }

    #[test]
    fn test_javascript_callback_try_is_found() {
        let tree = parse(
            EcmaGrammar::javascript(),
            r#"
items.forEach((item) => {
  try {
    save(item);
  } catch (e) {
    if (e.retryable) {
      throw e;
    }
  }
});
"#,
        );
        let lines: Vec<_> = walk(&tree).map(|f| f.clause.span.start_line).collect();
        assert_eq!(lines, vec![5]);
    }

    #[test]
    fn test_typescript_annotated_catch() {
        let tree = parse(
            EcmaGrammar::typescript(),
            r#"
export function read(path: string): string | undefined {
  try {
    return fs.readFileSync(path, "utf8");
  } catch (e: unknown) {
    throw new ReadError(path, { cause: e });
  } finally {
    release(path);
  }
}
"#,
        );
        let finding = classify_all(&tree).next().expect("one handler");
        assert_eq!(finding.verdict, Verdict::Propagating);
        assert_eq!(finding.clause.binding.as_deref(), Some("e"));
        assert_eq!(finding.clause.exception_types, vec!["unknown"]);
        assert!(finding.try_construct.finalizer.is_some());
        let kind = finding.clause.statements().and_then(|s| s.first()).map(|s| &s.kind);
        assert_eq!(kind, Some(&StatementKind::Throw));
    }

    #[test]
    fn test_tsx_component_handler() {
        let tree = parse(
            EcmaGrammar::tsx(),
            r#"
export const View = () => {
  let data = null;
  try {
    data = load();
  } catch (e) {
    setError(e);
  }
  return <div>{data}</div>;
};
"#,
        );
        let lines: Vec<_> = walk(&tree).map(|f| f.clause.span.start_line).collect();
        assert_eq!(lines, vec![6]);
    }

    #[test]
    fn test_deeply_nested_expression_lowers() {
        let depth = 20_000;
        let source = format!(
            "const table = {}{};\ntry {{ x(); }} catch (e) {{}}\n",
            "[".repeat(depth),
            "]".repeat(depth)
        );
        let lines = std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(move || {
                let tree = parse(EcmaGrammar::javascript(), &source);
                walk(&tree)
                    .map(|f| f.clause.span.start_line)
                    .collect::<Vec<_>>()
            })
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(lines, vec![2]);
    }

    #[test]
    fn test_statement_nesting_limit() {
        let depth = MAX_NESTING + 10;
        let source = format!("{}x();{}", "{".repeat(depth), "}".repeat(depth));
        let err = EcmaGrammar::javascript()
            .parse(Path::new("deep.js"), source.as_bytes())
            .unwrap_err();
        assert!(matches!(
            err,
            FrontEndError::TooDeep {
                line: 1,
                limit: MAX_NESTING,
                ..
            }
        ));
    }
}
