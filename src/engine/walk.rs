//! Traversal of a syntax tree in search of try constructs.

use crate::syntax::{HandlerClause, Statement, StatementKind, SyntaxTree, TryConstruct};

use super::classify::{classify, Verdict};

/// A classified handler clause and the construct it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct Finding<'a> {
    pub try_construct: &'a TryConstruct,
    pub clause: &'a HandlerClause,
    pub verdict: Verdict,
}

enum Work<'a> {
    Statement(&'a Statement),
    Clause(&'a TryConstruct, &'a HandlerClause),
}

/// Iterator over every classifiable handler clause in a tree.
///
/// Clauses come out in source order. Constructs nested inside a try body
/// come before that construct's own handlers, and each handler comes before
/// anything nested inside it. Clauses without a body and constructs without
/// handlers are skipped.
pub struct Classified<'a> {
    path: &'a str,
    stack: Vec<Work<'a>>,
}

impl<'a> Classified<'a> {
    fn new(tree: &'a SyntaxTree) -> Self {
        let mut walker = Self {
            path: &tree.path,
            stack: Vec::new(),
        };
        walker.push_statements(&tree.statements);
        walker
    }

    fn push_statements(&mut self, statements: &'a [Statement]) {
        self.stack.extend(statements.iter().rev().map(Work::Statement));
    }

    fn push_try(&mut self, construct: &'a TryConstruct) {
        if let Some(finalizer) = &construct.finalizer {
            self.push_statements(finalizer);
        }
        if let Some(orelse) = &construct.orelse {
            self.push_statements(orelse);
        }

        if !construct.has_handlers() {
            tracing::debug!(
                path = self.path,
                line = construct.span.start_line,
                "skipping try construct without handler clauses"
            );
        }

        for clause in construct.handlers.iter().rev() {
            if let Some(body) = &clause.body {
                self.push_statements(body);
            }
            self.stack.push(Work::Clause(construct, clause));
        }

        self.push_statements(&construct.body);
    }
}

impl<'a> Iterator for Classified<'a> {
    type Item = Finding<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(work) = self.stack.pop() {
            match work {
                Work::Statement(stmt) => match &stmt.kind {
                    StatementKind::Try(construct) => self.push_try(construct),
                    _ => self.push_statements(stmt.nested()),
                },
                Work::Clause(try_construct, clause) => {
                    if clause.body.is_none() {
                        tracing::debug!(
                            path = self.path,
                            line = clause.span.start_line,
                            "skipping handler clause without a body"
                        );
                        continue;
                    }
                    return Some(Finding {
                        try_construct,
                        clause,
                        verdict: classify(clause),
                    });
                }
            }
        }
        None
    }
}

/// Hiding clauses only; see [`Classified`] for ordering.
pub struct Walk<'a> {
    inner: Classified<'a>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = Finding<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.by_ref().find(|f| f.verdict.is_hiding())
    }
}

/// Walk a tree, yielding every hiding handler clause.
pub fn walk(tree: &SyntaxTree) -> Walk<'_> {
    Walk {
        inner: Classified::new(tree),
    }
}

/// Walk a tree, yielding every handler clause with its verdict.
pub fn classify_all(tree: &SyntaxTree) -> Classified<'_> {
    Classified::new(tree)
}
