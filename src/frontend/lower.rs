//! Generic lowering of tree-sitter parse trees into the syntax model.
//!
//! Each language supplies a [`Grammar`] that maps its native node kinds to
//! [`Role`]s and knows how to take a handler clause apart. Everything else
//! (traversal, span conversion, binding tracking for rethrow detection) is
//! shared here.
//!
//! Lowering keeps its own work stack instead of recursing per syntax level,
//! so expression nesting is bounded only by memory. Statement nesting is
//! capped at [`MAX_NESTING`] levels, since the model itself is a tree of
//! owned vectors.

use tree_sitter::{Language, Node, Tree};

use crate::syntax::{
    Expression, HandlerClause, Span, Statement, StatementKind, SyntaxTree, TryConstruct,
};

use super::FrontEndError;

/// What a native node means to the lowering pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Try,
    Handler,
    /// Block that runs when the try body raised nothing.
    Else,
    Finally,
    /// Statement container (`{ ... }`, indented suite).
    Block,
    ExpressionStatement,
    /// Throw or raise, in statement or expression position.
    Throw,
    Comment,
    Other,
}

/// Pieces of a native handler clause.
pub struct HandlerParts<'t> {
    pub exception_types: Vec<String>,
    pub binding: Option<String>,
    pub body: Option<Node<'t>>,
}

/// Language-specific knowledge needed to lower a tree.
pub trait Grammar: Send + Sync {
    /// Returns the language identifier (e.g., "java", "python").
    fn language_id(&self) -> &'static str;

    /// Returns file extensions this grammar handles (without dot).
    fn file_extensions(&self) -> &'static [&'static str];

    /// The tree-sitter language to parse with.
    fn language(&self) -> &Language;

    /// Classify a native node.
    fn role(&self, node: Node) -> Role;

    /// Split a handler node into filters, binding and body.
    fn handler_parts<'t>(&self, node: Node<'t>, source: &[u8]) -> HandlerParts<'t>;

    /// Whether a throw node re-raises the error bound to `binding`.
    fn is_rethrow(&self, node: Node, source: &[u8], binding: Option<&str>) -> bool;
}

/// Convert a tree-sitter node position into a [`Span`].
pub fn span_of(node: Node) -> Span {
    let start = node.start_position();
    let end = node.end_position();
    Span::new(
        node.start_byte(),
        node.end_byte(),
        (start.row + 1, start.column + 1), // tree-sitter is 0-indexed
        (end.row + 1, end.column + 1),
    )
}

/// Text of a node, empty if it is not valid UTF-8.
pub fn node_text<'s>(node: Node, source: &'s [u8]) -> &'s str {
    node.utf8_text(source).unwrap_or("")
}

/// Named children of `node` that are not comments.
pub fn significant_children<'t, G: Grammar + ?Sized>(
    grammar: &G,
    node: Node<'t>,
) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| grammar.role(*child) != Role::Comment)
        .collect()
}

/// Statement nesting deeper than this is rejected with
/// [`FrontEndError::TooDeep`]. Expression nesting has no limit, since
/// expressions are flattened into the statement that holds them.
pub const MAX_NESTING: usize = 1024;

/// The block of an `else` or `finally` clause.
fn clause_block<'t, G: Grammar + ?Sized>(grammar: &G, node: Node<'t>) -> Option<Node<'t>> {
    node.child_by_field_name("body").or_else(|| {
        significant_children(grammar, node)
            .into_iter()
            .find(|c| grammar.role(*c) == Role::Block)
    })
}

/// What to build once a frame has lowered all of its nodes.
enum Finish {
    Root,
    Other { span: Span, kind: String },
    Expression { span: Span },
    /// Statements that run as part of the try body.
    TryBody,
    Handler(HandlerClause),
    Else,
    Finally,
}

/// One container being lowered.
struct Frame<'t> {
    /// Nodes still to lower, last one first.
    pending: Vec<Node<'t>>,
    done: Vec<Statement>,
    /// Unremarkable nodes are searched through rather than kept.
    flatten: bool,
    finish: Finish,
}

/// A piece of a try construct still to lower, in source order.
enum Part<'t> {
    Statements(Vec<Node<'t>>),
    Handler(Node<'t>),
    Else(Node<'t>),
    Finally(Node<'t>),
}

struct PendingTry<'t> {
    node: Node<'t>,
    construct: TryConstruct,
    /// Last part first.
    parts: Vec<Part<'t>>,
}

/// Lowers one parsed file with an explicit work stack.
pub(crate) struct Lowerer<'g, 's, 't, G: Grammar + ?Sized> {
    grammar: &'g G,
    source: &'s [u8],
    path: &'s str,
    frames: Vec<Frame<'t>>,
    tries: Vec<PendingTry<'t>>,
    /// Bindings of the handler clauses enclosing the current node.
    bindings: Vec<Option<String>>,
}

impl<'g, 's, 't, G: Grammar + ?Sized> Lowerer<'g, 's, 't, G> {
    pub(crate) fn new(grammar: &'g G, source: &'s [u8], path: &'s str) -> Self {
        Self {
            grammar,
            source,
            path,
            frames: Vec::new(),
            tries: Vec::new(),
            bindings: Vec::new(),
        }
    }

    pub(crate) fn lower_tree(mut self, tree: &'t Tree) -> Result<SyntaxTree, FrontEndError> {
        let root = tree.root_node();
        let children = significant_children(self.grammar, root);
        self.open(root, children, false, Finish::Root)?;

        let mut statements = Vec::new();
        while let Some(frame) = self.frames.last_mut() {
            let Some(node) = frame.pending.pop() else {
                if let Some(lowered) = self.close()? {
                    statements = lowered;
                }
                continue;
            };
            if frame.flatten && self.grammar.role(node) == Role::Other {
                let nested = significant_children(self.grammar, node);
                frame.pending.extend(nested.into_iter().rev());
            } else {
                self.step(node)?;
            }
        }

        let mut lowered = SyntaxTree::new(self.path, self.grammar.language_id(), statements);
        lowered.has_parse_errors = root.has_error();
        if lowered.has_parse_errors {
            tracing::debug!(path = self.path, "source has syntax errors, lowered with recovery");
        }
        Ok(lowered)
    }

    /// Lower one node found in statement position.
    fn step(&mut self, node: Node<'t>) -> Result<(), FrontEndError> {
        let span = span_of(node);
        match self.grammar.role(node) {
            Role::Try => return self.begin_try(node),
            Role::Throw => {
                let kind = if self.is_rethrow(node) {
                    StatementKind::Rethrow
                } else {
                    StatementKind::Throw
                };
                self.emit(Statement { span, kind });
            }
            Role::ExpressionStatement => {
                let expr = significant_children(self.grammar, node)
                    .into_iter()
                    .next()
                    .ok_or_else(|| {
                        self.inconsistent(node, "expression statement without an expression")
                    })?;
                if self.grammar.role(expr) == Role::Throw {
                    let thrown = if self.is_rethrow(expr) {
                        Expression::Rethrow
                    } else {
                        Expression::Throw
                    };
                    self.emit(Statement {
                        span,
                        kind: StatementKind::Expression(thrown),
                    });
                } else {
                    let children = significant_children(self.grammar, expr);
                    self.open(node, children, true, Finish::Expression { span })?;
                }
            }
            Role::Block => {
                let children = significant_children(self.grammar, node);
                let kind = node.kind().to_string();
                self.open(node, children, false, Finish::Other { span, kind })?;
            }
            role => {
                if matches!(role, Role::Handler | Role::Else | Role::Finally) {
                    tracing::debug!(
                        path = self.path,
                        line = node.start_position().row + 1,
                        kind = node.kind(),
                        "clause found outside of a try construct"
                    );
                }
                let children = significant_children(self.grammar, node);
                let kind = node.kind().to_string();
                self.open(node, children, true, Finish::Other { span, kind })?;
            }
        }
        Ok(())
    }

    /// Start a frame over `children`.
    fn open(
        &mut self,
        at: Node<'t>,
        mut children: Vec<Node<'t>>,
        flatten: bool,
        finish: Finish,
    ) -> Result<(), FrontEndError> {
        if self.frames.len() >= MAX_NESTING {
            return Err(FrontEndError::TooDeep {
                path: self.path.to_string(),
                line: at.start_position().row + 1,
                limit: MAX_NESTING,
            });
        }
        children.reverse();
        self.frames.push(Frame {
            pending: children,
            done: Vec::new(),
            flatten,
            finish,
        });
        Ok(())
    }

    /// Add a lowered statement to the innermost open frame.
    fn emit(&mut self, statement: Statement) {
        if let Some(frame) = self.frames.last_mut() {
            frame.done.push(statement);
        }
    }

    /// Finish the innermost frame. Returns the file's statements once the
    /// root frame closes.
    fn close(&mut self) -> Result<Option<Vec<Statement>>, FrontEndError> {
        let Some(frame) = self.frames.pop() else {
            return Ok(None);
        };
        let done = frame.done;
        match frame.finish {
            Finish::Root => return Ok(Some(done)),
            Finish::Other { span, kind } => self.emit(Statement {
                span,
                kind: StatementKind::Other {
                    kind,
                    children: done,
                },
            }),
            Finish::Expression { span } => self.emit(Statement {
                span,
                kind: StatementKind::Expression(Expression::Other { children: done }),
            }),
            Finish::TryBody => {
                if let Some(pending) = self.tries.last_mut() {
                    pending.construct.body.extend(done);
                }
                self.advance_try()?;
            }
            Finish::Handler(mut clause) => {
                self.bindings.pop();
                clause.body = Some(done);
                if let Some(pending) = self.tries.last_mut() {
                    pending.construct.handlers.push(clause);
                }
                self.advance_try()?;
            }
            Finish::Else => {
                if let Some(pending) = self.tries.last_mut() {
                    pending.construct.orelse = Some(done);
                }
                self.advance_try()?;
            }
            Finish::Finally => {
                if let Some(pending) = self.tries.last_mut() {
                    pending.construct.finalizer = Some(done);
                }
                self.advance_try()?;
            }
        }
        Ok(None)
    }

    /// Queue the parts of a try construct.
    ///
    /// Children that are neither the body nor a clause (Java resources, for
    /// one) are lowered ahead of the body.
    fn begin_try(&mut self, node: Node<'t>) -> Result<(), FrontEndError> {
        let children = significant_children(self.grammar, node);
        let body = node.child_by_field_name("body").or_else(|| {
            children
                .iter()
                .copied()
                .find(|c| self.grammar.role(*c) == Role::Block)
        });

        let mut leading = Vec::new();
        let mut clauses = Vec::new();
        for child in children {
            match self.grammar.role(child) {
                Role::Handler => clauses.push(Part::Handler(child)),
                Role::Else => clauses.push(Part::Else(child)),
                Role::Finally => clauses.push(Part::Finally(child)),
                _ if Some(child) == body => {}
                _ => leading.push(child),
            }
        }

        let mut parts = Vec::with_capacity(clauses.len() + 2);
        if !leading.is_empty() {
            parts.push(Part::Statements(leading));
        }
        if let Some(body) = body {
            parts.push(Part::Statements(significant_children(self.grammar, body)));
        }
        parts.extend(clauses);
        parts.reverse();

        self.tries.push(PendingTry {
            node,
            construct: TryConstruct::new(span_of(node), Vec::new(), Vec::new()),
            parts,
        });
        self.advance_try()
    }

    /// Open the next part of the innermost try, or emit the construct once
    /// every part is lowered.
    fn advance_try(&mut self) -> Result<(), FrontEndError> {
        loop {
            let Some(pending) = self.tries.last_mut() else {
                return Ok(());
            };
            let at = pending.node;
            match pending.parts.pop() {
                None => {
                    if let Some(done) = self.tries.pop() {
                        let span = done.construct.span;
                        self.emit(Statement {
                            span,
                            kind: StatementKind::Try(done.construct),
                        });
                    }
                    return Ok(());
                }
                Some(Part::Statements(nodes)) => {
                    return self.open(at, nodes, false, Finish::TryBody);
                }
                Some(Part::Handler(node)) => {
                    let parts = self.grammar.handler_parts(node, self.source);
                    let clause = HandlerClause {
                        span: span_of(node),
                        exception_types: parts.exception_types,
                        binding: parts.binding,
                        body: None,
                    };
                    match parts.body {
                        Some(body) if !body.is_missing() => {
                            self.bindings.push(clause.binding.clone());
                            let children = significant_children(self.grammar, body);
                            return self.open(node, children, false, Finish::Handler(clause));
                        }
                        _ => pending.construct.handlers.push(clause),
                    }
                }
                Some(Part::Else(node)) => match clause_block(self.grammar, node) {
                    Some(block) => {
                        let children = significant_children(self.grammar, block);
                        return self.open(node, children, false, Finish::Else);
                    }
                    None => pending.construct.orelse = Some(Vec::new()),
                },
                Some(Part::Finally(node)) => match clause_block(self.grammar, node) {
                    Some(block) => {
                        let children = significant_children(self.grammar, block);
                        return self.open(node, children, false, Finish::Finally);
                    }
                    None => pending.construct.finalizer = Some(Vec::new()),
                },
            }
        }
    }

    fn is_rethrow(&self, node: Node) -> bool {
        let binding = self.bindings.last().and_then(|b| b.as_deref());
        self.grammar.is_rethrow(node, self.source, binding)
    }

    fn inconsistent(&self, node: Node, detail: &'static str) -> FrontEndError {
        FrontEndError::Inconsistent {
            path: self.path.to_string(),
            line: node.start_position().row + 1,
            kind: node.kind().to_string(),
            detail,
        }
    }
}
