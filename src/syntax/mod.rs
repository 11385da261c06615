//! Language-neutral model of exception-handling constructs.
//!
//! Front-ends lower their native parse trees into this model; the detection
//! engine only ever reads it. The model keeps just enough structure to answer
//! four questions: where are the try constructs, what are their handler
//! clauses, what are a clause's direct statements, and is a statement a
//! rethrow or a throw.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source location span with byte offsets and line/column positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (0-indexed).
    pub start_byte: usize,
    /// End byte offset (0-indexed, exclusive).
    pub end_byte: usize,
    /// Start line (1-indexed).
    pub start_line: usize,
    /// Start column (1-indexed).
    pub start_col: usize,
    /// End line (1-indexed).
    pub end_line: usize,
    /// End column (1-indexed).
    pub end_col: usize,
}

impl Span {
    pub fn new(
        start_byte: usize,
        end_byte: usize,
        (start_line, start_col): (usize, usize),
        (end_line, end_col): (usize, usize),
    ) -> Self {
        Self {
            start_byte,
            end_byte,
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

/// One parsed source unit.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    /// File path, as given to the front-end.
    pub path: String,
    /// Language identifier of the producing front-end.
    pub language: String,
    /// Top-level statements in source order.
    pub statements: Vec<Statement>,
    /// Whether the front-end had to recover from syntax errors.
    pub has_parse_errors: bool,
}

impl SyntaxTree {
    pub fn new(path: &str, language: &str, statements: Vec<Statement>) -> Self {
        Self {
            path: path.to_string(),
            language: language.to_string(),
            statements,
            has_parse_errors: false,
        }
    }
}

/// A statement and its location.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub span: Span,
    pub kind: StatementKind,
}

/// Statement shapes the classifier distinguishes.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    /// An expression used as a statement.
    Expression(Expression),
    /// Re-raises the originally caught error unchanged.
    Rethrow,
    /// Raises a new or transformed error.
    Throw,
    /// A nested try construct.
    Try(TryConstruct),
    /// Anything else: blocks, conditionals, loops, declarations, returns.
    ///
    /// `kind` is the front-end's native node name, kept for diagnostics and
    /// debugging. `children` holds the statements nested inside it.
    Other {
        kind: String,
        children: Vec<Statement>,
    },
}

/// Expression shapes that matter when wrapped in an expression statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A rethrow used in expression position.
    Rethrow,
    /// A throw used in expression position.
    Throw,
    /// Any other expression. Statements nested inside it (closure or lambda
    /// bodies) are kept so try constructs within them can still be found.
    Other { children: Vec<Statement> },
}

impl Statement {
    pub fn rethrow(span: Span) -> Self {
        Self {
            span,
            kind: StatementKind::Rethrow,
        }
    }

    pub fn throw(span: Span) -> Self {
        Self {
            span,
            kind: StatementKind::Throw,
        }
    }

    pub fn expression(span: Span, expression: Expression) -> Self {
        Self {
            span,
            kind: StatementKind::Expression(expression),
        }
    }

    pub fn other(kind: &str, span: Span, children: Vec<Statement>) -> Self {
        Self {
            span,
            kind: StatementKind::Other {
                kind: kind.to_string(),
                children,
            },
        }
    }

    pub fn try_construct(construct: TryConstruct) -> Self {
        Self {
            span: construct.span,
            kind: StatementKind::Try(construct),
        }
    }

    /// Statements directly nested in this one, excluding try constructs'
    /// own bodies (those are reached through [`TryConstruct`]).
    pub fn nested(&self) -> &[Statement] {
        match &self.kind {
            StatementKind::Other { children, .. }
            | StatementKind::Expression(Expression::Other { children }) => children,
            _ => &[],
        }
    }
}

/// A try block plus its handler clauses.
#[derive(Debug, Clone, PartialEq)]
pub struct TryConstruct {
    pub span: Span,
    /// Statements of the guarded block.
    pub body: Vec<Statement>,
    /// Handler clauses in declaration order.
    pub handlers: Vec<HandlerClause>,
    /// Block run when no exception was raised (Python `else:`).
    pub orelse: Option<Vec<Statement>>,
    /// `finally` block.
    pub finalizer: Option<Vec<Statement>>,
}

impl TryConstruct {
    pub fn new(span: Span, body: Vec<Statement>, handlers: Vec<HandlerClause>) -> Self {
        Self {
            span,
            body,
            handlers,
            orelse: None,
            finalizer: None,
        }
    }

    pub fn with_finalizer(mut self, finalizer: Vec<Statement>) -> Self {
        self.finalizer = Some(finalizer);
        self
    }

    pub fn with_orelse(mut self, orelse: Vec<Statement>) -> Self {
        self.orelse = Some(orelse);
        self
    }

    /// A construct without handlers cannot hide anything.
    pub fn has_handlers(&self) -> bool {
        !self.handlers.is_empty()
    }
}

/// One catch arm.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerClause {
    pub span: Span,
    /// Exception type filters as written in source. Empty for catch-all.
    pub exception_types: Vec<String>,
    /// Name the caught error is bound to, if any.
    pub binding: Option<String>,
    /// Direct statements, or `None` when the front-end could not recover a
    /// body for this clause.
    pub body: Option<Vec<Statement>>,
}

impl HandlerClause {
    pub fn new(span: Span, body: Vec<Statement>) -> Self {
        Self {
            span,
            exception_types: Vec::new(),
            binding: None,
            body: Some(body),
        }
    }

    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exception_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_binding(mut self, binding: &str) -> Self {
        self.binding = Some(binding.to_string());
        self
    }

    /// Direct statements, if the body is present.
    pub fn statements(&self) -> Option<&[Statement]> {
        self.body.as_deref()
    }

    /// Whether the clause has a body with no statements in it.
    pub fn is_empty(&self) -> bool {
        self.body.as_ref().is_some_and(|b| b.is_empty())
    }
}
