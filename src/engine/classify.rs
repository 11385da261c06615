//! Propagation classification for a single handler clause.
//!
//! A handler propagates only if one of its direct statements is a rethrow or
//! a throw. Statements nested inside conditionals, loops or blocks are not
//! considered: propagation must be unconditional to count.

use serde::{Deserialize, Serialize};

use crate::syntax::{Expression, HandlerClause, Statement, StatementKind};

/// Outcome of classifying one handler clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// The caught error always leaves the handler.
    Propagating,
    /// The caught error can be absorbed by the handler.
    Hiding,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Propagating => "propagating",
            Verdict::Hiding => "hiding",
        }
    }

    pub fn is_hiding(&self) -> bool {
        matches!(self, Verdict::Hiding)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a handler clause.
///
/// A clause without a body, or with an empty one, is always hiding.
pub fn classify(handler: &HandlerClause) -> Verdict {
    match handler.statements() {
        Some(body) => classify_body(body),
        None => Verdict::Hiding,
    }
}

/// Classify a handler body given as its direct statements.
pub fn classify_body(body: &[Statement]) -> Verdict {
    if first_propagating(body).is_some() {
        Verdict::Propagating
    } else {
        Verdict::Hiding
    }
}

/// The first direct statement that propagates, if any.
pub fn first_propagating(body: &[Statement]) -> Option<&Statement> {
    body.iter().find(|stmt| propagates(stmt))
}

/// Whether a single statement, taken on its own, propagates.
pub fn propagates(stmt: &Statement) -> bool {
    match &stmt.kind {
        StatementKind::Rethrow | StatementKind::Throw => true,
        StatementKind::Expression(expr) => match expr {
            Expression::Rethrow | Expression::Throw => true,
            Expression::Other { .. } => false,
        },
        StatementKind::Try(_) | StatementKind::Other { .. } => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{Span, TryConstruct};

    fn at(line: usize) -> Span {
        Span::new(line * 20, line * 20 + 10, (line, 5), (line, 15))
    }

    fn call(line: usize) -> Statement {
        Statement::expression(at(line), Expression::Other { children: vec![] })
    }

    fn handler(body: Vec<Statement>) -> HandlerClause {
        HandlerClause::new(at(1), body).with_binding("e")
    }

    #[test]
    fn test_empty_body_is_hiding() {
        assert_eq!(classify(&handler(vec![])), Verdict::Hiding);
    }

    #[test]
    fn test_absent_body_is_hiding() {
        let clause = HandlerClause {
            body: None,
            ..handler(vec![])
        };
        assert_eq!(classify(&clause), Verdict::Hiding);
    }

    #[test]
    fn test_log_then_rethrow_propagates() {
        let clause = handler(vec![
            call(2),
            Statement::expression(at(3), Expression::Rethrow),
        ]);
        assert_eq!(classify(&clause), Verdict::Propagating);
    }

    #[test]
    fn test_throw_new_error_propagates() {
        let clause = handler(vec![Statement::throw(at(2))]);
        assert_eq!(classify(&clause), Verdict::Propagating);

        let expr_form = handler(vec![Statement::expression(at(2), Expression::Throw)]);
        assert_eq!(classify(&expr_form), Verdict::Propagating);
    }

    #[test]
    fn test_statements_after_rethrow_do_not_matter() {
        let clause = handler(vec![
            Statement::rethrow(at(2)),
            call(3),
            Statement::other("return_statement", at(4), vec![]),
        ]);
        assert_eq!(classify(&clause), Verdict::Propagating);
        assert_eq!(
            first_propagating(clause.statements().unwrap()),
            Some(&Statement::rethrow(at(2)))
        );
    }

    #[test]
    fn test_only_other_statements_is_hiding() {
        let clause = handler(vec![
            call(2),
            Statement::other("local_variable_declaration", at(3), vec![]),
            Statement::other("return_statement", at(4), vec![]),
        ]);
        assert_eq!(classify(&clause), Verdict::Hiding);
    }

    #[test]
    fn test_conditional_rethrow_is_hiding() {
        // Propagation nested in a branch is not unconditional.
        let branch = Statement::other("block", at(3), vec![Statement::rethrow(at(3))]);
        let clause = handler(vec![Statement::other("if_statement", at(2), vec![branch])]);
        assert_eq!(classify(&clause), Verdict::Hiding);
    }

    #[test]
    fn test_bare_block_with_throw_is_hiding() {
        let clause = handler(vec![Statement::other(
            "block",
            at(2),
            vec![Statement::throw(at(3))],
        )]);
        assert_eq!(classify(&clause), Verdict::Hiding);
    }

    #[test]
    fn test_nested_try_is_not_propagation() {
        let inner = TryConstruct::new(
            at(2),
            vec![Statement::throw(at(3))],
            vec![HandlerClause::new(at(4), vec![Statement::rethrow(at(5))])],
        );
        let clause = handler(vec![Statement::try_construct(inner)]);
        assert_eq!(classify(&clause), Verdict::Hiding);
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(Verdict::Hiding.to_string(), "hiding");
        assert!(Verdict::Hiding.is_hiding());
        assert!(!Verdict::Propagating.is_hiding());
    }
}
