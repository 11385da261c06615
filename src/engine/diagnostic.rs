//! Diagnostics produced for hiding handler clauses.

use serde::{Deserialize, Serialize};

use crate::syntax::{HandlerClause, Span};

/// Identifier of the exception hiding rule.
pub const RULE_ID: &str = "avoid_hiding_exceptions";

/// Message attached to every hiding diagnostic.
pub const MESSAGE: &str =
    "Caught exception is hidden: the handler neither rethrows it nor throws a new error.";

/// Fix guidance attached to every hiding diagnostic.
pub const CORRECTION_MESSAGE: &str =
    "Remove the try/catch or add rethrow/throw to the end of the handler.";

/// Severity levels for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    #[default]
    Warning,
    Info,
}

impl Severity {
    /// Numeric rank, higher is more severe.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Error => 2,
            Severity::Warning => 1,
            Severity::Info => 0,
        }
    }

    /// Whether this severity is at least as severe as `threshold`.
    pub fn at_least(&self, threshold: Severity) -> bool {
        self.rank() >= threshold.rank()
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            _ => Err(format!("unknown severity: {}", s)),
        }
    }
}

/// Where a diagnostic points.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub span: Span,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file, self.span)
    }
}

/// A single reported exception hiding site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    pub rule_id: String,
    pub message: String,
    pub correction_message: String,
    pub severity: Severity,
    /// Span of the offending handler clause.
    pub location: Location,
}

impl Diagnostic {
    pub fn file(&self) -> &str {
        &self.location.file
    }

    pub fn line(&self) -> usize {
        self.location.span.start_line
    }

    pub fn column(&self) -> usize {
        self.location.span.start_col
    }

    /// Sort key giving deterministic output order.
    pub fn sort_key(&self) -> (&str, usize, usize) {
        (self.file(), self.line(), self.column())
    }
}

/// Builds diagnostics with a fixed severity.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    severity: Severity,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_severity(severity: Severity) -> Self {
        Self { severity }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Build the diagnostic for a hiding clause found in `path`.
    pub fn report(&self, path: &str, clause: &HandlerClause) -> Diagnostic {
        Diagnostic {
            rule_id: RULE_ID.to_string(),
            message: MESSAGE.to_string(),
            correction_message: CORRECTION_MESSAGE.to_string(),
            severity: self.severity,
            location: Location {
                file: path.to_string(),
                span: clause.span,
            },
        }
    }
}

/// Build a default-severity diagnostic for a hiding clause.
pub fn report(path: &str, clause: &HandlerClause) -> Diagnostic {
    Reporter::new().report(path, clause)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Statement;

    fn span(line: usize) -> Span {
        Span::new(100, 180, (line, 7), (line + 2, 6))
    }

    #[test]
    fn test_report_points_at_clause() {
        let clause = HandlerClause::new(span(12), vec![]);
        let diag = report("src/Main.java", &clause);
        assert_eq!(diag.rule_id, RULE_ID);
        assert_eq!(diag.location.span, clause.span);
        assert_eq!(diag.file(), "src/Main.java");
        assert_eq!(diag.line(), 12);
        assert_eq!(diag.column(), 7);
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.location.to_string(), "src/Main.java:12:7");
    }

    #[test]
    fn test_message_does_not_depend_on_body() {
        let empty = HandlerClause::new(span(3), vec![]);
        let logging = HandlerClause::new(
            span(3),
            vec![Statement::other("expression_statement", span(4), vec![])],
        );
        assert_eq!(report("a.py", &empty), report("a.py", &logging));
    }

    #[test]
    fn test_reporter_severity() {
        let reporter = Reporter::with_severity(Severity::Error);
        let diag = reporter.report("a.ts", &HandlerClause::new(span(1), vec![]));
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.correction_message, CORRECTION_MESSAGE);
    }

    #[test]
    fn test_severity_ordering_and_parsing() {
        assert!(Severity::Error.at_least(Severity::Warning));
        assert!(Severity::Warning.at_least(Severity::Warning));
        assert!(!Severity::Info.at_least(Severity::Warning));
        assert_eq!("ERROR".parse::<Severity>(), Ok(Severity::Error));
        assert!("fatal".parse::<Severity>().is_err());
    }
}
