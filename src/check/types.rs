//! Results of checking a set of files.

use serde::{Deserialize, Serialize};

use crate::engine::{Diagnostic, Severity};

use super::suppress::SuppressedDiagnostic;

/// A file that could not be checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    pub file: String,
    pub error: String,
}

/// Results of running the rule over files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckResult {
    pub diagnostics: Vec<Diagnostic>,
    /// Diagnostics that were suppressed by inline comments
    #[serde(default)]
    pub suppressed: Vec<SuppressedDiagnostic>,
    /// Files skipped because they could not be read or lowered
    #[serde(default)]
    pub failures: Vec<FileFailure>,
    /// Number of files scanned
    pub scanned: usize,
}

impl CheckResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge another result into this one.
    pub fn merge(&mut self, other: CheckResult) {
        self.diagnostics.extend(other.diagnostics);
        self.suppressed.extend(other.suppressed);
        self.failures.extend(other.failures);
        self.scanned += other.scanned;
    }

    /// Order everything by file, line and column.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        self.suppressed
            .sort_by(|a, b| a.diagnostic.sort_key().cmp(&b.diagnostic.sort_key()));
        self.failures.sort_by(|a, b| a.file.cmp(&b.file));
    }

    /// Number of suppressed diagnostics.
    pub fn suppressed_count(&self) -> usize {
        self.suppressed.len()
    }

    /// Whether any active diagnostic reaches `threshold`.
    pub fn fails(&self, threshold: Severity) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity.at_least(threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Reporter;
    use crate::syntax::{HandlerClause, Span};

    fn diagnostic(file: &str, line: usize, severity: Severity) -> Diagnostic {
        let clause = HandlerClause::new(Span::new(0, 1, (line, 3), (line, 9)), vec![]);
        Reporter::with_severity(severity).report(file, &clause)
    }

    #[test]
    fn test_merge_and_sort() {
        let mut result = CheckResult::new();
        result.diagnostics.push(diagnostic("b.py", 2, Severity::Warning));
        result.scanned = 1;

        let mut other = CheckResult::new();
        other.diagnostics.push(diagnostic("a.py", 9, Severity::Warning));
        other.diagnostics.push(diagnostic("a.py", 3, Severity::Warning));
        other.failures.push(FileFailure {
            file: "c.py".to_string(),
            error: "unreadable".to_string(),
        });
        other.scanned = 2;

        result.merge(other);
        result.sort();

        let order: Vec<_> = result
            .diagnostics
            .iter()
            .map(|d| (d.file().to_string(), d.line()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("a.py".to_string(), 3),
                ("a.py".to_string(), 9),
                ("b.py".to_string(), 2)
            ]
        );
        assert_eq!(result.scanned, 3);
        assert_eq!(result.failures.len(), 1);
    }

    #[test]
    fn test_fails_threshold() {
        let mut result = CheckResult::new();
        assert!(!result.fails(Severity::Info));

        result.diagnostics.push(diagnostic("a.js", 1, Severity::Warning));
        assert!(result.fails(Severity::Info));
        assert!(result.fails(Severity::Warning));
        assert!(!result.fails(Severity::Error));
    }
}
