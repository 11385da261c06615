//! Rule driver: walk a tree and hand diagnostics to a sink.

use crate::syntax::SyntaxTree;

use super::diagnostic::{Diagnostic, Reporter};
use super::walk::walk;

/// Consumer of diagnostics.
pub trait DiagnosticSink {
    fn accept(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn accept(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn accept(&mut self, diagnostic: Diagnostic) {
        (**self).accept(diagnostic);
    }
}

/// Adapts a closure into a sink.
pub struct FnSink<F>(pub F);

impl<F: FnMut(Diagnostic)> DiagnosticSink for FnSink<F> {
    fn accept(&mut self, diagnostic: Diagnostic) {
        (self.0)(diagnostic);
    }
}

/// The exception hiding rule with its reporting settings.
///
/// Holds no per-run state, so one value can serve any number of trees from
/// any number of threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rule {
    reporter: Reporter,
}

impl Rule {
    pub fn new(reporter: Reporter) -> Self {
        Self { reporter }
    }

    /// Report every hiding clause in `tree` to `sink`.
    ///
    /// Returns the number of diagnostics emitted.
    pub fn run<S: DiagnosticSink + ?Sized>(&self, tree: &SyntaxTree, sink: &mut S) -> usize {
        let mut emitted = 0;
        for finding in walk(tree) {
            sink.accept(self.reporter.report(&tree.path, finding.clause));
            emitted += 1;
        }
        emitted
    }
}

/// Run the rule with default settings.
pub fn run<S: DiagnosticSink + ?Sized>(tree: &SyntaxTree, sink: &mut S) -> usize {
    Rule::default().run(tree, sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::diagnostic::Severity;
    use crate::syntax::{HandlerClause, Span, Statement, TryConstruct};

    fn at(line: usize) -> Span {
        Span::new(line, line + 1, (line, 1), (line, 2))
    }

    fn sample() -> SyntaxTree {
        let construct = TryConstruct::new(
            at(1),
            vec![],
            vec![
                HandlerClause::new(at(2), vec![Statement::rethrow(at(3))]),
                HandlerClause::new(at(4), vec![]),
            ],
        );
        let second = TryConstruct::new(at(6), vec![], vec![HandlerClause::new(at(7), vec![])]);
        SyntaxTree::new(
            "handlers.dart",
            "dart",
            vec![
                Statement::try_construct(construct),
                Statement::try_construct(second),
            ],
        )
    }

    #[test]
    fn test_run_collects_into_vec() {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let emitted = run(&sample(), &mut diagnostics);
        assert_eq!(emitted, 2);
        let lines: Vec<_> = diagnostics.iter().map(|d| d.line()).collect();
        assert_eq!(lines, vec![4, 7]);
        assert!(diagnostics.iter().all(|d| d.file() == "handlers.dart"));
    }

    #[test]
    fn test_run_with_closure_sink() {
        let mut seen = Vec::new();
        let mut sink = FnSink(|d: Diagnostic| seen.push(d.location.span.start_line));
        run(&sample(), &mut sink);
        assert_eq!(seen, vec![4, 7]);
    }

    #[test]
    fn test_rule_is_reusable_and_stateless() {
        let rule = Rule::new(Reporter::with_severity(Severity::Error));
        let tree = sample();
        let mut first: Vec<Diagnostic> = Vec::new();
        let mut second: Vec<Diagnostic> = Vec::new();
        rule.run(&tree, &mut first);
        rule.run(&tree, &mut second);
        assert_eq!(first, second);
        assert!(first.iter().all(|d| d.severity == Severity::Error));
    }
}
