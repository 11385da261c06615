//! Swallowcheck - finds exception handlers that hide the exceptions they catch.
//!
//! A handler clause (`catch`, `except`, ...) hides its exception when its
//! body neither rethrows the caught exception nor throws a new one as a
//! direct top-level statement. Logging, returning a default value or doing
//! nothing are all reported.
//!
//! # Architecture
//!
//! - `syntax`: Language-neutral model of try constructs and handler clauses
//! - `engine`: Classifier, walker, reporter and rule driver over that model
//! - `frontend`: Tree-sitter front-ends that lower source files into the model
//! - `check`: File runner with inline suppressions
//! - `config`: YAML configuration schema
//! - `report`: Output formatting (pretty, JSON, SARIF)
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use swallowcheck::frontend::{self, FrontEnd};
//!
//! let source = b"try:\n    load()\nexcept Exception:\n    pass\n";
//! let python = frontend::for_language("python").unwrap();
//! let tree = python.parse(Path::new("load.py"), source).unwrap();
//!
//! let mut diagnostics: Vec<swallowcheck::Diagnostic> = Vec::new();
//! swallowcheck::engine::run(&tree, &mut diagnostics);
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].line(), 3);
//! ```

pub mod check;
pub mod cli;
pub mod config;
pub mod engine;
pub mod frontend;
pub mod logging;
pub mod report;
pub mod syntax;

pub use check::{CheckResult, Runner};
pub use config::Config;
pub use engine::{Diagnostic, DiagnosticSink, Rule, Severity, Verdict};
pub use frontend::FrontEnd;
pub use syntax::{HandlerClause, Span, Statement, StatementKind, SyntaxTree, TryConstruct};
