//! Exception hiding detection engine.
//!
//! ```text
//! SyntaxTree ──▶ walk ──▶ classify (per handler) ──▶ Reporter ──▶ DiagnosticSink
//! ```
//!
//! Every function here is pure over its inputs. The engine keeps no state
//! between calls, so hosts can analyze independent trees in parallel.

mod classify;
mod diagnostic;
mod driver;
mod walk;

pub use classify::{classify, classify_body, first_propagating, propagates, Verdict};
pub use diagnostic::{
    report, Diagnostic, Location, Reporter, Severity, CORRECTION_MESSAGE, MESSAGE, RULE_ID,
};
pub use driver::{run, DiagnosticSink, FnSink, Rule};
pub use walk::{classify_all, walk, Classified, Finding, Walk};
