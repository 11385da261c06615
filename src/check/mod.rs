//! Running the rule over files on disk.
//!
//! The engine reports every hiding handler; this layer reads files, picks
//! a front-end per file, applies inline suppressions and collects results.

mod runner;
mod suppress;
mod types;

pub use runner::Runner;
pub use suppress::{
    filter_suppressed, matches_suppression, parse_suppressions, SuppressedDiagnostic,
    Suppression, SuppressionType,
};
pub use types::{CheckResult, FileFailure};
