//! Integration tests for the full check pipeline.
//!
//! These tests run the front-ends, engine and suppression layer against the
//! testdata fixtures.

use std::path::PathBuf;

use swallowcheck::check::{CheckResult, Runner, SuppressionType};
use swallowcheck::cli::collect_files;
use swallowcheck::config::{self, Config};
use swallowcheck::engine::Severity;

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn run_check(config: Config) -> CheckResult {
    let testdata = testdata_path();
    let files = collect_files(&testdata, &config).expect("should collect files");
    Runner::new()
        .with_config(config)
        .check(&files)
        .expect("check should succeed")
}

/// (file name, line) of every active diagnostic.
fn locations(result: &CheckResult) -> Vec<(String, usize)> {
    result
        .diagnostics
        .iter()
        .map(|d| {
            let name = PathBuf::from(d.file())
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            (name, d.line())
        })
        .collect()
}

#[test]
fn test_finds_hiding_handlers_in_every_language() {
    let result = run_check(Config::default());

    assert_eq!(result.scanned, 6);
    assert!(result.failures.is_empty(), "failures: {:?}", result.failures);
    assert_eq!(
        locations(&result),
        vec![
            ("Orders.java".to_string(), 9),
            ("Orders.java".to_string(), 28),
            ("cache.cpp".to_string(), 7),
            ("client.ts".to_string(), 4),
            ("settings.py".to_string(), 9),
            ("worker.js".to_string(), 5),
        ]
    );
    assert!(result
        .diagnostics
        .iter()
        .all(|d| d.severity == Severity::Warning));
}

#[test]
fn test_clean_file_has_no_diagnostics() {
    let result = run_check(Config::default());
    assert!(!result
        .diagnostics
        .iter()
        .any(|d| d.file().ends_with("clean.py")));
}

#[test]
fn test_suppressed_handler_is_tracked() {
    let result = run_check(Config::default());

    assert_eq!(result.suppressed_count(), 1);
    let suppressed = &result.suppressed[0];
    assert!(suppressed.diagnostic.file().ends_with("settings.py"));
    assert_eq!(suppressed.diagnostic.line(), 19);
    assert_eq!(suppressed.suppression.suppression_type, SuppressionType::NextLine);
    assert_eq!(suppressed.suppression.reason, "missing files are fine");
}

#[test]
fn test_fixture_config_is_applied() {
    let config_path = testdata_path().join("swallowcheck.yaml");
    assert_eq!(config::discover(&testdata_path()), Some(config_path.clone()));

    let config = Config::parse_file(&config_path).expect("should parse config");
    config::validate(&config).expect("fixture config should be valid");
    let fail_on = config.fail_on();

    let result = run_check(config);

    // cache.cpp is excluded by glob
    assert_eq!(result.scanned, 5);
    assert_eq!(result.diagnostics.len(), 5);
    assert!(result
        .diagnostics
        .iter()
        .all(|d| d.severity == Severity::Error));
    assert!(result.fails(fail_on));
}

#[test]
fn test_single_file_check() {
    let file = testdata_path().join("Orders.java");
    let result = Runner::new().check(&[file.clone()]).unwrap();
    assert_eq!(result.scanned, 1);
    assert_eq!(result.diagnostics.len(), 2);
    assert_eq!(result.diagnostics[0].column(), 11);
}
