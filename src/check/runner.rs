//! Check runner that applies the rule to a set of files.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::config::Config;
use crate::engine::{Diagnostic, Reporter, Rule};
use crate::frontend;

use super::suppress::{filter_suppressed, parse_suppressions};
use super::types::{CheckResult, FileFailure};

/// Runs the exception hiding rule against files.
#[derive(Default)]
pub struct Runner {
    config: Config,
}

impl Runner {
    /// Create a new runner with the default config.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check every file with a supported, enabled language.
    ///
    /// Files are processed in parallel. A file that cannot be read or
    /// lowered is recorded as a failure and does not stop the run.
    pub fn check(&self, files: &[PathBuf]) -> anyhow::Result<CheckResult> {
        let rule = Rule::new(Reporter::with_severity(self.config.severity()));

        let mut result = files
            .par_iter()
            .map(|file| self.check_file(&rule, file))
            .reduce(CheckResult::new, |mut acc, other| {
                acc.merge(other);
                acc
            });

        result.sort();
        tracing::debug!(
            scanned = result.scanned,
            diagnostics = result.diagnostics.len(),
            suppressed = result.suppressed.len(),
            failures = result.failures.len(),
            "check finished"
        );
        Ok(result)
    }

    fn check_file(&self, rule: &Rule, path: &Path) -> CheckResult {
        let mut result = CheckResult::new();

        let Some(front_end) = frontend::for_path(path) else {
            tracing::trace!(file = %path.display(), "no front-end for file");
            return result;
        };
        if !self.config.is_language_enabled(front_end.language_id()) {
            return result;
        }

        let file = path.to_string_lossy().to_string();
        let source = match std::fs::read(path) {
            Ok(source) => source,
            Err(err) => {
                tracing::warn!(file = %file, error = %err, "failed to read file");
                result.failures.push(FileFailure {
                    file,
                    error: err.to_string(),
                });
                return result;
            }
        };

        let tree = match front_end.parse(path, &source) {
            Ok(tree) => tree,
            Err(err) => {
                tracing::warn!(file = %file, error = %err, "failed to lower file");
                result.failures.push(FileFailure {
                    file,
                    error: err.to_string(),
                });
                return result;
            }
        };
        if tree.has_parse_errors {
            tracing::debug!(file = %file, "file has syntax errors, checking recovered tree");
        }

        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        rule.run(&tree, &mut diagnostics);
        result.scanned = 1;

        if diagnostics.is_empty() {
            return result;
        }

        let content = String::from_utf8_lossy(&source);
        let suppressions = parse_suppressions(&file, &content);
        let (active, suppressed) = filter_suppressed(diagnostics, &suppressions);
        result.diagnostics = active;
        result.suppressed = suppressed;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Severity;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_runner_basic() {
        let temp = TempDir::new().unwrap();
        let py = write(
            &temp,
            "load.py",
            r#"
try:
    load()
except Exception:
    pass
"#,
        );
        let js = write(
            &temp,
            "load.js",
            r#"
try {
  load();
} catch (e) {
  throw e;
}
"#,
        );
        let readme = write(&temp, "README.md", "# notes\n");

        let result = Runner::new().check(&[js, py.clone(), readme]).unwrap();

        assert_eq!(result.scanned, 2);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].file(), py.to_string_lossy());
        assert_eq!(result.diagnostics[0].line(), 4);
        assert_eq!(result.diagnostics[0].severity, Severity::Warning);
    }

    #[test]
    fn test_runner_with_suppression() {
        let temp = TempDir::new().unwrap();
        let java = write(
            &temp,
            "Cleanup.java",
            r#"
class Cleanup {
    void close() {
        try {
            stream.close();
        // swallowcheck:ignore-next-line avoid_hiding_exceptions - close errors are irrelevant
        } catch (IOException e) {
        }
    }
}
"#,
        );

        let result = Runner::new().check(&[java]).unwrap();
        assert!(result.diagnostics.is_empty());
        assert_eq!(result.suppressed.len(), 1);
        assert_eq!(
            result.suppressed[0].suppression.reason,
            "close errors are irrelevant"
        );
    }

    #[test]
    fn test_runner_config_applies() {
        let temp = TempDir::new().unwrap();
        let py = write(&temp, "a.py", "try:\n    x()\nexcept:\n    pass\n");
        let cpp = write(&temp, "a.cpp", "void f() { try { x(); } catch (...) {} }\n");

        let config = Config {
            severity: Some(Severity::Error),
            languages: vec!["cpp".to_string()],
            ..Default::default()
        };
        let result = Runner::new()
            .with_config(config)
            .check(&[py, cpp])
            .unwrap();

        assert_eq!(result.scanned, 1);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].severity, Severity::Error);
        assert!(result.fails(Severity::Error));
    }

    #[test]
    fn test_unreadable_file_is_a_failure() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("gone.ts");

        let result = Runner::new().check(&[missing]).unwrap();
        assert_eq!(result.scanned, 0);
        assert_eq!(result.failures.len(), 1);
        assert!(result.failures[0].file.ends_with("gone.ts"));
    }
}
