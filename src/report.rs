//! Output formatting for swallowcheck results.
//!
//! Supports three output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption
//! - SARIF: Static Analysis Results Interchange Format for IDE/CI integration

use colored::*;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

use crate::check::{CheckResult, SuppressionType};
use crate::engine::{Diagnostic, Severity, CORRECTION_MESSAGE, MESSAGE, RULE_ID};

// =============================================================================
// JSON Format
// =============================================================================

#[derive(Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub path: String,
    pub passed: bool,
    pub fail_on: String,
    pub files_scanned: usize,
    pub diagnostics: Vec<JsonDiagnostic>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suppressed: Vec<JsonSuppressedDiagnostic>,
    pub suppressed_count: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<JsonFailure>,
}

#[derive(Serialize, Deserialize)]
pub struct JsonDiagnostic {
    pub rule: String,
    pub severity: String,
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub message: String,
    pub correction: String,
}

#[derive(Serialize, Deserialize)]
pub struct JsonSuppressedDiagnostic {
    pub diagnostic: JsonDiagnostic,
    pub suppression: JsonSuppression,
}

#[derive(Serialize, Deserialize)]
pub struct JsonSuppression {
    pub rule: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub reason: String,
    pub line: usize,
    #[serde(rename = "type")]
    pub suppression_type: String,
}

#[derive(Serialize, Deserialize)]
pub struct JsonFailure {
    pub file: String,
    pub error: String,
}

/// Write results in JSON format.
pub fn write_json<W: Write>(
    out: &mut W,
    base_path: &Path,
    result: &CheckResult,
    fail_on: Severity,
) -> anyhow::Result<()> {
    let to_json = |d: &Diagnostic| diagnostic_to_json(d, base_path);

    let report = JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        path: base_path.to_string_lossy().to_string(),
        passed: !result.fails(fail_on),
        fail_on: fail_on.to_string(),
        files_scanned: result.scanned,
        diagnostics: result.diagnostics.iter().map(to_json).collect(),
        suppressed: result
            .suppressed
            .iter()
            .map(|sd| JsonSuppressedDiagnostic {
                diagnostic: to_json(&sd.diagnostic),
                suppression: JsonSuppression {
                    rule: sd.suppression.rule.clone(),
                    reason: sd.suppression.reason.clone(),
                    line: sd.suppression.line,
                    suppression_type: sd.suppression.suppression_type.to_string(),
                },
            })
            .collect(),
        suppressed_count: result.suppressed_count(),
        failures: result
            .failures
            .iter()
            .map(|f| JsonFailure {
                file: make_relative_path(&f.file, base_path),
                error: f.error.clone(),
            })
            .collect(),
    };

    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

fn diagnostic_to_json(d: &Diagnostic, base_path: &Path) -> JsonDiagnostic {
    let span = &d.location.span;
    JsonDiagnostic {
        rule: d.rule_id.clone(),
        severity: d.severity.to_string(),
        file: make_relative_path(d.file(), base_path),
        line: span.start_line,
        column: span.start_col,
        end_line: span.end_line,
        end_column: span.end_col,
        message: d.message.clone(),
        correction: d.correction_message.clone(),
    }
}

// =============================================================================
// SARIF Format
// =============================================================================

const SARIF_VERSION: &str = "2.1.0";
const SARIF_SCHEMA: &str = "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";
const TOOL_NAME: &str = "swallowcheck";
const INFO_URI: &str = env!("CARGO_PKG_REPOSITORY");

#[derive(Serialize, Deserialize)]
struct SarifReport {
    version: String,
    #[serde(rename = "$schema")]
    schema: String,
    runs: Vec<SarifRun>,
}

#[derive(Serialize, Deserialize)]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Serialize, Deserialize)]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Serialize, Deserialize)]
struct SarifDriver {
    name: String,
    version: String,
    #[serde(rename = "informationUri")]
    information_uri: String,
    rules: Vec<SarifRule>,
}

#[derive(Serialize, Deserialize)]
struct SarifRule {
    id: String,
    name: String,
    #[serde(rename = "shortDescription")]
    short_description: SarifMessage,
    #[serde(rename = "fullDescription")]
    full_description: SarifMessage,
    help: SarifMessage,
    #[serde(rename = "defaultConfiguration")]
    default_config: SarifRuleConfig,
}

#[derive(Serialize, Deserialize)]
struct SarifRuleConfig {
    level: String,
}

#[derive(Serialize, Deserialize)]
struct SarifResult {
    #[serde(rename = "ruleId")]
    rule_id: String,
    level: String,
    message: SarifMessage,
    locations: Vec<SarifLocation>,
}

#[derive(Serialize, Deserialize)]
struct SarifMessage {
    text: String,
}

#[derive(Serialize, Deserialize)]
struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    physical_location: SarifPhysicalLocation,
}

#[derive(Serialize, Deserialize)]
struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    artifact_location: SarifArtifact,
    region: SarifRegion,
}

#[derive(Serialize, Deserialize)]
struct SarifArtifact {
    uri: String,
}

#[derive(Serialize, Deserialize)]
struct SarifRegion {
    #[serde(rename = "startLine")]
    start_line: usize,
    #[serde(rename = "startColumn")]
    start_column: usize,
    #[serde(rename = "endLine")]
    end_line: usize,
    #[serde(rename = "endColumn")]
    end_column: usize,
}

fn map_severity_to_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "note",
    }
}

/// Path of `file_path` relative to the scanned root, with `/` separators.
pub fn make_relative_path(file_path: &str, base_path: &Path) -> String {
    if base_path.as_os_str().is_empty() {
        return file_path.to_string();
    }

    let file = Path::new(file_path);

    // Single file scan
    if file == base_path {
        return file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file_path.to_string());
    }

    file.strip_prefix(base_path)
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .unwrap_or_else(|_| file_path.to_string())
}

fn sarif_rule(severity: Severity) -> SarifRule {
    SarifRule {
        id: RULE_ID.to_string(),
        name: "AvoidHidingExceptions".to_string(),
        short_description: SarifMessage {
            text: "Detects exception handlers that hide the caught exception".to_string(),
        },
        full_description: SarifMessage {
            text: MESSAGE.to_string(),
        },
        help: SarifMessage {
            text: CORRECTION_MESSAGE.to_string(),
        },
        default_config: SarifRuleConfig {
            level: map_severity_to_level(severity).to_string(),
        },
    }
}

/// Write results in SARIF format.
pub fn write_sarif<W: Write>(
    out: &mut W,
    base_path: &Path,
    result: &CheckResult,
    severity: Severity,
) -> anyhow::Result<()> {
    let results: Vec<SarifResult> = result
        .diagnostics
        .iter()
        .map(|d| {
            let span = &d.location.span;
            SarifResult {
                rule_id: d.rule_id.clone(),
                level: map_severity_to_level(d.severity).to_string(),
                message: SarifMessage {
                    text: d.message.clone(),
                },
                locations: vec![SarifLocation {
                    physical_location: SarifPhysicalLocation {
                        artifact_location: SarifArtifact {
                            uri: make_relative_path(d.file(), base_path),
                        },
                        region: SarifRegion {
                            start_line: span.start_line.max(1),
                            start_column: span.start_col.max(1),
                            end_line: span.end_line.max(1),
                            end_column: span.end_col.max(1),
                        },
                    },
                }],
            }
        })
        .collect();

    let report = SarifReport {
        version: SARIF_VERSION.to_string(),
        schema: SARIF_SCHEMA.to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: TOOL_NAME.to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    information_uri: INFO_URI.to_string(),
                    rules: vec![sarif_rule(severity)],
                },
            },
            results,
        }],
    };

    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write results in pretty (human-readable) format.
pub fn write_pretty<W: Write>(
    out: &mut W,
    base_path: &Path,
    result: &CheckResult,
    fail_on: Severity,
    show_suppressed: bool,
) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "  {} v{}",
        "swallowcheck".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    )?;
    writeln!(out)?;
    writeln!(out, "  {}{}", "Scanning: ".dimmed(), base_path.display())?;
    writeln!(
        out,
        "  {}{}",
        "Files:    ".dimmed(),
        result.scanned
    )?;
    writeln!(out)?;

    if !result.diagnostics.is_empty() {
        write_diagnostics(out, base_path, &result.diagnostics)?;
        writeln!(out)?;
    }

    if !result.suppressed.is_empty() {
        write_suppressed_summary(out, base_path, result, show_suppressed)?;
        writeln!(out)?;
    }

    if !result.failures.is_empty() {
        writeln!(out, "  {} ({}):", "Skipped".yellow(), result.failures.len())?;
        for failure in &result.failures {
            writeln!(
                out,
                "    {}  {}",
                make_relative_path(&failure.file, base_path).blue(),
                failure.error.dimmed()
            )?;
        }
        writeln!(out)?;
    }

    write_final_status(out, result, fail_on)?;
    writeln!(out)
}

fn write_diagnostics<W: Write>(
    out: &mut W,
    base_path: &Path,
    diagnostics: &[Diagnostic],
) -> std::io::Result<()> {
    writeln!(out, "  {} ({}):", "Diagnostics".bold(), diagnostics.len())?;
    writeln!(out)?;

    for d in diagnostics {
        write_severity_tag(out, d.severity)?;
        write!(out, "   {:<26}", d.rule_id.dimmed())?;
        write!(out, "{}", make_relative_path(d.file(), base_path).blue())?;
        writeln!(out, "{}", format!(":{}:{}", d.line(), d.column()).dimmed())?;

        // Message and fix on following lines, indented
        writeln!(out, "            {}", d.message)?;
        writeln!(out, "            {}", d.correction_message.dimmed())?;
        writeln!(out)?;
    }
    Ok(())
}

fn write_severity_tag<W: Write>(out: &mut W, severity: Severity) -> std::io::Result<()> {
    match severity {
        Severity::Error => write!(out, "    {} ", "ERROR".red()),
        Severity::Warning => write!(out, "    {} ", "WARN ".yellow()),
        Severity::Info => write!(out, "    {} ", "INFO ".blue()),
    }
}

fn write_suppressed_summary<W: Write>(
    out: &mut W,
    base_path: &Path,
    result: &CheckResult,
    show_details: bool,
) -> std::io::Result<()> {
    writeln!(out, "  {} ({}):", "Suppressed".dimmed(), result.suppressed.len())?;

    if !show_details {
        writeln!(
            out,
            "    {}",
            "(use --show-suppressed to see details)".dimmed()
        )?;
        return Ok(());
    }

    writeln!(out)?;
    for sd in &result.suppressed {
        let d = &sd.diagnostic;
        let s = &sd.suppression;

        write!(out, "    {:<26}", d.rule_id.dimmed())?;
        write!(out, "{}", make_relative_path(d.file(), base_path).blue())?;
        if s.suppression_type == SuppressionType::File {
            writeln!(out, "{}", ":* (file)".dimmed())?;
        } else {
            writeln!(out, "{}", format!(":{}", d.line()).dimmed())?;
        }

        if !s.reason.is_empty() {
            writeln!(
                out,
                "            {}",
                format!("reason: {:?}", s.reason).dimmed()
            )?;
        }
    }
    Ok(())
}

fn write_final_status<W: Write>(
    out: &mut W,
    result: &CheckResult,
    fail_on: Severity,
) -> std::io::Result<()> {
    let count = result.diagnostics.len();
    let plural = if count != 1 { "s" } else { "" };
    write!(out, "  {}", format!("{} diagnostic{}", count, plural).dimmed())?;
    write!(out, "  {}", format!("fail on: {}", fail_on).dimmed())?;
    write!(out, "  ")?;

    if result.fails(fail_on) {
        writeln!(out, "{}", "FAILED".red())
    } else {
        writeln!(out, "{}", "PASSED".green())
    }
}
