//! Doctor report rendering
//!
//! Provides formatting for doctor reports in multiple output formats:
//! human-readable, JSON, and YAML.

use crate::report::DoctorReport;
use owo_colors::OwoColorize;
use quickstart_core::{CheckResult, Finding, Severity};

/// Output format for doctor reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable colored output
    #[default]
    Human,
    /// JSON format for machine consumption
    Json,
    /// YAML format for machine consumption
    Yaml,
}

/// Doctor report renderer
pub struct DoctorReporter {
    verbose: bool,
}

impl DoctorReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn format(&self, report: &DoctorReport, format: OutputFormat) -> String {
        match format {
            OutputFormat::Human => self.format_human(report),
            OutputFormat::Json => self.format_json(report),
            OutputFormat::Yaml => self.format_yaml(report),
        }
    }

    fn format_human(&self, report: &DoctorReport) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n", "Admin Doctor".bold()));
        output.push_str(&format!(
            "Admin: {}  Generated: {}\n\n",
            report.base_path,
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        for check in &report.checks {
            output.push_str(&self.format_check(check));
        }

        output.push_str(&self.format_summary(report));
        output
    }

    fn format_check(&self, check: &CheckResult) -> String {
        let mut output = String::new();

        let summary = check.output.summary.as_deref().unwrap_or("");
        output.push_str(&format!(
            "{} {} {}\n",
            severity_icon(check.severity),
            check.label.bold(),
            summary.dimmed()
        ));

        for finding in &check.output.findings {
            if finding.severity == Severity::Ok && !self.verbose {
                continue;
            }
            output.push_str(&self.format_finding(finding));
        }

        if check.severity >= Severity::Warn && !check.action.is_empty() {
            output.push_str(&format!("      Action: {}\n", check.action.yellow()));
        }

        output
    }

    fn format_finding(&self, finding: &Finding) -> String {
        let mut output = format!(
            "    {} {} {}\n",
            severity_icon(finding.severity),
            finding.message,
            format!("[{}]", finding.code).dimmed()
        );
        if !finding.hint.is_empty() {
            output.push_str(&format!("      Hint: {}\n", finding.hint.yellow()));
        }
        if self.verbose {
            for (key, value) in &finding.metadata {
                output.push_str(&format!("      {} {}: {}\n", "→".dimmed(), key, value));
            }
        }
        output
    }

    fn format_summary(&self, report: &DoctorReport) -> String {
        let mut output = format!("\n{}\n", "Summary".bold().underline());

        let errors = report.count(Severity::Error);
        let warnings = report.count(Severity::Warn);
        match report.severity {
            Severity::Error => output.push_str(&format!(
                "  {} {} check(s) failed, {} with warnings\n",
                "✗".red(),
                errors,
                warnings
            )),
            Severity::Warn => output.push_str(&format!(
                "  {} {} check(s) with warnings\n",
                "⚠".yellow(),
                warnings
            )),
            Severity::Ok | Severity::Info => output.push_str(&format!(
                "  {} All {} check(s) passed\n",
                "✓".green(),
                report.checks.len()
            )),
        }
        output
    }

    fn format_json(&self, report: &DoctorReport) -> String {
        serde_json::to_string_pretty(report)
            .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize: {}\"}}", e))
    }

    fn format_yaml(&self, report: &DoctorReport) -> String {
        serde_yaml_ng::to_string(report)
            .unwrap_or_else(|e| format!("error: \"Failed to serialize: {}\"", e))
    }
}

impl Default for DoctorReporter {
    fn default() -> Self {
        Self::new(false)
    }
}

fn severity_icon(severity: Severity) -> String {
    match severity {
        Severity::Ok => "✓".green().to_string(),
        Severity::Info => "i".blue().to_string(),
        Severity::Warn => "⚠".yellow().to_string(),
        Severity::Error => "✗".red().to_string(),
    }
}
