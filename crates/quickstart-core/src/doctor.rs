//! Diagnostic check contract shared by the admin instance and check catalog

use crate::admin::Admin;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Finding severity, ordered from least to most serious
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Ok,
    Info,
    Warn,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Ok => "ok",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        };
        f.write_str(label)
    }
}

/// One observation produced by a check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub code: String,
    pub component: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hint: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Finding {
    pub fn new(
        severity: Severity,
        code: impl Into<String>,
        component: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            code: code.into(),
            component: component.into(),
            message: message.into(),
            hint: String::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn ok(
        code: impl Into<String>,
        component: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Ok, code, component, message)
    }

    pub fn info(
        code: impl Into<String>,
        component: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Info, code, component, message)
    }

    pub fn warn(
        code: impl Into<String>,
        component: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Warn, code, component, message)
    }

    pub fn error(
        code: impl Into<String>,
        component: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Error, code, component, message)
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Everything a check returns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckOutput {
    pub findings: Vec<Finding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl CheckOutput {
    pub fn new(findings: Vec<Finding>) -> Self {
        Self {
            findings,
            ..Default::default()
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Most serious severity among the findings; `Ok` when there are none
    pub fn severity(&self) -> Severity {
        self.findings
            .iter()
            .map(|f| f.severity)
            .max()
            .unwrap_or(Severity::Ok)
    }
}

/// A diagnostic run against a fully built admin instance
#[async_trait]
pub trait DoctorCheck: Send + Sync {
    /// Unique ID; registration ignores later checks with the same ID
    fn id(&self) -> &str;

    fn label(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    fn help(&self) -> &str {
        ""
    }

    /// Suggested remediation shown next to failing results
    fn action(&self) -> &str {
        ""
    }

    async fn run(&self, admin: &Admin) -> CheckOutput;
}

/// Result of one check within a doctor run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub action: String,
    pub severity: Severity,
    #[serde(flatten)]
    pub output: CheckOutput,
}

impl CheckResult {
    pub fn new(check: &dyn DoctorCheck, output: CheckOutput) -> Self {
        Self {
            id: check.id().to_string(),
            label: check.label().to_string(),
            action: check.action().to_string(),
            severity: output.severity(),
            output,
        }
    }
}
