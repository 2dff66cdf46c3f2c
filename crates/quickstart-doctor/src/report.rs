//! Doctor run results

use chrono::{DateTime, Utc};
use quickstart_core::{Admin, CheckResult, Severity};
use serde::{Deserialize, Serialize};

/// Outcome of running every registered check once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorReport {
    pub generated_at: DateTime<Utc>,
    pub base_path: String,
    /// Worst severity across all checks
    pub severity: Severity,
    pub checks: Vec<CheckResult>,
}

impl DoctorReport {
    pub fn new(base_path: impl Into<String>, checks: Vec<CheckResult>) -> Self {
        let severity = checks
            .iter()
            .map(|c| c.severity)
            .max()
            .unwrap_or(Severity::Ok);
        Self {
            generated_at: Utc::now(),
            base_path: base_path.into(),
            severity,
            checks,
        }
    }

    /// No check reported an error
    pub fn is_healthy(&self) -> bool {
        self.severity < Severity::Error
    }

    /// Number of checks at the given severity
    pub fn count(&self, severity: Severity) -> usize {
        self.checks.iter().filter(|c| c.severity == severity).count()
    }

    pub fn check(&self, id: &str) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.id == id)
    }
}

/// Run every doctor check registered on `admin`
pub async fn run_doctor(admin: &Admin) -> DoctorReport {
    let results = admin.run_doctor().await;
    let report = DoctorReport::new(admin.base_path(), results);
    tracing::debug!(
        "doctor ran {} check(s), overall {}",
        report.checks.len(),
        report.severity
    );
    report
}
