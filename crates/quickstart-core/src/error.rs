//! Error types for quickstart-core
//!
//! Every error that callers need to match on carries an [`ErrorKind`]. Kinds
//! survive wrapping: [`is_kind`] walks the full `source()` chain of an
//! `anyhow::Error`, so `register module x: <workflow error>` still matches
//! [`ErrorKind::WorkflowConfig`].

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Result type alias using quickstart-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Sentinel categories surfaced to callers of the bootstrap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    WorkflowConfig,
    TranslationExchangeConfig,
    TranslationQueueConfig,
    TranslationProductConfig,
    TranslationPolicyConfig,
    SeedNavigationRequiresCms,
    ResetUnsupported,
    UserManagementConfig,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::WorkflowConfig => "workflow config",
            ErrorKind::TranslationExchangeConfig => "translation exchange config",
            ErrorKind::TranslationQueueConfig => "translation queue config",
            ErrorKind::TranslationProductConfig => "translation product config",
            ErrorKind::TranslationPolicyConfig => "translation policy config",
            ErrorKind::SeedNavigationRequiresCms => "seed navigation requires cms",
            ErrorKind::ResetUnsupported => "reset unsupported",
            ErrorKind::UserManagementConfig => "user management config",
        };
        f.write_str(name)
    }
}

/// A single field-level configuration problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    /// Dotted path of the offending field (e.g. `workflows.news.initial_state`)
    pub field: String,
    /// What is wrong with it
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Join issues into a single `field: message; field: message` line
    pub fn join(issues: &[FieldIssue]) -> String {
        issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

/// Structured validation failure with a stable code
///
/// The payload produced by [`ValidationError::payload`] is what operators see in
/// logs: `{error_code, error_message, hint, failed_checks}`.
#[derive(Debug, Error)]
#[error("{code}: {reason}")]
pub struct ValidationError {
    pub kind: ErrorKind,
    pub code: String,
    pub reason: String,
    pub hint: String,
    pub failed_checks: Vec<String>,
    /// Names of missing pieces (handlers, locales) when relevant
    pub missing: Vec<String>,
    #[source]
    pub cause: Option<Box<Error>>,
}

impl ValidationError {
    pub fn new(kind: ErrorKind, code: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            reason: reason.into(),
            hint: String::new(),
            failed_checks: Vec::new(),
            missing: Vec::new(),
            cause: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    pub fn with_failed_checks<I, S>(mut self, checks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut checks: Vec<String> = checks.into_iter().map(Into::into).collect();
        checks.sort();
        checks.dedup();
        self.failed_checks = checks;
        self
    }

    pub fn with_missing<I, S>(mut self, missing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.missing = missing.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cause(mut self, cause: Error) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Render the operator-facing payload
    pub fn payload(&self) -> serde_json::Value {
        let mut payload = serde_json::json!({
            "error_code": self.code,
            "error_message": self.reason,
            "hint": self.hint,
            "failed_checks": self.failed_checks,
        });
        if !self.missing.is_empty() {
            payload["missing"] = serde_json::json!(self.missing);
        }
        payload
    }

    /// Check whether this error or any nested cause has the given kind
    pub fn has_kind(&self, kind: ErrorKind) -> bool {
        self.kind == kind || self.cause.as_deref().is_some_and(|c| c.is(kind))
    }
}

/// Core error types for the admin quickstart
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration format
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Unsupported configuration file extension
    #[error("file extension not supported: {extension}")]
    UnsupportedExtension { extension: String },

    /// Aggregated workflow configuration problems
    #[error("invalid workflow config: {}", FieldIssue::join(.issues))]
    WorkflowConfig { issues: Vec<FieldIssue> },

    /// Structured validation failure (translation product, exchange, queue, policy)
    #[error(transparent)]
    Validation(Box<ValidationError>),

    /// Navigation seeding needs a CMS-backed menu service
    #[error("seed navigation requires a CMS menu service")]
    SeedNavigationRequiresCms,

    /// The menu service exposes no reset capability
    #[error("menu service does not support reset")]
    ResetUnsupported,

    /// User-management adapter misconfiguration
    #[error("user management config: {message}")]
    UserManagementConfig { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Self::Validation(Box::new(err))
    }
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an unsupported extension error
    pub fn unsupported_extension(extension: impl Into<String>) -> Self {
        Self::UnsupportedExtension {
            extension: extension.into(),
        }
    }

    /// Create a workflow config error from a list of issues
    pub fn workflow(issues: Vec<FieldIssue>) -> Self {
        Self::WorkflowConfig { issues }
    }

    /// Create a single-issue workflow config error
    pub fn workflow_issue(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WorkflowConfig {
            issues: vec![FieldIssue::new(field, message)],
        }
    }

    /// Create a user management config error
    pub fn user_management(message: impl Into<String>) -> Self {
        Self::UserManagementConfig {
            message: message.into(),
        }
    }

    /// Sentinel category of this error, if any
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::WorkflowConfig { .. } => Some(ErrorKind::WorkflowConfig),
            Error::Validation(v) => Some(v.kind),
            Error::SeedNavigationRequiresCms => Some(ErrorKind::SeedNavigationRequiresCms),
            Error::ResetUnsupported => Some(ErrorKind::ResetUnsupported),
            Error::UserManagementConfig { .. } => Some(ErrorKind::UserManagementConfig),
            _ => None,
        }
    }

    /// Check whether this error (or a nested validation cause) has the given kind
    pub fn is(&self, kind: ErrorKind) -> bool {
        match self {
            Error::Validation(v) => v.has_kind(kind),
            other => other.kind() == Some(kind),
        }
    }

    /// Field issues carried by a workflow error
    pub fn issues(&self) -> &[FieldIssue] {
        match self {
            Error::WorkflowConfig { issues } => issues,
            _ => &[],
        }
    }

    /// Structured validation payload, if this is a validation error
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Error::Validation(v) => Some(v),
            _ => None,
        }
    }
}

/// Check whether any error in the chain carries the given sentinel kind
pub fn is_kind(err: &anyhow::Error, kind: ErrorKind) -> bool {
    err.chain().any(|cause| {
        if let Some(e) = cause.downcast_ref::<Error>() {
            return e.is(kind);
        }
        cause
            .downcast_ref::<ValidationError>()
            .is_some_and(|v| v.has_kind(kind))
    })
}

/// Find the first quickstart error in an `anyhow` chain
pub fn find_error(err: &anyhow::Error) -> Option<&Error> {
    err.chain().find_map(|cause| cause.downcast_ref::<Error>())
}
