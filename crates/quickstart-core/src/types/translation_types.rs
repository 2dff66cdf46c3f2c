//! Translation check types shared by the policy and checker implementations

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How missing required fields are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequiredFieldsStrategy {
    #[default]
    Error,
    Warn,
    Ignore,
}

impl RequiredFieldsStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Ignore => "ignore",
        }
    }
}

impl fmt::Display for RequiredFieldsStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequiredFieldsStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "ignore" => Ok(Self::Ignore),
            other => Err(format!("unknown required fields strategy: {other}")),
        }
    }
}

/// Extra inputs passed to a translation checker
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationCheckOptions {
    pub state: String,
    pub environment: String,
    /// Required field names keyed by locale
    pub required_fields: std::collections::BTreeMap<String, Vec<String>>,
    pub required_fields_strategy: RequiredFieldsStrategy,
}
