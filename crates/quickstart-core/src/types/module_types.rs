//! Module manifests

use serde::{Deserialize, Serialize};

/// Identity and dependencies of an admin module
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleManifest {
    /// Unique within one bootstrap
    pub id: String,
    pub name: String,
    pub description: String,
    /// IDs that must be registered first
    pub dependencies: Vec<String>,
}

impl ModuleManifest {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }
}
