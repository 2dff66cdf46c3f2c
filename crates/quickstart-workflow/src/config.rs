//! Workflow config file format and loaders
//!
//! ```yaml
//! schema_version: 1
//! workflows:
//!   editorial.news:
//!     initial_state: draft
//!     transitions:
//!       - name: submit_for_approval
//!         from: draft
//!         to: approval
//! trait_defaults:
//!   editorial: editorial.news
//! ```
//!
//! `trait_workflow_defaults` is accepted as a legacy spelling of
//! `trait_defaults`. When both name the same trait the canonical key wins.

use crate::normalize::{normalize_trait_key, normalize_workflow_config};
use camino::Utf8Path;
use quickstart_core::config::{load_config_file, parse_config, ConfigFormat};
use quickstart_core::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current workflow config schema version
pub const WORKFLOW_SCHEMA_VERSION: i64 = 1;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionSpec {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub guard: String,
}

impl TransitionSpec {
    pub fn new(name: &str, from: &str, to: &str) -> Self {
        Self {
            name: name.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            ..Default::default()
        }
    }
}

/// One workflow as written in a config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowDefinitionSpec {
    /// Overrides the map key when non-blank
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub initial_state: String,
    pub transitions: Vec<TransitionSpec>,
}

/// Versioned set of workflow definitions plus trait defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub schema_version: i64,
    pub workflows: BTreeMap<String, WorkflowDefinitionSpec>,
    /// Trait name to workflow ID
    pub trait_defaults: BTreeMap<String, String>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            schema_version: WORKFLOW_SCHEMA_VERSION,
            workflows: BTreeMap::new(),
            trait_defaults: BTreeMap::new(),
        }
    }
}

impl WorkflowConfig {
    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty() && self.trait_defaults.is_empty()
    }
}

/// On-disk shape, which also carries the legacy trait key
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WorkflowConfigFile {
    schema_version: i64,
    workflows: BTreeMap<String, WorkflowDefinitionSpec>,
    trait_defaults: BTreeMap<String, String>,
    trait_workflow_defaults: BTreeMap<String, String>,
}

impl From<WorkflowConfigFile> for WorkflowConfig {
    fn from(file: WorkflowConfigFile) -> Self {
        let mut trait_defaults = BTreeMap::new();
        let legacy = file.trait_workflow_defaults.into_iter();
        let canonical = file.trait_defaults.into_iter();
        for (name, workflow) in legacy.chain(canonical) {
            trait_defaults.insert(normalize_trait_key(&name), workflow);
        }

        WorkflowConfig {
            schema_version: file.schema_version,
            workflows: file.workflows,
            trait_defaults,
        }
    }
}

/// Parse and normalize workflow config contents
///
/// `ext` is the file extension (`yaml`, `yml`, `json`, with or without the dot).
pub fn parse_workflow_config(contents: &str, ext: &str) -> Result<WorkflowConfig> {
    let format = ConfigFormat::from_extension(ext)?;
    let file: WorkflowConfigFile = parse_config(contents, format)?;
    Ok(normalize_workflow_config(file.into()))
}

/// Load a workflow config file; an empty path yields the default config
pub fn load_workflow_config_file(path: &Utf8Path) -> Result<WorkflowConfig> {
    if path.as_str().trim().is_empty() {
        return Ok(WorkflowConfig::default());
    }
    let file: WorkflowConfigFile = load_config_file(path)?;
    tracing::debug!("loaded workflow config from {}", path);
    Ok(normalize_workflow_config(file.into()))
}
