//! Shared fixtures for quickstart-workflow tests

#![allow(dead_code)]

use parking_lot::Mutex;
use quickstart_core::ports::{WorkflowCatalog, WorkflowEngine};
use quickstart_core::types::WorkflowDefinition;
use quickstart_workflow::{TransitionSpec, WorkflowConfig, WorkflowDefinitionSpec};
use std::collections::HashSet;

pub const NEWS_YAML: &str = r#"
schema_version: 1
workflows:
  editorial.news:
    initial_state: draft
    transitions:
      - name: submit_for_approval
        from: draft
        to: approval
      - name: publish
        from: approval
        to: published
trait_defaults:
  editorial: editorial.news
"#;

/// Single-transition workflow spec
pub fn simple_spec(initial: &str, name: &str, to: &str) -> WorkflowDefinitionSpec {
    WorkflowDefinitionSpec {
        id: String::new(),
        initial_state: initial.to_string(),
        transitions: vec![TransitionSpec::new(name, initial, to)],
    }
}

pub fn config_with(workflows: &[(&str, WorkflowDefinitionSpec)]) -> WorkflowConfig {
    let mut cfg = WorkflowConfig::default();
    for (id, spec) in workflows {
        cfg.workflows.insert(id.to_string(), spec.clone());
    }
    cfg
}

/// Engine that can be queried but not extended
pub struct ReadOnlyEngine {
    known: HashSet<String>,
    pub queried: Mutex<Vec<String>>,
}

impl ReadOnlyEngine {
    pub fn new(known: &[&str]) -> Self {
        Self {
            known: known.iter().map(|s| s.to_string()).collect(),
            queried: Mutex::new(Vec::new()),
        }
    }
}

impl WorkflowEngine for ReadOnlyEngine {
    fn as_catalog(&self) -> Option<&dyn WorkflowCatalog> {
        Some(self)
    }
}

impl WorkflowCatalog for ReadOnlyEngine {
    fn has_workflow(&self, id: &str) -> bool {
        self.queried.lock().push(id.to_string());
        self.known.contains(id)
    }
}

/// Engine with neither registration nor a catalog
pub struct OpaqueEngine;

impl WorkflowEngine for OpaqueEngine {}

pub fn definition_ids(defs: &[WorkflowDefinition]) -> Vec<&str> {
    defs.iter().map(|d| d.entity_type.as_str()).collect()
}
