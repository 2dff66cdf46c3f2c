//! Structural validation of workflow configs

use crate::config::{WorkflowConfig, WORKFLOW_SCHEMA_VERSION};
use quickstart_core::utils::normalize_lookup_key;
use quickstart_core::{Error, FieldIssue, Result};
use std::collections::HashSet;

/// Collect every structural problem in a workflow config
pub fn workflow_config_issues(cfg: &WorkflowConfig) -> Vec<FieldIssue> {
    let mut issues = Vec::new();

    if cfg.schema_version > WORKFLOW_SCHEMA_VERSION {
        issues.push(FieldIssue::new(
            "schema_version",
            format!(
                "unsupported schema version {} (current is {})",
                cfg.schema_version, WORKFLOW_SCHEMA_VERSION
            ),
        ));
    }

    for (key, spec) in &cfg.workflows {
        let id = match spec.id.trim() {
            "" => key.trim(),
            id => id,
        };
        if id.is_empty() {
            issues.push(FieldIssue::new("workflows", "workflow ID is required"));
            continue;
        }
        let base = format!("workflows.{id}");

        if spec.initial_state.trim().is_empty() {
            issues.push(FieldIssue::new(
                format!("{base}.initial_state"),
                "initial state is required",
            ));
        }
        if spec.transitions.is_empty() {
            issues.push(FieldIssue::new(
                format!("{base}.transitions"),
                "at least one transition is required",
            ));
        }

        let mut names = HashSet::new();
        for (i, transition) in spec.transitions.iter().enumerate() {
            let path = format!("{base}.transitions[{i}]");
            for (field, value) in [
                ("name", &transition.name),
                ("from", &transition.from),
                ("to", &transition.to),
            ] {
                if value.trim().is_empty() {
                    issues.push(FieldIssue::new(format!("{path}.{field}"), "is required"));
                }
            }

            let name = normalize_lookup_key(&transition.name);
            if !name.is_empty() && !names.insert(name) {
                issues.push(FieldIssue::new(
                    format!("{path}.name"),
                    format!("duplicate transition name {:?}", transition.name.trim()),
                ));
            }
        }
    }

    issues
}

/// Validate a workflow config, reporting every issue at once
pub fn validate_workflow_config(cfg: &WorkflowConfig) -> Result<()> {
    let issues = workflow_config_issues(cfg);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::workflow(issues))
    }
}
