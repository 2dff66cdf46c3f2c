//! Conversion to engine definitions and registration

use crate::config::WorkflowConfig;
use crate::normalize::normalize_workflow_config;
use crate::validate::validate_workflow_config;
use anyhow::{Context, Result};
use quickstart_core::ports::WorkflowEngine;
use quickstart_core::types::{WorkflowDefinition, WorkflowTransition};
use quickstart_core::{Error, FieldIssue};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Engine-level definitions keyed by workflow ID
pub fn workflow_definitions_from_config(
    cfg: &WorkflowConfig,
) -> BTreeMap<String, WorkflowDefinition> {
    cfg.workflows
        .iter()
        .map(|(id, spec)| {
            let transitions = spec
                .transitions
                .iter()
                .map(|t| WorkflowTransition {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    from: t.from.clone(),
                    to: t.to.clone(),
                    guard: Some(t.guard.clone()).filter(|g| !g.trim().is_empty()),
                })
                .collect();
            let definition = WorkflowDefinition {
                entity_type: id.clone(),
                initial_state: spec.initial_state.clone(),
                transitions,
            };
            (id.clone(), definition)
        })
        .collect()
}

/// Trait name to workflow ID, without blank entries
pub fn workflow_trait_defaults_from_config(cfg: &WorkflowConfig) -> BTreeMap<String, String> {
    cfg.trait_defaults
        .iter()
        .filter(|(name, id)| !name.trim().is_empty() && !id.trim().is_empty())
        .map(|(name, id)| (name.clone(), id.clone()))
        .collect()
}

/// Outcome of [`register_workflows`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowRegistration {
    /// Workflow IDs handed to the engine, sorted
    pub registered: Vec<String>,
    pub trait_defaults: BTreeMap<String, String>,
}

/// Validate a workflow config and register its definitions with an engine
///
/// Every trait default must point at a workflow defined in the config or one
/// the engine already knows. Definitions require an engine that accepts
/// registration.
pub fn register_workflows(
    engine: Option<&dyn WorkflowEngine>,
    cfg: &WorkflowConfig,
) -> Result<WorkflowRegistration> {
    let cfg = normalize_workflow_config(cfg.clone());
    validate_workflow_config(&cfg)?;

    let definitions = workflow_definitions_from_config(&cfg);
    let trait_defaults = workflow_trait_defaults_from_config(&cfg);

    let catalog = engine.and_then(|e| e.as_catalog());
    let unknown: Vec<FieldIssue> = trait_defaults
        .iter()
        .filter(|(_, id)| {
            !definitions.contains_key(id.as_str())
                && !catalog.is_some_and(|c| c.has_workflow(id))
        })
        .map(|(name, id)| {
            FieldIssue::new(
                format!("trait_defaults.{name}"),
                format!("references unknown workflow_id {id:?}"),
            )
        })
        .collect();
    if !unknown.is_empty() {
        return Err(Error::workflow(unknown).into());
    }

    if definitions.is_empty() {
        debug!("no workflow definitions to register");
        return Ok(WorkflowRegistration {
            registered: Vec::new(),
            trait_defaults,
        });
    }

    let registry = engine.and_then(|e| e.as_registry()).ok_or_else(|| {
        Error::workflow_issue("workflows", "workflow engine does not support registration")
    })?;

    let mut registered = Vec::with_capacity(definitions.len());
    for (id, definition) in definitions {
        registry
            .register_workflow(definition)
            .with_context(|| format!("register workflow {id}"))?;
        registered.push(id);
    }

    info!("Registered {} workflow definitions", registered.len());
    Ok(WorkflowRegistration {
        registered,
        trait_defaults,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_workflow_config;

    #[test]
    fn test_definitions_from_yaml() {
        let yaml = r#"
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
        guard: "  "
trait_defaults:
  editorial: editorial.news
"#;
        let cfg = parse_workflow_config(yaml, "yaml").unwrap();
        let defs = workflow_definitions_from_config(&cfg);

        let news = &defs["editorial.news"];
        assert_eq!(news.entity_type, "editorial.news");
        assert_eq!(news.initial_state, "draft");
        assert_eq!(
            news.transitions,
            vec![
                WorkflowTransition::new("submit_for_approval", "draft", "approval"),
                WorkflowTransition::new("publish", "approval", "published"),
            ]
        );

        let traits = workflow_trait_defaults_from_config(&cfg);
        assert_eq!(
            traits,
            BTreeMap::from([("editorial".to_string(), "editorial.news".to_string())])
        );
    }
}
