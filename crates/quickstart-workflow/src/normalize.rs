//! Normalization and merging of workflow configs

use crate::config::{TransitionSpec, WorkflowConfig, WORKFLOW_SCHEMA_VERSION};
use std::collections::BTreeMap;

/// Trait names are matched case-insensitively
pub(crate) fn normalize_trait_key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn normalize_transition(t: TransitionSpec) -> TransitionSpec {
    TransitionSpec {
        name: t.name.trim().to_string(),
        description: t.description.trim().to_string(),
        from: t.from.trim().to_string(),
        to: t.to.trim().to_string(),
        guard: t.guard.trim().to_string(),
    }
}

/// Normalize a workflow config
///
/// - a schema version of zero or below becomes the current version
/// - each workflow is keyed by its trimmed `id`, or its trimmed map key when
///   the `id` is blank; workflows with no usable ID are dropped
/// - transition fields are trimmed
/// - trait names are trimmed and lowercased, workflow IDs only trimmed;
///   entries with a blank side are dropped
///
/// Normalizing an already normalized config returns it unchanged.
pub fn normalize_workflow_config(cfg: WorkflowConfig) -> WorkflowConfig {
    let schema_version = if cfg.schema_version <= 0 {
        WORKFLOW_SCHEMA_VERSION
    } else {
        cfg.schema_version
    };

    let mut workflows = BTreeMap::new();
    for (key, mut spec) in cfg.workflows {
        let id = match spec.id.trim() {
            "" => key.trim().to_string(),
            id => id.to_string(),
        };
        if id.is_empty() {
            tracing::debug!("dropping workflow without an ID");
            continue;
        }
        spec.id = id.clone();
        spec.initial_state = spec.initial_state.trim().to_string();
        spec.transitions = spec
            .transitions
            .into_iter()
            .map(normalize_transition)
            .collect();
        workflows.insert(id, spec);
    }

    let trait_defaults = cfg
        .trait_defaults
        .into_iter()
        .map(|(name, workflow)| (normalize_trait_key(&name), workflow.trim().to_string()))
        .filter(|(name, workflow)| !name.is_empty() && !workflow.is_empty())
        .collect();

    WorkflowConfig {
        schema_version,
        workflows,
        trait_defaults,
    }
}

/// Merge `overlay` over `base`
///
/// Both sides are normalized first. Workflows and trait defaults from the
/// overlay replace same-keyed entries in the base. The overlay's schema version
/// is used when it is non-zero.
pub fn merge_workflow_configs(base: WorkflowConfig, overlay: WorkflowConfig) -> WorkflowConfig {
    let schema_version = if overlay.schema_version != 0 {
        overlay.schema_version
    } else {
        base.schema_version
    };

    let mut merged = normalize_workflow_config(base);
    let overlay = normalize_workflow_config(overlay);
    merged.workflows.extend(overlay.workflows);
    merged.trait_defaults.extend(overlay.trait_defaults);
    merged.schema_version = schema_version;

    normalize_workflow_config(merged)
}
