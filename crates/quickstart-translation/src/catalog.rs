//! Validation of a translation policy against known entities and transitions

use crate::policy::{strip_entity_discriminator, TranslationPolicyConfig};
use quickstart_core::types::{RequiredFieldsStrategy, WorkflowDefinition};
use quickstart_core::utils::normalize_lookup_key;
use quickstart_core::{ErrorKind, FieldIssue, ValidationError};
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

pub const CODE_POLICY_CATALOG_INVALID: &str = "translation.policy.catalog.invalid";

/// Known transitions, environments and fields of one entity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityCatalog {
    pub transitions: BTreeSet<String>,
    pub fields: BTreeSet<String>,
}

/// Inventory a policy is checked against
///
/// Entity, transition and field names are stored normalized. An empty field
/// set or environment set means "anything goes" for that dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyCatalog {
    entities: BTreeMap<String, EntityCatalog>,
    environments: BTreeSet<String>,
}

impl PolicyCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// One entity per workflow, with the workflow's transition names
    pub fn from_workflows(definitions: &BTreeMap<String, WorkflowDefinition>) -> Self {
        let mut catalog = Self::new();
        for (id, definition) in definitions {
            catalog = catalog.with_entity(id, definition.transition_names());
        }
        catalog
    }

    pub fn with_entity<I, S>(mut self, entity: &str, transitions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entry = self
            .entities
            .entry(normalize_lookup_key(entity))
            .or_default();
        entry
            .transitions
            .extend(transitions.into_iter().map(|t| normalize_lookup_key(t.as_ref())));
        self
    }

    pub fn with_fields<I, S>(mut self, entity: &str, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entry = self
            .entities
            .entry(normalize_lookup_key(entity))
            .or_default();
        entry
            .fields
            .extend(fields.into_iter().map(|f| normalize_lookup_key(f.as_ref())));
        self
    }

    pub fn with_environments<I, S>(mut self, environments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.environments
            .extend(environments.into_iter().map(|e| normalize_lookup_key(e.as_ref())));
        self
    }

    pub fn entity(&self, name: &str) -> Option<&EntityCatalog> {
        self.entities.get(&normalize_lookup_key(name))
    }
}

/// Every mismatch between a policy and a catalog
pub fn policy_catalog_issues(
    policy: &TranslationPolicyConfig,
    catalog: &PolicyCatalog,
) -> Vec<FieldIssue> {
    let mut issues = Vec::new();

    for (entity_key, transitions) in &policy.required {
        let entity = strip_entity_discriminator(entity_key);
        let base = format!("required.{entity_key}");
        let Some(known) = catalog.entity(entity) else {
            issues.push(FieldIssue::new(base, format!("unknown entity {entity:?}")));
            continue;
        };

        for (transition, req) in transitions {
            let path = format!("{base}.{transition}");
            if !known.transitions.contains(&normalize_lookup_key(transition)) {
                issues.push(FieldIssue::new(
                    &path,
                    format!("unknown transition {:?}", transition.trim()),
                ));
            }

            let mut field_sets = vec![(format!("{path}.required_fields"), &req.required_fields)];
            for (env, env_req) in &req.environments {
                let env_path = format!("{path}.environments.{env}");
                if !catalog.environments.is_empty()
                    && !catalog.environments.contains(&normalize_lookup_key(env))
                {
                    issues.push(FieldIssue::new(
                        &env_path,
                        format!("unknown environment {:?}", env.trim()),
                    ));
                }
                field_sets.push((format!("{env_path}.required_fields"), &env_req.required_fields));
            }

            if known.fields.is_empty() {
                continue;
            }
            for (fields_path, by_locale) in field_sets {
                for (locale, fields) in by_locale {
                    for field in fields {
                        if !known.fields.contains(&normalize_lookup_key(field)) {
                            issues.push(FieldIssue::new(
                                format!("{fields_path}.{locale}"),
                                format!("unknown field {:?}", field.trim()),
                            ));
                        }
                    }
                }
            }
        }
    }

    issues
}

/// Check a policy against a catalog, honouring the policy's strategy
///
/// `error` turns issues into a [`ValidationError`], `warn` logs them and
/// returns them, `ignore` returns nothing.
pub fn validate_policy_catalog(
    policy: &TranslationPolicyConfig,
    catalog: &PolicyCatalog,
) -> quickstart_core::Result<Vec<FieldIssue>> {
    let strategy = policy.required_fields_strategy;
    if strategy == RequiredFieldsStrategy::Ignore {
        return Ok(Vec::new());
    }

    let issues = policy_catalog_issues(policy, catalog);
    if issues.is_empty() {
        return Ok(issues);
    }

    match strategy {
        RequiredFieldsStrategy::Error => Err(ValidationError::new(
            ErrorKind::TranslationPolicyConfig,
            CODE_POLICY_CATALOG_INVALID,
            FieldIssue::join(&issues),
        )
        .with_hint("align the translation policy with the registered workflows")
        .with_failed_checks(issues.iter().map(|i| i.field.clone()))
        .into()),
        _ => {
            for issue in &issues {
                warn!("translation policy: {}", issue);
            }
            Ok(issues)
        }
    }
}
