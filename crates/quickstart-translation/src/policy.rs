//! Translation policy: which locales must exist before a transition
//!
//! A policy maps `entity → transition → requirements`. Requirements can be
//! narrowed per environment; an environment entry replaces the transition's
//! locales and required fields when it defines them.
//!
//! ```yaml
//! required_fields_strategy: error
//! required:
//!   pages:
//!     publish:
//!       locales: [en, fr]
//!       required_fields:
//!         fr: [title, path]
//!       environments:
//!         staging:
//!           locales: [en]
//! ```

use camino::Utf8Path;
use quickstart_core::config::load_config_file;
use quickstart_core::ports::{content_checker, pages_checker, CmsContainer, TranslationChecker};
use quickstart_core::types::{RequiredFieldsStrategy, TranslationCheckOptions};
use quickstart_core::utils::{
    case_insensitive_lookup, dedupe_case_insensitive, normalize_lookup_key,
    normalize_required_field_names,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Entity name whose checks go to the page checker
pub const PAGES_ENTITY: &str = "pages";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentRequirements {
    pub locales: Vec<String>,
    /// Required field names keyed by locale
    pub required_fields: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionRequirements {
    pub locales: Vec<String>,
    pub required_fields: BTreeMap<String, Vec<String>>,
    pub environments: BTreeMap<String, EnvironmentRequirements>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationPolicyConfig {
    /// Fail transitions that have no requirements at all
    pub deny_by_default: bool,
    pub required_fields_strategy: RequiredFieldsStrategy,
    /// entity → transition → requirements
    pub required: BTreeMap<String, BTreeMap<String, TransitionRequirements>>,
}

impl TranslationPolicyConfig {
    /// Load a policy from a YAML or JSON file
    pub fn load(path: &Utf8Path) -> quickstart_core::Result<Self> {
        load_config_file(path)
    }

    /// Every locale named anywhere in the policy, deduplicated case-insensitively
    pub fn all_locales(&self) -> Vec<String> {
        let mut locales = Vec::new();
        for transitions in self.required.values() {
            for req in transitions.values() {
                locales.extend(req.locales.iter().cloned());
                locales.extend(req.required_fields.keys().cloned());
                for env in req.environments.values() {
                    locales.extend(env.locales.iter().cloned());
                    locales.extend(env.required_fields.keys().cloned());
                }
            }
        }
        dedupe_case_insensitive(locales)
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_empty()
    }
}

/// Strip a discriminator prefix (`blog@pages` → `pages`)
pub fn strip_entity_discriminator(entity: &str) -> &str {
    let entity = entity.trim();
    match entity.split_once('@') {
        Some((_, rest)) => rest.trim(),
        None => entity,
    }
}

/// What a transition needs before it may proceed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Requirements {
    pub locales: Vec<String>,
    /// Normalized required-field names keyed by locale
    pub required_fields: BTreeMap<String, Vec<String>>,
    pub required_fields_strategy: RequiredFieldsStrategy,
}

/// A transition about to happen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyInput {
    pub entity_type: String,
    /// Overrides `entity_type` for the policy lookup
    pub policy_entity: String,
    pub entity_id: String,
    pub transition: String,
    pub environment: String,
    pub state: String,
    pub requested_locale: String,
}

impl PolicyInput {
    pub fn new(entity_type: &str, entity_id: &str, transition: &str) -> Self {
        Self {
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            transition: transition.to_string(),
            ..Default::default()
        }
    }

    pub fn with_environment(mut self, environment: &str) -> Self {
        self.environment = environment.to_string();
        self
    }

    /// Entity name used for the policy lookup
    pub fn resolved_entity(&self) -> String {
        let entity = match self.policy_entity.trim() {
            "" => self.entity_type.as_str(),
            entity => entity,
        };
        strip_entity_discriminator(entity).to_string()
    }
}

/// Translations missing for a transition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MissingTranslationsError {
    pub entity_type: String,
    pub policy_entity: String,
    pub entity_id: String,
    pub transition: String,
    pub environment: String,
    pub requested_locale: String,
    pub missing_locales: Vec<String>,
    pub missing_fields_by_locale: BTreeMap<String, Vec<String>>,
    pub required_fields_evaluated: bool,
}

impl fmt::Display for MissingTranslationsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.missing_locales.is_empty() {
            write!(
                f,
                "no translation requirements for {} {}",
                self.policy_entity, self.transition
            )
        } else {
            write!(
                f,
                "missing translations for {} {}: {}",
                self.policy_entity,
                self.transition,
                self.missing_locales.join(", ")
            )
        }
    }
}

impl std::error::Error for MissingTranslationsError {}

/// Why a policy check did not pass
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error(transparent)]
    Missing(#[from] MissingTranslationsError),

    #[error("{0} translation checker unavailable")]
    CheckerUnavailable(String),

    #[error("invalid entity id {id:?}: {source}")]
    InvalidEntityId {
        id: String,
        #[source]
        source: uuid::Error,
    },

    #[error("translation check failed: {0:#}")]
    Checker(anyhow::Error),
}

impl PolicyError {
    pub fn as_missing(&self) -> Option<&MissingTranslationsError> {
        match self {
            PolicyError::Missing(m) => Some(m),
            _ => None,
        }
    }
}

/// Policy plus the checkers it delegates to
#[derive(Clone, Default)]
pub struct TranslationPolicy {
    config: TranslationPolicyConfig,
    pages: Option<Arc<dyn TranslationChecker>>,
    content: Option<Arc<dyn TranslationChecker>>,
}

impl fmt::Debug for TranslationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationPolicy")
            .field("config", &self.config)
            .field("pages", &self.pages.is_some())
            .field("content", &self.content.is_some())
            .finish()
    }
}

impl TranslationPolicy {
    pub fn new(config: TranslationPolicyConfig) -> Self {
        Self {
            config,
            pages: None,
            content: None,
        }
    }

    /// Policy whose checkers are discovered on a CMS container
    pub fn from_cms(config: TranslationPolicyConfig, cms: &dyn CmsContainer) -> Self {
        Self {
            config,
            pages: pages_checker(cms),
            content: content_checker(cms),
        }
    }

    pub fn with_pages_checker(mut self, checker: Arc<dyn TranslationChecker>) -> Self {
        self.pages = Some(checker);
        self
    }

    pub fn with_content_checker(mut self, checker: Arc<dyn TranslationChecker>) -> Self {
        self.content = Some(checker);
        self
    }

    pub fn config(&self) -> &TranslationPolicyConfig {
        &self.config
    }

    /// Resolve requirements without calling any checker
    ///
    /// The flag is `true` when the policy has an entry for the entity and
    /// transition.
    pub fn requirements(&self, input: &PolicyInput) -> (Requirements, bool) {
        let strategy = self.config.required_fields_strategy;
        let entity = input.resolved_entity();

        let found = case_insensitive_lookup(&self.config.required, &entity)
            .and_then(|(_, transitions)| {
                case_insensitive_lookup(transitions, input.transition.trim())
            })
            .map(|(_, req)| req);
        let Some(req) = found else {
            return (
                Requirements {
                    required_fields_strategy: strategy,
                    ..Default::default()
                },
                false,
            );
        };

        let mut locales = req.locales.clone();
        let mut required_fields = req.required_fields.clone();
        let environment = input.environment.trim();
        if !environment.is_empty() {
            if let Some((_, env)) = case_insensitive_lookup(&req.environments, environment) {
                if !env.locales.is_empty() {
                    locales = env.locales.clone();
                }
                if !env.required_fields.is_empty() {
                    required_fields = env.required_fields.clone();
                }
            }
        }

        let required_fields: BTreeMap<String, Vec<String>> = required_fields
            .into_iter()
            .map(|(locale, fields)| {
                (locale.trim().to_string(), normalize_required_field_names(fields))
            })
            .filter(|(locale, _)| !locale.is_empty())
            .collect();

        let mut locales = dedupe_case_insensitive(locales);
        if locales.is_empty() && !required_fields.is_empty() {
            let mut derived = dedupe_case_insensitive(required_fields.keys());
            derived.sort_by_key(|l| normalize_lookup_key(l));
            locales = derived;
        }

        (
            Requirements {
                locales,
                required_fields,
                required_fields_strategy: strategy,
            },
            true,
        )
    }

    /// Check that every required translation exists for a transition
    pub async fn validate(&self, input: &PolicyInput) -> Result<(), PolicyError> {
        let entity = input.resolved_entity();
        let (requirements, found) = self.requirements(input);

        let missing = |missing_locales: Vec<String>| MissingTranslationsError {
            entity_type: input.entity_type.trim().to_string(),
            policy_entity: entity.clone(),
            entity_id: input.entity_id.trim().to_string(),
            transition: input.transition.trim().to_string(),
            environment: input.environment.trim().to_string(),
            requested_locale: input.requested_locale.trim().to_string(),
            missing_locales,
            ..Default::default()
        };

        if !found {
            if self.config.deny_by_default {
                return Err(missing(Vec::new()).into());
            }
            return Ok(());
        }
        if requirements.locales.is_empty() {
            return Ok(());
        }

        let id = Uuid::parse_str(input.entity_id.trim()).map_err(|source| {
            PolicyError::InvalidEntityId {
                id: input.entity_id.clone(),
                source,
            }
        })?;

        let (checker_name, checker) = if normalize_lookup_key(&entity) == PAGES_ENTITY {
            ("pages", self.pages.as_ref())
        } else {
            ("content", self.content.as_ref())
        };
        let checker =
            checker.ok_or_else(|| PolicyError::CheckerUnavailable(checker_name.to_string()))?;

        let strategy = requirements.required_fields_strategy;
        let options = TranslationCheckOptions {
            state: input.state.trim().to_string(),
            environment: input.environment.trim().to_string(),
            required_fields: requirements.required_fields.clone(),
            required_fields_strategy: strategy,
        };
        let missing_locales = checker
            .check_translations(id, &requirements.locales, &options)
            .await
            .map_err(PolicyError::Checker)?;
        let missing_locales = dedupe_case_insensitive(missing_locales);
        if missing_locales.is_empty() {
            return Ok(());
        }

        let mut err = missing(missing_locales);
        err.required_fields_evaluated =
            strategy != RequiredFieldsStrategy::Ignore && !requirements.required_fields.is_empty();
        if strategy != RequiredFieldsStrategy::Ignore {
            for locale in &err.missing_locales {
                if let Some((_, fields)) =
                    case_insensitive_lookup(&requirements.required_fields, locale)
                {
                    if !fields.is_empty() {
                        err.missing_fields_by_locale
                            .insert(locale.clone(), fields.clone());
                    }
                }
            }
        }

        tracing::debug!("{}", err);
        Err(err.into())
    }
}
