//! Feature-gate defaults handed to the admin instance

use quickstart_core::AdminConfig;
use quickstart_translation::ResolvedTranslationProduct;
use std::collections::BTreeMap;

/// Effective feature defaults, later layers winning:
///
/// 1. the config's feature record
/// 2. the config's ad-hoc feature flags
/// 3. translation module toggles from the resolved product
/// 4. defaults passed to the builder
/// 5. the debug feature key, mirroring `debug.enabled`
pub fn effective_feature_defaults(
    config: &AdminConfig,
    translation: Option<&ResolvedTranslationProduct>,
    overrides: &BTreeMap<String, bool>,
) -> BTreeMap<String, bool> {
    let mut defaults = config.features.to_flags();
    defaults.extend(config.feature_flags.iter().map(|(k, v)| (k.clone(), *v)));
    if let Some(resolved) = translation {
        defaults.extend(resolved.feature_defaults());
    }
    defaults.extend(overrides.iter().map(|(k, v)| (k.clone(), *v)));

    let debug_key = config.debug.feature_key.trim();
    if !debug_key.is_empty() {
        defaults.insert(debug_key.to_string(), config.debug.enabled);
    }
    defaults
}
