//! Translation product profile resolution
//!
//! A profile selects which translation modules are on by default. Explicit
//! module configs refine the profile defaults; legacy module options replace
//! the merged result outright and leave a warning behind.

use crate::exchange::{resolve_exchange_handlers, ExchangeHandlers, TranslationExchangeConfig};
use crate::policy::TranslationPolicyConfig;
use crate::queue::{QueuePriority, TranslationQueueConfig};
use quickstart_core::capability::TRANSLATION_PRODUCT_SCHEMA_VERSION;
use quickstart_core::config::{FEATURE_TRANSLATION_EXCHANGE, FEATURE_TRANSLATION_QUEUE};
use quickstart_core::utils::{dedupe_case_insensitive, locale_sets_match};
use quickstart_core::{Error, ErrorKind, Result, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

pub const CODE_SCHEMA_INVALID: &str = "translation.productization.schema.invalid";
pub const CODE_SCHEMA_UNSUPPORTED: &str = "translation.productization.schema.unsupported";
pub const CODE_PROFILE_UNKNOWN: &str = "translation.productization.profile.unknown";
pub const CODE_REQUIRES_CMS: &str = "translation.productization.requires_cms";
pub const CODE_EXCHANGE_HANDLERS_MISSING: &str =
    "translation.productization.exchange.handlers_missing";
pub const CODE_QUEUE_LOCALES_INVALID: &str = "translation.productization.queue.locales_invalid";
pub const CODE_QUEUE_PRIORITY_INVALID: &str = "translation.productization.queue.priority_invalid";
pub const CODE_RUNTIME_INVALID: &str = "translation.productization.runtime.invalid";

/// Warning attached to the capability snapshot when legacy module options win
pub const WARNING_LEGACY_OVERRIDE: &str = "translation.productization.legacy_override";

pub const CHECK_CMS_ENABLED: &str = "feature.cms.enabled";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TranslationProfile {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "core")]
    Core,
    #[serde(rename = "core+exchange")]
    CoreExchange,
    #[serde(rename = "core+queue")]
    CoreQueue,
    #[serde(rename = "full")]
    Full,
}

impl TranslationProfile {
    pub const ALL: [TranslationProfile; 5] = [
        Self::None,
        Self::Core,
        Self::CoreExchange,
        Self::CoreQueue,
        Self::Full,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Core => "core",
            Self::CoreExchange => "core+exchange",
            Self::CoreQueue => "core+queue",
            Self::Full => "full",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim().to_lowercase();
        Self::ALL.into_iter().find(|p| p.as_str() == raw)
    }
}

impl fmt::Display for TranslationProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Module switches implied by a profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileDefaults {
    pub exchange: bool,
    pub queue: bool,
}

pub fn translation_profile_defaults(profile: TranslationProfile) -> ProfileDefaults {
    match profile {
        TranslationProfile::CoreExchange => ProfileDefaults {
            exchange: true,
            queue: false,
        },
        TranslationProfile::CoreQueue => ProfileDefaults {
            exchange: false,
            queue: true,
        },
        TranslationProfile::Full => ProfileDefaults {
            exchange: true,
            queue: true,
        },
        TranslationProfile::None | TranslationProfile::Core => ProfileDefaults::default(),
    }
}

fn product_error(code: &str, reason: impl Into<String>) -> ValidationError {
    ValidationError::new(ErrorKind::TranslationProductConfig, code, reason)
}

/// `0` means current; negative and future versions are rejected
pub fn normalize_product_schema_version(version: i64) -> Result<i64> {
    match version {
        0 => Ok(TRANSLATION_PRODUCT_SCHEMA_VERSION),
        v if v < 0 => Err(product_error(
            CODE_SCHEMA_INVALID,
            format!("schema version {v} must not be negative"),
        )
        .with_hint("omit schema_version or set it to 1")
        .with_failed_checks(["schema_version"])
        .into()),
        v if v > TRANSLATION_PRODUCT_SCHEMA_VERSION => Err(product_error(
            CODE_SCHEMA_UNSUPPORTED,
            format!(
                "schema version {v} is newer than supported version {}",
                TRANSLATION_PRODUCT_SCHEMA_VERSION
            ),
        )
        .with_hint("upgrade the admin quickstart or lower schema_version")
        .with_failed_checks(["schema_version"])
        .into()),
        v => Ok(v),
    }
}

/// Parse a profile name; blank means `core` with the CMS and `none` without
pub fn resolve_translation_profile(raw: &str, cms_enabled: bool) -> Result<TranslationProfile> {
    if raw.trim().is_empty() {
        return Ok(if cms_enabled {
            TranslationProfile::Core
        } else {
            TranslationProfile::None
        });
    }
    TranslationProfile::parse(raw).ok_or_else(|| {
        product_error(
            CODE_PROFILE_UNKNOWN,
            format!("unknown translation profile {:?}", raw.trim()),
        )
        .with_hint("use one of none, core, core+exchange, core+queue, full")
        .with_failed_checks(["profile"])
        .into()
    })
}

/// Product-level translation settings
#[derive(Debug, Clone, Default)]
pub struct TranslationProductConfig {
    pub schema_version: i64,
    pub profile: String,
    pub exchange: Option<TranslationExchangeConfig>,
    pub queue: Option<TranslationQueueConfig>,
}

impl TranslationProductConfig {
    pub fn with_profile(profile: &str) -> Self {
        Self {
            profile: profile.to_string(),
            ..Default::default()
        }
    }
}

/// Everything the bootstrap was told about translations
#[derive(Debug, Clone, Default)]
pub struct TranslationProductOptions {
    pub product: Option<TranslationProductConfig>,
    /// Module configs given through the older per-module options
    pub legacy_exchange: Option<TranslationExchangeConfig>,
    pub legacy_queue: Option<TranslationQueueConfig>,
}

impl TranslationProductOptions {
    pub fn is_set(&self) -> bool {
        self.product.is_some() || self.legacy_exchange.is_some() || self.legacy_queue.is_some()
    }
}

/// Outcome of profile resolution
#[derive(Debug, Clone)]
pub struct ResolvedTranslationProduct {
    pub schema_version: i64,
    pub profile: TranslationProfile,
    pub exchange: TranslationExchangeConfig,
    pub queue: TranslationQueueConfig,
    /// Present when the exchange module is enabled
    pub exchange_handlers: Option<ExchangeHandlers>,
    pub queue_priority: QueuePriority,
    pub warnings: Vec<String>,
}

impl ResolvedTranslationProduct {
    /// Feature flag defaults implied by the resolved modules
    pub fn feature_defaults(&self) -> BTreeMap<String, bool> {
        BTreeMap::from([
            (FEATURE_TRANSLATION_EXCHANGE.to_string(), self.exchange.enabled),
            (FEATURE_TRANSLATION_QUEUE.to_string(), self.queue.enabled),
        ])
    }
}

/// Resolve the translation product from options and the CMS feature state
///
/// `policy` supplies locales for the queue when it has none of its own and is
/// checked against them when it does.
pub fn resolve_translation_product(
    opts: &TranslationProductOptions,
    cms_enabled: bool,
    policy: Option<&TranslationPolicyConfig>,
) -> Result<ResolvedTranslationProduct> {
    let product = opts.product.clone().unwrap_or_default();

    let schema_version = normalize_product_schema_version(product.schema_version)?;
    let profile = resolve_translation_profile(&product.profile, cms_enabled)?;
    if profile != TranslationProfile::None && !cms_enabled {
        return Err(product_error(
            CODE_REQUIRES_CMS,
            format!("translation profile {profile} requires the CMS feature"),
        )
        .with_hint("enable features.cms or use translation profile none")
        .with_failed_checks([CHECK_CMS_ENABLED])
        .into());
    }

    let defaults = translation_profile_defaults(profile);
    let mut exchange = TranslationExchangeConfig {
        enabled: defaults.exchange,
        ..Default::default()
    };
    let mut queue = TranslationQueueConfig {
        enabled: defaults.queue,
        ..Default::default()
    };
    if let Some(explicit) = &product.exchange {
        exchange = exchange.merged_with(explicit);
    }
    if let Some(explicit) = &product.queue {
        queue = queue.merged_with(explicit);
    }

    let mut warnings = Vec::new();
    if opts.legacy_exchange.is_some() || opts.legacy_queue.is_some() {
        warn!(
            "legacy translation module options override the {} profile ({})",
            profile, WARNING_LEGACY_OVERRIDE
        );
        warnings.push(WARNING_LEGACY_OVERRIDE.to_string());
    }
    if let Some(legacy) = &opts.legacy_exchange {
        exchange = legacy.clone();
    }
    if let Some(legacy) = &opts.legacy_queue {
        queue = legacy.clone();
    }

    let exchange_handlers = if exchange.enabled {
        let handlers = resolve_exchange_handlers(&exchange).map_err(|cause| {
            let missing = cause
                .as_validation()
                .map(|v| v.missing.clone())
                .unwrap_or_default();
            product_error(
                CODE_EXCHANGE_HANDLERS_MISSING,
                format!(
                    "translation exchange is enabled but handlers are missing: {}",
                    missing.join(", ")
                ),
            )
            .with_hint("configure an exchange store or explicit exchange handlers")
            .with_failed_checks(["exchange.handlers"])
            .with_missing(missing)
            .with_cause(cause)
        })?;
        Some(handlers)
    } else {
        None
    };

    let mut queue_priority = QueuePriority::default();
    if queue.enabled {
        queue_priority = queue.priority().map_err(|cause| {
            product_error(CODE_QUEUE_PRIORITY_INVALID, cause.reason.clone())
                .with_hint(cause.hint.clone())
                .with_failed_checks(["queue.default_priority"])
                .with_cause(cause.into())
        })?;
        queue.supported_locales = resolve_queue_locales(&queue.supported_locales, policy)?;
    }

    debug!(
        "translation profile {} (exchange: {}, queue: {})",
        profile, exchange.enabled, queue.enabled
    );
    Ok(ResolvedTranslationProduct {
        schema_version,
        profile,
        exchange,
        queue,
        exchange_handlers,
        queue_priority,
        warnings,
    })
}

fn resolve_queue_locales(
    supported: &[String],
    policy: Option<&TranslationPolicyConfig>,
) -> Result<Vec<String>> {
    let supported = dedupe_case_insensitive(supported);
    let from_policy = policy.map(|p| p.all_locales()).unwrap_or_default();

    let queue_error = |reason: String| -> Error {
        let cause: Error = ValidationError::new(
            ErrorKind::TranslationQueueConfig,
            "translation.queue.locales_invalid",
            reason.clone(),
        )
        .into();
        product_error(CODE_QUEUE_LOCALES_INVALID, reason)
            .with_hint("set queue supported_locales to the locales the translation policy requires")
            .with_failed_checks(["queue.supported_locales"])
            .with_cause(cause)
            .into()
    };

    match (supported.is_empty(), from_policy.is_empty()) {
        (true, true) => Err(queue_error(
            "translation queue has no supported locales and the translation policy defines none"
                .to_string(),
        )),
        (true, false) => Ok(from_policy),
        (false, true) => Ok(supported),
        (false, false) if locale_sets_match(&supported, &from_policy) => Ok(supported),
        (false, false) => Err(queue_error(format!(
            "queue supported locales [{}] do not match policy locales [{}]",
            supported.join(", "),
            from_policy.join(", ")
        ))),
    }
}
