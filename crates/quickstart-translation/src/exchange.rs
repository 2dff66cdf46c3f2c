//! Translation exchange: export rows for translators, validate and apply imports
//!
//! Hosts either hand over a single [`ExchangeStore`], from which the in-core
//! [`ExchangeService`] derives all three handlers, or provide the exporter,
//! validator and applier one by one. An `async_apply` handler always replaces
//! the applier.

use anyhow::Result;
use async_trait::async_trait;
use quickstart_core::admin::Permission;
use quickstart_core::{ErrorKind, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub const CODE_EXCHANGE_HANDLERS_MISSING: &str = "translation.exchange.handlers_missing";

/// One translatable field value travelling through an exchange file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeRow {
    pub resource: String,
    pub entity_id: String,
    pub field: String,
    pub source_locale: String,
    pub target_locale: String,
    pub source_text: String,
    pub translated_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportFilter {
    pub resources: Vec<String>,
    pub target_locales: Vec<String>,
}

/// Problem with one imported row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowIssue {
    pub index: usize,
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: Vec<ExchangeRow>,
    pub issues: Vec<RowIssue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyReport {
    pub applied: usize,
    pub rejected: Vec<RowIssue>,
}

/// Backing storage for the in-core exchange service
#[async_trait]
pub trait ExchangeStore: Send + Sync {
    async fn export_rows(&self, filter: &ExportFilter) -> Result<Vec<ExchangeRow>>;

    /// Whether the row's resource/entity/field/locale target exists
    async fn has_target(&self, row: &ExchangeRow) -> Result<bool>;

    async fn upsert(&self, row: ExchangeRow) -> Result<()>;
}

#[async_trait]
pub trait ExchangeExporter: Send + Sync {
    async fn export(&self, filter: &ExportFilter) -> Result<Vec<ExchangeRow>>;
}

#[async_trait]
pub trait ExchangeValidator: Send + Sync {
    async fn validate(&self, rows: &[ExchangeRow]) -> Result<ValidationReport>;
}

#[async_trait]
pub trait ExchangeApplier: Send + Sync {
    async fn apply(&self, rows: Vec<ExchangeRow>) -> Result<ApplyReport>;
}

/// Receives the permissions a translation module wants registered
pub type PermissionRegister = Arc<dyn Fn(&[Permission]) -> Result<()> + Send + Sync>;

/// Exporter, validator and applier derived from an [`ExchangeStore`]
#[derive(Clone)]
pub struct ExchangeService {
    store: Arc<dyn ExchangeStore>,
}

impl ExchangeService {
    pub fn new(store: Arc<dyn ExchangeStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ExchangeExporter for ExchangeService {
    async fn export(&self, filter: &ExportFilter) -> Result<Vec<ExchangeRow>> {
        self.store.export_rows(filter).await
    }
}

#[async_trait]
impl ExchangeValidator for ExchangeService {
    async fn validate(&self, rows: &[ExchangeRow]) -> Result<ValidationReport> {
        let mut report = ValidationReport::default();
        for (index, row) in rows.iter().enumerate() {
            let issue = |field: &str, message: &str| RowIssue {
                index,
                field: field.to_string(),
                message: message.to_string(),
            };

            if row.target_locale.trim().is_empty() {
                report.issues.push(issue("target_locale", "target locale is required"));
                continue;
            }
            if row.translated_text.trim().is_empty() {
                report.issues.push(issue("translated_text", "translation is blank"));
                continue;
            }
            if !self.store.has_target(row).await? {
                report
                    .issues
                    .push(issue("entity_id", "unknown translation target"));
                continue;
            }
            report.valid.push(row.clone());
        }
        Ok(report)
    }
}

#[async_trait]
impl ExchangeApplier for ExchangeService {
    async fn apply(&self, rows: Vec<ExchangeRow>) -> Result<ApplyReport> {
        let report = self.validate(&rows).await?;
        let applied = report.valid.len();
        for row in report.valid {
            self.store.upsert(row).await?;
        }
        Ok(ApplyReport {
            applied,
            rejected: report.issues,
        })
    }
}

/// Exchange module configuration
#[derive(Clone, Default)]
pub struct TranslationExchangeConfig {
    pub enabled: bool,
    pub store: Option<Arc<dyn ExchangeStore>>,
    pub exporter: Option<Arc<dyn ExchangeExporter>>,
    pub validator: Option<Arc<dyn ExchangeValidator>>,
    pub applier: Option<Arc<dyn ExchangeApplier>>,
    /// Replaces `applier` when set
    pub async_apply: Option<Arc<dyn ExchangeApplier>>,
    pub permission_register: Option<PermissionRegister>,
}

impl fmt::Debug for TranslationExchangeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationExchangeConfig")
            .field("enabled", &self.enabled)
            .field("store", &self.store.is_some())
            .field("exporter", &self.exporter.is_some())
            .field("validator", &self.validator.is_some())
            .field("applier", &self.applier.is_some())
            .field("async_apply", &self.async_apply.is_some())
            .field("permission_register", &self.permission_register.is_some())
            .finish()
    }
}

impl TranslationExchangeConfig {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Default::default()
        }
    }

    pub fn with_store(mut self, store: Arc<dyn ExchangeStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Overlay `other` on `self`: `enabled` is taken verbatim, handlers only
    /// when set
    pub fn merged_with(&self, other: &Self) -> Self {
        Self {
            enabled: other.enabled,
            store: other.store.clone().or_else(|| self.store.clone()),
            exporter: other.exporter.clone().or_else(|| self.exporter.clone()),
            validator: other.validator.clone().or_else(|| self.validator.clone()),
            applier: other.applier.clone().or_else(|| self.applier.clone()),
            async_apply: other.async_apply.clone().or_else(|| self.async_apply.clone()),
            permission_register: other
                .permission_register
                .clone()
                .or_else(|| self.permission_register.clone()),
        }
    }
}

/// The three handlers an enabled exchange module runs with
#[derive(Clone)]
pub struct ExchangeHandlers {
    pub exporter: Arc<dyn ExchangeExporter>,
    pub validator: Arc<dyn ExchangeValidator>,
    pub applier: Arc<dyn ExchangeApplier>,
}

impl fmt::Debug for ExchangeHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ExchangeHandlers")
    }
}

/// Resolve exchange handlers from a config
///
/// Explicit handlers win over those synthesized from the store.
pub fn resolve_exchange_handlers(
    cfg: &TranslationExchangeConfig,
) -> quickstart_core::Result<ExchangeHandlers> {
    let service = cfg
        .store
        .clone()
        .map(|store| Arc::new(ExchangeService::new(store)));

    let exporter = cfg.exporter.clone().or_else(|| {
        service
            .clone()
            .map(|s| s as Arc<dyn ExchangeExporter>)
    });
    let validator = cfg.validator.clone().or_else(|| {
        service
            .clone()
            .map(|s| s as Arc<dyn ExchangeValidator>)
    });
    let applier = cfg
        .async_apply
        .clone()
        .or_else(|| cfg.applier.clone())
        .or_else(|| service.map(|s| s as Arc<dyn ExchangeApplier>));

    match (exporter, validator, applier) {
        (Some(exporter), Some(validator), Some(applier)) => Ok(ExchangeHandlers {
            exporter,
            validator,
            applier,
        }),
        (exporter, validator, applier) => {
            let missing: Vec<&str> = [
                ("exporter", exporter.is_none()),
                ("validator", validator.is_none()),
                ("applier", applier.is_none()),
            ]
            .into_iter()
            .filter_map(|(name, missing)| missing.then_some(name))
            .collect();
            Err(ValidationError::new(
                ErrorKind::TranslationExchangeConfig,
                CODE_EXCHANGE_HANDLERS_MISSING,
                format!("missing exchange handlers: {}", missing.join(", ")),
            )
            .with_hint("provide an exchange store or explicit exporter, validator and applier")
            .with_missing(missing)
            .into())
        }
    }
}

/// Exchange handlers bound on the admin registry
#[derive(Clone)]
pub struct ExchangeBinding {
    pub handlers: ExchangeHandlers,
}
