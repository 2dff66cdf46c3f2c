//! # quickstart-translation
//!
//! Translation policy checks, product profile resolution, exchange and queue
//! wiring, and the capability snapshot published for each admin.
//!
//! The bootstrap runs these in order: [`resolve_translation_product`] before
//! the admin exists, [`install_translation_product`] once it does, then
//! [`build_capability_snapshot`] and [`validate_translation_runtime`].

pub mod catalog;
pub mod exchange;
pub mod policy;
pub mod product;
pub mod queue;
pub mod snapshot;
pub mod wiring;

pub use catalog::{policy_catalog_issues, validate_policy_catalog, EntityCatalog, PolicyCatalog};
pub use exchange::{
    resolve_exchange_handlers, ApplyReport, ExchangeApplier, ExchangeBinding, ExchangeExporter,
    ExchangeHandlers, ExchangeRow, ExchangeService, ExchangeStore, ExchangeValidator,
    ExportFilter, PermissionRegister, RowIssue, TranslationExchangeConfig, ValidationReport,
};
pub use policy::{
    EnvironmentRequirements, MissingTranslationsError, PolicyError, PolicyInput, Requirements,
    TransitionRequirements, TranslationPolicy, TranslationPolicyConfig,
};
pub use product::{
    resolve_translation_product, resolve_translation_profile, translation_profile_defaults,
    ResolvedTranslationProduct, TranslationProductConfig, TranslationProductOptions,
    TranslationProfile, WARNING_LEGACY_OVERRIDE,
};
pub use queue::{
    QueueAssignment, QueueBinding, QueuePriority, QueueRepository, QueueService,
    TranslationQueueConfig,
};
pub use snapshot::{build_capability_snapshot, validate_translation_runtime};
pub use wiring::install_translation_product;
