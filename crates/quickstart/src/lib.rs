//! # quickstart
//!
//! Assembles a fully wired admin console from an [`AdminConfig`], optional
//! back-end hooks and a set of modules.
//!
//! ```rust,no_run
//! use quickstart::{AdapterHooks, AdminBuilder, AdminConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let admin = AdminBuilder::new(AdminConfig::new("/admin", "en"))
//!     .with_hooks(AdapterHooks::default())
//!     .build()
//!     .await?;
//! let report = quickstart::doctor::run_doctor(&admin).await;
//! assert!(report.is_healthy());
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod builder;
pub mod debug;
pub mod error;
pub mod features;
pub mod logging;
pub mod templates;
pub mod users;

pub use adapters::{
    apply_adapter_integrations, resolve_adapters, ActivityAdapter, ActivitySinkHook, AdapterHooks,
    OptionsStoreHook, PersistentCms, PersistentCmsHook,
};
pub use builder::{AdminBuilder, BINDING_TRANSLATION_POLICY};
pub use debug::{DebugOptions, DebugPanelCatalog};
pub use error::BootstrapError;
pub use features::effective_feature_defaults;
pub use logging::init_tracing;
pub use users::{RoleRepository, UserManagementConfig, UserRepository};

pub use quickstart_core::{
    AdapterFlags, AdapterResult, Admin, AdminConfig, AdminModule, CapabilitySnapshot, ErrorKind,
    Features,
};

pub use quickstart_doctor as doctor;
pub use quickstart_modules as modules;
pub use quickstart_translation as translation;
pub use quickstart_workflow as workflow;
