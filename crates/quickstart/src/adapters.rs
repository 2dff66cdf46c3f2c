//! Back-end adapter hooks selected by environment flags
//!
//! The persistent CMS is chosen before the admin exists because it replaces
//! the CMS section of the config. The options store and activity sink are
//! attached afterwards.

use async_trait::async_trait;
use quickstart_core::ports::{ActivitySink, CmsContainer};
use quickstart_core::{AdapterFlags, AdapterResult, Admin, AdminConfig};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A CMS container built by a [`PersistentCmsHook`]
#[derive(Clone)]
pub struct PersistentCms {
    pub container: Arc<dyn CmsContainer>,
    /// Label recorded as the CMS backend
    pub backend: String,
}

impl PersistentCms {
    pub fn new(container: Arc<dyn CmsContainer>, backend: impl Into<String>) -> Self {
        Self {
            container,
            backend: backend.into(),
        }
    }
}

/// An activity sink built by an [`ActivitySinkHook`]
#[derive(Clone)]
pub struct ActivityAdapter {
    pub sink: Arc<dyn ActivitySink>,
    pub backend: String,
}

impl ActivityAdapter {
    pub fn new(sink: Arc<dyn ActivitySink>, backend: impl Into<String>) -> Self {
        Self {
            sink,
            backend: backend.into(),
        }
    }
}

/// Builds the persistent CMS when `USE_PERSISTENT_CMS` is on
#[async_trait]
pub trait PersistentCmsHook: Send + Sync {
    /// `Ok(None)` keeps the in-memory CMS
    async fn build(&self, default_locale: &str) -> anyhow::Result<Option<PersistentCms>>;
}

/// Connects the options store when `USE_GO_OPTIONS` is on
#[async_trait]
pub trait OptionsStoreHook: Send + Sync {
    /// Backend label; blank keeps the in-memory label
    async fn build(&self) -> anyhow::Result<String>;
}

/// Builds the activity sink when `USE_GO_USERS_ACTIVITY` is on
#[async_trait]
pub trait ActivitySinkHook: Send + Sync {
    async fn build(&self) -> anyhow::Result<Option<ActivityAdapter>>;
}

/// Optional builders for the three swappable backends
#[derive(Clone, Default)]
pub struct AdapterHooks {
    pub persistent_cms: Option<Arc<dyn PersistentCmsHook>>,
    pub options_store: Option<Arc<dyn OptionsStoreHook>>,
    pub activity_sink: Option<Arc<dyn ActivitySinkHook>>,
}

impl AdapterHooks {
    pub fn with_persistent_cms(mut self, hook: Arc<dyn PersistentCmsHook>) -> Self {
        self.persistent_cms = Some(hook);
        self
    }

    pub fn with_options_store(mut self, hook: Arc<dyn OptionsStoreHook>) -> Self {
        self.options_store = Some(hook);
        self
    }

    pub fn with_activity_sink(mut self, hook: Arc<dyn ActivitySinkHook>) -> Self {
        self.activity_sink = Some(hook);
        self
    }
}

impl fmt::Debug for AdapterHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterHooks")
            .field("persistent_cms", &self.persistent_cms.is_some())
            .field("options_store", &self.options_store.is_some())
            .field("activity_sink", &self.activity_sink.is_some())
            .finish()
    }
}

/// Swap in the persistent CMS before the admin is constructed
///
/// Hook failures never abort bootstrap: the error is logged, recorded on the
/// trace for the doctor, and the in-memory CMS stays in place.
pub async fn resolve_adapters(
    config: AdminConfig,
    hooks: &AdapterHooks,
    flags: AdapterFlags,
) -> (AdminConfig, AdapterResult) {
    let mut result = AdapterResult::new(flags);
    if !flags.use_persistent_cms {
        return (config, result);
    }
    let Some(hook) = hooks.persistent_cms.as_ref() else {
        debug!("persistent CMS requested but no hook was provided");
        return (config, result);
    };

    match hook.build(&config.default_locale).await {
        Ok(Some(cms)) => {
            info!("Using persistent CMS backend: {}", cms.backend);
            result.cms_backend = cms.backend.clone();
            result.persistent_cms_set = true;
            let config = config.with_cms_container(cms.container, &cms.backend);
            (config, result)
        }
        Ok(None) => {
            debug!("persistent CMS hook returned no container");
            (config, result)
        }
        Err(err) => {
            warn!("Persistent CMS setup failed, keeping {}: {:#}", result.cms_backend, err);
            result.persistent_cms_error = Some(format!("{err:#}"));
            (config, result)
        }
    }
}

/// Attach the activity sink and options store once the admin exists
pub async fn apply_adapter_integrations(
    admin: &mut Admin,
    hooks: &AdapterHooks,
    result: &mut AdapterResult,
) {
    if result.flags.use_go_users_activity {
        if let Some(hook) = hooks.activity_sink.as_ref() {
            match hook.build().await {
                Ok(Some(adapter)) => {
                    info!("Attached activity sink: {}", adapter.backend);
                    admin.with_activity_sink(adapter.sink.clone());
                    result.activity_sink = Some(adapter.sink);
                    result.activity_backend = adapter.backend;
                }
                Ok(None) => debug!("activity hook returned no sink"),
                Err(err) => warn!("Activity sink setup failed: {:#}", err),
            }
        }
    }

    if result.flags.use_go_options {
        if let Some(hook) = hooks.options_store.as_ref() {
            match hook.build().await {
                Ok(label) if !label.trim().is_empty() => {
                    info!("Using options store: {}", label.trim());
                    result.settings_backend = label.trim().to_string();
                }
                Ok(_) => debug!("options hook returned a blank label"),
                Err(err) => warn!("Options store setup failed: {:#}", err),
            }
        }
    }

    admin.set_adapter_result(result.clone());
}
