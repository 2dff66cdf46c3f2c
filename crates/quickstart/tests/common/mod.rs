//! Shared fixtures for bootstrap tests
//!
//! - Modules that record their registration
//! - Adapter hooks with fixed outcomes
//! - An in-memory exchange store and activity sink

#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use quickstart::adapters::{
    ActivityAdapter, ActivitySinkHook, OptionsStoreHook, PersistentCms, PersistentCmsHook,
};
use quickstart::{AdminBuilder, AdminConfig, AdminModule};
use quickstart_core::env::MapEnv;
use quickstart_core::memory::InMemoryCms;
use quickstart_core::ports::{ActivitySink, UrlResolver};
use quickstart_core::types::{ActivityEntry, MenuItem, ModuleManifest};
use quickstart_core::ModuleContext;
use quickstart_translation::{ExchangeRow, ExchangeStore, ExportFilter};
use std::sync::Arc;

pub const WORKFLOWS_YAML: &str = r#"
workflows:
  pages:
    initial_state: draft
    transitions:
      - name: publish
        from: draft
        to: published
"#;

/// Builder over `/admin` reading from an in-memory environment
pub fn builder_with_env(pairs: &[(&str, &str)]) -> AdminBuilder {
    let env = MapEnv::from_pairs(pairs.iter().copied());
    AdminBuilder::new(AdminConfig::new("/admin", "en")).with_env(Arc::new(env))
}

pub fn builder() -> AdminBuilder {
    builder_with_env(&[])
}

/// Module that logs its registration and registers a panel named after itself
pub struct RecordingModule {
    pub id: String,
    pub dependencies: Vec<String>,
    pub fail: bool,
    pub log: Arc<Mutex<Vec<String>>>,
}

impl RecordingModule {
    pub fn new(id: &str, log: &Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            id: id.to_string(),
            dependencies: Vec::new(),
            fail: false,
            log: log.clone(),
        }
    }

    pub fn after(mut self, dependency: &str) -> Self {
        self.dependencies.push(dependency.to_string());
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn boxed(self) -> Arc<dyn AdminModule> {
        Arc::new(self)
    }
}

impl AdminModule for RecordingModule {
    fn manifest(&self) -> ModuleManifest {
        ModuleManifest::new(&self.id).with_dependencies(self.dependencies.clone())
    }

    fn register(&self, ctx: &mut ModuleContext<'_>) -> Result<()> {
        if self.fail {
            anyhow::bail!("{} storage is offline", self.id);
        }
        self.log.lock().push(self.id.clone());
        ctx.admin.registry_mut().register_panel(self.id.clone());
        Ok(())
    }

    fn menu_items(&self, _locale: &str) -> Vec<MenuItem> {
        vec![MenuItem::item(format!("nav.{}", self.id), &self.id)
            .with_parent("nav.group.main.content")]
    }
}

#[derive(Default)]
pub struct MemoryExchangeStore {
    pub rows: Mutex<Vec<ExchangeRow>>,
}

#[async_trait]
impl ExchangeStore for MemoryExchangeStore {
    async fn export_rows(&self, _filter: &ExportFilter) -> Result<Vec<ExchangeRow>> {
        Ok(self.rows.lock().clone())
    }

    async fn has_target(&self, _row: &ExchangeRow) -> Result<bool> {
        Ok(true)
    }

    async fn upsert(&self, row: ExchangeRow) -> Result<()> {
        self.rows.lock().push(row);
        Ok(())
    }
}

pub fn exchange_store() -> Arc<dyn ExchangeStore> {
    Arc::new(MemoryExchangeStore::default())
}

/// Persistent CMS hook that either succeeds or fails
pub struct CmsHook {
    pub fail: bool,
}

#[async_trait]
impl PersistentCmsHook for CmsHook {
    async fn build(&self, _default_locale: &str) -> Result<Option<PersistentCms>> {
        if self.fail {
            anyhow::bail!("connection refused");
        }
        Ok(Some(PersistentCms::new(Arc::new(InMemoryCms::new()), "sql CMS")))
    }
}

/// Persistent CMS hook over a caller-owned CMS that records the locale it was given
#[derive(Default)]
pub struct SharedCmsHook {
    pub cms: Arc<InMemoryCms>,
    pub locales: Mutex<Vec<String>>,
}

#[async_trait]
impl PersistentCmsHook for SharedCmsHook {
    async fn build(&self, default_locale: &str) -> Result<Option<PersistentCms>> {
        self.locales.lock().push(default_locale.to_string());
        Ok(Some(PersistentCms::new(self.cms.clone(), "shared CMS")))
    }
}

/// Resolver owned by the host application
pub struct HostUrls;

impl UrlResolver for HostUrls {
    fn resolve(&self, name: &str) -> Option<String> {
        (name == "admin.dashboard").then(|| "/host/admin".to_string())
    }
}

pub struct OptionsHook(pub &'static str);

#[async_trait]
impl OptionsStoreHook for OptionsHook {
    async fn build(&self) -> Result<String> {
        Ok(self.0.to_string())
    }
}

#[derive(Default)]
pub struct ActivityLog {
    pub entries: Mutex<Vec<ActivityEntry>>,
}

#[async_trait]
impl ActivitySink for ActivityLog {
    async fn record(&self, entry: ActivityEntry) -> Result<()> {
        self.entries.lock().push(entry);
        Ok(())
    }
}

pub struct ActivityHook(pub Arc<ActivityLog>);

#[async_trait]
impl ActivitySinkHook for ActivityHook {
    async fn build(&self) -> Result<Option<ActivityAdapter>> {
        Ok(Some(ActivityAdapter::new(self.0.clone(), "users activity")))
    }
}
