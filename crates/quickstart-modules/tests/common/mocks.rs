//! Mock collaborators for registration and seeding tests

#![allow(dead_code)]

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use quickstart_core::ports::{LegacyMenuReset, MenuService, ResetMenuByCode};
use quickstart_core::types::{Menu, MenuItem, ModuleManifest};
use quickstart_core::{AdminModule, ModuleContext};
use std::collections::HashMap;
use std::sync::Arc;

/// Which reset capability a [`FlatMenuService`] exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetMode {
    None,
    ByCode,
    Legacy,
    Failing,
}

/// Flat menu store; items are never nested
pub struct FlatMenuService {
    menus: Mutex<HashMap<String, Menu>>,
    mode: ResetMode,
    resets: Mutex<Vec<String>>,
}

impl FlatMenuService {
    pub fn new(mode: ResetMode) -> Self {
        Self {
            menus: Mutex::new(HashMap::new()),
            mode,
            resets: Mutex::new(Vec::new()),
        }
    }

    pub fn item_ids(&self, code: &str) -> Vec<String> {
        self.menus
            .lock()
            .get(code)
            .map(|m| m.items.iter().map(|i| i.id.clone()).collect())
            .unwrap_or_default()
    }

    /// Menu codes passed to a successful reset
    pub fn resets(&self) -> Vec<String> {
        self.resets.lock().clone()
    }

    fn clear(&self, code: &str) -> Result<()> {
        if self.mode == ResetMode::Failing {
            bail!("menu store is read-only");
        }
        if let Some(menu) = self.menus.lock().get_mut(code) {
            menu.items.clear();
        }
        self.resets.lock().push(code.to_string());
        Ok(())
    }
}

#[async_trait]
impl MenuService for FlatMenuService {
    async fn create_menu(&self, code: &str) -> Result<()> {
        let mut menus = self.menus.lock();
        if menus.contains_key(code) {
            bail!("menu {code} already exists");
        }
        menus.insert(code.to_string(), Menu::new(code));
        Ok(())
    }

    async fn menu(&self, code: &str, _locale: &str) -> Result<Menu> {
        self.menus
            .lock()
            .get(code)
            .cloned()
            .ok_or_else(|| anyhow!("menu {code} not found"))
    }

    async fn add_menu_item(&self, code: &str, item: MenuItem) -> Result<()> {
        let mut menus = self.menus.lock();
        let menu = menus
            .get_mut(code)
            .ok_or_else(|| anyhow!("menu {code} not found"))?;
        menu.items.push(item);
        Ok(())
    }

    fn as_reset_menu_by_code(&self) -> Option<&dyn ResetMenuByCode> {
        match self.mode {
            ResetMode::ByCode | ResetMode::Failing => Some(self),
            _ => None,
        }
    }

    fn as_legacy_reset(&self) -> Option<&dyn LegacyMenuReset> {
        match self.mode {
            ResetMode::Legacy => Some(self),
            _ => None,
        }
    }
}

#[async_trait]
impl ResetMenuByCode for FlatMenuService {
    async fn reset_menu_by_code(&self, code: &str) -> Result<()> {
        self.clear(code)
    }
}

impl LegacyMenuReset for FlatMenuService {
    fn reset(&self, code: &str) -> Result<()> {
        self.clear(code)
    }
}

/// Module that appends its ID to a shared log when registered
pub struct RecordingModule {
    pub manifest: ModuleManifest,
    pub items: Vec<MenuItem>,
    pub log: Arc<Mutex<Vec<String>>>,
    pub fail: bool,
}

impl RecordingModule {
    pub fn new(id: &str, deps: &[&str], log: &Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            manifest: ModuleManifest::new(id).with_dependencies(deps.iter().copied()),
            items: Vec::new(),
            log: Arc::clone(log),
            fail: false,
        }
    }

    pub fn with_item(mut self, item: MenuItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn arc(self) -> Arc<dyn AdminModule> {
        Arc::new(self)
    }
}

impl AdminModule for RecordingModule {
    fn manifest(&self) -> ModuleManifest {
        self.manifest.clone()
    }

    fn register(&self, ctx: &mut ModuleContext<'_>) -> Result<()> {
        if self.fail {
            bail!("{} refused to register", self.manifest.id);
        }
        ctx.admin
            .registry_mut()
            .register_panel(format!("{}.panel", self.manifest.id));
        self.log.lock().push(self.manifest.id.clone());
        Ok(())
    }

    fn menu_items(&self, _locale: &str) -> Vec<MenuItem> {
        self.items.clone()
    }
}
