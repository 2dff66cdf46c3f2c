//! In-memory collaborators
//!
//! These back the "in-memory *" adapter labels: the admin works out of the box
//! with them, and hosts swap in persistent services through adapter hooks.

use crate::ports::{
    CmsContainer, ContentProvider, ContentService, FeatureGate, MenuService, MutableFeatureGate,
    PagesProvider, ResetMenu, TranslationChecker, WorkflowCatalog, WorkflowEngine,
    WorkflowRegistry,
};
use crate::types::{BlockDefinition, Menu, MenuItem, Scope, ScopeChain, WorkflowDefinition};
use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Environment the seeded block definitions live in
pub const DEFAULT_CONTENT_ENVIRONMENT: &str = "default";

/// Menu storage keyed by menu code
#[derive(Debug, Default)]
pub struct InMemoryMenuService {
    menus: RwLock<HashMap<String, Menu>>,
}

impl InMemoryMenuService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a menu, if it exists
    pub fn snapshot(&self, code: &str) -> Option<Menu> {
        self.menus.read().get(code).cloned()
    }
}

fn insert_child(items: &mut [MenuItem], parent_id: &str, item: &mut Option<MenuItem>) {
    for node in items.iter_mut() {
        if item.is_none() {
            return;
        }
        if node.id == parent_id {
            if let Some(child) = item.take() {
                node.children.push(child);
                node.children.sort_by_key(|c| c.position);
            }
            return;
        }
        insert_child(&mut node.children, parent_id, item);
    }
}

#[async_trait]
impl MenuService for InMemoryMenuService {
    async fn create_menu(&self, code: &str) -> Result<()> {
        let mut menus = self.menus.write();
        if menus.contains_key(code) {
            bail!("menu {code} already exists");
        }
        menus.insert(code.to_string(), Menu::new(code));
        Ok(())
    }

    async fn menu(&self, code: &str, locale: &str) -> Result<Menu> {
        let menus = self.menus.read();
        let mut menu = menus
            .get(code)
            .cloned()
            .ok_or_else(|| anyhow!("menu {code} not found"))?;
        menu.locale = locale.to_string();
        Ok(menu)
    }

    async fn add_menu_item(&self, code: &str, item: MenuItem) -> Result<()> {
        let mut menus = self.menus.write();
        let menu = menus
            .get_mut(code)
            .ok_or_else(|| anyhow!("menu {code} not found"))?;

        if !item.id.is_empty() && menu.item_ids().contains(&item.id) {
            bail!("menu item {} already exists in {code}", item.id);
        }

        let parent_id = item.parent_id.clone();
        let mut pending = Some(item);
        if !parent_id.is_empty() {
            insert_child(&mut menu.items, &parent_id, &mut pending);
        }
        // unknown or empty parent: attach at the root
        if let Some(item) = pending {
            menu.items.push(item);
            menu.items.sort_by_key(|i| i.position);
        }
        Ok(())
    }

    fn as_reset_menu(&self) -> Option<&dyn ResetMenu> {
        Some(self)
    }
}

#[async_trait]
impl ResetMenu for InMemoryMenuService {
    async fn reset_menu(&self, code: &str) -> Result<()> {
        if let Some(menu) = self.menus.write().get_mut(code) {
            menu.items.clear();
        }
        Ok(())
    }
}

/// Block definitions grouped by content environment
#[derive(Debug, Default)]
pub struct InMemoryContentService {
    blocks: RwLock<BTreeMap<String, Vec<BlockDefinition>>>,
}

impl InMemoryContentService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Service pre-seeded with the `hero` and `rich_text` blocks
    pub fn seeded() -> Self {
        let service = Self::new();
        service.add_block(
            DEFAULT_CONTENT_ENVIRONMENT,
            BlockDefinition::new("hero", "hero", "hero"),
        );
        service.add_block(
            DEFAULT_CONTENT_ENVIRONMENT,
            BlockDefinition::new("rich_text", "rich-text", "rich_text"),
        );
        service
    }

    pub fn add_block(&self, environment: &str, block: BlockDefinition) {
        self.blocks
            .write()
            .entry(environment.to_string())
            .or_default()
            .push(block);
    }
}

#[async_trait]
impl ContentService for InMemoryContentService {
    async fn block_definitions(&self, environment: &str) -> Result<Vec<BlockDefinition>> {
        Ok(self
            .blocks
            .read()
            .get(environment)
            .cloned()
            .unwrap_or_default())
    }
}

/// CMS container over the in-memory menu and content services
#[derive(Clone)]
pub struct InMemoryCms {
    menus: Arc<InMemoryMenuService>,
    content: Arc<InMemoryContentService>,
    pages_checker: Option<Arc<dyn TranslationChecker>>,
    content_checker: Option<Arc<dyn TranslationChecker>>,
}

impl Default for InMemoryCms {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCms {
    pub fn new() -> Self {
        Self {
            menus: Arc::new(InMemoryMenuService::new()),
            content: Arc::new(InMemoryContentService::seeded()),
            pages_checker: None,
            content_checker: None,
        }
    }

    pub fn with_pages_checker(mut self, checker: Arc<dyn TranslationChecker>) -> Self {
        self.pages_checker = Some(checker);
        self
    }

    pub fn with_content_checker(mut self, checker: Arc<dyn TranslationChecker>) -> Self {
        self.content_checker = Some(checker);
        self
    }

    pub fn menus(&self) -> &Arc<InMemoryMenuService> {
        &self.menus
    }

    pub fn content(&self) -> &Arc<InMemoryContentService> {
        &self.content
    }
}

impl PagesProvider for InMemoryCms {
    fn pages(&self) -> Option<Arc<dyn TranslationChecker>> {
        self.pages_checker.clone()
    }
}

impl ContentProvider for InMemoryCms {
    fn content(&self) -> Option<Arc<dyn TranslationChecker>> {
        self.content_checker.clone()
    }
}

impl CmsContainer for InMemoryCms {
    fn menu_service(&self) -> Option<Arc<dyn MenuService>> {
        Some(self.menus.clone())
    }

    fn content_service(&self) -> Option<Arc<dyn ContentService>> {
        Some(self.content.clone())
    }

    fn as_pages_provider(&self) -> Option<&dyn PagesProvider> {
        Some(self)
    }

    fn as_content_provider(&self) -> Option<&dyn ContentProvider> {
        Some(self)
    }
}

/// Feature gate over static defaults plus per-scope overrides
#[derive(Debug, Default)]
pub struct StaticFeatureGate {
    defaults: BTreeMap<String, bool>,
    overrides: RwLock<HashMap<(Scope, String), bool>>,
}

impl StaticFeatureGate {
    pub fn new(defaults: BTreeMap<String, bool>) -> Self {
        Self {
            defaults,
            overrides: RwLock::new(HashMap::new()),
        }
    }

    pub fn defaults(&self) -> &BTreeMap<String, bool> {
        &self.defaults
    }
}

impl FeatureGate for StaticFeatureGate {
    fn enabled(&self, feature: &str, scopes: &ScopeChain) -> bool {
        let feature = feature.trim();
        let overrides = self.overrides.read();
        for scope in scopes.iter() {
            if let Some(value) = overrides.get(&(scope.clone(), feature.to_string())) {
                return *value;
            }
        }
        self.defaults.get(feature).copied().unwrap_or(false)
    }

    fn as_mutable(&self) -> Option<&dyn MutableFeatureGate> {
        Some(self)
    }
}

impl MutableFeatureGate for StaticFeatureGate {
    fn set(&self, feature: &str, scope: &Scope, enabled: bool, actor: &str) -> Result<()> {
        let feature = feature.trim();
        if feature.is_empty() {
            bail!("feature key is required");
        }
        tracing::debug!("feature {} set to {} for {} by {}", feature, enabled, scope, actor);
        self.overrides
            .write()
            .insert((scope.clone(), feature.to_string()), enabled);
        Ok(())
    }
}

/// Workflow engine that keeps definitions in memory
#[derive(Debug, Default)]
pub struct InMemoryWorkflowEngine {
    definitions: RwLock<BTreeMap<String, WorkflowDefinition>>,
}

impl InMemoryWorkflowEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine that already knows the given workflow IDs
    pub fn with_known<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let engine = Self::new();
        {
            let mut defs = engine.definitions.write();
            for id in ids {
                let id = id.into();
                defs.insert(
                    id.clone(),
                    WorkflowDefinition {
                        entity_type: id,
                        ..Default::default()
                    },
                );
            }
        }
        engine
    }

    pub fn definition(&self, id: &str) -> Option<WorkflowDefinition> {
        self.definitions.read().get(id).cloned()
    }

    pub fn ids(&self) -> Vec<String> {
        self.definitions.read().keys().cloned().collect()
    }
}

impl WorkflowEngine for InMemoryWorkflowEngine {
    fn as_registry(&self) -> Option<&dyn WorkflowRegistry> {
        Some(self)
    }

    fn as_catalog(&self) -> Option<&dyn WorkflowCatalog> {
        Some(self)
    }
}

impl WorkflowRegistry for InMemoryWorkflowEngine {
    fn register_workflow(&self, definition: WorkflowDefinition) -> Result<()> {
        if definition.entity_type.trim().is_empty() {
            bail!("workflow entity type is required");
        }
        self.definitions
            .write()
            .insert(definition.entity_type.clone(), definition);
        Ok(())
    }
}

impl WorkflowCatalog for InMemoryWorkflowEngine {
    fn has_workflow(&self, id: &str) -> bool {
        self.definitions.read().contains_key(id)
    }
}
