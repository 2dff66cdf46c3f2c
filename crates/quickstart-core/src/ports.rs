//! Collaborator trait definitions
//!
//! The quickstart never implements the CMS, workflow engine, or feature gate
//! itself. It talks to them through these traits. Optional capabilities are
//! exposed as `as_*` accessors returning `None` by default, so a host only
//! implements what its backend actually supports.

use crate::types::{
    ActivityEntry, BlockDefinition, Menu, MenuItem, Scope, ScopeChain, TranslationCheckOptions,
    WorkflowDefinition,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Navigation menu storage
#[async_trait]
pub trait MenuService: Send + Sync {
    /// Create a menu; fails if it already exists on some backends
    async fn create_menu(&self, code: &str) -> Result<()>;

    /// Fetch a menu tree
    async fn menu(&self, code: &str, locale: &str) -> Result<Menu>;

    /// Insert an item into a menu
    async fn add_menu_item(&self, code: &str, item: MenuItem) -> Result<()>;

    /// Canonical reset capability
    fn as_reset_menu(&self) -> Option<&dyn ResetMenu> {
        None
    }

    /// Reset capability under a distinct name
    fn as_reset_menu_by_code(&self) -> Option<&dyn ResetMenuByCode> {
        None
    }

    /// Legacy blocking reset
    fn as_legacy_reset(&self) -> Option<&dyn LegacyMenuReset> {
        None
    }
}

#[async_trait]
pub trait ResetMenu: Send + Sync {
    async fn reset_menu(&self, code: &str) -> Result<()>;
}

#[async_trait]
pub trait ResetMenuByCode: Send + Sync {
    async fn reset_menu_by_code(&self, code: &str) -> Result<()>;
}

pub trait LegacyMenuReset: Send + Sync {
    fn reset(&self, code: &str) -> Result<()>;
}

/// Workflow engine handle
pub trait WorkflowEngine: Send + Sync {
    /// Engines that accept new definitions
    fn as_registry(&self) -> Option<&dyn WorkflowRegistry> {
        None
    }

    /// Engines that can answer whether a workflow is known
    fn as_catalog(&self) -> Option<&dyn WorkflowCatalog> {
        None
    }
}

pub trait WorkflowRegistry: Send + Sync {
    fn register_workflow(&self, definition: WorkflowDefinition) -> Result<()>;
}

pub trait WorkflowCatalog: Send + Sync {
    fn has_workflow(&self, id: &str) -> bool;
}

/// Feature policy engine
pub trait FeatureGate: Send + Sync {
    /// Whether `feature` is on for the first matching scope in `scopes`
    fn enabled(&self, feature: &str, scopes: &ScopeChain) -> bool;

    fn as_mutable(&self) -> Option<&dyn MutableFeatureGate> {
        None
    }
}

pub trait MutableFeatureGate: Send + Sync {
    fn set(&self, feature: &str, scope: &Scope, enabled: bool, actor: &str) -> Result<()>;
}

/// Content lookups used by doctor checks
#[async_trait]
pub trait ContentService: Send + Sync {
    async fn block_definitions(&self, environment: &str) -> Result<Vec<BlockDefinition>>;
}

/// Resolves named routes to paths
pub trait UrlResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Option<String>;
}

/// Destination for admin activity entries
#[async_trait]
pub trait ActivitySink: Send + Sync {
    async fn record(&self, entry: ActivityEntry) -> Result<()>;
}

/// Reports which of `required_locales` are missing for an entity
#[async_trait]
pub trait TranslationChecker: Send + Sync {
    async fn check_translations(
        &self,
        id: Uuid,
        required_locales: &[String],
        options: &TranslationCheckOptions,
    ) -> Result<Vec<String>>;
}

/// Container exposing a page translation checker
pub trait PagesProvider: Send + Sync {
    fn pages(&self) -> Option<Arc<dyn TranslationChecker>>;
}

/// Container exposing a content translation checker
pub trait ContentProvider: Send + Sync {
    fn content(&self) -> Option<Arc<dyn TranslationChecker>>;
}

/// CMS service container attached to the admin config
pub trait CmsContainer: Send + Sync {
    fn menu_service(&self) -> Option<Arc<dyn MenuService>> {
        None
    }

    fn content_service(&self) -> Option<Arc<dyn ContentService>> {
        None
    }

    fn as_pages_provider(&self) -> Option<&dyn PagesProvider> {
        None
    }

    fn as_content_provider(&self) -> Option<&dyn ContentProvider> {
        None
    }

    /// Wrapped container, for hosts that nest their services one level deep
    fn container(&self) -> Option<Arc<dyn CmsContainer>> {
        None
    }
}

/// Page checker from `container`, trying one level of nesting
pub fn pages_checker(container: &dyn CmsContainer) -> Option<Arc<dyn TranslationChecker>> {
    container
        .as_pages_provider()
        .and_then(PagesProvider::pages)
        .or_else(|| {
            let inner = container.container()?;
            inner.as_pages_provider().and_then(PagesProvider::pages)
        })
}

/// Content checker from `container`, trying one level of nesting
pub fn content_checker(container: &dyn CmsContainer) -> Option<Arc<dyn TranslationChecker>> {
    container
        .as_content_provider()
        .and_then(ContentProvider::content)
        .or_else(|| {
            let inner = container.container()?;
            inner.as_content_provider().and_then(ContentProvider::content)
        })
}
