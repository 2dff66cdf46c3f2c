//! Ordered module registration with navigation seeding

use crate::dependency::order_modules;
use crate::navigation::{default_nav_parents, seed_navigation, SeedOptions, SeedOutcome};
use anyhow::{Context, Result};
use quickstart_core::env::{EnvSource, ProcessEnv};
use quickstart_core::types::{dedupe_menu_items, MenuItem};
use quickstart_core::{Admin, AdminModule};
use std::sync::Arc;
use tracing::{debug, info};

/// How [`register_modules`] treats navigation
#[derive(Clone)]
pub struct NavigationOptions {
    /// Seed the admin menu before registering modules
    pub seed: bool,
    /// Target menu; the admin's configured nav menu code when blank
    pub menu_code: String,
    /// Locale for seeded items; the admin's default locale when blank
    pub locale: String,
    /// Include the four default parent groups
    pub default_parents: bool,
    /// Items appended after the module contributions
    pub extra_items: Vec<MenuItem>,
    pub reset: bool,
    /// Environment for the reset and debug-log switches; the process env when `None`
    pub env: Option<Arc<dyn EnvSource>>,
}

impl Default for NavigationOptions {
    fn default() -> Self {
        Self {
            seed: true,
            menu_code: String::new(),
            locale: String::new(),
            default_parents: true,
            extra_items: Vec::new(),
            reset: false,
            env: None,
        }
    }
}

impl NavigationOptions {
    /// Register modules without touching the menu
    pub fn without_seeding() -> Self {
        Self {
            seed: false,
            ..Default::default()
        }
    }
}

/// What [`register_modules`] did
#[derive(Debug, Clone, Default)]
pub struct RegistrationSummary {
    /// Module IDs in registration order
    pub order: Vec<String>,
    pub navigation: Option<SeedOutcome>,
}

/// Order, seed and register modules
///
/// Modules are ordered so dependencies come first. Navigation is seeded from
/// the default parents, every module's menu items and the extra items before
/// any module registers, so modules can rely on their menu entries existing.
/// Registration stops at the first failing module.
pub async fn register_modules(
    admin: &mut Admin,
    modules: Vec<Arc<dyn AdminModule>>,
    nav: NavigationOptions,
) -> Result<RegistrationSummary> {
    let ordered = order_modules(modules)?;
    let order: Vec<String> = ordered
        .iter()
        .map(|m| m.manifest().id.trim().to_string())
        .collect();
    debug!("module order: {}", order.join(", "));

    let locale = match nav.locale.trim() {
        "" => admin.config().default_locale.clone(),
        locale => locale.to_string(),
    };

    let mut navigation = None;
    if nav.seed {
        let mut items = Vec::new();
        if nav.default_parents {
            items.extend(default_nav_parents(&locale));
        }
        for module in &ordered {
            items.extend(module.menu_items(&locale));
        }
        items.extend(nav.extra_items);

        let menu_code = match nav.menu_code.trim() {
            "" => admin.config().nav_menu_code.clone(),
            code => code.to_string(),
        };
        let outcome = seed_navigation(SeedOptions {
            menu_service: admin.menu_service(),
            menu_code,
            items: dedupe_menu_items(items),
            reset: nav.reset,
            locale: locale.clone(),
            env: nav.env.unwrap_or_else(|| Arc::new(ProcessEnv)),
            ..Default::default()
        })
        .await
        .context("seed admin navigation")?;
        navigation = Some(outcome);
    }

    for (module, id) in ordered.iter().zip(&order) {
        admin
            .register_module(module.as_ref())
            .with_context(|| format!("register module {id}"))?;
    }

    info!("Registered {} admin modules", order.len());
    Ok(RegistrationSummary { order, navigation })
}
