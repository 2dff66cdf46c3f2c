//! Idempotent navigation seeding
//!
//! Seeding only ever inserts items whose ID is not already in the menu, so
//! running it twice against the same menu service leaves the tree unchanged.
//! A reset (explicit or via `RESET_NAV_MENU=true`) clears the menu first when
//! the backend supports it.
//!
//! # Environment Variables
//!
//! - `RESET_NAV_MENU`: reset the menu before seeding (default env key)
//! - `NAV_DEBUG_LOG`: log the normalized navigation payload at debug level

use anyhow::{Context, Result};
use quickstart_core::env::{env_is_true, EnvSource, ProcessEnv};
use quickstart_core::ports::MenuService;
use quickstart_core::types::{dedupe_menu_items, MenuItem};
use quickstart_core::utils::slugify;
use quickstart_core::Error;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Menu code used when the caller passes a blank one
pub const FALLBACK_MENU_CODE: &str = "admin.main";

pub const ENV_RESET_NAV_MENU: &str = "RESET_NAV_MENU";
pub const ENV_NAV_DEBUG_LOG: &str = "NAV_DEBUG_LOG";

pub const NAV_GROUP_MAIN: &str = "nav.group.main";
pub const NAV_GROUP_CONTENT: &str = "nav.group.main.content";
pub const NAV_GROUP_TRANSLATIONS: &str = "nav.group.translations";
pub const NAV_GROUP_TOOLS: &str = "nav.group.tools";

/// Inputs for [`seed_navigation`]
#[derive(Clone)]
pub struct SeedOptions {
    pub menu_service: Option<Arc<dyn MenuService>>,
    pub menu_code: String,
    pub items: Vec<MenuItem>,
    pub reset: bool,
    /// Env var that requests a reset when `true`
    pub reset_env: String,
    pub locale: String,
    pub env: Arc<dyn EnvSource>,
    /// Suppress the informational seeding logs
    pub skip_logger: bool,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            menu_service: None,
            menu_code: String::new(),
            items: Vec::new(),
            reset: false,
            reset_env: ENV_RESET_NAV_MENU.to_string(),
            locale: String::new(),
            env: Arc::new(ProcessEnv),
            skip_logger: false,
        }
    }
}

/// What happened to a requested reset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetOutcome {
    NotRequested,
    Reset,
    /// The menu service exposes no reset capability
    Unsupported,
    /// The reset call itself failed; seeding went ahead
    Failed(String),
}

/// Result of a seeding run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedOutcome {
    pub menu_code: String,
    pub reset: ResetOutcome,
    /// IDs inserted by this run, in insertion order
    pub inserted: Vec<String>,
    /// IDs that were already present
    pub skipped: Vec<String>,
}

impl SeedOutcome {
    /// The reset-unsupported sentinel, when that is what happened
    pub fn reset_error(&self) -> Option<Error> {
        match self.reset {
            ResetOutcome::Unsupported => Some(Error::ResetUnsupported),
            _ => None,
        }
    }
}

/// The four parents every admin menu starts with
pub fn default_nav_parents(locale: &str) -> Vec<MenuItem> {
    let parents = vec![
        MenuItem::group(NAV_GROUP_MAIN, "Main")
            .with_label_key("menu.main")
            .with_position(0),
        MenuItem::group(NAV_GROUP_CONTENT, "Content")
            .with_parent(NAV_GROUP_MAIN)
            .with_label_key("menu.content")
            .with_position(10)
            .collapsible(false),
        MenuItem::group(NAV_GROUP_TRANSLATIONS, "Translations")
            .with_label_key("menu.translations")
            .with_position(20)
            .collapsible(true),
        MenuItem::group(NAV_GROUP_TOOLS, "Tools")
            .with_label_key("menu.tools")
            .with_position(30)
            .collapsible(true),
    ];
    parents
        .into_iter()
        .map(|mut item| {
            item.locale = locale.to_string();
            item
        })
        .collect()
}

/// Attach the menu code and derive a missing ID
///
/// A blank ID comes from `target.key` when that is a string, otherwise from
/// the parent ID plus the slugified label. Children are normalized the same
/// way with this item as their parent.
pub fn normalize_menu_item(mut item: MenuItem, menu_code: &str, locale: &str) -> MenuItem {
    item.menu = menu_code.to_string();
    item.id = item.id.trim().to_string();
    item.parent_id = item.parent_id.trim().to_string();
    if item.locale.trim().is_empty() {
        item.locale = locale.to_string();
    }

    if item.id.is_empty() {
        if let Some(key) = item.target_key() {
            item.id = key.to_string();
        } else {
            let slug = slugify(&item.label);
            if !slug.is_empty() {
                item.id = if item.parent_id.is_empty() {
                    slug
                } else {
                    format!("{}.{}", item.parent_id, slug)
                };
            }
        }
    }

    let parent_id = item.id.clone();
    item.children = std::mem::take(&mut item.children)
        .into_iter()
        .map(|mut child| {
            if child.parent_id.trim().is_empty() {
                child.parent_id = parent_id.clone();
            }
            normalize_menu_item(child, menu_code, locale)
        })
        .collect();
    item
}

async fn try_reset(svc: &dyn MenuService, code: &str) -> Option<Result<()>> {
    if let Some(reset) = svc.as_reset_menu() {
        return Some(reset.reset_menu(code).await);
    }
    if let Some(reset) = svc.as_reset_menu_by_code() {
        return Some(reset.reset_menu_by_code(code).await);
    }
    svc.as_legacy_reset().map(|reset| reset.reset(code))
}

/// Seed a navigation menu
///
/// Fails with [`Error::SeedNavigationRequiresCms`] when no menu service is
/// available. Reset problems are logged and reported in the outcome, never
/// returned as errors.
pub async fn seed_navigation(opts: SeedOptions) -> Result<SeedOutcome> {
    let svc = opts
        .menu_service
        .clone()
        .ok_or(Error::SeedNavigationRequiresCms)?;

    let code = match opts.menu_code.trim() {
        "" => FALLBACK_MENU_CODE.to_string(),
        code => code.to_string(),
    };
    let reset_env = match opts.reset_env.trim() {
        "" => ENV_RESET_NAV_MENU,
        key => key,
    };

    let mut reset = ResetOutcome::NotRequested;
    if opts.reset || env_is_true(opts.env.as_ref(), reset_env) {
        reset = match try_reset(svc.as_ref(), &code).await {
            Some(Ok(())) => {
                if !opts.skip_logger {
                    info!("Reset navigation menu {}", code);
                }
                ResetOutcome::Reset
            }
            Some(Err(e)) => {
                warn!("Failed to reset navigation menu {}: {:#}", code, e);
                ResetOutcome::Failed(format!("{e:#}"))
            }
            None => {
                warn!("{} ({}); seeding without reset", Error::ResetUnsupported, code);
                ResetOutcome::Unsupported
            }
        };
    }

    if let Err(create_err) = svc.create_menu(&code).await {
        // usually "already exists"; fine as long as the menu can be read
        svc.menu(&code, &opts.locale)
            .await
            .map_err(|_| create_err)
            .with_context(|| format!("create menu {code}"))?;
    }

    let existing = svc
        .menu(&code, &opts.locale)
        .await
        .with_context(|| format!("load menu {code}"))?;
    let mut present = existing.item_ids();

    let items: Vec<MenuItem> = dedupe_menu_items(
        opts.items
            .into_iter()
            .map(|item| normalize_menu_item(item, &code, &opts.locale))
            .collect(),
    );

    if env_is_true(opts.env.as_ref(), ENV_NAV_DEBUG_LOG) {
        match serde_json::to_string(&items) {
            Ok(payload) => debug!("navigation payload for {}: {}", code, payload),
            Err(e) => debug!("navigation payload for {} not serializable: {}", code, e),
        }
    }

    let mut inserted = Vec::new();
    let mut skipped = Vec::new();
    for item in items {
        // no ID means no way to recognise it on the next run
        if item.id.is_empty() {
            warn!("Skipping navigation item {:?} in {}: no ID could be derived", item.label, code);
            continue;
        }
        if present.contains(&item.id) {
            skipped.push(item.id);
            continue;
        }
        let id = item.id.clone();
        svc.add_menu_item(&code, item)
            .await
            .with_context(|| format!("add menu item {id} to {code}"))?;
        present.insert(id.clone());
        inserted.push(id);
    }

    if !opts.skip_logger {
        info!(
            "Seeded navigation menu {}: {} inserted, {} already present",
            code,
            inserted.len(),
            skipped.len()
        );
    }

    Ok(SeedOutcome {
        menu_code: code,
        reset,
        inserted,
        skipped,
    })
}
