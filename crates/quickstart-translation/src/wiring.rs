//! Registers the translation exchange and queue modules on an admin instance

use crate::exchange::{
    ExchangeBinding, ExchangeHandlers, PermissionRegister, TranslationExchangeConfig,
};
use crate::product::ResolvedTranslationProduct;
use crate::queue::{QueueBinding, QueuePriority, TranslationQueueConfig};
use anyhow::{Context, Result};
use quickstart_core::admin::Permission;
use quickstart_core::Admin;
use std::sync::Arc;
use tracing::{debug, info};

pub const PANEL_EXCHANGE: &str = "translation_exchange";
pub const PANEL_QUEUE: &str = "translation_queue";

pub const BINDING_EXCHANGE: &str = "translation.exchange";
pub const BINDING_QUEUE: &str = "translation.queue";

/// Prefix shared by every translation binding key
pub const BINDING_PREFIX: &str = "translation.";

pub const ROUTE_EXCHANGE: &str = "admin.translations.exchange";
pub const ROUTE_QUEUE: &str = "admin.translations.queue";
pub const ROUTE_TRANSLATION_DASHBOARD: &str = "admin.translations.dashboard";

pub const EXCHANGE_COMMANDS: [&str; 3] = [
    "translations.exchange.export",
    "translations.exchange.validate",
    "translations.exchange.apply",
];

pub const QUEUE_COMMANDS: [&str; 3] = [
    "translations.queue.assign",
    "translations.queue.claim",
    "translations.queue.approve",
];

/// Exchange API route suffixes, under `<api group>.translations.`
pub const EXCHANGE_API_ROUTES: [&str; 3] = ["export", "validate", "apply"];

pub const QUEUE_API_MY_WORK: &str = "my_work";
pub const QUEUE_API_QUEUE: &str = "queue";
pub const QUEUE_API_NOTIFICATIONS: &str = "notifications";

pub fn exchange_permissions() -> Vec<Permission> {
    vec![
        Permission::new("admin.translations.export", "Export translation rows"),
        Permission::new("admin.translations.import.view", "View translation imports"),
        Permission::new("admin.translations.import.validate", "Validate translation imports"),
        Permission::new("admin.translations.import.apply", "Apply translation imports"),
    ]
}

pub fn queue_permissions() -> Vec<Permission> {
    vec![
        Permission::new("admin.translations.view", "View translation assignments"),
        Permission::new("admin.translations.assign", "Assign translation work"),
        Permission::new("admin.translations.claim", "Claim open translation work"),
        Permission::new("admin.translations.edit", "Edit assigned translations"),
        Permission::new("admin.translations.approve", "Approve translations"),
        Permission::new("admin.translations.manage", "Manage the translation queue"),
    ]
}

/// Name of a translation API route (`admin.api.translations.export`)
pub fn api_route_name(admin: &Admin, suffix: &str) -> String {
    format!("{}.translations.{suffix}", admin.api_group())
}

fn register_permissions(
    admin: &mut Admin,
    permissions: Vec<Permission>,
    external: Option<&PermissionRegister>,
) -> Result<()> {
    if let Some(register) = external {
        register(permissions.as_slice())?;
    }
    let registry = admin.registry_mut();
    for permission in permissions {
        registry.register_permission(permission);
    }
    Ok(())
}

/// Wire the exchange module: commands, panel, permissions, routes, binding
pub fn register_exchange(
    admin: &mut Admin,
    cfg: &TranslationExchangeConfig,
    handlers: ExchangeHandlers,
) -> Result<()> {
    register_permissions(admin, exchange_permissions(), cfg.permission_register.as_ref())
        .context("register translation exchange permissions")?;

    let registry = admin.registry_mut();
    for command in EXCHANGE_COMMANDS {
        registry.register_command(command);
    }
    registry.register_panel(PANEL_EXCHANGE);
    registry.bind(BINDING_EXCHANGE, Arc::new(ExchangeBinding { handlers }));

    let ui_path = admin.config().admin_path("translations/exchange");
    let api_routes: Vec<(String, String)> = EXCHANGE_API_ROUTES
        .iter()
        .map(|suffix| {
            (
                api_route_name(admin, suffix),
                admin.config().admin_path(&format!("api/translations/{suffix}")),
            )
        })
        .collect();
    let routes = admin.routes_mut();
    routes.register(ROUTE_EXCHANGE, ui_path);
    for (name, path) in api_routes {
        routes.register(name, path);
    }

    info!("Registered translation exchange module");
    Ok(())
}

/// Wire the queue module: commands, panel, permissions, routes, binding
pub fn register_queue(
    admin: &mut Admin,
    cfg: &TranslationQueueConfig,
    priority: QueuePriority,
) -> Result<()> {
    register_permissions(admin, queue_permissions(), cfg.permission_register.as_ref())
        .context("register translation queue permissions")?;

    let registry = admin.registry_mut();
    for command in QUEUE_COMMANDS {
        registry.register_command(command);
    }
    registry.register_panel(PANEL_QUEUE);
    registry.bind(
        BINDING_QUEUE,
        Arc::new(QueueBinding {
            repository: cfg.repository.clone(),
            service: cfg.service.clone(),
            default_priority: priority,
            supported_locales: cfg.supported_locales.clone(),
            open_pool: cfg.enable_open_pool,
        }),
    );

    let mut routes = vec![(
        ROUTE_QUEUE.to_string(),
        admin.config().admin_path("translations/queue"),
    )];
    if cfg.enable_dashboard {
        routes.push((
            ROUTE_TRANSLATION_DASHBOARD.to_string(),
            admin.config().admin_path("translations/dashboard"),
        ));
    }
    let mut api = vec![QUEUE_API_MY_WORK, QUEUE_API_QUEUE];
    if cfg.enable_notifications {
        api.push(QUEUE_API_NOTIFICATIONS);
    }
    for suffix in api {
        routes.push((
            api_route_name(admin, suffix),
            admin.config().admin_path(&format!("api/translations/{suffix}")),
        ));
    }
    let table = admin.routes_mut();
    for (name, path) in routes {
        table.register(name, path);
    }

    info!(
        "Registered translation queue module ({} locales, default priority {})",
        cfg.supported_locales.len(),
        priority
    );
    Ok(())
}

/// Wire whichever translation modules the resolved product enables
pub fn install_translation_product(
    admin: &mut Admin,
    resolved: &ResolvedTranslationProduct,
) -> Result<()> {
    match (&resolved.exchange_handlers, resolved.exchange.enabled) {
        (Some(handlers), true) => register_exchange(admin, &resolved.exchange, handlers.clone())?,
        (None, true) => anyhow::bail!("translation exchange is enabled without handlers"),
        _ => debug!("translation exchange disabled"),
    }
    if resolved.queue.enabled {
        register_queue(admin, &resolved.queue, resolved.queue_priority)?;
    } else {
        debug!("translation queue disabled");
    }
    Ok(())
}
