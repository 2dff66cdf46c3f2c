//! Capability snapshot construction and post-wiring runtime checks

use crate::product::{ResolvedTranslationProduct, CODE_RUNTIME_INVALID};
use crate::wiring::{
    api_route_name, BINDING_EXCHANGE, BINDING_PREFIX, BINDING_QUEUE, EXCHANGE_API_ROUTES,
    PANEL_EXCHANGE, PANEL_QUEUE, QUEUE_API_MY_WORK, QUEUE_API_NOTIFICATIONS, QUEUE_API_QUEUE,
    ROUTE_EXCHANGE, ROUTE_QUEUE, ROUTE_TRANSLATION_DASHBOARD,
};
use quickstart_core::capability::{
    CapabilityFeatures, CapabilityModules, CapabilitySnapshot, ModuleState,
};
use quickstart_core::config::{FEATURE_CMS, FEATURE_DASHBOARD};
use quickstart_core::{Admin, ErrorKind, Result, ValidationError};
use std::collections::BTreeMap;

/// Route names the exchange module is expected to expose
pub fn exchange_route_names(admin: &Admin) -> Vec<String> {
    let mut names = vec![ROUTE_EXCHANGE.to_string()];
    names.extend(EXCHANGE_API_ROUTES.iter().map(|s| api_route_name(admin, s)));
    names
}

/// Route names the queue module is expected to expose
///
/// Dashboard and notification routes only exist behind their queue toggles.
pub fn queue_route_names(admin: &Admin, dashboard: bool, notifications: bool) -> Vec<String> {
    let mut names = vec![
        ROUTE_QUEUE.to_string(),
        api_route_name(admin, QUEUE_API_MY_WORK),
        api_route_name(admin, QUEUE_API_QUEUE),
    ];
    if dashboard {
        names.push(ROUTE_TRANSLATION_DASHBOARD.to_string());
    }
    if notifications {
        names.push(api_route_name(admin, QUEUE_API_NOTIFICATIONS));
    }
    names
}

pub fn capability_features(admin: &Admin) -> CapabilityFeatures {
    CapabilityFeatures {
        cms: admin.feature_enabled(FEATURE_CMS),
        dashboard: admin.feature_enabled(FEATURE_DASHBOARD),
    }
}

/// Snapshot of the translation capabilities wired on `admin`
///
/// Without a resolved product this is the zero-profile snapshot.
pub fn build_capability_snapshot(
    admin: &Admin,
    resolved: Option<&ResolvedTranslationProduct>,
) -> CapabilitySnapshot {
    let features = capability_features(admin);
    let Some(resolved) = resolved else {
        return CapabilitySnapshot::zero(features);
    };

    let mut routes = BTreeMap::new();
    if let Some(urls) = admin.urls() {
        let candidates = exchange_route_names(admin)
            .into_iter()
            .chain(queue_route_names(admin, true, true));
        for name in candidates {
            if let Some(path) = urls.resolve(&name).filter(|p| !p.trim().is_empty()) {
                routes.insert(name, path);
            }
        }
    }

    let registry = admin.registry();
    let panels = [PANEL_EXCHANGE, PANEL_QUEUE]
        .into_iter()
        .filter(|p| registry.has_panel(p))
        .map(String::from)
        .collect();
    let resolver_keys = registry
        .binding_keys()
        .into_iter()
        .filter(|k| k.starts_with(BINDING_PREFIX))
        .collect();

    CapabilitySnapshot {
        profile: resolved.profile.to_string(),
        schema_version: resolved.schema_version,
        modules: CapabilityModules {
            exchange: ModuleState {
                enabled: resolved.exchange.enabled,
            },
            queue: ModuleState {
                enabled: resolved.queue.enabled,
            },
        },
        features,
        routes,
        panels,
        resolver_keys,
        warnings: resolved.warnings.clone(),
    }
}

/// Check that every enabled module left its binding and routes behind
///
/// All failures are reported at once in `failed_checks`.
pub fn validate_translation_runtime(
    admin: &Admin,
    resolved: &ResolvedTranslationProduct,
    snapshot: &CapabilitySnapshot,
) -> Result<()> {
    let mut failed = Vec::new();
    let registry = admin.registry();

    if resolved.exchange.enabled {
        if !registry.has_binding(BINDING_EXCHANGE) {
            failed.push(format!("exchange.binding.{BINDING_EXCHANGE}"));
        }
        for route in exchange_route_names(admin) {
            if !snapshot.has_route(&route) {
                failed.push(format!("exchange.route.{route}"));
            }
        }
    }

    if resolved.queue.enabled {
        if !registry.has_binding(BINDING_QUEUE) {
            failed.push(format!("queue.binding.{BINDING_QUEUE}"));
        }
        let routes = queue_route_names(
            admin,
            resolved.queue.enable_dashboard,
            resolved.queue.enable_notifications,
        );
        for route in routes {
            if !snapshot.has_route(&route) {
                failed.push(format!("queue.route.{route}"));
            }
        }
    }

    if failed.is_empty() {
        return Ok(());
    }
    failed.sort();
    Err(ValidationError::new(
        ErrorKind::TranslationProductConfig,
        CODE_RUNTIME_INVALID,
        format!("translation modules are not fully wired: {}", failed.join(", ")),
    )
    .with_hint("check that translation wiring ran and routes are resolvable")
    .with_failed_checks(failed)
    .into())
}
