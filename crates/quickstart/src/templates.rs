//! Template filter aliases and the capability template helper

use anyhow::Result;
use quickstart_core::Admin;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// `(alias, filter)` pairs installed on the host template engine
pub const FILTER_ALIASES: [(&str, &str); 2] =
    [("t", "translate"), ("capability", "translation_capability")];

/// The host's template filter table
pub trait TemplateFilters: Send + Sync {
    fn register_alias(&self, alias: &str, filter: &str) -> Result<()>;
}

static INSTALLED: OnceLock<Vec<String>> = OnceLock::new();

/// Install [`FILTER_ALIASES`] on `filters`, at most once per process
///
/// Returns true when this call performed the install. Later calls, with any
/// filter table, are no-ops.
pub fn install_filter_aliases(filters: &dyn TemplateFilters) -> bool {
    let mut installed_now = false;
    INSTALLED.get_or_init(|| {
        installed_now = true;
        let mut installed = Vec::new();
        for (alias, filter) in FILTER_ALIASES {
            match filters.register_alias(alias, filter) {
                Ok(()) => installed.push(alias.to_string()),
                Err(err) => warn!("Template filter alias {alias} -> {filter} failed: {:#}", err),
            }
        }
        debug!("installed template filter aliases: {}", installed.join(", "));
        installed
    });
    installed_now
}

/// Aliases installed by the first [`install_filter_aliases`] call
pub fn installed_filter_aliases() -> &'static [String] {
    INSTALLED.get().map(Vec::as_slice).unwrap_or(&[])
}

/// Value exposed to templates by the `translation_capability` filter
pub fn capability_template_value(admin: &Admin) -> serde_json::Value {
    admin.capability_snapshot().to_value()
}
