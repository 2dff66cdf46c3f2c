//! Debug panel selection and registration

use anyhow::{Context, Result};
use quickstart_core::config::DebugConfig;
use quickstart_core::env::{env_string, EnvSource};
use quickstart_core::utils::{dedupe_case_insensitive, normalize_lookup_key};
use quickstart_core::Admin;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Overrides the doctor panel default (`true` / `false`, any case)
pub const ENV_ADMIN_DEBUG_DOCTOR: &str = "ADMIN_DEBUG_DOCTOR";

pub const PANEL_CONSOLE: &str = "console";
pub const PANEL_SHELL: &str = "shell";
pub const PANEL_JS_ERRORS: &str = "js_errors";
pub const PANEL_SCOPE: &str = "scope";
pub const PANEL_DOCTOR: &str = "doctor";

/// Registry panel ID prefix for debug panels (`debug.console`)
pub const DEBUG_PANEL_PREFIX: &str = "debug.";

/// Context the debug panel set is derived from
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugOptions {
    /// Development build; turns the doctor panel on by default
    pub dev: bool,
    /// Explicit doctor panel toggle
    pub doctor_panel: Option<bool>,
    /// A debug scope buffer is attached
    pub scope_buffer: bool,
}

/// Whether the doctor panel is shown
///
/// `ADMIN_DEBUG_DOCTOR` wins over the explicit option, which wins over the
/// development default. Values other than `true`/`false` are ignored.
pub fn doctor_panel_enabled(options: &DebugOptions, env: &dyn EnvSource) -> bool {
    let from_env = env_string(env, ENV_ADMIN_DEBUG_DOCTOR).and_then(|raw| {
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    });
    from_env.or(options.doctor_panel).unwrap_or(options.dev)
}

fn push_panel(panels: &mut Vec<String>, id: &str) {
    let key = normalize_lookup_key(id);
    if !panels.iter().any(|p| normalize_lookup_key(p) == key) {
        panels.push(id.to_string());
    }
}

/// Fill in the panel lists from the enabled debug sub-features
///
/// Does nothing while debug is disabled.
pub fn apply_debug_panels(debug: &mut DebugConfig, options: &DebugOptions, env: &dyn EnvSource) {
    if !debug.enabled {
        return;
    }
    debug.apply_repl_defaults();

    let mut wanted = Vec::new();
    if debug.repl.enabled && debug.repl.app_enabled {
        wanted.push(PANEL_CONSOLE);
    }
    if debug.repl.enabled && debug.repl.shell_enabled {
        wanted.push(PANEL_SHELL);
    }
    if debug.capture_js_errors {
        wanted.push(PANEL_JS_ERRORS);
    }
    if options.scope_buffer {
        wanted.push(PANEL_SCOPE);
    }
    if doctor_panel_enabled(options, env) {
        wanted.push(PANEL_DOCTOR);
    }

    debug.panels = dedupe_case_insensitive(&debug.panels);
    debug.toolbar_panels = dedupe_case_insensitive(&debug.toolbar_panels);
    for id in wanted {
        push_panel(&mut debug.panels, id);
        if debug.toolbar_mode {
            push_panel(&mut debug.toolbar_panels, id);
        }
    }
}

/// Registers one debug panel on the admin
pub type PanelRegistrar = Arc<dyn Fn(&mut Admin) -> Result<()> + Send + Sync>;

/// Panel registrars keyed by normalized panel ID
#[derive(Clone)]
pub struct DebugPanelCatalog {
    registrars: BTreeMap<String, PanelRegistrar>,
}

fn registry_panel(id: &'static str) -> PanelRegistrar {
    Arc::new(move |admin: &mut Admin| {
        admin
            .registry_mut()
            .register_panel(format!("{DEBUG_PANEL_PREFIX}{id}"));
        Ok(())
    })
}

impl Default for DebugPanelCatalog {
    fn default() -> Self {
        let mut catalog = Self::empty();
        for id in [PANEL_CONSOLE, PANEL_SHELL, PANEL_JS_ERRORS, PANEL_SCOPE, PANEL_DOCTOR] {
            catalog.registrars.insert(id.to_string(), registry_panel(id));
        }
        catalog
    }
}

impl fmt::Debug for DebugPanelCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.registrars.keys()).finish()
    }
}

impl DebugPanelCatalog {
    pub fn empty() -> Self {
        Self {
            registrars: BTreeMap::new(),
        }
    }

    /// Add or replace the registrar for `id`
    pub fn with(mut self, id: &str, registrar: PanelRegistrar) -> Self {
        self.registrars.insert(normalize_lookup_key(id), registrar);
        self
    }

    pub fn contains(&self, id: &str) -> bool {
        self.registrars.contains_key(&normalize_lookup_key(id))
    }

    /// Run the registrar of every configured panel once
    ///
    /// Panels without a registrar are logged and skipped. Returns the
    /// normalized IDs that were registered, in first-seen order.
    pub fn register(&self, admin: &mut Admin, debug: &DebugConfig) -> Result<Vec<String>> {
        if !debug.enabled {
            return Ok(Vec::new());
        }
        let mut seen = BTreeSet::new();
        let mut registered = Vec::new();
        for raw in debug.panels.iter().chain(&debug.toolbar_panels) {
            let id = normalize_lookup_key(raw);
            if id.is_empty() || !seen.insert(id.clone()) {
                continue;
            }
            match self.registrars.get(&id) {
                Some(registrar) => {
                    registrar(admin).with_context(|| format!("register debug panel {id}"))?;
                    debug!("registered debug panel {}", id);
                    registered.push(id);
                }
                None => warn!("Unknown debug panel {:?}, skipping", raw),
            }
        }
        Ok(registered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickstart_core::env::MapEnv;
    use quickstart_core::{AdminConfig, AdminDeps};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn enabled_debug() -> DebugConfig {
        let mut debug = DebugConfig {
            enabled: true,
            ..Default::default()
        };
        debug.repl.enabled = true;
        debug
    }

    #[test]
    fn test_disabled_debug_is_untouched() {
        let mut debug = DebugConfig {
            capture_js_errors: true,
            ..Default::default()
        };
        let options = DebugOptions {
            dev: true,
            ..Default::default()
        };
        apply_debug_panels(&mut debug, &options, &MapEnv::new());
        assert!(debug.panels.is_empty());
    }

    #[test]
    fn test_repl_defaults_and_toolbar_mirror() {
        let mut debug = enabled_debug();
        debug.toolbar_mode = true;
        debug.capture_js_errors = true;
        debug.panels = vec!["Console".into(), "requests".into(), "REQUESTS".into()];

        apply_debug_panels(&mut debug, &DebugOptions::default(), &MapEnv::new());

        assert!(debug.repl.app_enabled && debug.repl.shell_enabled);
        assert_eq!(debug.panels, vec!["Console", "requests", "shell", "js_errors"]);
        assert_eq!(debug.toolbar_panels, vec!["console", "shell", "js_errors"]);
    }

    #[test]
    fn test_doctor_panel_precedence() {
        let dev = DebugOptions {
            dev: true,
            ..Default::default()
        };
        assert!(doctor_panel_enabled(&dev, &MapEnv::new()));

        let off = DebugOptions {
            doctor_panel: Some(false),
            ..dev
        };
        assert!(!doctor_panel_enabled(&off, &MapEnv::new()));

        let env = MapEnv::from_pairs([(ENV_ADMIN_DEBUG_DOCTOR, "TRUE")]);
        assert!(doctor_panel_enabled(&off, &env));

        let env = MapEnv::from_pairs([(ENV_ADMIN_DEBUG_DOCTOR, "maybe")]);
        assert!(!doctor_panel_enabled(&off, &env));
        assert!(!doctor_panel_enabled(&DebugOptions::default(), &MapEnv::new()));
    }

    #[test]
    fn test_scope_panel_needs_buffer() {
        let mut debug = enabled_debug();
        let options = DebugOptions {
            scope_buffer: true,
            ..Default::default()
        };
        apply_debug_panels(&mut debug, &options, &MapEnv::new());
        assert!(debug.panels.iter().any(|p| p == PANEL_SCOPE));
    }

    #[test]
    fn test_registrars_run_once_per_panel() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let catalog = DebugPanelCatalog::default().with(
            "Console",
            Arc::new(move |_: &mut Admin| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        );

        let mut debug = enabled_debug();
        debug.panels = vec!["console".into(), "shell".into(), "mystery".into()];
        debug.toolbar_panels = vec![" CONSOLE ".into(), "shell".into()];

        let mut admin = Admin::new(AdminConfig::default(), AdminDeps::default()).unwrap();
        let registered = catalog.register(&mut admin, &debug).unwrap();

        assert_eq!(registered, vec!["console", "shell"]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(admin.registry().has_panel("debug.shell"));
        assert!(!admin.registry().has_panel("debug.console"));
    }
}
