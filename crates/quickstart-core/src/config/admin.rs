//! Admin console configuration

use super::features::Features;
use super::settings::ErrorConfig;
use super::load_config_file;
use crate::env::{parse_bool, EnvSource};
use crate::error::Result;
use crate::ports::CmsContainer;
use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Base path used when none is configured
pub const DEFAULT_BASE_PATH: &str = "/admin";

/// Locale used when none is configured
pub const DEFAULT_LOCALE: &str = "en";

/// Navigation menu code used when none is configured
pub const DEFAULT_NAV_MENU_CODE: &str = "admin_main";

/// Feature key mirrored from `debug.enabled`
pub const DEFAULT_DEBUG_FEATURE_KEY: &str = "debug";

/// Normalize an admin base path
///
/// Blank input becomes `/admin`; anything else becomes `/` followed by the
/// trimmed value with its surrounding slashes (and any whitespace between
/// them) stripped.
pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return DEFAULT_BASE_PATH.to_string();
    }
    format!(
        "/{}",
        trimmed.trim_matches(|c: char| c == '/' || c.is_whitespace())
    )
}

/// REPL toggles inside the debug block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplConfig {
    pub enabled: bool,
    pub app_enabled: bool,
    pub shell_enabled: bool,
}

/// Debug toolbar and panel configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    pub enabled: bool,
    pub panels: Vec<String>,
    pub toolbar_panels: Vec<String>,
    pub toolbar_mode: bool,
    pub capture_js_errors: bool,
    pub repl: ReplConfig,
    /// Feature-gate key mirroring `enabled`
    pub feature_key: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            panels: Vec::new(),
            toolbar_panels: Vec::new(),
            toolbar_mode: false,
            capture_js_errors: false,
            repl: ReplConfig::default(),
            feature_key: DEFAULT_DEBUG_FEATURE_KEY.to_string(),
        }
    }
}

impl DebugConfig {
    /// Turn on both REPL surfaces when the REPL is on but neither is chosen
    pub fn apply_repl_defaults(&mut self) {
        if self.enabled && self.repl.enabled && !self.repl.app_enabled && !self.repl.shell_enabled
        {
            self.repl.app_enabled = true;
            self.repl.shell_enabled = true;
        }
    }
}

/// CMS wiring carried alongside the config; never serialized
#[derive(Clone, Default)]
pub struct CmsOptions {
    pub container: Option<Arc<dyn CmsContainer>>,
    /// Label of the backend behind `container`
    pub backend: String,
}

impl fmt::Debug for CmsOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CmsOptions")
            .field("container", &self.container.is_some())
            .field("backend", &self.backend)
            .finish()
    }
}

/// Admin console configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub title: String,
    pub base_path: String,
    pub default_locale: String,
    pub theme: String,
    pub theme_variant: String,
    pub theme_asset_prefix: String,
    pub nav_menu_code: String,
    pub theme_tokens: BTreeMap<String, String>,
    pub features: Features,
    /// Ad-hoc feature overrides applied on top of `features`
    pub feature_flags: BTreeMap<String, bool>,
    pub debug: DebugConfig,
    pub errors: ErrorConfig,
    #[serde(skip)]
    pub cms: CmsOptions,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            title: "Admin".to_string(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            default_locale: DEFAULT_LOCALE.to_string(),
            theme: "admin".to_string(),
            theme_variant: "light".to_string(),
            theme_asset_prefix: String::new(),
            nav_menu_code: DEFAULT_NAV_MENU_CODE.to_string(),
            theme_tokens: BTreeMap::new(),
            features: Features::default(),
            feature_flags: BTreeMap::new(),
            debug: DebugConfig::default(),
            errors: ErrorConfig::default(),
            cms: CmsOptions::default(),
        }
    }
}

impl AdminConfig {
    /// Baseline config with a base path and default locale
    pub fn new(base_path: &str, default_locale: &str) -> Self {
        Self {
            base_path: base_path.to_string(),
            default_locale: default_locale.to_string(),
            ..Default::default()
        }
        .normalized()
    }

    /// Load from a `.yaml`, `.yml`, or `.json` file and normalize
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let config: Self = load_config_file(path)?;
        Ok(config.normalized())
    }

    /// Apply the config invariants: base path, locale, and menu code
    pub fn normalized(mut self) -> Self {
        self.base_path = normalize_base_path(&self.base_path);
        self.default_locale = non_blank_or(&self.default_locale, DEFAULT_LOCALE);
        self.nav_menu_code = non_blank_or(&self.nav_menu_code, DEFAULT_NAV_MENU_CODE);
        self.title = self.title.trim().to_string();
        self.debug.feature_key = non_blank_or(&self.debug.feature_key, DEFAULT_DEBUG_FEATURE_KEY);
        self
    }

    /// Replace the features record
    pub fn with_features(mut self, features: Features) -> Self {
        self.features = features;
        self
    }

    /// Replace the features record and drop every ad-hoc flag
    pub fn with_features_explicit(mut self, features: Features) -> Self {
        self.features = features;
        self.feature_flags.clear();
        self
    }

    /// Merge flags into the ad-hoc map
    pub fn with_feature_flags<I, K>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = (K, bool)>,
        K: Into<String>,
    {
        for (key, value) in flags {
            let key = key.into();
            let key = key.trim();
            if !key.is_empty() {
                self.feature_flags.insert(key.to_string(), value);
            }
        }
        self
    }

    pub fn with_feature_flag(self, key: impl Into<String>, value: bool) -> Self {
        self.with_feature_flags([(key.into(), value)])
    }

    /// Set flags from `(env var, flag key)` pairs
    ///
    /// A flag is only touched when its variable is present and parses as a
    /// boolean.
    pub fn with_feature_flags_from_env(mut self, env: &dyn EnvSource, pairs: &[(&str, &str)]) -> Self {
        for (var, key) in pairs {
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            if let Some(value) = env.var(var).as_deref().and_then(parse_bool) {
                self.feature_flags.insert(key.to_string(), value);
            }
        }
        self
    }

    pub fn with_theme(mut self, name: &str, variant: &str) -> Self {
        if !name.trim().is_empty() {
            self.theme = name.trim().to_string();
        }
        if !variant.trim().is_empty() {
            self.theme_variant = variant.trim().to_string();
        }
        self
    }

    pub fn with_theme_tokens<I, K, V>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in tokens {
            let (key, value) = (key.as_ref().trim(), value.as_ref().trim());
            if !key.is_empty() && !value.is_empty() {
                self.theme_tokens.insert(key.to_string(), value.to_string());
            }
        }
        self
    }

    pub fn with_nav_menu_code(mut self, code: &str) -> Self {
        if !code.trim().is_empty() {
            self.nav_menu_code = code.trim().to_string();
        }
        self
    }

    pub fn with_theme_asset_prefix(mut self, prefix: &str) -> Self {
        if !prefix.trim().is_empty() {
            self.theme_asset_prefix = prefix.trim().to_string();
        }
        self
    }

    pub fn with_cms_container(mut self, container: Arc<dyn CmsContainer>, backend: &str) -> Self {
        self.cms = CmsOptions {
            container: Some(container),
            backend: backend.to_string(),
        };
        self
    }

    /// Route path under the base path (`/admin` + `/pages`)
    pub fn admin_path(&self, suffix: &str) -> String {
        let suffix = suffix.trim().trim_start_matches('/');
        if suffix.is_empty() {
            return self.base_path.clone();
        }
        if self.base_path == "/" {
            return format!("/{suffix}");
        }
        format!("{}/{suffix}", self.base_path)
    }
}

fn non_blank_or(value: &str, fallback: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
