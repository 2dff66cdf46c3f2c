//! Environment-derived settings: error exposure, secure links, PDF export

use crate::env::{
    env_bool, env_bool_or, env_csv, env_duration, env_duration_seconds, env_string,
    env_string_or, EnvSource,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const ENV_ADMIN_DEV: &str = "ADMIN_DEV";
pub const ENV_ERROR_STACKTRACE: &str = "ADMIN_ERROR_STACKTRACE";
pub const ENV_ERROR_EXPOSE_INTERNAL: &str = "ADMIN_ERROR_EXPOSE_INTERNAL";

pub const ENV_SECURELINK_BASE_URL: &str = "ADMIN_SECURELINK_BASE_URL";
pub const ENV_SECURELINK_KEY: &str = "ADMIN_SECURELINK_KEY";
pub const ENV_SECURELINK_QUERY_KEY: &str = "ADMIN_SECURELINK_QUERY_KEY";
pub const ENV_SECURELINK_AS_QUERY: &str = "ADMIN_SECURELINK_AS_QUERY";
pub const ENV_SECURELINK_EXPIRATION: &str = "ADMIN_SECURELINK_EXPIRATION";

pub const ENV_PDF_ENGINE: &str = "EXPORT_PDF_ENGINE";
pub const ENV_WKHTMLTOPDF_PATH: &str = "WKHTMLTOPDF_PATH";
pub const ENV_PDF_BROWSER_PATH: &str = "EXPORT_PDF_BROWSER_PATH";
pub const ENV_PDF_PAGE_SIZE: &str = "EXPORT_PDF_PAGE_SIZE";
pub const ENV_PDF_HEADLESS: &str = "EXPORT_PDF_HEADLESS";
pub const ENV_PDF_PRINT_BACKGROUND: &str = "EXPORT_PDF_PRINT_BACKGROUND";
pub const ENV_PDF_PREFER_CSS_PAGE_SIZE: &str = "EXPORT_PDF_PREFER_CSS_PAGE_SIZE";
pub const ENV_PDF_TIMEOUT_SECONDS: &str = "EXPORT_PDF_TIMEOUT_SECONDS";
pub const ENV_PDF_ARGS: &str = "EXPORT_PDF_ARGS";

const DEFAULT_SECURELINK_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_SECURELINK_QUERY_KEY: &str = "token";
const DEFAULT_SECURELINK_EXPIRATION: Duration = Duration::from_secs(72 * 60 * 60);
const DEFAULT_PDF_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_PDF_ARGS: &[&str] = &["--no-sandbox", "--disable-dev-shm-usage", "--disable-gpu"];

/// How much error detail is exposed to clients
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorConfig {
    pub dev: bool,
    pub expose_stack_trace: bool,
    pub expose_internal_messages: bool,
}

impl ErrorConfig {
    /// Stack traces and internal messages default to the dev flag
    pub fn from_env(env: &dyn EnvSource) -> Self {
        let dev = env_bool_or(env, ENV_ADMIN_DEV, false);
        Self {
            dev,
            expose_stack_trace: env_bool(env, ENV_ERROR_STACKTRACE).unwrap_or(dev),
            expose_internal_messages: env_bool(env, ENV_ERROR_EXPOSE_INTERNAL).unwrap_or(dev),
        }
    }
}

/// Signed-link settings handed to the secure-link manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecureLinkSettings {
    pub base_url: String,
    pub signing_key: String,
    pub query_key: String,
    pub as_query: bool,
    pub expiration: Duration,
}

impl SecureLinkSettings {
    /// `None` when no signing key is configured (feature disabled)
    pub fn from_env(env: &dyn EnvSource) -> Option<Self> {
        let signing_key = env_string(env, ENV_SECURELINK_KEY)?;
        Some(Self {
            base_url: env_string_or(env, ENV_SECURELINK_BASE_URL, DEFAULT_SECURELINK_BASE_URL),
            signing_key,
            query_key: env_string_or(env, ENV_SECURELINK_QUERY_KEY, DEFAULT_SECURELINK_QUERY_KEY),
            as_query: env_bool_or(env, ENV_SECURELINK_AS_QUERY, true),
            expiration: env_duration(env, ENV_SECURELINK_EXPIRATION, DEFAULT_SECURELINK_EXPIRATION),
        })
    }
}

/// PDF rendering engines the export pipeline can drive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PdfEngine {
    #[default]
    Chromium,
    Wkhtmltopdf,
}

/// PDF export renderer settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfExportSettings {
    pub engine: PdfEngine,
    pub wkhtmltopdf_path: Option<String>,
    pub browser_path: Option<String>,
    pub page_size: Option<String>,
    pub headless: bool,
    pub print_background: bool,
    pub prefer_css_page_size: bool,
    pub timeout: Duration,
    pub args: Vec<String>,
}

impl Default for PdfExportSettings {
    fn default() -> Self {
        Self {
            engine: PdfEngine::Chromium,
            wkhtmltopdf_path: None,
            browser_path: None,
            page_size: None,
            headless: true,
            print_background: true,
            prefer_css_page_size: true,
            timeout: DEFAULT_PDF_TIMEOUT,
            args: DEFAULT_PDF_ARGS.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl PdfExportSettings {
    pub fn from_env(env: &dyn EnvSource) -> Self {
        let engine = match env_string(env, ENV_PDF_ENGINE)
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("wkhtmltopdf") => PdfEngine::Wkhtmltopdf,
            _ => PdfEngine::Chromium,
        };

        let mut args = env_csv(env, ENV_PDF_ARGS);
        if args.is_empty() {
            args = DEFAULT_PDF_ARGS.iter().map(|a| a.to_string()).collect();
        }

        Self {
            engine,
            wkhtmltopdf_path: env_string(env, ENV_WKHTMLTOPDF_PATH),
            browser_path: env_string(env, ENV_PDF_BROWSER_PATH),
            page_size: env_string(env, ENV_PDF_PAGE_SIZE),
            headless: env_bool_or(env, ENV_PDF_HEADLESS, true),
            print_background: env_bool_or(env, ENV_PDF_PRINT_BACKGROUND, true),
            prefer_css_page_size: env_bool_or(env, ENV_PDF_PREFER_CSS_PAGE_SIZE, true),
            timeout: env_duration_seconds(env, ENV_PDF_TIMEOUT_SECONDS, DEFAULT_PDF_TIMEOUT),
            args,
        }
    }
}
