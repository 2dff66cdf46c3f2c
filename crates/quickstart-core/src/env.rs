//! Environment access and typed env parsing
//!
//! All environment reads go through [`EnvSource`] so tests can inject values
//! without touching the process environment.
//!
//! # Environment Variables
//!
//! - `USE_PERSISTENT_CMS`, `USE_GO_OPTIONS`, `USE_GO_USERS_ACTIVITY`: adapter
//!   flags, enabled only by a case-insensitive `true`.
//!
//! Boolean helpers accept `1/0/true/false/yes/no/on/off` (case-insensitive);
//! anything else is treated as unset.

use crate::adapters::AdapterFlags;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use std::time::Duration;

pub const ENV_USE_PERSISTENT_CMS: &str = "USE_PERSISTENT_CMS";
pub const ENV_USE_GO_OPTIONS: &str = "USE_GO_OPTIONS";
pub const ENV_USE_GO_USERS_ACTIVITY: &str = "USE_GO_USERS_ACTIVITY";

/// One `<number><unit>` segment of a duration string (`1h30m`, `1.5s`, `250ms`)
static DURATION_SEGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)(ns|us|µs|ms|s|m|h)").expect("duration regex is valid")
});

/// Source of environment values
pub trait EnvSource: Send + Sync {
    /// Raw value for `key`, or `None` when unset
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads from the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory environment, mostly for tests and embedded hosts
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(key, value)` pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }
}

impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Parse a boolean the way the environment helpers do
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a Go-style duration string (`72h`, `1h30m`, `1.5s`, `250ms`)
///
/// A bare integer is read as seconds.
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(secs) = raw.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }

    let mut total_nanos = 0u128;
    let mut consumed = 0;
    for caps in DURATION_SEGMENT_RE.captures_iter(raw) {
        let whole = caps.get(0)?;
        // segments must be contiguous; reject things like "5x3h"
        if whole.start() != consumed {
            return None;
        }
        consumed = whole.end();

        let value: f64 = caps[1].parse().ok()?;
        let unit_nanos: f64 = match &caps[2] {
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            _ => return None,
        };
        let nanos = (value * unit_nanos).round();
        if !nanos.is_finite() || nanos > u64::MAX as f64 {
            return None;
        }
        total_nanos = total_nanos.checked_add(nanos as u128)?;
    }

    if consumed != raw.len() {
        return None;
    }
    u64::try_from(total_nanos).ok().map(Duration::from_nanos)
}

/// Trimmed string value, `None` when unset or blank
pub fn env_string(env: &dyn EnvSource, key: &str) -> Option<String> {
    env.var(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trimmed string value with a fallback for unset/blank
pub fn env_string_or(env: &dyn EnvSource, key: &str, fallback: &str) -> String {
    env_string(env, key).unwrap_or_else(|| fallback.to_string())
}

/// Boolean value; `None` when unset or unparseable
pub fn env_bool(env: &dyn EnvSource, key: &str) -> Option<bool> {
    env.var(key).as_deref().and_then(parse_bool)
}

/// Boolean value with a fallback
pub fn env_bool_or(env: &dyn EnvSource, key: &str, fallback: bool) -> bool {
    env_bool(env, key).unwrap_or(fallback)
}

/// Exactly `true` (case-insensitive); used by the adapter and reset flags
pub fn env_is_true(env: &dyn EnvSource, key: &str) -> bool {
    env.var(key)
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

/// Duration value parsed with [`parse_duration`]
pub fn env_duration(env: &dyn EnvSource, key: &str, fallback: Duration) -> Duration {
    env.var(key)
        .as_deref()
        .and_then(parse_duration)
        .unwrap_or(fallback)
}

/// Integer count of seconds
pub fn env_duration_seconds(env: &dyn EnvSource, key: &str, fallback: Duration) -> Duration {
    env.var(key)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(fallback)
}

/// Split on `,` or `;`, trim, and drop blanks
pub fn env_csv(env: &dyn EnvSource, key: &str) -> Vec<String> {
    env.var(key)
        .map(|v| split_csv(&v))
        .unwrap_or_default()
}

/// Split a `,`/`;` separated list
pub fn split_csv(raw: &str) -> Vec<String> {
    raw.split([',', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Read the three adapter flags from the environment
pub fn resolve_adapter_flags(env: &dyn EnvSource) -> AdapterFlags {
    AdapterFlags {
        use_persistent_cms: env_is_true(env, ENV_USE_PERSISTENT_CMS),
        use_go_options: env_is_true(env, ENV_USE_GO_OPTIONS),
        use_go_users_activity: env_is_true(env, ENV_USE_GO_USERS_ACTIVITY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_parse_bool_accepts_documented_forms() {
        for raw in ["1", "TRUE", "yes", "On"] {
            assert_eq!(parse_bool(raw), Some(true), "{raw}");
        }
        for raw in ["0", "False", "NO", "off"] {
            assert_eq!(parse_bool(raw), Some(false), "{raw}");
        }
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("72h"), Some(Duration::from_secs(72 * 3600)));
        assert_eq!(parse_duration("1h30m"), Some(Duration::from_secs(5400)));
        assert_eq!(parse_duration("250ms"), Some(Duration::from_millis(250)));
        assert_eq!(parse_duration("1.5s"), Some(Duration::from_millis(1500)));
        assert_eq!(parse_duration("45"), Some(Duration::from_secs(45)));
        assert_eq!(parse_duration("5x"), None);
        assert_eq!(parse_duration("h"), None);
        assert_eq!(parse_duration(""), None);
    }

    #[test]
    fn test_parse_duration_rejects_overflow() {
        let huge = format!("{}h1h", "9".repeat(41));
        assert_eq!(parse_duration(&huge), None);
        assert_eq!(parse_duration("3000000h3000000h"), None);
    }

    #[test]
    fn test_env_helpers_with_map_env() {
        let env = MapEnv::from_pairs([
            ("FLAG", "yes"),
            ("BAD_FLAG", "sometimes"),
            ("TIMEOUT", "30"),
            ("EXPIRY", "2h"),
            ("LIST", "a, b;;c , "),
        ]);

        assert_eq!(env_bool(&env, "FLAG"), Some(true));
        assert_eq!(env_bool(&env, "BAD_FLAG"), None);
        assert_eq!(env_bool(&env, "MISSING"), None);
        assert_eq!(
            env_duration_seconds(&env, "TIMEOUT", Duration::from_secs(1)),
            Duration::from_secs(30)
        );
        assert_eq!(
            env_duration(&env, "EXPIRY", Duration::from_secs(1)),
            Duration::from_secs(7200)
        );
        assert_eq!(
            env_duration(&env, "MISSING", Duration::from_secs(9)),
            Duration::from_secs(9)
        );
        assert_eq!(env_csv(&env, "LIST"), vec!["a", "b", "c"]);
        assert!(env_csv(&env, "MISSING").is_empty());
    }

    #[test]
    fn test_adapter_flags_require_literal_true() {
        let env = MapEnv::from_pairs([
            (ENV_USE_PERSISTENT_CMS, "TRUE"),
            (ENV_USE_GO_OPTIONS, "1"),
            (ENV_USE_GO_USERS_ACTIVITY, " true "),
        ]);
        let flags = resolve_adapter_flags(&env);
        assert!(flags.use_persistent_cms);
        assert!(!flags.use_go_options);
        assert!(flags.use_go_users_activity);
    }

    #[test]
    #[serial]
    fn test_process_env_reads_real_environment() {
        std::env::set_var("QUICKSTART_TEST_PROCESS_ENV", "on");
        assert_eq!(env_bool(&ProcessEnv, "QUICKSTART_TEST_PROCESS_ENV"), Some(true));
        std::env::remove_var("QUICKSTART_TEST_PROCESS_ENV");
        assert_eq!(env_bool(&ProcessEnv, "QUICKSTART_TEST_PROCESS_ENV"), None);
    }
}
