//! Adapter flags and the provenance trace produced during bootstrap

use crate::ports::ActivitySink;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Label used until a persistent CMS is attached
pub const IN_MEMORY_CMS: &str = "in-memory CMS";

/// Label used until an options store is attached
pub const IN_MEMORY_SETTINGS: &str = "in-memory settings";

/// Label used until an activity sink is attached
pub const IN_MEMORY_ACTIVITY: &str = "in-memory activity";

/// Environment-derived switches selecting back-end implementations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AdapterFlags {
    pub use_persistent_cms: bool,
    pub use_go_options: bool,
    pub use_go_users_activity: bool,
}

/// Which backends were actually chosen during bootstrap, and why
///
/// Returned to the caller even when bootstrap fails so the provenance can be
/// logged.
#[derive(Clone)]
pub struct AdapterResult {
    pub flags: AdapterFlags,
    pub cms_backend: String,
    pub settings_backend: String,
    pub activity_backend: String,
    /// Sink attached to the admin instance, if any
    pub activity_sink: Option<Arc<dyn ActivitySink>>,
    pub persistent_cms_set: bool,
    pub persistent_cms_error: Option<String>,
}

impl AdapterResult {
    /// Fresh trace with the in-memory labels
    pub fn new(flags: AdapterFlags) -> Self {
        Self {
            flags,
            cms_backend: IN_MEMORY_CMS.to_string(),
            settings_backend: IN_MEMORY_SETTINGS.to_string(),
            activity_backend: IN_MEMORY_ACTIVITY.to_string(),
            activity_sink: None,
            persistent_cms_set: false,
            persistent_cms_error: None,
        }
    }

    /// Serializable summary used by doctor metadata and logs
    pub fn summary(&self) -> serde_json::Value {
        serde_json::json!({
            "flags": self.flags,
            "cms_backend": self.cms_backend,
            "settings_backend": self.settings_backend,
            "activity_backend": self.activity_backend,
            "activity_sink_attached": self.activity_sink.is_some(),
            "persistent_cms_set": self.persistent_cms_set,
            "persistent_cms_error": self.persistent_cms_error,
        })
    }
}

impl Default for AdapterResult {
    fn default() -> Self {
        Self::new(AdapterFlags::default())
    }
}

impl fmt::Debug for AdapterResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterResult")
            .field("flags", &self.flags)
            .field("cms_backend", &self.cms_backend)
            .field("settings_backend", &self.settings_backend)
            .field("activity_backend", &self.activity_backend)
            .field("activity_sink", &self.activity_sink.is_some())
            .field("persistent_cms_set", &self.persistent_cms_set)
            .field("persistent_cms_error", &self.persistent_cms_error)
            .finish()
    }
}
