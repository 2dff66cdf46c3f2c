//! Named admin features and their flag keys

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const FEATURE_DASHBOARD: &str = "dashboard";
pub const FEATURE_CMS: &str = "cms";
pub const FEATURE_COMMANDS: &str = "commands";
pub const FEATURE_SETTINGS: &str = "settings";
pub const FEATURE_SEARCH: &str = "search";
pub const FEATURE_NOTIFICATIONS: &str = "notifications";
pub const FEATURE_JOBS: &str = "jobs";
pub const FEATURE_MEDIA: &str = "media";
pub const FEATURE_EXPORT: &str = "export";
pub const FEATURE_BULK: &str = "bulk";
pub const FEATURE_PREFERENCES: &str = "preferences";
pub const FEATURE_PROFILE: &str = "profile";
pub const FEATURE_USERS: &str = "users";
pub const FEATURE_TENANTS: &str = "tenants";
pub const FEATURE_ORGANIZATIONS: &str = "organizations";
pub const FEATURE_ACTIVITY: &str = "activity";
pub const FEATURE_PREVIEW: &str = "preview";
pub const FEATURE_TRANSLATION_EXCHANGE: &str = "translations.exchange";
pub const FEATURE_TRANSLATION_QUEUE: &str = "translations.queue";

/// Feature toggles carried on the admin config
///
/// The `Default` impl is the quickstart baseline: the everyday console
/// features on, multi-tenancy, preview and the translation modules off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    pub dashboard: bool,
    pub cms: bool,
    pub commands: bool,
    pub settings: bool,
    pub search: bool,
    pub notifications: bool,
    pub jobs: bool,
    pub media: bool,
    pub export: bool,
    pub bulk: bool,
    pub preferences: bool,
    pub profile: bool,
    pub users: bool,
    pub tenants: bool,
    pub organizations: bool,
    pub activity: bool,
    pub preview: bool,
    pub translation_exchange: bool,
    pub translation_queue: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            dashboard: true,
            cms: true,
            commands: true,
            settings: true,
            search: true,
            notifications: true,
            jobs: true,
            media: true,
            export: true,
            bulk: true,
            preferences: true,
            profile: true,
            users: true,
            tenants: false,
            organizations: false,
            activity: true,
            preview: false,
            translation_exchange: false,
            translation_queue: false,
        }
    }
}

impl Features {
    /// All features off
    pub fn none() -> Self {
        Self {
            dashboard: false,
            cms: false,
            commands: false,
            settings: false,
            search: false,
            notifications: false,
            jobs: false,
            media: false,
            export: false,
            bulk: false,
            preferences: false,
            profile: false,
            users: false,
            tenants: false,
            organizations: false,
            activity: false,
            preview: false,
            translation_exchange: false,
            translation_queue: false,
        }
    }

    /// Feature-gate defaults keyed by flag name
    pub fn to_flags(&self) -> BTreeMap<String, bool> {
        [
            (FEATURE_DASHBOARD, self.dashboard),
            (FEATURE_CMS, self.cms),
            (FEATURE_COMMANDS, self.commands),
            (FEATURE_SETTINGS, self.settings),
            (FEATURE_SEARCH, self.search),
            (FEATURE_NOTIFICATIONS, self.notifications),
            (FEATURE_JOBS, self.jobs),
            (FEATURE_MEDIA, self.media),
            (FEATURE_EXPORT, self.export),
            (FEATURE_BULK, self.bulk),
            (FEATURE_PREFERENCES, self.preferences),
            (FEATURE_PROFILE, self.profile),
            (FEATURE_USERS, self.users),
            (FEATURE_TENANTS, self.tenants),
            (FEATURE_ORGANIZATIONS, self.organizations),
            (FEATURE_ACTIVITY, self.activity),
            (FEATURE_PREVIEW, self.preview),
            (FEATURE_TRANSLATION_EXCHANGE, self.translation_exchange),
            (FEATURE_TRANSLATION_QUEUE, self.translation_queue),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }
}
