//! Translation capability snapshots and their per-admin store
//!
//! A snapshot is built once at the end of bootstrap. Doctor checks, templates,
//! and external tooling read it through [`CapabilityStore::lookup`], which
//! always hands out a clone.

use crate::admin::AdminId;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Current translation product schema version
pub const TRANSLATION_PRODUCT_SCHEMA_VERSION: i64 = 1;

/// Profile name reported when nothing was resolved
pub const PROFILE_NONE: &str = "none";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleState {
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityModules {
    pub exchange: ModuleState,
    pub queue: ModuleState,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityFeatures {
    pub cms: bool,
    pub dashboard: bool,
}

/// Which translation modules, routes and panels are active for one admin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySnapshot {
    pub profile: String,
    pub schema_version: i64,
    pub modules: CapabilityModules,
    pub features: CapabilityFeatures,
    /// Route name to resolved path
    pub routes: BTreeMap<String, String>,
    pub panels: Vec<String>,
    pub resolver_keys: Vec<String>,
    pub warnings: Vec<String>,
}

impl CapabilitySnapshot {
    /// Snapshot for an admin that never resolved a translation profile
    pub fn zero(features: CapabilityFeatures) -> Self {
        Self {
            profile: PROFILE_NONE.to_string(),
            schema_version: TRANSLATION_PRODUCT_SCHEMA_VERSION,
            modules: CapabilityModules::default(),
            features,
            routes: BTreeMap::new(),
            panels: Vec::new(),
            resolver_keys: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Whether a route name resolved to a non-blank path
    pub fn has_route(&self, name: &str) -> bool {
        self.routes.get(name).is_some_and(|p| !p.trim().is_empty())
    }

    /// JSON form handed to templates
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl Default for CapabilitySnapshot {
    fn default() -> Self {
        Self::zero(CapabilityFeatures::default())
    }
}

/// Read-mostly store of snapshots keyed by admin identity
#[derive(Debug, Default)]
pub struct CapabilityStore {
    snapshots: RwLock<HashMap<AdminId, CapabilitySnapshot>>,
}

impl CapabilityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish (or replace) the snapshot for an admin
    pub fn store(&self, admin: AdminId, snapshot: CapabilitySnapshot) {
        self.snapshots.write().insert(admin, snapshot);
    }

    /// Clone of the stored snapshot, if any
    pub fn get(&self, admin: AdminId) -> Option<CapabilitySnapshot> {
        self.snapshots.read().get(&admin).cloned()
    }

    /// Clone of the stored snapshot, or a zero-profile snapshot
    pub fn lookup(&self, admin: AdminId, features: CapabilityFeatures) -> CapabilitySnapshot {
        self.get(admin)
            .unwrap_or_else(|| CapabilitySnapshot::zero(features))
    }

    pub fn remove(&self, admin: AdminId) -> Option<CapabilitySnapshot> {
        self.snapshots.write().remove(&admin)
    }

    pub fn len(&self) -> usize {
        self.snapshots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn sample() -> CapabilitySnapshot {
        let mut snapshot = CapabilitySnapshot::zero(CapabilityFeatures {
            cms: true,
            dashboard: true,
        });
        snapshot.profile = "full".into();
        snapshot.routes.insert("admin.translations.queue".into(), "/admin/translations/queue".into());
        snapshot.warnings.push("translation.productization.legacy_override".into());
        snapshot
    }

    #[test]
    fn test_lookup_returns_isolated_clone() {
        let store = CapabilityStore::new();
        let id = AdminId::next();
        store.store(id, sample());

        let mut first = store.lookup(id, CapabilityFeatures::default());
        first.routes.clear();
        first.warnings.push("mutated".into());

        let second = store.lookup(id, CapabilityFeatures::default());
        assert_eq!(second, sample());
    }

    #[test]
    fn test_lookup_missing_admin_yields_zero_profile() {
        let store = CapabilityStore::new();
        let snapshot = store.lookup(
            AdminId::next(),
            CapabilityFeatures {
                cms: true,
                dashboard: false,
            },
        );
        assert_eq!(snapshot.profile, "none");
        assert_eq!(snapshot.schema_version, TRANSLATION_PRODUCT_SCHEMA_VERSION);
        assert!(snapshot.features.cms);
        assert!(!snapshot.modules.exchange.enabled);
        assert!(store.is_empty());
    }

    #[test]
    fn test_concurrent_readers_see_published_snapshot() {
        let store = Arc::new(CapabilityStore::new());
        let id = AdminId::next();
        store.store(id, sample());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.lookup(id, CapabilityFeatures::default()).profile)
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), "full");
        }
    }
}
