//! Activity feed entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One recorded admin action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub actor: String,
    pub action: String,
    pub object: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
    pub occurred_at: DateTime<Utc>,
}

impl ActivityEntry {
    pub fn new(actor: impl Into<String>, action: impl Into<String>, object: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            action: action.into(),
            object: object.into(),
            metadata: BTreeMap::new(),
            occurred_at: Utc::now(),
        }
    }
}
