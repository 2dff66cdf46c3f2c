//! Translation queue: assignment of translation work to translators

use crate::exchange::PermissionRegister;
use anyhow::Result;
use async_trait::async_trait;
use quickstart_core::utils::dedupe_case_insensitive;
use quickstart_core::{ErrorKind, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub const CODE_QUEUE_PRIORITY_INVALID: &str = "translation.queue.priority_invalid";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueuePriority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl QueuePriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl fmt::Display for QueuePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueuePriority {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            other => Err(ValidationError::new(
                ErrorKind::TranslationQueueConfig,
                CODE_QUEUE_PRIORITY_INVALID,
                format!("unknown queue priority {other:?}"),
            )
            .with_hint("use one of low, normal, high, urgent")),
        }
    }
}

/// A unit of translation work
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueAssignment {
    pub id: String,
    pub resource: String,
    pub entity_id: String,
    pub locale: String,
    /// Blank while the assignment sits in the open pool
    pub assignee: String,
    pub priority: QueuePriority,
}

/// Storage for queue assignments
#[async_trait]
pub trait QueueRepository: Send + Sync {
    async fn save(&self, assignment: QueueAssignment) -> Result<()>;

    async fn assignments_for(&self, assignee: &str) -> Result<Vec<QueueAssignment>>;
}

/// Queue operations exposed to the admin UI
#[async_trait]
pub trait QueueService: Send + Sync {
    /// Take an open assignment
    async fn claim(&self, assignment_id: &str, assignee: &str) -> Result<QueueAssignment>;
}

/// Queue module configuration
#[derive(Clone, Default)]
pub struct TranslationQueueConfig {
    pub enabled: bool,
    pub enable_open_pool: bool,
    pub enable_dashboard: bool,
    pub enable_notifications: bool,
    /// Raw priority; validated when the queue is enabled
    pub default_priority: Option<String>,
    pub supported_locales: Vec<String>,
    pub repository: Option<Arc<dyn QueueRepository>>,
    pub service: Option<Arc<dyn QueueService>>,
    pub permission_register: Option<PermissionRegister>,
}

impl fmt::Debug for TranslationQueueConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationQueueConfig")
            .field("enabled", &self.enabled)
            .field("enable_open_pool", &self.enable_open_pool)
            .field("enable_dashboard", &self.enable_dashboard)
            .field("enable_notifications", &self.enable_notifications)
            .field("default_priority", &self.default_priority)
            .field("supported_locales", &self.supported_locales)
            .field("repository", &self.repository.is_some())
            .field("service", &self.service.is_some())
            .field("permission_register", &self.permission_register.is_some())
            .finish()
    }
}

impl TranslationQueueConfig {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Default::default()
        }
    }

    pub fn with_supported_locales<I, S>(mut self, locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.supported_locales = dedupe_case_insensitive(locales);
        self
    }

    pub fn with_default_priority(mut self, priority: &str) -> Self {
        self.default_priority = Some(priority.to_string());
        self
    }

    /// Parsed default priority; `Normal` when unset or blank
    pub fn priority(&self) -> std::result::Result<QueuePriority, ValidationError> {
        match self.default_priority.as_deref().map(str::trim) {
            None | Some("") => Ok(QueuePriority::default()),
            Some(raw) => raw.parse(),
        }
    }

    /// Overlay `other` on `self`: `enabled` is taken verbatim, everything
    /// else only when set
    pub fn merged_with(&self, other: &Self) -> Self {
        Self {
            enabled: other.enabled,
            enable_open_pool: other.enable_open_pool || self.enable_open_pool,
            enable_dashboard: other.enable_dashboard || self.enable_dashboard,
            enable_notifications: other.enable_notifications || self.enable_notifications,
            default_priority: other
                .default_priority
                .clone()
                .filter(|p| !p.trim().is_empty())
                .or_else(|| self.default_priority.clone()),
            supported_locales: if other.supported_locales.is_empty() {
                self.supported_locales.clone()
            } else {
                other.supported_locales.clone()
            },
            repository: other.repository.clone().or_else(|| self.repository.clone()),
            service: other.service.clone().or_else(|| self.service.clone()),
            permission_register: other
                .permission_register
                .clone()
                .or_else(|| self.permission_register.clone()),
        }
    }
}

/// Queue settings bound on the admin registry
#[derive(Clone)]
pub struct QueueBinding {
    pub repository: Option<Arc<dyn QueueRepository>>,
    pub service: Option<Arc<dyn QueueService>>,
    pub default_priority: QueuePriority,
    pub supported_locales: Vec<String>,
    pub open_pool: bool,
}
