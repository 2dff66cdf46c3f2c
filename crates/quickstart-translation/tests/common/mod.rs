//! Shared test utilities for quickstart-translation
//!
//! - A translation checker that records its calls
//! - An in-memory exchange store
//! - Admin and permission-log builders

#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use quickstart_core::admin::Permission;
use quickstart_core::config::FEATURE_CMS;
use quickstart_core::ports::TranslationChecker;
use quickstart_core::types::TranslationCheckOptions;
use quickstart_core::{Admin, AdminConfig, AdminDeps};
use quickstart_translation::{ExchangeRow, ExchangeStore, ExportFilter, PermissionRegister};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

/// One recorded checker invocation
#[derive(Debug, Clone)]
pub struct CheckCall {
    pub id: Uuid,
    pub locales: Vec<String>,
    pub options: TranslationCheckOptions,
}

/// Reports a fixed set of locales as missing
#[derive(Default)]
pub struct RecordingChecker {
    missing: Vec<String>,
    calls: Mutex<Vec<CheckCall>>,
}

impl RecordingChecker {
    pub fn missing<I, S>(locales: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Arc::new(Self {
            missing: locales.into_iter().map(Into::into).collect(),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<CheckCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl TranslationChecker for RecordingChecker {
    async fn check_translations(
        &self,
        id: Uuid,
        required_locales: &[String],
        options: &TranslationCheckOptions,
    ) -> Result<Vec<String>> {
        self.calls.lock().push(CheckCall {
            id,
            locales: required_locales.to_vec(),
            options: options.clone(),
        });
        Ok(self
            .missing
            .iter()
            .filter(|m| required_locales.iter().any(|r| r.eq_ignore_ascii_case(m)))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryExchangeStore {
    pub rows: Mutex<Vec<ExchangeRow>>,
}

#[async_trait]
impl ExchangeStore for MemoryExchangeStore {
    async fn export_rows(&self, _filter: &ExportFilter) -> Result<Vec<ExchangeRow>> {
        Ok(self.rows.lock().clone())
    }

    async fn has_target(&self, _row: &ExchangeRow) -> Result<bool> {
        Ok(true)
    }

    async fn upsert(&self, row: ExchangeRow) -> Result<()> {
        self.rows.lock().push(row);
        Ok(())
    }
}

pub fn memory_store() -> Arc<MemoryExchangeStore> {
    Arc::new(MemoryExchangeStore::default())
}

/// Admin at `/admin` with the CMS feature switched as requested
pub fn test_admin(cms: bool) -> Admin {
    let deps = AdminDeps {
        feature_defaults: BTreeMap::from([(FEATURE_CMS.to_string(), cms)]),
        ..Default::default()
    };
    Admin::new(AdminConfig::new("/admin", "en"), deps).expect("test admin should build")
}

/// Permission register that records every permission name it receives
pub fn permission_log() -> (PermissionRegister, Arc<Mutex<Vec<String>>>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = log.clone();
    let register: PermissionRegister = Arc::new(move |permissions: &[Permission]| {
        sink.lock().extend(permissions.iter().map(|p| p.name.clone()));
        Ok(())
    });
    (register, log)
}
