//! Shared test utilities for quickstart-doctor

#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use quickstart_core::memory::{InMemoryContentService, DEFAULT_CONTENT_ENVIRONMENT};
use quickstart_core::ports::{CmsContainer, ContentService};
use quickstart_core::types::BlockDefinition;
use quickstart_core::{Admin, AdminConfig, AdminDeps, CheckOutput, DoctorCheck, Finding};
use std::sync::Arc;

pub fn test_admin() -> Admin {
    Admin::new(AdminConfig::new("/admin", "en"), AdminDeps::default())
        .expect("test admin should build")
}

/// Admin whose CMS exposes the given content service, if any
pub fn admin_with_content(service: Option<Arc<dyn ContentService>>) -> Admin {
    let config = AdminConfig::new("/admin", "en")
        .with_cms_container(Arc::new(ContentOnlyCms(service)), "test CMS");
    Admin::new(config, AdminDeps::default()).expect("test admin should build")
}

/// Admin whose CMS holds exactly `blocks` in the default environment
pub fn admin_with_blocks(blocks: Vec<BlockDefinition>) -> Admin {
    let service = InMemoryContentService::new();
    for block in blocks {
        service.add_block(DEFAULT_CONTENT_ENVIRONMENT, block);
    }
    admin_with_content(Some(Arc::new(service)))
}

struct ContentOnlyCms(Option<Arc<dyn ContentService>>);

impl CmsContainer for ContentOnlyCms {
    fn content_service(&self) -> Option<Arc<dyn ContentService>> {
        self.0.clone()
    }
}

/// Check that always reports one finding with a fixed label
pub struct StaticCheck {
    pub id: &'static str,
    pub label: &'static str,
}

#[async_trait]
impl DoctorCheck for StaticCheck {
    fn id(&self) -> &str {
        self.id
    }

    fn label(&self) -> &str {
        self.label
    }

    async fn run(&self, _admin: &Admin) -> CheckOutput {
        CheckOutput::new(vec![Finding::info("custom.info", "custom", self.label)])
    }
}

pub fn static_check(id: &'static str, label: &'static str) -> Arc<dyn DoctorCheck> {
    Arc::new(StaticCheck { id, label })
}

/// Content service that always fails
pub struct BrokenContent;

#[async_trait]
impl ContentService for BrokenContent {
    async fn block_definitions(&self, _environment: &str) -> Result<Vec<BlockDefinition>> {
        anyhow::bail!("content store offline")
    }
}
