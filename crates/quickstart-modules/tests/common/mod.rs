//! Shared test utilities for quickstart-modules
//!
//! - Menu services with and without the various reset capabilities
//! - Modules that record their registration order

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod mocks;

pub use mocks::*;

use quickstart_core::{Admin, AdminConfig, AdminDeps};

/// Admin with in-memory collaborators at `/admin`
pub fn test_admin() -> Admin {
    Admin::new(AdminConfig::new("/admin", "en"), AdminDeps::default())
        .expect("default admin should build")
}
