//! # quickstart-core
//!
//! Core library for the admin quickstart providing:
//! - Admin configuration values, normalization and env-derived settings
//! - Environment access through the [`env::EnvSource`] trait
//! - Collaborator traits for the CMS, workflow engine and feature gate
//! - The [`Admin`] instance, doctor check types and capability snapshots
//! - In-memory collaborators backing the default adapters

pub mod adapters;
pub mod admin;
pub mod capability;
pub mod config;
pub mod doctor;
pub mod env;
pub mod error;
pub mod memory;
pub mod ports;
pub mod types;
pub mod utils;

pub use adapters::{AdapterFlags, AdapterResult};
pub use admin::{
    Admin, AdminDeps, AdminId, AdminModule, AdminUrls, ModuleContext, Permission,
};
pub use capability::{CapabilitySnapshot, CapabilityStore};
pub use config::{AdminConfig, Features};
pub use doctor::{CheckOutput, CheckResult, DoctorCheck, Finding, Severity};
pub use error::{is_kind, Error, ErrorKind, FieldIssue, Result, ValidationError};
