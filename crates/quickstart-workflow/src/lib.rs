//! Workflow configuration for admin quickstart
//!
//! Loads workflow definitions from YAML or JSON, normalizes and merges them,
//! validates structure with field-level issues, and registers the result with
//! a workflow engine.

pub mod config;
pub mod normalize;
pub mod register;
pub mod validate;

pub use config::{
    load_workflow_config_file, parse_workflow_config, TransitionSpec, WorkflowConfig,
    WorkflowDefinitionSpec, WORKFLOW_SCHEMA_VERSION,
};
pub use normalize::{merge_workflow_configs, normalize_workflow_config};
pub use register::{
    register_workflows, workflow_definitions_from_config, workflow_trait_defaults_from_config,
    WorkflowRegistration,
};
pub use validate::{validate_workflow_config, workflow_config_issues};
