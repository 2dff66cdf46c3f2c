//! Engine-level workflow definitions

use serde::{Deserialize, Serialize};

/// A workflow edge
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowTransition {
    pub name: String,
    pub description: String,
    pub from: String,
    pub to: String,
    /// Optional guard expression evaluated by the engine
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guard: Option<String>,
}

impl WorkflowTransition {
    pub fn new(name: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            from: from.into(),
            to: to.into(),
            ..Default::default()
        }
    }
}

/// A state machine handed to the workflow engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowDefinition {
    /// Workflow ID; engines key definitions by entity type
    pub entity_type: String,
    pub initial_state: String,
    pub transitions: Vec<WorkflowTransition>,
}

impl WorkflowDefinition {
    /// Names of all transitions in declaration order
    pub fn transition_names(&self) -> Vec<&str> {
        self.transitions.iter().map(|t| t.name.as_str()).collect()
    }
}
