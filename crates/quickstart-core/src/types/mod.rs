//! Shared data model for the admin quickstart

mod activity;
mod content;
mod menu;
mod module_types;
mod scope;
mod translation_types;
mod workflow_types;

pub use activity::*;
pub use content::*;
pub use menu::*;
pub use module_types::*;
pub use scope::*;
pub use translation_types::*;
pub use workflow_types::*;
