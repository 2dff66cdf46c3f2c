//! # quickstart-modules
//!
//! Module ordering, navigation seeding and module registration.
//!
//! Modules are registered dependency-first ([`order_modules`]); before any of
//! them registers, the navigation tree is seeded with the default parents and
//! every module's menu items ([`seed_navigation`]).

pub mod dependency;
pub mod navigation;
pub mod registrar;

pub use dependency::{order_manifests, order_modules, OrderError};
pub use navigation::{
    default_nav_parents, normalize_menu_item, seed_navigation, ResetOutcome, SeedOptions,
    SeedOutcome,
};
pub use registrar::{register_modules, NavigationOptions, RegistrationSummary};
