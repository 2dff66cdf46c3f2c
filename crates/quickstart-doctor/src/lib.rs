//! Admin Doctor - built-in diagnostic checks
//!
//! Checks run against a fully built [`Admin`] and report findings with a
//! severity, a stable code and an optional hint.
//!
//! # Built-in checks
//!
//! - `quickstart.adapters`: requested adapters versus the attached backends
//! - `quickstart.routes`: dashboard, navigation and error routes resolve
//! - `quickstart.blocks.seeded_defaults`: `hero` and `rich_text` blocks exist
//! - `quickstart.translation`: enabled translation modules expose their routes
//!
//! # Example
//!
//! ```rust,no_run
//! use quickstart_doctor::{run_doctor, DoctorReporter, OutputFormat};
//!
//! # async fn example(admin: &quickstart_core::Admin) {
//! let report = run_doctor(admin).await;
//! println!("{}", DoctorReporter::default().format(&report, OutputFormat::Human));
//! # }
//! ```

mod adapters;
mod blocks;
mod report;
mod reporter;
mod routes;
mod translation;

pub use adapters::{AdaptersCheck, CHECK_ADAPTERS, CODE_PERSISTENT_CMS};
pub use blocks::{
    block_aliases, missing_blocks, SeededBlocksCheck, CHECK_SEEDED_BLOCKS, REQUIRED_BLOCKS,
};
pub use report::{run_doctor, DoctorReport};
pub use reporter::{DoctorReporter, OutputFormat};
pub use routes::{required_routes, RoutesCheck, CHECK_ROUTES};
pub use translation::{TranslationCheck, CHECK_TRANSLATION};

/// Finding codes emitted by the built-in checks
pub mod codes {
    pub use crate::adapters::{
        CODE_ACTIVITY_SINK, CODE_ADAPTERS_OK, CODE_OPTIONS_STORE, CODE_PERSISTENT_CMS,
    };
    pub use crate::blocks::{
        CODE_BLOCKS_LOAD_FAILED, CODE_BLOCKS_MISSING, CODE_BLOCKS_OK, CODE_CONTENT_SERVICE_MISSING,
    };
    pub use crate::routes::{CODE_RESOLVER_MISSING, CODE_ROUTES_OK, CODE_ROUTE_UNRESOLVED};
    pub use crate::translation::{
        CODE_EXCHANGE_ROUTE, CODE_QUEUE_ROUTES, CODE_SNAPSHOT_WARNING, CODE_TRANSLATION_OK,
    };
}

use quickstart_core::{Admin, DoctorCheck};
use std::sync::Arc;

/// The built-in checks in their canonical order
pub fn builtin_checks() -> Vec<Arc<dyn DoctorCheck>> {
    let checks: [Arc<dyn DoctorCheck>; 4] = [
        Arc::new(AdaptersCheck),
        Arc::new(RoutesCheck),
        Arc::new(SeededBlocksCheck),
        Arc::new(TranslationCheck),
    ];
    checks.into()
}

/// Register the built-in checks followed by `extra`
///
/// Checks whose ID is already registered are skipped, so the first
/// registration of an ID wins.
pub fn register_checks<I>(admin: &mut Admin, extra: I)
where
    I: IntoIterator<Item = Arc<dyn DoctorCheck>>,
{
    admin.register_doctor_checks(builtin_checks());
    admin.register_doctor_checks(extra);
    tracing::info!("Registered {} doctor check(s)", admin.doctor_checks().len());
}
