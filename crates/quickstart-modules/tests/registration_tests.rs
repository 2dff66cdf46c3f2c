//! Module registration ordering and navigation integration tests

mod common;

use common::*;
use parking_lot::Mutex;
use quickstart_core::env::MapEnv;
use quickstart_core::types::MenuItem;
use quickstart_modules::navigation::{NAV_GROUP_CONTENT, NAV_GROUP_TOOLS};
use quickstart_modules::{register_modules, NavigationOptions, OrderError};
use std::sync::Arc;

fn nav() -> NavigationOptions {
    NavigationOptions {
        env: Some(Arc::new(MapEnv::new())),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_modules_register_in_dependency_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut admin = test_admin();

    let modules = vec![
        RecordingModule::new("translations", &["pages", "content"], &log).arc(),
        RecordingModule::new("pages", &["content"], &log).arc(),
        RecordingModule::new("content", &[], &log).arc(),
    ];
    let summary = register_modules(&mut admin, modules, NavigationOptions::without_seeding())
        .await
        .unwrap();

    assert_eq!(summary.order, vec!["content", "pages", "translations"]);
    assert_eq!(*log.lock(), summary.order);
    assert_eq!(admin.modules(), summary.order.as_slice());
    assert!(admin.registry().has_panel("pages.panel"));
    assert!(summary.navigation.is_none());
}

#[tokio::test]
async fn test_module_menu_items_are_seeded() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut admin = test_admin();

    let modules = vec![
        RecordingModule::new("pages", &[], &log)
            .with_item(MenuItem::item("nav.pages", "Pages").with_parent(NAV_GROUP_CONTENT))
            .arc(),
        RecordingModule::new("tools", &[], &log)
            .with_item(MenuItem::item("", "Cache").with_parent(NAV_GROUP_TOOLS))
            .arc(),
    ];
    let summary = register_modules(&mut admin, modules, nav()).await.unwrap();

    let outcome = summary.navigation.expect("navigation was seeded");
    assert_eq!(outcome.menu_code, "admin_main");
    assert_eq!(outcome.inserted.len(), 6);

    let menu = admin
        .menu_service()
        .unwrap()
        .menu("admin_main", "en")
        .await
        .unwrap();
    assert!(menu.find("nav.pages").is_some());
    assert!(menu.find("nav.group.tools.cache").is_some());
}

#[tokio::test]
async fn test_registration_twice_does_not_duplicate_menu() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut admin = test_admin();
    register_modules(&mut admin, Vec::new(), nav()).await.unwrap();

    let modules = vec![RecordingModule::new("pages", &[], &log).arc()];
    let summary = register_modules(&mut admin, modules, nav()).await.unwrap();

    let outcome = summary.navigation.unwrap();
    assert!(outcome.inserted.is_empty());
    assert_eq!(outcome.skipped.len(), 4);
}

#[tokio::test]
async fn test_unknown_dependency_aborts_before_registration() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut admin = test_admin();

    let modules = vec![RecordingModule::new("pages", &["ghost"], &log).arc()];
    let err = register_modules(&mut admin, modules, nav()).await.unwrap_err();

    assert_eq!(
        err.downcast_ref::<OrderError>(),
        Some(&OrderError::NotRegistered("ghost".into()))
    );
    assert!(log.lock().is_empty());
    assert!(admin.modules().is_empty());
}

#[tokio::test]
async fn test_failing_module_stops_registration() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut admin = test_admin();

    let modules = vec![
        RecordingModule::new("content", &[], &log).arc(),
        RecordingModule::new("pages", &["content"], &log).failing().arc(),
        RecordingModule::new("search", &["pages"], &log).arc(),
    ];
    let err = register_modules(&mut admin, modules, NavigationOptions::without_seeding())
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("register module pages"));
    assert_eq!(*log.lock(), vec!["content"]);
}

#[tokio::test]
async fn test_already_registered_module_is_rejected() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut admin = test_admin();
    let opts = NavigationOptions::without_seeding();

    register_modules(&mut admin, vec![RecordingModule::new("pages", &[], &log).arc()], opts.clone())
        .await
        .unwrap();
    let err = register_modules(&mut admin, vec![RecordingModule::new("pages", &[], &log).arc()], opts)
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("module pages already registered"));
}
