//! Navigation seeding against menu services with different reset support

mod common;

use common::*;
use quickstart_core::env::MapEnv;
use quickstart_core::types::MenuItem;
use quickstart_core::{is_kind, ErrorKind};
use quickstart_modules::navigation::{ENV_RESET_NAV_MENU, NAV_GROUP_MAIN};
use quickstart_modules::{default_nav_parents, seed_navigation, ResetOutcome, SeedOptions};
use std::sync::Arc;

fn seed_opts(svc: &Arc<FlatMenuService>, reset: bool) -> SeedOptions {
    SeedOptions {
        menu_service: Some(svc.clone()),
        menu_code: "admin_main".into(),
        items: default_nav_parents("en"),
        reset,
        locale: "en".into(),
        env: Arc::new(MapEnv::new()),
        skip_logger: true,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_reset_unsupported_still_seeds() {
    let svc = Arc::new(FlatMenuService::new(ResetMode::None));
    let outcome = seed_navigation(seed_opts(&svc, true)).await.unwrap();

    assert_eq!(outcome.reset, ResetOutcome::Unsupported);
    let sentinel = outcome.reset_error().expect("unsupported reset is reported");
    assert!(sentinel.is(ErrorKind::ResetUnsupported));
    assert_eq!(svc.item_ids("admin_main").len(), 4);
}

#[tokio::test]
async fn test_reset_by_code_is_used() {
    let svc = Arc::new(FlatMenuService::new(ResetMode::ByCode));
    seed_navigation(seed_opts(&svc, false)).await.unwrap();
    let outcome = seed_navigation(seed_opts(&svc, true)).await.unwrap();

    assert_eq!(outcome.reset, ResetOutcome::Reset);
    assert_eq!(svc.resets(), vec!["admin_main"]);
    assert_eq!(outcome.inserted.len(), 4);
    assert_eq!(svc.item_ids("admin_main").len(), 4);
}

#[tokio::test]
async fn test_legacy_reset_from_env() {
    let svc = Arc::new(FlatMenuService::new(ResetMode::Legacy));
    let mut opts = seed_opts(&svc, false);
    opts.env = Arc::new(MapEnv::new().with(ENV_RESET_NAV_MENU, "true"));

    let outcome = seed_navigation(opts).await.unwrap();
    assert_eq!(outcome.reset, ResetOutcome::Reset);
    assert_eq!(svc.resets(), vec!["admin_main"]);
}

#[tokio::test]
async fn test_custom_reset_env_key() {
    let svc = Arc::new(FlatMenuService::new(ResetMode::ByCode));
    let mut opts = seed_opts(&svc, false);
    opts.reset_env = "NAV_WIPE".into();
    opts.env = Arc::new(
        MapEnv::new()
            .with("NAV_WIPE", "1")
            .with(ENV_RESET_NAV_MENU, "false"),
    );

    let outcome = seed_navigation(opts).await.unwrap();
    assert_eq!(outcome.reset, ResetOutcome::Reset);
}

#[tokio::test]
async fn test_failed_reset_is_best_effort() {
    let svc = Arc::new(FlatMenuService::new(ResetMode::Failing));
    let outcome = seed_navigation(seed_opts(&svc, true)).await.unwrap();

    match &outcome.reset {
        ResetOutcome::Failed(message) => assert!(message.contains("read-only")),
        other => panic!("expected failed reset, got {other:?}"),
    }
    assert_eq!(outcome.inserted.len(), 4);
}

#[tokio::test]
async fn test_existing_menu_is_reused() {
    let svc = Arc::new(FlatMenuService::new(ResetMode::None));
    seed_navigation(seed_opts(&svc, false)).await.unwrap();

    let mut opts = seed_opts(&svc, false);
    opts.items = vec![
        MenuItem::item("", "Pages").with_parent(NAV_GROUP_MAIN),
        MenuItem::group(NAV_GROUP_MAIN, "Main (duplicate)"),
    ];
    let outcome = seed_navigation(opts).await.unwrap();

    assert_eq!(outcome.inserted, vec!["nav.group.main.pages"]);
    assert_eq!(outcome.skipped, vec![NAV_GROUP_MAIN]);
    assert_eq!(svc.item_ids("admin_main").len(), 5);
}

#[tokio::test]
async fn test_missing_menu_service_is_typed() {
    let err = seed_navigation(SeedOptions {
        items: default_nav_parents("en"),
        ..Default::default()
    })
    .await
    .unwrap_err();
    assert!(is_kind(&err, ErrorKind::SeedNavigationRequiresCms));
}
