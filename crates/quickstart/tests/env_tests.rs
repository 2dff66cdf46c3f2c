//! Bootstrap against the process environment

mod common;

use common::*;
use quickstart::{AdapterHooks, AdminBuilder, AdminConfig};
use serial_test::serial;
use std::sync::Arc;

const ADAPTER_VARS: [&str; 3] = ["USE_PERSISTENT_CMS", "USE_GO_OPTIONS", "USE_GO_USERS_ACTIVITY"];

fn clear_adapter_vars() {
    for var in ADAPTER_VARS {
        std::env::remove_var(var);
    }
}

#[tokio::test]
#[serial]
async fn test_options_store_follows_process_env() {
    clear_adapter_vars();
    std::env::set_var("USE_GO_OPTIONS", "True");

    let admin = AdminBuilder::new(AdminConfig::default())
        .with_hooks(AdapterHooks::default().with_options_store(Arc::new(OptionsHook("kv options"))))
        .build()
        .await;
    clear_adapter_vars();

    let admin = admin.unwrap();
    let adapters = admin.adapter_result();
    assert!(adapters.flags.use_go_options);
    assert_eq!(adapters.settings_backend, "kv options");
}

#[tokio::test]
#[serial]
async fn test_unset_env_keeps_in_memory_backends() {
    clear_adapter_vars();

    let admin = AdminBuilder::new(AdminConfig::default())
        .with_hooks(
            AdapterHooks::default()
                .with_persistent_cms(Arc::new(CmsHook { fail: false }))
                .with_options_store(Arc::new(OptionsHook("kv options"))),
        )
        .build()
        .await
        .unwrap();

    let adapters = admin.adapter_result();
    assert_eq!(adapters.cms_backend, "in-memory CMS");
    assert_eq!(adapters.settings_backend, "in-memory settings");
}
