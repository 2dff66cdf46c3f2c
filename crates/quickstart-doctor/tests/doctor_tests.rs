//! Integration tests for the built-in doctor checks

mod common;

use common::{admin_with_blocks, admin_with_content, static_check, test_admin, BrokenContent};
use quickstart_core::capability::{CapabilityFeatures, CapabilitySnapshot};
use quickstart_core::types::BlockDefinition;
use quickstart_core::{AdapterFlags, AdapterResult, DoctorCheck, Severity};
use quickstart_doctor::codes::{
    CODE_BLOCKS_LOAD_FAILED, CODE_BLOCKS_MISSING, CODE_CONTENT_SERVICE_MISSING, CODE_QUEUE_ROUTES,
    CODE_SNAPSHOT_WARNING, CODE_TRANSLATION_OK,
};
use quickstart_doctor::{
    register_checks, run_doctor, AdaptersCheck, SeededBlocksCheck, TranslationCheck,
    CHECK_ADAPTERS, CHECK_ROUTES, CHECK_SEEDED_BLOCKS, CHECK_TRANSLATION, CODE_PERSISTENT_CMS,
};
use std::sync::Arc;

#[tokio::test]
async fn test_persistent_cms_requested_but_missing() {
    let mut admin = test_admin();
    admin.set_adapter_result(AdapterResult::new(AdapterFlags {
        use_persistent_cms: true,
        ..Default::default()
    }));

    let output = AdaptersCheck.run(&admin).await;

    let errors: Vec<_> = output
        .findings
        .iter()
        .filter(|f| f.severity == Severity::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, CODE_PERSISTENT_CMS);
    assert!(errors[0].hint.contains("USE_PERSISTENT_CMS"));
    assert_eq!(
        output.metadata["adapters"]["flags"]["use_persistent_cms"],
        true
    );
}

#[tokio::test]
async fn test_default_admin_is_healthy() {
    let mut admin = test_admin();
    register_checks(&mut admin, Vec::new());

    let report = run_doctor(&admin).await;
    let ids: Vec<_> = report.checks.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![CHECK_ADAPTERS, CHECK_ROUTES, CHECK_SEEDED_BLOCKS, CHECK_TRANSLATION]
    );
    assert!(report.is_healthy());
    assert_eq!(report.severity, Severity::Ok);
    assert_eq!(report.base_path, "/admin");
}

#[tokio::test]
async fn test_first_registration_of_an_id_wins() {
    let mut admin = test_admin();
    register_checks(
        &mut admin,
        vec![
            static_check(" Quickstart.Routes ", "shadow"),
            static_check("custom.one", "first"),
            static_check("CUSTOM.ONE", "second"),
        ],
    );

    let labels: Vec<_> = admin.doctor_checks().iter().map(|c| c.label().to_string()).collect();
    assert_eq!(labels.len(), 5);
    assert_eq!(labels[4], "first");
    assert!(!labels.contains(&"shadow".to_string()));
}

#[tokio::test]
async fn test_blocks_match_by_alias() {
    let admin = admin_with_blocks(vec![
        BlockDefinition::new("b1", "hero", "banner"),
        BlockDefinition::new("b2", "rich-text", "text"),
    ]);
    let output = SeededBlocksCheck.run(&admin).await;
    assert_eq!(output.severity(), Severity::Ok);
}

#[tokio::test]
async fn test_missing_blocks_are_listed() {
    let admin = admin_with_blocks(vec![BlockDefinition::new("b1", "hero", "hero")]);
    let output = SeededBlocksCheck.run(&admin).await;

    assert_eq!(output.severity(), Severity::Error);
    assert_eq!(output.findings[0].code, CODE_BLOCKS_MISSING);
    assert_eq!(output.findings[0].metadata["missing"], serde_json::json!(["rich_text"]));
}

#[tokio::test]
async fn test_missing_content_service_warns() {
    let admin = admin_with_content(None);
    let output = SeededBlocksCheck.run(&admin).await;
    assert_eq!(output.severity(), Severity::Warn);
    assert_eq!(output.findings[0].code, CODE_CONTENT_SERVICE_MISSING);
}

#[tokio::test]
async fn test_content_service_failure_is_an_error() {
    let admin = admin_with_content(Some(Arc::new(BrokenContent)));
    let output = SeededBlocksCheck.run(&admin).await;
    assert_eq!(output.findings[0].code, CODE_BLOCKS_LOAD_FAILED);
    assert!(output.findings[0].message.contains("content store offline"));
}

#[tokio::test]
async fn test_translation_check_reads_published_snapshot() {
    let admin = test_admin();
    let output = TranslationCheck.run(&admin).await;
    assert_eq!(output.findings[0].code, CODE_TRANSLATION_OK);

    let mut snapshot = CapabilitySnapshot::zero(CapabilityFeatures::default());
    snapshot.profile = "none".into();
    snapshot.modules.queue.enabled = true;
    snapshot
        .routes
        .insert("admin.api.translations.my_work".into(), "/admin/api/translations/my_work".into());
    snapshot.warnings = vec!["translation.productization.legacy_override".into()];
    admin.publish_capabilities(snapshot);

    let output = TranslationCheck.run(&admin).await;
    let codes: Vec<_> = output.findings.iter().map(|f| f.code.as_str()).collect();
    assert_eq!(codes, vec![CODE_QUEUE_ROUTES, CODE_SNAPSHOT_WARNING]);
    assert_eq!(
        output.findings[0].metadata["missing"],
        serde_json::json!(["admin.translations.dashboard"])
    );
    assert_eq!(output.findings[1].severity, Severity::Info);
    assert_eq!(output.severity(), Severity::Warn);
}
