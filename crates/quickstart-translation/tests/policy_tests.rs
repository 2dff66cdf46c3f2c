//! Integration tests for translation policy checks

mod common;

use common::RecordingChecker;
use quickstart_core::memory::InMemoryCms;
use quickstart_core::types::{RequiredFieldsStrategy, WorkflowDefinition, WorkflowTransition};
use quickstart_translation::{
    validate_policy_catalog, PolicyCatalog, PolicyError, PolicyInput, TranslationPolicy,
    TranslationPolicyConfig,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;

const PAGES_POLICY: &str = r#"
required:
  pages:
    publish:
      locales: [en, fr]
      required_fields:
        fr: [title, path]
"#;

fn config(yaml: &str) -> TranslationPolicyConfig {
    serde_yaml_ng::from_str(yaml).unwrap()
}

#[tokio::test]
async fn test_missing_translations_report_fields() {
    let checker = RecordingChecker::missing(["fr"]);
    let policy = TranslationPolicy::new(config(PAGES_POLICY)).with_pages_checker(checker.clone());
    let id = Uuid::new_v4();

    let err = policy
        .validate(&PolicyInput::new("pages", &id.to_string(), "publish"))
        .await
        .unwrap_err();

    let missing = err.as_missing().expect("missing translations error");
    assert_eq!(missing.missing_locales, vec!["fr"]);
    assert_eq!(
        missing.missing_fields_by_locale,
        BTreeMap::from([(
            "fr".to_string(),
            vec!["path".to_string(), "title".to_string()]
        )])
    );
    assert!(missing.required_fields_evaluated);

    let calls = checker.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].id, id);
    assert_eq!(calls[0].locales, vec!["en", "fr"]);
    assert_eq!(calls[0].options.required_fields_strategy, RequiredFieldsStrategy::Error);
}

#[tokio::test]
async fn test_ignore_strategy_skips_field_details() {
    let yaml = format!("required_fields_strategy: ignore\n{PAGES_POLICY}");
    let policy = TranslationPolicy::new(config(&yaml))
        .with_pages_checker(RecordingChecker::missing(["fr"]));

    let err = policy
        .validate(&PolicyInput::new("pages", &Uuid::new_v4().to_string(), "publish"))
        .await
        .unwrap_err();

    let missing = err.as_missing().unwrap();
    assert!(missing.missing_fields_by_locale.is_empty());
    assert!(!missing.required_fields_evaluated);
}

#[tokio::test]
async fn test_complete_translations_pass() {
    let policy = TranslationPolicy::new(config(PAGES_POLICY))
        .with_pages_checker(RecordingChecker::missing(Vec::<String>::new()));
    let input = PolicyInput::new("pages", &Uuid::new_v4().to_string(), "publish");
    assert!(policy.validate(&input).await.is_ok());
}

#[tokio::test]
async fn test_checker_discovered_on_cms() {
    let checker = RecordingChecker::missing(["en"]);
    let cms = InMemoryCms::new().with_pages_checker(checker.clone());
    let policy = TranslationPolicy::from_cms(config(PAGES_POLICY), &cms);

    let err = policy
        .validate(&PolicyInput::new("pages", &Uuid::new_v4().to_string(), "publish"))
        .await
        .unwrap_err();
    assert!(matches!(err, PolicyError::Missing(_)));
    assert_eq!(checker.calls().len(), 1);
}

#[tokio::test]
async fn test_environment_narrows_checked_locales() {
    let yaml = r#"
required:
  pages:
    publish:
      locales: [en, fr, de]
      environments:
        staging:
          locales: [en]
"#;
    let checker = RecordingChecker::missing(["fr"]);
    let policy = TranslationPolicy::new(config(yaml)).with_pages_checker(checker.clone());
    let input = PolicyInput::new("pages", &Uuid::new_v4().to_string(), "publish")
        .with_environment("Staging");

    assert!(policy.validate(&input).await.is_ok());
    assert_eq!(checker.calls()[0].locales, vec!["en"]);
    assert_eq!(checker.calls()[0].options.environment, "Staging");
}

#[test]
fn test_policy_loads_from_file() {
    let dir = TempDir::new().unwrap();
    let path = camino::Utf8PathBuf::from_path_buf(dir.path().join("policy.yaml")).unwrap();
    std::fs::write(&path, PAGES_POLICY).unwrap();

    let cfg = TranslationPolicyConfig::load(&path).unwrap();
    assert_eq!(cfg.all_locales(), vec!["en", "fr"]);
}

#[test]
fn test_policy_checked_against_workflows() {
    let definitions = BTreeMap::from([(
        "pages".to_string(),
        WorkflowDefinition {
            entity_type: "pages".into(),
            initial_state: "draft".into(),
            transitions: vec![WorkflowTransition::new("publish", "draft", "published")],
        },
    )]);
    let catalog = PolicyCatalog::from_workflows(&definitions);

    assert!(validate_policy_catalog(&config(PAGES_POLICY), &catalog)
        .unwrap()
        .is_empty());

    let unknown = "required:\n  pages:\n    retire:\n      locales: [en]\n";
    let err = validate_policy_catalog(&config(unknown), &catalog).unwrap_err();
    assert_eq!(
        err.as_validation().unwrap().failed_checks,
        vec!["required.pages.retire"]
    );
}
