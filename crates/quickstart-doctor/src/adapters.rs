//! `quickstart.adapters`: requested adapters versus what was attached

use async_trait::async_trait;
use quickstart_core::adapters::IN_MEMORY_SETTINGS;
use quickstart_core::{Admin, CheckOutput, DoctorCheck, Finding};

pub const CHECK_ADAPTERS: &str = "quickstart.adapters";

pub const CODE_PERSISTENT_CMS: &str = "quickstart.adapters.persistent_cms";
pub const CODE_OPTIONS_STORE: &str = "quickstart.adapters.options_store";
pub const CODE_ACTIVITY_SINK: &str = "quickstart.adapters.activity_sink";
pub const CODE_ADAPTERS_OK: &str = "quickstart.adapters.ok";

const COMPONENT: &str = "adapters";

/// Compares the adapter flags against the backends bootstrap ended up with
#[derive(Debug, Default, Clone, Copy)]
pub struct AdaptersCheck;

#[async_trait]
impl DoctorCheck for AdaptersCheck {
    fn id(&self) -> &str {
        CHECK_ADAPTERS
    }

    fn label(&self) -> &str {
        "Adapters"
    }

    fn description(&self) -> &str {
        "Checks that every adapter requested through the environment was attached"
    }

    fn action(&self) -> &str {
        "Configure the adapter hooks or unset the corresponding USE_* variables"
    }

    async fn run(&self, admin: &Admin) -> CheckOutput {
        let result = admin.adapter_result();
        let flags = result.flags;
        let mut findings = Vec::new();

        if flags.use_persistent_cms && !result.persistent_cms_set {
            let mut finding = Finding::error(
                CODE_PERSISTENT_CMS,
                COMPONENT,
                "persistent CMS requested but none was attached",
            )
            .with_hint(
                "USE_PERSISTENT_CMS is set; provide a persistent CMS hook or unset USE_PERSISTENT_CMS",
            );
            if let Some(err) = &result.persistent_cms_error {
                finding = finding.with_metadata("error", err.as_str());
            }
            findings.push(finding);
        }

        if flags.use_go_options && result.settings_backend == IN_MEMORY_SETTINGS {
            findings.push(
                Finding::warn(
                    CODE_OPTIONS_STORE,
                    COMPONENT,
                    "options store requested but settings still use the in-memory backend",
                )
                .with_hint("USE_GO_OPTIONS is set; provide an options store hook"),
            );
        }

        let sink_attached = result.activity_sink.is_some() || admin.activity_sink().is_some();
        if flags.use_go_users_activity && !sink_attached {
            findings.push(
                Finding::warn(
                    CODE_ACTIVITY_SINK,
                    COMPONENT,
                    "users activity requested but no activity sink is attached",
                )
                .with_hint("USE_GO_USERS_ACTIVITY is set; provide an activity sink hook"),
            );
        }

        let summary = if findings.is_empty() {
            findings.push(Finding::ok(
                CODE_ADAPTERS_OK,
                COMPONENT,
                format!(
                    "CMS: {}, settings: {}, activity: {}",
                    result.cms_backend, result.settings_backend, result.activity_backend
                ),
            ));
            "requested adapters are attached"
        } else {
            "requested adapters are missing"
        };

        CheckOutput::new(findings)
            .with_summary(summary)
            .with_metadata("adapters", result.summary())
    }
}
