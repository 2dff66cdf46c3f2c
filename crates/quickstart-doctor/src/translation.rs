//! `quickstart.translation`: published capabilities versus resolvable routes

use async_trait::async_trait;
use quickstart_core::{Admin, CheckOutput, DoctorCheck, Finding};
use quickstart_translation::wiring::{
    api_route_name, QUEUE_API_MY_WORK, ROUTE_EXCHANGE, ROUTE_TRANSLATION_DASHBOARD,
};

pub const CHECK_TRANSLATION: &str = "quickstart.translation";

pub const CODE_EXCHANGE_ROUTE: &str = "quickstart.translation.exchange_route";
pub const CODE_QUEUE_ROUTES: &str = "quickstart.translation.queue_routes";
pub const CODE_SNAPSHOT_WARNING: &str = "quickstart.translation.snapshot_warning";
pub const CODE_TRANSLATION_OK: &str = "quickstart.translation.ok";

const COMPONENT: &str = "translation";

#[derive(Debug, Default, Clone, Copy)]
pub struct TranslationCheck;

#[async_trait]
impl DoctorCheck for TranslationCheck {
    fn id(&self) -> &str {
        CHECK_TRANSLATION
    }

    fn label(&self) -> &str {
        "Translation"
    }

    fn description(&self) -> &str {
        "Checks that enabled translation modules expose their routes"
    }

    async fn run(&self, admin: &Admin) -> CheckOutput {
        let snapshot = admin.capability_snapshot();
        let mut findings = Vec::new();

        if snapshot.modules.exchange.enabled && !snapshot.has_route(ROUTE_EXCHANGE) {
            findings.push(
                Finding::warn(
                    CODE_EXCHANGE_ROUTE,
                    COMPONENT,
                    "translation exchange is enabled but its UI route does not resolve",
                )
                .with_metadata("route", ROUTE_EXCHANGE),
            );
        }

        if snapshot.modules.queue.enabled {
            let missing: Vec<String> = [
                ROUTE_TRANSLATION_DASHBOARD.to_string(),
                api_route_name(admin, QUEUE_API_MY_WORK),
            ]
            .into_iter()
            .filter(|route| !snapshot.has_route(route))
            .collect();
            if !missing.is_empty() {
                findings.push(
                    Finding::warn(
                        CODE_QUEUE_ROUTES,
                        COMPONENT,
                        format!(
                            "translation queue is enabled but routes are missing: {}",
                            missing.join(", ")
                        ),
                    )
                    .with_hint("enable the queue dashboard or register the queue routes")
                    .with_metadata("missing", missing),
                );
            }
        }

        for warning in &snapshot.warnings {
            findings.push(Finding::info(CODE_SNAPSHOT_WARNING, COMPONENT, warning.as_str()));
        }

        if findings.is_empty() {
            findings.push(Finding::ok(
                CODE_TRANSLATION_OK,
                COMPONENT,
                format!("translation profile {}", snapshot.profile),
            ));
        }

        CheckOutput::new(findings)
            .with_summary(format!("profile {}", snapshot.profile))
            .with_metadata("capabilities", snapshot.to_value())
    }
}
