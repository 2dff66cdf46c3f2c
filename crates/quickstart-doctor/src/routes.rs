//! `quickstart.routes`: the routes every admin console must resolve

use async_trait::async_trait;
use quickstart_core::admin::ROUTE_DASHBOARD;
use quickstart_core::{Admin, CheckOutput, DoctorCheck, Finding};

pub const CHECK_ROUTES: &str = "quickstart.routes";

pub const CODE_RESOLVER_MISSING: &str = "quickstart.routes.resolver";
pub const CODE_ROUTE_UNRESOLVED: &str = "quickstart.routes.unresolved";
pub const CODE_ROUTES_OK: &str = "quickstart.routes.ok";

const COMPONENT: &str = "routes";

/// Route names the check requires, with the admin's API group filled in
pub fn required_routes(admin: &Admin) -> Vec<String> {
    let api = admin.api_group();
    vec![
        ROUTE_DASHBOARD.to_string(),
        format!("{api}.navigation"),
        format!("{api}.errors"),
    ]
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RoutesCheck;

#[async_trait]
impl DoctorCheck for RoutesCheck {
    fn id(&self) -> &str {
        CHECK_ROUTES
    }

    fn label(&self) -> &str {
        "Routes"
    }

    fn description(&self) -> &str {
        "Checks that the dashboard, navigation and error routes resolve"
    }

    async fn run(&self, admin: &Admin) -> CheckOutput {
        let Some(urls) = admin.urls() else {
            return CheckOutput::new(vec![Finding::error(
                CODE_RESOLVER_MISSING,
                COMPONENT,
                "no URL resolver is available",
            )
            .with_hint("register admin routes before running the doctor")])
            .with_summary("URL resolver missing");
        };

        let mut findings = Vec::new();
        let mut resolved = serde_json::Map::new();
        for route in required_routes(admin) {
            match urls.resolve(&route).filter(|p| !p.trim().is_empty()) {
                Some(path) => {
                    resolved.insert(route, path.into());
                }
                None => findings.push(
                    Finding::error(
                        CODE_ROUTE_UNRESOLVED,
                        COMPONENT,
                        format!("route {route} does not resolve"),
                    )
                    .with_hint(format!("register a route named {route}"))
                    .with_metadata("route", route.as_str()),
                ),
            }
        }

        let summary = if findings.is_empty() {
            findings.push(Finding::ok(CODE_ROUTES_OK, COMPONENT, "required routes resolve"));
            "required routes resolve".to_string()
        } else {
            format!("{} required route(s) unresolved", findings.len())
        };
        CheckOutput::new(findings)
            .with_summary(summary)
            .with_metadata("resolved", serde_json::Value::Object(resolved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickstart_core::{AdminConfig, AdminDeps, Features, Severity};

    #[tokio::test]
    async fn test_default_admin_resolves_core_routes() {
        let admin = Admin::new(AdminConfig::new("/admin", "en"), AdminDeps::default()).unwrap();
        let output = RoutesCheck.run(&admin).await;
        assert_eq!(output.severity(), Severity::Ok);
        assert_eq!(output.metadata["resolved"]["admin.dashboard"], "/admin");
    }

    #[tokio::test]
    async fn test_missing_dashboard_is_reported() {
        let config = AdminConfig::new("/admin", "en").with_features(Features {
            dashboard: false,
            ..Default::default()
        });
        let admin = Admin::new(config, AdminDeps::default()).unwrap();

        let output = RoutesCheck.run(&admin).await;
        assert_eq!(output.severity(), Severity::Error);
        assert_eq!(output.findings.len(), 1);
        assert_eq!(output.findings[0].metadata["route"], ROUTE_DASHBOARD);
        assert_eq!(output.metadata["resolved"]["admin.api.errors"], "/admin/api/errors");
    }
}
