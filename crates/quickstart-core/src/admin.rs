//! The admin instance assembled by the bootstrap
//!
//! [`Admin`] owns everything after construction: routes, the registry of
//! panels/commands/permissions/bindings, registered modules, doctor checks and
//! the adapter trace. It is keyed by a process-unique [`AdminId`], which the
//! capability store uses instead of pointer identity.

use crate::adapters::AdapterResult;
use crate::capability::{CapabilityFeatures, CapabilitySnapshot, CapabilityStore};
use crate::config::{AdminConfig, PdfExportSettings, SecureLinkSettings, FEATURE_DASHBOARD};
use crate::doctor::{CheckResult, DoctorCheck};
use crate::error::{Error, Result};
use crate::memory::{InMemoryCms, StaticFeatureGate};
use crate::ports::{
    ActivitySink, CmsContainer, ContentService, FeatureGate, MenuService, UrlResolver,
    WorkflowEngine,
};
use crate::types::{MenuItem, ModuleManifest, ScopeChain};
use crate::utils::normalize_lookup_key;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Route group of the admin JSON API
pub const DEFAULT_API_GROUP: &str = "admin.api";

/// Route name of the dashboard
pub const ROUTE_DASHBOARD: &str = "admin.dashboard";

static NEXT_ADMIN_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an admin instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AdminId(u64);

impl AdminId {
    /// Allocate a fresh ID
    pub fn next() -> Self {
        Self(NEXT_ADMIN_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AdminId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "admin-{}", self.0)
    }
}

/// Named routes registered by the admin and its modules
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: BTreeMap<String, String>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a named route
    pub fn register(&mut self, name: impl Into<String>, path: impl Into<String>) {
        self.routes.insert(name.into(), path.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.routes.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.routes.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl UrlResolver for RouteTable {
    fn resolve(&self, name: &str) -> Option<String> {
        self.routes.get(name).cloned()
    }
}

/// Host resolver layered over the admin's [`RouteTable`]
#[derive(Clone, Copy)]
pub struct AdminUrls<'a> {
    external: Option<&'a dyn UrlResolver>,
    routes: &'a RouteTable,
}

impl AdminUrls<'_> {
    pub fn resolve(&self, name: &str) -> Option<String> {
        self.external
            .and_then(|resolver| resolver.resolve(name))
            .or_else(|| self.routes.resolve(name))
    }
}

impl UrlResolver for AdminUrls<'_> {
    fn resolve(&self, name: &str) -> Option<String> {
        AdminUrls::resolve(self, name)
    }
}

/// A permission registered by a module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Permission {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Panels, commands, permissions, and typed service bindings
#[derive(Default)]
pub struct Registry {
    panels: Vec<String>,
    commands: Vec<String>,
    permissions: Vec<Permission>,
    bindings: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl Registry {
    /// Register a panel ID; returns `false` if it was already present
    pub fn register_panel(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.panels.contains(&id) {
            return false;
        }
        self.panels.push(id);
        true
    }

    pub fn has_panel(&self, id: &str) -> bool {
        self.panels.iter().any(|p| p == id)
    }

    pub fn panels(&self) -> &[String] {
        &self.panels
    }

    /// Register a command name; returns `false` if it was already present
    pub fn register_command(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.commands.contains(&name) {
            return false;
        }
        self.commands.push(name);
        true
    }

    pub fn has_command(&self, name: &str) -> bool {
        self.commands.iter().any(|c| c == name)
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Register a permission; later registrations of the same name are ignored
    pub fn register_permission(&mut self, permission: Permission) -> bool {
        if self.has_permission(&permission.name) {
            return false;
        }
        self.permissions.push(permission);
        true
    }

    pub fn has_permission(&self, name: &str) -> bool {
        self.permissions.iter().any(|p| p.name == name)
    }

    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    /// Bind a typed service under a key
    pub fn bind<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: Arc<T>) {
        self.bindings.insert(key.into(), value);
    }

    /// Typed binding, if present and of type `T`
    pub fn binding<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        self.bindings
            .get(key)
            .cloned()
            .and_then(|value| value.downcast::<T>().ok())
    }

    pub fn has_binding(&self, key: &str) -> bool {
        self.bindings.contains_key(key)
    }

    /// Binding keys in sorted order
    pub fn binding_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.bindings.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("panels", &self.panels)
            .field("commands", &self.commands)
            .field("permissions", &self.permissions)
            .field("bindings", &self.binding_keys())
            .finish()
    }
}

/// Settings resolved from the environment at bootstrap
#[derive(Debug, Clone, Default)]
pub struct AdminSettings {
    pub secure_link: Option<SecureLinkSettings>,
    pub pdf_export: PdfExportSettings,
}

/// Services handed to [`Admin::new`]
#[derive(Default)]
pub struct AdminDeps {
    /// Feature gate; a [`StaticFeatureGate`] over `feature_defaults` when absent
    pub feature_gate: Option<Arc<dyn FeatureGate>>,
    pub feature_defaults: BTreeMap<String, bool>,
    pub workflow: Option<Arc<dyn WorkflowEngine>>,
    /// Host URL resolver, consulted before the admin's own route table
    pub url_resolver: Option<Arc<dyn UrlResolver>>,
    pub capabilities: Option<Arc<CapabilityStore>>,
    pub settings: AdminSettings,
}

/// Hook run once by [`Admin::initialize`]
pub type InitHook = Box<dyn Fn(&Admin) -> anyhow::Result<()> + Send + Sync>;

/// Registration context handed to modules
pub struct ModuleContext<'a> {
    pub admin: &'a mut Admin,
    pub locale: String,
}

/// A pluggable admin module
pub trait AdminModule: Send + Sync {
    fn manifest(&self) -> ModuleManifest;

    /// Register routes, panels, permissions and bindings
    fn register(&self, ctx: &mut ModuleContext<'_>) -> anyhow::Result<()>;

    /// Navigation contributed by the module
    fn menu_items(&self, _locale: &str) -> Vec<MenuItem> {
        Vec::new()
    }
}

/// A fully wired admin console
pub struct Admin {
    id: AdminId,
    config: AdminConfig,
    api_group: String,
    feature_gate: Arc<dyn FeatureGate>,
    workflow: Option<Arc<dyn WorkflowEngine>>,
    cms: Arc<dyn CmsContainer>,
    routes: RouteTable,
    url_resolver: Option<Arc<dyn UrlResolver>>,
    registry: Registry,
    modules: Vec<String>,
    doctor_checks: Vec<Arc<dyn DoctorCheck>>,
    init_hooks: Vec<InitHook>,
    initialized: bool,
    activity_sink: Option<Arc<dyn ActivitySink>>,
    adapters: AdapterResult,
    workflow_trait_defaults: BTreeMap<String, String>,
    settings: AdminSettings,
    capabilities: Arc<CapabilityStore>,
}

impl Admin {
    /// Construct an admin from a config and its services
    pub fn new(config: AdminConfig, deps: AdminDeps) -> Result<Self> {
        let config = config.normalized();
        if config.default_locale.chars().any(char::is_whitespace) {
            return Err(Error::invalid_config(format!(
                "default locale {:?} must not contain whitespace",
                config.default_locale
            )));
        }

        let feature_gate = deps
            .feature_gate
            .unwrap_or_else(|| Arc::new(StaticFeatureGate::new(deps.feature_defaults)));
        let cms = config
            .cms
            .container
            .clone()
            .unwrap_or_else(|| Arc::new(InMemoryCms::new()));

        let mut admin = Self {
            id: AdminId::next(),
            api_group: DEFAULT_API_GROUP.to_string(),
            feature_gate,
            workflow: deps.workflow,
            cms,
            routes: RouteTable::new(),
            url_resolver: deps.url_resolver,
            registry: Registry::default(),
            modules: Vec::new(),
            doctor_checks: Vec::new(),
            init_hooks: Vec::new(),
            initialized: false,
            activity_sink: None,
            adapters: AdapterResult::default(),
            workflow_trait_defaults: BTreeMap::new(),
            settings: deps.settings,
            capabilities: deps.capabilities.unwrap_or_default(),
            config,
        };
        admin.register_core_routes();

        tracing::debug!("constructed {} at {}", admin.id, admin.config.base_path);
        Ok(admin)
    }

    fn register_core_routes(&mut self) {
        if self.config.features.dashboard || self.feature_enabled(FEATURE_DASHBOARD) {
            let path = self.config.admin_path("");
            self.routes.register(ROUTE_DASHBOARD, path);
        }
        let api = self.api_group.clone();
        let navigation = self.config.admin_path("api/navigation");
        let errors = self.config.admin_path("api/errors");
        self.routes.register(format!("{api}.navigation"), navigation);
        self.routes.register(format!("{api}.errors"), errors);
    }

    pub fn id(&self) -> AdminId {
        self.id
    }

    pub fn config(&self) -> &AdminConfig {
        &self.config
    }

    pub fn base_path(&self) -> &str {
        &self.config.base_path
    }

    /// Route group of the JSON API (`admin.api`)
    pub fn api_group(&self) -> &str {
        &self.api_group
    }

    pub fn feature_gate(&self) -> &Arc<dyn FeatureGate> {
        &self.feature_gate
    }

    /// Whether a feature is on at system scope
    pub fn feature_enabled(&self, feature: &str) -> bool {
        self.feature_gate.enabled(feature, &ScopeChain::system())
    }

    pub fn workflow_engine(&self) -> Option<&Arc<dyn WorkflowEngine>> {
        self.workflow.as_ref()
    }

    pub fn cms(&self) -> &Arc<dyn CmsContainer> {
        &self.cms
    }

    pub fn menu_service(&self) -> Option<Arc<dyn MenuService>> {
        self.cms.menu_service()
    }

    pub fn content_service(&self) -> Option<Arc<dyn ContentService>> {
        self.cms.content_service()
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn routes_mut(&mut self) -> &mut RouteTable {
        &mut self.routes
    }

    /// URL resolver; `None` when nothing can be resolved at all
    ///
    /// A host resolver is consulted first, then the admin's own routes.
    pub fn urls(&self) -> Option<AdminUrls<'_>> {
        let external = self.url_resolver.as_deref();
        if external.is_none() && self.routes.is_empty() {
            return None;
        }
        Some(AdminUrls {
            external,
            routes: &self.routes,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Register a module, recording its ID on success
    pub fn register_module(&mut self, module: &dyn AdminModule) -> anyhow::Result<()> {
        let id = module.manifest().id.trim().to_string();
        if id.is_empty() {
            bail!("module missing ID");
        }
        if self.modules.contains(&id) {
            bail!("module {id} already registered");
        }

        let locale = self.config.default_locale.clone();
        let mut ctx = ModuleContext {
            admin: self,
            locale,
        };
        module.register(&mut ctx)?;

        tracing::debug!("registered module {}", id);
        self.modules.push(id);
        Ok(())
    }

    /// IDs of registered modules in registration order
    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    pub fn with_activity_sink(&mut self, sink: Arc<dyn ActivitySink>) {
        self.activity_sink = Some(sink);
    }

    pub fn activity_sink(&self) -> Option<&Arc<dyn ActivitySink>> {
        self.activity_sink.as_ref()
    }

    pub fn adapter_result(&self) -> &AdapterResult {
        &self.adapters
    }

    pub fn set_adapter_result(&mut self, result: AdapterResult) {
        self.adapters = result;
    }

    /// Add doctor checks; a check whose ID (trimmed, lowercased) is already
    /// registered is skipped
    pub fn register_doctor_checks<I>(&mut self, checks: I)
    where
        I: IntoIterator<Item = Arc<dyn DoctorCheck>>,
    {
        for check in checks {
            let key = normalize_lookup_key(check.id());
            if key.is_empty() {
                tracing::warn!("skipping doctor check without an ID");
                continue;
            }
            let duplicate = self
                .doctor_checks
                .iter()
                .any(|existing| normalize_lookup_key(existing.id()) == key);
            if duplicate {
                tracing::debug!("doctor check {} already registered", check.id());
                continue;
            }
            self.doctor_checks.push(check);
        }
    }

    pub fn doctor_checks(&self) -> &[Arc<dyn DoctorCheck>] {
        &self.doctor_checks
    }

    /// Run every doctor check in registration order
    pub async fn run_doctor(&self) -> Vec<CheckResult> {
        let mut results = Vec::with_capacity(self.doctor_checks.len());
        for check in &self.doctor_checks {
            let output = check.run(self).await;
            results.push(CheckResult::new(check.as_ref(), output));
        }
        results
    }

    pub fn add_init_hook(&mut self, hook: InitHook) {
        self.init_hooks.push(hook);
    }

    /// Run init hooks once; later calls are no-ops
    pub fn initialize(&mut self) -> anyhow::Result<()> {
        if self.initialized {
            return Ok(());
        }
        let hooks = std::mem::take(&mut self.init_hooks);
        for (index, hook) in hooks.iter().enumerate() {
            hook(self).with_context(|| format!("init hook {index}"))?;
        }
        self.initialized = true;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn set_workflow_trait_defaults(&mut self, defaults: BTreeMap<String, String>) {
        self.workflow_trait_defaults = defaults;
    }

    /// Trait name to workflow ID
    pub fn workflow_trait_defaults(&self) -> &BTreeMap<String, String> {
        &self.workflow_trait_defaults
    }

    pub fn settings(&self) -> &AdminSettings {
        &self.settings
    }

    pub fn capability_store(&self) -> &Arc<CapabilityStore> {
        &self.capabilities
    }

    /// Publish this admin's capability snapshot
    pub fn publish_capabilities(&self, snapshot: CapabilitySnapshot) {
        self.capabilities.store(self.id, snapshot);
    }

    /// Clone of the published snapshot, or a zero-profile one
    pub fn capability_snapshot(&self) -> CapabilitySnapshot {
        self.capabilities.lookup(
            self.id,
            CapabilityFeatures {
                cms: self.config.features.cms,
                dashboard: self.config.features.dashboard,
            },
        )
    }
}

impl fmt::Debug for Admin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Admin")
            .field("id", &self.id)
            .field("base_path", &self.config.base_path)
            .field("routes", &self.routes)
            .field("registry", &self.registry)
            .field("modules", &self.modules)
            .field("doctor_checks", &self.doctor_checks.len())
            .field("adapters", &self.adapters)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Features;
    use crate::doctor::{CheckOutput, Finding};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    struct NamedCheck(&'static str, &'static str);

    #[async_trait]
    impl DoctorCheck for NamedCheck {
        fn id(&self) -> &str {
            self.0
        }

        fn label(&self) -> &str {
            self.1
        }

        async fn run(&self, _admin: &Admin) -> CheckOutput {
            CheckOutput::new(vec![Finding::ok(self.0, "test", self.1)])
        }
    }

    struct PagesModule;

    impl AdminModule for PagesModule {
        fn manifest(&self) -> ModuleManifest {
            ModuleManifest::new("pages")
        }

        fn register(&self, ctx: &mut ModuleContext<'_>) -> anyhow::Result<()> {
            let path = ctx.admin.config().admin_path("pages");
            ctx.admin.routes_mut().register("admin.pages", path);
            ctx.admin.registry_mut().register_panel("pages");
            Ok(())
        }
    }

    #[test]
    fn test_core_routes_registered_at_construction() {
        let admin = Admin::new(AdminConfig::new("/console/", "en"), AdminDeps::default()).unwrap();
        let urls = admin.urls().unwrap();
        assert_eq!(urls.resolve("admin.dashboard").as_deref(), Some("/console"));
        assert_eq!(
            urls.resolve("admin.api.navigation").as_deref(),
            Some("/console/api/navigation")
        );
        assert_eq!(urls.resolve("admin.api.errors").as_deref(), Some("/console/api/errors"));
    }

    struct HostUrls;

    impl UrlResolver for HostUrls {
        fn resolve(&self, name: &str) -> Option<String> {
            (name == "admin.dashboard").then(|| "/host/dashboard".to_string())
        }
    }

    #[test]
    fn test_host_resolver_falls_back_to_admin_routes() {
        let deps = AdminDeps {
            url_resolver: Some(Arc::new(HostUrls)),
            ..AdminDeps::default()
        };
        let mut admin = Admin::new(AdminConfig::new("/console", "en"), deps).unwrap();
        admin.routes_mut().register("admin.pages", "/console/pages");

        let urls = admin.urls().unwrap();
        assert_eq!(urls.resolve("admin.dashboard").as_deref(), Some("/host/dashboard"));
        assert_eq!(urls.resolve("admin.pages").as_deref(), Some("/console/pages"));
        assert_eq!(urls.resolve("admin.missing"), None);
    }

    #[test]
    fn test_dashboard_route_follows_feature() {
        let cfg = AdminConfig::default().with_features(Features::none());
        let admin = Admin::new(cfg, AdminDeps::default()).unwrap();
        assert!(!admin.routes().contains(ROUTE_DASHBOARD));
    }

    #[test]
    fn test_admin_ids_are_unique() {
        let a = Admin::new(AdminConfig::default(), AdminDeps::default()).unwrap();
        let b = Admin::new(AdminConfig::default(), AdminDeps::default()).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_register_module_records_id_and_rejects_duplicates() {
        let mut admin = Admin::new(AdminConfig::default(), AdminDeps::default()).unwrap();
        admin.register_module(&PagesModule).unwrap();
        assert_eq!(admin.modules(), ["pages"]);
        assert!(admin.routes().contains("admin.pages"));
        assert!(admin.registry().has_panel("pages"));

        let err = admin.register_module(&PagesModule).unwrap_err();
        assert!(err.to_string().contains("already registered"));
    }

    #[tokio::test]
    async fn test_doctor_checks_first_registration_wins() {
        let mut admin = Admin::new(AdminConfig::default(), AdminDeps::default()).unwrap();
        admin.register_doctor_checks([
            Arc::new(NamedCheck("custom.one", "first")) as Arc<dyn DoctorCheck>,
            Arc::new(NamedCheck(" Custom.One ", "second")),
            Arc::new(NamedCheck("custom.two", "third")),
        ]);

        let results = admin.run_doctor().await;
        let labels: Vec<_> = results.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["first", "third"]);
    }

    #[test]
    fn test_registry_typed_bindings() {
        let mut registry = Registry::default();
        registry.bind("answer", Arc::new(42u32));
        assert_eq!(registry.binding::<u32>("answer").as_deref(), Some(&42));
        assert!(registry.binding::<String>("answer").is_none());
        assert!(registry.binding::<u32>("missing").is_none());
        assert!(registry.register_permission(Permission::new("x", "")));
        assert!(!registry.register_permission(Permission::new("x", "again")));
    }

    #[test]
    fn test_init_hooks_run_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut admin = Admin::new(AdminConfig::default(), AdminDeps::default()).unwrap();
        let counter = Arc::clone(&calls);
        admin.add_init_hook(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }));

        admin.initialize().unwrap();
        admin.initialize().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(admin.is_initialized());
    }

    #[test]
    fn test_capability_snapshot_defaults_to_zero_profile() {
        let admin = Admin::new(AdminConfig::default(), AdminDeps::default()).unwrap();
        let snapshot = admin.capability_snapshot();
        assert_eq!(snapshot.profile, "none");
        assert!(snapshot.features.cms);
    }

    #[test]
    fn test_invalid_locale_rejected() {
        let cfg = AdminConfig {
            default_locale: "en US".into(),
            ..Default::default()
        };
        assert!(Admin::new(cfg, AdminDeps::default()).is_err());
    }
}
