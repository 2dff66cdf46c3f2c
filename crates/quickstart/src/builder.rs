//! Admin bootstrap orchestration
//!
//! [`AdminBuilder`] collects options, then [`AdminBuilder::build`] runs the
//! bootstrap in a fixed order:
//!
//! 1. option errors collected by the setters
//! 2. translation product resolution
//! 3. persistent CMS selection
//! 4. effective feature defaults and debug panels
//! 5. admin construction
//! 6. activity sink and options store integrations
//! 7. module ordering, navigation seeding and registration
//! 8. translation exchange and queue wiring
//! 9. workflow config validation and registration
//! 10. doctor checks
//! 11. capability snapshot publication

use crate::adapters::{apply_adapter_integrations, resolve_adapters, AdapterHooks};
use crate::debug::{apply_debug_panels, DebugOptions, DebugPanelCatalog, PanelRegistrar};
use crate::error::BootstrapError;
use crate::features::effective_feature_defaults;
use crate::users::{install_user_management, UserManagementConfig};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use quickstart_core::admin::AdminSettings;
use quickstart_core::config::{PdfExportSettings, SecureLinkSettings, FEATURE_CMS};
use quickstart_core::env::{resolve_adapter_flags, EnvSource, ProcessEnv};
use quickstart_core::ports::{FeatureGate, UrlResolver, WorkflowEngine};
use quickstart_core::{
    AdapterResult, Admin, AdminConfig, AdminDeps, AdminModule, CapabilityStore, DoctorCheck,
};
use quickstart_modules::{register_modules, NavigationOptions};
use quickstart_translation::{
    build_capability_snapshot, install_translation_product, resolve_translation_product,
    validate_policy_catalog, validate_translation_runtime, PolicyCatalog,
    TranslationExchangeConfig, TranslationPolicy, TranslationPolicyConfig,
    TranslationProductConfig, TranslationProductOptions, TranslationQueueConfig,
};
use quickstart_workflow::{
    load_workflow_config_file, merge_workflow_configs, normalize_workflow_config,
    register_workflows, validate_workflow_config, workflow_definitions_from_config,
    WorkflowConfig,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Registry binding holding the [`TranslationPolicy`]
pub const BINDING_TRANSLATION_POLICY: &str = "translation.policy";

/// Collects bootstrap options and assembles an [`Admin`]
///
/// Setters taking an `Option` ignore `None`. Setters that can fail record
/// the error, and [`build`](Self::build) reports the first one.
pub struct AdminBuilder {
    config: AdminConfig,
    hooks: AdapterHooks,
    env: Arc<dyn EnvSource>,
    feature_gate: Option<Arc<dyn FeatureGate>>,
    feature_defaults: BTreeMap<String, bool>,
    workflow_engine: Option<Arc<dyn WorkflowEngine>>,
    url_resolver: Option<Arc<dyn UrlResolver>>,
    capabilities: Option<Arc<CapabilityStore>>,
    modules: Vec<Arc<dyn AdminModule>>,
    navigation: Option<NavigationOptions>,
    workflows: Option<WorkflowConfig>,
    workflow_file: Option<Utf8PathBuf>,
    translation: TranslationProductOptions,
    policy: Option<TranslationPolicyConfig>,
    debug: DebugOptions,
    debug_panels: DebugPanelCatalog,
    doctor_checks: Vec<Arc<dyn DoctorCheck>>,
    user_management: Option<UserManagementConfig>,
    errors: Vec<anyhow::Error>,
}

impl AdminBuilder {
    pub fn new(config: AdminConfig) -> Self {
        Self {
            config,
            hooks: AdapterHooks::default(),
            env: Arc::new(ProcessEnv),
            feature_gate: None,
            feature_defaults: BTreeMap::new(),
            workflow_engine: None,
            url_resolver: None,
            capabilities: None,
            modules: Vec::new(),
            navigation: None,
            workflows: None,
            workflow_file: None,
            translation: TranslationProductOptions::default(),
            policy: None,
            debug: DebugOptions::default(),
            debug_panels: DebugPanelCatalog::default(),
            doctor_checks: Vec::new(),
            user_management: None,
            errors: Vec::new(),
        }
    }

    pub fn with_hooks(mut self, hooks: AdapterHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Environment read for adapter flags, settings and debug overrides
    pub fn with_env(mut self, env: Arc<dyn EnvSource>) -> Self {
        self.env = env;
        self
    }

    pub fn with_feature_gate(mut self, gate: Option<Arc<dyn FeatureGate>>) -> Self {
        if let Some(gate) = gate {
            self.feature_gate = Some(gate);
        }
        self
    }

    pub fn with_feature_default(mut self, key: &str, enabled: bool) -> Self {
        let key = key.trim();
        if !key.is_empty() {
            self.feature_defaults.insert(key.to_string(), enabled);
        }
        self
    }

    pub fn with_feature_defaults<I, K>(self, defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, bool)>,
        K: AsRef<str>,
    {
        defaults
            .into_iter()
            .fold(self, |b, (key, enabled)| b.with_feature_default(key.as_ref(), enabled))
    }

    pub fn with_workflow_engine(mut self, engine: Option<Arc<dyn WorkflowEngine>>) -> Self {
        if let Some(engine) = engine {
            self.workflow_engine = Some(engine);
        }
        self
    }

    pub fn with_url_resolver(mut self, resolver: Option<Arc<dyn UrlResolver>>) -> Self {
        if let Some(resolver) = resolver {
            self.url_resolver = Some(resolver);
        }
        self
    }

    /// Share a capability store between admin instances
    pub fn with_capability_store(mut self, store: Arc<CapabilityStore>) -> Self {
        self.capabilities = Some(store);
        self
    }

    pub fn with_module(mut self, module: Arc<dyn AdminModule>) -> Self {
        self.modules.push(module);
        self
    }

    pub fn with_modules<I>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn AdminModule>>,
    {
        self.modules.extend(modules);
        self
    }

    /// Navigation options; options without an env read the builder's env
    pub fn with_navigation(mut self, navigation: NavigationOptions) -> Self {
        self.navigation = Some(navigation);
        self
    }

    pub fn with_workflow_config(mut self, cfg: Option<WorkflowConfig>) -> Self {
        if let Some(cfg) = cfg {
            self.workflows = Some(cfg);
        }
        self
    }

    /// Workflow file merged over the inline config; read during `build`
    pub fn with_workflow_file(mut self, path: impl AsRef<Utf8Path>) -> Self {
        self.workflow_file = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_translation_product(mut self, product: Option<TranslationProductConfig>) -> Self {
        if let Some(product) = product {
            self.translation.product = Some(product);
        }
        self
    }

    /// Per-module exchange config; replaces the profile's exchange settings
    pub fn with_translation_exchange(mut self, cfg: Option<TranslationExchangeConfig>) -> Self {
        if let Some(cfg) = cfg {
            self.translation.legacy_exchange = Some(cfg);
        }
        self
    }

    /// Per-module queue config; replaces the profile's queue settings
    pub fn with_translation_queue(mut self, cfg: Option<TranslationQueueConfig>) -> Self {
        if let Some(cfg) = cfg {
            self.translation.legacy_queue = Some(cfg);
        }
        self
    }

    pub fn with_translation_policy(mut self, policy: Option<TranslationPolicyConfig>) -> Self {
        if let Some(policy) = policy {
            self.policy = Some(policy);
        }
        self
    }

    pub fn with_translation_policy_file(mut self, path: impl AsRef<Utf8Path>) -> Self {
        let path = path.as_ref();
        match TranslationPolicyConfig::load(path) {
            Ok(policy) => self.policy = Some(policy),
            Err(err) => self
                .errors
                .push(anyhow::Error::new(err).context(format!("load translation policy {path}"))),
        }
        self
    }

    pub fn with_debug_options(mut self, options: DebugOptions) -> Self {
        self.debug = options;
        self
    }

    /// Add or replace the registrar of a debug panel
    pub fn with_debug_panel(mut self, id: &str, registrar: PanelRegistrar) -> Self {
        self.debug_panels = self.debug_panels.with(id, registrar);
        self
    }

    /// Extra doctor check, run after the built-in ones
    pub fn with_doctor_check(mut self, check: Arc<dyn DoctorCheck>) -> Self {
        self.doctor_checks.push(check);
        self
    }

    pub fn with_user_management(mut self, cfg: Option<UserManagementConfig>) -> Self {
        let Some(cfg) = cfg else {
            return self;
        };
        if let Err(err) = cfg.validate() {
            self.errors.push(err.into());
        }
        self.user_management = Some(cfg);
        self
    }

    /// Run the bootstrap
    ///
    /// On failure the returned error still carries the adapter trace
    /// resolved so far.
    pub async fn build(self) -> Result<Admin, BootstrapError> {
        let Self {
            config,
            hooks,
            env,
            feature_gate,
            feature_defaults,
            workflow_engine,
            url_resolver,
            capabilities,
            modules,
            navigation,
            workflows,
            workflow_file,
            translation,
            policy,
            debug: debug_options,
            debug_panels,
            doctor_checks,
            user_management,
            errors,
        } = self;
        let config = config.normalized();

        let flags = resolve_adapter_flags(env.as_ref());
        let mut adapters = AdapterResult::new(flags);
        let fail = |adapters: &AdapterResult, err: anyhow::Error| {
            BootstrapError::new(adapters.clone(), err)
        };

        let mut errors = errors.into_iter();
        if let Some(first) = errors.next() {
            for other in errors {
                warn!("Additional bootstrap option error: {:#}", other);
            }
            return Err(fail(&adapters, first.context("invalid admin options")));
        }

        let cms_enabled = effective_feature_defaults(&config, None, &feature_defaults)
            .get(FEATURE_CMS)
            .copied()
            .unwrap_or(false);
        let resolved = resolve_translation_product(&translation, cms_enabled, policy.as_ref())
            .context("resolve translation product")
            .map_err(|err| fail(&adapters, err))?;

        let (mut config, resolved_adapters) = resolve_adapters(config, &hooks, flags).await;
        adapters = resolved_adapters;

        apply_debug_panels(&mut config.debug, &debug_options, env.as_ref());
        let defaults = effective_feature_defaults(&config, Some(&resolved), &feature_defaults);

        let deps = AdminDeps {
            feature_gate,
            feature_defaults: defaults,
            workflow: workflow_engine,
            url_resolver,
            capabilities,
            settings: AdminSettings {
                secure_link: SecureLinkSettings::from_env(env.as_ref()),
                pdf_export: PdfExportSettings::from_env(env.as_ref()),
            },
        };
        let mut admin = Admin::new(config, deps)
            .context("construct admin")
            .map_err(|err| fail(&adapters, err))?;

        apply_adapter_integrations(&mut admin, &hooks, &mut adapters).await;
        if let Some(cfg) = &user_management {
            install_user_management(&mut admin, cfg)
                .context("install user management")
                .map_err(|err| fail(&adapters, err))?;
        }

        let mut navigation = navigation.unwrap_or_default();
        if navigation.env.is_none() {
            navigation.env = Some(env.clone());
        }
        let summary = register_modules(&mut admin, modules, navigation)
            .await
            .map_err(|err| fail(&adapters, err))?;
        debug!("registered modules: {}", summary.order.join(", "));

        install_translation_product(&mut admin, &resolved)
            .context("wire translation modules")
            .map_err(|err| fail(&adapters, err))?;
        if let Some(policy) = &policy {
            let bound = TranslationPolicy::from_cms(policy.clone(), admin.cms().as_ref());
            admin
                .registry_mut()
                .bind(BINDING_TRANSLATION_POLICY, Arc::new(bound));
        }

        let debug_config = admin.config().debug.clone();
        debug_panels
            .register(&mut admin, &debug_config)
            .map_err(|err| fail(&adapters, err))?;

        register_workflow_config(&mut admin, workflows, workflow_file, policy.as_ref())
            .map_err(|err| fail(&adapters, err))?;

        quickstart_doctor::register_checks(&mut admin, doctor_checks);

        let snapshot = build_capability_snapshot(&admin, Some(&resolved));
        validate_translation_runtime(&admin, &resolved, &snapshot)
            .context("validate translation wiring")
            .map_err(|err| fail(&adapters, err))?;
        admin.publish_capabilities(snapshot);

        info!(
            "Admin ready at {} (translation profile {}, cms: {})",
            admin.base_path(),
            resolved.profile,
            adapters.cms_backend
        );
        Ok(admin)
    }
}

/// Merge, validate and register workflows, then check the translation
/// policy against them
fn register_workflow_config(
    admin: &mut Admin,
    inline: Option<WorkflowConfig>,
    file: Option<Utf8PathBuf>,
    policy: Option<&TranslationPolicyConfig>,
) -> anyhow::Result<()> {
    let mut cfg = inline.unwrap_or_default();
    if let Some(path) = file {
        let from_file = load_workflow_config_file(&path)
            .with_context(|| format!("load workflow config {path}"))?;
        cfg = merge_workflow_configs(cfg, from_file);
    }
    let cfg = normalize_workflow_config(cfg);
    validate_workflow_config(&cfg)?;
    if cfg.is_empty() {
        debug!("no workflow config");
        return Ok(());
    }

    let engine = admin.workflow_engine().cloned();
    let registration = register_workflows(engine.as_deref(), &cfg)?;
    info!("Registered {} workflow(s)", registration.registered.len());
    admin.set_workflow_trait_defaults(registration.trait_defaults);

    if let Some(policy) = policy {
        let definitions = workflow_definitions_from_config(&cfg);
        if !definitions.is_empty() {
            validate_policy_catalog(policy, &PolicyCatalog::from_workflows(&definitions))
                .context("validate translation policy against workflows")?;
        }
    }
    Ok(())
}
