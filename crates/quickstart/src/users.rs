//! User-management adapter configuration

use async_trait::async_trait;
use quickstart_core::{Admin, Error, Result};
use std::fmt;
use std::sync::Arc;

pub const BINDING_USERS: &str = "users.repository";
pub const BINDING_ROLES: &str = "users.roles";

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Label of the storage backend
    fn backend(&self) -> &str;

    async fn count(&self) -> anyhow::Result<usize>;
}

#[async_trait]
pub trait RoleRepository: Send + Sync {
    fn backend(&self) -> &str;

    async fn role_names(&self) -> anyhow::Result<Vec<String>>;
}

/// Repositories behind the users screens
#[derive(Clone, Default)]
pub struct UserManagementConfig {
    pub enabled: bool,
    pub users: Option<Arc<dyn UserRepository>>,
    pub roles: Option<Arc<dyn RoleRepository>>,
}

impl fmt::Debug for UserManagementConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserManagementConfig")
            .field("enabled", &self.enabled)
            .field("users", &self.users.as_ref().map(|u| u.backend().to_string()))
            .field("roles", &self.roles.as_ref().map(|r| r.backend().to_string()))
            .finish()
    }
}

impl UserManagementConfig {
    pub fn new(users: Arc<dyn UserRepository>, roles: Arc<dyn RoleRepository>) -> Self {
        Self {
            enabled: true,
            users: Some(users),
            roles: Some(roles),
        }
    }

    /// Both repositories are required once enabled
    pub fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        let missing: Vec<&str> = [
            ("users", self.users.is_none()),
            ("roles", self.roles.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();
        if missing.is_empty() {
            return Ok(());
        }
        Err(Error::user_management(format!(
            "user management is enabled but missing repositories: {}",
            missing.join(", ")
        )))
    }
}

/// Bind the repositories on the admin registry
pub fn install_user_management(admin: &mut Admin, cfg: &UserManagementConfig) -> Result<()> {
    cfg.validate()?;
    let (true, Some(users), Some(roles)) = (cfg.enabled, cfg.users.clone(), cfg.roles.clone())
    else {
        return Ok(());
    };
    tracing::info!(
        "Using user repositories: users={}, roles={}",
        users.backend(),
        roles.backend()
    );
    let registry = admin.registry_mut();
    registry.bind(BINDING_USERS, Arc::new(users));
    registry.bind(BINDING_ROLES, Arc::new(roles));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickstart_core::ErrorKind;

    struct Users;

    #[async_trait]
    impl UserRepository for Users {
        fn backend(&self) -> &str {
            "memory users"
        }

        async fn count(&self) -> anyhow::Result<usize> {
            Ok(0)
        }
    }

    #[test]
    fn test_disabled_config_is_valid() {
        assert!(UserManagementConfig::default().validate().is_ok());
    }

    #[test]
    fn test_missing_roles_is_rejected() {
        let cfg = UserManagementConfig {
            enabled: true,
            users: Some(Arc::new(Users)),
            roles: None,
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.is(ErrorKind::UserManagementConfig));
        assert!(err.to_string().contains("roles"));
        assert!(!err.to_string().contains("users,"));
    }
}
