//! Feature-gate scopes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Level at which a feature override applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    System,
    Tenant,
    Org,
    User,
}

/// A single scope such as `tenant:acme`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Scope {
    pub kind: ScopeKind,
    pub id: String,
}

impl Scope {
    pub fn system() -> Self {
        Self {
            kind: ScopeKind::System,
            id: String::new(),
        }
    }

    pub fn new(kind: ScopeKind, id: impl Into<String>) -> Self {
        Self { kind, id: id.into() }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ScopeKind::System => "system",
            ScopeKind::Tenant => "tenant",
            ScopeKind::Org => "org",
            ScopeKind::User => "user",
        };
        if self.id.is_empty() {
            f.write_str(kind)
        } else {
            write!(f, "{kind}:{}", self.id)
        }
    }
}

/// Ordered scopes, most specific first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeChain(pub Vec<Scope>);

impl ScopeChain {
    /// Chain containing only the system scope
    pub fn system() -> Self {
        Self(vec![Scope::system()])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scope> {
        self.0.iter()
    }
}
