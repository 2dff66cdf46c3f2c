//! Content types consumed by doctor checks

use serde::{Deserialize, Serialize};

/// A block definition as reported by the content service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockDefinition {
    pub id: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub block_type: String,
}

impl BlockDefinition {
    pub fn new(id: impl Into<String>, slug: impl Into<String>, block_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            slug: slug.into(),
            block_type: block_type.into(),
        }
    }

    /// Lowercased `id`/`slug`/`type` plus their `-`/`_` swapped variants
    pub fn aliases(&self) -> Vec<String> {
        let mut out = Vec::new();
        for raw in [&self.id, &self.slug, &self.block_type] {
            let key = raw.trim().to_lowercase();
            if key.is_empty() {
                continue;
            }
            for alias in [key.replace('-', "_"), key.replace('_', "-"), key] {
                if !out.contains(&alias) {
                    out.push(alias);
                }
            }
        }
        out
    }
}
