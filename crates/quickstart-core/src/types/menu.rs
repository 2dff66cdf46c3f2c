//! Navigation menu types

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Menu node kinds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuItemType {
    Group,
    #[default]
    Item,
}

/// A node in a navigation tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuItem {
    /// Stable ID, unique per menu code
    pub id: String,

    #[serde(rename = "type")]
    pub item_type: MenuItemType,

    /// Parent ID; empty means a root of `menu`
    pub parent_id: String,

    /// Menu code this item belongs to
    pub menu: String,

    pub label: String,

    /// Translation key for the label
    pub label_key: String,

    /// Route target (`url`, `key`, `name`, ...)
    pub target: BTreeMap<String, serde_json::Value>,

    /// Sort position among siblings
    pub position: i32,

    pub collapsible: bool,
    pub collapsed: bool,
    pub permissions: Vec<String>,
    pub locale: String,
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    /// Create a plain item
    pub fn item(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            ..Default::default()
        }
    }

    /// Create a group node
    pub fn group(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            item_type: MenuItemType::Group,
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = parent_id.into();
        self
    }

    pub fn with_label_key(mut self, key: impl Into<String>) -> Self {
        self.label_key = key.into();
        self
    }

    pub fn with_position(mut self, position: i32) -> Self {
        self.position = position;
        self
    }

    pub fn with_target(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.target.insert(key.into(), value.into());
        self
    }

    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    pub fn collapsible(mut self, collapsed: bool) -> Self {
        self.collapsible = true;
        self.collapsed = collapsed;
        self
    }

    /// `target.key` when it is a non-blank string
    pub fn target_key(&self) -> Option<&str> {
        self.target
            .get("key")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

/// A menu tree as returned by a menu service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Menu {
    pub code: String,
    pub locale: String,
    pub items: Vec<MenuItem>,
}

impl Menu {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Default::default()
        }
    }

    /// Every ID in the tree, children included
    pub fn item_ids(&self) -> HashSet<String> {
        fn walk(items: &[MenuItem], out: &mut HashSet<String>) {
            for item in items {
                if !item.id.is_empty() {
                    out.insert(item.id.clone());
                }
                walk(&item.children, out);
            }
        }

        let mut ids = HashSet::new();
        walk(&self.items, &mut ids);
        ids
    }

    /// Find an item anywhere in the tree
    pub fn find(&self, id: &str) -> Option<&MenuItem> {
        fn walk<'a>(items: &'a [MenuItem], id: &str) -> Option<&'a MenuItem> {
            for item in items {
                if item.id == id {
                    return Some(item);
                }
                if let Some(found) = walk(&item.children, id) {
                    return Some(found);
                }
            }
            None
        }
        walk(&self.items, id)
    }
}

/// Drop items whose ID was already seen (first occurrence wins)
///
/// Items with an empty ID always pass through.
pub fn dedupe_menu_items(items: Vec<MenuItem>) -> Vec<MenuItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| item.id.is_empty() || seen.insert(item.id.clone()))
        .collect()
}
