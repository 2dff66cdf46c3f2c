//! Module ordering using an iterative DFS topological sort

use quickstart_core::types::ModuleManifest;
use quickstart_core::AdminModule;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Why a module set cannot be ordered
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error("module missing ID")]
    MissingId,

    #[error("duplicate module ID {0}")]
    Duplicate(String),

    /// A dependency names a module that is not in the set
    #[error("module {0} not registered")]
    NotRegistered(String),

    #[error("module dependency cycle detected at {0}")]
    Cycle(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    OnStack,
    Visited,
}

/// Order manifests so every dependency precedes its dependents
///
/// Returns indexes into `manifests`. Independent modules keep their input
/// order.
pub fn order_manifests(manifests: &[ModuleManifest]) -> Result<Vec<usize>, OrderError> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(manifests.len());
    for (i, manifest) in manifests.iter().enumerate() {
        let id = manifest.id.trim();
        if id.is_empty() {
            return Err(OrderError::MissingId);
        }
        if index.insert(id, i).is_some() {
            return Err(OrderError::Duplicate(id.to_string()));
        }
    }

    let mut state = vec![VisitState::Unvisited; manifests.len()];
    let mut order = Vec::with_capacity(manifests.len());

    for root in 0..manifests.len() {
        if state[root] != VisitState::Unvisited {
            continue;
        }

        // (node, index of the next dependency to look at)
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        state[root] = VisitState::OnStack;

        while let Some(&(node, next)) = stack.last() {
            let deps = &manifests[node].dependencies;
            if next >= deps.len() {
                state[node] = VisitState::Visited;
                order.push(node);
                stack.pop();
                continue;
            }

            if let Some(top) = stack.last_mut() {
                top.1 += 1;
            }

            let dep_id = deps[next].trim();
            if dep_id.is_empty() {
                continue;
            }
            let Some(&dep) = index.get(dep_id) else {
                return Err(OrderError::NotRegistered(dep_id.to_string()));
            };

            match state[dep] {
                VisitState::Unvisited => {
                    state[dep] = VisitState::OnStack;
                    stack.push((dep, 0));
                }
                VisitState::OnStack => return Err(OrderError::Cycle(dep_id.to_string())),
                VisitState::Visited => {}
            }
        }
    }

    Ok(order)
}

/// Order modules dependency-first
pub fn order_modules(
    modules: Vec<Arc<dyn AdminModule>>,
) -> Result<Vec<Arc<dyn AdminModule>>, OrderError> {
    let manifests: Vec<ModuleManifest> = modules.iter().map(|m| m.manifest()).collect();
    let order = order_manifests(&manifests)?;

    let mut slots: Vec<Option<Arc<dyn AdminModule>>> = modules.into_iter().map(Some).collect();
    Ok(order
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect())
}
