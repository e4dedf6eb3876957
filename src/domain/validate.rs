//! Opt-in hierarchy validation
//!
//! The builder resolves duplicates, orphans and cycles silently. This pass
//! reports them instead, without changing what the builder produces.

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::key::{is_root_reference, NodeKey, TreeRecord};

/// One finding about a flat record list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    #[error("duplicate identifier '{id}'")]
    DuplicateId { id: String },

    #[error("record '{id}' references unknown parent '{parent}'")]
    UnmatchedParent { id: String, parent: String },

    #[error("cycle in parent chain: {}", .ids.join(" -> "))]
    Cycle { ids: Vec<String> },
}

impl Diagnostic {
    /// Duplicates and cycles lose or repeat records; orphans are only promoted to roots.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Diagnostic::UnmatchedParent { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn has_fatal(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_fatal)
    }

    pub fn fatal(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_fatal())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_fatal())
    }

    /// Fail with the fatal diagnostics, if any.
    pub fn into_result(self) -> DomainResult<Self> {
        if self.has_fatal() {
            let diagnostics = self.fatal().cloned().collect();
            return Err(DomainError::InvalidHierarchy { diagnostics });
        }
        Ok(self)
    }
}

/// Validate records implementing [`TreeRecord`].
pub fn validate_records<T: TreeRecord>(list: &[T]) -> ValidationReport {
    validate_by(list, T::key, T::parent_key)
}

/// Validate a flat list using accessor functions.
///
/// Reports, in this order: duplicate identifiers, unmatched parents, cycles.
#[instrument(level = "debug", skip_all, fields(records = list.len()))]
pub fn validate_by<T, K, FI, FP>(list: &[T], id: FI, pid: FP) -> ValidationReport
where
    K: NodeKey,
    FI: Fn(&T) -> K,
    FP: Fn(&T) -> Option<K>,
{
    let mut diagnostics = Vec::new();

    // Duplicates; the last occurrence is the one the builder keeps
    let mut table: HashMap<K, usize> = HashMap::with_capacity(list.len());
    let mut reported = HashSet::new();
    for (pos, record) in list.iter().enumerate() {
        let key = id(record);
        if table.insert(key.clone(), pos).is_some() && reported.insert(key.clone()) {
            diagnostics.push(Diagnostic::DuplicateId {
                id: key.to_string(),
            });
        }
    }

    // Resolved parent links of the winning records
    let mut parents: HashMap<K, K> = HashMap::with_capacity(table.len());
    for (pos, record) in list.iter().enumerate() {
        let key = id(record);
        let parent = pid(record);
        if is_root_reference(parent.as_ref()) {
            continue;
        }
        let Some(parent) = parent else { continue };
        if !table.contains_key(&parent) {
            diagnostics.push(Diagnostic::UnmatchedParent {
                id: key.to_string(),
                parent: parent.to_string(),
            });
        } else if table.get(&key) == Some(&pos) {
            parents.insert(key, parent);
        }
    }

    diagnostics.extend(find_cycles(list, &id, &parents));
    debug!("validation found {} diagnostics", diagnostics.len());
    ValidationReport { diagnostics }
}

/// Walk every parent chain once; a chain that re-enters itself is a cycle.
fn find_cycles<T, K, FI>(list: &[T], id: &FI, parents: &HashMap<K, K>) -> Vec<Diagnostic>
where
    K: NodeKey,
    FI: Fn(&T) -> K,
{
    let mut done: HashSet<K> = HashSet::new();
    let mut cycles = Vec::new();

    for record in list {
        let start = id(record);
        if done.contains(&start) {
            continue;
        }
        let mut path: Vec<K> = Vec::new();
        let mut positions: HashMap<K, usize> = HashMap::new();
        let mut current = Some(start);

        while let Some(key) = current {
            if done.contains(&key) {
                break;
            }
            if let Some(&pos) = positions.get(&key) {
                cycles.push(Diagnostic::Cycle {
                    ids: path[pos..].iter().map(ToString::to_string).collect(),
                });
                break;
            }
            positions.insert(key.clone(), path.len());
            path.push(key.clone());
            current = parents.get(&key).cloned();
        }
        done.extend(path);
    }
    cycles
}
