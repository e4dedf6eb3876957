//! Tree builder: flat parent-pointer records to a nested forest.

use std::collections::HashMap;

use tracing::{debug, instrument, trace};

use crate::domain::arena::TreeArena;
use crate::domain::error::DomainResult;
use crate::domain::key::{is_root_reference, NodeKey, TreeRecord};
use crate::domain::node::Node;
use crate::domain::validate::validate_by;

/// Build a forest from records implementing [`TreeRecord`].
pub fn list_to_tree<T>(list: &[T]) -> Vec<Node<T>>
where
    T: TreeRecord + Clone,
{
    list_to_tree_by(list, T::key, T::parent_key)
}

/// Build a forest using accessor functions for identifier and parent identifier.
///
/// - Identifiers are looked up last-write-wins.
/// - A record is a root when its parent is absent, the root sentinel, or not
///   an identifier of any input record.
/// - Sibling order follows input order.
///
/// Each output node owns a clone of its source record; `list` is untouched.
#[instrument(level = "debug", skip_all, fields(records = list.len()))]
pub fn list_to_tree_by<T, K, FI, FP>(list: &[T], id: FI, pid: FP) -> Vec<Node<T>>
where
    T: Clone,
    K: NodeKey,
    FI: Fn(&T) -> K,
    FP: Fn(&T) -> Option<K>,
{
    // Last occurrence of each identifier wins the lookup table
    let mut winners: HashMap<K, usize> = HashMap::with_capacity(list.len());
    for (pos, record) in list.iter().enumerate() {
        winners.insert(id(record), pos);
    }

    let mut arena = TreeArena::with_capacity(winners.len());
    let mut table = HashMap::with_capacity(winners.len());
    for (pos, record) in list.iter().enumerate() {
        let key = id(record);
        if winners.get(&key) == Some(&pos) {
            table.insert(key, arena.insert(record.clone()));
        }
    }

    for record in list {
        let key = id(record);
        let Some(&node_idx) = table.get(&key) else {
            continue;
        };
        let parent = pid(record);
        let parent_idx = if is_root_reference(parent.as_ref()) {
            None
        } else {
            parent.as_ref().and_then(|p| table.get(p)).copied()
        };
        match parent_idx {
            Some(parent_idx) => {
                trace!("attach {} under {:?}", key, parent);
                arena.attach(parent_idx, node_idx);
            }
            None => arena.push_root(node_idx),
        }
    }

    debug!(
        "built arena with {} nodes, {} roots",
        arena.len(),
        arena.roots().len()
    );
    arena.into_forest()
}

/// Strict variant: validate first, fail on duplicate identifiers or cycles.
///
/// Unmatched parents are accepted and promoted to roots as usual.
pub fn try_list_to_tree_by<T, K, FI, FP>(list: &[T], id: FI, pid: FP) -> DomainResult<Vec<Node<T>>>
where
    T: Clone,
    K: NodeKey,
    FI: Fn(&T) -> K,
    FP: Fn(&T) -> Option<K>,
{
    validate_by(list, &id, &pid).into_result()?;
    Ok(list_to_tree_by(list, id, pid))
}

pub fn try_list_to_tree<T>(list: &[T]) -> DomainResult<Vec<Node<T>>>
where
    T: TreeRecord + Clone,
{
    try_list_to_tree_by(list, T::key, T::parent_key)
}
