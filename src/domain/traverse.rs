//! Forest traversals: flattening, expansion keys, level statistics.

use std::fmt;

use tracing::instrument;

use crate::domain::key::TreeRecord;
use crate::domain::node::{Node, PreOrder};

/// Every node of the forest in pre-order, children left intact.
pub fn flatten_tree<T>(forest: &[Node<T>]) -> Vec<&Node<T>> {
    PreOrder::new(forest).collect()
}

/// Consume the forest into its records, in pre-order.
pub fn flatten_into_records<T>(forest: Vec<Node<T>>) -> Vec<T> {
    let mut records = Vec::new();
    push_records(forest, &mut records);
    records
}

fn push_records<T>(nodes: Vec<Node<T>>, out: &mut Vec<T>) {
    for node in nodes {
        out.push(node.base);
        push_records(node.children, out);
    }
}

/// Identifiers of all nodes at depth `<= max_depth` (roots are depth 1), in pre-order.
///
/// Leaves count too: a key is emitted whether or not the node has children.
pub fn collect_expanded_keys<T>(forest: &[Node<T>], max_depth: i64) -> Vec<String>
where
    T: TreeRecord,
{
    collect_expanded_keys_by(forest, max_depth, T::key)
}

#[instrument(level = "debug", skip(forest, id))]
pub fn collect_expanded_keys_by<T, D, F>(forest: &[Node<T>], max_depth: i64, id: F) -> Vec<String>
where
    D: fmt::Display,
    F: Fn(&T) -> D,
{
    let mut keys = Vec::new();
    if max_depth < 1 {
        return keys;
    }
    walk_keys(forest, 1, max_depth, &id, &mut keys);
    keys
}

fn walk_keys<T, D, F>(nodes: &[Node<T>], depth: i64, max_depth: i64, id: &F, keys: &mut Vec<String>)
where
    D: fmt::Display,
    F: Fn(&T) -> D,
{
    for node in nodes {
        keys.push(id(&node.base).to_string());
        // Deeper levels cannot qualify
        if depth < max_depth {
            walk_keys(&node.children, depth + 1, max_depth, id, keys);
        }
    }
}

/// Node count per level: index 0 holds the number of roots.
pub fn depth_counts<T>(forest: &[Node<T>]) -> Vec<usize> {
    let mut counts: Vec<usize> = Vec::new();
    for (_, depth) in PreOrder::new(forest).with_depth() {
        if counts.len() < depth {
            counts.resize(depth, 0);
        }
        counts[depth - 1] += 1;
    }
    counts
}

pub fn forest_depth<T>(forest: &[Node<T>]) -> usize {
    forest.iter().map(Node::depth).max().unwrap_or(0)
}

pub fn count_nodes<T>(forest: &[Node<T>]) -> usize {
    forest.iter().map(Node::node_count).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1
    // ├── 2
    // │   └── 4
    // └── 3
    // 5
    fn forest() -> Vec<Node<u32>> {
        vec![
            Node::with_children(
                1,
                vec![Node::with_children(2, vec![Node::new(4)]), Node::new(3)],
            ),
            Node::new(5),
        ]
    }

    #[test]
    fn given_forest_when_flattening_then_pre_order_with_children_kept() {
        let forest = forest();
        let flat = flatten_tree(&forest);
        let order: Vec<_> = flat.iter().map(|n| n.base).collect();
        assert_eq!(order, vec![1, 2, 4, 3, 5]);
        assert_eq!(flat[0].children.len(), 2);
    }

    #[test]
    fn given_forest_when_flattening_into_records_then_pre_order() {
        assert_eq!(flatten_into_records(forest()), vec![1, 2, 4, 3, 5]);
    }

    #[test]
    fn given_depth_two_when_collecting_keys_then_excludes_third_level() {
        let keys = collect_expanded_keys_by(&forest(), 2, |n| *n);
        assert_eq!(keys, vec!["1", "2", "3", "5"]);
    }

    #[test]
    fn given_non_positive_depth_when_collecting_keys_then_empty() {
        assert!(collect_expanded_keys_by(&forest(), 0, |n| *n).is_empty());
        assert!(collect_expanded_keys_by(&forest(), -3, |n| *n).is_empty());
    }

    #[test]
    fn given_forest_when_counting_levels_then_matches_structure() {
        let forest = forest();
        assert_eq!(depth_counts(&forest), vec![2, 2, 1]);
        assert_eq!(forest_depth(&forest), 3);
        assert_eq!(count_nodes(&forest), 5);
    }

    #[test]
    fn given_empty_forest_when_measuring_then_zero() {
        let forest: Vec<Node<u32>> = Vec::new();
        assert!(depth_counts(&forest).is_empty());
        assert_eq!(forest_depth(&forest), 0);
        assert_eq!(count_nodes(&forest), 0);
    }
}
