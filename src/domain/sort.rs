use std::cmp::Ordering;

use tracing::instrument;

use crate::domain::node::Node;

/// Sort every level of the forest in place and hand the same forest back.
///
/// Stable: siblings comparing equal keep their relative order.
#[instrument(level = "debug", skip_all, fields(roots = forest.len()))]
pub fn sort_tree<T, F>(forest: &mut Vec<Node<T>>, mut compare: F) -> &mut Vec<Node<T>>
where
    F: FnMut(&Node<T>, &Node<T>) -> Ordering,
{
    sort_level(forest, &mut compare);
    forest
}

/// Sort by comparing records only.
pub fn sort_tree_by_record<T, F>(forest: &mut Vec<Node<T>>, mut compare: F) -> &mut Vec<Node<T>>
where
    F: FnMut(&T, &T) -> Ordering,
{
    sort_tree(forest, |a, b| compare(&a.base, &b.base))
}

fn sort_level<T, F>(nodes: &mut [Node<T>], compare: &mut F)
where
    F: FnMut(&Node<T>, &Node<T>) -> Ordering,
{
    nodes.sort_by(|a, b| compare(a, b));
    for node in nodes.iter_mut() {
        if !node.children.is_empty() {
            sort_level(&mut node.children, compare);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_unsorted_levels_when_sorting_then_every_level_is_ordered() {
        let mut forest = vec![
            Node::with_children(9, vec![Node::new(3), Node::new(1), Node::new(2)]),
            Node::with_children(4, vec![Node::with_children(8, vec![Node::new(7), Node::new(6)])]),
        ];

        let sorted = sort_tree_by_record(&mut forest, |a, b| a.cmp(b));

        assert_eq!(sorted[0].base, 4);
        assert_eq!(sorted[0].children[0].children[0].base, 6);
        let second: Vec<_> = sorted[1].children.iter().map(|n| n.base).collect();
        assert_eq!(second, vec![1, 2, 3]);
    }

    #[test]
    fn given_equal_keys_when_sorting_then_input_order_kept() {
        let mut forest = vec![Node::new((1, "b")), Node::new((0, "z")), Node::new((1, "a"))];
        sort_tree_by_record(&mut forest, |a, b| a.0.cmp(&b.0));
        let labels: Vec<_> = forest.iter().map(|n| n.base.1).collect();
        assert_eq!(labels, vec!["z", "b", "a"]);
    }

    #[test]
    fn given_node_comparator_when_sorting_then_can_use_children() {
        let mut forest = vec![
            Node::with_children("wide", vec![Node::new("x"), Node::new("y")]),
            Node::new("leaf"),
        ];
        sort_tree(&mut forest, |a, b| a.children.len().cmp(&b.children.len()));
        assert_eq!(forest[0].base, "leaf");
    }
}
