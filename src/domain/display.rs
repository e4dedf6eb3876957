/*
Rendering nested nodes as termtree::Tree values.

Tree<String> is foreign, so the conversion lives in a trait implemented for
our node type; forests render as one Tree per root.
 */
use std::fmt;

use itertools::Itertools;
use termtree::Tree;
use tracing::instrument;

use crate::domain::node::Node;

pub trait TreeDisplay {
    fn to_tree_string(&self) -> Tree<String>;
}

impl<T: fmt::Display> TreeDisplay for Node<T> {
    fn to_tree_string(&self) -> Tree<String> {
        to_tree_with(self, &|record: &T| record.to_string())
    }
}

/// Convert a node using a labelling function for each record.
pub fn to_tree_with<T, F>(node: &Node<T>, label: &F) -> Tree<String>
where
    F: Fn(&T) -> String,
{
    // Recursively construct the children
    let leaves: Vec<_> = node
        .children
        .iter()
        .map(|c| to_tree_with(c, label))
        .collect();

    Tree::new(label(&node.base)).with_leaves(leaves)
}

/// Render a whole forest, one tree per root, separated by newlines.
#[instrument(level = "debug", skip_all, fields(roots = forest.len()))]
pub fn render_forest<T, F>(forest: &[Node<T>], label: F) -> String
where
    F: Fn(&T) -> String,
{
    forest
        .iter()
        .map(|root| to_tree_with(root, &label))
        .join("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_nested_node_when_rendering_then_draws_branches() {
        let tree = Node::with_children(
            "root",
            vec![
                Node::with_children("child1", vec![Node::new("grandchild1")]),
                Node::new("child2"),
            ],
        );
        let rendered = tree.to_tree_string().to_string();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines[0], "root");
        assert!(lines[1].ends_with("child1"));
        assert!(lines[2].ends_with("grandchild1"));
        assert!(lines[3].ends_with("child2"));
    }

    #[test]
    fn given_forest_when_rendering_then_one_tree_per_root() {
        let forest = vec![Node::new(1), Node::new(2)];
        let rendered = render_forest(&forest, |n| format!("dept {n}"));
        assert_eq!(rendered.lines().collect::<Vec<_>>(), vec!["dept 1", "dept 2"]);
    }
}
