//! Nested tree node envelope
//!
//! `Node<T>` wraps an arbitrary record with its children instead of
//! injecting a children field into the record shape.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A record plus its ordered children.
///
/// Serializes flat: the record's own fields followed by `children`
/// (omitted when empty).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node<T> {
    /// The source record, shallow-copied from the flat input
    #[serde(flatten)]
    pub base: T,
    /// Child nodes in input order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node<T>>,
}

impl<T> Node<T> {
    pub fn new(base: T) -> Self {
        Self {
            base,
            children: Vec::new(),
        }
    }

    pub fn with_children(base: T, children: Vec<Node<T>>) -> Self {
        Self { base, children }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, self included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }

    /// Depth of this subtree; a leaf has depth 1.
    #[instrument(level = "trace", skip(self))]
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(Node::depth)
            .max()
            .unwrap_or(0)
    }

    /// Records of all leaf nodes, left to right.
    pub fn leaf_nodes(&self) -> Vec<&T> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a T>) {
        if self.children.is_empty() {
            leaves.push(&self.base);
        } else {
            for child in &self.children {
                child.collect_leaves(leaves);
            }
        }
    }

    /// Pre-order iterator over this subtree.
    pub fn iter(&self) -> PreOrder<'_, T> {
        PreOrder::new(std::slice::from_ref(self))
    }
}

/// Pre-order traversal over a forest (node before descendants, siblings left to right).
pub struct PreOrder<'a, T> {
    stack: Vec<(&'a Node<T>, usize)>,
}

impl<'a, T> PreOrder<'a, T> {
    pub fn new(forest: &'a [Node<T>]) -> Self {
        Self {
            stack: forest.iter().rev().map(|n| (n, 1)).collect(),
        }
    }

    /// Variant yielding each node together with its depth (roots at 1).
    pub fn with_depth(self) -> PreOrderWithDepth<'a, T> {
        PreOrderWithDepth { inner: self }
    }

    fn next_entry(&mut self) -> Option<(&'a Node<T>, usize)> {
        let (node, depth) = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        for child in node.children.iter().rev() {
            self.stack.push((child, depth + 1));
        }
        Some((node, depth))
    }
}

impl<'a, T> Iterator for PreOrder<'a, T> {
    type Item = &'a Node<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_entry().map(|(node, _)| node)
    }
}

pub struct PreOrderWithDepth<'a, T> {
    inner: PreOrder<'a, T>,
}

impl<'a, T> Iterator for PreOrderWithDepth<'a, T> {
    type Item = (&'a Node<T>, usize);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next_entry()
    }
}
