use std::collections::HashSet;

use generational_arena::{Arena, Index};
use tracing::{instrument, warn};

use crate::domain::node::Node;

/// Arena slot: one record and the indices of its children.
#[derive(Debug)]
struct Slot<T> {
    record: T,
    children: Vec<Index>,
}

/// Index-linked staging area for tree construction.
///
/// Links are plain indices, so the parent-pointer graph may contain cycles
/// or shared nodes while being assembled. [`TreeArena::into_forest`] turns the
/// links into owned [`Node`]s.
#[derive(Debug)]
pub struct TreeArena<T> {
    arena: Arena<Slot<T>>,
    roots: Vec<Index>,
}

impl<T> Default for TreeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TreeArena<T> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            roots: Vec::new(),
        }
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            arena: Arena::with_capacity(n),
            roots: Vec::new(),
        }
    }

    pub fn insert(&mut self, record: T) -> Index {
        self.arena.insert(Slot {
            record,
            children: Vec::new(),
        })
    }

    pub fn push_root(&mut self, idx: Index) {
        self.roots.push(idx);
    }

    /// Append `child` to the children of `parent`. Unknown parents are ignored.
    pub fn attach(&mut self, parent: Index, child: Index) {
        if let Some(slot) = self.arena.get_mut(parent) {
            slot.children.push(child);
        }
    }

    pub fn children(&self, idx: Index) -> &[Index] {
        self.arena
            .get(idx)
            .map(|slot| slot.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }
}

impl<T: Clone> TreeArena<T> {
    /// Materialize the forest reachable from the roots.
    ///
    /// A node reached twice along one root-to-leaf path closes a cycle; that
    /// back edge is dropped. A node linked from several places (duplicate
    /// identifiers) is copied at each place.
    #[instrument(level = "debug", skip(self), fields(nodes = self.arena.len()))]
    pub fn into_forest(self) -> Vec<Node<T>> {
        let mut on_path = HashSet::new();
        self.roots
            .iter()
            .filter_map(|&root| self.materialize(root, &mut on_path))
            .collect()
    }

    fn materialize(&self, idx: Index, on_path: &mut HashSet<Index>) -> Option<Node<T>> {
        let slot = self.arena.get(idx)?;
        if !on_path.insert(idx) {
            warn!("cycle in parent chain, dropping back edge to {:?}", idx);
            return None;
        }
        let children = slot
            .children
            .iter()
            .filter_map(|&child| self.materialize(child, on_path))
            .collect();
        on_path.remove(&idx);
        Some(Node::with_children(slot.record.clone(), children))
    }
}
