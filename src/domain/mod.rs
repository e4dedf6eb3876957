//! Domain layer: tree construction and traversal
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod display;
pub mod error;
pub mod fields;
pub mod json;
pub mod key;
pub mod node;
pub mod sort;
pub mod traverse;
pub mod validate;

pub use arena::TreeArena;
pub use builder::{list_to_tree, list_to_tree_by, try_list_to_tree, try_list_to_tree_by};
pub use display::{render_forest, to_tree_with, TreeDisplay};
pub use error::{DomainError, DomainResult};
pub use fields::{FieldConfig, PartialFieldConfig};
pub use key::{NodeKey, TreeRecord};
pub use node::{Node, PreOrder};
pub use sort::{sort_tree, sort_tree_by_record};
pub use traverse::{
    collect_expanded_keys, collect_expanded_keys_by, count_nodes, depth_counts, flatten_into_records,
    flatten_tree, forest_depth,
};
pub use validate::{validate_by, validate_records, Diagnostic, ValidationReport};
