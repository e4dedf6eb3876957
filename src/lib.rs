//! listtree: flat parent-pointer records to nested trees and back.
//!
//! Layering follows the dependency direction:
//! - [`domain`]: pure tree construction and traversal
//! - [`application`]: services loading records and applying settings
//! - [`infrastructure`]: I/O boundary traits and service wiring
//! - [`cli`]: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::json;
pub use domain::{
    collect_expanded_keys, collect_expanded_keys_by, flatten_tree, list_to_tree, list_to_tree_by,
    sort_tree, Diagnostic, FieldConfig, Node, NodeKey, PartialFieldConfig, TreeRecord,
    ValidationReport,
};
