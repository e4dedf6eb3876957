//! String-keyed hierarchy operations over `serde_json::Value` records
//!
//! Field names come from a [`FieldConfig`] resolved against the defaults
//! `id` / `parentId` / `children`. Built nodes are shallow copies of the
//! input objects with the children field set to an array.

use std::cmp::Ordering;
use std::fmt;

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::domain::builder::{list_to_tree_by, try_list_to_tree_by};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::fields::{FieldConfig, PartialFieldConfig};
use crate::domain::key::NodeKey;
use crate::domain::node::Node;
use crate::domain::validate::{validate_by, ValidationReport};

/// Lookup key derived from a JSON field value.
///
/// Equality distinguishes types: number `1` and string `"1"` differ.
/// Integral floats normalize to their integer text, so `1` and `1.0` match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JsonKey {
    /// Field not present on the record
    Undefined,
    Null,
    Bool(bool),
    Number(String),
    String(String),
    /// Arrays and objects, keyed by their compact JSON text
    Composite(String),
}

impl JsonKey {
    pub fn from_field(record: &Value, field: &str) -> Self {
        match record.get(field) {
            Some(value) => Self::from(value),
            None => JsonKey::Undefined,
        }
    }
}

impl From<&Value> for JsonKey {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => JsonKey::Null,
            Value::Bool(b) => JsonKey::Bool(*b),
            Value::Number(n) => JsonKey::Number(number_text(n)),
            Value::String(s) => JsonKey::String(s.clone()),
            other => JsonKey::Composite(other.to_string()),
        }
    }
}

fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 && f.abs() < 9.007_199_254_740_992e15 => {
            // -0.0 prints as "0"
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

impl fmt::Display for JsonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonKey::Undefined => write!(f, "undefined"),
            JsonKey::Null => write!(f, "null"),
            JsonKey::Bool(b) => write!(f, "{b}"),
            JsonKey::Number(n) | JsonKey::String(n) | JsonKey::Composite(n) => write!(f, "{n}"),
        }
    }
}

impl NodeKey for JsonKey {
    fn is_root_sentinel(&self) -> bool {
        match self {
            JsonKey::Undefined | JsonKey::Null => true,
            JsonKey::Number(n) => n == "0",
            JsonKey::String(s) => s == "0",
            _ => false,
        }
    }
}

/// Stringified identifier of a record, as used for expansion keys.
pub fn stringify_key(record: &Value, field: &str) -> String {
    JsonKey::from_field(record, field).to_string()
}

fn parent_of(record: &Value, field: &str) -> Option<JsonKey> {
    record.get(field).map(JsonKey::from)
}

/// Build typed nodes over JSON records (children kept outside the records).
pub fn build_nodes(list: &[Value], config: Option<&PartialFieldConfig>) -> Vec<Node<Value>> {
    let conf = FieldConfig::resolve(config);
    list_to_tree_by(
        list,
        |r| JsonKey::from_field(r, &conf.id),
        |r| parent_of(r, &conf.pid),
    )
}

/// Build a forest of JSON objects, each carrying its children array.
#[instrument(level = "debug", skip_all, fields(records = list.len()))]
pub fn list_to_tree(list: &[Value], config: Option<&PartialFieldConfig>) -> Vec<Value> {
    let conf = FieldConfig::resolve(config);
    build_nodes(list, config)
        .into_iter()
        .map(|node| node_into_value(node, &conf.children))
        .collect()
}

/// Strict build: fails on duplicate identifiers or parent cycles.
pub fn try_list_to_tree(list: &[Value], config: Option<&PartialFieldConfig>) -> DomainResult<Vec<Value>> {
    let conf = FieldConfig::resolve(config);
    let nodes = try_list_to_tree_by(
        list,
        |r| JsonKey::from_field(r, &conf.id),
        |r| parent_of(r, &conf.pid),
    )?;
    Ok(nodes
        .into_iter()
        .map(|node| node_into_value(node, &conf.children))
        .collect())
}

/// Turn a node into an object with the children field set.
///
/// Non-object records become an object holding only the children field.
pub fn node_into_value(node: Node<Value>, children_field: &str) -> Value {
    let mut map = match node.base {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    let children = node
        .children
        .into_iter()
        .map(|child| node_into_value(child, children_field))
        .collect();
    map.insert(children_field.to_string(), Value::Array(children));
    Value::Object(map)
}

fn children_of<'a>(node: &'a Value, field: &str) -> Option<&'a Vec<Value>> {
    match node.get(field) {
        Some(Value::Array(items)) if !items.is_empty() => Some(items),
        _ => None,
    }
}

/// Every node in pre-order, cloned with its children field verbatim.
#[instrument(level = "debug", skip_all, fields(roots = forest.len()))]
pub fn flatten_tree(forest: &[Value], config: Option<&PartialFieldConfig>) -> Vec<Value> {
    let conf = FieldConfig::resolve(config);
    let mut result = Vec::new();
    walk_flatten(forest, &conf.children, &mut result);
    result
}

fn walk_flatten(nodes: &[Value], field: &str, out: &mut Vec<Value>) {
    for node in nodes {
        out.push(node.clone());
        if let Some(children) = children_of(node, field) {
            walk_flatten(children, field, out);
        }
    }
}

/// Stringified identifiers of every node at depth `<= max_depth`, roots at depth 1.
#[instrument(level = "debug", skip(forest, config))]
pub fn collect_expanded_keys(
    forest: &[Value],
    max_depth: i64,
    config: Option<&PartialFieldConfig>,
) -> Vec<String> {
    let conf = FieldConfig::resolve(config);
    let mut keys = Vec::new();
    if max_depth >= 1 {
        walk_keys(forest, 1, max_depth, &conf, &mut keys);
    }
    debug!("collected {} expanded keys", keys.len());
    keys
}

fn walk_keys(nodes: &[Value], depth: i64, max_depth: i64, conf: &FieldConfig, keys: &mut Vec<String>) {
    for node in nodes {
        keys.push(stringify_key(node, &conf.id));
        if depth < max_depth {
            if let Some(children) = children_of(node, &conf.children) {
                walk_keys(children, depth + 1, max_depth, conf, keys);
            }
        }
    }
}

/// Sort every level in place; returns the same forest.
pub fn sort_tree<'a, F>(
    forest: &'a mut Vec<Value>,
    mut compare: F,
    config: Option<&PartialFieldConfig>,
) -> &'a mut Vec<Value>
where
    F: FnMut(&Value, &Value) -> Ordering,
{
    let conf = FieldConfig::resolve(config);
    sort_level(forest, &mut compare, &conf.children);
    forest
}

fn sort_level<F>(nodes: &mut [Value], compare: &mut F, field: &str)
where
    F: FnMut(&Value, &Value) -> Ordering,
{
    nodes.sort_by(|a, b| compare(a, b));
    for node in nodes.iter_mut() {
        if let Some(Value::Array(children)) = node.get_mut(field) {
            if !children.is_empty() {
                sort_level(children, compare, field);
            }
        }
    }
}

/// Comparator ordering records by one field.
///
/// Numbers before strings, both ascending; records missing the field (or
/// holding another type) go last.
pub fn order_by_field(field: impl Into<String>) -> impl Fn(&Value, &Value) -> Ordering {
    let field = field.into();
    move |a: &Value, b: &Value| compare_field(a.get(field.as_str()), b.get(field.as_str()))
}

fn compare_field(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            Some(Value::Number(_)) => 0,
            Some(Value::String(_)) => 1,
            _ => 2,
        }
    }
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

pub fn validate(list: &[Value], config: Option<&PartialFieldConfig>) -> ValidationReport {
    let conf = FieldConfig::resolve(config);
    validate_by(
        list,
        |r| JsonKey::from_field(r, &conf.id),
        |r| parent_of(r, &conf.pid),
    )
}

/// Unwrap a decoded JSON document into its top-level array.
pub fn records_from_value(value: Value) -> DomainResult<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Null => Err(DomainError::NotAnArray("null")),
        Value::Bool(_) => Err(DomainError::NotAnArray("a boolean")),
        Value::Number(_) => Err(DomainError::NotAnArray("a number")),
        Value::String(_) => Err(DomainError::NotAnArray("a string")),
        Value::Object(_) => Err(DomainError::NotAnArray("an object")),
    }
}
