//! Field-name configuration for string-keyed records
//!
//! Dynamic (JSON) records name their identifier, parent identifier and
//! children container through a [`FieldConfig`]. Callers pass a
//! [`PartialFieldConfig`] holding only the fields they want to override.

use serde::{Deserialize, Serialize};

pub const DEFAULT_ID_FIELD: &str = "id";
pub const DEFAULT_PID_FIELD: &str = "parentId";
pub const DEFAULT_CHILDREN_FIELD: &str = "children";

/// Complete field configuration: every name is set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FieldConfig {
    /// Field holding the record identifier
    pub id: String,
    /// Field holding the parent identifier
    pub pid: String,
    /// Field holding the nested children sequence
    pub children: String,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            id: DEFAULT_ID_FIELD.into(),
            pid: DEFAULT_PID_FIELD.into(),
            children: DEFAULT_CHILDREN_FIELD.into(),
        }
    }
}

/// Partial override, merged over the defaults (or over another config).
///
/// `None` means "not specified, inherit".
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct PartialFieldConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<String>,
}

impl FieldConfig {
    /// Resolve an optional partial configuration against the defaults.
    pub fn resolve(partial: Option<&PartialFieldConfig>) -> Self {
        match partial {
            Some(p) => Self::default().with_overrides(p),
            None => Self::default(),
        }
    }

    /// Overlay wins where it is set, otherwise keep self.
    pub fn with_overrides(&self, overlay: &PartialFieldConfig) -> Self {
        Self {
            id: overlay.id.clone().unwrap_or_else(|| self.id.clone()),
            pid: overlay.pid.clone().unwrap_or_else(|| self.pid.clone()),
            children: overlay
                .children
                .clone()
                .unwrap_or_else(|| self.children.clone()),
        }
    }
}

impl PartialFieldConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, field: impl Into<String>) -> Self {
        self.id = Some(field.into());
        self
    }

    pub fn pid(mut self, field: impl Into<String>) -> Self {
        self.pid = Some(field.into());
        self
    }

    pub fn children(mut self, field: impl Into<String>) -> Self {
        self.children = Some(field.into());
        self
    }

    /// True when no field is overridden.
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.pid.is_none() && self.children.is_none()
    }

    pub fn resolve(&self) -> FieldConfig {
        FieldConfig::resolve(Some(self))
    }
}
