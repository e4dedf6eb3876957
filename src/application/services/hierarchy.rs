//! Hierarchy service
//!
//! Loads JSON record lists or forests and runs the tree operations with the
//! field names and defaults from [`Settings`].

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::application::error_ext::{IoResultExt, JsonResultExt};
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::json::{self, stringify_key};
use crate::domain::{render_forest, sort_tree_by_record, PartialFieldConfig, ValidationReport};
use crate::infrastructure::traits::FileSystem;

/// Path argument that selects standard input.
pub const STDIN_MARKER: &str = "-";

/// Service running tree operations over JSON input.
pub struct HierarchyService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl HierarchyService {
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn fields(&self) -> PartialFieldConfig {
        self.settings.field_overrides()
    }

    /// Read a JSON array from a file, or from stdin when `input` is `-`.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, input: &Path) -> ApplicationResult<Vec<Value>> {
        let content = if input.as_os_str() == STDIN_MARKER {
            self.fs.read_stdin().with_path_context("read", input)?
        } else {
            self.fs
                .read_to_string(input)
                .with_path_context("read", input)?
        };
        // Built forests nest two levels per tree level; no depth cap
        let mut de = serde_json::Deserializer::from_str(&content);
        de.disable_recursion_limit();
        let value = Value::deserialize(&mut de).with_input_context(input)?;
        de.end().with_input_context(input)?;
        let records = json::records_from_value(value)?;
        debug!("loaded {} top-level entries", records.len());
        Ok(records)
    }

    /// Build the forest; strict mode rejects duplicates and cycles.
    ///
    /// Siblings are ordered by `sort_by` when configured.
    #[instrument(level = "debug", skip_all, fields(records = records.len()))]
    pub fn build(&self, records: &[Value]) -> ApplicationResult<Vec<Value>> {
        let fields = self.fields();
        let mut forest = if self.settings.strict {
            json::try_list_to_tree(records, Some(&fields))?
        } else {
            json::list_to_tree(records, Some(&fields))
        };
        if let Some(field) = &self.settings.sort_by {
            json::sort_tree(&mut forest, json::order_by_field(field.as_str()), Some(&fields));
        }
        Ok(forest)
    }

    pub fn flatten(&self, forest: &[Value]) -> Vec<Value> {
        json::flatten_tree(forest, Some(&self.fields()))
    }

    /// Expansion keys down to `depth`, or the configured `expand_depth`.
    pub fn expanded_keys(&self, forest: &[Value], depth: Option<i64>) -> Vec<String> {
        let depth = depth.unwrap_or(self.settings.expand_depth);
        json::collect_expanded_keys(forest, depth, Some(&self.fields()))
    }

    pub fn sort(&self, mut forest: Vec<Value>, field: &str) -> Vec<Value> {
        json::sort_tree(&mut forest, json::order_by_field(field), Some(&self.fields()));
        forest
    }

    /// Build from flat records and draw the result as text.
    ///
    /// Nodes show the `label` field, falling back to the identifier.
    #[instrument(level = "debug", skip_all, fields(records = records.len()))]
    pub fn render(&self, records: &[Value]) -> String {
        let fields = self.fields();
        let mut nodes = json::build_nodes(records, Some(&fields));
        if let Some(field) = &self.settings.sort_by {
            sort_tree_by_record(&mut nodes, json::order_by_field(field.as_str()));
        }
        let label_field = self.settings.label.as_str();
        let id_field = self.settings.fields.id.as_str();
        render_forest(&nodes, |record: &Value| match record.get(label_field) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => stringify_key(record, id_field),
        })
    }

    pub fn validate(&self, records: &[Value]) -> ValidationReport {
        json::validate(records, Some(&self.fields()))
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::path::PathBuf;

    use serde_json::json;

    use super::*;
    use crate::infrastructure::traits::RealFileSystem;

    /// Filesystem stub serving fixed stdin content.
    struct StdinOnly(&'static str);

    impl FileSystem for StdinOnly {
        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            Err(io::Error::new(
                io::ErrorKind::NotFound,
                path.display().to_string(),
            ))
        }
        fn read_stdin(&self) -> io::Result<String> {
            Ok(self.0.to_string())
        }
        fn write(&self, _path: &Path, _content: &str) -> io::Result<()> {
            Ok(())
        }
        fn exists(&self, _path: &Path) -> bool {
            false
        }
        fn create_dir_all(&self, _path: &Path) -> io::Result<()> {
            Ok(())
        }
    }

    fn service(settings: Settings) -> HierarchyService {
        HierarchyService::new(Arc::new(RealFileSystem), Arc::new(settings))
    }

    #[test]
    fn given_dash_when_loading_then_reads_stdin() {
        let svc = HierarchyService::new(
            Arc::new(StdinOnly(r#"[{"id": 1}]"#)),
            Arc::new(Settings::default()),
        );
        let records = svc.load(&PathBuf::from("-")).unwrap();
        assert_eq!(records, vec![json!({"id": 1})]);
    }

    #[test]
    fn given_sort_field_when_building_then_orders_siblings() {
        let svc = service(Settings {
            sort_by: Some("order".into()),
            ..Settings::default()
        });
        let records = vec![
            json!({"id": 1, "order": 2}),
            json!({"id": 2, "order": 1}),
        ];
        let forest = svc.build(&records).unwrap();
        assert_eq!(forest[0]["id"], json!(2));
        assert_eq!(forest[1]["id"], json!(1));
    }

    #[test]
    fn given_strict_settings_when_building_duplicates_then_fails() {
        let svc = service(Settings {
            strict: true,
            ..Settings::default()
        });
        let records = vec![json!({"id": 1}), json!({"id": 1})];
        assert!(svc.build(&records).is_err());
    }

    #[test]
    fn given_missing_label_when_rendering_then_falls_back_to_id() {
        let svc = service(Settings::default());
        let records = vec![
            json!({"id": 1, "name": "root"}),
            json!({"id": 2, "parentId": 1}),
        ];
        let text = svc.render(&records);
        assert!(text.contains("root"));
        assert!(text.contains("2"));
    }
}
