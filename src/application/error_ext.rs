//! Error conversion helpers for input loading
//!
//! Extension traits attach the input path to I/O and JSON decoding errors.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// fs.read_to_string(&input)
    ///     .with_path_context("read records", &input)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, path.display()),
            source: Box::new(e),
        })
    }
}

/// Same idea for `serde_json` decoding.
pub trait JsonResultExt<T> {
    fn with_input_context(self, path: &Path) -> ApplicationResult<T>;
}

impl<T> JsonResultExt<T> for serde_json::Result<T> {
    fn with_input_context(self, path: &Path) -> ApplicationResult<T> {
        self.map_err(|source| ApplicationError::Parse {
            context: path.display().to_string(),
            source,
        })
    }
}
