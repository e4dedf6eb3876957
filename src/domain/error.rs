//! Domain-level errors

use itertools::Itertools;
use thiserror::Error;

use crate::domain::validate::Diagnostic;

/// Domain errors represent hierarchy violations and input shape problems.
/// The core tree operations never return them; only strict builds and
/// input decoding do.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid hierarchy: {}", summarize(.diagnostics))]
    InvalidHierarchy { diagnostics: Vec<Diagnostic> },

    #[error("expected a JSON array of records, found {0}")]
    NotAnArray(&'static str),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

fn summarize(diagnostics: &[Diagnostic]) -> String {
    diagnostics.iter().join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_diagnostics_when_formatting_error_then_lists_all() {
        let err = DomainError::InvalidHierarchy {
            diagnostics: vec![
                Diagnostic::DuplicateId { id: "1".into() },
                Diagnostic::Cycle {
                    ids: vec!["2".into(), "3".into()],
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("duplicate identifier '1'"), "{msg}");
        assert!(msg.contains("2 -> 3"), "{msg}");
    }
}
