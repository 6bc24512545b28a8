//! Load error types.
//!
//! These errors describe input tables that cannot be drilled. They are
//! typed so the CLI (and tests) can downcast them out of an `anyhow::Error`
//! chain instead of matching on message text.

use std::path::PathBuf;

use thiserror::Error;

/// A cell whose alternation syntax does not line up with its header.
///
/// `found` and `expected` count `/` separators, not variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Error in input file \"{}\", line {line}, field {column}.\nExpected {expected} {} but found {found}.",
    .file.display(),
    slash_noun(.expected)
)]
pub struct FormatError {
    /// Table the cell came from.
    pub file: PathBuf,
    /// 1-based physical line of the row.
    pub line: u64,
    /// Field position counted from the group-key column, which is field 0.
    pub column: usize,
    /// Separators found in the cell.
    pub found: usize,
    /// Separators declared by the header.
    pub expected: usize,
}

fn slash_noun(count: &usize) -> &'static str {
    if *count == 1 {
        "slash"
    } else {
        "slashes"
    }
}

/// Errors that make an input table unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// Alternation syntax mismatch between a cell and its header.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// A data cell sits in a column the header row does not name.
    #[error("Error in input file \"{}\", line {line}, field {column}.\nThe header row has no field {column}.", .file.display())]
    MissingHeader {
        file: PathBuf,
        line: u64,
        column: usize,
    },
}

impl LoadError {
    /// Returns the alternation mismatch, if that is what this error is.
    pub fn as_format(&self) -> Option<&FormatError> {
        match self {
            LoadError::Format(e) => Some(e),
            LoadError::MissingHeader { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_error_message_pinpoints_cell() {
        let err = FormatError {
            file: PathBuf::from("verbs.csv"),
            line: 4,
            column: 3,
            found: 1,
            expected: 0,
        };
        let msg = err.to_string();
        assert!(msg.contains("\"verbs.csv\""));
        assert!(msg.contains("line 4, field 3"));
        assert!(msg.contains("Expected 0 slashes but found 1."));
    }

    #[test]
    fn singular_slash_noun() {
        let err = FormatError {
            file: PathBuf::from("a.csv"),
            line: 2,
            column: 2,
            found: 2,
            expected: 1,
        };
        assert!(err.to_string().contains("Expected 1 slash but found 2."));
    }

    #[test]
    fn load_error_exposes_format_error() {
        let err: LoadError = FormatError {
            file: PathBuf::from("a.csv"),
            line: 2,
            column: 2,
            found: 2,
            expected: 1,
        }
        .into();
        assert_eq!(err.as_format().map(|e| e.line), Some(2));

        let missing = LoadError::MissingHeader {
            file: PathBuf::from("a.csv"),
            line: 3,
            column: 5,
        };
        assert!(missing.as_format().is_none());
        assert!(missing.to_string().contains("no field 5"));
    }
}
