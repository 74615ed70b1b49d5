// ⚠️ Errors - every failure the show core can raise
// Raised before anything is persisted; the on-disk state stays as it was.

use std::path::PathBuf;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, ShowError>;

#[derive(Debug, thiserror::Error)]
pub enum ShowError {
    /// Malformed contestant: bad name, cap exceeded, unknown class, bad payment.
    #[error("invalid contestant '{name}': {reason}")]
    Validation { name: String, reason: String },

    /// A different contestant already holds this name and no update was allowed.
    #[error("contestant with name '{name}' already registered (pass allow_update to add entries)")]
    DuplicateName { name: String },

    /// Allocation already exists and reallocation was not confirmed.
    #[error("show ledger already exists at {path}; confirm reallocation to overwrite it")]
    ExistingLedger { path: PathBuf },

    /// Judging or reporting attempted before any allocation was persisted.
    #[error("no allocated show at {path}; run allocation first")]
    NotAllocated { path: PathBuf },

    #[error("unknown class '{class_id}'")]
    UnknownClass { class_id: String },

    #[error("unknown entry '{entry}' in class '{class_id}'")]
    UnknownEntry { class_id: String, entry: String },

    /// An internal invariant does not hold.
    #[error("consistency check failed: {0}")]
    Consistency(String),

    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not (de)serialize {path}: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("csv export to {path} failed: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl ShowError {
    pub fn validation(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ShowError::Validation {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ShowError::Io {
            path: path.into(),
            source,
        }
    }

    /// Exit code for the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            ShowError::Validation { .. } | ShowError::DuplicateName { .. } => 2,
            ShowError::ExistingLedger { .. } | ShowError::NotAllocated { .. } => 3,
            ShowError::UnknownClass { .. } | ShowError::UnknownEntry { .. } => 4,
            ShowError::Consistency(_) => 5,
            ShowError::Io { .. } | ShowError::Serialization { .. } | ShowError::Csv { .. } => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let err = ShowError::validation("Alice", "name must contain at least two words");
        assert_eq!(
            err.to_string(),
            "invalid contestant 'Alice': name must contain at least two words"
        );

        let err = ShowError::UnknownEntry {
            class_id: "42".to_string(),
            entry: "7".to_string(),
        };
        assert_eq!(err.to_string(), "unknown entry '7' in class '42'");
    }

    #[test]
    fn test_exit_codes_distinguish_user_errors() {
        assert_eq!(
            ShowError::DuplicateName { name: "A B".into() }.exit_code(),
            2
        );
        assert_eq!(
            ShowError::ExistingLedger { path: PathBuf::from("x") }.exit_code(),
            3
        );
        assert_eq!(ShowError::Consistency("dup".into()).exit_code(), 5);
    }
}
