use std::path::PathBuf;

use thiserror::Error;

use crate::{config::ConfigError, document::DocumentRole};

/// Errors that abort a migration run.
///
/// Unresolvable references and missing optional fields never surface here;
/// they are handled by the export strategies through skip or default rules.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Failed to read {role} document {path}: {source}")]
    Read {
        role: DocumentRole,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {role} document {path}: {source}")]
    Parse {
        role: DocumentRole,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed {role} document: {detail}")]
    Malformed { role: DocumentRole, detail: String },

    #[error("Invalid {role} record at index {index}: {source}")]
    Record {
        role: DocumentRole,
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type MigrationResult<T> = Result<T, MigrationError>;
