//! Migration of identity-platform JSON backups into import-ready CSV files.
//!
//! A run reads the backup documents named in a [`config::MigrationConfig`],
//! decodes them into [`document::Sources`], expands them into rows with one
//! of the [`export::ExportStrategy`] variants, and writes the rows with
//! [`csv_export`]. [`pipeline`] strings these steps together.

pub mod backup;
pub mod config;
pub mod csv_export;
pub mod document;
pub mod error;
pub mod export;
pub mod mapping;
pub mod models;
pub mod normalize;
#[cfg(feature = "cli")]
pub mod observability;
pub mod pipeline;

#[cfg(test)]
mod tests;

pub use config::MigrationConfig;
pub use error::{MigrationError, MigrationResult};
pub use export::ExportStrategy;
