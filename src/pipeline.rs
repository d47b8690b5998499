//! Wires configuration, document loading, row expansion and CSV output.
//!
//! Every document a run needs is read and decoded before the first file is
//! written. A failure at any step aborts the run; files already written by
//! earlier strategies are left in place.

use std::path::PathBuf;

use crate::{
    config::{InputsConfig, MigrationConfig},
    document::{DocumentRole, Sources, read_document},
    error::MigrationResult,
    export::{ExportStrategy, Exporter},
};

/// Outcome of one strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub strategy: ExportStrategy,
    pub rows: usize,
    pub files: Vec<PathBuf>,
}

/// Required input documents of `strategy` that do not exist.
pub fn missing_inputs(inputs: &InputsConfig, strategy: ExportStrategy) -> Vec<PathBuf> {
    strategy
        .required_documents()
        .iter()
        .map(|role| inputs.path(*role))
        .filter(|path| !path.exists())
        .collect()
}

/// Read and decode every document `strategies` draw on.
///
/// Required documents must exist. Optional ones are read only when present.
pub fn load_sources(inputs: &InputsConfig, strategies: &[ExportStrategy]) -> MigrationResult<Sources> {
    let mut required: Vec<DocumentRole> = Vec::new();
    let mut optional: Vec<DocumentRole> = Vec::new();
    for strategy in strategies {
        for role in strategy.required_documents() {
            if !required.contains(role) {
                required.push(*role);
            }
        }
        for role in strategy.optional_documents() {
            if !optional.contains(role) {
                optional.push(*role);
            }
        }
    }
    optional.retain(|role| !required.contains(role));

    let mut sources = Sources::default();
    for role in required {
        let path = inputs.path(role);
        tracing::debug!(role = %role, path = %path.display(), "Loading document");
        sources.insert(role, read_document(role, &path)?)?;
    }
    for role in optional {
        let path = inputs.path(role);
        if !path.exists() {
            tracing::debug!(role = %role, path = %path.display(), "Optional document not found");
            continue;
        }
        tracing::debug!(role = %role, path = %path.display(), "Loading optional document");
        sources.insert(role, read_document(role, &path)?)?;
    }

    Ok(sources)
}

/// Run strategies against already loaded documents and write their files.
pub fn run_with_sources(
    config: &MigrationConfig,
    sources: &Sources,
    strategies: &[ExportStrategy],
) -> MigrationResult<Vec<ExportReport>> {
    let exporter = Exporter::new(sources, &config.export, &config.outputs);
    strategies
        .iter()
        .map(|strategy| write_export(config, &exporter, *strategy))
        .collect()
}

/// Load the inputs of one strategy, run it and write its files.
pub fn run_export(config: &MigrationConfig, strategy: ExportStrategy) -> MigrationResult<ExportReport> {
    let sources = load_sources(&config.inputs, &[strategy])?;
    let exporter = Exporter::new(&sources, &config.export, &config.outputs);
    write_export(config, &exporter, strategy)
}

fn write_export(
    config: &MigrationConfig,
    exporter: &Exporter<'_>,
    strategy: ExportStrategy,
) -> MigrationResult<ExportReport> {
    let export = exporter.run(strategy);
    let files = export.write_to_dir(&config.outputs.directory)?;
    tracing::info!(
        strategy = %strategy,
        rows = export.row_count(),
        files = files.len(),
        directory = %config.outputs.directory.display(),
        "Export written"
    );
    Ok(ExportReport {
        strategy,
        rows: export.row_count(),
        files,
    })
}

/// Run every strategy whose required inputs exist. Documents shared between
/// strategies are read once.
pub fn run_all(config: &MigrationConfig) -> MigrationResult<Vec<ExportReport>> {
    let runnable: Vec<ExportStrategy> = ExportStrategy::ALL
        .into_iter()
        .filter(|strategy| {
            let missing = missing_inputs(&config.inputs, *strategy);
            if !missing.is_empty() {
                tracing::info!(
                    strategy = %strategy,
                    missing = ?missing,
                    "Skipping export, required inputs not found"
                );
            }
            missing.is_empty()
        })
        .collect();

    let sources = load_sources(&config.inputs, &runnable)?;
    run_with_sources(config, &sources, &runnable)
}
