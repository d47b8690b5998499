//! CSV emission for export rows.
//!
//! Rows are column-name → cell maps; the column list of the export fixes
//! order and header. Missing cells render empty and booleans render as
//! `True` / `False`, the spelling the import templates expect.

use std::{
    collections::HashMap,
    fmt,
    io::Write,
    path::{Path, PathBuf},
};

use csv::{Terminator, WriterBuilder};

use crate::error::{MigrationError, MigrationResult};

/// A single CSV cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Flag(bool),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(text) => f.write_str(text),
            Cell::Flag(true) => f.write_str("True"),
            Cell::Flag(false) => f.write_str("False"),
        }
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<&String> for Cell {
    fn from(value: &String) -> Self {
        Cell::Text(value.clone())
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Flag(value)
    }
}

/// One output row keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row(HashMap<&'static str, Cell>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: &'static str, value: impl Into<Cell>) -> &mut Self {
        self.0.insert(column, value.into());
        self
    }

    /// Builder form of [`Row::set`].
    pub fn with(mut self, column: &'static str, value: impl Into<Cell>) -> Self {
        self.set(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.0.get(column)
    }

    /// Rendered text of a cell, empty when the row has no such column.
    pub fn text(&self, column: &str) -> String {
        self.get(column).map(Cell::to_string).unwrap_or_default()
    }

    /// Render the row in the given column order.
    pub fn record(&self, columns: &[&str]) -> Vec<String> {
        columns.iter().map(|column| self.text(column)).collect()
    }
}

/// Rows bound for one output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub file_name: String,
    pub rows: Vec<Row>,
}

/// The result of running one export strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub columns: &'static [&'static str],
    pub layout: Layout,
}

/// How an export's rows are spread over files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    /// Every row in one shared file.
    Single(Destination),
    /// One file per primary entity, holding only that entity's rows.
    PerEntity(Vec<Destination>),
}

impl Export {
    pub fn single(
        columns: &'static [&'static str],
        file_name: impl Into<String>,
        rows: Vec<Row>,
    ) -> Self {
        Self {
            columns,
            layout: Layout::Single(Destination {
                file_name: file_name.into(),
                rows,
            }),
        }
    }

    pub fn per_entity(columns: &'static [&'static str], destinations: Vec<Destination>) -> Self {
        Self {
            columns,
            layout: Layout::PerEntity(destinations),
        }
    }

    pub fn destinations(&self) -> &[Destination] {
        match &self.layout {
            Layout::Single(destination) => std::slice::from_ref(destination),
            Layout::PerEntity(destinations) => destinations,
        }
    }

    pub fn row_count(&self) -> usize {
        self.destinations().iter().map(|d| d.rows.len()).sum()
    }

    /// Write every destination into `dir`, returning the paths written.
    ///
    /// Destinations sharing a file name are written in order, so the last
    /// one wins.
    pub fn write_to_dir(&self, dir: &Path) -> MigrationResult<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;

        let mut written: Vec<PathBuf> = Vec::with_capacity(self.destinations().len());
        for destination in self.destinations() {
            let path = dir.join(&destination.file_name);
            if written.contains(&path) {
                tracing::warn!(
                    path = %path.display(),
                    "Output file name collides with an earlier destination, overwriting"
                );
            }
            let data = render(self.columns, &destination.rows).map_err(|source| {
                MigrationError::Csv {
                    path: path.clone(),
                    source,
                }
            })?;
            std::fs::write(&path, data)?;
            tracing::debug!(
                path = %path.display(),
                rows = destination.rows.len(),
                "Wrote CSV file"
            );
            if !written.contains(&path) {
                written.push(path);
            }
        }

        Ok(written)
    }
}

/// Write a header followed by the rows to `writer`.
///
/// The header is written even when there are no rows.
pub fn write_csv<W: Write>(writer: W, columns: &[&str], rows: &[Row]) -> Result<(), csv::Error> {
    let mut wtr = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_writer(writer);

    wtr.write_record(columns)?;
    for row in rows {
        wtr.write_record(row.record(columns))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render rows to an in-memory CSV document.
pub fn render(columns: &[&str], rows: &[Row]) -> Result<Vec<u8>, csv::Error> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, columns, rows)?;
    Ok(buffer)
}
