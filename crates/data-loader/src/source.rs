//! Ingestion sources that produce raw catalog rows.
//!
//! The catalog itself never touches the filesystem. Anything that can hand
//! over a `Vec<RawMovieRow>` can feed it.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::RawMovieRow;
use std::path::PathBuf;
use tracing::info;

/// Produces the raw rows a catalog is loaded from
pub trait CatalogSource {
    /// Short description for logs and error messages
    fn describe(&self) -> String;

    /// Read all rows
    fn read_rows(&self) -> Result<Vec<RawMovieRow>>;
}

/// Rows already held in memory
impl CatalogSource for Vec<RawMovieRow> {
    fn describe(&self) -> String {
        format!("{} in-memory rows", self.len())
    }

    fn read_rows(&self) -> Result<Vec<RawMovieRow>> {
        Ok(self.clone())
    }
}

/// CSV files tried in order; the first one that exists is read.
///
/// ## Usage
/// ```ignore
/// let source = CsvCatalogSource::new("tmdb_movies_processed.csv")
///     .with_fallback("movies.csv");
/// let rows = source.read_rows()?;
/// ```
#[derive(Debug, Clone)]
pub struct CsvCatalogSource {
    paths: Vec<PathBuf>,
}

impl CsvCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            paths: vec![path.into()],
        }
    }

    /// Build a source from a list of candidate paths, in preference order
    pub fn from_paths(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            paths: paths.into_iter().collect(),
        }
    }

    /// Add a file to try when the earlier ones are missing
    pub fn with_fallback(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.push(path.into());
        self
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl CatalogSource for CsvCatalogSource {
    fn describe(&self) -> String {
        self.paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn read_rows(&self) -> Result<Vec<RawMovieRow>> {
        let path = self
            .paths
            .iter()
            .find(|p| p.exists())
            .ok_or_else(|| DataLoadError::NoSource {
                tried: self.describe(),
            })?;

        info!("Loading catalog from {}", path.display());
        parser::read_catalog_csv(path)
    }
}
