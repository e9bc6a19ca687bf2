//! # Data Loader Crate
//!
//! Loads a movie catalog and serves read-only lookups over it.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (RawMovieRow, MovieRecord, Catalog)
//! - **parser**: CSV reading plus title/year/genre derivation
//! - **source**: Where raw rows come from (CSV files, in-memory rows)
//! - **index**: Catalog construction, genre listing, title search
//! - **resolver**: Map an id or free-text title to a catalog ordinal
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{Catalog, CatalogSource, CsvCatalogSource};
//!
//! let rows = CsvCatalogSource::new("data/movies.csv").read_rows()?;
//! let catalog = Catalog::load(rows)?;
//!
//! let movie = catalog.get_by_id(1).unwrap();
//! let ordinal = catalog.find_ordinal("toy story");
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod source;
pub mod index;
pub mod resolver;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use types::{
    // Type aliases
    MovieId,
    Ordinal,
    // Core types
    RawMovieRow,
    MovieRecord,
    Catalog,
    // Defaults
    DEFAULT_OVERVIEW,
    DEFAULT_POPULARITY,
    DEFAULT_RATING,
    DEFAULT_VOTE_COUNT,
};
pub use source::{CatalogSource, CsvCatalogSource};
pub use resolver::MovieQuery;
