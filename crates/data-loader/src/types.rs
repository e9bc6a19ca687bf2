//! Core domain types for the movie catalog.
//!
//! - `RawMovieRow` is one row as it arrives from an ingestion source.
//! - `MovieRecord` is the cleaned, immutable record the rest of the system reads.
//! - `Catalog` is the ordered store of records addressed by dense ordinals.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a movie, stable for the lifetime of the process
pub type MovieId = u32;

/// Dense 0-based position of a record inside one loaded catalog
pub type Ordinal = usize;

// =============================================================================
// Display defaults
// =============================================================================

/// Rating used when the source row has none
pub const DEFAULT_RATING: f64 = 7.0;

/// Vote count used when the source row has none
pub const DEFAULT_VOTE_COUNT: u64 = 1000;

/// Popularity used when the source row has none
pub const DEFAULT_POPULARITY: f64 = 50.0;

/// Overview used when the source row has none
pub const DEFAULT_OVERVIEW: &str = "A great movie to watch!";

/// Genre string some datasets use for "no genres"
pub const NO_GENRES_SENTINEL: &str = "(no genres listed)";

// =============================================================================
// Raw input
// =============================================================================

/// One catalog row as read from a tabular source.
///
/// Only `id` is guaranteed. Rows without a title or genre string are dropped
/// during `Catalog::load`. Optional numeric columns that fail to parse are
/// read as absent rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMovieRow {
    #[serde(rename = "movieId")]
    pub id: MovieId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub genres: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub year: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub vote_count: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub runtime: Option<f64>,
    #[serde(default)]
    pub poster_url: Option<String>,
}

impl RawMovieRow {
    /// Create a row carrying the three required fields
    pub fn new(id: MovieId, title: impl Into<String>, genres: impl Into<String>) -> Self {
        Self {
            id,
            title: Some(title.into()),
            genres: Some(genres.into()),
            ..Self::default()
        }
    }

    pub fn with_year(mut self, year: u16) -> Self {
        self.year = Some(f64::from(year));
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_vote_count(mut self, vote_count: u32) -> Self {
        self.vote_count = Some(f64::from(vote_count));
        self
    }

    pub fn with_popularity(mut self, popularity: f64) -> Self {
        self.popularity = Some(popularity);
        self
    }

    pub fn with_overview(mut self, overview: impl Into<String>) -> Self {
        self.overview = Some(overview.into());
        self
    }

    pub fn with_runtime(mut self, minutes: u32) -> Self {
        self.runtime = Some(f64::from(minutes));
        self
    }

    pub fn with_poster_url(mut self, url: impl Into<String>) -> Self {
        self.poster_url = Some(url.into());
        self
    }
}

// =============================================================================
// Cleaned record
// =============================================================================

/// A movie in the loaded catalog.
///
/// `clean_title` and `year` are cached derivations of `title`; they are never
/// set independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: MovieId,
    /// Original title, e.g. "Toy Story (1995)"
    pub title: String,
    /// Title with the trailing "(YYYY)" removed, e.g. "Toy Story"
    pub clean_title: String,
    pub year: Option<u16>,
    /// Pipe-split genre tags, sentinel removed, source order kept
    pub genres: Vec<String>,
    pub rating: f64,
    pub vote_count: u64,
    pub popularity: f64,
    pub overview: String,
    /// Runtime in minutes, when the source provides one
    pub runtime: Option<u32>,
    /// Pre-computed image reference from the source, passed through as-is
    pub poster_url: Option<String>,
}

// =============================================================================
// Catalog - the in-memory store
// =============================================================================

/// Ordered, immutable collection of movie records.
///
/// Records are addressed by ordinal (their position in `movies`). The feature
/// index is built from the same ordering, so the two must never diverge.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub(crate) movies: Vec<MovieRecord>,
    /// id -> ordinal
    pub(crate) id_index: HashMap<MovieId, Ordinal>,
    /// True when at least one record carries a runtime
    pub(crate) has_runtime: bool,
}

impl Catalog {
    /// Get a movie by its catalog id
    pub fn get_by_id(&self, id: MovieId) -> Option<&MovieRecord> {
        self.id_index.get(&id).map(|&ordinal| &self.movies[ordinal])
    }

    /// Get the ordinal for a catalog id
    pub fn ordinal_of(&self, id: MovieId) -> Option<Ordinal> {
        self.id_index.get(&id).copied()
    }

    /// Get a movie by its position in the catalog
    pub fn get_by_ordinal(&self, ordinal: Ordinal) -> Option<&MovieRecord> {
        self.movies.get(ordinal)
    }

    /// All records in catalog order
    pub fn movies(&self) -> &[MovieRecord] {
        &self.movies
    }

    pub fn iter(&self) -> impl Iterator<Item = &MovieRecord> {
        self.movies.iter()
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Whether runtime information is present anywhere in the catalog
    pub fn has_runtime(&self) -> bool {
        self.has_runtime
    }
}
