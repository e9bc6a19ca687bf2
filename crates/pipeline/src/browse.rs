//! Catalog browsing: filter, sort, truncate.

use crate::filter_pipeline::FilterPipeline;
use crate::filters::{GenreFilter, RuntimeBucket};
use crate::sort::SortKey;
use crate::traits::Filter;
use data_loader::{Catalog, MovieRecord};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Default number of records returned by a browse
pub const DEFAULT_BROWSE_LIMIT: usize = 40;

/// Filter and sort settings for one browse request.
///
/// Every filter is optional; a `min_rating` of zero or less means no rating
/// filter. Out-of-range values simply match nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowseCriteria {
    pub year_from: Option<u16>,
    pub year_to: Option<u16>,
    pub min_rating: f64,
    pub runtime: Option<RuntimeBucket>,
    pub genre: Option<String>,
    pub sort: SortKey,
    pub limit: usize,
}

impl Default for BrowseCriteria {
    fn default() -> Self {
        Self {
            year_from: None,
            year_to: None,
            min_rating: 0.0,
            runtime: None,
            genre: None,
            sort: SortKey::default(),
            limit: DEFAULT_BROWSE_LIMIT,
        }
    }
}

impl BrowseCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_years(mut self, year_from: Option<u16>, year_to: Option<u16>) -> Self {
        self.year_from = year_from;
        self.year_to = year_to;
        self
    }

    pub fn with_min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = min_rating;
        self
    }

    pub fn with_runtime(mut self, bucket: RuntimeBucket) -> Self {
        self.runtime = Some(bucket);
        self
    }

    /// An empty genre means "any genre".
    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        let genre = genre.into();
        self.genre = if genre.trim().is_empty() { None } else { Some(genre) };
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Apply `criteria` to the catalog: filter conjunctively, sort, truncate.
#[instrument(skip(catalog), fields(catalog_size = catalog.len()))]
pub fn browse<'a>(catalog: &'a Catalog, criteria: &BrowseCriteria) -> Vec<&'a MovieRecord> {
    let pipeline = FilterPipeline::for_criteria(criteria, catalog.has_runtime());
    let mut movies = pipeline.apply(catalog.iter().collect());

    criteria.sort.sort(&mut movies);
    movies.truncate(criteria.limit);

    debug!("Browse returned {} movies", movies.len());
    movies
}

/// Most popular movies first
pub fn popular(catalog: &Catalog, limit: usize) -> Vec<&MovieRecord> {
    ranked(catalog.iter().collect(), SortKey::Popularity, limit)
}

/// Highest rated movies first
pub fn top_rated(catalog: &Catalog, limit: usize) -> Vec<&MovieRecord> {
    ranked(catalog.iter().collect(), SortKey::Rating, limit)
}

/// Movies tagged with `genre`, highest rated first
pub fn by_genre<'a>(catalog: &'a Catalog, genre: &str, limit: usize) -> Vec<&'a MovieRecord> {
    let tagged = GenreFilter::new(genre).apply(catalog.iter().collect());
    ranked(tagged, SortKey::Rating, limit)
}

fn ranked(mut movies: Vec<&MovieRecord>, key: SortKey, limit: usize) -> Vec<&MovieRecord> {
    key.sort(&mut movies);
    movies.truncate(limit);
    movies
}
