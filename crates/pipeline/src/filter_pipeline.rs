//! The FilterPipeline orchestrates multiple filters.
//!
//! This module provides the main FilterPipeline struct that chains
//! multiple filters together using the builder pattern.

use crate::browse::BrowseCriteria;
use crate::filters::{GenreFilter, MinimumRatingFilter, RuntimeFilter, YearRangeFilter};
use crate::traits::Filter;
use data_loader::MovieRecord;
use tracing;

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(YearRangeFilter::new(Some(1990), Some(1999)))
///     .add_filter(MinimumRatingFilter::new(7.5))
///     .add_filter(GenreFilter::new("Crime"));
///
/// let kept = pipeline.apply(catalog.iter().collect());
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Build the pipeline for a set of browse criteria.
    ///
    /// Only criteria that are actually set add a filter. A runtime bucket is
    /// ignored when the catalog carries no runtime data at all.
    pub fn for_criteria(criteria: &BrowseCriteria, catalog_has_runtime: bool) -> Self {
        let mut pipeline = Self::new();

        if criteria.year_from.is_some() || criteria.year_to.is_some() {
            pipeline = pipeline.add_filter(YearRangeFilter::new(criteria.year_from, criteria.year_to));
        }
        if criteria.min_rating > 0.0 {
            pipeline = pipeline.add_filter(MinimumRatingFilter::new(criteria.min_rating));
        }
        if let Some(bucket) = criteria.runtime {
            if catalog_has_runtime {
                pipeline = pipeline.add_filter(RuntimeFilter::new(bucket));
            } else {
                tracing::debug!("Catalog has no runtime data, skipping {} filter", bucket);
            }
        }
        if let Some(genre) = criteria.genre.as_deref().filter(|g| !g.is_empty()) {
            pipeline = pipeline.add_filter(GenreFilter::new(genre));
        }

        pipeline
    }

    /// Add a filter to the pipeline (builder pattern).
    ///
    /// # Arguments
    /// * `filter` - Any type implementing the Filter trait
    ///
    /// # Returns
    /// Self for method chaining
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Number of filters in the pipeline
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Apply all filters in sequence; a record must pass every one.
    pub fn apply<'a>(&self, movies: Vec<&'a MovieRecord>) -> Vec<&'a MovieRecord> {
        let mut current = movies;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current);
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        current
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}
