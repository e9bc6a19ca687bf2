//! Filter to ensure minimum quality threshold.
//!
//! Removes movies rated below a floor.

use crate::traits::Filter;
use data_loader::MovieRecord;

/// Removes records whose rating is below `min_rating`.
pub struct MinimumRatingFilter {
    min_rating: f64,
}

impl MinimumRatingFilter {
    /// Create a new MinimumRatingFilter.
    ///
    /// # Arguments
    /// * `min_rating` - Lowest rating kept (inclusive)
    pub fn new(min_rating: f64) -> Self {
        Self { min_rating }
    }
}

impl Filter for MinimumRatingFilter {
    fn name(&self) -> &str {
        "MinimumRatingFilter"
    }

    fn apply<'a>(&self, movies: Vec<&'a MovieRecord>) -> Vec<&'a MovieRecord> {
        movies
            .into_iter()
            .filter(|movie| movie.rating >= self.min_rating)
            .collect()
    }
}
