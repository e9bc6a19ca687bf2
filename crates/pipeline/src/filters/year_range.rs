//! Filter on release year.
//!
//! Keeps movies released inside an inclusive year window. Either bound may
//! be open.

use crate::traits::Filter;
use data_loader::MovieRecord;

/// Keeps records whose year lies in `[year_from, year_to]`.
///
/// ## Algorithm
/// 1. A record without a year never matches while any bound is set
/// 2. An inverted window (`year_from > year_to`) matches nothing
pub struct YearRangeFilter {
    year_from: Option<u16>,
    year_to: Option<u16>,
}

impl YearRangeFilter {
    pub fn new(year_from: Option<u16>, year_to: Option<u16>) -> Self {
        Self { year_from, year_to }
    }

    fn matches(&self, year: Option<u16>) -> bool {
        let Some(year) = year else {
            return self.year_from.is_none() && self.year_to.is_none();
        };
        self.year_from.is_none_or(|from| year >= from) && self.year_to.is_none_or(|to| year <= to)
    }
}

impl Filter for YearRangeFilter {
    fn name(&self) -> &str {
        "YearRangeFilter"
    }

    fn apply<'a>(&self, movies: Vec<&'a MovieRecord>) -> Vec<&'a MovieRecord> {
        movies
            .into_iter()
            .filter(|movie| self.matches(movie.year))
            .collect()
    }
}
