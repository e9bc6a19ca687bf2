//! Sort orders for browse results.
//!
//! All sorts are stable: records that compare equal keep catalog order.

use data_loader::MovieRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// How browse results are ordered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Highest popularity first
    #[default]
    Popularity,
    /// Highest rating first
    Rating,
    /// Newest first, undated last
    YearDesc,
    /// Oldest first, undated last
    YearAsc,
    /// Clean title, ascending
    Title,
}

impl SortKey {
    /// Parse a sort name; unknown names fall back to popularity
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "rating" => SortKey::Rating,
            "year_desc" => SortKey::YearDesc,
            "year_asc" => SortKey::YearAsc,
            "title" => SortKey::Title,
            _ => SortKey::Popularity,
        }
    }

    pub fn compare(&self, a: &MovieRecord, b: &MovieRecord) -> Ordering {
        match self {
            SortKey::Popularity => b.popularity.total_cmp(&a.popularity),
            SortKey::Rating => b.rating.total_cmp(&a.rating),
            SortKey::YearDesc => undated_last(a.year, b.year, |x, y| y.cmp(&x)),
            SortKey::YearAsc => undated_last(a.year, b.year, |x, y| x.cmp(&y)),
            SortKey::Title => a.clean_title.cmp(&b.clean_title),
        }
    }

    /// Stable in-place sort
    pub fn sort(&self, movies: &mut [&MovieRecord]) {
        movies.sort_by(|a, b| self.compare(a, b));
    }
}

impl From<&str> for SortKey {
    fn from(s: &str) -> Self {
        SortKey::parse(s)
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortKey::Popularity => "popularity",
            SortKey::Rating => "rating",
            SortKey::YearDesc => "year_desc",
            SortKey::YearAsc => "year_asc",
            SortKey::Title => "title",
        };
        f.write_str(name)
    }
}

fn undated_last(a: Option<u16>, b: Option<u16>, dated: impl Fn(u16, u16) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => dated(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
