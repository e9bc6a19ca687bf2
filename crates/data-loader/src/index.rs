//! Catalog building and read-side queries.
//!
//! `Catalog::load` turns raw rows into the immutable store:
//! 1. Drop rows without a title or genre string
//! 2. Deduplicate by exact title, keeping the first occurrence
//! 3. Re-index to dense ordinals
//! 4. Derive clean title, year and genre tags, fill display defaults

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, info, instrument, warn};

/// Shortest search query that returns anything
pub const MIN_SEARCH_QUERY_LEN: usize = 2;

impl Catalog {
    /// Build a catalog from raw rows.
    ///
    /// Returns `DataLoadError::EmptyCatalog` when no row survives cleaning.
    #[instrument(skip(rows), fields(rows = rows.len()))]
    pub fn load(rows: Vec<RawMovieRow>) -> Result<Self> {
        let total = rows.len();
        let mut seen_titles: HashSet<String> = HashSet::new();
        let mut seen_ids: HashSet<MovieId> = HashSet::new();
        let mut dropped = 0usize;
        let mut duplicates = 0usize;

        // Cleaning is order dependent, so it runs sequentially
        let kept: Vec<(RawMovieRow, String, String)> = rows
            .into_iter()
            .filter_map(|mut row| {
                let title = row.title.take().filter(|t| !t.trim().is_empty());
                let genres = row.genres.take().filter(|g| !g.trim().is_empty());
                match (title, genres) {
                    (Some(title), Some(genres)) => Some((row, title, genres)),
                    _ => {
                        dropped += 1;
                        None
                    }
                }
            })
            .filter(|(row, title, _)| {
                // A row rejected for its id must not claim its title
                if seen_ids.contains(&row.id) {
                    warn!("Duplicate movie id {} for \"{}\", keeping first", row.id, title);
                    duplicates += 1;
                    return false;
                }
                if !seen_titles.insert(title.clone()) {
                    duplicates += 1;
                    return false;
                }
                seen_ids.insert(row.id);
                true
            })
            .collect();

        if kept.is_empty() {
            return Err(DataLoadError::EmptyCatalog);
        }

        // Field derivation is independent per row
        let movies: Vec<MovieRecord> = kept
            .into_par_iter()
            .map(|(row, title, genres)| build_record(row, title, &genres))
            .collect();

        let id_index: HashMap<MovieId, Ordinal> = movies
            .iter()
            .enumerate()
            .map(|(ordinal, movie)| (movie.id, ordinal))
            .collect();
        let has_runtime = movies.iter().any(|m| m.runtime.is_some());

        debug!(
            "Dropped {} incomplete rows and {} duplicates out of {}",
            dropped, duplicates, total
        );
        info!("Loaded {} movies into the catalog", movies.len());

        Ok(Self {
            movies,
            id_index,
            has_runtime,
        })
    }

    /// Sorted union of every record's genre tags
    pub fn all_genres(&self) -> Vec<String> {
        self.movies
            .iter()
            .flat_map(|movie| movie.genres.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Case-insensitive substring search on the clean title.
    ///
    /// Queries shorter than two characters (after trimming) return nothing.
    /// Results keep catalog order.
    pub fn search_by_title(&self, query: &str, limit: usize) -> Vec<&MovieRecord> {
        let query = query.trim().to_lowercase();
        if query.chars().count() < MIN_SEARCH_QUERY_LEN {
            return Vec::new();
        }

        self.movies
            .iter()
            .filter(|movie| movie.clean_title.to_lowercase().contains(&query))
            .take(limit)
            .collect()
    }
}

/// Derive display fields and fill defaults for one surviving row
fn build_record(row: RawMovieRow, title: String, genres: &str) -> MovieRecord {
    let year = parser::extract_year_from_title(&title).or_else(|| row.year.and_then(to_year));

    MovieRecord {
        id: row.id,
        clean_title: parser::clean_title(&title),
        year,
        genres: parser::parse_genres(genres),
        rating: row.rating.filter(|r| r.is_finite()).unwrap_or(DEFAULT_RATING),
        vote_count: row
            .vote_count
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v as u64)
            .unwrap_or(DEFAULT_VOTE_COUNT),
        popularity: row
            .popularity
            .filter(|p| p.is_finite())
            .unwrap_or(DEFAULT_POPULARITY),
        overview: row
            .overview
            .filter(|o| !o.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_OVERVIEW.to_string()),
        runtime: row
            .runtime
            .filter(|r| r.is_finite() && *r >= 0.0)
            .map(|r| r as u32),
        poster_url: row.poster_url.filter(|p| !p.trim().is_empty()),
        title,
    }
}

fn to_year(value: f64) -> Option<u16> {
    if value.is_finite() && (1.0..=9999.0).contains(&value) {
        Some(value as u16)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<RawMovieRow> {
        vec![
            RawMovieRow::new(1, "Toy Story (1995)", "Animation|Children|Comedy"),
            RawMovieRow::new(2, "Jumanji (1995)", "Adventure|Children|Fantasy"),
            RawMovieRow::new(3, "Heat (1995)", "Action|Crime|Thriller"),
        ]
    }

    #[test]
    fn test_load_assigns_dense_ordinals() {
        let catalog = Catalog::load(sample_rows()).unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get_by_ordinal(0).unwrap().id, 1);
        assert_eq!(catalog.get_by_ordinal(2).unwrap().id, 3);
        assert_eq!(catalog.ordinal_of(2), Some(1));
        assert!(catalog.get_by_ordinal(3).is_none());
    }

    #[test]
    fn test_load_derives_title_fields() {
        let catalog = Catalog::load(sample_rows()).unwrap();
        let movie = catalog.get_by_id(1).unwrap();

        assert_eq!(movie.title, "Toy Story (1995)");
        assert_eq!(movie.clean_title, "Toy Story");
        assert_eq!(movie.year, Some(1995));
        assert_eq!(movie.genres, vec!["Animation", "Children", "Comedy"]);
    }

    #[test]
    fn test_load_fills_defaults() {
        let catalog = Catalog::load(sample_rows()).unwrap();
        let movie = catalog.get_by_id(3).unwrap();

        assert_eq!(movie.rating, 7.0);
        assert_eq!(movie.vote_count, 1000);
        assert_eq!(movie.popularity, 50.0);
        assert_eq!(movie.overview, DEFAULT_OVERVIEW);
        assert_eq!(movie.runtime, None);
        assert!(!catalog.has_runtime());
    }

    #[test]
    fn test_load_keeps_supplied_attributes() {
        let rows = vec![
            RawMovieRow::new(7, "Nameless", "Drama")
                .with_year(2001)
                .with_rating(8.1)
                .with_vote_count(42)
                .with_popularity(12.5)
                .with_runtime(95)
                .with_overview("Someone does something."),
        ];
        let catalog = Catalog::load(rows).unwrap();
        let movie = catalog.get_by_id(7).unwrap();

        assert_eq!(movie.year, Some(2001));
        assert_eq!(movie.rating, 8.1);
        assert_eq!(movie.vote_count, 42);
        assert_eq!(movie.popularity, 12.5);
        assert_eq!(movie.runtime, Some(95));
        assert_eq!(movie.overview, "Someone does something.");
        assert!(catalog.has_runtime());
    }

    #[test]
    fn test_title_year_wins_over_column() {
        let rows = vec![RawMovieRow::new(1, "Heat (1995)", "Action").with_year(1986)];
        let catalog = Catalog::load(rows).unwrap();
        assert_eq!(catalog.get_by_id(1).unwrap().year, Some(1995));
    }

    #[test]
    fn test_load_drops_incomplete_and_duplicate_rows() {
        let mut missing_genres = RawMovieRow::new(4, "Casino (1995)", "");
        missing_genres.genres = None;
        let rows = vec![
            RawMovieRow::new(1, "Heat (1995)", "Action|Crime"),
            missing_genres,
            RawMovieRow::new(5, "   ", "Drama"),
            RawMovieRow::new(6, "Heat (1995)", "Drama"),
            RawMovieRow::new(8, "Sabrina (1995)", "Comedy|Romance"),
        ];
        let catalog = Catalog::load(rows).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get_by_ordinal(0).unwrap().id, 1);
        assert_eq!(catalog.get_by_ordinal(1).unwrap().id, 8);
        assert_eq!(catalog.get_by_id(1).unwrap().genres, vec!["Action", "Crime"]);
        assert!(catalog.get_by_id(6).is_none());
    }

    #[test]
    fn test_large_vote_count_is_exact() {
        let rows = vec![RawMovieRow::new(1, "Heat (1995)", "Action").with_vote_count(u32::MAX)];
        let catalog = Catalog::load(rows).unwrap();
        assert_eq!(catalog.get_by_id(1).unwrap().vote_count, u64::from(u32::MAX));
    }

    #[test]
    fn test_duplicate_id_does_not_claim_title() {
        let rows = vec![
            RawMovieRow::new(1, "A", "Drama"),
            RawMovieRow::new(1, "B", "Comedy"),
            RawMovieRow::new(2, "B", "Comedy"),
        ];
        let catalog = Catalog::load(rows).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get_by_id(1).unwrap().title, "A");
        assert_eq!(catalog.get_by_id(2).unwrap().title, "B");
    }

    #[test]
    fn test_sentinel_only_genres_are_kept_with_no_tags() {
        let rows = vec![RawMovieRow::new(1, "Obscure (2010)", "(no genres listed)")];
        let catalog = Catalog::load(rows).unwrap();
        assert!(catalog.get_by_id(1).unwrap().genres.is_empty());
    }

    #[test]
    fn test_load_empty_is_error() {
        assert!(matches!(Catalog::load(vec![]), Err(DataLoadError::EmptyCatalog)));
    }

    #[test]
    fn test_all_genres_sorted_and_unique() {
        let catalog = Catalog::load(sample_rows()).unwrap();
        assert_eq!(
            catalog.all_genres(),
            vec![
                "Action", "Adventure", "Animation", "Children", "Comedy", "Crime", "Fantasy",
                "Thriller"
            ]
        );
    }

    #[test]
    fn test_search_by_title() {
        let catalog = Catalog::load(sample_rows()).unwrap();

        let results = catalog.search_by_title("STORY", 10);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 1);

        // Year suffix is not part of the searchable clean title
        assert!(catalog.search_by_title("1995", 10).is_empty());
        assert!(catalog.search_by_title("a", 10).is_empty());
        assert_eq!(catalog.search_by_title("an", 1).len(), 1);
    }
}
