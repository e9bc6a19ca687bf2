//! Filter to keep only movies tagged with a genre.

use crate::traits::Filter;
use data_loader::MovieRecord;

/// Keeps records whose genre tags contain `genre` (exact, case-sensitive).
pub struct GenreFilter {
    genre: String,
}

impl GenreFilter {
    pub fn new(genre: impl Into<String>) -> Self {
        Self {
            genre: genre.into(),
        }
    }
}

impl Filter for GenreFilter {
    fn name(&self) -> &str {
        "GenreFilter"
    }

    fn apply<'a>(&self, movies: Vec<&'a MovieRecord>) -> Vec<&'a MovieRecord> {
        movies
            .into_iter()
            .filter(|movie| movie.genres.iter().any(|g| *g == self.genre))
            .collect()
    }
}
