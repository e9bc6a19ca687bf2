//! Error types for the recommender surface.

use thiserror::Error;

/// Why a recommendation request produced no results
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecommendError {
    /// No catalog is loaded, or the last load failed
    #[error("{0}")]
    CatalogUnavailable(String),

    /// The id or title resolved to nothing
    #[error("{0}")]
    NotFound(String),

    /// The request itself is unusable
    #[error("{0}")]
    InvalidInput(String),
}

impl RecommendError {
    pub fn movie_not_found() -> Self {
        RecommendError::NotFound("Movie not found".to_string())
    }

    pub fn title_not_found(title: &str) -> Self {
        RecommendError::NotFound(format!("Could not find movie: \"{}\"", title))
    }

    pub fn missing_query() -> Self {
        RecommendError::InvalidInput("Please provide a movie ID or title".to_string())
    }
}

/// A catalog and feature index that cannot be paired into a snapshot
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("Catalog genres produced an empty vocabulary")]
    EmptyVocabulary,

    #[error("Feature index covers {features} movies but the catalog holds {catalog}")]
    LengthMismatch { catalog: usize, features: usize },
}
