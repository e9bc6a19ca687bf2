//! Server crate for the ReelMatch recommendation engine.
//!
//! This crate contains the caller-owned `MovieRecommender` that loads a
//! catalog, freezes it with its feature index into a `CatalogSnapshot`, and
//! answers lookup, browse and similarity requests against it. Poster
//! resolution lives alongside it as a separate collaborator.

pub mod config;
pub mod error;
pub mod posters;
pub mod recommender;
pub mod snapshot;

pub use config::RecommenderConfig;
pub use error::{RecommendError, SnapshotError};
pub use posters::{CachedPosters, PlaceholderPosters, PosterResolver};
pub use recommender::{
    score_percent, LoadResult, MovieRecommender, Recommendation, RecommendationResponse,
    Recommendations,
};
pub use snapshot::CatalogSnapshot;
