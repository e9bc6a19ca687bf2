//! # Movie Recommender
//!
//! The caller-owned entry point that ties the pieces together:
//! 1. Read rows from a catalog source
//! 2. Clean and index them into a catalog
//! 3. Build the feature index and freeze both as a snapshot
//! 4. Answer lookups, browse listings and similarity requests against it
//!
//! A failed load leaves the recommender in a "not loaded" state that carries
//! the reason. Every query checks that state first and degrades to an empty
//! result or a `CatalogUnavailable` error; nothing here panics.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use data_loader::{Catalog, CatalogSource, MovieId, MovieQuery, MovieRecord};
use pipeline::BrowseCriteria;

use crate::config::RecommenderConfig;
use crate::error::RecommendError;
use crate::snapshot::CatalogSnapshot;

const NOT_LOADED: &str = "Data not loaded";

/// Outcome of a catalog load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadResult {
    pub loaded: bool,
    pub movie_count: usize,
    pub error: Option<String>,
}

/// One ranked neighbour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// 1-based position in the result list
    pub rank: usize,
    pub movie: MovieRecord,
    /// Cosine similarity as a percentage, one decimal place
    pub score_percent: f64,
}

/// The resolved movie and its nearest neighbours, best first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub selected: MovieRecord,
    pub results: Vec<Recommendation>,
}

/// Flat response envelope for callers that want a single JSON shape.
///
/// On failure `selected_movie` is absent, `recommendations` is empty and
/// `error` carries the message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub selected_movie: Option<MovieRecord>,
    pub recommendations: Vec<Recommendation>,
    pub error: Option<String>,
}

impl From<Result<Recommendations, RecommendError>> for RecommendationResponse {
    fn from(result: Result<Recommendations, RecommendError>) -> Self {
        match result {
            Ok(recs) => Self {
                selected_movie: Some(recs.selected),
                recommendations: recs.results,
                error: None,
            },
            Err(e) => Self {
                selected_movie: None,
                recommendations: Vec::new(),
                error: Some(e.to_string()),
            },
        }
    }
}

/// Scale a cosine score to a percentage rounded to one decimal.
///
/// Never negative, including negative zero.
pub fn score_percent(cosine: f64) -> f64 {
    (cosine.clamp(0.0, 1.0) * 1000.0).round() / 10.0 + 0.0
}

#[derive(Debug, Clone)]
enum LoadState {
    NotLoaded,
    Loaded(Arc<CatalogSnapshot>),
    Failed(String),
}

/// Content-similarity recommender over one loaded catalog
#[derive(Debug, Clone)]
pub struct MovieRecommender {
    config: RecommenderConfig,
    state: LoadState,
}

impl MovieRecommender {
    /// Create an empty recommender; nothing is served until `load_catalog`
    /// succeeds.
    pub fn new(config: RecommenderConfig) -> Self {
        Self {
            config,
            state: LoadState::NotLoaded,
        }
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// Load (or reload) the catalog from `source`.
    ///
    /// The new snapshot replaces the old one only once it is fully built. A
    /// failure discards any previous snapshot and is reported in the result.
    #[instrument(skip(self, source), fields(source = %source.describe()))]
    pub fn load_catalog(&mut self, source: &impl CatalogSource) -> LoadResult {
        let start = Instant::now();

        match Self::build_snapshot(source) {
            Ok(snapshot) => {
                let movie_count = snapshot.len();
                info!(
                    "Loaded {} movies from {} in {:.2?}",
                    movie_count,
                    source.describe(),
                    start.elapsed()
                );
                self.state = LoadState::Loaded(Arc::new(snapshot));
                LoadResult {
                    loaded: true,
                    movie_count,
                    error: None,
                }
            }
            Err(e) => {
                let message = format!("{:#}", e);
                warn!("Catalog load failed: {}", message);
                self.state = LoadState::Failed(message.clone());
                LoadResult {
                    loaded: false,
                    movie_count: 0,
                    error: Some(message),
                }
            }
        }
    }

    fn build_snapshot(source: &impl CatalogSource) -> anyhow::Result<CatalogSnapshot> {
        let rows = source
            .read_rows()
            .with_context(|| format!("Failed to read {}", source.describe()))?;
        let row_count = rows.len();

        let catalog = Catalog::load(rows).context("Failed to build catalog")?;
        info!(
            "Kept {} of {} rows after cleaning",
            catalog.len(),
            row_count
        );

        CatalogSnapshot::build(catalog).context("Failed to build feature index")
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, LoadState::Loaded(_))
    }

    /// Message from the most recent failed load, if that is the current state
    pub fn last_error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Shared handle to the current snapshot
    pub fn snapshot(&self) -> Option<Arc<CatalogSnapshot>> {
        match &self.state {
            LoadState::Loaded(snapshot) => Some(Arc::clone(snapshot)),
            _ => None,
        }
    }

    fn loaded(&self) -> Option<&CatalogSnapshot> {
        match &self.state {
            LoadState::Loaded(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    fn unavailable(&self) -> RecommendError {
        let message = self.last_error().unwrap_or(NOT_LOADED);
        RecommendError::CatalogUnavailable(message.to_string())
    }

    /// Title search for autocomplete; no scoring involved
    pub fn search_by_title(&self, query: &str, limit: usize) -> Vec<MovieRecord> {
        self.loaded()
            .map(|s| s.catalog().search_by_title(query, limit).into_iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn get_movie(&self, id: MovieId) -> Option<MovieRecord> {
        self.loaded()?.catalog().get_by_id(id).cloned()
    }

    /// Find the `k` movies whose genre profile is closest to the query's.
    ///
    /// Numeric ids are looked up directly; titles go through exact, clean
    /// and substring matching in that order.
    #[instrument(skip(self, query))]
    pub fn recommend(
        &self,
        query: impl Into<MovieQuery>,
        k: usize,
    ) -> Result<Recommendations, RecommendError> {
        let query = query.into();
        let snapshot = self.loaded().ok_or_else(|| self.unavailable())?;

        let ordinal = match &query {
            MovieQuery::Title(title) if title.trim().is_empty() => {
                return Err(RecommendError::missing_query());
            }
            MovieQuery::Id(_) => snapshot
                .catalog()
                .resolve(&query)
                .ok_or_else(RecommendError::movie_not_found)?,
            MovieQuery::Title(title) => snapshot
                .catalog()
                .resolve(&query)
                .ok_or_else(|| RecommendError::title_not_found(title))?,
        };

        let selected = snapshot
            .catalog()
            .get_by_ordinal(ordinal)
            .cloned()
            .ok_or_else(RecommendError::movie_not_found)?;

        let results: Vec<Recommendation> = snapshot
            .similar_to(ordinal, k)
            .into_iter()
            .enumerate()
            .map(|(i, (movie, scored))| Recommendation {
                rank: i + 1,
                movie: movie.clone(),
                score_percent: score_percent(scored.score),
            })
            .collect();

        info!(
            "Recommended {} movies for {} ({})",
            results.len(),
            query,
            selected.title
        );

        Ok(Recommendations { selected, results })
    }

    /// `recommend` with the configured default result count
    pub fn recommend_default(
        &self,
        query: impl Into<MovieQuery>,
    ) -> Result<Recommendations, RecommendError> {
        self.recommend(query, self.config.default_k)
    }

    pub fn browse(&self, criteria: &BrowseCriteria) -> Vec<MovieRecord> {
        self.loaded()
            .map(|s| cloned(pipeline::browse(s.catalog(), criteria)))
            .unwrap_or_default()
    }

    pub fn list_genres(&self) -> Vec<String> {
        self.loaded()
            .map(|s| s.catalog().all_genres())
            .unwrap_or_default()
    }

    pub fn popular_movies(&self, limit: usize) -> Vec<MovieRecord> {
        self.loaded()
            .map(|s| cloned(pipeline::popular(s.catalog(), limit)))
            .unwrap_or_default()
    }

    pub fn top_rated_movies(&self, limit: usize) -> Vec<MovieRecord> {
        self.loaded()
            .map(|s| cloned(pipeline::top_rated(s.catalog(), limit)))
            .unwrap_or_default()
    }

    pub fn movies_by_genre(&self, genre: &str, limit: usize) -> Vec<MovieRecord> {
        self.loaded()
            .map(|s| cloned(pipeline::by_genre(s.catalog(), genre, limit)))
            .unwrap_or_default()
    }
}

impl Default for MovieRecommender {
    fn default() -> Self {
        Self::new(RecommenderConfig::default())
    }
}

fn cloned(movies: Vec<&MovieRecord>) -> Vec<MovieRecord> {
    movies.into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{DataLoadError, RawMovieRow};

    fn toy_rows() -> Vec<RawMovieRow> {
        vec![
            RawMovieRow::new(1, "Toy Story (1995)", "Animation|Children|Comedy"),
            RawMovieRow::new(2, "Jumanji (1995)", "Adventure|Children|Fantasy"),
            RawMovieRow::new(3, "Heat (1995)", "Action|Crime|Thriller"),
        ]
    }

    fn loaded_recommender() -> MovieRecommender {
        let mut recommender = MovieRecommender::default();
        let result = recommender.load_catalog(&toy_rows());
        assert!(result.loaded, "load failed: {:?}", result.error);
        recommender
    }

    struct BrokenSource;

    impl CatalogSource for BrokenSource {
        fn describe(&self) -> String {
            "broken source".to_string()
        }

        fn read_rows(&self) -> data_loader::Result<Vec<RawMovieRow>> {
            Err(DataLoadError::MissingColumns {
                missing: "genres".to_string(),
            })
        }
    }

    #[test]
    fn test_score_percent_rounding() {
        assert_eq!(score_percent(1.0), 100.0);
        assert_eq!(score_percent(0.12345), 12.3);
        assert_eq!(score_percent(0.6666), 66.7);
        assert_eq!(score_percent(-0.2), 0.0);
        assert_eq!(score_percent(1.0000000002), 100.0);
        assert!(score_percent(-0.0).is_sign_positive());
        assert!(score_percent(-0.2).is_sign_positive());
    }

    #[test]
    fn test_load_reports_count() {
        let mut recommender = MovieRecommender::default();
        assert!(!recommender.is_loaded());

        let result = recommender.load_catalog(&toy_rows());
        assert_eq!(
            result,
            LoadResult {
                loaded: true,
                movie_count: 3,
                error: None
            }
        );
        assert!(recommender.is_loaded());
        assert!(recommender.last_error().is_none());
    }

    #[test]
    fn test_failed_load_is_sticky_until_reload() {
        let mut recommender = loaded_recommender();

        let result = recommender.load_catalog(&BrokenSource);
        assert!(!result.loaded);
        let message = result.error.unwrap();
        assert!(message.contains("broken source"));
        assert!(message.contains("genres"));

        assert!(!recommender.is_loaded());
        assert!(recommender.snapshot().is_none());
        assert_eq!(
            recommender.recommend(1u32, 5).unwrap_err(),
            RecommendError::CatalogUnavailable(message)
        );

        assert!(recommender.load_catalog(&toy_rows()).loaded);
        assert!(recommender.recommend(1u32, 5).is_ok());
    }

    #[test]
    fn test_recommend_error_messages() {
        let recommender = loaded_recommender();

        assert_eq!(
            recommender.recommend(99u32, 5).unwrap_err().to_string(),
            "Movie not found"
        );
        assert_eq!(
            recommender.recommend("Casablanca", 5).unwrap_err().to_string(),
            "Could not find movie: \"Casablanca\""
        );
        assert_eq!(
            recommender.recommend("   ", 5).unwrap_err(),
            RecommendError::missing_query()
        );
    }

    #[test]
    fn test_recommend_ranks_from_one() {
        let recommender = loaded_recommender();
        let recs = recommender.recommend("toy story", 2).unwrap();

        assert_eq!(recs.selected.id, 1);
        let ranks: Vec<usize> = recs.results.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2]);
        assert_eq!(recs.results[0].movie.id, 2);
    }

    #[test]
    fn test_response_envelope() {
        let recommender = loaded_recommender();

        let ok = RecommendationResponse::from(recommender.recommend(1u32, 1));
        assert_eq!(ok.selected_movie.map(|m| m.id), Some(1));
        assert_eq!(ok.recommendations.len(), 1);
        assert!(ok.error.is_none());

        let err = RecommendationResponse::from(recommender.recommend(42u32, 1));
        assert!(err.selected_movie.is_none());
        assert!(err.recommendations.is_empty());
        assert_eq!(err.error.as_deref(), Some("Movie not found"));
    }

    #[test]
    fn test_unloaded_queries_are_empty() {
        let recommender = MovieRecommender::default();

        assert!(recommender.search_by_title("toy", 8).is_empty());
        assert!(recommender.get_movie(1).is_none());
        assert!(recommender.browse(&BrowseCriteria::default()).is_empty());
        assert!(recommender.list_genres().is_empty());
        assert!(recommender.popular_movies(10).is_empty());
        assert_eq!(
            recommender.recommend(1u32, 5).unwrap_err(),
            RecommendError::CatalogUnavailable("Data not loaded".to_string())
        );
    }
}
