//! End-to-end tests for the recommender.
//!
//! These load small catalogs through the public surface and check the
//! ranking guarantees callers rely on.

use std::io::Write;
use std::sync::Arc;

use data_loader::{Catalog, CsvCatalogSource, MovieQuery, RawMovieRow};
use pipeline::{BrowseCriteria, SortKey};
use server::{
    CatalogSnapshot, MovieRecommender, RecommendError, RecommendationResponse, RecommenderConfig,
};

fn toy_rows() -> Vec<RawMovieRow> {
    vec![
        RawMovieRow::new(1, "Toy Story (1995)", "Animation|Children|Comedy"),
        RawMovieRow::new(2, "Jumanji (1995)", "Adventure|Children|Fantasy"),
        RawMovieRow::new(3, "Heat (1995)", "Action|Crime|Thriller"),
    ]
}

fn mixed_rows() -> Vec<RawMovieRow> {
    vec![
        RawMovieRow::new(1, "Toy Story (1995)", "Adventure|Animation|Children|Comedy|Fantasy"),
        RawMovieRow::new(2, "Jumanji (1995)", "Adventure|Children|Fantasy"),
        RawMovieRow::new(3, "Grumpier Old Men (1995)", "Comedy|Romance"),
        RawMovieRow::new(4, "Waiting to Exhale (1995)", "Comedy|Drama|Romance"),
        RawMovieRow::new(5, "Father of the Bride Part II (1995)", "Comedy"),
        RawMovieRow::new(6, "Heat (1995)", "Action|Crime|Thriller"),
        RawMovieRow::new(7, "Sabrina (1995)", "Comedy|Romance"),
        RawMovieRow::new(8, "Tom and Huck (1995)", "Adventure|Children"),
        RawMovieRow::new(9, "Sudden Death (1995)", "Action"),
        RawMovieRow::new(10, "GoldenEye (1995)", "Action|Adventure|Thriller"),
        RawMovieRow::new(11, "Casino (1995)", "Crime|Drama"),
        RawMovieRow::new(12, "Grumpy Old Men (1993)", "Comedy|Romance"),
        RawMovieRow::new(13, "Cutthroat Island (1995)", "Action|Adventure|Romance"),
        RawMovieRow::new(14, "Film Noir Classic (1946)", "Film-Noir|Mystery"),
    ]
}

fn loaded(rows: Vec<RawMovieRow>) -> MovieRecommender {
    let mut recommender = MovieRecommender::new(RecommenderConfig::default());
    let result = recommender.load_catalog(&rows);
    assert!(result.loaded, "load failed: {:?}", result.error);
    recommender
}

#[test]
fn test_toy_story_scenario() {
    let recommender = loaded(toy_rows());
    let recs = recommender.recommend(1u32, 2).unwrap();

    assert_eq!(recs.selected.id, 1);
    assert_eq!(recs.results.len(), 2);
    assert_eq!(recs.results[0].movie.id, 2);
    assert_eq!(recs.results[1].movie.id, 3);
    assert!(recs.results[1].score_percent < recs.results[0].score_percent);
    assert_eq!(recs.results[1].score_percent, 0.0);
}

#[test]
fn test_build_is_deterministic() {
    let first = CatalogSnapshot::build(Catalog::load(mixed_rows()).unwrap()).unwrap();
    let second = CatalogSnapshot::build(Catalog::load(mixed_rows()).unwrap()).unwrap();

    assert_eq!(
        first.features().terms().collect::<Vec<_>>(),
        second.features().terms().collect::<Vec<_>>()
    );
    for (a, b) in first.features().vectors().iter().zip(second.features().vectors()) {
        assert_eq!(a.entries().len(), b.entries().len());
        for ((ta, wa), (tb, wb)) in a.entries().iter().zip(b.entries()) {
            assert_eq!(ta, tb);
            assert!((wa - wb).abs() < 1e-9);
        }
    }

    let recommender_a = loaded(mixed_rows());
    let recommender_b = loaded(mixed_rows());
    for id in 1..=14u32 {
        assert_eq!(
            recommender_a.recommend(id, 5).unwrap(),
            recommender_b.recommend(id, 5).unwrap()
        );
    }
}

#[test]
fn test_never_recommends_itself() {
    let recommender = loaded(mixed_rows());
    for id in 1..=14u32 {
        let recs = recommender.recommend(id, 100).unwrap();
        assert!(recs.results.iter().all(|r| r.movie.id != id), "movie {} recommended itself", id);
    }
}

#[test]
fn test_result_count_is_min_of_k_and_others() {
    let recommender = loaded(mixed_rows());
    let n = 14;
    for k in [0, 1, 5, 13, 14, 50] {
        let recs = recommender.recommend(3u32, k).unwrap();
        assert_eq!(recs.results.len(), k.min(n - 1));
    }
}

#[test]
fn test_scores_in_range_and_sorted() {
    let recommender = loaded(mixed_rows());
    for id in 1..=14u32 {
        let recs = recommender.recommend(id, 20).unwrap();
        for r in &recs.results {
            assert!((0.0..=100.0).contains(&r.score_percent));
        }
        for pair in recs.results.windows(2) {
            assert!(pair[0].score_percent >= pair[1].score_percent);
            assert_eq!(pair[0].rank + 1, pair[1].rank);
        }
    }
}

#[test]
fn test_ties_keep_catalog_order() {
    let recommender = loaded(mixed_rows());
    let snapshot = recommender.snapshot().unwrap();

    // Grumpier Old Men, Sabrina and Grumpy Old Men share "Comedy|Romance"
    let query = snapshot.catalog().ordinal_of(3).unwrap();
    let ranked = snapshot.engine().recommend(query, 20);

    assert_eq!(snapshot.catalog().get_by_ordinal(ranked[0].ordinal).map(|m| m.id), Some(7));
    assert_eq!(snapshot.catalog().get_by_ordinal(ranked[1].ordinal).map(|m| m.id), Some(12));

    for pair in ranked.windows(2) {
        assert!(pair[0].score >= pair[1].score);
        if pair[0].score == pair[1].score {
            assert!(pair[0].ordinal < pair[1].ordinal);
        }
    }
}

#[test]
fn test_genreless_movie_scores_zero_in_catalog_order() {
    let recommender = loaded(vec![
        RawMovieRow::new(1, "Query", "Drama"),
        RawMovieRow::new(2, "Untagged", "(no genres listed)"),
        RawMovieRow::new(3, "Other", "Comedy"),
    ]);

    let recs = recommender.recommend(1u32, 5).unwrap();
    assert_eq!(recs.results.iter().map(|r| r.movie.id).collect::<Vec<_>>(), vec![2, 3]);
    assert!(recs.results.iter().all(|r| r.score_percent.is_sign_positive()));

    let json = serde_json::to_string(&RecommendationResponse::from(Ok::<_, RecommendError>(recs))).unwrap();
    assert!(!json.contains("-0.0"));
}

#[test]
fn test_exact_title_beats_substring() {
    let recommender = loaded(vec![
        RawMovieRow::new(20, "Heatwave (2001)", "Drama"),
        RawMovieRow::new(21, "Heat (1995)", "Action|Crime|Thriller"),
        RawMovieRow::new(22, "Heat (1986)", "Action|Drama"),
    ]);

    assert_eq!(recommender.recommend("Heat (1995)", 1).unwrap().selected.id, 21);
    assert_eq!(recommender.recommend("heat (1986)", 1).unwrap().selected.id, 22);
    assert_eq!(recommender.recommend("heat", 1).unwrap().selected.id, 21);
    assert_eq!(recommender.recommend("wave", 1).unwrap().selected.id, 20);

    // An all-digit query is an id, never a title
    assert_eq!(recommender.recommend(MovieQuery::parse("22"), 1).unwrap().selected.id, 22);
}

#[test]
fn test_missing_attributes_get_defaults() {
    let recommender = loaded(vec![
        RawMovieRow::new(1, "Plain (2000)", "Action|Adventure|(no genres listed)"),
        RawMovieRow::new(2, "Rated (2001)", "Drama").with_rating(6.5).with_vote_count(42),
    ]);

    let plain = recommender.get_movie(1).unwrap();
    assert_eq!(plain.rating, 7.0);
    assert_eq!(plain.vote_count, 1000);
    assert_eq!(plain.popularity, 50.0);
    assert_eq!(plain.overview, "A great movie to watch!");
    assert_eq!(plain.genres, vec!["Action", "Adventure"]);
    assert_eq!(plain.year, Some(2000));

    let rated = recommender.get_movie(2).unwrap();
    assert_eq!(rated.rating, 6.5);
    assert_eq!(rated.vote_count, 42);
}

#[test]
fn test_empty_catalog_is_unavailable() {
    let mut recommender = MovieRecommender::default();
    let result = recommender.load_catalog(&Vec::<RawMovieRow>::new());

    assert!(!result.loaded);
    assert!(result.error.as_deref().unwrap_or_default().contains("no usable movies"));

    let outcome = recommender.recommend(1u32, 20);
    assert!(matches!(outcome, Err(RecommendError::CatalogUnavailable(_))));

    let response = RecommendationResponse::from(outcome);
    assert!(response.recommendations.is_empty());
    assert!(response.error.is_some());
}

#[test]
fn test_response_json_shape() {
    let recommender = loaded(toy_rows());

    let ok = serde_json::to_value(RecommendationResponse::from(recommender.recommend(1u32, 2))).unwrap();
    assert_eq!(ok["selected_movie"]["clean_title"], "Toy Story");
    assert_eq!(ok["recommendations"][0]["rank"], 1);
    assert_eq!(ok["recommendations"][0]["movie"]["id"], 2);
    assert!(ok["error"].is_null());

    let err = serde_json::to_value(RecommendationResponse::from(recommender.recommend("Vertigo", 2))).unwrap();
    assert_eq!(err["error"], "Could not find movie: \"Vertigo\"");
    assert_eq!(err["recommendations"].as_array().map(Vec::len), Some(0));
}

#[test]
fn test_load_from_csv_with_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("movies.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "movieId,title,genres,rating,popularity,runtime").unwrap();
    writeln!(file, "1,Toy Story (1995),Animation|Children|Comedy,8.3,90,81").unwrap();
    writeln!(file, "2,Jumanji (1995),Adventure|Children|Fantasy,7.0,70,104").unwrap();
    writeln!(file, "3,Heat (1995),Action|Crime|Thriller,8.3,60,170").unwrap();
    writeln!(file, "4,Toy Story (1995),Animation,5.0,1,1").unwrap();
    drop(file);

    let source = CsvCatalogSource::new(dir.path().join("missing.csv")).with_fallback(&path);
    let mut recommender = MovieRecommender::default();
    let result = recommender.load_catalog(&source);

    assert!(result.loaded, "{:?}", result.error);
    assert_eq!(result.movie_count, 3);
    assert_eq!(recommender.list_genres().len(), 8);

    let long = recommender.browse(
        &BrowseCriteria::new()
            .with_runtime("long".parse().unwrap())
            .with_sort(SortKey::Rating),
    );
    assert_eq!(long.iter().map(|m| m.id).collect::<Vec<_>>(), vec![3]);

    assert_eq!(recommender.search_by_title("story", 8).len(), 1);
    assert!(recommender.search_by_title("s", 8).is_empty());
    assert_eq!(recommender.popular_movies(1)[0].id, 1);
    assert_eq!(recommender.movies_by_genre("Children", 10).len(), 2);
}

#[test]
fn test_missing_sources_report_error() {
    let dir = tempfile::tempdir().unwrap();
    let source = CsvCatalogSource::new(dir.path().join("a.csv")).with_fallback(dir.path().join("b.csv"));

    let mut recommender = MovieRecommender::default();
    let result = recommender.load_catalog(&source);

    assert!(!result.loaded);
    assert_eq!(recommender.last_error(), result.error.as_deref());
    assert!(recommender.browse(&BrowseCriteria::default()).is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_readers_share_snapshot() {
    let recommender = Arc::new(loaded(mixed_rows()));
    let expected = recommender.recommend(1u32, 5).unwrap();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let recommender = Arc::clone(&recommender);
        handles.push(tokio::task::spawn_blocking(move || recommender.recommend(1u32, 5)));
    }

    for handle in handles {
        let recs = handle.await.unwrap().unwrap();
        assert_eq!(recs, expected);
    }
}
