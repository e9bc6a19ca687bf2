use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{CsvCatalogSource, MovieId, MovieQuery, MovieRecord};
use pipeline::{BrowseCriteria, RuntimeBucket, SortKey};
use rand::Rng;
use server::{
    CachedPosters, MovieRecommender, PlaceholderPosters, Recommendation, RecommendationResponse,
    RecommenderConfig,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

/// ReelMatch - Genre similarity movie recommender
#[derive(Parser)]
#[command(name = "reel-match")]
#[command(about = "Find movies with a similar genre profile", long_about = None)]
struct Cli {
    /// Catalog CSV file; repeat to give fallbacks, tried in order
    #[arg(
        short,
        long = "catalog",
        default_values = ["tmdb_movies_processed.csv", "movies_with_posters.csv", "movies.csv"]
    )]
    catalogs: Vec<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend movies similar to one movie
    Recommend {
        /// Movie ID to start from
        #[arg(long, conflicts_with = "title", required_unless_present = "title")]
        id: Option<MovieId>,

        /// Movie title to start from (exact, then partial match)
        #[arg(long)]
        title: Option<String>,

        /// Number of recommendations to return
        #[arg(long)]
        limit: Option<usize>,

        /// Print the response as JSON
        #[arg(long)]
        json: bool,

        /// Show a poster URL for each movie
        #[arg(long)]
        posters: bool,
    },

    /// Search for movies by title
    Search {
        /// Title fragment (case-insensitive, at least 2 characters)
        #[arg(long)]
        title: String,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show one movie
    Movie {
        #[arg(long)]
        id: MovieId,
    },

    /// Filter and sort the catalog
    Browse {
        #[arg(long)]
        year_from: Option<u16>,

        #[arg(long)]
        year_to: Option<u16>,

        #[arg(long, default_value = "0")]
        min_rating: f64,

        /// short, medium, long or epic
        #[arg(long)]
        runtime: Option<RuntimeBucket>,

        #[arg(long)]
        genre: Option<String>,

        /// popularity, rating, year_desc, year_asc or title
        #[arg(long, default_value = "popularity")]
        sort: String,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// List every genre in the catalog
    Genres,

    /// Most popular movies
    Popular {
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut recommender = MovieRecommender::new(RecommenderConfig::default());
    let source = CsvCatalogSource::from_paths(cli.catalogs);

    let start = Instant::now();
    let load = recommender.load_catalog(&source);
    if !load.loaded {
        bail!(
            "Failed to load movie catalog: {}",
            load.error.unwrap_or_else(|| "unknown error".to_string())
        );
    }
    eprintln!(
        "{} Loaded {} movies in {:?}",
        "✓".green(),
        load.movie_count,
        start.elapsed()
    );

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend {
            id,
            title,
            limit,
            json,
            posters,
        } => {
            let query = match (id, title) {
                (Some(id), _) => MovieQuery::Id(id),
                (None, Some(title)) => MovieQuery::Title(title),
                (None, None) => bail!("Please provide a movie ID or title"),
            };
            handle_recommend(&recommender, query, limit, json, posters)?
        }
        Commands::Search { title, limit } => handle_search(&recommender, &title, limit),
        Commands::Movie { id } => handle_movie(&recommender, id)?,
        Commands::Browse {
            year_from,
            year_to,
            min_rating,
            runtime,
            genre,
            sort,
            limit,
        } => {
            let mut criteria = BrowseCriteria::new()
                .with_years(year_from, year_to)
                .with_min_rating(min_rating)
                .with_sort(SortKey::parse(&sort))
                .with_limit(limit.unwrap_or(recommender.config().browse_limit));
            if let Some(bucket) = runtime {
                criteria = criteria.with_runtime(bucket);
            }
            if let Some(genre) = genre {
                criteria = criteria.with_genre(genre);
            }
            handle_browse(&recommender, &criteria)
        }
        Commands::Genres => handle_genres(&recommender),
        Commands::Popular { limit } => {
            print_movies("Popular movies:", &recommender.popular_movies(limit))
        }
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(recommender, requests, concurrent).await?,
    }

    Ok(())
}

/// Handle the 'recommend' command
fn handle_recommend(
    recommender: &MovieRecommender,
    query: MovieQuery,
    limit: Option<usize>,
    json: bool,
    posters: bool,
) -> Result<()> {
    let k = limit.unwrap_or(recommender.config().default_k);
    let result = recommender.recommend(query, k);

    if json {
        let response = RecommendationResponse::from(result);
        let text = serde_json::to_string_pretty(&response)
            .context("Failed to serialize recommendations")?;
        println!("{}", text);
        return Ok(());
    }

    let recs = result.map_err(|e| anyhow!("{}", e))?;
    let mut poster_cache = posters.then(|| {
        CachedPosters::new(PlaceholderPosters, recommender.config().poster_cache_capacity)
    });

    println!(
        "{} {}",
        "Because you picked".bold().blue(),
        display_title(&recs.selected).bold()
    );
    if let Some(cache) = poster_cache.as_mut() {
        println!("   Poster: {}", cache.get(&recs.selected));
    }
    println!();

    print_recommendations(&recs.results);
    if let Some(cache) = poster_cache.as_mut() {
        println!();
        for rec in &recs.results {
            println!("{}. {}", rec.rank, cache.get(&rec.movie));
        }
    }
    Ok(())
}

/// Handle the 'search' command
fn handle_search(recommender: &MovieRecommender, title: &str, limit: Option<usize>) {
    let limit = limit.unwrap_or(recommender.config().search_limit);
    let matches = recommender.search_by_title(title, limit);
    print_movies(&format!("Search results for '{}':", title), &matches);
}

/// Handle the 'movie' command
fn handle_movie(recommender: &MovieRecommender, id: MovieId) -> Result<()> {
    let movie = recommender
        .get_movie(id)
        .ok_or_else(|| anyhow!("Movie {} not found", id))?;

    println!("{}", display_title(&movie).bold().blue());
    println!("{}Genres: {}", "• ".green(), movie.genres.join(", "));
    println!(
        "{}Rating: {:.1} ({} votes)",
        "• ".green(),
        movie.rating,
        movie.vote_count
    );
    println!("{}Popularity: {:.1}", "• ".green(), movie.popularity);
    if let Some(runtime) = movie.runtime {
        println!("{}Runtime: {} min", "• ".green(), runtime);
    }
    println!("{}{}", "• ".cyan(), movie.overview);
    Ok(())
}

/// Handle the 'browse' command
fn handle_browse(recommender: &MovieRecommender, criteria: &BrowseCriteria) {
    let movies = recommender.browse(criteria);
    print_movies(&format!("Browse (sorted by {}):", criteria.sort), &movies);
}

/// Handle the 'genres' command
fn handle_genres(recommender: &MovieRecommender) {
    println!("{}", "Genres:".bold().blue());
    for genre in recommender.list_genres() {
        println!("  - {}", genre);
    }
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    recommender: MovieRecommender,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    let snapshot = recommender
        .snapshot()
        .ok_or_else(|| anyhow!("Catalog not loaded"))?;
    let ids: Vec<MovieId> = snapshot.catalog().iter().map(|m| m.id).collect();
    if ids.is_empty() {
        bail!("Catalog is empty");
    }

    // Pick random movies from the catalog
    let mut rng = rand::rng();
    let picks: Vec<MovieId> = (0..requests)
        .map(|_| ids[rng.random_range(0..ids.len())])
        .collect();

    let recommender = Arc::new(recommender);
    let permits = Arc::new(Semaphore::new(concurrent.max(1)));
    let wall_clock = Instant::now();

    let mut handles = vec![];
    for id in picks {
        let recommender = Arc::clone(&recommender);
        let permits = Arc::clone(&permits);
        let handle = tokio::spawn(async move {
            let _permit = permits.acquire_owned().await?;
            let start = Instant::now();
            tokio::task::spawn_blocking(move || recommender.recommend(id, 20))
                .await
                .context("Recommend task panicked")??;
            Ok::<_, anyhow::Error>(start.elapsed())
        });
        handles.push(handle);
    }

    // Wait for all tasks to complete and collect timings
    let mut timings = vec![];
    for handle in handles {
        let elapsed = handle.await??;
        timings.push(elapsed);
    }
    let total_time = wall_clock.elapsed();

    if timings.is_empty() {
        println!("No requests made");
        return Ok(());
    }

    let busy: Duration = timings.iter().sum();
    let avg_latency = busy / (timings.len() as u32);
    timings.sort();
    let percentile = |p: f64| timings[((timings.len() as f64 * p) as usize).min(timings.len() - 1)];
    let throughput = requests as f64 / total_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

fn display_title(movie: &MovieRecord) -> String {
    match movie.year {
        Some(year) if !movie.title.contains(&format!("({})", year)) => {
            format!("{} ({})", movie.title, year)
        }
        _ => movie.title.clone(),
    }
}

fn print_movies(header: &str, movies: &[MovieRecord]) {
    println!("{}", header.bold().blue());
    if movies.is_empty() {
        println!("  (no movies)");
    }
    for movie in movies {
        println!(
            "{}: {} [{}] {:.1}",
            movie.id.to_string().green(),
            display_title(movie),
            movie.genres.join(", "),
            movie.rating
        );
    }
}

/// Helper function to format and print recommendations
fn print_recommendations(recommendations: &[Recommendation]) {
    println!("{}", "Similar movies:".bold().blue());
    for rec in recommendations {
        println!(
            "{}. {} [{}] - Match: {:.1}%",
            rec.rank.to_string().green(),
            display_title(&rec.movie),
            rec.movie.genres.join(", "),
            rec.score_percent
        );
    }
}
