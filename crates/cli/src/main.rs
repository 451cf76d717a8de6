use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use data_loader::{DataIndex, MovieId, UserId};
use graph::{GraphStore, InMemoryGraph};
use rand::Rng;
use recommender::{Aggregates, Recommendation, Recommender, Strategy};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{info, warn};

/// ReelGraph - explainable movie recommendations over a rating graph
#[derive(Parser)]
#[command(name = "reel-graph")]
#[command(about = "Graph-based movie recommendations with explanations", long_about = None)]
struct Cli {
    /// Path to MovieLens dataset directory
    #[arg(short, long, default_value = "data/ml-latest-small")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get movie recommendations
    Recommend {
        #[command(subcommand)]
        strategy: RecommendCommand,
    },

    /// Create users and manage liked movies
    User {
        #[command(subcommand)]
        action: UserCommand,
    },

    /// Search for movies by title
    Search {
        /// Movie title to search for (case-insensitive substring match)
        #[arg(long)]
        title: String,
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

#[derive(Subcommand)]
enum RecommendCommand {
    /// Movies rated by users who rated what you rated
    Collaborative {
        #[arg(long)]
        user_id: UserId,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Movies rated by people who rated the given movies
    Movies {
        /// Comma-separated seed movie IDs, e.g. 82,74,118
        #[arg(long, value_delimiter = ',', required = true)]
        movie_ids: Vec<MovieId>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Unrated movies sharing your genres or tags
    Hybrid {
        #[arg(long)]
        user_id: UserId,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Number of recommendations to return (default: 10)
    #[arg(long)]
    limit: Option<usize>,

    /// Print recommendations as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum UserCommand {
    /// Create a new user with a random ID
    Create,

    /// Add a movie to a user's liked movies
    Like {
        #[arg(long)]
        user_id: UserId,
        #[arg(long)]
        movie_id: MovieId,
    },

    /// Remove a movie from a user's liked movies
    Unlike {
        #[arg(long)]
        user_id: UserId,
        #[arg(long)]
        movie_id: MovieId,
    },

    /// List a user's liked movies
    Likes {
        #[arg(long)]
        user_id: UserId,
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

    // Load data index (this may take a moment)
    println!("Loading MovieLens dataset from {}...", cli.data_dir.display());
    let start = Instant::now();
    let data_index = DataIndex::load_from_dir(&cli.data_dir)
        .context("Failed to load MovieLens dataset")?;
    println!("{} Loaded dataset in {:?}", "✓".green(), start.elapsed());

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend { strategy } => {
            let store = InMemoryGraph::new(Arc::new(data_index));
            handle_recommend(&store, strategy)?
        }
        Commands::User { action } => handle_user(data_index, &cli.data_dir, action)?,
        Commands::Search { title } => handle_search(&data_index, &title),
        Commands::Benchmark {
            requests,
            concurrent,
        } => {
            let store = InMemoryGraph::new(Arc::new(data_index));
            handle_benchmark(store, requests, concurrent).await?
        }
    }

    Ok(())
}

/// Handle the 'recommend' command
fn handle_recommend(store: &InMemoryGraph, command: RecommendCommand) -> Result<()> {
    let (strategy, output) = match command {
        RecommendCommand::Collaborative { user_id, output } => {
            (Strategy::PeerCollaborative { user_id }, output)
        }
        RecommendCommand::Movies { movie_ids, output } => {
            for &movie_id in &movie_ids {
                if store.index().get_movie(movie_id).is_none() {
                    warn!("Seed movie {} is not in the catalogue", movie_id);
                }
            }
            (Strategy::SeedMovie { movie_ids }, output)
        }
        RecommendCommand::Hybrid { user_id, output } => {
            (Strategy::GenreTagHybrid { user_id }, output)
        }
    };

    let recommender = Recommender::new();
    let mut session = store
        .open_session()
        .context("Failed to open graph session")?;
    let start = Instant::now();
    let recommendations = recommender
        .recommend(session.as_mut(), &strategy, output.limit)
        .context("Invalid recommendation request")?;
    info!("Recommended {} movies in {:.2?}", recommendations.len(), start.elapsed());

    if output.json {
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
    } else {
        print_recommendations(&strategy, &recommendations);
    }
    Ok(())
}

/// Handle the 'user' command; changes are saved back to the data directory
fn handle_user(mut data_index: DataIndex, data_dir: &Path, action: UserCommand) -> Result<()> {
    match action {
        UserCommand::Create => {
            let user_id = data_index.create_user(&mut rand::rng())?;
            data_index.save_user_data(data_dir)?;
            println!("{} New user created with ID: {}", "✓".green(), user_id);
        }
        UserCommand::Like { user_id, movie_id } => {
            if data_index.add_like(user_id, movie_id)? {
                data_index.save_user_data(data_dir)?;
                println!("Added Movie ID {} to liked movies for User ID {}", movie_id, user_id);
            } else {
                println!("User ID {} already likes Movie ID {}", user_id, movie_id);
            }
        }
        UserCommand::Unlike { user_id, movie_id } => {
            if data_index.remove_like(user_id, movie_id) {
                data_index.save_user_data(data_dir)?;
                println!("Removed Movie ID {} from liked movies for User ID {}", movie_id, user_id);
            } else {
                println!("User ID {} does not like Movie ID {}", user_id, movie_id);
            }
        }
        UserCommand::Likes { user_id } => {
            if !data_index.has_user(user_id) {
                return Err(anyhow!("User {} not found", user_id));
            }
            let liked = data_index.liked_movies(user_id);
            if liked.is_empty() {
                println!("\nNo liked movies found.");
            } else {
                println!("{}", "\nLiked Movies:".bold().blue());
                for (i, movie) in liked.iter().enumerate() {
                    println!("{}. {} (MovieID: {})", i + 1, movie.title, movie.id);
                }
            }
        }
    }
    Ok(())
}

/// Handle the 'search' command
fn handle_search(data_index: &DataIndex, title: &str) {
    let title_lower = title.to_lowercase();
    // (relevance, avg rating, movie id); exact matches rank first
    let mut matches: Vec<(u8, f32, MovieId)> = data_index
        .movie_ids()
        .into_iter()
        .filter_map(|movie_id| {
            let movie = data_index.get_movie(movie_id)?;
            let movie_title_lower = movie.title.to_lowercase();
            let relevance = if movie_title_lower == title_lower {
                0
            } else if movie_title_lower.contains(&title_lower) {
                1
            } else {
                return None;
            };
            let avg_rating = data_index
                .get_movie_stats(movie_id)
                .map(|s| s.avg_rating)
                .unwrap_or(0.0);
            Some((relevance, avg_rating, movie_id))
        })
        .collect();

    matches.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| b.1.total_cmp(&a.1)));

    println!("{}", format!("Search results for '{}':", title).bold().blue());
    for &(_, avg_rating, movie_id) in matches.iter().take(20) {
        let Some(movie) = data_index.get_movie(movie_id) else {
            continue;
        };
        let rating_count = data_index
            .get_movie_stats(movie_id)
            .map(|s| s.rating_count)
            .unwrap_or(0);
        println!(
            "{}: {} [{}] avg {:.2} ({} ratings)",
            movie_id,
            movie.title,
            movie.genres.join(", "),
            avg_rating,
            rating_count
        );
    }
}

/// Handle the 'benchmark' command
///
/// Fires peer-collaborative requests for random users, each on its own
/// read session, with at most `concurrent` in flight.
async fn handle_benchmark(store: InMemoryGraph, requests: usize, concurrent: usize) -> Result<()> {
    let users: Vec<UserId> = store.index().user_ids().collect();
    if users.is_empty() || requests == 0 {
        return Err(anyhow!("Nothing to benchmark: dataset has no users or zero requests"));
    }

    let mut rng = rand::rng();
    let user_ids: Vec<UserId> = (0..requests)
        .map(|_| users[rng.random_range(0..users.len())])
        .collect();

    let recommender = Recommender::new();
    let permits = Arc::new(Semaphore::new(concurrent.max(1)));
    let wall_clock = Instant::now();

    let mut handles = vec![];
    for user_id in user_ids {
        let store = store.clone();
        let recommender = recommender.clone();
        let permits = permits.clone();
        let handle = tokio::spawn(async move {
            let _permit = permits.acquire_owned().await?;
            tokio::task::spawn_blocking(move || {
                let start = Instant::now();
                let mut session = store.open_session()?;
                recommender.recommend_by_peer_collaboration(session.as_mut(), user_id, None)?;
                Ok::<_, anyhow::Error>(start.elapsed())
            })
            .await?
        });
        handles.push(handle);
    }

    // Wait for all tasks to complete and collect timings
    let mut timings: Vec<Duration> = vec![];
    for handle in handles {
        timings.push(handle.await??);
    }
    let total_time = wall_clock.elapsed();

    let latency_sum: Duration = timings.iter().sum();
    let avg_latency = latency_sum / (timings.len() as u32);
    timings.sort();
    let percentile = |p: f32| timings[((timings.len() as f32 * p) as usize).min(timings.len() - 1)];
    let throughput = requests as f32 / total_time.as_secs_f32();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Print recommendations the way each strategy reads best
fn print_recommendations(strategy: &Strategy, recommendations: &[Recommendation]) {
    if recommendations.is_empty() {
        println!("No {} recommendations found.", strategy.label());
        return;
    }

    println!("{}", format!("\n{} recommendations:", strategy.label()).bold().blue());
    for (i, rec) in recommendations.iter().enumerate() {
        println!(
            "\n{}. {} (MovieID: {})",
            (i + 1).to_string().green(),
            rec.title.bold(),
            rec.movie_id
        );
        match &rec.aggregates {
            Aggregates::Collaborative(stats) => {
                println!("  Average Rating: {:.2}/5", stats.mean_rating);
                println!("  Common Users: {}", stats.distinct_contributors);
                println!("  Score: {:.2}", rec.score);
            }
            Aggregates::Hybrid(stats) => {
                println!("  Average Rating: {:.2}/5", stats.mean_rating);
                println!("  Rating Count: {}", stats.rating_count);
                println!("  Final Score: {:.2}", rec.score);
                println!("  Matched Genres: {}", stats.overlapping_genres.join(", "));
                println!("  Matched Tags: {}", stats.overlapping_tags.join(", "));
            }
        }
        println!("  Explanation:");
        for (_, lines) in rec.explanations.iter() {
            for line in lines {
                println!("    - {}", line.dimmed());
            }
        }
    }
}
